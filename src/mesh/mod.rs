//! Core mesh data structures.
//!
//! This module provides the half-edge mesh representation, its index types,
//! and the traversal iterators.
//!
//! # Overview
//!
//! The primary type is [`HalfEdgeMesh`], a triangle mesh stored as four
//! arenas (vertices, edges, half-edges, faces) whose elements refer to each
//! other by index. Adjacency queries are O(1) and the structure is immutable
//! once built.
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe index wrappers:
//! - [`VertexId`] - Identifies a vertex
//! - [`EdgeId`] - Identifies an undirected edge
//! - [`HalfEdgeId`] - Identifies a half-edge
//! - [`FaceId`] - Identifies a face
//!
//! Indices are dense and zero-based, so derived attributes are plain vectors
//! indexed by `id.index()`.
//!
//! # Construction
//!
//! ```
//! use curvmesh::mesh::{HalfEdgeMesh, VertexId, build_from_triangles};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 2]];
//!
//! let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
//! let ring: Vec<_> = mesh.vertex_neighbors(VertexId::new(0)).collect();
//! assert_eq!(ring.len(), 2);
//! ```

mod builder;
mod halfedge;
mod index;
mod iter;

pub use builder::{build_from_triangles, to_face_vertex};
pub use halfedge::{Edge, Face, HalfEdge, HalfEdgeMesh, Vertex};
pub use index::{EdgeId, FaceId, HalfEdgeId, MeshIndex, VertexId};
pub use iter::{FaceHalfEdgeIter, VertexHalfEdgeIter, VertexVertexIter};
