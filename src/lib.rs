//! # curvmesh
//!
//! Half-edge triangle meshes with derived differential-geometry attributes.
//!
//! curvmesh reads a triangle mesh, links it into a half-edge structure and
//! computes, once, everything a viewer needs to shade and annotate it:
//!
//! - **Half-edge data structure**: arena storage with type-safe indices and
//!   O(1) adjacency queries
//! - **Flexible indexing**: 16-bit, 32-bit, and 64-bit indices
//! - **Normals**: per-face, and angle-weighted per-vertex
//! - **Curvature**: angle-defect Gaussian curvature and local extrema
//! - **Boundary loops**: every hole as an ordered cycle of edges
//! - **File format**: Wavefront OBJ (triangles)
//!
//! ## Quick Start
//!
//! ```no_run
//! use curvmesh::prelude::*;
//!
//! let surface: SurfaceMesh = SurfaceMesh::load("model.obj", &AttributeOptions::default()).unwrap();
//!
//! println!("Vertices: {}", surface.num_vertices());
//! println!("Camera target: {:?}", surface.bounds_center());
//!
//! for v in surface.mesh().vertex_ids() {
//!     let k = surface.curvature(v);
//!     let class = surface.extremum(v);
//!     println!("{:?}: K={:.4} {:?}", v, k, class);
//! }
//! ```
//!
//! ## Building Meshes Programmatically
//!
//! ```
//! use curvmesh::prelude::*;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//!     Point3::new(0.5, 0.5, 1.0),
//! ];
//!
//! let faces = vec![
//!     [0, 2, 1],  // bottom
//!     [0, 1, 3],  // front
//!     [1, 2, 3],  // right
//!     [2, 0, 3],  // left
//! ];
//!
//! let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
//! assert_eq!(mesh.num_vertices(), 4);
//! assert_eq!(mesh.num_edges(), 6);
//! assert!(mesh.is_closed());
//!
//! let surface = SurfaceMesh::new(mesh, &AttributeOptions::default()).unwrap();
//! assert!(surface.boundary_loops().is_empty());
//! assert!((surface.gauss_bonnet_estimate() - 2.0).abs() < 1e-9);
//! ```
//!
//! ## Mesh Traversal
//!
//! ```
//! use curvmesh::prelude::*;
//! use nalgebra::Point3;
//!
//! # let vertices = vec![
//! #     Point3::new(0.0, 0.0, 0.0),
//! #     Point3::new(1.0, 0.0, 0.0),
//! #     Point3::new(0.5, 1.0, 0.0),
//! # ];
//! # let faces = vec![[0, 1, 2]];
//! # let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
//! let v = VertexId::new(0);
//! for neighbor in mesh.vertex_neighbors(v) {
//!     println!("Neighbor: {:?}", neighbor);
//! }
//!
//! for face in mesh.vertex_faces(v) {
//!     println!("Adjacent face: {:?}", face);
//! }
//!
//! let f = FaceId::new(0);
//! let [v0, v1, v2] = mesh.face_triangle(f);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod attributes;
pub mod error;
pub mod geometry;
pub mod io;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// ```
/// use curvmesh::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::boundary::BoundaryLoop;
    pub use crate::algo::curvature::Extremum;
    pub use crate::attributes::{AttributeOptions, MeshAttributes, SurfaceMesh};
    pub use crate::error::{MeshError, Result};
    pub use crate::geometry::BoundingBox;
    pub use crate::mesh::{
        build_from_triangles, to_face_vertex, Edge, EdgeId, Face, FaceId, HalfEdge, HalfEdgeId,
        HalfEdgeMesh, MeshIndex, Vertex, VertexId,
    };
}

pub use nalgebra;

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use nalgebra::Point3;

    #[test]
    fn test_tetrahedron() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];

        let faces = vec![
            [0, 2, 1], // bottom
            [0, 1, 3], // front
            [1, 2, 3], // right
            [2, 0, 3], // left
        ];

        let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();

        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_faces(), 4);
        // 4 faces * 3, no boundary
        assert_eq!(mesh.num_halfedges(), 12);
        assert_eq!(mesh.euler_characteristic(), 2);
        assert!(mesh.is_valid());

        for v in mesh.vertex_ids() {
            assert!(!mesh.is_boundary_vertex(v), "vertex {:?} should not be on boundary", v);
        }
    }

    #[test]
    fn test_small_index_type() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let mesh: HalfEdgeMesh<u16> = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();
        let surface = SurfaceMesh::new(mesh, &AttributeOptions::default()).unwrap();
        assert_eq!(surface.boundary_loops()[0].len(), 3);
    }
}
