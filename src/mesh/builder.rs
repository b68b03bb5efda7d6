//! Mesh construction utilities.
//!
//! This module builds a half-edge mesh from a face-vertex list, the shape in
//! which mesh file formats store triangles, and converts back.

use std::collections::HashMap;

use nalgebra::Point3;
use tracing::debug;

use super::halfedge::{Edge, Face, HalfEdge, HalfEdgeMesh, Vertex};
use super::index::{EdgeId, FaceId, HalfEdgeId, MeshIndex, VertexId};
use crate::error::{MeshError, Result};

/// Build a half-edge mesh from vertices and triangle faces.
///
/// Faces are zero-based vertex triples in counter-clockwise order. For each
/// face three half-edges are created and linked into a cycle. A half-edge
/// whose reverse was already created by an earlier face becomes that
/// half-edge's opposite and joins its edge; otherwise it starts a new
/// (for now boundary) edge.
///
/// Fails without producing a mesh if a face references a missing vertex,
/// repeats a vertex, or reuses a directed edge.
///
/// # Example
/// ```
/// use curvmesh::mesh::{build_from_triangles, HalfEdgeMesh};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.5, 1.0, 0.0),
/// ];
/// let faces = vec![[0, 1, 2]];
///
/// let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
/// assert_eq!(mesh.num_vertices(), 3);
/// assert_eq!(mesh.num_edges(), 3);
/// assert_eq!(mesh.num_faces(), 1);
/// ```
pub fn build_from_triangles<I: MeshIndex>(
    vertices: &[Point3<f64>],
    faces: &[[usize; 3]],
) -> Result<HalfEdgeMesh<I>> {
    if faces.is_empty() {
        return Err(MeshError::EmptyMesh);
    }

    check_capacity::<I>("vertices", vertices.len())?;
    check_capacity::<I>("half-edges", faces.len() * 3)?;

    for (fi, face) in faces.iter().enumerate() {
        for &vi in face {
            if vi >= vertices.len() {
                return Err(MeshError::InvalidVertexIndex { face: fi, vertex: vi });
            }
        }
        if face[0] == face[1] || face[1] == face[2] || face[0] == face[2] {
            return Err(MeshError::DegenerateFace { face: fi });
        }
    }

    let mut mesh = HalfEdgeMesh::with_capacity(vertices.len(), faces.len());
    mesh.vertices
        .extend(vertices.iter().map(|&p| Vertex::new(p)));

    // Directed (source, target) -> half-edge
    let mut directed: HashMap<(usize, usize), HalfEdgeId<I>> =
        HashMap::with_capacity(faces.len() * 3);

    for (fi, face) in faces.iter().enumerate() {
        let face_id = FaceId::<I>::new(fi);
        let base = mesh.halfedges.len();
        mesh.faces.push(Face {
            halfedge: HalfEdgeId::new(base),
        });

        for k in 0..3 {
            let source = face[k];
            let target = face[(k + 1) % 3];
            let he = HalfEdgeId::<I>::new(base + k);

            if directed.insert((source, target), he).is_some() {
                return Err(MeshError::NonManifoldEdge {
                    v0: source,
                    v1: target,
                });
            }

            let (edge, opposite) = match directed.get(&(target, source)) {
                Some(&twin) => {
                    let edge = mesh.halfedges[twin.index()].edge;
                    mesh.halfedges[twin.index()].opposite = Some(he);
                    mesh.edges[edge.index()].twin = Some(he);
                    (edge, Some(twin))
                }
                None => {
                    let edge = EdgeId::<I>::new(mesh.edges.len());
                    mesh.edges.push(Edge {
                        halfedge: he,
                        twin: None,
                    });
                    (edge, None)
                }
            };

            mesh.halfedges.push(HalfEdge {
                target: VertexId::new(target),
                next: HalfEdgeId::new(base + (k + 1) % 3),
                prev: HalfEdgeId::new(base + (k + 2) % 3),
                opposite,
                edge,
                face: face_id,
            });

            let vertex = &mut mesh.vertices[source];
            if vertex.halfedge.is_none() {
                vertex.halfedge = Some(he);
            }
        }
    }

    // Boundary vertices must start their fan at the outgoing boundary
    // half-edge, or rotation would miss part of the open fan.
    let mut boundary_halfedges = 0usize;
    for hi in 0..mesh.halfedges.len() {
        if mesh.halfedges[hi].opposite.is_none() {
            let he = HalfEdgeId::<I>::new(hi);
            let source = mesh.source(he);
            mesh.vertices[source.index()].halfedge = Some(he);
            boundary_halfedges += 1;
        }
    }

    debug!(
        vertices = mesh.num_vertices(),
        edges = mesh.num_edges(),
        faces = mesh.num_faces(),
        boundary_halfedges,
        "built half-edge mesh"
    );

    Ok(mesh)
}

fn check_capacity<I: MeshIndex>(what: &'static str, count: usize) -> Result<()> {
    if count > I::MAX {
        return Err(MeshError::IndexOverflow {
            what,
            count,
            max: I::MAX,
        });
    }
    Ok(())
}

/// Convert a half-edge mesh back to a face-vertex representation.
///
/// Returns (vertices, faces) with faces in winding order, so rebuilding from
/// the output reproduces the same indices.
pub fn to_face_vertex<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    let vertices: Vec<Point3<f64>> = mesh.vertex_ids().map(|v| *mesh.position(v)).collect();

    let faces: Vec<[usize; 3]> = mesh
        .face_ids()
        .map(|f| mesh.face_triangle(f).map(|v| v.index()))
        .collect();

    (vertices, faces)
}
