//! Face and vertex normals.
//!
//! Vertex normals are the sum of the incident face normals weighted by the
//! corner angle the face subtends at the vertex. Weighting by angle keeps the
//! result independent of how finely the fan around a vertex is triangulated,
//! which a flat average is not.

use nalgebra::Vector3;

use super::map_indices;
use crate::geometry::normalize_or_zero;
use crate::mesh::{FaceId, HalfEdgeMesh, MeshIndex, VertexId};

/// Unit normal of every face, indexed by face id.
///
/// Degenerate faces get the zero vector.
pub fn face_normals<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, parallel: bool) -> Vec<Vector3<f64>> {
    map_indices(mesh.num_faces(), parallel, |i| {
        mesh.face_normal(FaceId::new(i))
    })
}

/// Angle-weighted unit normal of every vertex, indexed by vertex id.
///
/// `face_normals` is indexed by face id and `corner_angles` by half-edge id
/// (the angle at the half-edge's target), as produced by [`face_normals`] and
/// [`super::curvature::corner_angles`]. Vertices with no faces, or whose
/// weighted normals cancel, get the zero vector.
pub fn vertex_normals<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    face_normals: &[Vector3<f64>],
    corner_angles: &[f64],
    parallel: bool,
) -> Vec<Vector3<f64>> {
    debug_assert_eq!(face_normals.len(), mesh.num_faces());
    debug_assert_eq!(corner_angles.len(), mesh.num_halfedges());

    map_indices(mesh.num_vertices(), parallel, |i| {
        let v = VertexId::new(i);
        let sum = mesh
            .vertex_halfedges(v)
            .fold(Vector3::zeros(), |acc, he| {
                // The corner at `v` inside this face is keyed by the half-edge
                // entering `v`.
                let weight = corner_angles[mesh.prev(he).index()];
                acc + face_normals[mesh.face_of(he).index()] * weight
            });
        normalize_or_zero(&sum)
    })
}
