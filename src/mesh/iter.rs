//! Traversal iterators.
//!
//! All iterators borrow the mesh immutably, are lazy, and are `Clone`, so a
//! sequence can be restarted either by cloning it before consumption or by
//! asking the mesh for a fresh one.
//!
//! Rotation around a vertex starts at its representative half-edge and turns
//! counter-clockwise. For a boundary vertex the representative is the
//! outgoing boundary half-edge, so the rotation covers the open fan and stops
//! when the incoming half-edge of the current face has no opposite. Every
//! rotation is additionally bounded by the number of half-edges in the mesh,
//! so traversal terminates even on non-manifold input.

use std::iter::FusedIterator;

use super::halfedge::{Edge, Face, HalfEdge, HalfEdgeMesh, Vertex};
use super::index::{EdgeId, FaceId, HalfEdgeId, MeshIndex, VertexId};

impl<I: MeshIndex> HalfEdgeMesh<I> {
    /// Iterate over all vertex IDs in index order.
    pub fn vertex_ids(&self) -> impl ExactSizeIterator<Item = VertexId<I>> + Clone + '_ {
        (0..self.vertices.len()).map(VertexId::new)
    }

    /// Iterate over all vertices with their IDs.
    pub fn vertices(&self) -> impl ExactSizeIterator<Item = (VertexId<I>, &Vertex<I>)> + Clone + '_ {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (VertexId::new(i), v))
    }

    /// Iterate over all edge IDs in index order.
    pub fn edge_ids(&self) -> impl ExactSizeIterator<Item = EdgeId<I>> + Clone + '_ {
        (0..self.edges.len()).map(EdgeId::new)
    }

    /// Iterate over all edges with their IDs.
    pub fn edges(&self) -> impl ExactSizeIterator<Item = (EdgeId<I>, &Edge<I>)> + Clone + '_ {
        self.edges
            .iter()
            .enumerate()
            .map(|(i, e)| (EdgeId::new(i), e))
    }

    /// Iterate over all half-edge IDs, boundary ones included.
    pub fn halfedge_ids(&self) -> impl ExactSizeIterator<Item = HalfEdgeId<I>> + Clone + '_ {
        (0..self.halfedges.len()).map(HalfEdgeId::new)
    }

    /// Iterate over all half-edges with their IDs.
    pub fn halfedges(
        &self,
    ) -> impl ExactSizeIterator<Item = (HalfEdgeId<I>, &HalfEdge<I>)> + Clone + '_ {
        self.halfedges
            .iter()
            .enumerate()
            .map(|(i, he)| (HalfEdgeId::new(i), he))
    }

    /// Iterate over all face IDs in index order.
    pub fn face_ids(&self) -> impl ExactSizeIterator<Item = FaceId<I>> + Clone + '_ {
        (0..self.faces.len()).map(FaceId::new)
    }

    /// Iterate over all faces with their IDs.
    pub fn faces(&self) -> impl ExactSizeIterator<Item = (FaceId<I>, &Face<I>)> + Clone + '_ {
        self.faces
            .iter()
            .enumerate()
            .map(|(i, f)| (FaceId::new(i), f))
    }

    /// Iterate over half-edges leaving a vertex, in fan order.
    pub fn vertex_halfedges(&self, v: VertexId<I>) -> VertexHalfEdgeIter<'_, I> {
        VertexHalfEdgeIter::new(self, v)
    }

    /// Iterate over the one-ring of a vertex.
    ///
    /// A boundary vertex with `k` incident faces has `k + 1` neighbours; the
    /// last one is reached through the incoming boundary half-edge.
    pub fn vertex_neighbors(&self, v: VertexId<I>) -> VertexVertexIter<'_, I> {
        VertexVertexIter {
            outgoing: self.vertex_halfedges(v),
            last: None,
        }
    }

    /// Iterate over faces adjacent to a vertex.
    pub fn vertex_faces(&self, v: VertexId<I>) -> impl Iterator<Item = FaceId<I>> + Clone + '_ {
        self.vertex_halfedges(v).map(|he| self.face_of(he))
    }

    /// Iterate over the half-edges of a face.
    pub fn face_halfedges(&self, f: FaceId<I>) -> FaceHalfEdgeIter<'_, I> {
        FaceHalfEdgeIter::new(self, f)
    }

    /// Iterate over the vertices of a face in winding order.
    pub fn face_vertices(&self, f: FaceId<I>) -> impl Iterator<Item = VertexId<I>> + Clone + '_ {
        self.face_halfedges(f).map(|he| self.source(he))
    }

    /// Number of vertices in the one-ring.
    pub fn valence(&self, v: VertexId<I>) -> usize {
        self.vertex_neighbors(v).count()
    }
}

/// Iterator over half-edges leaving a vertex.
#[derive(Clone)]
pub struct VertexHalfEdgeIter<'a, I: MeshIndex = u32> {
    mesh: &'a HalfEdgeMesh<I>,
    start: Option<HalfEdgeId<I>>,
    current: Option<HalfEdgeId<I>>,
    budget: usize,
}

impl<'a, I: MeshIndex> VertexHalfEdgeIter<'a, I> {
    fn new(mesh: &'a HalfEdgeMesh<I>, v: VertexId<I>) -> Self {
        let start = mesh.vertex(v).halfedge;
        Self {
            mesh,
            start,
            current: start,
            budget: mesh.num_halfedges(),
        }
    }
}

impl<I: MeshIndex> Iterator for VertexHalfEdgeIter<'_, I> {
    type Item = HalfEdgeId<I>;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.current?;
        if self.budget == 0 {
            self.current = None;
            return None;
        }
        self.budget -= 1;

        self.current = self
            .mesh
            .ccw_rotated(result)
            .filter(|&he| Some(he) != self.start);

        Some(result)
    }
}

impl<I: MeshIndex> FusedIterator for VertexHalfEdgeIter<'_, I> {}

/// Iterator over the one-ring vertices of a vertex.
#[derive(Clone)]
pub struct VertexVertexIter<'a, I: MeshIndex = u32> {
    outgoing: VertexHalfEdgeIter<'a, I>,
    last: Option<HalfEdgeId<I>>,
}

impl<I: MeshIndex> Iterator for VertexVertexIter<'_, I> {
    type Item = VertexId<I>;

    fn next(&mut self) -> Option<Self::Item> {
        let mesh = self.outgoing.mesh;
        if let Some(he) = self.outgoing.next() {
            self.last = Some(he);
            return Some(mesh.target(he));
        }

        // An open fan ends on a face whose incoming half-edge is on the
        // boundary; its source is the one neighbour no outgoing half-edge hits.
        let incoming = mesh.prev(self.last.take()?);
        if mesh.is_boundary_halfedge(incoming) {
            Some(mesh.source(incoming))
        } else {
            None
        }
    }
}

impl<I: MeshIndex> FusedIterator for VertexVertexIter<'_, I> {}

/// Iterator over half-edges around a face.
#[derive(Clone)]
pub struct FaceHalfEdgeIter<'a, I: MeshIndex = u32> {
    mesh: &'a HalfEdgeMesh<I>,
    start: HalfEdgeId<I>,
    current: Option<HalfEdgeId<I>>,
}

impl<'a, I: MeshIndex> FaceHalfEdgeIter<'a, I> {
    fn new(mesh: &'a HalfEdgeMesh<I>, f: FaceId<I>) -> Self {
        let start = mesh.face(f).halfedge;
        Self {
            mesh,
            start,
            current: Some(start),
        }
    }
}

impl<I: MeshIndex> Iterator for FaceHalfEdgeIter<'_, I> {
    type Item = HalfEdgeId<I>;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.current?;
        let next = self.mesh.next(result);
        self.current = (next != self.start).then_some(next);
        Some(result)
    }
}

impl<I: MeshIndex> FusedIterator for FaceHalfEdgeIter<'_, I> {}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use nalgebra::Point3;

    use crate::mesh::{build_from_triangles, HalfEdgeMesh, VertexId};

    /// Fan of four triangles around vertex 0, open between vertices 1 and 5.
    fn open_fan() -> HalfEdgeMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(-1.0, 1.0, 0.0),
            Point3::new(-1.0, 0.0, 0.0),
        ];
        let faces = vec![[0, 1, 2], [0, 2, 3], [0, 3, 4], [0, 4, 5]];
        build_from_triangles(&vertices, &faces).unwrap()
    }

    fn tetrahedron() -> HalfEdgeMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];
        let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
        build_from_triangles(&vertices, &faces).unwrap()
    }

    #[test]
    fn test_mesh_iterators_cover_everything() {
        let mesh = tetrahedron();
        assert_eq!(mesh.vertex_ids().len(), 4);
        assert_eq!(mesh.face_ids().len(), 4);
        assert_eq!(mesh.edge_ids().len(), 6);
        assert_eq!(mesh.halfedge_ids().len(), 12);

        let order: Vec<usize> = mesh.vertex_ids().map(|v| v.index()).collect();
        assert_eq!(order, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_iterators_restart() {
        let mesh = tetrahedron();
        let ring = mesh.vertex_neighbors(VertexId::new(3));
        let first: Vec<_> = ring.clone().collect();
        let second: Vec<_> = ring.collect();
        assert_eq!(first, second);
        assert_eq!(first, mesh.vertex_neighbors(VertexId::new(3)).collect::<Vec<_>>());
    }

    #[test]
    fn test_closed_fan() {
        let mesh = tetrahedron();
        for v in mesh.vertex_ids() {
            let out: Vec<_> = mesh.vertex_halfedges(v).collect();
            assert_eq!(out.len(), 3);
            for &he in &out {
                assert_eq!(mesh.source(he), v);
            }
            let ring: HashSet<_> = mesh.vertex_neighbors(v).collect();
            assert_eq!(ring.len(), 3);
            assert!(!ring.contains(&v));
        }
    }

    #[test]
    fn test_open_fan_terminates_and_is_complete() {
        let mesh = open_fan();
        let center = VertexId::new(0);
        assert!(mesh.is_boundary_vertex(center));

        let out: Vec<_> = mesh.vertex_halfedges(center).collect();
        assert_eq!(out.len(), 4);

        let ring: Vec<usize> = mesh.vertex_neighbors(center).map(|v| v.index()).collect();
        assert_eq!(ring, vec![1, 2, 3, 4, 5]);
        assert_eq!(mesh.valence(center), 5);

        let faces: Vec<usize> = mesh.vertex_faces(center).map(|f| f.index()).collect();
        assert_eq!(faces, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_boundary_rim_vertex() {
        let mesh = open_fan();
        // Vertex 1 sits on a single face.
        let ring: Vec<usize> = mesh.vertex_neighbors(VertexId::new(1)).map(|v| v.index()).collect();
        assert_eq!(ring, vec![2, 0]);
        // Vertex 2 sits between faces 0 and 1.
        let ring: Vec<usize> = mesh.vertex_neighbors(VertexId::new(2)).map(|v| v.index()).collect();
        assert_eq!(ring, vec![3, 0, 1]);
    }

    #[test]
    fn test_face_vertices_in_winding_order() {
        let mesh = tetrahedron();
        for f in mesh.face_ids() {
            let verts: Vec<_> = mesh.face_vertices(f).collect();
            assert_eq!(verts, mesh.face_triangle(f).to_vec());
            assert_eq!(mesh.face_halfedges(f).count(), 3);
        }
    }

    #[test]
    fn test_isolated_vertex_has_empty_ring() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(5.0, 5.0, 5.0),
        ];
        let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();
        let lonely = VertexId::new(3);
        assert_eq!(mesh.vertex_halfedges(lonely).count(), 0);
        assert_eq!(mesh.vertex_neighbors(lonely).count(), 0);
        assert!(mesh.is_boundary_vertex(lonely));
    }
}
