//! Half-edge mesh data structure.
//!
//! The mesh is an arena: one array per entity kind, with every relation stored
//! as an index into another array. Entities are created once by
//! [`build_from_triangles`](super::build_from_triangles) and never removed, so
//! an index stays valid for the lifetime of the mesh.
//!
//! # Structure
//!
//! - Every triangle owns three **half-edges** linked by `next`/`prev` into a
//!   counter-clockwise cycle.
//! - A half-edge stores its **target** vertex; its source is `target(prev)`.
//! - Two half-edges running in opposite directions between the same vertices
//!   are each other's **opposite** and share one undirected **edge**.
//! - Each vertex stores one outgoing half-edge, each face one of its
//!   half-edges.
//!
//! # Boundary Handling
//!
//! There are no sentinel half-edges outside the faces. An edge on the mesh
//! boundary owns a single half-edge whose `opposite` is `None`. A boundary
//! vertex's representative half-edge is always its outgoing boundary
//! half-edge, so rotating counter-clockwise from it sweeps the whole open fan.

use nalgebra::{Point3, Vector3};

use super::index::{EdgeId, FaceId, HalfEdgeId, MeshIndex, VertexId};
use crate::geometry::{self, BoundingBox};

/// A vertex in the half-edge mesh.
#[derive(Debug, Clone)]
pub struct Vertex<I: MeshIndex = u32> {
    /// The 3D position of this vertex.
    pub position: Point3<f64>,

    /// One outgoing half-edge, `None` for a vertex no face uses.
    /// For boundary vertices this is the outgoing boundary half-edge.
    pub halfedge: Option<HalfEdgeId<I>>,
}

impl<I: MeshIndex> Vertex<I> {
    /// Create a new, not yet connected vertex.
    pub fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            halfedge: None,
        }
    }
}

/// An undirected edge.
#[derive(Debug, Clone, Copy)]
pub struct Edge<I: MeshIndex = u32> {
    /// The half-edge that created this edge.
    pub halfedge: HalfEdgeId<I>,

    /// The half-edge running the other way, absent on the boundary.
    pub twin: Option<HalfEdgeId<I>>,
}

impl<I: MeshIndex> Edge<I> {
    /// Whether only one face uses this edge.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.twin.is_none()
    }

    /// The one or two half-edges of this edge.
    pub fn halfedges(&self) -> impl Iterator<Item = HalfEdgeId<I>> {
        std::iter::once(self.halfedge).chain(self.twin)
    }
}

/// A directed half-edge bound to one face.
#[derive(Debug, Clone, Copy)]
pub struct HalfEdge<I: MeshIndex = u32> {
    /// The vertex this half-edge points to.
    pub target: VertexId<I>,

    /// The next half-edge around the face (counter-clockwise).
    pub next: HalfEdgeId<I>,

    /// The previous half-edge around the face.
    pub prev: HalfEdgeId<I>,

    /// The half-edge on the same edge pointing the other way.
    /// `None` on the boundary.
    pub opposite: Option<HalfEdgeId<I>>,

    /// The undirected edge this half-edge belongs to.
    pub edge: EdgeId<I>,

    /// The face this half-edge bounds.
    pub face: FaceId<I>,
}

impl<I: MeshIndex> HalfEdge<I> {
    /// Check if this half-edge is on the boundary.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.opposite.is_none()
    }
}

/// A triangular face.
#[derive(Debug, Clone, Copy)]
pub struct Face<I: MeshIndex = u32> {
    /// One of the three half-edges bounding this face.
    pub halfedge: HalfEdgeId<I>,
}

/// A half-edge mesh for triangle meshes.
///
/// Built once and immutable afterwards; every query borrows it shared.
#[derive(Debug, Clone)]
pub struct HalfEdgeMesh<I: MeshIndex = u32> {
    pub(crate) vertices: Vec<Vertex<I>>,
    pub(crate) edges: Vec<Edge<I>>,
    pub(crate) halfedges: Vec<HalfEdge<I>>,
    pub(crate) faces: Vec<Face<I>>,
}

impl<I: MeshIndex> HalfEdgeMesh<I> {
    pub(crate) fn with_capacity(num_vertices: usize, num_faces: usize) -> Self {
        // Closed mesh: E = 3F/2. Boundary edges push it up a little.
        Self {
            vertices: Vec::with_capacity(num_vertices),
            edges: Vec::with_capacity(num_faces * 3 / 2 + num_faces / 4),
            halfedges: Vec::with_capacity(num_faces * 3),
            faces: Vec::with_capacity(num_faces),
        }
    }

    // ==================== Accessors ====================

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of undirected edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Get the number of half-edges (always three per face).
    #[inline]
    pub fn num_halfedges(&self) -> usize {
        self.halfedges.len()
    }

    /// Get the number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Get a vertex by ID.
    #[inline]
    pub fn vertex(&self, id: VertexId<I>) -> &Vertex<I> {
        &self.vertices[id.index()]
    }

    /// Get an edge by ID.
    #[inline]
    pub fn edge(&self, id: EdgeId<I>) -> &Edge<I> {
        &self.edges[id.index()]
    }

    /// Get a half-edge by ID.
    #[inline]
    pub fn halfedge(&self, id: HalfEdgeId<I>) -> &HalfEdge<I> {
        &self.halfedges[id.index()]
    }

    /// Get a face by ID.
    #[inline]
    pub fn face(&self, id: FaceId<I>) -> &Face<I> {
        &self.faces[id.index()]
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId<I>) -> &Point3<f64> {
        &self.vertex(v).position
    }

    // ==================== Topology Queries ====================

    /// Get the opposite half-edge, if the edge is interior.
    #[inline]
    pub fn opposite(&self, he: HalfEdgeId<I>) -> Option<HalfEdgeId<I>> {
        self.halfedge(he).opposite
    }

    /// Get the next half-edge around the face.
    #[inline]
    pub fn next(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).next
    }

    /// Get the previous half-edge around the face.
    #[inline]
    pub fn prev(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).prev
    }

    /// Get the vertex a half-edge points to.
    #[inline]
    pub fn target(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.halfedge(he).target
    }

    /// Get the vertex a half-edge starts from.
    #[inline]
    pub fn source(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.target(self.prev(he))
    }

    /// Get the face of a half-edge.
    #[inline]
    pub fn face_of(&self, he: HalfEdgeId<I>) -> FaceId<I> {
        self.halfedge(he).face
    }

    /// Get the undirected edge of a half-edge.
    #[inline]
    pub fn edge_of(&self, he: HalfEdgeId<I>) -> EdgeId<I> {
        self.halfedge(he).edge
    }

    /// The next outgoing half-edge counter-clockwise around `source(he)`.
    ///
    /// `None` when `he` is the last half-edge of an open fan.
    #[inline]
    pub fn ccw_rotated(&self, he: HalfEdgeId<I>) -> Option<HalfEdgeId<I>> {
        self.opposite(self.prev(he))
    }

    /// The next outgoing half-edge clockwise around `source(he)`.
    ///
    /// `None` when `he` is the outgoing boundary half-edge of its source.
    #[inline]
    pub fn cw_rotated(&self, he: HalfEdgeId<I>) -> Option<HalfEdgeId<I>> {
        self.opposite(he).map(|o| self.next(o))
    }

    /// Check if a half-edge is on the boundary.
    #[inline]
    pub fn is_boundary_halfedge(&self, he: HalfEdgeId<I>) -> bool {
        self.halfedge(he).is_boundary()
    }

    /// Check if an edge is on the boundary.
    #[inline]
    pub fn is_boundary_edge(&self, e: EdgeId<I>) -> bool {
        self.edge(e).is_boundary()
    }

    /// Check if a vertex is on the boundary.
    ///
    /// Vertices no face uses count as boundary.
    pub fn is_boundary_vertex(&self, v: VertexId<I>) -> bool {
        self.vertex(v)
            .halfedge
            .map_or(true, |he| self.is_boundary_halfedge(he))
    }

    /// Whether the mesh has no boundary edges at all.
    pub fn is_closed(&self) -> bool {
        self.edges.iter().all(|e| !e.is_boundary())
    }

    /// Get the three half-edges of a face, starting from its representative.
    pub fn face_halfedge_triple(&self, f: FaceId<I>) -> [HalfEdgeId<I>; 3] {
        let he0 = self.face(f).halfedge;
        let he1 = self.next(he0);
        [he0, he1, self.next(he1)]
    }

    /// Get the three vertices of a face in winding order.
    pub fn face_triangle(&self, f: FaceId<I>) -> [VertexId<I>; 3] {
        let [he0, he1, he2] = self.face_halfedge_triple(f);
        [self.target(he2), self.target(he0), self.target(he1)]
    }

    /// Get the positions of the three vertices of a face.
    pub fn face_positions(&self, f: FaceId<I>) -> [Point3<f64>; 3] {
        let [v0, v1, v2] = self.face_triangle(f);
        [*self.position(v0), *self.position(v1), *self.position(v2)]
    }

    // ==================== Geometry ====================

    /// Cross product of the two edges leaving the face's first vertex.
    ///
    /// Points along the outward normal for counter-clockwise winding, with
    /// magnitude twice the triangle area.
    pub fn face_cross(&self, f: FaceId<I>) -> Vector3<f64> {
        let [p0, p1, p2] = self.face_positions(f);
        (p1 - p0).cross(&(p2 - p0))
    }

    /// Compute the unit normal of a face (zero for a degenerate face).
    pub fn face_normal(&self, f: FaceId<I>) -> Vector3<f64> {
        geometry::normalize_or_zero(&self.face_cross(f))
    }

    /// Compute the area of a face.
    pub fn face_area(&self, f: FaceId<I>) -> f64 {
        0.5 * self.face_cross(f).norm()
    }

    /// Interior angle of the corner at `target(he)`, between `he` and
    /// `next(he)`.
    ///
    /// Corners are keyed by the half-edge entering them, so a face's three
    /// corners map to its three half-edges.
    pub fn corner_angle(&self, he: HalfEdgeId<I>) -> f64 {
        let incoming = self.edge_length(he);
        let outgoing = self.edge_length(self.next(he));
        let across = self.edge_length(self.prev(he));
        geometry::corner_angle_from_lengths(incoming, outgoing, across)
    }

    /// Compute the length of a half-edge.
    pub fn edge_length(&self, he: HalfEdgeId<I>) -> f64 {
        self.edge_vector(he).norm()
    }

    /// Compute the vector from source to target.
    pub fn edge_vector(&self, he: HalfEdgeId<I>) -> Vector3<f64> {
        self.position(self.target(he)) - self.position(self.source(he))
    }

    /// Compute the centroid of a face.
    pub fn face_centroid(&self, f: FaceId<I>) -> Point3<f64> {
        let [p0, p1, p2] = self.face_positions(f);
        Point3::from((p0.coords + p1.coords + p2.coords) / 3.0)
    }

    /// Compute the bounding box of the mesh, `None` if it has no vertices.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(self.vertices.iter().map(|v| &v.position))
    }

    /// Compute the total surface area of the mesh.
    pub fn surface_area(&self) -> f64 {
        self.face_ids().map(|f| self.face_area(f)).sum()
    }

    /// `V - E + F`.
    pub fn euler_characteristic(&self) -> i64 {
        self.num_vertices() as i64 - self.num_edges() as i64 + self.num_faces() as i64
    }

    // ==================== Validation ====================

    /// Check every connectivity invariant of the structure.
    pub fn is_valid(&self) -> bool {
        for (vid, v) in self.vertices() {
            if let Some(he) = v.halfedge {
                if he.index() >= self.halfedges.len() || self.source(he) != vid {
                    return false;
                }
            }
        }

        for (heid, he) in self.halfedges() {
            if self.halfedge(he.next).prev != heid || self.halfedge(he.prev).next != heid {
                return false;
            }
            // Triangles: the next-cycle closes after three steps.
            if self.next(self.next(he.next)) != heid {
                return false;
            }
            if self.face_of(he.next) != he.face {
                return false;
            }
            if let Some(opp) = he.opposite {
                let o = self.halfedge(opp);
                if o.opposite != Some(heid) || o.edge != he.edge {
                    return false;
                }
                if o.target != self.source(heid) {
                    return false;
                }
            }
            let edge = self.edge(he.edge);
            if edge.halfedge != heid && edge.twin != Some(heid) {
                return false;
            }
        }

        for (eid, e) in self.edges() {
            if self.edge_of(e.halfedge) != eid {
                return false;
            }
            if e.twin != self.opposite(e.halfedge) {
                return false;
            }
        }

        self.faces().all(|(fid, f)| self.face_of(f.halfedge) == fid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::build_from_triangles;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

    fn right_triangle() -> HalfEdgeMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap()
    }

    #[test]
    fn test_vertex_creation() {
        let v = Vertex::<u32>::new(Point3::new(1.0, 2.0, 3.0));
        assert_eq!(v.position, Point3::new(1.0, 2.0, 3.0));
        assert!(v.halfedge.is_none());
    }

    #[test]
    fn test_source_and_target() {
        let mesh = right_triangle();
        let f = FaceId::new(0);
        let [h0, h1, h2] = mesh.face_halfedge_triple(f);
        assert_eq!(mesh.source(h0).index(), 0);
        assert_eq!(mesh.target(h0).index(), 1);
        assert_eq!(mesh.source(h1), mesh.target(h0));
        assert_eq!(mesh.target(h2), mesh.source(h0));
        assert_eq!(mesh.face_triangle(f).map(|v| v.index()), [0, 1, 2]);
    }

    #[test]
    fn test_face_geometry() {
        let mesh = right_triangle();
        let f = FaceId::new(0);
        assert_relative_eq!(mesh.face_normal(f), Vector3::z());
        assert_relative_eq!(mesh.face_area(f), 0.5);
        assert_relative_eq!(mesh.face_cross(f).norm(), 2.0 * mesh.face_area(f));
        assert_relative_eq!(mesh.face_centroid(f), Point3::new(1.0 / 3.0, 1.0 / 3.0, 0.0));
    }

    fn bumpy_grid(n: usize) -> HalfEdgeMesh {
        let mut vertices = Vec::new();
        let mut faces = Vec::new();
        for j in 0..=n {
            for i in 0..=n {
                let (x, y) = (i as f64, j as f64);
                vertices.push(Point3::new(x, y, 0.3 * (1.3 * x).sin() * (0.7 * y).cos()));
            }
        }
        for j in 0..n {
            for i in 0..n {
                let v00 = j * (n + 1) + i;
                let v10 = v00 + 1;
                let v01 = v00 + n + 1;
                let v11 = v01 + 1;
                faces.push([v00, v10, v11]);
                faces.push([v00, v11, v01]);
            }
        }
        build_from_triangles(&vertices, &faces).unwrap()
    }

    fn heron(a: f64, b: f64, c: f64) -> f64 {
        let s = 0.5 * (a + b + c);
        (s * (s - a) * (s - b) * (s - c)).max(0.0).sqrt()
    }

    #[test]
    fn test_face_area_matches_heron() {
        let mesh = bumpy_grid(5);
        let mut total = 0.0;
        for f in mesh.face_ids() {
            let [p0, p1, p2] = mesh.face_triangle(f).map(|v| *mesh.position(v));
            let area = heron((p1 - p0).norm(), (p2 - p1).norm(), (p0 - p2).norm());
            assert!(area > 0.0);
            assert_relative_eq!(mesh.face_cross(f).norm(), 2.0 * area, epsilon = 1e-9);
            total += area;
        }
        assert_relative_eq!(mesh.surface_area(), total, epsilon = 1e-9);
    }

    #[test]
    fn test_corner_angles() {
        let mesh = right_triangle();
        let [h0, h1, h2] = mesh.face_halfedge_triple(FaceId::new(0));
        // h0 enters vertex 1, h1 enters vertex 2, h2 enters vertex 0.
        assert_relative_eq!(mesh.corner_angle(h0), FRAC_PI_4, epsilon = 1e-12);
        assert_relative_eq!(mesh.corner_angle(h1), FRAC_PI_4, epsilon = 1e-12);
        assert_relative_eq!(mesh.corner_angle(h2), FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn test_boundary_flags() {
        let mesh = right_triangle();
        assert!(!mesh.is_closed());
        for e in mesh.edge_ids() {
            assert!(mesh.is_boundary_edge(e));
            assert_eq!(mesh.edge(e).halfedges().count(), 1);
        }
        for v in mesh.vertex_ids() {
            assert!(mesh.is_boundary_vertex(v));
        }
    }

    #[test]
    fn test_rotation_stops_at_boundary() {
        let mesh = right_triangle();
        let h = mesh.vertex(VertexId::new(0)).halfedge.unwrap();
        assert!(mesh.ccw_rotated(h).is_none());
        assert!(mesh.cw_rotated(h).is_none());
    }

    #[test]
    fn test_degenerate_face_normal_is_zero() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ];
        let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();
        let f = FaceId::new(0);
        assert_eq!(mesh.face_normal(f), Vector3::zeros());
        assert_eq!(mesh.face_area(f), 0.0);
    }

    #[test]
    fn test_euler_characteristic_and_bbox() {
        let mesh = right_triangle();
        assert_eq!(mesh.euler_characteristic(), 1);
        let bbox = mesh.bounding_box().unwrap();
        assert_eq!(bbox.min, Point3::origin());
        assert_eq!(bbox.max, Point3::new(1.0, 1.0, 0.0));
    }
}
