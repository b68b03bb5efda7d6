//! Discrete Gaussian curvature and curvature extrema.
//!
//! Curvature is the angle defect at each vertex:
//!
//! ```text
//! K(v) = 2π - Σ θ(v, f)
//! ```
//!
//! summed over the corner angles `θ` of every face `f` around `v`. This is the
//! integrated Gaussian curvature of the vertex's neighbourhood, so it is not
//! divided by an area: a flat region gives 0, a convex cone point a positive
//! value, a saddle a negative one, and on a closed mesh the values sum to
//! `2π χ` (Gauss-Bonnet).
//!
//! # Example
//!
//! ```
//! use curvmesh::prelude::*;
//! use curvmesh::algo::curvature::{corner_angles, angle_defects};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//!     Point3::new(0.5, 0.5, 1.0),
//! ];
//! let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
//! let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
//!
//! let angles = corner_angles(&mesh, false);
//! let curvature = angle_defects(&mesh, &angles);
//! let total: f64 = curvature.iter().sum();
//! assert!((total - 4.0 * std::f64::consts::PI).abs() < 1e-9);
//! ```

use std::f64::consts::TAU;

use super::map_indices;
use crate::mesh::{HalfEdgeId, HalfEdgeMesh, MeshIndex, VertexId};

/// Default magnitude a vertex's curvature must exceed to count as an extremum.
pub const DEFAULT_EXTREMUM_THRESHOLD: f64 = 0.05;

/// Local curvature extremum classification of a vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i8)]
pub enum Extremum {
    /// Negative curvature not undercut by any neighbour.
    Minimum = -1,
    /// Not an extremum.
    #[default]
    None = 0,
    /// Positive curvature not exceeded by any neighbour.
    Maximum = 1,
}

impl Extremum {
    /// The classification as `-1`, `0` or `1`.
    #[inline]
    pub fn value(self) -> i8 {
        self as i8
    }

    /// Whether this is a minimum or maximum.
    #[inline]
    pub fn is_extremum(self) -> bool {
        self != Extremum::None
    }
}

/// Interior angle of every face corner, indexed by half-edge id.
///
/// The corner of half-edge `h` is the angle at `target(h)` between `h` and
/// `next(h)`, computed from the three edge lengths by the law of cosines.
/// Corners next to a zero-length edge get 0.
pub fn corner_angles<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, parallel: bool) -> Vec<f64> {
    map_indices(mesh.num_halfedges(), parallel, |i| {
        mesh.corner_angle(HalfEdgeId::new(i))
    })
}

/// Angle defect at every vertex, indexed by vertex id.
///
/// `corner_angles` is indexed by half-edge id as produced by
/// [`corner_angles`].
///
/// Boundary vertices use the same formula with no boundary correction, so
/// their values carry the turning of the boundary curve (a flat boundary
/// vertex reads about `π`, not 0). Vertices with no faces read `2π`.
pub fn angle_defects<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, corner_angles: &[f64]) -> Vec<f64> {
    debug_assert_eq!(corner_angles.len(), mesh.num_halfedges());

    let mut defects = vec![TAU; mesh.num_vertices()];
    for (he, &angle) in mesh.halfedge_ids().zip(corner_angles) {
        defects[mesh.target(he).index()] -= angle;
    }
    defects
}

/// Angle-defect Gaussian curvature of every vertex.
///
/// Shorthand for [`angle_defects`] over freshly computed [`corner_angles`].
pub fn gaussian_curvature<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> Vec<f64> {
    angle_defects(mesh, &corner_angles(mesh, false))
}

/// Classify every vertex as a local curvature maximum, minimum, or neither.
///
/// A vertex is a maximum when its curvature is above `threshold` and no
/// one-ring neighbour has a larger curvature, and a minimum when its curvature
/// is below `-threshold` and no neighbour has a smaller one. Ties do not
/// disqualify, so a plateau of equal extreme values is flagged as a whole.
/// Vertices with an empty one-ring are never extrema.
pub fn classify_extrema<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    curvature: &[f64],
    threshold: f64,
    parallel: bool,
) -> Vec<Extremum> {
    debug_assert_eq!(curvature.len(), mesh.num_vertices());

    map_indices(mesh.num_vertices(), parallel, |i| {
        classify_vertex(mesh, curvature, threshold, VertexId::new(i))
    })
}

fn classify_vertex<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    curvature: &[f64],
    threshold: f64,
    v: VertexId<I>,
) -> Extremum {
    let k = curvature[v.index()];
    if mesh.vertex(v).halfedge.is_none() || k.abs() <= threshold {
        return Extremum::None;
    }

    let mut ring = mesh.vertex_neighbors(v).map(|n| curvature[n.index()]);
    if k > 0.0 {
        if ring.all(|kn| kn <= k) {
            return Extremum::Maximum;
        }
    } else if ring.all(|kn| kn >= k) {
        return Extremum::Minimum;
    }
    Extremum::None
}
