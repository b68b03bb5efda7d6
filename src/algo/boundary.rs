//! Boundary loop extraction.
//!
//! A boundary half-edge is one with no opposite. Boundary half-edges chain
//! into closed cycles: from a boundary half-edge `h`, the next one along the
//! boundary leaves `target(h)` and is found by rotating clockwise around that
//! vertex, starting at `next(h)`, until a half-edge with no opposite turns up.
//! Each cycle is one [`BoundaryLoop`], and every boundary edge ends up in
//! exactly one loop.

use nalgebra::Point3;
use tracing::{debug, info, warn};

use crate::mesh::{HalfEdgeId, HalfEdgeMesh, MeshIndex, VertexId};

/// An ordered cycle of boundary half-edges.
///
/// Consecutive half-edges share a vertex: the target of one is the source of
/// the next, and the last leads back to the first when the loop is closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryLoop<I: MeshIndex = u32> {
    halfedges: Vec<HalfEdgeId<I>>,
}

impl<I: MeshIndex> BoundaryLoop<I> {
    /// The loop's half-edges in walk order.
    #[inline]
    pub fn halfedges(&self) -> &[HalfEdgeId<I>] {
        &self.halfedges
    }

    /// Number of edges (and vertices) in the loop.
    #[inline]
    pub fn len(&self) -> usize {
        self.halfedges.len()
    }

    /// True if the loop has no edges.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.halfedges.is_empty()
    }

    /// Source vertex of each half-edge, in walk order.
    pub fn vertices<'a>(
        &'a self,
        mesh: &'a HalfEdgeMesh<I>,
    ) -> impl ExactSizeIterator<Item = VertexId<I>> + 'a {
        self.halfedges.iter().map(move |&he| mesh.source(he))
    }

    /// Positions of the loop's vertices, in walk order.
    pub fn points(&self, mesh: &HalfEdgeMesh<I>) -> Vec<Point3<f64>> {
        self.vertices(mesh).map(|v| *mesh.position(v)).collect()
    }

    /// Total length of the loop's edges.
    pub fn perimeter(&self, mesh: &HalfEdgeMesh<I>) -> f64 {
        self.halfedges.iter().map(|&he| mesh.edge_length(he)).sum()
    }
}

/// The boundary half-edge that follows `he` along its boundary loop.
///
/// `he` must be a boundary half-edge. Returns `None` if the rotation around
/// `target(he)` does not reach another boundary half-edge within the mesh's
/// half-edge count, which only happens on non-manifold input.
pub fn next_boundary_halfedge<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    he: HalfEdgeId<I>,
) -> Option<HalfEdgeId<I>> {
    debug_assert!(mesh.is_boundary_halfedge(he));

    let mut candidate = mesh.next(he);
    for _ in 0..mesh.num_halfedges() {
        match mesh.cw_rotated(candidate) {
            Some(rotated) => candidate = rotated,
            None => return Some(candidate),
        }
    }
    None
}

/// Extract every boundary loop of the mesh.
///
/// Loops are discovered in order of their lowest-numbered boundary
/// half-edge, and each starts at that half-edge. A closed mesh yields no
/// loops.
///
/// On non-manifold input a walk can arrive at a boundary half-edge that
/// already belongs to another loop, or fail to find a successor at all. The
/// partial cycle is still returned as a loop and a warning is logged.
pub fn boundary_loops<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> Vec<BoundaryLoop<I>> {
    let mut visited = vec![false; mesh.num_halfedges()];
    let mut loops = Vec::new();

    let boundary: Vec<HalfEdgeId<I>> = mesh
        .halfedge_ids()
        .filter(|&he| mesh.is_boundary_halfedge(he))
        .collect();

    if boundary.is_empty() {
        debug!("mesh is closed, no boundary loops");
        return loops;
    }
    debug!("Found {} boundary half-edges", boundary.len());

    for &start in &boundary {
        if visited[start.index()] {
            continue;
        }

        let mut halfedges = Vec::new();
        let mut current = start;
        loop {
            visited[current.index()] = true;
            halfedges.push(current);

            match next_boundary_halfedge(mesh, current) {
                Some(next) if next == start => break,
                Some(next) if !visited[next.index()] => current = next,
                Some(next) => {
                    warn!(
                        start = start.index(),
                        rejoined = next.index(),
                        "boundary walk rejoined another loop; non-manifold vertex at {:?}",
                        mesh.source(next)
                    );
                    break;
                }
                None => {
                    warn!(
                        start = start.index(),
                        at = current.index(),
                        "boundary walk found no successor; loop left open"
                    );
                    break;
                }
            }
        }

        debug!("Traced boundary loop with {} edges", halfedges.len());
        loops.push(BoundaryLoop { halfedges });
    }

    info!(
        loops = loops.len(),
        boundary_edges = boundary.len(),
        "extracted boundary loops"
    );
    loops
}
