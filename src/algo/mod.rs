//! Geometric attribute algorithms.
//!
//! Each algorithm is a pure function of the mesh's topology and vertex
//! positions and returns a vector indexed by element id:
//!
//! - **Normals**: per-face unit normals, angle-weighted per-vertex normals
//! - **Curvature**: per-corner angles, angle-defect Gaussian curvature, local
//!   extrema classification
//! - **Boundary**: extraction of closed boundary loops
//!
//! [`crate::attributes::MeshAttributes`] runs all of them in order.

pub mod boundary;
pub mod curvature;
pub mod normals;

use rayon::prelude::*;

/// Evaluate `f` for every index in `0..n`, optionally on the rayon pool.
///
/// Output order is index order either way.
pub(crate) fn map_indices<T, F>(n: usize, parallel: bool, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    if parallel {
        (0..n).into_par_iter().map(f).collect()
    } else {
        (0..n).map(f).collect()
    }
}
