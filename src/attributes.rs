//! Derived per-element attributes and the mesh wrapper that owns them.
//!
//! [`MeshAttributes::compute`] runs every attribute pass over a mesh once:
//! bounding box, face normals, corner angles, vertex normals, Gaussian
//! curvature, extrema classification and boundary loops. [`SurfaceMesh`]
//! pairs a mesh with its attributes; constructing one is the only way to get
//! them, so a `SurfaceMesh` is always fully built.
//!
//! # Example
//!
//! ```
//! use curvmesh::prelude::*;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();
//! let surface = SurfaceMesh::new(mesh, &AttributeOptions::default()).unwrap();
//!
//! assert_eq!(surface.boundary_loops().len(), 1);
//! assert!(surface.bounds_diagonal() > 0.0);
//! ```

use std::f64::consts::TAU;
use std::path::{Path, PathBuf};

use nalgebra::{Point3, Vector3};
use tracing::{info, warn};

use crate::algo::boundary::{boundary_loops, BoundaryLoop};
use crate::algo::curvature::{
    angle_defects, classify_extrema, corner_angles, Extremum, DEFAULT_EXTREMUM_THRESHOLD,
};
use crate::algo::normals::{face_normals, vertex_normals};
use crate::error::{MeshError, Result};
use crate::geometry::{BoundingBox, DEGENERATE_EPSILON};
use crate::mesh::{FaceId, HalfEdgeId, HalfEdgeMesh, MeshIndex, VertexId};

/// Options for attribute computation.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeOptions {
    /// Curvature magnitude (radians) a vertex must exceed to be classified as
    /// an extremum.
    pub extremum_threshold: f64,

    /// Whether per-element passes run on the rayon thread pool (default:
    /// false). Results are identical either way.
    pub parallel: bool,
}

impl Default for AttributeOptions {
    fn default() -> Self {
        Self {
            extremum_threshold: DEFAULT_EXTREMUM_THRESHOLD,
            parallel: false,
        }
    }
}

impl AttributeOptions {
    /// Set the extremum threshold.
    pub fn with_extremum_threshold(mut self, threshold: f64) -> Self {
        self.extremum_threshold = threshold;
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Check that every option is usable.
    pub fn validate(&self) -> Result<()> {
        if !self.extremum_threshold.is_finite() || self.extremum_threshold < 0.0 {
            return Err(MeshError::invalid_param(
                "extremum_threshold",
                self.extremum_threshold,
                "must be finite and non-negative",
            ));
        }
        Ok(())
    }
}

/// Summary statistics of per-vertex curvature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvatureStats {
    /// Smallest vertex curvature.
    pub min: f64,
    /// Largest vertex curvature.
    pub max: f64,
    /// Mean vertex curvature.
    pub mean: f64,
    /// Sum of all vertex curvatures.
    pub total: f64,
    /// Vertices classified as local maxima.
    pub maxima: usize,
    /// Vertices classified as local minima.
    pub minima: usize,
}

/// Every derived attribute of a mesh, in index-aligned arrays.
#[derive(Debug, Clone)]
pub struct MeshAttributes<I: MeshIndex = u32> {
    bounding_box: BoundingBox,
    face_normals: Vec<Vector3<f64>>,
    corner_angles: Vec<f64>,
    vertex_normals: Vec<Vector3<f64>>,
    curvature: Vec<f64>,
    extrema: Vec<Extremum>,
    boundary_loops: Vec<BoundaryLoop<I>>,
    degenerate_faces: usize,
}

impl<I: MeshIndex> MeshAttributes<I> {
    /// Compute all attributes of `mesh`.
    ///
    /// Fails only on invalid options or a mesh without vertices.
    pub fn compute(mesh: &HalfEdgeMesh<I>, options: &AttributeOptions) -> Result<Self> {
        options.validate()?;
        let parallel = options.parallel;

        let bounding_box = mesh.bounding_box().ok_or(MeshError::EmptyMesh)?;

        let face_normals = face_normals(mesh, parallel);
        let degenerate_faces = mesh
            .face_ids()
            .filter(|&f| mesh.face_cross(f).norm() <= DEGENERATE_EPSILON)
            .count();
        if degenerate_faces > 0 {
            warn!(
                degenerate_faces,
                "zero-area faces given zero normals and zero corner angles"
            );
        }

        let corner_angles = corner_angles(mesh, parallel);
        let vertex_normals = vertex_normals(mesh, &face_normals, &corner_angles, parallel);
        let curvature = angle_defects(mesh, &corner_angles);
        let extrema = classify_extrema(mesh, &curvature, options.extremum_threshold, parallel);
        let boundary_loops = boundary_loops(mesh);

        let attributes = Self {
            bounding_box,
            face_normals,
            corner_angles,
            vertex_normals,
            curvature,
            extrema,
            boundary_loops,
            degenerate_faces,
        };

        let stats = attributes.curvature_stats();
        info!(
            vertices = mesh.num_vertices(),
            faces = mesh.num_faces(),
            maxima = stats.maxima,
            minima = stats.minima,
            loops = attributes.boundary_loops.len(),
            "computed mesh attributes"
        );

        Ok(attributes)
    }

    /// Axis-aligned bounds of all vertex positions.
    pub fn bounding_box(&self) -> &BoundingBox {
        &self.bounding_box
    }

    /// Unit face normals, indexed by face id.
    pub fn face_normals(&self) -> &[Vector3<f64>] {
        &self.face_normals
    }

    /// Corner angles, indexed by half-edge id (angle at the half-edge's target).
    pub fn corner_angles(&self) -> &[f64] {
        &self.corner_angles
    }

    /// Angle-weighted unit vertex normals, indexed by vertex id.
    pub fn vertex_normals(&self) -> &[Vector3<f64>] {
        &self.vertex_normals
    }

    /// Angle-defect Gaussian curvature, indexed by vertex id.
    pub fn curvature(&self) -> &[f64] {
        &self.curvature
    }

    /// Extremum classification, indexed by vertex id.
    pub fn extrema(&self) -> &[Extremum] {
        &self.extrema
    }

    /// Boundary loops; empty for a closed mesh.
    pub fn boundary_loops(&self) -> &[BoundaryLoop<I>] {
        &self.boundary_loops
    }

    /// Number of faces with (near) zero area.
    pub fn degenerate_faces(&self) -> usize {
        self.degenerate_faces
    }

    /// Summary of the curvature and extrema arrays.
    pub fn curvature_stats(&self) -> CurvatureStats {
        let n = self.curvature.len().max(1) as f64;
        let (min, max, total) = self.curvature.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, 0.0),
            |(min, max, total), &k| (min.min(k), max.max(k), total + k),
        );
        CurvatureStats {
            min,
            max,
            mean: total / n,
            total,
            maxima: self.extrema.iter().filter(|&&e| e == Extremum::Maximum).count(),
            minima: self.extrema.iter().filter(|&&e| e == Extremum::Minimum).count(),
        }
    }
}

/// A half-edge mesh together with all of its derived attributes.
///
/// The mesh is read-only for the wrapper's lifetime; attributes are computed
/// once on construction. This is the surface a renderer consumes.
#[derive(Debug, Clone)]
pub struct SurfaceMesh<I: MeshIndex = u32> {
    mesh: HalfEdgeMesh<I>,
    attributes: MeshAttributes<I>,
}

impl<I: MeshIndex> SurfaceMesh<I> {
    /// Wrap `mesh`, computing its attributes.
    pub fn new(mesh: HalfEdgeMesh<I>, options: &AttributeOptions) -> Result<Self> {
        let attributes = MeshAttributes::compute(&mesh, options)?;
        Ok(Self { mesh, attributes })
    }

    /// Load a mesh file and compute its attributes.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use curvmesh::prelude::*;
    ///
    /// let surface: SurfaceMesh = SurfaceMesh::load("bunny.obj", &AttributeOptions::default()).unwrap();
    /// println!("{} boundary loops", surface.boundary_loops().len());
    /// ```
    pub fn load<P: AsRef<Path>>(path: P, options: &AttributeOptions) -> Result<Self> {
        let mesh = crate::io::load(path)?;
        Self::new(mesh, options)
    }

    /// Load several mesh files, skipping the ones that fail.
    ///
    /// Each failure is logged and the last one is returned alongside the
    /// meshes that did load, in input order.
    pub fn load_all<P: AsRef<Path>>(
        paths: &[P],
        options: &AttributeOptions,
    ) -> (Vec<(PathBuf, Self)>, Option<MeshError>) {
        let mut loaded = Vec::with_capacity(paths.len());
        let mut last_error = None;

        for path in paths {
            let path = path.as_ref();
            match Self::load(path, options) {
                Ok(surface) => loaded.push((path.to_path_buf(), surface)),
                Err(e) => {
                    warn!("skipping {}: {}", path.display(), e);
                    last_error = Some(e);
                }
            }
        }

        info!("loaded {} of {} meshes", loaded.len(), paths.len());
        (loaded, last_error)
    }

    /// The underlying mesh.
    pub fn mesh(&self) -> &HalfEdgeMesh<I> {
        &self.mesh
    }

    /// The computed attributes.
    pub fn attributes(&self) -> &MeshAttributes<I> {
        &self.attributes
    }

    /// Give up the attributes and return the mesh.
    pub fn into_mesh(self) -> HalfEdgeMesh<I> {
        self.mesh
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.mesh.num_vertices()
    }

    /// Number of undirected edges.
    pub fn num_edges(&self) -> usize {
        self.mesh.num_edges()
    }

    /// Number of faces.
    pub fn num_faces(&self) -> usize {
        self.mesh.num_faces()
    }

    /// Axis-aligned bounds of the mesh.
    pub fn bounding_box(&self) -> &BoundingBox {
        self.attributes.bounding_box()
    }

    /// Center of the bounding box.
    pub fn bounds_center(&self) -> Point3<f64> {
        self.attributes.bounding_box.center()
    }

    /// Length of the bounding box diagonal.
    pub fn bounds_diagonal(&self) -> f64 {
        self.attributes.bounding_box.diagonal()
    }

    /// Position of a vertex.
    pub fn position(&self, v: VertexId<I>) -> &Point3<f64> {
        self.mesh.position(v)
    }

    /// Unit normal of a vertex (zero for isolated vertices).
    pub fn vertex_normal(&self, v: VertexId<I>) -> Vector3<f64> {
        self.attributes.vertex_normals[v.index()]
    }

    /// Unit normal of a face (zero for degenerate faces).
    pub fn face_normal(&self, f: FaceId<I>) -> Vector3<f64> {
        self.attributes.face_normals[f.index()]
    }

    /// Corner angle at the target of a half-edge.
    pub fn corner_angle(&self, he: HalfEdgeId<I>) -> f64 {
        self.attributes.corner_angles[he.index()]
    }

    /// Gaussian curvature of a vertex.
    pub fn curvature(&self, v: VertexId<I>) -> f64 {
        self.attributes.curvature[v.index()]
    }

    /// Extremum classification of a vertex.
    pub fn extremum(&self, v: VertexId<I>) -> Extremum {
        self.attributes.extrema[v.index()]
    }

    /// Boundary loops as half-edge cycles.
    pub fn boundary_loops(&self) -> &[BoundaryLoop<I>] {
        self.attributes.boundary_loops()
    }

    /// Boundary loops as ordered point sequences.
    pub fn boundary_loop_points(&self) -> Vec<Vec<Point3<f64>>> {
        self.attributes
            .boundary_loops
            .iter()
            .map(|l| l.points(&self.mesh))
            .collect()
    }

    /// Sum of the curvature over all vertices.
    pub fn total_curvature(&self) -> f64 {
        self.attributes.curvature.iter().sum()
    }

    /// Euler characteristic estimated from total curvature (`ΣK / 2π`).
    ///
    /// Equals [`HalfEdgeMesh::euler_characteristic`] up to rounding on a
    /// closed mesh. On an open mesh boundary vertices inflate it.
    pub fn gauss_bonnet_estimate(&self) -> f64 {
        self.total_curvature() / TAU
    }

    /// Summary of the curvature and extrema arrays.
    pub fn curvature_stats(&self) -> CurvatureStats {
        self.attributes.curvature_stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::build_from_triangles;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn octahedron() -> HalfEdgeMesh {
        let vertices = vec![
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, -1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(0.0, 0.0, -1.0),
        ];
        let faces = vec![
            [0, 2, 4],
            [2, 1, 4],
            [1, 3, 4],
            [3, 0, 4],
            [2, 0, 5],
            [1, 2, 5],
            [3, 1, 5],
            [0, 3, 5],
        ];
        build_from_triangles(&vertices, &faces).unwrap()
    }

    fn single_triangle() -> HalfEdgeMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
        ];
        build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap()
    }

    #[test]
    fn test_default_options() {
        let opts = AttributeOptions::default();
        assert_relative_eq!(opts.extremum_threshold, 0.05);
        assert!(!opts.parallel);
        assert!(opts.validate().is_ok());

        let opts = opts.with_parallel(true).sequential();
        assert!(!opts.parallel);
    }

    #[test]
    fn test_invalid_threshold() {
        for bad in [-0.1, f64::NAN, f64::INFINITY] {
            let opts = AttributeOptions::default().with_extremum_threshold(bad);
            assert!(matches!(
                opts.validate(),
                Err(MeshError::InvalidParameter { name: "extremum_threshold", .. })
            ));
            assert!(SurfaceMesh::new(octahedron(), &opts).is_err());
        }
    }

    #[test]
    fn test_octahedron_attributes() {
        let surface = SurfaceMesh::new(octahedron(), &AttributeOptions::default()).unwrap();

        assert_eq!(surface.num_vertices(), 6);
        assert_eq!(surface.num_edges(), 12);
        assert_eq!(surface.num_faces(), 8);
        assert!(surface.boundary_loops().is_empty());
        assert_eq!(surface.attributes().degenerate_faces(), 0);

        assert_relative_eq!(surface.bounds_center(), Point3::origin(), epsilon = 1e-12);
        assert_relative_eq!(surface.bounds_diagonal(), 12.0_f64.sqrt(), epsilon = 1e-12);

        // Four equilateral corners meet at every vertex.
        for v in surface.mesh().vertex_ids() {
            assert_relative_eq!(surface.curvature(v), TAU / 3.0, epsilon = 1e-12);
            let outward = surface.position(v).coords;
            assert_relative_eq!(surface.vertex_normal(v), outward, epsilon = 1e-12);
            assert_eq!(surface.extremum(v), Extremum::Maximum);
        }

        assert_relative_eq!(surface.total_curvature(), 4.0 * PI, epsilon = 1e-9);
        assert_relative_eq!(
            surface.gauss_bonnet_estimate(),
            surface.mesh().euler_characteristic() as f64,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_single_triangle_attributes() {
        let surface = SurfaceMesh::new(single_triangle(), &AttributeOptions::default()).unwrap();

        let loops = surface.boundary_loop_points();
        assert_eq!(loops.len(), 1);
        assert_eq!(loops[0].len(), 3);

        for he in surface.mesh().halfedge_ids() {
            let v = surface.mesh().target(he);
            assert_relative_eq!(
                surface.curvature(v),
                TAU - surface.corner_angle(he),
                epsilon = 1e-12
            );
        }
        let f = FaceId::new(0);
        assert_relative_eq!(surface.face_normal(f), Vector3::z(), epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_faces_are_clamped() {
        // Second face is collinear.
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ];
        let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &[[0, 1, 2], [1, 0, 3]]).unwrap();
        let attrs = MeshAttributes::compute(&mesh, &AttributeOptions::default()).unwrap();

        assert_eq!(attrs.degenerate_faces(), 1);
        assert_eq!(attrs.face_normals()[1], Vector3::zeros());
        assert!(attrs.curvature().iter().all(|k| k.is_finite()));
        assert!(attrs.vertex_normals().iter().all(|n| n.iter().all(|c| c.is_finite())));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mesh = octahedron();
        let seq = MeshAttributes::compute(&mesh, &AttributeOptions::default()).unwrap();
        let par =
            MeshAttributes::compute(&mesh, &AttributeOptions::default().with_parallel(true)).unwrap();

        assert_eq!(seq.face_normals(), par.face_normals());
        assert_eq!(seq.vertex_normals(), par.vertex_normals());
        assert_eq!(seq.curvature(), par.curvature());
        assert_eq!(seq.extrema(), par.extrema());
        assert_eq!(seq.boundary_loops(), par.boundary_loops());
    }

    #[test]
    fn test_load_twice_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("octahedron.obj");
        crate::io::save(&octahedron(), &path).unwrap();

        let opts = AttributeOptions::default();
        let a: SurfaceMesh = SurfaceMesh::load(&path, &opts).unwrap();
        let b: SurfaceMesh = SurfaceMesh::load(&path, &opts).unwrap();

        assert_eq!(
            crate::mesh::to_face_vertex(a.mesh()),
            crate::mesh::to_face_vertex(b.mesh())
        );
        assert_eq!(a.attributes().curvature(), b.attributes().curvature());
        assert_eq!(a.attributes().vertex_normals(), b.attributes().vertex_normals());
        assert_eq!(a.attributes().extrema(), b.attributes().extrema());
    }

    #[test]
    fn test_load_all_skips_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.obj");
        let missing = dir.path().join("missing.obj");
        let bad_index = dir.path().join("bad_index.obj");
        let last = dir.path().join("last.obj");
        crate::io::save(&octahedron(), &first).unwrap();
        std::fs::write(&bad_index, "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 7\n").unwrap();
        crate::io::save(&single_triangle(), &last).unwrap();

        let paths = [&first, &missing, &bad_index, &last];
        let (loaded, last_error): (Vec<(PathBuf, SurfaceMesh)>, _) =
            SurfaceMesh::load_all(&paths, &AttributeOptions::default());

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].0, first);
        assert_eq!(loaded[0].1.num_faces(), 8);
        assert_eq!(loaded[1].0, last);
        assert_eq!(loaded[1].1.num_faces(), 1);
        assert!(matches!(
            last_error,
            Some(MeshError::InvalidVertexIndex { face: 0, vertex: 6 })
        ));
    }

    #[test]
    fn test_load_all_with_nothing_readable() {
        let dir = tempfile::tempdir().unwrap();
        let paths = [dir.path().join("a.obj"), dir.path().join("b.obj")];
        let (loaded, last_error): (Vec<(PathBuf, SurfaceMesh)>, _) =
            SurfaceMesh::load_all(&paths, &AttributeOptions::default());
        assert!(loaded.is_empty());
        assert!(matches!(last_error, Some(MeshError::LoadError { .. })));
    }

    #[test]
    fn test_curvature_stats() {
        let surface = SurfaceMesh::new(octahedron(), &AttributeOptions::default()).unwrap();
        let stats = surface.curvature_stats();
        assert_relative_eq!(stats.min, TAU / 3.0, epsilon = 1e-12);
        assert_relative_eq!(stats.max, TAU / 3.0, epsilon = 1e-12);
        assert_relative_eq!(stats.mean, TAU / 3.0, epsilon = 1e-12);
        assert_relative_eq!(stats.total, 2.0 * TAU, epsilon = 1e-9);
        assert_eq!(stats.maxima, 6);
        assert_eq!(stats.minima, 0);
    }
}
