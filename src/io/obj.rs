//! Wavefront OBJ format support.
//!
//! Only the triangle-mesh subset is read: `v x y z` vertex records and
//! `f i j k` triangle records with 1-based indices. Face tokens may carry
//! texture and normal references (`i/t/n`, `i//n`); only the vertex index is
//! used. Everything else (comments, `vn`, `vt`, groups, materials, faces
//! with more or fewer than three corners) is skipped.
//!
//! Vertices must be declared before a face references them.
//!
//! # Example
//!
//! ```
//! use curvmesh::io::obj;
//! use curvmesh::mesh::HalfEdgeMesh;
//!
//! let source = "\
//! v 0 0 0
//! v 1 0 0
//! v 0 1 0
//! f 1 2 3
//! ";
//! let mesh: HalfEdgeMesh = obj::parse(source.as_bytes()).unwrap();
//! assert_eq!(mesh.num_faces(), 1);
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;
use tracing::{debug, info};

use crate::error::{MeshError, Result};
use crate::mesh::{build_from_triangles, to_face_vertex, HalfEdgeMesh, MeshIndex};

/// Load a mesh from an OBJ file.
///
/// A file that cannot be opened or read fails with
/// [`MeshError::LoadError`] naming the path.
///
/// # Example
///
/// ```no_run
/// use curvmesh::io::obj;
/// use curvmesh::mesh::HalfEdgeMesh;
///
/// let mesh: HalfEdgeMesh = obj::load("bunny.obj").unwrap();
/// ```
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<HalfEdgeMesh<I>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| MeshError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mesh = parse(BufReader::new(file)).map_err(|e| match e {
        MeshError::Io(io) => MeshError::LoadError {
            path: path.to_path_buf(),
            message: io.to_string(),
        },
        other => other,
    })?;

    info!(
        path = %path.display(),
        vertices = mesh.num_vertices(),
        faces = mesh.num_faces(),
        "loaded OBJ mesh"
    );
    Ok(mesh)
}

/// Parse an OBJ stream into a half-edge mesh.
pub fn parse<R: BufRead, I: MeshIndex>(reader: R) -> Result<HalfEdgeMesh<I>> {
    let (vertices, faces) = read_triangles(reader)?;
    build_from_triangles(&vertices, &faces)
}

/// Read the vertex and triangle records of an OBJ stream.
///
/// Returns zero-based faces. Fails on a malformed `v` or `f` record, or on a
/// face that references a vertex not yet declared.
pub fn read_triangles<R: BufRead>(reader: R) -> Result<(Vec<Point3<f64>>, Vec<[usize; 3]>)> {
    let mut vertices: Vec<Point3<f64>> = Vec::new();
    let mut faces: Vec<[usize; 3]> = Vec::new();
    let mut skipped_faces = 0usize;

    for (line_idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = line_idx + 1;
        let content = line.split('#').next().unwrap_or_default();
        let mut tokens = content.split_whitespace();

        match tokens.next() {
            Some("v") => {
                let mut coords = [0.0f64; 3];
                for c in &mut coords {
                    let token = tokens
                        .next()
                        .ok_or_else(|| MeshError::parse(line_no, "vertex needs three coordinates"))?;
                    *c = token
                        .parse::<f64>()
                        .ok()
                        .filter(|x| x.is_finite())
                        .ok_or_else(|| {
                            MeshError::parse(line_no, format!("invalid coordinate '{token}'"))
                        })?;
                }
                vertices.push(Point3::new(coords[0], coords[1], coords[2]));
            }
            Some("f") => {
                let corners: Vec<&str> = tokens.collect();
                if corners.len() != 3 {
                    skipped_faces += 1;
                    continue;
                }

                let mut face = [0usize; 3];
                for (slot, token) in face.iter_mut().zip(&corners) {
                    let index = parse_vertex_ref(token, line_no)?;
                    if index >= vertices.len() {
                        return Err(MeshError::InvalidVertexIndex {
                            face: faces.len(),
                            vertex: index,
                        });
                    }
                    *slot = index;
                }
                faces.push(face);
            }
            _ => {}
        }
    }

    debug!(
        vertices = vertices.len(),
        faces = faces.len(),
        skipped_faces,
        "parsed OBJ records"
    );

    Ok((vertices, faces))
}

/// Zero-based vertex index of a face token (`i`, `i/t`, `i/t/n`, `i//n`).
fn parse_vertex_ref(token: &str, line_no: usize) -> Result<usize> {
    let index_str = token.split('/').next().unwrap_or(token);
    let index: usize = index_str
        .parse()
        .map_err(|_| MeshError::parse(line_no, format!("invalid vertex index '{token}'")))?;
    index
        .checked_sub(1)
        .ok_or_else(|| MeshError::parse(line_no, "vertex indices are 1-based"))
}

/// Save a mesh to an OBJ file.
///
/// Only positions and triangles are written.
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &HalfEdgeMesh<I>, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write(mesh, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write a mesh as OBJ `v`/`f` records.
pub fn write<W: Write, I: MeshIndex>(mesh: &HalfEdgeMesh<I>, writer: &mut W) -> Result<()> {
    let (vertices, faces) = to_face_vertex(mesh);

    writeln!(writer, "# curvmesh")?;
    writeln!(writer, "# {} vertices, {} faces", vertices.len(), faces.len())?;

    for p in &vertices {
        writeln!(writer, "v {} {} {}", p.x, p.y, p.z)?;
    }
    for f in &faces {
        writeln!(writer, "f {} {} {}", f[0] + 1, f[1] + 1, f[2] + 1)?;
    }
    Ok(())
}
