//! Error types for curvmesh.
//!
//! Ingestion either produces a complete, linked mesh or one of these errors;
//! there is no partially built state. Degenerate geometry is not an error (see
//! [`crate::geometry`] for how it is clamped).

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur while building or loading a mesh.
#[derive(Error, Debug)]
pub enum MeshError {
    /// The input has no faces.
    #[error("mesh has no faces")]
    EmptyMesh,

    /// A face references a vertex that was never declared.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index (zero-based, in input order).
        face: usize,
        /// The offending vertex index (zero-based).
        vertex: usize,
    },

    /// A face repeats a vertex index.
    #[error("face {face} is degenerate (has duplicate vertices)")]
    DegenerateFace {
        /// The face index.
        face: usize,
    },

    /// An edge is used by more faces than a 2-manifold allows, or twice in the
    /// same direction.
    #[error("edge ({v0}, {v1}) has more than two incident faces")]
    NonManifoldEdge {
        /// First vertex of the edge.
        v0: usize,
        /// Second vertex of the edge.
        v1: usize,
    },

    /// The mesh has more elements than the chosen index type can address.
    #[error("mesh needs {count} {what}, index type holds at most {max}")]
    IndexOverflow {
        /// Which element kind overflowed.
        what: &'static str,
        /// Required count.
        count: usize,
        /// Capacity of the index type.
        max: usize,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file could not be opened or read.
    #[error("failed to load mesh from {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// A recognised record had malformed fields.
    #[error("line {line}: {message}")]
    Parse {
        /// One-based line number.
        line: usize,
        /// What was wrong.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Create a parse error for a one-based line number.
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        MeshError::Parse {
            line,
            message: message.into(),
        }
    }

    /// Whether this error came from reading the source rather than from its
    /// contents.
    pub fn is_io(&self) -> bool {
        matches!(self, MeshError::Io(_) | MeshError::LoadError { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let e = MeshError::InvalidVertexIndex { face: 2, vertex: 998 };
        assert_eq!(e.to_string(), "face 2 references invalid vertex index 998");

        let e = MeshError::invalid_param("extremum_threshold", -1.0, "must be non-negative");
        assert_eq!(
            e.to_string(),
            "invalid parameter: extremum_threshold = -1 (must be non-negative)"
        );
    }

    #[test]
    fn test_is_io() {
        let io = MeshError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(io.is_io());
        assert!(!MeshError::EmptyMesh.is_io());
        assert!(!MeshError::parse(3, "bad").is_io());
    }
}
