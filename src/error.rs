//! Error types for msii.
//!
//! This module defines all error types used throughout the library.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`MsiiError`].
pub type Result<T> = std::result::Result<T, MsiiError>;

/// Errors that can occur while building meshes or evaluating descriptors.
#[derive(Error, Debug)]
pub enum MsiiError {
    /// The mesh has no faces.
    #[error("mesh has no faces")]
    EmptyMesh,

    /// A face references an invalid vertex index.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A face has duplicate vertex indices (degenerate triangle).
    #[error("face {face} is degenerate (has duplicate vertices)")]
    DegenerateFace {
        /// The face index.
        face: usize,
    },

    /// A triangle entered by the intersection curve has no crossing to leave
    /// through. Raised by graph construction on topology the sphere walk
    /// cannot follow (typically non-manifold input).
    #[error("impossible triangle intersection at triangle {triangle} (entering on edge {edge_index})")]
    ImpossibleIntersection {
        /// The triangle index.
        triangle: usize,
        /// Local index (0..3) of the edge the curve enters through.
        edge_index: usize,
    },

    /// A per-vertex value list does not match the mesh.
    #[error("expected {expected} values, got {actual}")]
    LengthMismatch {
        /// Number of values the mesh requires.
        expected: usize,
        /// Number of values supplied.
        actual: usize,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error loading mesh from file.
    #[error("failed to load mesh from {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Error saving results to file.
    #[error("failed to save {path}: {message}")]
    SaveError {
        /// The file path.
        path: PathBuf,
        /// Error message.
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

impl MsiiError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MsiiError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Whether this error is the per-query construction failure that a batch
    /// run isolates instead of aborting on.
    pub fn is_intersection_failure(&self) -> bool {
        matches!(self, MsiiError::ImpossibleIntersection { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_param_message() {
        let err = MsiiError::invalid_param("radius", -1.0, "must be positive");
        assert_eq!(
            err.to_string(),
            "invalid parameter: radius = -1 (must be positive)"
        );
        assert!(!err.is_intersection_failure());
    }

    #[test]
    fn test_intersection_failure_kind() {
        let err = MsiiError::ImpossibleIntersection {
            triangle: 7,
            edge_index: 2,
        };
        assert!(err.is_intersection_failure());
        assert!(err.to_string().contains("triangle 7"));
    }
}
