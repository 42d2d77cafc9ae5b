//! Error types for lamina.
//!
//! This module defines all error types used throughout the library.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur during mesh operations.
#[derive(Error, Debug)]
pub enum MeshError {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error loading a mesh or material file.
    #[error("failed to load {path} (line {line}): {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// The line number the error was detected on (1-based).
        line: usize,
        /// Error message.
        message: String,
    },

    /// Error saving a mesh to file.
    #[error("failed to save mesh to {path}: {message}")]
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

    /// A non-triangular face was passed to an operation that requires a
    /// pure triangle mesh.
    #[error("face {face} is not a triangle")]
    NotTriangular {
        /// The offending face index.
        face: usize,
    },

    /// A vertex index outside `[0, count)` was passed by the caller.
    #[error("vertex index {vertex} out of range (mesh has {count} vertices)")]
    VertexOutOfRange {
        /// The invalid vertex index.
        vertex: usize,
        /// The number of vertices in the mesh.
        count: usize,
    },
}

impl MeshError {
    /// Create a load error for the given path and line.
    pub fn load<P: Into<PathBuf>, S: Into<String>>(path: P, line: usize, message: S) -> Self {
        MeshError::LoadError {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    /// Create a save error for the given path.
    pub fn save<P: Into<PathBuf>, S: Into<String>>(path: P, message: S) -> Self {
        MeshError::SaveError {
            path: path.into(),
            message: message.into(),
        }
    }
}
