//! Error types for the skinweights library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for skin-weight operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Mesh reference did not resolve to a mesh
    #[error("No mesh found for reference: {0}")]
    NoActiveMesh(String),

    /// Reading a file failed
    #[error("Cannot read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Writing a file failed
    #[error("Cannot write {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Weights document is structurally invalid
    #[error("Malformed weights document: {0}")]
    MalformedDocument(String),

    /// UV mode requested but UV data is absent
    #[error("UV matching unavailable: {0}")]
    MissingUv(String),

    /// Mesh data is inconsistent (bad indices, mismatched lengths)
    #[error("Invalid mesh data: {0}")]
    InvalidMesh(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a malformed-document error from a string.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedDocument(msg.into())
    }

    /// Create an invalid-mesh error from a string.
    pub fn invalid_mesh(msg: impl Into<String>) -> Self {
        Self::InvalidMesh(msg.into())
    }

    /// Create a missing-UV error from a string.
    pub fn missing_uv(msg: impl Into<String>) -> Self {
        Self::MissingUv(msg.into())
    }
}

/// Result type alias for skin-weight operations.
pub type Result<T> = std::result::Result<T, Error>;
