//! Request-level error type.
//!
//! Builders never fail: dangling references are dropped and unknown shape
//! kinds fall back to a rectangle. Everything here is raised by request
//! parsing or by persisting the document.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiagramError {
    #[error("Unknown diagram type '{0}' (expected flowchart, sequence, erd, network or custom)")]
    UnknownDiagramType(String),

    #[error("Missing required field '{0}'")]
    MissingField(&'static str),

    #[error("Invalid {kind} data: {source}")]
    InvalidData {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid filename '{0}': must be a relative path inside the output directory")]
    InvalidFilename(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to persist diagram: {0}")]
    Persist(#[from] tempfile::PersistError),
}

impl DiagramError {
    pub fn invalid_data(kind: &'static str, source: serde_json::Error) -> Self {
        Self::InvalidData { kind, source }
    }
}
