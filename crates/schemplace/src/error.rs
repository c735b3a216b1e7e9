//! Error types for schematic placement.
//!
//! [`LayoutError`] rejects scenes the pipeline cannot place. [`SchemplaceError`]
//! wraps it for the surrounding API, next to I/O, scene format and
//! configuration failures.

use std::io;

use thiserror::Error;

use schemplace_core::identifier::Id;

/// Reasons a scene is rejected before any placement happens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("scene has no boxes to lay out")]
    EmptyScene,

    #[error("central box `{box_id}` has no ports")]
    DegenerateCentralBox { box_id: Id },

    #[error("connection #{index}: endpoint `{endpoint}` is neither a port nor a declared net")]
    MalformedConnection { index: usize, endpoint: Id },

    #[error("box id `{box_id}` is used by more than one box")]
    DuplicateBoxId { box_id: Id },

    #[error("port id `{port_id}` is used by more than one port")]
    DuplicatePortId { port_id: Id },
}

impl LayoutError {
    /// Short machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            LayoutError::EmptyScene => "empty_scene",
            LayoutError::DegenerateCentralBox { .. } => "degenerate_central_box",
            LayoutError::MalformedConnection { .. } => "malformed_connection",
            LayoutError::DuplicateBoxId { .. } => "duplicate_box_id",
            LayoutError::DuplicatePortId { .. } => "duplicate_port_id",
        }
    }
}

/// The main error type for schemplace operations.
///
/// `Parse` keeps the scene text it failed on, so callers can point at the
/// offending line and column.
#[derive(Debug, Error)]
pub enum SchemplaceError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Scene format error: {err}")]
    Parse { err: serde_json::Error, src: String },

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),
}

impl SchemplaceError {
    /// Create a new `Parse` error with the associated scene text.
    pub fn new_parse_error(err: serde_json::Error, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
