//! Error type shared by the grid, the selector engine and the page tree

use crate::grid::Axis;
use thiserror::Error;

/// Errors raised by grid operations, selector compilation and imports
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    /// An integer position outside the axis
    #[error("{axis} key {key} not found")]
    KeyNotFound { axis: Axis, key: usize },

    /// A label that no position on the axis carries
    #[error("{axis} label '{label}' not found")]
    LabelNotFound { axis: Axis, label: String },

    /// A label already carried by another position on the axis
    #[error("{axis} label '{label}' already exists")]
    DuplicateLabel { axis: Axis, label: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Malformed selector text
    #[error("invalid selector: {0}")]
    InvalidSelector(String),

    /// Source missing, unreadable or not decodable
    #[error("import error: {0}")]
    ImportFormat(String),
}

impl From<std::io::Error> for GridError {
    fn from(err: std::io::Error) -> Self {
        GridError::ImportFormat(err.to_string())
    }
}

impl From<csv::Error> for GridError {
    fn from(err: csv::Error) -> Self {
        GridError::ImportFormat(err.to_string())
    }
}

impl From<serde_json::Error> for GridError {
    fn from(err: serde_json::Error) -> Self {
        GridError::ImportFormat(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GridError>;
