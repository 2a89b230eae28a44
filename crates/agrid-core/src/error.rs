//! Error types for agrid core.

use agrid_engine::engine::FilterType;
use thiserror::Error;

/// Errors that can occur while driving a grid engine
#[derive(Error, Debug)]
pub enum GridError {
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Duplicate column id: {0}")]
    DuplicateColumn(String),

    #[error("Filter does not fit column {column} ({filter_type:?} filter)")]
    FilterMismatch {
        column: String,
        filter_type: FilterType,
    },

    #[error("Row {index} out of range (rows: {len})")]
    RowOutOfRange { index: usize, len: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Schema error: {0}")]
    Schema(String),
}

pub type Result<T> = std::result::Result<T, GridError>;
