//! Error types for tabrecon operations

use crate::dataset::Side;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TabreconError>;

#[derive(Error, Debug)]
pub enum TabreconError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read dataset '{}': {message}", path.display())]
    DatasetRead { path: PathBuf, message: String },

    #[error("Unique identifier field '{field}' is missing in the {side} dataset")]
    MissingKeyField { field: String, side: Side },

    #[error("Unique identifier '{key}' is duplicated in the {side} dataset (rows {first_row} and {duplicate_row})")]
    DuplicateKey {
        side: Side,
        key: String,
        first_row: usize,
        duplicate_row: usize,
    },

    #[error("record #{row}: expected {expected} fields, found {found}")]
    RowTooLong {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Invalid checksum listing '{}': {message}", path.display())]
    ChecksumListing { path: PathBuf, message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },
}

impl TabreconError {
    pub fn dataset_read(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::DatasetRead {
            path: path.into(),
            message: msg.into(),
        }
    }

    pub fn missing_key_field(field: impl Into<String>, side: Side) -> Self {
        Self::MissingKeyField {
            field: field.into(),
            side,
        }
    }

    pub fn checksum_listing(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::ChecksumListing {
            path: path.into(),
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: msg.into(),
        }
    }

    /// True for failures caused by the shape of the input data rather than
    /// by I/O: the run is refused before any record is compared.
    pub fn is_precondition_failure(&self) -> bool {
        matches!(self, Self::MissingKeyField { .. } | Self::DuplicateKey { .. })
    }

    /// True for failures that get written to the validation report file
    /// instead of only being printed.
    pub fn is_reportable(&self) -> bool {
        self.is_precondition_failure() || matches!(self, Self::DatasetRead { .. })
    }
}
