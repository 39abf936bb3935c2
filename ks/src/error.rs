//! Store error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during slot operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid slot name '{0}': use letters, digits, '.', '_' or '-'")]
    InvalidSlot(String),

    #[error("Slot not found: {0}")]
    NotFound(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
