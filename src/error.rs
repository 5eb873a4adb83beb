//! Error types shared across the scheduler, storage and export layers.

use thiserror::Error;

/// Errors raised by the scheduling core.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReviewError {
    /// A grade or quality value outside the enumerated set reached the mapper.
    #[error("invalid quality: {0}")]
    InvalidQuality(String),
    /// No record qualified for the requested session. Nothing to study now.
    #[error("no cards available for this session")]
    NoCardsAvailable,
}

/// Errors raised by the SQLite record store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("no record for term '{term}' (user '{user}')")]
    NotFound { user: String, term: String },
    #[error("invalid stored date: {0}")]
    InvalidDate(String),
}

/// Errors raised while importing or exporting records as JSON.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
