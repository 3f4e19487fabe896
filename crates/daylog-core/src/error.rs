//! Error types for daylog-core

use thiserror::Error;

/// Main error type for daylog-core
#[derive(Error, Debug)]
pub enum Error {
    /// Bad or missing request input
    #[error("{0}")]
    Validation(String),

    /// No record for the requested date
    #[error("{0}")]
    NotFound(String),

    /// Missing credential, unroutable destination or unreadable config
    #[error("{0}")]
    Config(String),

    /// Outbound transport failure
    #[error("{0}")]
    Dispatch(String),

    #[error("Database error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("Database unavailable: {0}")]
    StoreUnavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Validation(_) => 400,
            Error::NotFound(_) => 404,
            _ => 500,
        }
    }
}

/// Result type alias for daylog-core
pub type Result<T> = std::result::Result<T, Error>;
