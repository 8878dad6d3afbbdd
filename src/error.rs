//! Error types for healthlog.

use std::io;

use crate::db::DbError;
use crate::exchange::ExchangeError;
use crate::health::FormError;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Database error: {0}")]
    Db(#[from] DbError),

    #[error(transparent)]
    Exchange(#[from] ExchangeError),

    /// The form was rejected; nothing was stored
    #[error("Please enter valid values: {0}")]
    Validation(#[from] FormError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Chart error: {0}")]
    Chart(String),
}

impl From<rusqlite::Error> for Error {
    fn from(e: rusqlite::Error) -> Self {
        Error::Db(DbError::Sqlite(e))
    }
}
