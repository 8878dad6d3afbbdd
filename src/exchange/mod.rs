//! Data exchange
//!
//! CSV export/import of the full entry set and a read-only PDF snapshot.

mod document;
mod tabular;

use thiserror::Error;

pub use document::{export_document, paginate, DOCUMENT_TITLE};
pub use tabular::{
    export_tabular, export_tabular_path, import_tabular, import_tabular_path, CSV_HEADERS,
};

#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV file has no {0:?} column")]
    MissingColumn(String),

    #[error("CSV line {line}: {message}")]
    InvalidRow { line: u64, message: String },

    #[error("PDF error: {0}")]
    Pdf(String),
}

pub type ExchangeResult<T> = Result<T, ExchangeError>;
