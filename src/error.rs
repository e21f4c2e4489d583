//! Typed failures that callers need to tell apart.
//!
//! Everything else travels as `anyhow::Error` with context. Use
//! `err.downcast_ref::<ConvertError>()` to recognise these.

use std::path::PathBuf;
use thiserror::Error;

/// Low-level CSV read failures.
#[derive(Error, Debug)]
pub enum ReadError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The file has no header line at all
    #[error("no columns to parse from file")]
    NoColumns,

    /// A data row is wider than the header
    #[error("record #{record} has {found} fields, header has {expected}")]
    TooManyFields {
        record: u64,
        found: usize,
        expected: usize,
    },
}

/// Conversion failures that are fatal for one source file.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// The source could not yield even a header
    #[error("no data found in file {}", path.display())]
    NoData {
        path: PathBuf,
        #[source]
        source: ReadError,
    },
}
