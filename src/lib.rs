//! # data-prepare
//!
//! Converts delimited product exports into **Parquet**, splitting every file
//! into a *valid* and a *rejected* artifact according to a row rule.
//!
//! ## Quick Start
//!
//! ```no_run
//! use data_prepare::*;
//! # use anyhow::Result;
//!
//! # fn main() -> Result<()> {
//! let converter = Converter::new(Schema::default(), ConvertOptions::default());
//! match converter.run("products.csv")? {
//!     ConversionOutcome::Converted(pairs) => {
//!         for pair in pairs {
//!             println!("{} / {}", pair.valid.display(), pair.rejected.display());
//!         }
//!     }
//!     ConversionOutcome::NoRows => println!("nothing to convert"),
//!     ConversionOutcome::SchemaMismatch { found, .. } => println!("bad header {found:?}"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Pipeline
//!
//! 1. **Schema check** - [`verify_schema`] compares the file header with the
//!    expected columns (same size, same names, any order). It runs once per
//!    file.
//! 2. **Partitioning** - a [`Partitioner`] applies a [`RowRule`] to every
//!    record. The default rule, [`RequiredField`] on `image`, rejects rows
//!    whose image is missing, null or an empty string.
//! 3. **Writing** - each pass writes `<timestamp>_<stem>_valid[_<n>].parquet`
//!    and `<timestamp>_<stem>_rejected[_<n>].parquet`.
//!
//! With [`ConvertOptions::chunk_size`] set, the file is streamed in chunks of
//! that many rows and only one chunk is held in memory at a time.
//!
//! ## Outcomes and errors
//!
//! Expected situations are values of [`ConversionOutcome`]: an empty file
//! (header only) or a header mismatch write nothing and are not errors. A
//! file without even a header fails with [`ConvertError::NoData`], which
//! wraps the underlying [`ReadError`].
//!
//! ## Module Overview
//!
//! - [`record`] - `Value`, `Record` and `RecordSet`
//! - [`schema`] - expected columns and the header check
//! - [`validation`] - row rules and the partitioner
//! - [`naming`] - clock and artifact names
//! - [`io`] - CSV input, Parquet output, directory listing
//! - [`converter`] - the pipeline driver and directory batches
//! - [`config`] - conversion options
//! - [`cli`] - command-line surface of the binary
//! - [`testing`] - fixtures for tests

pub mod cli;
pub mod config;
pub mod converter;
pub mod error;
pub mod io;
pub mod naming;
pub mod record;
pub mod schema;
pub mod testing;
pub mod validation;

pub use config::{ConvertOptions, ParquetCompression};
pub use converter::{
    ArtifactPair, BatchReport, ConversionOutcome, Converter, FileReport, FileStatus,
    convert_csv_to_parquet,
};
pub use error::{ConvertError, ReadError};
pub use io::csv::{CsvChunks, CsvProbe, probe_csv, read_csv_records};
pub use io::glob::list_csv_files;
pub use io::parquet::{read_parquet_records, write_parquet_records};
pub use naming::{ArtifactNamer, Clock, FixedClock, PartitionTag, SystemClock};
pub use record::{Record, RecordSet, Value};
pub use schema::{Schema, verify_schema};
pub use validation::{Partitioned, Partitioner, RequiredField, RowRule, RuleSet};
