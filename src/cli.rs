//! Command-line surface of the `data-prepare` binary.

use crate::config::{ConvertOptions, ParquetCompression};
use crate::io::glob::is_csv_path;
use crate::schema::Schema;
use anyhow::Result;
use clap::{Args, Parser};
use std::num::NonZeroUsize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "data-prepare")]
#[command(about = "Convert CSV files to Parquet, splitting valid and rejected rows", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub input: Input,

    /// Rows per chunk; the whole file is loaded at once when omitted
    #[arg(short, long)]
    pub chunksize: Option<NonZeroUsize>,

    /// File holding the expected comma-separated column list
    #[arg(short, long)]
    pub schema: Option<PathBuf>,

    /// Directory receiving the Parquet files
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Parquet compression codec
    #[arg(long, value_enum, default_value_t = ParquetCompression::Snappy)]
    pub compression: ParquetCompression,

    /// Write a JSON batch report to this path (directory mode)
    #[arg(long)]
    pub report: Option<PathBuf>,
}

/// Exactly one of `--file` or `--directory`.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct Input {
    /// CSV file to convert
    #[arg(short, long, value_parser = parse_csv_file)]
    pub file: Option<PathBuf>,

    /// Directory of CSV files to convert
    #[arg(short = 'D', long, value_parser = parse_directory)]
    pub directory: Option<PathBuf>,
}

fn parse_csv_file(s: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);
    if is_csv_path(&path) {
        Ok(path)
    } else {
        Err("file format is not supported by the application yet".to_string())
    }
}

fn parse_directory(s: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);
    if path.is_dir() {
        Ok(path)
    } else {
        Err("not a directory".to_string())
    }
}

impl Cli {
    /// Schema from `--schema`, or the default product columns.
    ///
    /// # Errors
    /// Returns an error if the schema file cannot be read or is empty.
    pub fn load_schema(&self) -> Result<Schema> {
        match &self.schema {
            Some(path) => Schema::from_file(path),
            None => Ok(Schema::default()),
        }
    }

    #[must_use]
    pub fn convert_options(&self) -> ConvertOptions {
        ConvertOptions {
            chunk_size: self.chunksize,
            output_dir: self.output.clone(),
            compression: self.compression,
        }
    }
}
