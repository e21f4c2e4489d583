//! Conversion options.

use clap::ValueEnum;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use std::fmt;
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Codec used for Parquet artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ParquetCompression {
    #[default]
    Snappy,
    Zstd,
    Gzip,
    Uncompressed,
}

impl ParquetCompression {
    #[must_use]
    pub fn to_parquet(self) -> Compression {
        match self {
            Self::Snappy => Compression::SNAPPY,
            Self::Zstd => Compression::ZSTD(ZstdLevel::default()),
            Self::Gzip => Compression::GZIP(GzipLevel::default()),
            Self::Uncompressed => Compression::UNCOMPRESSED,
        }
    }
}

impl fmt::Display for ParquetCompression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Snappy => "snappy",
            Self::Zstd => "zstd",
            Self::Gzip => "gzip",
            Self::Uncompressed => "uncompressed",
        };
        f.write_str(s)
    }
}

/// Options for one conversion.
///
/// The default reads the whole file at once, writes into the current
/// directory and compresses with Snappy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Rows per chunk; `None` loads the whole file.
    pub chunk_size: Option<NonZeroUsize>,
    /// Directory receiving the artifacts. Must already exist.
    pub output_dir: PathBuf,
    pub compression: ParquetCompression,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            chunk_size: None,
            output_dir: PathBuf::from("."),
            compression: ParquetCompression::default(),
        }
    }
}

impl ConvertOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_chunk_size(mut self, rows: NonZeroUsize) -> Self {
        self.chunk_size = Some(rows);
        self
    }

    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_compression(mut self, compression: ParquetCompression) -> Self {
        self.compression = compression;
        self
    }
}
