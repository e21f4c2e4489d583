//! The conversion pipeline: header check, partitioning and Parquet output.
//!
//! For one input file [`Converter::run`]:
//! 1. reads the header; a file without even a header is a fatal
//!    [`ConvertError::NoData`], a header with no rows is skipped;
//! 2. checks the header against the [`Schema`] once for the whole file;
//! 3. partitions either the whole file or each chunk of `chunk_size` rows;
//! 4. writes one valid/rejected Parquet pair per pass.
//!
//! [`Converter::convert_directory`] does the same for every CSV file of a
//! directory, one after another. A fatal error on one file is logged and
//! recorded in the [`BatchReport`]; the remaining files are still converted.

use crate::config::ConvertOptions;
use crate::error::{ConvertError, ReadError};
use crate::io::csv::{CsvChunks, probe_csv, read_csv_records};
use crate::io::glob::list_csv_files;
use crate::io::parquet::write_parquet_records;
use crate::naming::{ArtifactNamer, Clock, PartitionTag, SystemClock};
use crate::record::RecordSet;
use crate::schema::Schema;
use crate::validation::Partitioner;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Paths and row counts of one valid/rejected pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactPair {
    /// 1-based chunk index, `None` for whole-file runs.
    pub chunk: Option<usize>,
    pub valid: PathBuf,
    pub rejected: PathBuf,
    pub valid_rows: usize,
    pub rejected_rows: usize,
}

/// Non-fatal result of converting one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionOutcome {
    /// Artifacts were written, in chunk order.
    Converted(Vec<ArtifactPair>),
    /// Header present but no data rows; nothing written.
    NoRows,
    /// Header did not match the schema; nothing written.
    SchemaMismatch {
        found: Vec<String>,
        expected: Vec<String>,
    },
}

impl ConversionOutcome {
    /// Artifacts produced; empty unless [`ConversionOutcome::Converted`].
    #[must_use]
    pub fn artifacts(&self) -> &[ArtifactPair] {
        match self {
            Self::Converted(pairs) => pairs,
            _ => &[],
        }
    }
}

/// Drives conversions with a fixed schema, options, rule and clock.
pub struct Converter<C = SystemClock> {
    schema: Schema,
    options: ConvertOptions,
    partitioner: Partitioner,
    clock: C,
}

impl Converter<SystemClock> {
    /// Converter using the default `image` rule and the wall clock.
    #[must_use]
    pub fn new(schema: Schema, options: ConvertOptions) -> Self {
        Self {
            schema,
            options,
            partitioner: Partitioner::default(),
            clock: SystemClock,
        }
    }
}

impl<C: Clock> Converter<C> {
    /// Replace the clock used for artifact timestamps.
    pub fn with_clock<D: Clock>(self, clock: D) -> Converter<D> {
        Converter {
            schema: self.schema,
            options: self.options,
            partitioner: self.partitioner,
            clock,
        }
    }

    /// Replace the validity rule.
    #[must_use]
    pub fn with_partitioner(mut self, partitioner: Partitioner) -> Self {
        self.partitioner = partitioner;
        self
    }

    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    #[must_use]
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Convert one CSV file.
    ///
    /// # Errors
    /// - [`ConvertError::NoData`] if the file has no header at all.
    /// - Any read failure on a data row, and any failure writing an artifact
    ///   (for instance a missing output directory). Artifacts written before
    ///   the failure are left in place.
    pub fn run(&self, path: impl AsRef<Path>) -> Result<ConversionOutcome> {
        let path = path.as_ref();
        tracing::info!("Converting file {}", path.display());

        let probe = match probe_csv(path) {
            Ok(probe) => probe,
            Err(source @ ReadError::NoColumns) => {
                return Err(ConvertError::NoData {
                    path: path.to_path_buf(),
                    source,
                }
                .into());
            }
            Err(e) => {
                return Err(
                    anyhow::Error::new(e).context(format!("read header of {}", path.display()))
                );
            }
        };

        if !probe.has_rows {
            tracing::info!("File {} has no data to process", path.display());
            return Ok(ConversionOutcome::NoRows);
        }

        if !self.schema.matches(probe.columns.as_slice()) {
            tracing::warn!(
                "Header of {} is invalid: {:?}, expected {:?}",
                path.display(),
                probe.columns,
                self.schema.columns()
            );
            return Ok(ConversionOutcome::SchemaMismatch {
                found: probe.columns,
                expected: self.schema.columns().to_vec(),
            });
        }

        let namer = ArtifactNamer::for_input(&self.options.output_dir, self.clock.now(), path);
        tracing::info!(
            "Saving files in directory {}",
            self.options.output_dir.display()
        );

        let pairs = match self.options.chunk_size {
            None => {
                let records = read_csv_records(path)?;
                vec![self.write_pair(&namer, None, &records)?]
            }
            Some(rows) => {
                let mut pairs = Vec::new();
                for (i, chunk) in CsvChunks::open(path, rows)?.enumerate() {
                    let chunk = chunk?;
                    tracing::debug!("Chunk {} of {} has {} rows", i + 1, path.display(), chunk.len());
                    pairs.push(self.write_pair(&namer, Some(i + 1), &chunk)?);
                }
                pairs
            }
        };

        tracing::info!(
            "Finished {}: {} artifact pair(s)",
            path.display(),
            pairs.len()
        );
        Ok(ConversionOutcome::Converted(pairs))
    }

    fn write_pair(
        &self,
        namer: &ArtifactNamer,
        chunk: Option<usize>,
        records: &RecordSet,
    ) -> Result<ArtifactPair> {
        let split = self.partitioner.partition(records);
        let valid = namer.path(PartitionTag::Valid, chunk);
        let rejected = namer.path(PartitionTag::Rejected, chunk);
        let compression = self.options.compression;

        let valid_rows = write_parquet_records(&valid, &split.valid, compression)?;
        let rejected_rows = write_parquet_records(&rejected, &split.rejected, compression)?;
        tracing::info!(
            "2 files saved {} and {}",
            valid.display(),
            rejected.display()
        );

        Ok(ArtifactPair {
            chunk,
            valid,
            rejected,
            valid_rows,
            rejected_rows,
        })
    }

    /// Convert every `*.csv` file directly inside `dir`, in sorted order.
    ///
    /// # Errors
    /// Only if `dir` cannot be listed. Per-file failures are recorded in the
    /// returned report instead.
    pub fn convert_directory(&self, dir: impl AsRef<Path>) -> Result<BatchReport> {
        let dir = dir.as_ref();
        tracing::info!("Running conversion on directory {}", dir.display());
        let files = list_csv_files(dir)?;

        let mut report = BatchReport::default();
        for file in files {
            tracing::info!("Processing file {}", file.display());
            let entry = match self.run(&file) {
                Ok(outcome) => FileReport::from_outcome(file, outcome),
                Err(e) => {
                    tracing::error!("Failed to convert {}: {:#}", file.display(), e);
                    FileReport {
                        path: file,
                        status: FileStatus::Failed,
                        artifacts: Vec::new(),
                        error: Some(format!("{e:#}")),
                    }
                }
            };
            report.files.push(entry);
        }
        tracing::info!("{}", report);
        Ok(report)
    }
}

/// Convert one file with the default rule and the wall clock.
///
/// # Errors
/// See [`Converter::run`].
pub fn convert_csv_to_parquet(
    path: impl AsRef<Path>,
    schema: &Schema,
    options: &ConvertOptions,
) -> Result<ConversionOutcome> {
    Converter::new(schema.clone(), options.clone()).run(path)
}

/// How one file of a batch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Converted,
    NoRows,
    SchemaMismatch,
    Failed,
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Converted => "converted",
            Self::NoRows => "no rows",
            Self::SchemaMismatch => "schema mismatch",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// One file's entry in a [`BatchReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub status: FileStatus,
    pub artifacts: Vec<ArtifactPair>,
    /// Error chain for failed files.
    pub error: Option<String>,
}

impl FileReport {
    fn from_outcome(path: PathBuf, outcome: ConversionOutcome) -> Self {
        let (status, artifacts) = match outcome {
            ConversionOutcome::Converted(pairs) => (FileStatus::Converted, pairs),
            ConversionOutcome::NoRows => (FileStatus::NoRows, Vec::new()),
            ConversionOutcome::SchemaMismatch { .. } => (FileStatus::SchemaMismatch, Vec::new()),
        };
        Self {
            path,
            status,
            artifacts,
            error: None,
        }
    }
}

/// Per-file results of [`Converter::convert_directory`], in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub files: Vec<FileReport>,
}

impl BatchReport {
    fn count(&self, status: FileStatus) -> usize {
        self.files.iter().filter(|f| f.status == status).count()
    }

    #[must_use]
    pub fn converted_count(&self) -> usize {
        self.count(FileStatus::Converted)
    }

    /// Files left alone because they were empty or had the wrong header.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.count(FileStatus::NoRows) + self.count(FileStatus::SchemaMismatch)
    }

    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.count(FileStatus::Failed)
    }

    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failed_count() > 0
    }

    /// Export the report as pretty JSON.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write the JSON report to a file.
    ///
    /// # Errors
    /// Returns an error if serialization or the write fails.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = self.to_json().context("serialize batch report")?;
        std::fs::write(path, json).with_context(|| format!("write report {}", path.display()))
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BatchReport({} files: {} converted, {} skipped, {} failed)",
            self.files.len(),
            self.converted_count(),
            self.skipped_count(),
            self.failed_count()
        )
    }
}
