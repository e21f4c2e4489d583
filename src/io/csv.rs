//! CSV input.
//!
//! This module provides:
//! - **Header probe**: [`probe_csv`] reads the header and peeks at the first row
//! - **Whole-file read**: [`read_csv_records`] loads every row into one [`RecordSet`]
//! - **Chunked read**: [`CsvChunks`] yields sequential fixed-size [`RecordSet`]s
//!   from a single open reader, so only one chunk is in memory at a time
//!
//! # Design notes
//! - The first line is always a header.
//! - NA markers become null cell by cell ([`Value::from_cell`]); numbers are
//!   typed per column once the set or chunk is complete
//!   ([`RecordSet::infer_types`]), so text columns keep their exact strings.
//! - Rows shorter than the header are padded with nulls; longer rows are an
//!   error naming the 1-based record number (header excluded).

use crate::error::ReadError;
use crate::record::{RecordSet, Value};
use anyhow::{Context, Result};
use csv::{Reader, ReaderBuilder, StringRecord};
use std::fs::File;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// What [`probe_csv`] learned about a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvProbe {
    /// Header columns, in file order.
    pub columns: Vec<String>,
    /// Whether at least one data row follows the header.
    pub has_rows: bool,
}

fn open_reader(path: &Path) -> Result<(Reader<File>, Vec<String>), ReadError> {
    let file = File::open(path)?;
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);
    let columns: Vec<String> = rdr.headers()?.iter().map(ToString::to_string).collect();
    if columns.is_empty() {
        return Err(ReadError::NoColumns);
    }
    Ok((rdr, columns))
}

fn row_values(record: &StringRecord, width: usize, number: u64) -> Result<Vec<Value>, ReadError> {
    if record.len() > width {
        return Err(ReadError::TooManyFields {
            record: number,
            found: record.len(),
            expected: width,
        });
    }
    Ok(record.iter().map(Value::from_cell).collect())
}

/// Read the header and check whether any data row follows.
///
/// # Errors
/// [`ReadError::NoColumns`] when the file is completely empty; I/O and CSV
/// errors otherwise.
pub fn probe_csv(path: impl AsRef<Path>) -> Result<CsvProbe, ReadError> {
    let (mut rdr, columns) = open_reader(path.as_ref())?;
    let mut first = StringRecord::new();
    let has_rows = rdr.read_record(&mut first)?;
    Ok(CsvProbe { columns, has_rows })
}

/// Load a whole CSV file into one [`RecordSet`].
///
/// # Errors
/// Returns an error if the file cannot be opened, has no header, or any row
/// fails to parse.
pub fn read_csv_records(path: impl AsRef<Path>) -> Result<RecordSet> {
    let path = path.as_ref();
    let (mut rdr, columns) = open_reader(path).with_context(|| format!("open {}", path.display()))?;
    let width = columns.len();
    let mut out = RecordSet::new(columns);
    for (i, rec) in rdr.records().enumerate() {
        let number = i as u64 + 1;
        let rec = rec
            .map_err(ReadError::from)
            .with_context(|| format!("parse CSV record #{number} in {}", path.display()))?;
        let row = row_values(&rec, width, number)
            .with_context(|| format!("parse CSV record #{number} in {}", path.display()))?;
        out.push(row);
    }
    out.infer_types();
    Ok(out)
}

/// Sequential fixed-size chunks of a CSV file.
///
/// Every chunk holds exactly `rows_per_chunk` rows except possibly the last.
/// A file with a header and no rows yields nothing. After an error the
/// iterator is exhausted.
pub struct CsvChunks {
    path: PathBuf,
    reader: Reader<File>,
    columns: Vec<String>,
    rows_per_chunk: usize,
    record: StringRecord,
    rows_read: u64,
    done: bool,
}

impl CsvChunks {
    /// Open `path` for chunked reading.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or has no header.
    pub fn open(path: impl AsRef<Path>, rows_per_chunk: NonZeroUsize) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let (reader, columns) =
            open_reader(&path).with_context(|| format!("open {}", path.display()))?;
        Ok(Self {
            path,
            reader,
            columns,
            rows_per_chunk: rows_per_chunk.get(),
            record: StringRecord::new(),
            rows_read: 0,
            done: false,
        })
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    fn fail(&mut self, err: ReadError) -> Option<Result<RecordSet>> {
        self.done = true;
        let number = self.rows_read;
        let path = self.path.display();
        Some(Err(anyhow::Error::new(err)
            .context(format!("parse CSV record #{number} in {path}"))))
    }
}

impl Iterator for CsvChunks {
    type Item = Result<RecordSet>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut chunk = RecordSet::new(self.columns.clone());
        while chunk.len() < self.rows_per_chunk {
            match self.reader.read_record(&mut self.record) {
                Ok(true) => {
                    self.rows_read += 1;
                    match row_values(&self.record, self.columns.len(), self.rows_read) {
                        Ok(row) => chunk.push(row),
                        Err(e) => return self.fail(e),
                    }
                }
                Ok(false) => {
                    self.done = true;
                    break;
                }
                Err(e) => {
                    self.rows_read += 1;
                    return self.fail(e.into());
                }
            }
        }
        if chunk.is_empty() {
            return None;
        }
        chunk.infer_types();
        Some(Ok(chunk))
    }
}
