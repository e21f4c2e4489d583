//! Parquet output (and read-back) for [`RecordSet`]s.
//!
//! - [`write_parquet_records`] turns a set into one Arrow `RecordBatch` and
//!   writes it with `parquet::arrow::ArrowWriter`.
//! - [`read_parquet_records`] reads a file back into a [`RecordSet`].
//!
//! Arrow column types are inferred per set: a column holding only integers
//! becomes `Int64`, integers mixed with floats become `Float64`, and anything
//! containing text (or nothing but nulls) becomes `Utf8`. Every field is
//! nullable, and NaN floats are written as null. A set with zero rows is still
//! written, with its full header.

use crate::config::ParquetCompression;
use crate::record::{RecordSet, Value};
use anyhow::{Context, Result};
use arrow::array::{
    Array, ArrayRef, Float64Array, Float64Builder, Int64Array, Int64Builder, StringArray,
    StringBuilder,
};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::arrow_writer::ArrowWriter;
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

fn infer_type<'a>(values: impl Iterator<Item = &'a Value>) -> DataType {
    let mut inferred: Option<DataType> = None;
    for v in values {
        match v {
            Value::Null => {}
            Value::Float(x) if x.is_nan() => {}
            Value::Str(_) => return DataType::Utf8,
            Value::Int(_) => {
                if inferred.is_none() {
                    inferred = Some(DataType::Int64);
                }
            }
            Value::Float(_) => inferred = Some(DataType::Float64),
        }
    }
    inferred.unwrap_or(DataType::Utf8)
}

fn build_column<'a>(data_type: &DataType, values: impl Iterator<Item = &'a Value>) -> ArrayRef {
    match data_type {
        DataType::Int64 => {
            let mut b = Int64Builder::new();
            for v in values {
                match v {
                    Value::Int(i) => b.append_value(*i),
                    _ => b.append_null(),
                }
            }
            Arc::new(b.finish())
        }
        DataType::Float64 => {
            let mut b = Float64Builder::new();
            for v in values {
                match v {
                    Value::Int(i) => b.append_value(*i as f64),
                    Value::Float(x) if !x.is_nan() => b.append_value(*x),
                    _ => b.append_null(),
                }
            }
            Arc::new(b.finish())
        }
        _ => {
            let mut b = StringBuilder::new();
            for v in values {
                match v {
                    v if v.is_null() => b.append_null(),
                    other => b.append_value(other.to_string()),
                }
            }
            Arc::new(b.finish())
        }
    }
}

/// Convert a [`RecordSet`] into a single Arrow batch, keeping column order.
///
/// # Errors
/// Returns an error if Arrow rejects the assembled columns.
pub fn to_record_batch(records: &RecordSet) -> Result<RecordBatch> {
    let mut fields = Vec::with_capacity(records.columns().len());
    let mut arrays = Vec::with_capacity(records.columns().len());
    for (idx, name) in records.columns().iter().enumerate() {
        let data_type = infer_type(records.rows().iter().map(|r| &r[idx]));
        arrays.push(build_column(&data_type, records.rows().iter().map(|r| &r[idx])));
        fields.push(Field::new(name, data_type, true));
    }
    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)
        .context("assemble RecordBatch from records")
}

/// Write a [`RecordSet`] to a Parquet file.
///
/// The parent directory must already exist.
///
/// # Returns
/// Number of rows written.
///
/// # Errors
/// An error is returned if the batch cannot be built or the file cannot be
/// created or written.
pub fn write_parquet_records(
    path: impl AsRef<Path>,
    records: &RecordSet,
    compression: ParquetCompression,
) -> Result<usize> {
    let path = path.as_ref();
    let batch = to_record_batch(records)?;

    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let props = WriterProperties::builder()
        .set_compression(compression.to_parquet())
        .build();
    let mut writer =
        ArrowWriter::try_new(file, batch.schema(), Some(props)).context("create ArrowWriter")?;

    writer
        .write(&batch)
        .with_context(|| format!("write batch to {}", path.display()))?;
    writer.close().context("close ArrowWriter")?;

    Ok(records.len())
}

fn column_values(col: &ArrayRef) -> Result<Vec<Value>> {
    match col.data_type() {
        DataType::Int64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int64Array>()
                .context("downcast Int64 column")?;
            Ok(arr.iter().map(Value::from).collect())
        }
        DataType::Float64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float64Array>()
                .context("downcast Float64 column")?;
            Ok(arr
                .iter()
                .map(|x| Value::from(x.filter(|x| !x.is_nan())))
                .collect())
        }
        other => {
            let text = cast(col, &DataType::Utf8)
                .with_context(|| format!("cast {other} column to Utf8"))?;
            let arr = text
                .as_any()
                .downcast_ref::<StringArray>()
                .context("downcast Utf8 column")?;
            Ok(arr.iter().map(Value::from).collect())
        }
    }
}

/// Read a Parquet file into a [`RecordSet`].
///
/// `Int64` and `Float64` columns map to numbers; every other type is cast to
/// text.
///
/// # Errors
/// Returns an error if the file cannot be opened or decoded.
pub fn read_parquet_records(path: impl AsRef<Path>) -> Result<RecordSet> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;

    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("open ParquetRecordBatchReader")?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("build ParquetRecordBatchReader")?;

    let mut out = RecordSet::new(columns);
    for batch in reader {
        let batch = batch.context("read next batch")?;
        let cols = batch
            .columns()
            .iter()
            .map(column_values)
            .collect::<Result<Vec<_>>>()?;
        for row in 0..batch.num_rows() {
            out.push(cols.iter().map(|c| c[row].clone()).collect());
        }
    }
    Ok(out)
}
