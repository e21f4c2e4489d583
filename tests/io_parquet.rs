use anyhow::Result;
use data_prepare::{ParquetCompression, RecordSet, Value, read_parquet_records, write_parquet_records};

fn sample() -> RecordSet {
    RecordSet::from_rows(
        vec!["id".into(), "name".into(), "score".into()],
        vec![
            vec![Value::Int(1), Value::from("a"), Value::Float(1.5)],
            vec![Value::Int(2), Value::Null, Value::Null],
            vec![Value::Null, Value::from("c"), Value::Float(-0.25)],
        ],
    )
}

#[test]
fn parquet_roundtrip_records() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("rows.parquet");
    let data = sample();

    let n = write_parquet_records(&path, &data, ParquetCompression::default())?;
    assert_eq!(n, 3);

    let back = read_parquet_records(&path)?;
    assert_eq!(back, data);
    Ok(())
}

#[test]
fn parquet_roundtrip_every_codec() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let data = sample();
    for codec in [
        ParquetCompression::Snappy,
        ParquetCompression::Zstd,
        ParquetCompression::Gzip,
        ParquetCompression::Uncompressed,
    ] {
        let path = tmp.path().join(format!("rows_{codec}.parquet"));
        write_parquet_records(&path, &data, codec)?;
        assert_eq!(read_parquet_records(&path)?, data, "codec {codec}");
    }
    Ok(())
}

#[test]
fn parquet_empty_set_keeps_header() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("empty.parquet");
    let data = RecordSet::new(vec!["brand".into(), "image".into()]);

    assert_eq!(write_parquet_records(&path, &data, ParquetCompression::default())?, 0);
    let back = read_parquet_records(&path)?;
    assert!(back.is_empty());
    assert_eq!(back.columns(), &["brand", "image"]);
    Ok(())
}

#[test]
fn parquet_mixed_column_reads_back_as_text() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("mixed.parquet");
    let data = RecordSet::from_rows(
        vec!["v".into()],
        vec![vec![Value::Int(7)], vec![Value::from("seven")]],
    );
    write_parquet_records(&path, &data, ParquetCompression::default())?;
    let back = read_parquet_records(&path)?;
    assert_eq!(
        back.column_values("v"),
        Some(vec![&Value::from("7"), &Value::from("seven")])
    );
    Ok(())
}

#[test]
fn parquet_write_into_missing_directory_fails() {
    let path = std::path::Path::new("/definitely/not/here/out.parquet");
    assert!(write_parquet_records(path, &sample(), ParquetCompression::default()).is_err());
}
