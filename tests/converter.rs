//! End-to-end tests of the conversion pipeline.

use anyhow::Result;
use data_prepare::testing::*;
use data_prepare::*;
use std::error::Error as _;
use std::num::NonZeroUsize;
use std::path::Path;

fn converter(out: &Path, chunk: Option<usize>) -> Converter<FixedClock> {
    let mut options = ConvertOptions::new().with_output_dir(out);
    if let Some(rows) = chunk.and_then(NonZeroUsize::new) {
        options = options.with_chunk_size(rows);
    }
    Converter::new(Schema::default(), options).with_clock(fixed_clock())
}

fn brands(set: &RecordSet) -> Vec<String> {
    set.records()
        .filter_map(|r| r.get("brand").map(ToString::to_string))
        .collect()
}

#[test]
fn splits_valid_and_rejected_rows() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let input = write_products_csv(tmp.path(), "products.csv", &sample_product_rows())?;
    let out = tmp.path().join("out");
    std::fs::create_dir(&out)?;

    let outcome = converter(&out, None).run(&input)?;
    let pairs = outcome.artifacts();
    assert_eq!(pairs.len(), 1);
    let pair = &pairs[0];
    assert_eq!(pair.chunk, None);
    assert_eq!(pair.valid, out.join("20210307_09_05_02_products_valid.parquet"));
    assert_eq!(
        pair.rejected,
        out.join("20210307_09_05_02_products_rejected.parquet")
    );
    assert_eq!((pair.valid_rows, pair.rejected_rows), (1, 1));

    let valid = read_parquet_records(&pair.valid)?;
    let rejected = read_parquet_records(&pair.rejected)?;
    assert_eq!(brands(&valid), vec!["acme"]);
    assert_eq!(brands(&rejected), vec!["globex"]);
    assert_eq!(valid.columns(), product_columns().as_slice());
    assert_eq!(rejected.columns(), product_columns().as_slice());
    assert_eq!(
        valid.records().next().and_then(|r| r.get("year_release").cloned()),
        Some(Value::Int(2019))
    );
    assert_eq!(
        rejected.records().next().and_then(|r| r.get("image").cloned()),
        Some(Value::Null)
    );
    Ok(())
}

#[test]
fn quoted_empty_image_is_rejected() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let rows = vec![
        product_row("acme", Some("a.png")),
        product_row("globex", Some("\"\"")),
        product_row("initech", Some(" ")),
    ];
    let input = write_products_csv(tmp.path(), "products.csv", &rows)?;

    let outcome = converter(tmp.path(), None).run(&input)?;
    let pair = &outcome.artifacts()[0];
    assert_eq!(brands(&read_parquet_records(&pair.valid)?), vec!["acme", "initech"]);
    assert_eq!(brands(&read_parquet_records(&pair.rejected)?), vec!["globex"]);
    Ok(())
}

#[test]
fn columns_in_other_order_are_accepted() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let header = "year_release,image,description,currency,comment,category_id,brand";
    let rows = vec!["2020,x.png,d,EUR,c,1,acme".to_string()];
    let input = write_csv_fixture(tmp.path(), "reordered.csv", header, &rows)?;

    let outcome = converter(tmp.path(), None).run(&input)?;
    let pair = &outcome.artifacts()[0];
    let valid = read_parquet_records(&pair.valid)?;
    assert_eq!(valid.columns()[0], "year_release");
    assert_eq!(valid.len(), 1);
    Ok(())
}

#[test]
fn schema_mismatch_writes_nothing() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let header = "brand,category_id,comment,currency,description,image";
    let rows = vec!["acme,1,c,EUR,d,x.png".to_string()];
    let input = write_csv_fixture(tmp.path(), "wrong.csv", header, &rows)?;
    let out = tmp.path().join("out");
    std::fs::create_dir(&out)?;

    let outcome = converter(&out, None).run(&input)?;
    match outcome {
        ConversionOutcome::SchemaMismatch { found, expected } => {
            assert_eq!(found.len(), 6);
            assert_eq!(expected, product_columns());
        }
        other => panic!("expected schema mismatch, got {other:?}"),
    }
    assert_eq!(std::fs::read_dir(&out)?.count(), 0);
    Ok(())
}

#[test]
fn header_only_file_writes_nothing() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let input = write_products_csv(tmp.path(), "empty.csv", &[])?;
    let out = tmp.path().join("out");
    std::fs::create_dir(&out)?;

    assert_eq!(converter(&out, None).run(&input)?, ConversionOutcome::NoRows);
    assert_eq!(converter(&out, Some(10)).run(&input)?, ConversionOutcome::NoRows);
    assert_eq!(std::fs::read_dir(&out)?.count(), 0);
    Ok(())
}

#[test]
fn file_without_header_is_no_data_error() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let input = tmp.path().join("empty_example.csv");
    std::fs::write(&input, "")?;

    let err = converter(tmp.path(), None)
        .run(&input)
        .expect_err("empty source must fail");
    let convert = err
        .downcast_ref::<ConvertError>()
        .expect("typed conversion error");
    assert!(matches!(convert, ConvertError::NoData { path, .. } if path == &input));
    let cause = convert.source().and_then(|s| s.downcast_ref::<ReadError>());
    assert!(matches!(cause, Some(ReadError::NoColumns)));
    Ok(())
}

#[test]
fn chunk_of_one_writes_a_pair_per_row() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let rows = vec![
        product_row("acme", Some("a.png")),
        product_row("globex", Some("g.png")),
    ];
    let input = write_products_csv(tmp.path(), "products.csv", &rows)?;

    let outcome = converter(tmp.path(), Some(1)).run(&input)?;
    let pairs = outcome.artifacts();
    assert_eq!(pairs.len(), 2);
    for (i, pair) in pairs.iter().enumerate() {
        let idx = i + 1;
        assert_eq!(pair.chunk, Some(idx));
        assert_eq!(
            pair.valid,
            tmp.path()
                .join(format!("20210307_09_05_02_products_valid_{idx}.parquet"))
        );
        assert_eq!(
            pair.rejected,
            tmp.path()
                .join(format!("20210307_09_05_02_products_rejected_{idx}.parquet"))
        );
        assert_eq!(read_parquet_records(&pair.valid)?.len(), 1);
        let rejected = read_parquet_records(&pair.rejected)?;
        assert!(rejected.is_empty());
        assert_eq!(rejected.columns(), product_columns().as_slice());
    }
    assert!(
        !tmp.path()
            .join("20210307_09_05_02_products_valid.parquet")
            .exists()
    );
    Ok(())
}

#[test]
fn chunks_cover_every_row_in_order() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let rows: Vec<String> = (0..5)
        .map(|i| {
            let image = format!("{i}.png");
            product_row(&format!("b{i}"), (i % 2 == 0).then_some(image.as_str()))
        })
        .collect();
    let input = write_products_csv(tmp.path(), "products.csv", &rows)?;

    let outcome = converter(tmp.path(), Some(2)).run(&input)?;
    let pairs = outcome.artifacts();
    let sizes: Vec<usize> = pairs.iter().map(|p| p.valid_rows + p.rejected_rows).collect();
    assert_eq!(sizes, vec![2, 2, 1]);

    let mut valid = Vec::new();
    let mut rejected = Vec::new();
    for pair in pairs {
        valid.extend(brands(&read_parquet_records(&pair.valid)?));
        rejected.extend(brands(&read_parquet_records(&pair.rejected)?));
    }
    assert_eq!(valid, vec!["b0", "b2", "b4"]);
    assert_eq!(rejected, vec!["b1", "b3"]);
    Ok(())
}

#[test]
fn reruns_produce_identical_contents() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let input = write_products_csv(tmp.path(), "products.csv", &sample_product_rows())?;
    let first = tmp.path().join("first");
    let second = tmp.path().join("second");
    std::fs::create_dir(&first)?;
    std::fs::create_dir(&second)?;

    let options = ConvertOptions::new().with_output_dir(&first);
    let a = convert_csv_to_parquet(&input, &Schema::default(), &options)?;
    let b = converter(&second, None).run(&input)?;

    let (a, b) = (&a.artifacts()[0], &b.artifacts()[0]);
    assert_eq!(read_parquet_records(&a.valid)?, read_parquet_records(&b.valid)?);
    assert_eq!(
        read_parquet_records(&a.rejected)?,
        read_parquet_records(&b.rejected)?
    );
    Ok(())
}

#[test]
fn custom_rule_replaces_image_rule() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let input = write_products_csv(tmp.path(), "products.csv", &sample_product_rows())?;
    let rules = RuleSet::new()
        .with(RequiredField::new("brand"))
        .with(|r: &Record<'_>| r.get("brand") != Some(&Value::from("acme")));

    let outcome = converter(tmp.path(), None)
        .with_partitioner(Partitioner::new(rules))
        .run(&input)?;
    let pair = &outcome.artifacts()[0];
    assert_eq!(brands(&read_parquet_records(&pair.valid)?), vec!["globex"]);
    assert_eq!(brands(&read_parquet_records(&pair.rejected)?), vec!["acme"]);
    Ok(())
}

#[test]
fn missing_output_directory_is_fatal() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let input = write_products_csv(tmp.path(), "products.csv", &sample_product_rows())?;

    let err = converter(&tmp.path().join("nope"), None)
        .run(&input)
        .expect_err("write must fail");
    assert!(err.downcast_ref::<ConvertError>().is_none());
    Ok(())
}

#[test]
fn ragged_row_is_rejected_not_an_error() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let rows = vec![
        product_row("acme", Some("a.png")),
        "short,1,c,EUR,d".to_string(),
    ];
    let input = write_products_csv(tmp.path(), "products.csv", &rows)?;

    let outcome = converter(tmp.path(), None).run(&input)?;
    let pair = &outcome.artifacts()[0];
    assert_eq!(brands(&read_parquet_records(&pair.rejected)?), vec!["short"]);
    Ok(())
}

#[test]
fn mixed_text_and_number_columns_keep_original_text() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let rows = vec![
        "acme,0012,nice,EUR,Infinity,a.png,2019".to_string(),
        "globex,A5,1.50,EUR,plain,b.png,2019".to_string(),
    ];
    let input = write_products_csv(tmp.path(), "products.csv", &rows)?;
    let out = tmp.path().join("out");
    std::fs::create_dir(&out)?;

    let outcome = converter(&out, None).run(&input)?;
    let pair = &outcome.artifacts()[0];
    assert_eq!((pair.valid_rows, pair.rejected_rows), (2, 0));

    let valid = read_parquet_records(&pair.valid)?;
    assert_eq!(
        valid.column_values("category_id"),
        Some(vec![&Value::from("0012"), &Value::from("A5")])
    );
    assert_eq!(
        valid.column_values("comment"),
        Some(vec![&Value::from("nice"), &Value::from("1.50")])
    );
    assert_eq!(
        valid.column_values("description"),
        Some(vec![&Value::from("Infinity"), &Value::from("plain")])
    );
    assert_eq!(
        valid.column_values("year_release"),
        Some(vec![&Value::Int(2019), &Value::Int(2019)])
    );
    Ok(())
}
