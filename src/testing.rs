//! Fixtures for tests of the conversion pipeline.
//!
//! ```
//! use data_prepare::testing::*;
//!
//! let tmp = tempfile::tempdir().unwrap();
//! let path = write_products_csv(tmp.path(), "products.csv", &sample_product_rows()).unwrap();
//! assert!(path.exists());
//! ```

use crate::naming::FixedClock;
use crate::schema::DEFAULT_COLUMNS;
use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use std::path::{Path, PathBuf};

/// Header line of the default product schema.
#[must_use]
pub fn product_header() -> String {
    DEFAULT_COLUMNS.join(",")
}

/// The default product columns as owned strings.
#[must_use]
pub fn product_columns() -> Vec<String> {
    DEFAULT_COLUMNS.iter().map(ToString::to_string).collect()
}

/// Build one product CSV line. `image` is left empty when `None`.
#[must_use]
pub fn product_row(brand: &str, image: Option<&str>) -> String {
    format!(
        "{brand},42,nice,EUR,a product,{},2019",
        image.unwrap_or_default()
    )
}

/// Two products: the first has an image, the second does not.
#[must_use]
pub fn sample_product_rows() -> Vec<String> {
    vec![
        product_row("acme", Some("http://img/acme.png")),
        product_row("globex", None),
    ]
}

/// Write a CSV file from a raw header and raw lines.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn write_csv_fixture(dir: &Path, name: &str, header: &str, rows: &[String]) -> Result<PathBuf> {
    let path = dir.join(name);
    let mut body = String::from(header);
    body.push('\n');
    for row in rows {
        body.push_str(row);
        body.push('\n');
    }
    std::fs::write(&path, body).with_context(|| format!("write fixture {}", path.display()))?;
    Ok(path)
}

/// Write a CSV file with the default product header.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn write_products_csv(dir: &Path, name: &str, rows: &[String]) -> Result<PathBuf> {
    write_csv_fixture(dir, name, &product_header(), rows)
}

/// 2021-03-07 09:05:02, rendered `20210307_09_05_02` in artifact names.
#[must_use]
pub fn fixed_instant() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2021, 3, 7)
        .and_then(|d| d.and_hms_opt(9, 5, 2))
        .unwrap_or_default()
}

/// A clock frozen at [`fixed_instant`].
#[must_use]
pub fn fixed_clock() -> FixedClock {
    FixedClock(fixed_instant())
}
