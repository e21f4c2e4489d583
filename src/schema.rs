//! Expected column sets and the header check run before any row is processed.

use anyhow::{Context, Result};
use std::path::Path;

/// Column list used when no schema file is given.
pub const DEFAULT_COLUMNS: [&str; 7] = [
    "brand",
    "category_id",
    "comment",
    "currency",
    "description",
    "image",
    "year_release",
];

/// Check a file header against the expected columns.
///
/// True iff both lists have the same length and every header column is one
/// of the expected ones. Column order does not matter.
#[must_use]
pub fn verify_schema<C, E>(columns: &[C], expected: &[E]) -> bool
where
    C: AsRef<str>,
    E: AsRef<str>,
{
    columns.len() == expected.len()
        && columns
            .iter()
            .all(|c| expected.iter().any(|e| e.as_ref() == c.as_ref()))
}

/// The set of column names a source file must carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<String>,
}

impl Default for Schema {
    fn default() -> Self {
        Self::new(DEFAULT_COLUMNS)
    }
}

impl Schema {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a comma-separated column list. Names are trimmed and empty
    /// entries (e.g. from a trailing newline or comma) are dropped.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        Self::new(
            text.split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty()),
        )
    }

    /// Load a schema file holding a comma-separated column list.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or lists no columns.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read schema {}", path.display()))?;
        let schema = Self::parse(&text);
        if schema.columns.is_empty() {
            anyhow::bail!("schema {} lists no columns", path.display());
        }
        Ok(schema)
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// See [`verify_schema`].
    #[must_use]
    pub fn matches<C: AsRef<str>>(&self, header: &[C]) -> bool {
        verify_schema(header, &self.columns)
    }
}
