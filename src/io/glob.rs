//! Input discovery for directory batch mode.

use anyhow::{Context, Result, bail};
use glob::{Pattern, glob};
use std::path::{Path, PathBuf};

/// Extension recognised as CSV input.
pub const CSV_EXTENSION: &str = "csv";

/// Whether `path` names a CSV input file (by extension).
#[must_use]
pub fn is_csv_path(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == CSV_EXTENSION)
}

/// Expand a glob pattern into a sorted list of matching files.
///
/// # Errors
/// Returns an error if the pattern is invalid or a match cannot be read.
pub fn expand_glob(pattern: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in glob(pattern).with_context(|| format!("invalid glob pattern: {pattern}"))? {
        let path = entry.with_context(|| format!("reading glob match for: {pattern}"))?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// List the CSV files directly inside `dir`, sorted by path.
///
/// Sub-directories are not descended into.
///
/// # Errors
/// Returns an error if `dir` is not a directory or cannot be listed.
pub fn list_csv_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        bail!("not a directory: {}", dir.display());
    }
    let escaped = Pattern::escape(&dir.to_string_lossy());
    let pattern = format!("{escaped}/*.{CSV_EXTENSION}");
    expand_glob(&pattern)
}
