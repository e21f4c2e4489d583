//! Artifact naming and the clock it reads from.
//!
//! Names have the shape `<timestamp>_<stem>_<valid|rejected>[_<index>].parquet`
//! where the timestamp has one-second resolution (`%Y%m%d_%H_%M_%S`).
//! Two runs over the same input within the same second produce the same
//! names; nothing here guards against that.

use chrono::{Local, NaiveDateTime};
use std::fmt;
use std::path::{Path, PathBuf};

/// Extension of every artifact written by the converter.
pub const ARTIFACT_EXTENSION: &str = "parquet";

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H_%M_%S";

/// Source of the wall-clock time used in artifact names.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always returns the same instant. Makes names deterministic in tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Render the name prefix for an instant.
#[must_use]
pub fn format_timestamp(at: NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Which side of a partition an artifact holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionTag {
    Valid,
    Rejected,
}

impl PartitionTag {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for PartitionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds artifact paths for one conversion run.
#[derive(Debug, Clone)]
pub struct ArtifactNamer {
    output_dir: PathBuf,
    prefix: String,
}

impl ArtifactNamer {
    /// `base_name` is usually the input file stem.
    pub fn new(output_dir: impl Into<PathBuf>, timestamp: NaiveDateTime, base_name: &str) -> Self {
        Self {
            output_dir: output_dir.into(),
            prefix: format!("{}_{base_name}", format_timestamp(timestamp)),
        }
    }

    /// Derive the base name from an input path's stem.
    pub fn for_input(output_dir: impl Into<PathBuf>, timestamp: NaiveDateTime, input: &Path) -> Self {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::new(output_dir, timestamp, &stem)
    }

    /// File name without directory. `chunk` is the 1-based chunk index.
    #[must_use]
    pub fn file_name(&self, tag: PartitionTag, chunk: Option<usize>) -> String {
        match chunk {
            Some(idx) => format!("{}_{tag}_{idx}.{ARTIFACT_EXTENSION}", self.prefix),
            None => format!("{}_{tag}.{ARTIFACT_EXTENSION}", self.prefix),
        }
    }

    #[must_use]
    pub fn path(&self, tag: PartitionTag, chunk: Option<usize>) -> PathBuf {
        self.output_dir.join(self.file_name(tag, chunk))
    }
}
