//! Row validity rules and the partitioner that splits a [`RecordSet`].
//!
//! A rule is anything implementing [`RowRule`]; closures over a [`Record`]
//! work out of the box. The [`Partitioner`] applies one rule to every record
//! and produces a stable split into valid and rejected rows.
//!
//! # Example
//!
//! ```
//! use data_prepare::record::{RecordSet, Value};
//! use data_prepare::validation::{Partitioner, RequiredField, RuleSet};
//!
//! let set = RecordSet::from_rows(
//!     vec!["brand".into(), "image".into()],
//!     vec![
//!         vec![Value::from("acme"), Value::from("a.png")],
//!         vec![Value::from("acme"), Value::Null],
//!     ],
//! );
//!
//! let rules = RuleSet::new()
//!     .with(RequiredField::new("image"))
//!     .with(|r: &data_prepare::record::Record<'_>| r.get("brand").is_some());
//! let split = Partitioner::new(rules).partition(&set);
//! assert_eq!(split.valid.len(), 1);
//! assert_eq!(split.rejected.len(), 1);
//! ```

use crate::record::{Record, RecordSet, Value};

/// Column checked by the default rule.
pub const IMAGE_COLUMN: &str = "image";

/// A predicate deciding whether a record goes to the valid partition.
pub trait RowRule {
    fn is_valid(&self, record: &Record<'_>) -> bool;
}

impl<F> RowRule for F
where
    F: Fn(&Record<'_>) -> bool,
{
    fn is_valid(&self, record: &Record<'_>) -> bool {
        self(record)
    }
}

/// A field must exist, must not be null, and must not be an empty string.
///
/// A NaN float counts as null. Whitespace-only strings and any other number
/// pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredField {
    column: String,
}

impl RequiredField {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }

    #[must_use]
    pub fn column(&self) -> &str {
        &self.column
    }
}

impl Default for RequiredField {
    fn default() -> Self {
        Self::new(IMAGE_COLUMN)
    }
}

impl RowRule for RequiredField {
    fn is_valid(&self, record: &Record<'_>) -> bool {
        match record.get(&self.column) {
            None => false,
            Some(v) if v.is_null() => false,
            Some(Value::Str(s)) => !s.is_empty(),
            Some(_) => true,
        }
    }
}

/// Conjunction of rules; an empty set accepts everything.
#[derive(Default)]
pub struct RuleSet {
    rules: Vec<Box<dyn RowRule>>,
}

impl RuleSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, rule: impl RowRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl RowRule for RuleSet {
    fn is_valid(&self, record: &Record<'_>) -> bool {
        self.rules.iter().all(|r| r.is_valid(record))
    }
}

/// Output of [`Partitioner::partition`]. Both sets carry the input header.
#[derive(Debug, Clone, PartialEq)]
pub struct Partitioned {
    pub valid: RecordSet,
    pub rejected: RecordSet,
}

impl Partitioned {
    #[must_use]
    pub fn total(&self) -> usize {
        self.valid.len() + self.rejected.len()
    }
}

/// Splits record sets with a single rule.
pub struct Partitioner {
    rule: Box<dyn RowRule>,
}

impl Default for Partitioner {
    fn default() -> Self {
        Self::new(RequiredField::default())
    }
}

impl Partitioner {
    pub fn new(rule: impl RowRule + 'static) -> Self {
        Self {
            rule: Box::new(rule),
        }
    }

    /// Classify every record of `records`.
    ///
    /// The input is left untouched and relative order is kept inside each
    /// output. Every input row lands in exactly one output.
    #[must_use]
    pub fn partition(&self, records: &RecordSet) -> Partitioned {
        let mut valid = RecordSet::new(records.columns().to_vec());
        let mut rejected = RecordSet::new(records.columns().to_vec());
        for (record, row) in records.records().zip(records.rows()) {
            if self.rule.is_valid(&record) {
                valid.push(row.clone());
            } else {
                rejected.push(row.clone());
            }
        }
        Partitioned { valid, rejected }
    }
}
