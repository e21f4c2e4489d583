//! In-memory tabular data: [`Value`], [`Record`] and [`RecordSet`].
//!
//! A [`RecordSet`] is one loaded file or one chunk of a file. It owns the
//! column header and a list of rows; every row is aligned with the header.
//! A [`Record`] is a borrowed view of one row that can be looked up by
//! column name.

use std::fmt;

/// Cell markers read as missing values, matching pandas' default NA set.
pub const NA_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// A single scalar cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing value. Distinct from an empty string.
    Null,
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    /// Read a raw CSV cell: NA markers become [`Value::Null`], anything else
    /// is kept as text until [`RecordSet::infer_types`] types the column.
    #[must_use]
    pub fn from_cell(raw: &str) -> Self {
        if NA_MARKERS.contains(&raw) {
            Self::Null
        } else {
            Self::Str(raw.to_string())
        }
    }

    /// Null, or a float that is NaN.
    #[must_use]
    pub fn is_null(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Float(x) => x.is_nan(),
            _ => false,
        }
    }
}

/// Storage type shared by every cell of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int,
    Float,
    Text,
}

/// Pick the narrowest type that every non-null cell fits.
///
/// Text cells count as numbers only when they parse. A single cell that
/// does not parse makes the whole column [`ColumnType::Text`]. A column with
/// no non-null cell is text as well.
pub fn infer_column_type<'a>(cells: impl IntoIterator<Item = &'a Value>) -> ColumnType {
    let mut inferred: Option<ColumnType> = None;
    for v in cells {
        let ty = match v {
            v if v.is_null() => continue,
            Value::Int(_) => ColumnType::Int,
            Value::Float(_) => ColumnType::Float,
            Value::Str(s) if s.parse::<i64>().is_ok() => ColumnType::Int,
            Value::Str(s) if s.parse::<f64>().is_ok() => ColumnType::Float,
            _ => return ColumnType::Text,
        };
        inferred = match (inferred, ty) {
            (Some(ColumnType::Float), _) | (_, ColumnType::Float) => Some(ColumnType::Float),
            _ => Some(ColumnType::Int),
        };
    }
    inferred.unwrap_or(ColumnType::Text)
}

fn cast_cell(value: &mut Value, ty: ColumnType) {
    let cast = match (&*value, ty) {
        (Value::Str(s), ColumnType::Int) => s.parse::<i64>().map_or(Value::Null, Value::Int),
        (Value::Str(s), ColumnType::Float) => s.parse::<f64>().map_or(Value::Null, Value::Float),
        (Value::Int(i), ColumnType::Float) => Value::Float(*i as f64),
        _ => return,
    };
    *value = if cast.is_null() { Value::Null } else { cast };
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// Borrowed view of one row, addressable by column name.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    columns: &'a [String],
    values: &'a [Value],
}

impl<'a> Record<'a> {
    #[must_use]
    pub fn new(columns: &'a [String], values: &'a [Value]) -> Self {
        Self { columns, values }
    }

    /// Look up a cell by column name.
    ///
    /// Returns `None` when the column does not exist in this record at all,
    /// which is different from a present column holding [`Value::Null`].
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&'a Value> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.values.get(idx)
    }

    #[must_use]
    pub fn columns(&self) -> &'a [String] {
        self.columns
    }

    #[must_use]
    pub fn values(&self) -> &'a [Value] {
        self.values
    }
}

/// An ordered collection of rows sharing one column header.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordSet {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl RecordSet {
    /// Create an empty set with the given header.
    #[must_use]
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a set from a header and rows.
    ///
    /// Short rows are padded with [`Value::Null`] and long rows are truncated
    /// so every stored row is aligned with the header.
    #[must_use]
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let mut set = Self::new(columns);
        for row in rows {
            set.push(row);
        }
        set
    }

    /// Append a row, aligning it with the header.
    pub fn push(&mut self, mut row: Vec<Value>) {
        row.resize(self.columns.len(), Value::Null);
        self.rows.push(row);
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate rows as [`Record`] views, in order.
    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.rows
            .iter()
            .map(|values| Record::new(&self.columns, values))
    }

    /// Convert every column whose non-null cells all parse as numbers to
    /// `Int` or `Float` (see [`infer_column_type`]). Other columns keep
    /// their original text. NaN cells of a float column become null.
    pub fn infer_types(&mut self) {
        for idx in 0..self.columns.len() {
            let ty = infer_column_type(self.rows.iter().map(|r| &r[idx]));
            if ty == ColumnType::Text {
                continue;
            }
            for row in &mut self.rows {
                cast_cell(&mut row[idx], ty);
            }
        }
    }

    /// All cells of one column, in row order. `None` if the column is unknown.
    #[must_use]
    pub fn column_values(&self, column: &str) -> Option<Vec<&Value>> {
        let idx = self.columns.iter().position(|c| c == column)?;
        Some(self.rows.iter().map(|r| &r[idx]).collect())
    }
}
