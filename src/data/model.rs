use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::Path;

use crate::error::{Result, SweepError};

// ---------------------------------------------------------------------------
// Value – a single cell of a table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the dtypes a dataframe library infers
/// from CSV / Excel input.
#[derive(Debug, Clone)]
pub enum Value {
    Number(f64),
    Text(String),
    Missing,
}

/// Bit pattern used for equality and hashing: `-0.0` and `0.0` are one value.
fn number_bits(v: f64) -> u64 {
    if v == 0.0 {
        0.0f64.to_bits()
    } else {
        v.to_bits()
    }
}

// -- Manual Eq/Hash so whole rows can be put in a HashSet --

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => number_bits(*a) == number_bits(*b),
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Missing, Value::Missing) => true,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Number(v) => number_bits(*v).hash(state),
            Value::Text(s) => s.hash(state),
            Value::Missing => {}
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(v) => write!(f, "{v}"),
            Value::Text(s) => write!(f, "{s}"),
            Value::Missing => write!(f, "<NA>"),
        }
    }
}

impl Value {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Text written to a CSV field. Missing values become empty fields.
    pub fn to_field(&self) -> String {
        match self {
            Value::Number(v) => v.to_string(),
            Value::Text(s) => s.clone(),
            Value::Missing => String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Column – a named, homogeneous sequence of values
// ---------------------------------------------------------------------------

/// A named column. Every non-missing value is either a number or text, never
/// both: a mixed column is turned into a text column on construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    name: String,
    values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        let has_text = values.iter().any(|v| matches!(v, Value::Text(_)));
        let has_number = values.iter().any(|v| matches!(v, Value::Number(_)));

        let values = if has_text && has_number {
            values
                .into_iter()
                .map(|v| match v {
                    Value::Number(n) => Value::Text(n.to_string()),
                    other => other,
                })
                .collect()
        } else {
            values
        };

        Column {
            name: name.into(),
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// A column is numeric when all of its values are numbers or missing.
    /// An all-missing column therefore counts as numeric.
    pub fn is_numeric(&self) -> bool {
        self.values
            .iter()
            .all(|v| matches!(v, Value::Number(_) | Value::Missing))
    }

    /// The non-missing numbers of the column, in order.
    pub fn numbers(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().filter_map(Value::as_f64)
    }

    pub(crate) fn values_mut(&mut self) -> &mut Vec<Value> {
        &mut self.values
    }
}

// ---------------------------------------------------------------------------
// Table – ordered columns with a uniform row count
// ---------------------------------------------------------------------------

/// In-memory table: ordered, uniquely named columns of equal length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Build a table, checking unique names and a uniform row count.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let mut seen = std::collections::HashSet::new();
        for col in &columns {
            if !seen.insert(col.name()) {
                return Err(SweepError::DuplicateColumn(col.name().to_string()));
            }
        }

        if let Some(first) = columns.first() {
            let expected = first.len();
            if let Some(bad) = columns.iter().find(|c| c.len() != expected) {
                return Err(SweepError::RaggedColumn {
                    column: bad.name().to_string(),
                    expected,
                    found: bad.len(),
                });
            }
        }

        Ok(Table { columns })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name().to_string()).collect()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    /// Values of one row, left to right.
    pub fn row(&self, index: usize) -> Option<Vec<&Value>> {
        if index >= self.row_count() {
            return None;
        }
        self.columns.iter().map(|c| c.values().get(index)).collect()
    }

    pub fn rows(&self) -> impl Iterator<Item = Vec<&Value>> + '_ {
        (0..self.row_count()).filter_map(move |i| self.row(i))
    }

    /// The first `n` rows (all of them when the table is shorter).
    pub fn head(&self, n: usize) -> Table {
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                values: c.values.iter().take(n).cloned().collect(),
            })
            .collect();
        Table { columns }
    }

    /// Keep only the rows whose flag is `true`. `keep` must have one entry per row.
    pub(crate) fn retain_rows(mut self, keep: &[bool]) -> Table {
        for col in &mut self.columns {
            let mut flags = keep.iter();
            col.values.retain(|_| flags.next().copied().unwrap_or(false));
        }
        self
    }

    pub(crate) fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }
}

// ---------------------------------------------------------------------------
// UploadedFile – raw bytes plus the name they arrived under
// ---------------------------------------------------------------------------

/// An opened file. Immutable once created; the format is derived from the name.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    name: String,
    bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        UploadedFile {
            name: name.into(),
            bytes,
        }
    }

    /// Read a file from disk, keeping only its file name.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(v: f64) -> Value {
        Value::Number(v)
    }

    fn text(s: &str) -> Value {
        Value::Text(s.to_owned())
    }

    #[test]
    fn table_rejects_duplicate_names() {
        let err = Table::new(vec![
            Column::new("a", vec![num(1.0)]),
            Column::new("a", vec![num(2.0)]),
        ])
        .unwrap_err();
        assert!(matches!(err, SweepError::DuplicateColumn(name) if name == "a"));
    }

    #[test]
    fn table_rejects_ragged_columns() {
        let err = Table::new(vec![
            Column::new("a", vec![num(1.0), num(2.0)]),
            Column::new("b", vec![num(1.0)]),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            SweepError::RaggedColumn { expected: 2, found: 1, .. }
        ));
    }

    #[test]
    fn mixed_column_becomes_text() {
        let col = Column::new("mixed", vec![num(1.0), text("x"), Value::Missing]);
        assert_eq!(col.values(), &[text("1"), text("x"), Value::Missing]);
        assert!(!col.is_numeric());
    }

    #[test]
    fn all_missing_column_is_numeric() {
        let col = Column::new("empty", vec![Value::Missing, Value::Missing]);
        assert!(col.is_numeric());
        assert_eq!(col.numbers().count(), 0);
    }

    #[test]
    fn negative_zero_equals_zero() {
        assert_eq!(num(-0.0), num(0.0));
        assert_ne!(num(1.0), text("1"));
    }

    #[test]
    fn head_and_rows() -> anyhow::Result<()> {
        let table = Table::new(vec![
            Column::new("id", vec![num(1.0), num(2.0), num(3.0)]),
            Column::new("name", vec![text("a"), text("b"), Value::Missing]),
        ])?;

        let head = table.head(2);
        assert_eq!(head.row_count(), 2);
        assert_eq!(head.column_names(), vec!["id", "name"]);

        let rows: Vec<_> = table.rows().collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2], vec![&num(3.0), &Value::Missing]);
        assert!(table.row(3).is_none());
        Ok(())
    }

    #[test]
    fn fields_render_for_csv() {
        assert_eq!(num(5.0).to_field(), "5");
        assert_eq!(num(2.5).to_field(), "2.5");
        assert_eq!(Value::Missing.to_field(), "");
        assert_eq!(Value::Missing.to_string(), "<NA>");
    }
}
