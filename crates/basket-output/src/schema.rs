//! Column schemas.
//!
//! A schema fixes the order, header text and display kind of every column
//! in a [`Table`](crate::Table). Kinds only affect formatted output (CSV and
//! terminal); JSON always carries the raw values.

use serde::{Deserialize, Serialize};

/// How a column is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// Dollar amount with two decimals, e.g. `$45.00`.
    Currency,
    /// Fraction shown as a percentage with one decimal, e.g. `0.123` as `12.3%`.
    Percentage,
    /// Whole number.
    Integer,
    /// Plain number with two decimals.
    Decimal,
    /// Free text.
    Text,
}

impl ColumnKind {
    /// Whether the column holds numbers.
    pub const fn is_numeric(self) -> bool {
        !matches!(self, Self::Text)
    }
}

/// A named column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Header text
    pub name: String,
    /// Display kind
    pub kind: ColumnKind,
}

impl Column {
    /// Create a column.
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Ordered list of columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column.
    pub fn column(mut self, name: impl Into<String>, kind: ColumnKind) -> Self {
        self.columns.push(Column::new(name, kind));
        self
    }

    /// Columns in order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the schema has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of the column called `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Header row.
    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }
}

impl FromIterator<Column> for Schema {
    fn from_iter<I: IntoIterator<Item = Column>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}
