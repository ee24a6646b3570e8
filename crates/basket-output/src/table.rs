//! Ordered, fully populated tables.

use crate::export::ExportError;
use crate::schema::{ColumnKind, Schema};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// One table cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Text value
    Text(String),
    /// Floating-point value
    Number(f64),
    /// Whole number
    Integer(u64),
    /// No value
    Empty,
}

impl Cell {
    /// Render the cell for display in a column of `kind`.
    pub fn format(&self, kind: ColumnKind) -> String {
        match (self, kind) {
            (Self::Empty, _) => String::new(),
            (Self::Text(text), _) => text.clone(),
            (Self::Integer(n), _) => n.to_string(),
            (Self::Number(x), _) if !x.is_finite() => String::new(),
            (Self::Number(x), ColumnKind::Currency) if *x < 0.0 => format!("-${:.2}", -x),
            (Self::Number(x), ColumnKind::Currency) => format!("${x:.2}"),
            (Self::Number(x), ColumnKind::Percentage) => format!("{:.1}%", x * 100.0),
            (Self::Number(x), ColumnKind::Integer) => format!("{x:.0}"),
            (Self::Number(x), ColumnKind::Decimal | ColumnKind::Text) => format!("{x:.2}"),
        }
    }

    fn fits(&self, kind: ColumnKind) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(_) => kind == ColumnKind::Text,
            Self::Number(_) | Self::Integer(_) => kind.is_numeric(),
        }
    }

    fn kind_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Number(_) => "number",
            Self::Integer(_) => "integer",
            Self::Empty => "empty",
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<u64> for Cell {
    fn from(value: u64) -> Self {
        Self::Integer(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Empty, Into::into)
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Text(text) => serializer.serialize_str(text),
            Self::Number(x) if x.is_finite() => serializer.serialize_f64(*x),
            Self::Integer(n) => serializer.serialize_u64(*n),
            Self::Number(_) | Self::Empty => serializer.serialize_none(),
        }
    }
}

/// A titled table whose rows all match one [`Schema`].
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    title: String,
    schema: Schema,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Create an empty table.
    pub fn new(title: impl Into<String>, schema: Schema) -> Self {
        Self {
            title: title.into(),
            schema,
            rows: Vec::new(),
        }
    }

    /// Append a row, checking it against the schema.
    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<(), ExportError> {
        if row.len() != self.schema.len() {
            return Err(ExportError::SchemaMismatch(format!(
                "row {} has {} cells, expected {}",
                self.rows.len(),
                row.len(),
                self.schema.len()
            )));
        }

        if let Some((column, cell)) = self
            .schema
            .columns()
            .iter()
            .zip(&row)
            .find(|(column, cell)| !cell.fits(column.kind))
        {
            return Err(ExportError::SchemaMismatch(format!(
                "column '{}' is {:?} but row {} holds a {} cell",
                column.name,
                column.kind,
                self.rows.len(),
                cell.kind_name()
            )));
        }

        self.rows.push(row);
        Ok(())
    }

    /// Table title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Column schema.
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Rows in order.
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cells of the column called `name`, top to bottom.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Cell>> {
        let index = self.schema.index_of(name)?;
        Some(self.rows.iter().map(move |row| &row[index]))
    }

    /// Every row rendered with its column's display kind.
    pub fn formatted_rows(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        self.rows.iter().map(|row| {
            self.schema
                .columns()
                .iter()
                .zip(row)
                .map(|(column, cell)| cell.format(column.kind))
                .collect()
        })
    }
}

/// Serializes as an array of `{column name: raw value}` objects, keys in
/// schema order.
impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in &self.rows {
            seq.serialize_element(&Record {
                schema: &self.schema,
                row,
            })?;
        }
        seq.end()
    }
}

struct Record<'a> {
    schema: &'a Schema,
    row: &'a [Cell],
}

impl Serialize for Record<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.row.len()))?;
        for (name, cell) in self.schema.headers().zip(self.row) {
            map.serialize_entry(name, cell)?;
        }
        map.end()
    }
}
