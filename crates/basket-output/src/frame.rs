//! Polars view of a report table, used for terminal display.

use crate::export::ExportError;
use crate::schema::ColumnKind;
use crate::table::{Cell, Table};
use polars::prelude::*;

/// Build a [`DataFrame`] with one typed column per schema column.
///
/// Text columns become strings, integer columns `u64`, and every other
/// numeric kind `f64`. Empty cells become nulls.
pub fn to_dataframe(table: &Table) -> Result<DataFrame, ExportError> {
    let columns = table
        .schema()
        .columns()
        .iter()
        .enumerate()
        .map(|(index, column)| {
            let name = column.name.as_str().into();
            let cells = table.rows().iter().map(|row| &row[index]);
            match column.kind {
                ColumnKind::Text => Column::new(name, cells.map(text).collect::<Vec<_>>()),
                ColumnKind::Integer => Column::new(name, cells.map(integer).collect::<Vec<_>>()),
                ColumnKind::Currency | ColumnKind::Percentage | ColumnKind::Decimal => {
                    Column::new(name, cells.map(number).collect::<Vec<_>>())
                }
            }
        })
        .collect::<Vec<_>>();

    Ok(DataFrame::new(columns)?)
}

fn text(cell: &Cell) -> Option<String> {
    match cell {
        Cell::Text(text) => Some(text.clone()),
        Cell::Empty | Cell::Number(_) | Cell::Integer(_) => None,
    }
}

fn integer(cell: &Cell) -> Option<u64> {
    match cell {
        Cell::Integer(n) => Some(*n),
        Cell::Number(x) if x.is_finite() && *x >= 0.0 => Some(x.round() as u64),
        Cell::Empty | Cell::Number(_) | Cell::Text(_) => None,
    }
}

fn number(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Number(x) if x.is_finite() => Some(*x),
        Cell::Integer(n) => Some(*n as f64),
        Cell::Empty | Cell::Number(_) | Cell::Text(_) => None,
    }
}
