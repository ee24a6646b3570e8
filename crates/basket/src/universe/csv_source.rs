//! Universe members from a CSV file.
//!
//! The file needs a header row with `Symbol` and `Security` columns (the
//! layout of the public S&P 500 constituent table). Other columns are
//! ignored.

use super::{Constituent, UniverseSource};
use crate::error::{BasketError, Result};
use serde::Deserialize;
use std::io::Read;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
struct Row {
    #[serde(rename = "Symbol")]
    symbol: String,
    #[serde(rename = "Security", default)]
    security: String,
}

/// A CSV file of universe members.
#[derive(Debug, Clone)]
pub struct CsvUniverse {
    path: PathBuf,
}

impl CsvUniverse {
    /// Read members from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Parse members from any reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<Constituent>> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut members = Vec::new();
        for row in rdr.deserialize::<Row>() {
            let row = row?;
            members.push(Constituent::new(row.symbol, row.security));
        }
        Ok(members)
    }
}

impl UniverseSource for CsvUniverse {
    fn constituents(&self) -> Result<Vec<Constituent>> {
        let file = std::fs::File::open(&self.path).map_err(|source| BasketError::UniverseFile {
            path: self.path.clone(),
            source,
        })?;
        Self::parse(file)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
