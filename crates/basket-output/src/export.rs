//! CSV and JSON export of report tables.

use crate::table::Table;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// DataFrame construction error.
    #[error("DataFrame error: {0}")]
    Frame(#[from] polars::prelude::PolarsError),

    /// A row does not match the table schema.
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportFormat {
    /// Comma-separated values with formatted cells.
    #[default]
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::PrettyJson => "pretty-json",
        })
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "pretty-json" | "pretty_json" | "prettyjson" => Ok(Self::PrettyJson),
            other => Err(ExportError::InvalidFormat(other.to_string())),
        }
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

impl Exporter for Table {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                wtr.write_record(self.schema().headers())?;
                for row in self.formatted_rows() {
                    wtr.write_record(&row)?;
                }
                let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
                String::from_utf8(bytes)
                    .map_err(|e| ExportError::InvalidFormat(format!("CSV output is not UTF-8: {e}")))
            }
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

/// Path `<dir>/<prefix>_<suffix>.<ext>` for a report artifact.
pub fn artifact_path(dir: &Path, prefix: &str, suffix: &str, format: ExportFormat) -> PathBuf {
    dir.join(format!("{prefix}_{suffix}.{}", format.extension()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnKind, Schema};
    use rstest::rstest;

    fn cohort() -> Table {
        let schema = Schema::new()
            .column("Ticker", ColumnKind::Text)
            .column("Company Name", ColumnKind::Text)
            .column("Price", ColumnKind::Currency)
            .column("RV Score", ColumnKind::Percentage)
            .column("Number of Shares to Buy", ColumnKind::Integer);
        let mut table = Table::new("Top 50 Value Stocks", schema);
        table
            .push_row(vec![
                "BRK-B".into(),
                "Berkshire Hathaway, Inc.".into(),
                410.5.into(),
                0.125.into(),
                12_u64.into(),
            ])
            .unwrap();
        table
    }

    #[test]
    fn test_csv_uses_formatted_cells() {
        let csv = cohort().export_to_string(ExportFormat::Csv).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("Ticker,Company Name,Price,RV Score,Number of Shares to Buy")
        );
        assert_eq!(
            lines.next(),
            Some("BRK-B,\"Berkshire Hathaway, Inc.\",$410.50,12.5%,12")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_json_uses_raw_values() {
        let json = cohort().export_to_string(ExportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["Price"], 410.5);
        assert_eq!(value[0]["RV Score"], 0.125);
        assert_eq!(value[0]["Number of Shares to Buy"], 12);
    }

    #[test]
    fn test_pretty_json() {
        let json = cohort().export_to_string(ExportFormat::PrettyJson).unwrap();
        assert!(json.contains("\"BRK-B\""));
        assert!(json.contains("  ")); // Indentation indicates pretty format
    }

    #[test]
    fn test_export_to_file() {
        let dir = std::env::temp_dir().join(format!("basket-export-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = artifact_path(&dir, "value", "cohort", ExportFormat::Csv);
        assert!(path.ends_with("value_cohort.csv"));

        cohort().export_to_file(&path, ExportFormat::Csv).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("BRK-B"));

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_export_to_missing_directory_fails() {
        let path = Path::new("/nonexistent-basket-dir/value_cohort.csv");
        let err = cohort().export_to_file(path, ExportFormat::Csv).unwrap_err();
        assert!(matches!(err, ExportError::Io(_)));
    }

    #[rstest]
    #[case("csv", ExportFormat::Csv)]
    #[case("JSON", ExportFormat::Json)]
    #[case("pretty-json", ExportFormat::PrettyJson)]
    fn test_format_from_str(#[case] input: &str, #[case] expected: ExportFormat) {
        assert_eq!(input.parse::<ExportFormat>().unwrap(), expected);
    }

    #[test]
    fn test_export_format_extension() {
        assert_eq!(ExportFormat::Csv.extension(), "csv");
        assert_eq!(ExportFormat::Json.extension(), "json");
        assert_eq!(ExportFormat::PrettyJson.extension(), "json");
        assert!("xlsx".parse::<ExportFormat>().is_err());
    }
}
