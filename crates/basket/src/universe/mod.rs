//! Universe management.
//!
//! A [`Universe`] is the ordered list of `(ticker, company name)` pairs a
//! screen runs over. Sources hand over raw pairs; the universe normalizes
//! tickers (trimmed, upper-case, `.` replaced by `-`) and keeps only the
//! first occurrence of each, so downstream stages can key records by
//! ticker.

pub mod csv_source;
pub mod sp500;

pub use csv_source::CsvUniverse;
pub use sp500::SP500Universe;

use crate::error::{BasketError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One universe member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constituent {
    /// Ticker symbol
    pub symbol: String,
    /// Company name, display only
    pub name: String,
}

impl Constituent {
    /// Create a new constituent.
    pub fn new(symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
        }
    }
}

/// Where universe members come from.
pub trait UniverseSource {
    /// Raw members in source order, possibly un-normalized or duplicated.
    fn constituents(&self) -> Result<Vec<Constituent>>;

    /// Human-readable source name for logs.
    fn describe(&self) -> String;
}

/// Provider-ready form of a ticker: trimmed, upper-case, `.` as `-`.
///
/// Class shares are listed as `BRK.B` by the index but quoted as `BRK-B`.
pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_ascii_uppercase().replace('.', "-")
}

/// Normalized, duplicate-free universe in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Universe {
    constituents: Vec<Constituent>,
}

impl Universe {
    /// Build from raw members.
    ///
    /// Blank tickers are dropped. When a ticker repeats after normalization
    /// the first occurrence wins.
    pub fn from_constituents(raw: impl IntoIterator<Item = Constituent>) -> Self {
        let mut seen = HashSet::new();
        let mut constituents = Vec::new();

        for member in raw {
            let symbol = normalize_symbol(&member.symbol);
            if symbol.is_empty() {
                continue;
            }
            if !seen.insert(symbol.clone()) {
                tracing::debug!(symbol, "dropping duplicate universe member");
                continue;
            }
            constituents.push(Constituent {
                symbol,
                name: member.name.trim().to_string(),
            });
        }

        Self { constituents }
    }

    /// Load and normalize members from `source`.
    pub fn load<S: UniverseSource + ?Sized>(source: &S) -> Result<Self> {
        let universe = Self::from_constituents(source.constituents()?);
        if universe.is_empty() {
            return Err(BasketError::EmptyUniverse(source.describe()));
        }
        tracing::info!(source = %source.describe(), members = universe.len(), "loaded universe");
        Ok(universe)
    }

    /// Members in order.
    pub fn constituents(&self) -> &[Constituent] {
        &self.constituents
    }

    /// Tickers in order.
    pub fn symbols(&self) -> Vec<String> {
        self.constituents.iter().map(|c| c.symbol.clone()).collect()
    }

    /// Whether `symbol` (already normalized) is a member.
    pub fn contains(&self, symbol: &str) -> bool {
        self.constituents.iter().any(|c| c.symbol == symbol)
    }

    /// Company name for `symbol`.
    pub fn company_name(&self, symbol: &str) -> Option<&str> {
        self.constituents
            .iter()
            .find(|c| c.symbol == symbol)
            .map(|c| c.name.as_str())
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.constituents.len()
    }

    /// Whether the universe has no members.
    pub fn is_empty(&self) -> bool {
        self.constituents.is_empty()
    }

    /// Keep only the first `n` members.
    pub fn truncate(&mut self, n: usize) {
        self.constituents.truncate(n);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("BRK.B", "BRK-B")]
    #[case(" aapl ", "AAPL")]
    #[case("bf.b", "BF-B")]
    #[case("MSFT", "MSFT")]
    fn test_normalize_symbol(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalize_symbol(raw), expected);
    }

    #[test]
    fn test_duplicates_keep_first() {
        let universe = Universe::from_constituents([
            Constituent::new("AAPL", "Apple Inc."),
            Constituent::new("BRK.B", "Berkshire Hathaway"),
            Constituent::new("aapl", "Apple again"),
            Constituent::new("BRK-B", "Berkshire again"),
            Constituent::new("  ", "Blank"),
            Constituent::new("MSFT", "Microsoft"),
        ]);

        assert_eq!(universe.symbols(), ["AAPL", "BRK-B", "MSFT"]);
        assert_eq!(universe.company_name("AAPL"), Some("Apple Inc."));
        assert_eq!(universe.company_name("BRK-B"), Some("Berkshire Hathaway"));
    }

    struct Empty;

    impl UniverseSource for Empty {
        fn constituents(&self) -> Result<Vec<Constituent>> {
            Ok(vec![Constituent::new(" ", "nothing")])
        }

        fn describe(&self) -> String {
            "empty".to_string()
        }
    }

    #[test]
    fn test_empty_universe_is_an_error() {
        let err = Universe::load(&Empty).unwrap_err();
        assert!(matches!(err, BasketError::EmptyUniverse(_)));
    }

    #[test]
    fn test_truncate() {
        let mut universe = Universe::load(&SP500Universe::new()).unwrap();
        universe.truncate(5);
        assert_eq!(universe.len(), 5);
        assert_eq!(universe.symbols()[0], "AAPL");
    }
}
