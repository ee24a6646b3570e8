//! Frozen market data snapshots.
//!
//! A [`SnapshotProvider`] answers every request from memory, so a run can be
//! replayed offline with identical inputs. [`RecordingProvider`] wraps a live
//! provider and captures what it returned into a snapshot.

use crate::error::{DataError, Result};
use crate::provider::{MarketDataProvider, Valuation};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::sync::Mutex;

/// Everything known about one symbol.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    /// Latest traded price
    #[serde(default)]
    pub price: Option<f64>,
    /// Daily closes, oldest first
    #[serde(default)]
    pub closes: Vec<f64>,
    /// Valuation fields
    #[serde(default)]
    pub valuation: Valuation,
}

/// In-memory provider keyed by symbol.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotProvider {
    entries: BTreeMap<String, SnapshotEntry>,
}

impl SnapshotProvider {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry for `symbol`.
    pub fn insert(&mut self, symbol: impl Into<String>, entry: SnapshotEntry) {
        self.entries.insert(symbol.into(), entry);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_entry(mut self, symbol: impl Into<String>, entry: SnapshotEntry) -> Self {
        self.insert(symbol, entry);
        self
    }

    /// Entry for `symbol`, if present.
    pub fn get(&self, symbol: &str) -> Option<&SnapshotEntry> {
        self.entries.get(symbol)
    }

    /// Number of symbols in the snapshot.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the snapshot holds no symbols.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load a snapshot from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Write the snapshot to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    fn entry(&self, symbol: &str) -> Result<&SnapshotEntry> {
        self.entries
            .get(symbol)
            .ok_or_else(|| DataError::InvalidSymbol(format!("{symbol} not in snapshot")))
    }
}

impl MarketDataProvider for SnapshotProvider {
    async fn latest_price(&self, symbol: &str) -> Result<Option<f64>> {
        Ok(self.entry(symbol)?.price)
    }

    async fn daily_closes(&self, symbol: &str, _days: u32) -> Result<Vec<f64>> {
        Ok(self.entry(symbol)?.closes.clone())
    }

    async fn valuation(&self, symbol: &str) -> Result<Valuation> {
        Ok(self.entry(symbol)?.valuation)
    }
}

/// Provider wrapper that records successful responses.
#[derive(Debug)]
pub struct RecordingProvider<P> {
    inner: P,
    recorded: Mutex<SnapshotProvider>,
}

impl<P> RecordingProvider<P> {
    /// Wrap `inner`, starting from an empty snapshot.
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            recorded: Mutex::new(SnapshotProvider::new()),
        }
    }

    /// Snapshot of everything recorded so far.
    pub fn snapshot(&self) -> SnapshotProvider {
        self.recorded
            .lock()
            .map_or_else(|poisoned| poisoned.into_inner().clone(), |guard| guard.clone())
    }

    fn record(&self, symbol: &str, update: impl FnOnce(&mut SnapshotEntry)) {
        let mut guard = match self.recorded.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        update(guard.entries.entry(symbol.to_string()).or_default());
    }
}

impl<P: MarketDataProvider> MarketDataProvider for RecordingProvider<P> {
    async fn latest_price(&self, symbol: &str) -> Result<Option<f64>> {
        let price = self.inner.latest_price(symbol).await?;
        self.record(symbol, |entry| entry.price = price);
        Ok(price)
    }

    async fn daily_closes(&self, symbol: &str, days: u32) -> Result<Vec<f64>> {
        let closes = self.inner.daily_closes(symbol, days).await?;
        self.record(symbol, |entry| {
            entry.price = closes.last().copied();
            entry.closes.clone_from(&closes);
        });
        Ok(closes)
    }

    async fn valuation(&self, symbol: &str) -> Result<Valuation> {
        let valuation = self.inner.valuation(symbol).await?;
        self.record(symbol, |entry| entry.valuation = valuation);
        Ok(valuation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(price: f64) -> SnapshotEntry {
        SnapshotEntry {
            price: Some(price),
            closes: vec![price - 1.0, price],
            valuation: Valuation {
                trailing_pe: Some(12.0),
                ..Default::default()
            },
        }
    }

    #[tokio::test]
    async fn test_snapshot_answers_from_memory() {
        let snapshot = SnapshotProvider::new().with_entry("AAPL", entry(200.0));

        assert_eq!(snapshot.latest_price("AAPL").await.unwrap(), Some(200.0));
        assert_eq!(snapshot.daily_closes("AAPL", 400).await.unwrap(), vec![199.0, 200.0]);
        assert_eq!(snapshot.valuation("AAPL").await.unwrap().trailing_pe, Some(12.0));
    }

    #[tokio::test]
    async fn test_unknown_symbol_is_not_transient() {
        let snapshot = SnapshotProvider::new();
        let err = snapshot.latest_price("MSFT").await.unwrap_err();
        assert!(matches!(err, DataError::InvalidSymbol(_)));
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn test_recording_provider_captures_responses() {
        let live = SnapshotProvider::new().with_entry("AAPL", entry(200.0));
        let recorder = RecordingProvider::new(live);

        recorder.daily_closes("AAPL", 400).await.unwrap();
        recorder.valuation("AAPL").await.unwrap();
        assert!(recorder.latest_price("MSFT").await.is_err());

        let recorded = recorder.snapshot();
        assert_eq!(recorded.len(), 1);
        let aapl = recorded.get("AAPL").unwrap();
        assert_eq!(aapl.price, Some(200.0));
        assert_eq!(aapl.closes, vec![199.0, 200.0]);
        assert_eq!(aapl.valuation.trailing_pe, Some(12.0));
    }

    #[test]
    fn test_json_shape_round_trips() {
        let snapshot = SnapshotProvider::new().with_entry("AAPL", entry(200.0));
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"AAPL\""));
        let back: SnapshotProvider = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
