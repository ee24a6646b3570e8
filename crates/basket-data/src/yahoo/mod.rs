//! Yahoo Finance data providers.

pub mod fundamentals;
pub mod quotes;

pub use fundamentals::YahooFundamentalsProvider;
pub use quotes::YahooQuoteProvider;

use crate::error::Result;
use crate::provider::{MarketDataProvider, Valuation};
use std::time::Duration;

/// Quotes and fundamentals from Yahoo Finance behind one provider.
#[derive(Debug)]
pub struct YahooProvider {
    quotes: YahooQuoteProvider,
    fundamentals: YahooFundamentalsProvider,
}

impl YahooProvider {
    /// Create a provider with the default per-request pause.
    pub fn new() -> Result<Self> {
        Ok(Self {
            quotes: YahooQuoteProvider::new()?,
            fundamentals: YahooFundamentalsProvider::new()?,
        })
    }

    /// Create a provider that pauses `rate_limit_delay` after every request.
    pub fn with_rate_limit(rate_limit_delay: Duration) -> Result<Self> {
        Ok(Self {
            quotes: YahooQuoteProvider::with_rate_limit(rate_limit_delay)?,
            fundamentals: YahooFundamentalsProvider::with_rate_limit(rate_limit_delay)?,
        })
    }
}

impl MarketDataProvider for YahooProvider {
    async fn latest_price(&self, symbol: &str) -> Result<Option<f64>> {
        self.quotes.fetch_latest_price(symbol).await
    }

    async fn daily_closes(&self, symbol: &str, days: u32) -> Result<Vec<f64>> {
        self.quotes.fetch_recent_closes(symbol, days).await
    }

    async fn valuation(&self, symbol: &str) -> Result<Valuation> {
        self.fundamentals.fetch_valuation(symbol).await
    }
}
