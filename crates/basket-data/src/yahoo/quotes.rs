//! Quote data fetching from Yahoo Finance.

use crate::error::{DataError, Result};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::time::Duration;
use tokio::time::sleep;
use yahoo_finance_api as yahoo;

/// Yahoo Finance quote provider with rate limiting.
pub struct YahooQuoteProvider {
    provider: yahoo::YahooConnector,
    rate_limit_delay: Duration,
}

impl std::fmt::Debug for YahooQuoteProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YahooQuoteProvider")
            .field("rate_limit_delay", &self.rate_limit_delay)
            .finish_non_exhaustive()
    }
}

impl YahooQuoteProvider {
    /// Default pause after each request.
    pub const DEFAULT_RATE_LIMIT: Duration = Duration::from_millis(250);

    /// Create a new Yahoo Finance quote provider with default rate limiting.
    pub fn new() -> Result<Self> {
        Self::with_rate_limit(Self::DEFAULT_RATE_LIMIT)
    }

    /// Create a new Yahoo Finance quote provider with custom rate limiting.
    pub fn with_rate_limit(rate_limit_delay: Duration) -> Result<Self> {
        Ok(Self {
            provider: yahoo::YahooConnector::new()?,
            rate_limit_delay,
        })
    }

    /// Fetch daily closes for a single symbol, oldest first.
    ///
    /// Uses adjusted closes so splits and dividends do not show up as
    /// price moves. Non-positive closes are dropped.
    pub async fn fetch_closes(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<f64>> {
        if start > end {
            return Err(DataError::InvalidDateRange {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }

        if symbol.is_empty() {
            return Err(DataError::InvalidSymbol("Empty symbol".to_string()));
        }

        let start_time = time::OffsetDateTime::from_unix_timestamp(start.timestamp())
            .map_err(|e| DataError::TimeConversion(e.to_string()))?;
        let end_time = time::OffsetDateTime::from_unix_timestamp(end.timestamp())
            .map_err(|e| DataError::TimeConversion(e.to_string()))?;

        let response = self
            .provider
            .get_quote_history(symbol, start_time, end_time)
            .await?;

        let quotes = response.quotes()?;

        let closes: Vec<f64> = quotes
            .iter()
            .map(|q| q.adjclose)
            .filter(|close| close.is_finite() && *close > 0.0)
            .collect();

        sleep(self.rate_limit_delay).await;

        Ok(closes)
    }

    /// Fetch daily closes over the trailing `days` calendar days.
    pub async fn fetch_recent_closes(&self, symbol: &str, days: u32) -> Result<Vec<f64>> {
        let end = Utc::now();
        let start = end - ChronoDuration::days(i64::from(days));
        self.fetch_closes(symbol, start, end).await
    }

    /// Fetch the latest daily close for a symbol.
    ///
    /// Returns `Ok(None)` when Yahoo answers but has no usable quote.
    pub async fn fetch_latest_price(&self, symbol: &str) -> Result<Option<f64>> {
        if symbol.is_empty() {
            return Err(DataError::InvalidSymbol("Empty symbol".to_string()));
        }

        let response = self.provider.get_latest_quotes(symbol, "1d").await?;
        let quotes = response.quotes()?;

        sleep(self.rate_limit_delay).await;

        Ok(quotes
            .last()
            .map(|q| q.close)
            .filter(|close| close.is_finite() && *close > 0.0))
    }
}
