//! Per-ticker metric fetching with retry.
//!
//! [`MetricFetcher::fetch`] never fails with an error: every ticker ends as
//! either [`RawMetrics`] or a [`FetchOutcome`] describing why it was skipped.
//! Transient provider errors are retried with a fixed delay; everything else
//! is final on the first attempt.

use crate::error::DataError;
use crate::provider::{MarketDataProvider, Valuation};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, timeout};

/// Configuration for metric fetching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Attempts per ticker, including the first (default: 3)
    pub max_attempts: u32,
    /// Pause between attempts in milliseconds (default: 5000)
    pub retry_delay_ms: u64,
    /// Deadline for a single provider call in milliseconds (default: 10000)
    pub request_timeout_ms: u64,
    /// Tickers fetched at the same time (default: 4)
    pub concurrency: usize,
    /// Calendar days of price history requested for momentum (default: 400)
    pub history_days: u32,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay_ms: 5_000,
            request_timeout_ms: 10_000,
            concurrency: 4,
            history_days: 400,
        }
    }
}

impl FetchConfig {
    /// Pause between attempts.
    pub const fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Deadline for a single provider call.
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Which fields a methodology needs for each ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricSet {
    /// Daily close history; price is the latest close.
    PriceHistory,
    /// Latest price plus valuation multiples.
    Valuation,
    /// Latest price plus market capitalization.
    MarketCap,
}

/// Fields fetched for one ticker.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMetrics {
    /// Ticker symbol
    pub symbol: String,
    /// Latest price, always finite and positive
    pub price: f64,
    /// Methodology-specific fields
    pub detail: MetricDetail,
}

/// Methodology-specific part of [`RawMetrics`].
#[derive(Debug, Clone, PartialEq)]
pub enum MetricDetail {
    /// Daily closes, oldest first, never empty
    History(Vec<f64>),
    /// Valuation fields; individual multiples may be missing
    Valuation(Valuation),
    /// Market capitalization
    MarketCap(f64),
}

/// Why a ticker produced no record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The provider answered but a mandatory field was absent.
    NoData {
        /// Ticker symbol
        symbol: String,
        /// What was missing
        reason: String,
    },
    /// The provider failed with a non-retryable error.
    Rejected {
        /// Ticker symbol
        symbol: String,
        /// Provider error message
        error: String,
    },
    /// Every attempt failed with a transient error.
    Exhausted {
        /// Ticker symbol
        symbol: String,
        /// Attempts made
        attempts: u32,
        /// Message of the final error
        last_error: String,
    },
}

impl FetchOutcome {
    /// Ticker the outcome refers to.
    pub fn symbol(&self) -> &str {
        match self {
            Self::NoData { symbol, .. }
            | Self::Rejected { symbol, .. }
            | Self::Exhausted { symbol, .. } => symbol,
        }
    }
}

impl fmt::Display for FetchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoData { symbol, reason } => write!(f, "{symbol}: no data ({reason})"),
            Self::Rejected { symbol, error } => write!(f, "{symbol}: {error}"),
            Self::Exhausted {
                symbol,
                attempts,
                last_error,
            } => write!(f, "{symbol}: gave up after {attempts} attempts ({last_error})"),
        }
    }
}

/// Receives per-ticker progress signals.
///
/// Calls may arrive from several in-flight fetches in any order, but each
/// ticker reports exactly one terminal signal (success or skip).
pub trait FetchObserver: Send + Sync {
    /// A ticker produced metrics.
    fn on_success(&self, symbol: &str);

    /// A ticker was skipped.
    fn on_skip(&self, outcome: &FetchOutcome);

    /// Attempt `attempt` failed transiently and will be retried.
    fn on_retry(&self, symbol: &str, attempt: u32, error: &DataError);
}

/// Observer that emits `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl FetchObserver for TracingObserver {
    fn on_success(&self, symbol: &str) {
        tracing::debug!(symbol, "fetched metrics");
    }

    fn on_skip(&self, outcome: &FetchOutcome) {
        tracing::warn!(symbol = outcome.symbol(), "skipping: {outcome}");
    }

    fn on_retry(&self, symbol: &str, attempt: u32, error: &DataError) {
        tracing::info!(symbol, attempt, %error, "transient failure, retrying");
    }
}

/// Fetches [`RawMetrics`] from a [`MarketDataProvider`].
#[derive(Debug)]
pub struct MetricFetcher<P> {
    provider: P,
    config: FetchConfig,
}

impl<P: MarketDataProvider> MetricFetcher<P> {
    /// Create a fetcher with default configuration.
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, FetchConfig::default())
    }

    /// Create a fetcher with custom configuration.
    pub const fn with_config(provider: P, config: FetchConfig) -> Self {
        Self { provider, config }
    }

    /// Active configuration.
    pub const fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Underlying provider.
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Fetch the fields in `set` for one ticker.
    pub async fn fetch<O>(
        &self,
        symbol: &str,
        set: MetricSet,
        observer: &O,
    ) -> Result<RawMetrics, FetchOutcome>
    where
        O: FetchObserver + ?Sized,
    {
        let result = match set {
            MetricSet::PriceHistory => self.fetch_history(symbol, observer).await,
            MetricSet::Valuation => self.fetch_valuation(symbol, observer).await,
            MetricSet::MarketCap => self.fetch_market_cap(symbol, observer).await,
        };

        match &result {
            Ok(_) => observer.on_success(symbol),
            Err(outcome) => observer.on_skip(outcome),
        }
        result
    }

    /// Fetch every symbol, at most `concurrency` at a time.
    ///
    /// Results come back in the order of `symbols`, regardless of which
    /// fetch finished first.
    pub async fn fetch_all<O>(
        &self,
        symbols: &[String],
        set: MetricSet,
        observer: &O,
    ) -> Vec<Result<RawMetrics, FetchOutcome>>
    where
        O: FetchObserver + ?Sized,
    {
        let mut indexed: Vec<(usize, Result<RawMetrics, FetchOutcome>)> =
            stream::iter(symbols.iter().enumerate())
                .map(|(index, symbol)| async move {
                    (index, self.fetch(symbol, set, observer).await)
                })
                .buffer_unordered(self.config.concurrency.max(1))
                .collect()
                .await;

        indexed.sort_by_key(|(index, _)| *index);
        indexed.into_iter().map(|(_, result)| result).collect()
    }

    async fn fetch_history<O>(&self, symbol: &str, observer: &O) -> Result<RawMetrics, FetchOutcome>
    where
        O: FetchObserver + ?Sized,
    {
        let days = self.config.history_days;
        let closes = self
            .with_retry(symbol, observer, || self.provider.daily_closes(symbol, days))
            .await?;

        let price = closes
            .last()
            .copied()
            .ok_or_else(|| no_data(symbol, "empty price history"))?;
        let price = valid_price(symbol, Some(price))?;

        Ok(RawMetrics {
            symbol: symbol.to_string(),
            price,
            detail: MetricDetail::History(closes),
        })
    }

    async fn fetch_valuation<O>(&self, symbol: &str, observer: &O) -> Result<RawMetrics, FetchOutcome>
    where
        O: FetchObserver + ?Sized,
    {
        let price = self
            .with_retry(symbol, observer, || self.provider.latest_price(symbol))
            .await?;
        let price = valid_price(symbol, price)?;

        let valuation = self
            .with_retry(symbol, observer, || self.provider.valuation(symbol))
            .await?;

        Ok(RawMetrics {
            symbol: symbol.to_string(),
            price,
            detail: MetricDetail::Valuation(valuation),
        })
    }

    async fn fetch_market_cap<O>(&self, symbol: &str, observer: &O) -> Result<RawMetrics, FetchOutcome>
    where
        O: FetchObserver + ?Sized,
    {
        let price = self
            .with_retry(symbol, observer, || self.provider.latest_price(symbol))
            .await?;
        let price = valid_price(symbol, price)?;

        let valuation = self
            .with_retry(symbol, observer, || self.provider.valuation(symbol))
            .await?;
        let market_cap = valuation
            .market_cap
            .filter(|cap| cap.is_finite() && *cap > 0.0)
            .ok_or_else(|| no_data(symbol, "missing market capitalization"))?;

        Ok(RawMetrics {
            symbol: symbol.to_string(),
            price,
            detail: MetricDetail::MarketCap(market_cap),
        })
    }

    /// Run `call` until it succeeds, fails non-transiently, or runs out of
    /// attempts. Each attempt is bounded by the request timeout.
    async fn with_retry<T, F, Fut, O>(
        &self,
        symbol: &str,
        observer: &O,
        mut call: F,
    ) -> Result<T, FetchOutcome>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = crate::Result<T>>,
        O: FetchObserver + ?Sized,
    {
        let max_attempts = self.config.max_attempts.max(1);
        let deadline = self.config.request_timeout();
        let mut attempt = 1;

        loop {
            let error = match timeout(deadline, call()).await {
                Ok(Ok(value)) => return Ok(value),
                Ok(Err(error)) => error,
                Err(_elapsed) => DataError::Timeout {
                    symbol: symbol.to_string(),
                    timeout_ms: self.config.request_timeout_ms,
                },
            };

            if !error.is_transient() {
                return Err(FetchOutcome::Rejected {
                    symbol: symbol.to_string(),
                    error: error.to_string(),
                });
            }

            if attempt >= max_attempts {
                return Err(FetchOutcome::Exhausted {
                    symbol: symbol.to_string(),
                    attempts: attempt,
                    last_error: error.to_string(),
                });
            }

            observer.on_retry(symbol, attempt, &error);
            sleep(self.config.retry_delay()).await;
            attempt += 1;
        }
    }
}

fn no_data(symbol: &str, reason: &str) -> FetchOutcome {
    FetchOutcome::NoData {
        symbol: symbol.to_string(),
        reason: reason.to_string(),
    }
}

fn valid_price(symbol: &str, price: Option<f64>) -> Result<f64, FetchOutcome> {
    match price {
        Some(p) if p.is_finite() && p > 0.0 => Ok(p),
        Some(p) => Err(no_data(symbol, &format!("invalid price {p}"))),
        None => Err(no_data(symbol, "missing price")),
    }
}
