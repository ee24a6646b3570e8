//! Terminal progress for metric fetching.

use basket_data::{DataError, FetchObserver, FetchOutcome, TracingObserver};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Advances a progress bar once per ticker and forwards every signal to
/// [`TracingObserver`].
#[derive(Debug)]
pub(crate) struct ProgressObserver {
    bar: ProgressBar,
    inner: TracingObserver,
}

impl ProgressObserver {
    /// Create a bar for `total` tickers.
    pub(crate) fn new(total: usize, message: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
                .progress_chars("█▓░"),
        );
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_message(message.to_string());
        Ok(Self {
            bar,
            inner: TracingObserver,
        })
    }

    /// Observer that draws nothing.
    pub(crate) fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
            inner: TracingObserver,
        }
    }

    /// Stop the bar and leave `message` in its place.
    pub(crate) fn finish(&self, message: String) {
        self.bar.finish_with_message(message);
    }
}

impl FetchObserver for ProgressObserver {
    fn on_success(&self, symbol: &str) {
        self.inner.on_success(symbol);
        self.bar.inc(1);
    }

    fn on_skip(&self, outcome: &FetchOutcome) {
        self.bar.suspend(|| self.inner.on_skip(outcome));
        self.bar.inc(1);
    }

    fn on_retry(&self, symbol: &str, attempt: u32, error: &DataError) {
        self.bar.suspend(|| self.inner.on_retry(symbol, attempt, error));
        self.bar.set_message(format!("retrying {symbol} (attempt {})", attempt + 1));
    }
}
