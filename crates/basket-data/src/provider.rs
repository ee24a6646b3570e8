//! Market data provider abstraction.
//!
//! The fetcher only depends on this trait, so the Yahoo adapters, the
//! snapshot replay provider and test doubles are interchangeable.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Valuation fields for one security. Every field may be absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Valuation {
    /// Trailing price-to-earnings ratio
    pub trailing_pe: Option<f64>,
    /// Price-to-book ratio
    pub price_to_book: Option<f64>,
    /// Enterprise value to EBITDA
    pub ev_to_ebitda: Option<f64>,
    /// Enterprise value to revenue, used as the gross-profit proxy
    pub ev_to_revenue: Option<f64>,
    /// Market capitalization
    pub market_cap: Option<f64>,
}

/// Source of quotes, price history and valuation fields.
pub trait MarketDataProvider: Send + Sync {
    /// Latest traded price, or `None` if the symbol has no recent quote.
    fn latest_price(&self, symbol: &str) -> impl Future<Output = Result<Option<f64>>> + Send;

    /// Daily closes over the trailing `days` calendar days, oldest first.
    fn daily_closes(&self, symbol: &str, days: u32) -> impl Future<Output = Result<Vec<f64>>> + Send;

    /// Valuation multiples and market capitalization.
    fn valuation(&self, symbol: &str) -> impl Future<Output = Result<Valuation>> + Send;
}

impl<P: MarketDataProvider> MarketDataProvider for &P {
    fn latest_price(&self, symbol: &str) -> impl Future<Output = Result<Option<f64>>> + Send {
        (**self).latest_price(symbol)
    }

    fn daily_closes(&self, symbol: &str, days: u32) -> impl Future<Output = Result<Vec<f64>>> + Send {
        (**self).daily_closes(symbol, days)
    }

    fn valuation(&self, symbol: &str) -> impl Future<Output = Result<Valuation>> + Send {
        (**self).valuation(symbol)
    }
}
