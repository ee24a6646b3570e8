//! Valuation data fetching from Yahoo Finance.

use crate::error::{DataError, Result};
use crate::provider::Valuation;
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::sleep;

const QUOTE_SUMMARY_URL: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";
const COOKIE_URL: &str = "https://fc.yahoo.com";
const CRUMB_URL: &str = "https://query2.finance.yahoo.com/v1/test/getcrumb";
const MODULES: &str = "summaryDetail,defaultKeyStatistics";
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)";

/// Yahoo Finance fundamentals provider.
///
/// quoteSummary requires a session cookie plus a matching crumb. Both are
/// obtained on first use and shared by every request; a rejected crumb is
/// dropped so the next attempt starts a fresh session.
#[derive(Debug)]
pub struct YahooFundamentalsProvider {
    client: reqwest::Client,
    base_url: String,
    rate_limit_delay: Duration,
    crumb: Mutex<Option<String>>,
}

impl YahooFundamentalsProvider {
    /// Default pause after each request.
    pub const DEFAULT_RATE_LIMIT: Duration = Duration::from_millis(250);

    /// Create a new Yahoo Finance fundamentals provider.
    pub fn new() -> Result<Self> {
        Self::with_rate_limit(Self::DEFAULT_RATE_LIMIT)
    }

    /// Create a new provider with custom rate limiting.
    pub fn with_rate_limit(rate_limit_delay: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .build()?;
        Ok(Self {
            client,
            base_url: QUOTE_SUMMARY_URL.to_string(),
            rate_limit_delay,
            crumb: Mutex::new(None),
        })
    }

    /// Point the provider at a different quote-summary endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetch valuation multiples and market capitalization for a symbol.
    pub async fn fetch_valuation(&self, symbol: &str) -> Result<Valuation> {
        if symbol.is_empty() {
            return Err(DataError::InvalidSymbol("Empty symbol".to_string()));
        }

        let crumb = self.crumb().await?;
        let url = format!("{}/{}", self.base_url, symbol);
        let response = self
            .client
            .get(&url)
            .query(&[("modules", MODULES), ("crumb", crumb.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(match status.as_u16() {
                401 | 403 => {
                    self.crumb.lock().await.take();
                    DataError::SessionExpired(symbol.to_string())
                }
                404 => DataError::InvalidSymbol(symbol.to_string()),
                code => DataError::Http {
                    symbol: symbol.to_string(),
                    status: code,
                },
            });
        }

        let body = response.text().await?;
        sleep(self.rate_limit_delay).await;

        parse_quote_summary(symbol, &body)
    }

    /// Session crumb, fetched once and then reused.
    async fn crumb(&self) -> Result<String> {
        let mut cached = self.crumb.lock().await;
        if let Some(crumb) = cached.as_ref() {
            return Ok(crumb.clone());
        }

        // Only the Set-Cookie header matters here, not the status.
        let _session = self.client.get(COOKIE_URL).send().await?;

        let response = self.client.get(CRUMB_URL).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(match status.as_u16() {
                401 | 403 => DataError::SessionExpired("crumb".to_string()),
                code => DataError::Http {
                    symbol: "crumb".to_string(),
                    status: code,
                },
            });
        }

        let crumb = parse_crumb(&response.text().await?)?;
        tracing::debug!("obtained Yahoo session crumb");
        *cached = Some(crumb.clone());
        Ok(crumb)
    }
}

/// Validate a getcrumb response body.
pub fn parse_crumb(body: &str) -> Result<String> {
    let crumb = body.trim();
    if crumb.is_empty() || crumb.contains(['<', '{', ' ']) {
        return Err(DataError::SessionExpired(format!("crumb response {crumb:?}")));
    }
    Ok(crumb.to_string())
}

/// Extract a [`Valuation`] from a quoteSummary JSON body.
pub fn parse_quote_summary(symbol: &str, body: &str) -> Result<Valuation> {
    let envelope: Envelope = serde_json::from_str(body)?;

    if let Some(error) = envelope.quote_summary.error {
        return Err(DataError::MissingData {
            symbol: symbol.to_string(),
            reason: error.description.unwrap_or_else(|| "quoteSummary error".to_string()),
        });
    }

    let result = envelope
        .quote_summary
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| DataError::MissingData {
            symbol: symbol.to_string(),
            reason: "empty quoteSummary result".to_string(),
        })?;

    let detail = result.summary_detail.unwrap_or_default();
    let stats = result.default_key_statistics.unwrap_or_default();

    Ok(Valuation {
        trailing_pe: detail.trailing_pe.and_then(RawValue::get),
        price_to_book: stats.price_to_book.and_then(RawValue::get),
        ev_to_ebitda: stats.enterprise_to_ebitda.and_then(RawValue::get),
        ev_to_revenue: stats.enterprise_to_revenue.and_then(RawValue::get),
        market_cap: detail.market_cap.and_then(RawValue::get),
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    quote_summary: QuoteSummary,
}

#[derive(Debug, Deserialize)]
struct QuoteSummary {
    result: Option<Vec<SummaryResult>>,
    error: Option<SummaryError>,
}

#[derive(Debug, Deserialize)]
struct SummaryError {
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryResult {
    summary_detail: Option<SummaryDetail>,
    default_key_statistics: Option<KeyStatistics>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryDetail {
    #[serde(rename = "trailingPE")]
    trailing_pe: Option<RawValue>,
    market_cap: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KeyStatistics {
    price_to_book: Option<RawValue>,
    enterprise_to_ebitda: Option<RawValue>,
    enterprise_to_revenue: Option<RawValue>,
}

/// Yahoo wraps numbers as `{"raw": 12.3, "fmt": "12.30"}`; missing values
/// come back as `{}`.
#[derive(Debug, Deserialize)]
struct RawValue {
    raw: Option<f64>,
}

impl RawValue {
    fn get(self) -> Option<f64> {
        self.raw.filter(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "quoteSummary": {
            "result": [{
                "summaryDetail": {
                    "trailingPE": {"raw": 31.5, "fmt": "31.50"},
                    "marketCap": {"raw": 3000000000000.0, "fmt": "3T"}
                },
                "defaultKeyStatistics": {
                    "priceToBook": {"raw": 45.2, "fmt": "45.20"},
                    "enterpriseToEbitda": {},
                    "enterpriseToRevenue": {"raw": 7.9, "fmt": "7.90"}
                }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn test_parse_quote_summary() {
        let valuation = parse_quote_summary("AAPL", SAMPLE).unwrap();
        assert_eq!(valuation.trailing_pe, Some(31.5));
        assert_eq!(valuation.price_to_book, Some(45.2));
        assert_eq!(valuation.ev_to_ebitda, None);
        assert_eq!(valuation.ev_to_revenue, Some(7.9));
        assert_eq!(valuation.market_cap, Some(3.0e12));
    }

    #[test]
    fn test_parse_quote_summary_error() {
        let body = r#"{"quoteSummary": {"result": null,
            "error": {"code": "Not Found", "description": "Quote not found for ticker symbol: ZZZZ"}}}"#;
        let err = parse_quote_summary("ZZZZ", body).unwrap_err();
        assert!(matches!(err, DataError::MissingData { .. }));
        assert!(!err.is_transient());
    }

    #[test]
    fn test_parse_malformed_body() {
        let err = parse_quote_summary("AAPL", "<html>").unwrap_err();
        assert!(matches!(err, DataError::Serialization(_)));
        assert!(!err.is_transient());
    }

    #[test]
    fn test_parse_crumb() {
        assert_eq!(parse_crumb("aB3.xYz/9q\n").unwrap(), "aB3.xYz/9q");
    }

    #[test]
    fn test_parse_crumb_rejects_error_pages() {
        for body in ["", "  ", "<html>Too Many Requests</html>", r#"{"finance":{"error":{}}}"#] {
            let err = parse_crumb(body).unwrap_err();
            assert!(matches!(err, DataError::SessionExpired(_)));
            assert!(err.is_transient());
        }
    }

    #[tokio::test]
    async fn test_invalid_symbol() {
        let provider = YahooFundamentalsProvider::new().unwrap();
        let result = provider.fetch_valuation("").await;
        assert!(matches!(result, Err(DataError::InvalidSymbol(_))));
    }
}
