//! Error types for data operations.

use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur during data operations.
#[derive(Debug, Error)]
pub enum DataError {
    /// Yahoo Finance API error
    #[error("Yahoo Finance API error: {0}")]
    YahooApi(String),

    /// Transport-level failure reported by the Yahoo connector
    #[error("Connection error: {0}")]
    Connection(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Upstream returned a non-success HTTP status
    #[error("HTTP {status} for {symbol}")]
    Http {
        /// Symbol that was queried
        symbol: String,
        /// Status code returned by the server
        status: u16,
    },

    /// Yahoo rejected the session cookie or crumb
    #[error("Yahoo session rejected for {0}")]
    SessionExpired(String),

    /// A single request exceeded its deadline
    #[error("Request for {symbol} timed out after {timeout_ms}ms")]
    Timeout {
        /// Symbol that was queried
        symbol: String,
        /// Deadline that was exceeded
        timeout_ms: u64,
    },

    /// Rate limit error
    #[error("Rate limit exceeded, please retry after {retry_after_ms}ms")]
    RateLimit {
        /// Milliseconds to wait before retrying
        retry_after_ms: u64,
    },

    /// Data parsing error
    #[error("Data parsing error: {0}")]
    Parse(String),

    /// Invalid date range
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date of the range
        start: String,
        /// End date of the range
        end: String,
    },

    /// Missing data
    #[error("Missing data for {symbol}: {reason}")]
    MissingData {
        /// Symbol that was queried
        symbol: String,
        /// Reason for missing data
        reason: String,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Time conversion error
    #[error("Time conversion error: {0}")]
    TimeConversion(String),

    /// Invalid symbol
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DataError {
    /// Whether a retry of the same request may succeed.
    ///
    /// Network faults, timeouts, rate limiting and server-side errors are
    /// transient. Malformed responses and unknown symbols are not.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Connection(_)
            | Self::SessionExpired(_)
            | Self::Timeout { .. }
            | Self::RateLimit { .. } => true,
            Self::Network(err) => is_transient_reqwest(err),
            Self::Http { status, .. } => *status == 429 || (500..600).contains(status),
            Self::YahooApi(_)
            | Self::Parse(_)
            | Self::InvalidDateRange { .. }
            | Self::MissingData { .. }
            | Self::Serialization(_)
            | Self::TimeConversion(_)
            | Self::InvalidSymbol(_)
            | Self::Io(_) => false,
        }
    }
}

fn is_transient_reqwest(err: &reqwest::Error) -> bool {
    if err.is_timeout() || err.is_connect() || err.is_request() {
        return true;
    }
    err.status()
        .is_some_and(|status| status.as_u16() == 429 || status.is_server_error())
}

impl From<yahoo_finance_api::YahooError> for DataError {
    fn from(err: yahoo_finance_api::YahooError) -> Self {
        // The connector wraps reqwest failures; walk the source chain so the
        // retry policy sees them as transport errors rather than API errors.
        let mut source = std::error::Error::source(&err);
        while let Some(inner) = source {
            if let Some(req) = inner.downcast_ref::<reqwest::Error>() {
                if is_transient_reqwest(req) {
                    return Self::Connection(err.to_string());
                }
                break;
            }
            source = inner.source();
        }

        let message = err.to_string();
        let lowered = message.to_ascii_lowercase();
        if lowered.contains("too many requests") || lowered.contains("429") {
            return Self::RateLimit { retry_after_ms: 0 };
        }
        if lowered.contains("connection") {
            return Self::Connection(message);
        }
        Self::YahooApi(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(DataError::Connection("reset".into()), true)]
    #[case(DataError::Timeout { symbol: "AAPL".into(), timeout_ms: 10_000 }, true)]
    #[case(DataError::RateLimit { retry_after_ms: 500 }, true)]
    #[case(DataError::SessionExpired("AAPL".into()), true)]
    #[case(DataError::Http { symbol: "AAPL".into(), status: 503 }, true)]
    #[case(DataError::Http { symbol: "AAPL".into(), status: 429 }, true)]
    #[case(DataError::Http { symbol: "AAPL".into(), status: 404 }, false)]
    #[case(DataError::Parse("bad json".into()), false)]
    #[case(DataError::InvalidSymbol("ZZZZ".into()), false)]
    #[case(DataError::YahooApi("no result".into()), false)]
    fn test_transient_classification(#[case] err: DataError, #[case] expected: bool) {
        assert_eq!(err.is_transient(), expected);
    }
}
