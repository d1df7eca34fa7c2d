//! Error types for data operations.

use crate::yahoo::quotes::SOURCE_NAME as YAHOO;
use thiserror::Error;
use yahoo_finance_api::YahooError;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur during data operations.
#[derive(Debug, Error)]
pub enum DataError {
    /// The symbol page or the price endpoint could not be reached.
    #[error("{source_name} unavailable: {reason}")]
    SourceUnavailable {
        /// Which upstream failed (e.g. "constituents page", "Yahoo Finance")
        source_name: String,
        /// Underlying cause
        reason: String,
    },

    /// The upstream refused the request because of rate limiting.
    #[error("{source_name} rate limit exceeded")]
    RateLimited {
        /// Which upstream applied the limit
        source_name: String,
    },

    /// The constituents page no longer has the expected table layout.
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// The price source returned no rows for any symbol in the window.
    #[error("No price data between {start} and {end}")]
    NoDataForWindow {
        /// First day of the window
        start: String,
        /// Last day of the window
        end: String,
    },

    /// Lookback length that cannot form a window.
    #[error("Invalid lookback window: {days} days (must be positive)")]
    InvalidWindow {
        /// Requested lookback length
        days: i64,
    },

    /// A price fetch was requested for no symbols at all.
    #[error("Empty symbol list")]
    EmptySymbolList,

    /// Strict fetch where some symbols came back without data.
    #[error("Incomplete batch: no data for {}", missing.join(", "))]
    IncompleteBatch {
        /// Symbols without data
        missing: Vec<String>,
    },

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// Data parsing error
    #[error("Data parsing error: {0}")]
    Parse(String),

    /// Time conversion error
    #[error("Time conversion error: {0}")]
    TimeConversion(String),
}

impl DataError {
    /// Shorthand for [`DataError::SourceUnavailable`].
    pub fn unavailable(source_name: impl Into<String>, reason: impl ToString) -> Self {
        Self::SourceUnavailable {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }

    /// Shorthand for [`DataError::RateLimited`].
    pub fn rate_limited(source_name: impl Into<String>) -> Self {
        Self::RateLimited {
            source_name: source_name.into(),
        }
    }
}

impl From<YahooError> for DataError {
    fn from(err: YahooError) -> Self {
        match err {
            YahooError::TooManyRequests(_) => Self::rate_limited(YAHOO),
            other => Self::unavailable(YAHOO, other),
        }
    }
}
