//! Index constituent listing.
//!
//! A [`SymbolSource`] produces the ordered ticker list that feeds the price
//! fetcher. The default source scrapes the S&P 500 constituents table from
//! Wikipedia; [`StaticSymbols`] serves a fixed list.

pub mod wikipedia;

pub use wikipedia::{WikipediaConstituents, parse_constituents};

use crate::error::{DataError, Result};
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Source of index constituent symbols.
pub trait SymbolSource {
    /// Fetch the current ordered list of ticker symbols.
    ///
    /// Implementations never return an empty list; an empty result is an error.
    fn symbols(&self) -> impl Future<Output = Result<Vec<String>>> + Send;
}

/// Position of the constituents table and symbol column on a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableLocator {
    /// Zero-based index of the `<table>` element on the page.
    pub table_index: usize,
    /// Zero-based index of the symbol column within each row.
    pub column: usize,
    /// Number of leading rows to skip.
    pub header_rows: usize,
}

impl Default for TableLocator {
    fn default() -> Self {
        Self {
            table_index: 1,
            column: 0,
            header_rows: 1,
        }
    }
}

/// Fixed symbol list.
#[derive(Debug, Clone, Default)]
pub struct StaticSymbols {
    symbols: Vec<String>,
}

impl StaticSymbols {
    /// Create a source that always returns `symbols`.
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            symbols: symbols.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a comma-separated list such as `"AAPL, MSFT,GOOGL"`.
    pub fn from_csv(list: &str) -> Self {
        Self::new(
            list.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_uppercase),
        )
    }
}

impl SymbolSource for StaticSymbols {
    async fn symbols(&self) -> Result<Vec<String>> {
        if self.symbols.is_empty() {
            return Err(DataError::EmptySymbolList);
        }
        Ok(self.symbols.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_locator_is_second_table_first_column() {
        let locator = TableLocator::default();
        assert_eq!(locator.table_index, 1);
        assert_eq!(locator.column, 0);
        assert_eq!(locator.header_rows, 1);
    }

    #[test]
    fn test_from_csv_trims_and_uppercases() {
        let source = StaticSymbols::from_csv(" aapl, MSFT,,brk.b ");
        assert_eq!(source.symbols, vec!["AAPL", "MSFT", "BRK.B"]);
    }

    #[tokio::test]
    async fn test_static_symbols_preserve_order() {
        let source = StaticSymbols::new(["C", "A", "B"]);
        assert_eq!(source.symbols().await.unwrap(), vec!["C", "A", "B"]);
    }

    #[tokio::test]
    async fn test_empty_static_symbols_is_error() {
        let source = StaticSymbols::default();
        assert!(matches!(
            source.symbols().await,
            Err(DataError::EmptySymbolList)
        ));
    }
}
