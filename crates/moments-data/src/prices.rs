//! Batched price history fetching.
//!
//! [`PriceFetcher`] fans a symbol list out to a [`PriceSource`] with bounded
//! concurrency and gathers the results, in request order, into one
//! [`PriceTable`]. A symbol that fails or comes back empty is recorded in
//! [`PriceTable::missing`] instead of aborting the batch, unless
//! [`FetchConfig::strict`] is set.

use crate::error::{DataError, Result};
use crate::table::{DailyBar, MissingReason, MissingSymbol, PriceTable, SymbolHistory};
use crate::window::LookbackWindow;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::future::Future;
use tracing::{debug, info, warn};

/// Default number of concurrent per-symbol requests.
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Source of daily price history for one symbol.
pub trait PriceSource {
    /// Human-readable name used in errors.
    fn name(&self) -> &str;

    /// Daily bars for `symbol` inside `window`, ascending by date.
    ///
    /// An unknown symbol yields `Ok` with no bars. Transport failures map to
    /// [`DataError::SourceUnavailable`] and throttling to
    /// [`DataError::RateLimited`].
    fn daily_history(
        &self,
        symbol: &str,
        window: &LookbackWindow,
    ) -> impl Future<Output = Result<Vec<DailyBar>>> + Send;
}

/// Configuration for batched fetching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Maximum in-flight requests.
    pub concurrency: usize,
    /// Fail the whole batch if any symbol has no data.
    pub strict: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            strict: false,
        }
    }
}

/// Fetches a symbol list into a single [`PriceTable`].
#[derive(Debug)]
pub struct PriceFetcher<P> {
    source: P,
    config: FetchConfig,
}

impl<P: PriceSource + Sync> PriceFetcher<P> {
    /// Create a fetcher with default configuration.
    pub fn new(source: P) -> Self {
        Self::with_config(source, FetchConfig::default())
    }

    /// Create a fetcher with custom configuration.
    pub const fn with_config(source: P, config: FetchConfig) -> Self {
        Self { source, config }
    }

    /// Underlying price source.
    pub const fn source(&self) -> &P {
        &self.source
    }

    /// Active configuration.
    pub const fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Fetch `[today - days, today]` for every symbol.
    ///
    /// # Errors
    /// [`DataError::InvalidWindow`] when `days <= 0`, plus everything
    /// [`PriceFetcher::fetch_window`] returns.
    pub async fn fetch(&self, symbols: &[String], days: i64) -> Result<PriceTable> {
        let window = LookbackWindow::ending_today(days)?;
        self.fetch_window(symbols, &window).await
    }

    /// Fetch `window` for every symbol.
    ///
    /// # Errors
    /// - [`DataError::EmptySymbolList`] when `symbols` is empty
    /// - [`DataError::RateLimited`] / [`DataError::SourceUnavailable`] when
    ///   no symbol returned data and at least one request failed that way
    /// - [`DataError::NoDataForWindow`] when every symbol came back empty
    /// - in strict mode, the first request failure, or
    ///   [`DataError::IncompleteBatch`] naming symbols without data
    pub async fn fetch_window(
        &self,
        symbols: &[String],
        window: &LookbackWindow,
    ) -> Result<PriceTable> {
        let symbols = dedup(symbols);
        if symbols.is_empty() {
            return Err(DataError::EmptySymbolList);
        }

        info!(
            symbols = symbols.len(),
            %window,
            source = self.source.name(),
            "fetching price history"
        );

        let outcomes: Vec<(String, Result<Vec<DailyBar>>)> = stream::iter(symbols)
            .map(|symbol| async move {
                let result = self.source.daily_history(&symbol, window).await;
                (symbol, result)
            })
            .buffered(self.config.concurrency.max(1))
            .collect()
            .await;

        let mut histories = Vec::with_capacity(outcomes.len());
        let mut missing = Vec::new();
        let mut first_failure = None;

        for (symbol, result) in outcomes {
            match result {
                Ok(bars) if !bars.is_empty() => {
                    debug!(%symbol, bars = bars.len(), "fetched");
                    histories.push(SymbolHistory { symbol, bars });
                }
                Ok(_) => {
                    warn!(%symbol, "no data in window");
                    missing.push(MissingSymbol {
                        symbol,
                        reason: MissingReason::NoData,
                    });
                }
                Err(e) => {
                    warn!(%symbol, error = %e, "failed to fetch");
                    missing.push(MissingSymbol {
                        symbol,
                        reason: missing_reason(&e),
                    });
                    if first_failure.is_none() {
                        first_failure = Some(e);
                    }
                }
            }
        }

        if histories.is_empty() {
            return Err(self.empty_batch_error(&missing, first_failure, window));
        }

        if self.config.strict && !missing.is_empty() {
            return Err(first_failure.unwrap_or_else(|| DataError::IncompleteBatch {
                missing: missing.into_iter().map(|m| m.symbol).collect(),
            }));
        }

        let table = PriceTable::from_histories(*window, histories, missing)?;
        info!(
            fetched = table.symbols().len(),
            missing = table.missing().len(),
            rows = table.height(),
            "price table ready"
        );
        Ok(table)
    }

    fn empty_batch_error(
        &self,
        missing: &[MissingSymbol],
        first_failure: Option<DataError>,
        window: &LookbackWindow,
    ) -> DataError {
        if missing
            .iter()
            .any(|m| m.reason == MissingReason::RateLimited)
        {
            return DataError::rate_limited(self.source.name());
        }

        match first_failure {
            Some(err @ DataError::SourceUnavailable { .. }) => err,
            Some(err) if !matches!(err, DataError::RateLimited { .. }) => {
                DataError::unavailable(self.source.name(), err)
            }
            _ => DataError::NoDataForWindow {
                start: window.start().to_string(),
                end: window.end().to_string(),
            },
        }
    }
}

fn missing_reason(err: &DataError) -> MissingReason {
    match err {
        DataError::RateLimited { .. } => MissingReason::RateLimited,
        other => MissingReason::Unavailable(other.to_string()),
    }
}

/// Drop repeated symbols, keeping the first occurrence.
fn dedup(symbols: &[String]) -> Vec<String> {
    let mut seen = HashSet::with_capacity(symbols.len());
    symbols
        .iter()
        .filter(|s| {
            let fresh = seen.insert(s.as_str());
            if !fresh {
                warn!(symbol = %s, "duplicate symbol ignored");
            }
            fresh
        })
        .cloned()
        .collect()
}
