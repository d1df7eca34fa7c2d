//! End-to-end pipeline: symbols -> prices -> moments.

use moments_data::{
    DataError, FetchConfig, LookbackWindow, PriceFetcher, PriceSource, PriceTable, SymbolSource,
    WikipediaConstituents, YahooPriceSource,
};
use moments_risk::{
    MomentsCalculator, MomentsConfig, PortfolioMoments, SampleCovarianceEstimator,
    StatisticsError,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Default lookback length in calendar days.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 30;

/// Errors from any pipeline step.
#[derive(Debug, Error)]
pub enum MomentsError {
    /// Listing symbols or fetching prices failed.
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    /// Computing statistics failed.
    #[error("Statistics error: {0}")]
    Statistics(#[from] StatisticsError),
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, MomentsError>;

/// Pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Length of the trailing price window in days.
    pub lookback_days: i64,
    /// Batched fetch behaviour.
    pub fetch: FetchConfig,
    /// Statistics behaviour.
    pub moments: MomentsConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            fetch: FetchConfig::default(),
            moments: MomentsConfig::default(),
        }
    }
}

/// Output of a full run.
#[derive(Debug)]
pub struct PipelineReport {
    /// Symbols listed by the symbol source.
    pub listed: Vec<String>,
    /// Fetched prices.
    pub table: PriceTable,
    /// Mean and covariance of Open prices.
    pub moments: PortfolioMoments,
}

/// Symbol Lister -> Price Fetcher -> Statistics Calculator.
#[derive(Debug)]
pub struct Pipeline<S, P> {
    symbols: S,
    fetcher: PriceFetcher<P>,
    calculator: MomentsCalculator<SampleCovarianceEstimator>,
    lookback_days: i64,
}

impl Pipeline<WikipediaConstituents, YahooPriceSource> {
    /// S&P 500 constituents from Wikipedia, prices from Yahoo Finance.
    pub fn sp500(config: PipelineConfig) -> Result<Self> {
        Self::new(
            WikipediaConstituents::new()?,
            YahooPriceSource::new()?,
            config,
        )
    }
}

impl<S, P> Pipeline<S, P>
where
    S: SymbolSource + Sync,
    P: PriceSource + Sync,
{
    /// Assemble a pipeline from its sources.
    pub fn new(symbols: S, prices: P, config: PipelineConfig) -> Result<Self> {
        let calculator = MomentsCalculator::new(SampleCovarianceEstimator, config.moments)?;
        Ok(Self {
            symbols,
            fetcher: PriceFetcher::with_config(prices, config.fetch),
            calculator,
            lookback_days: config.lookback_days,
        })
    }

    /// Configured lookback length.
    pub const fn lookback_days(&self) -> i64 {
        self.lookback_days
    }

    /// Step 1: list the index constituents.
    pub async fn list_symbols(&self) -> Result<Vec<String>> {
        Ok(self.symbols.symbols().await?)
    }

    /// Step 2: fetch the configured trailing window for `symbols`.
    pub async fn fetch_prices(&self, symbols: &[String]) -> Result<PriceTable> {
        Ok(self.fetcher.fetch(symbols, self.lookback_days).await?)
    }

    /// Step 2 over an explicit window.
    pub async fn fetch_prices_window(
        &self,
        symbols: &[String],
        window: &LookbackWindow,
    ) -> Result<PriceTable> {
        Ok(self.fetcher.fetch_window(symbols, window).await?)
    }

    /// Step 3: mean and covariance of Open prices.
    pub fn compute_statistics(&self, table: &PriceTable) -> Result<PortfolioMoments> {
        let open = table.open_prices()?;
        Ok(self.calculator.compute(&open.symbols, &open.values)?)
    }

    /// Run all three steps over the window ending today.
    pub async fn run(&self) -> Result<PipelineReport> {
        let window = LookbackWindow::ending_today(self.lookback_days)?;
        self.run_window(&window).await
    }

    /// Run all three steps over `window`.
    pub async fn run_window(&self, window: &LookbackWindow) -> Result<PipelineReport> {
        let listed = self.list_symbols().await?;
        let table = self.fetch_prices_window(&listed, window).await?;
        let moments = self.compute_statistics(&table)?;

        info!(
            listed = listed.len(),
            priced = table.symbols().len(),
            used = moments.symbols().len(),
            "pipeline complete"
        );

        Ok(PipelineReport {
            listed,
            table,
            moments,
        })
    }
}

/// Mean and sample covariance of a table's Open prices with default settings.
pub fn compute_statistics(table: &PriceTable) -> Result<PortfolioMoments> {
    let open = table.open_prices()?;
    Ok(MomentsCalculator::sample().compute(&open.symbols, &open.values)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.lookback_days, 30);
        assert_eq!(config.fetch, FetchConfig::default());
        assert_eq!(config.moments.min_observations, 2);
    }

    #[test]
    fn test_error_wrapping() {
        let err: MomentsError = DataError::InvalidWindow { days: 0 }.into();
        assert!(matches!(err, MomentsError::Data(_)));

        let err: MomentsError = StatisticsError::NoUsableSymbols.into();
        assert!(matches!(err, MomentsError::Statistics(_)));
    }
}
