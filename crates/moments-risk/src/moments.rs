//! Portfolio moments
//!
//! First and second moments of an Open-price panel: the per-symbol mean
//! (an expected-return proxy) and the symbol-by-symbol covariance matrix
//! (a risk proxy). Both are computed over the same complete rows.

use crate::clean::complete_observations;
use crate::covariance::{
    CovarianceEstimator, SampleCovarianceEstimator, column_means, correlation_from_covariance,
};
use crate::error::{Result, StatisticsError};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Moments calculator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MomentsConfig {
    /// Minimum complete observations required (default: 2, never lower)
    pub min_observations: usize,
}

impl Default for MomentsConfig {
    fn default() -> Self {
        Self {
            min_observations: 2,
        }
    }
}

/// Mean vector and covariance matrix over a common set of symbols.
///
/// `symbols[i]`, `mean[i]` and row/column `i` of `covariance` always refer to
/// the same symbol.
#[derive(Debug, Clone)]
pub struct PortfolioMoments {
    symbols: Vec<String>,
    mean: Array1<f64>,
    covariance: Array2<f64>,
    observations: usize,
    excluded: Vec<String>,
    dropped_rows: usize,
}

impl PortfolioMoments {
    /// Symbols, in input column order
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Mean Open price per symbol
    pub const fn mean(&self) -> &Array1<f64> {
        &self.mean
    }

    /// Sample covariance of Open prices
    pub const fn covariance(&self) -> &Array2<f64> {
        &self.covariance
    }

    /// Number of complete rows used
    pub const fn observations(&self) -> usize {
        self.observations
    }

    /// Input symbols dropped because they had no data
    pub fn excluded(&self) -> &[String] {
        &self.excluded
    }

    /// Input rows dropped because of a gap
    pub const fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }

    /// Position of `symbol`
    pub fn index_of(&self, symbol: &str) -> Option<usize> {
        self.symbols.iter().position(|s| s == symbol)
    }

    /// Mean for one symbol
    pub fn mean_of(&self, symbol: &str) -> Option<f64> {
        self.index_of(symbol).map(|i| self.mean[i])
    }

    /// Covariance between two symbols
    pub fn covariance_of(&self, a: &str, b: &str) -> Option<f64> {
        Some(self.covariance[[self.index_of(a)?, self.index_of(b)?]])
    }

    /// Standard deviation per symbol (square root of the diagonal)
    pub fn volatilities(&self) -> Array1<f64> {
        self.covariance.diag().mapv(f64::sqrt)
    }

    /// Correlation matrix, or `None` if any symbol has zero variance
    pub fn correlation(&self) -> Option<Array2<f64>> {
        correlation_from_covariance(&self.covariance)
    }
}

/// Computes [`PortfolioMoments`] from a price panel.
#[derive(Debug)]
pub struct MomentsCalculator<E = SampleCovarianceEstimator> {
    estimator: E,
    config: MomentsConfig,
}

impl MomentsCalculator<SampleCovarianceEstimator> {
    /// Calculator using the sample covariance and default configuration
    pub const fn sample() -> Self {
        Self {
            estimator: SampleCovarianceEstimator,
            config: MomentsConfig { min_observations: 2 },
        }
    }
}

impl Default for MomentsCalculator<SampleCovarianceEstimator> {
    fn default() -> Self {
        Self::sample()
    }
}

impl<E: CovarianceEstimator> MomentsCalculator<E> {
    /// Create a calculator with the given estimator and configuration
    pub fn new(estimator: E, config: MomentsConfig) -> Result<Self> {
        if config.min_observations < 2 {
            return Err(StatisticsError::InvalidParameter(format!(
                "min_observations must be at least 2, got {}",
                config.min_observations
            )));
        }
        Ok(Self { estimator, config })
    }

    /// Compute the mean vector and covariance matrix
    ///
    /// # Arguments
    /// * `symbols` - Column labels
    /// * `prices` - Matrix where each row is a date and each column is a symbol;
    ///   non-finite values mark missing data
    ///
    /// # Errors
    /// * [`StatisticsError::DimensionMismatch`] if labels and columns disagree,
    ///   or if the estimator returns a matrix that does not match the mean vector
    /// * [`StatisticsError::NoUsableSymbols`] if every column is empty
    /// * [`StatisticsError::Degenerate`] if fewer than `min_observations`
    ///   complete rows remain
    pub fn compute(&self, symbols: &[String], prices: &Array2<f64>) -> Result<PortfolioMoments> {
        let clean = complete_observations(symbols, prices)?;

        let observations = clean.values.nrows();
        if observations < self.config.min_observations {
            return Err(StatisticsError::Degenerate {
                required: self.config.min_observations,
                actual: observations,
            });
        }

        let mean = column_means(&clean.values);
        let covariance = self.estimator.estimate(&clean.values)?;

        let n = mean.len();
        if covariance.nrows() != n || covariance.ncols() != n {
            return Err(StatisticsError::DimensionMismatch {
                expected: n,
                actual: covariance.nrows().max(covariance.ncols()),
            });
        }
        if clean.symbols.len() != n {
            return Err(StatisticsError::DimensionMismatch {
                expected: clean.symbols.len(),
                actual: n,
            });
        }

        info!(
            symbols = n,
            observations,
            excluded = clean.excluded.len(),
            dropped_rows = clean.dropped_rows,
            "computed portfolio moments"
        );

        Ok(PortfolioMoments {
            symbols: clean.symbols,
            mean,
            covariance,
            observations,
            excluded: clean.excluded,
            dropped_rows: clean.dropped_rows,
        })
    }
}
