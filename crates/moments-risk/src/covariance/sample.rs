//! Sample covariance estimator
//!
//! Unbiased pairwise estimator over complete observations:
//! Cov(i,j) = Σ_t (x_{t,i} - x̄_i)(x_{t,j} - x̄_j) / (T - 1)

use super::CovarianceEstimator;
use super::utils::column_means;
use crate::error::{Result, StatisticsError};
use ndarray::{Array2, Axis};

/// Minimum observations for an unbiased covariance.
pub const MIN_OBSERVATIONS: usize = 2;

/// Sample (n-1 denominator) covariance estimator
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleCovarianceEstimator;

impl SampleCovarianceEstimator {
    /// Create a new estimator
    pub const fn new() -> Self {
        Self
    }
}

impl CovarianceEstimator for SampleCovarianceEstimator {
    fn estimate(&self, observations: &Array2<f64>) -> Result<Array2<f64>> {
        let (n_obs, _n_symbols) = observations.dim();
        if n_obs < MIN_OBSERVATIONS {
            return Err(StatisticsError::Degenerate {
                required: MIN_OBSERVATIONS,
                actual: n_obs,
            });
        }

        let means = column_means(observations);
        let centered = observations - &means.insert_axis(Axis(0));

        let mut cov = centered.t().dot(&centered);
        cov /= (n_obs - 1) as f64;

        // Force exact symmetry
        let cov = (&cov + &cov.t()) / 2.0;

        Ok(cov)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_two_symbol_inverse_moves() {
        let prices = array![[10.0, 20.0], [11.0, 19.0], [12.0, 18.0]];
        let cov = SampleCovarianceEstimator::new().estimate(&prices).unwrap();

        assert_abs_diff_eq!(cov[[0, 0]], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(cov[[1, 1]], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(cov[[0, 1]], -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(cov[[1, 0]], -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_matches_hand_computation() {
        // x = [1, 2, 4], y = [2, 1, 6]
        // x̄ = 7/3, ȳ = 3
        // var(x) = ((-4/3)^2 + (-1/3)^2 + (5/3)^2) / 2 = 7/3
        // var(y) = (1 + 4 + 9) / 2 = 7
        // cov(x,y) = ((-4/3)(-1) + (-1/3)(-2) + (5/3)(3)) / 2 = 7/2
        let prices = array![[1.0, 2.0], [2.0, 1.0], [4.0, 6.0]];
        let cov = SampleCovarianceEstimator::new().estimate(&prices).unwrap();

        assert_abs_diff_eq!(cov[[0, 0]], 7.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(cov[[1, 1]], 7.0, epsilon = 1e-12);
        assert_abs_diff_eq!(cov[[0, 1]], 3.5, epsilon = 1e-12);
    }

    #[test]
    fn test_single_observation_is_degenerate() {
        let prices = array![[10.0, 20.0]];
        let err = SampleCovarianceEstimator::new()
            .estimate(&prices)
            .unwrap_err();
        assert!(matches!(
            err,
            StatisticsError::Degenerate {
                required: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_constant_column_has_zero_variance() {
        let prices = array![[5.0, 1.0], [5.0, 2.0], [5.0, 3.0]];
        let cov = SampleCovarianceEstimator::new().estimate(&prices).unwrap();

        assert_abs_diff_eq!(cov[[0, 0]], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(cov[[0, 1]], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(cov[[1, 1]], 1.0, epsilon = 1e-12);
    }
}
