//! Utilities for moment matrices

use ndarray::{Array1, Array2, Axis};

/// Arithmetic mean of each column.
///
/// Returns an empty vector for a matrix with no rows.
pub fn column_means(observations: &Array2<f64>) -> Array1<f64> {
    observations
        .mean_axis(Axis(0))
        .unwrap_or_else(|| Array1::zeros(0))
}

/// Convert a covariance matrix into a correlation matrix
///
/// ρ(i,j) = Cov(i,j) / (σ_i σ_j)
///
/// # Returns
/// * `None` if the matrix is not square or any variance is not strictly positive
pub fn correlation_from_covariance(cov: &Array2<f64>) -> Option<Array2<f64>> {
    let n = cov.nrows();
    if n != cov.ncols() {
        return None;
    }

    let std_devs = cov.diag().mapv(f64::sqrt);
    if std_devs.iter().any(|&s| s.is_nan() || s <= 0.0) {
        return None;
    }

    let mut corr = Array2::<f64>::zeros((n, n));
    for i in 0..n {
        for j in 0..n {
            corr[[i, j]] = if i == j {
                1.0
            } else {
                (cov[[i, j]] / (std_devs[i] * std_devs[j])).clamp(-1.0, 1.0)
            };
        }
    }

    Some(corr)
}
