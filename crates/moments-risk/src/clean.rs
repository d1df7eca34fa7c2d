//! Missing-value handling ahead of moment estimation.
//!
//! Columns with no finite value are dropped and reported. Rows with a
//! non-finite value in any remaining column are then dropped, so means and
//! covariances are computed over exactly the same set of dates.

use crate::error::{Result, StatisticsError};
use ndarray::{Array2, Axis};
use tracing::debug;

/// Price panel restricted to complete rows and non-empty columns.
#[derive(Debug, Clone)]
pub struct CompleteObservations {
    /// Kept column labels, in input order
    pub symbols: Vec<String>,
    /// `rows x symbols.len()`, every value finite
    pub values: Array2<f64>,
    /// Input columns that had no finite value at all
    pub excluded: Vec<String>,
    /// Input rows removed because of a gap in a kept column
    pub dropped_rows: usize,
}

/// Restrict `prices` to non-empty columns and complete rows.
///
/// # Errors
/// - [`StatisticsError::DimensionMismatch`] when `symbols` and the column
///   count disagree
/// - [`StatisticsError::NoUsableSymbols`] when no column has data
pub fn complete_observations(
    symbols: &[String],
    prices: &Array2<f64>,
) -> Result<CompleteObservations> {
    if symbols.len() != prices.ncols() {
        return Err(StatisticsError::DimensionMismatch {
            expected: symbols.len(),
            actual: prices.ncols(),
        });
    }

    let mut kept_cols = Vec::with_capacity(symbols.len());
    let mut excluded = Vec::new();
    for (j, column) in prices.axis_iter(Axis(1)).enumerate() {
        if column.iter().any(|v| v.is_finite()) {
            kept_cols.push(j);
        } else {
            excluded.push(symbols[j].clone());
        }
    }

    if kept_cols.is_empty() {
        return Err(StatisticsError::NoUsableSymbols);
    }

    let narrowed = prices.select(Axis(1), &kept_cols);
    let kept_rows: Vec<usize> = narrowed
        .axis_iter(Axis(0))
        .enumerate()
        .filter(|(_, row)| row.iter().all(|v| v.is_finite()))
        .map(|(i, _)| i)
        .collect();
    let dropped_rows = narrowed.nrows() - kept_rows.len();

    if !excluded.is_empty() || dropped_rows > 0 {
        debug!(
            excluded = excluded.len(),
            dropped_rows, "removed incomplete observations"
        );
    }

    Ok(CompleteObservations {
        symbols: kept_cols.iter().map(|&j| symbols[j].clone()).collect(),
        values: narrowed.select(Axis(0), &kept_rows),
        excluded,
        dropped_rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn labels(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_complete_panel_unchanged() {
        let prices = array![[1.0, 2.0], [3.0, 4.0]];
        let clean = complete_observations(&labels(&["A", "B"]), &prices).unwrap();

        assert_eq!(clean.symbols, labels(&["A", "B"]));
        assert_eq!(clean.values, prices);
        assert!(clean.excluded.is_empty());
        assert_eq!(clean.dropped_rows, 0);
    }

    #[test]
    fn test_empty_column_excluded() {
        let nan = f64::NAN;
        let prices = array![[1.0, nan, 2.0], [3.0, nan, 4.0]];
        let clean = complete_observations(&labels(&["A", "GONE", "B"]), &prices).unwrap();

        assert_eq!(clean.symbols, labels(&["A", "B"]));
        assert_eq!(clean.excluded, labels(&["GONE"]));
        assert_eq!(clean.values, array![[1.0, 2.0], [3.0, 4.0]]);
    }

    #[test]
    fn test_incomplete_rows_dropped() {
        let nan = f64::NAN;
        let prices = array![[1.0, 2.0], [nan, 4.0], [5.0, 6.0], [7.0, f64::INFINITY]];
        let clean = complete_observations(&labels(&["A", "B"]), &prices).unwrap();

        assert_eq!(clean.dropped_rows, 2);
        assert_eq!(clean.values, array![[1.0, 2.0], [5.0, 6.0]]);
    }

    #[test]
    fn test_all_empty_columns() {
        let prices = Array2::<f64>::from_elem((3, 2), f64::NAN);
        let err = complete_observations(&labels(&["A", "B"]), &prices).unwrap_err();
        assert!(matches!(err, StatisticsError::NoUsableSymbols));
    }

    #[test]
    fn test_label_count_mismatch() {
        let prices = Array2::<f64>::zeros((3, 2));
        let err = complete_observations(&labels(&["A"]), &prices).unwrap_err();
        assert!(matches!(
            err,
            StatisticsError::DimensionMismatch {
                expected: 1,
                actual: 2
            }
        ));
    }
}
