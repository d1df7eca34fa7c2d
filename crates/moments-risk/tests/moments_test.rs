//! Integration tests for column alignment of portfolio moments

use approx::assert_abs_diff_eq;
use moments_risk::{MomentsCalculator, StatisticsError};
use ndarray::{Array2, Axis, array};
use rstest::rstest;

fn panel() -> (Vec<String>, Array2<f64>) {
    let symbols = ["AAA", "BBB", "CCC"].map(String::from).to_vec();
    let prices = array![
        [10.0, 50.0, 7.0],
        [11.0, 49.0, 7.5],
        [13.0, 47.5, 7.2],
        [12.0, 48.0, 8.1],
        [14.0, 46.0, 7.9],
    ];
    (symbols, prices)
}

#[rstest]
#[case([0, 1, 2])]
#[case([0, 2, 1])]
#[case([1, 0, 2])]
#[case([1, 2, 0])]
#[case([2, 0, 1])]
#[case([2, 1, 0])]
fn test_output_order_follows_input_columns(#[case] order: [usize; 3]) {
    let (symbols, prices) = panel();
    let calc = MomentsCalculator::sample();
    let base = calc.compute(&symbols, &prices).unwrap();

    let permuted_symbols: Vec<String> = order.iter().map(|&j| symbols[j].clone()).collect();
    let permuted_prices = prices.select(Axis(1), &order);
    let permuted = calc.compute(&permuted_symbols, &permuted_prices).unwrap();

    assert_eq!(permuted.symbols(), permuted_symbols.as_slice());
    for (i, &oi) in order.iter().enumerate() {
        assert_abs_diff_eq!(permuted.mean()[i], base.mean()[oi], epsilon = 1e-12);
        for (j, &oj) in order.iter().enumerate() {
            assert_abs_diff_eq!(
                permuted.covariance()[[i, j]],
                base.covariance()[[oi, oj]],
                epsilon = 1e-12
            );
        }
    }
}

#[test]
fn test_covariance_is_symmetric_with_nonnegative_diagonal() {
    let (symbols, prices) = panel();
    let moments = MomentsCalculator::sample().compute(&symbols, &prices).unwrap();
    let cov = moments.covariance();

    for i in 0..3 {
        assert!(cov[[i, i]] >= 0.0);
        for j in 0..3 {
            assert_abs_diff_eq!(cov[[i, j]], cov[[j, i]], epsilon = 1e-12);
        }
    }
}

#[test]
fn test_empty_panel_is_degenerate() {
    let symbols = vec!["AAA".to_string()];
    let prices = Array2::<f64>::zeros((0, 1));
    let err = MomentsCalculator::sample()
        .compute(&symbols, &prices)
        .unwrap_err();

    assert!(err.is_degenerate());
    assert!(matches!(err, StatisticsError::NoUsableSymbols));
}
