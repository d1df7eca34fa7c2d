//! Integration tests for batched price fetching against an in-memory source

use chrono::NaiveDate;
use moments_data::{
    DailyBar, DataError, FetchConfig, LookbackWindow, PriceFetcher, PriceSource, Result,
};
use std::collections::BTreeMap;

/// Serves a fixed `symbol -> bars` map, like a bulk historical-quotes response.
#[derive(Debug)]
struct MockQuotes {
    data: BTreeMap<&'static str, Vec<DailyBar>>,
}

impl MockQuotes {
    /// `symbols` each get `days` consecutive bars starting 2024-02-01.
    fn new(symbols: &[&'static str], days: u32) -> Self {
        let data = symbols
            .iter()
            .enumerate()
            .map(|(s, &symbol)| {
                let bars = (0..days)
                    .map(|d| DailyBar::flat(date(1 + d), 100.0 * (s + 1) as f64 + f64::from(d)))
                    .collect();
                (symbol, bars)
            })
            .collect();
        Self { data }
    }
}

impl PriceSource for MockQuotes {
    fn name(&self) -> &str {
        "mock"
    }

    async fn daily_history(&self, symbol: &str, window: &LookbackWindow) -> Result<Vec<DailyBar>> {
        Ok(self
            .data
            .get(symbol)
            .map(|bars| {
                bars.iter()
                    .copied()
                    .filter(|b| window.contains(b.date))
                    .collect()
            })
            .unwrap_or_default())
    }
}

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 2, d).unwrap()
}

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_table_has_one_row_per_trading_day() {
    let fetcher = PriceFetcher::new(MockQuotes::new(&["A", "B", "C"], 7));
    let window = LookbackWindow::trailing(28, date(29)).unwrap();

    let table = fetcher
        .fetch_window(&owned(&["A", "B", "C"]), &window)
        .await
        .unwrap();

    assert_eq!(table.trading_days().unwrap(), 7);
    assert_eq!(table.height(), 21);

    let open = table.open_prices().unwrap();
    assert_eq!(open.values.dim(), (7, 3));
    assert!(open.values.iter().all(|v| v.is_finite()));
}

#[tokio::test]
async fn test_no_fabricated_symbols() {
    let fetcher = PriceFetcher::new(MockQuotes::new(&["A", "B", "C"], 5));
    let window = LookbackWindow::trailing(28, date(29)).unwrap();

    let table = fetcher
        .fetch_window(&owned(&["B", "Q", "A", "C"]), &window)
        .await
        .unwrap();

    assert_eq!(table.symbols(), owned(&["B", "A", "C"]).as_slice());
    assert_eq!(table.missing().len(), 1);
    assert_eq!(table.missing()[0].symbol, "Q");
    assert_eq!(table.open_prices().unwrap().symbols, owned(&["B", "A", "C"]));
}

#[tokio::test]
async fn test_window_filters_rows() {
    let fetcher = PriceFetcher::new(MockQuotes::new(&["A"], 10));
    // 2024-02-06 ..= 2024-02-08
    let window = LookbackWindow::trailing(2, date(8)).unwrap();

    let table = fetcher.fetch_window(&owned(&["A"]), &window).await.unwrap();

    assert_eq!(table.dates().unwrap(), vec![date(6), date(7), date(8)]);
}

#[tokio::test]
async fn test_window_without_rows_is_no_data() {
    let fetcher = PriceFetcher::with_config(
        MockQuotes::new(&["A", "B"], 3),
        FetchConfig {
            concurrency: 1,
            strict: false,
        },
    );
    let window = LookbackWindow::trailing(5, date(28)).unwrap();

    let err = fetcher
        .fetch_window(&owned(&["A", "B"]), &window)
        .await
        .unwrap_err();

    assert!(matches!(err, DataError::NoDataForWindow { .. }));
}
