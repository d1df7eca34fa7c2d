//! Daily quote history from Yahoo Finance.

use crate::error::{DataError, Result};
use crate::prices::PriceSource;
use crate::table::DailyBar;
use crate::window::LookbackWindow;
use chrono::{DateTime, NaiveDate, NaiveTime};
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;
use yahoo_finance_api as yahoo;

/// Source name used in errors.
pub const SOURCE_NAME: &str = "Yahoo Finance";

/// Default pause after each request.
pub const DEFAULT_RATE_LIMIT_DELAY: Duration = Duration::from_millis(100);

/// Yahoo Finance quote provider with rate limiting.
pub struct YahooPriceSource {
    provider: yahoo::YahooConnector,
    rate_limit_delay: Duration,
}

impl std::fmt::Debug for YahooPriceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YahooPriceSource")
            .field("rate_limit_delay", &self.rate_limit_delay)
            .finish_non_exhaustive()
    }
}

impl YahooPriceSource {
    /// Create a provider with the default delay between requests.
    pub fn new() -> Result<Self> {
        Self::with_rate_limit(DEFAULT_RATE_LIMIT_DELAY)
    }

    /// Create a provider that pauses `rate_limit_delay` after each request.
    pub fn with_rate_limit(rate_limit_delay: Duration) -> Result<Self> {
        let provider = yahoo::YahooConnector::new()?;
        Ok(Self {
            provider,
            rate_limit_delay,
        })
    }

    /// Pause applied after each request.
    pub const fn rate_limit_delay(&self) -> Duration {
        self.rate_limit_delay
    }
}

impl PriceSource for YahooPriceSource {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    async fn daily_history(&self, symbol: &str, window: &LookbackWindow) -> Result<Vec<DailyBar>> {
        if symbol.is_empty() {
            return Ok(Vec::new());
        }

        let start = to_offset(window.start())?;
        // Yahoo treats the end timestamp as exclusive.
        let end = to_offset(window.end().succ_opt().unwrap_or(window.end()))?;
        let ticker = yahoo_ticker(symbol);

        debug!(symbol, %ticker, %window, "requesting quote history");
        let response = self.provider.get_quote_history(&ticker, start, end).await;
        sleep(self.rate_limit_delay).await;

        match response.and_then(|response| response.quotes()) {
            Ok(quotes) => Ok(bars_from_quotes(&quotes, window)),
            Err(err) => empty_or_error(err),
        }
    }
}

/// Daily bars inside `window`, ascending, one per date.
fn bars_from_quotes(quotes: &[yahoo::Quote], window: &LookbackWindow) -> Vec<DailyBar> {
    let mut bars: Vec<DailyBar> = quotes
        .iter()
        .filter_map(|q| {
            let date = DateTime::from_timestamp(q.timestamp, 0)?.date_naive();
            Some(DailyBar {
                date,
                open: q.open,
                high: q.high,
                low: q.low,
                close: q.close,
                volume: q.volume,
                adjusted_close: q.adjclose,
            })
        })
        .filter(|bar| window.contains(bar.date))
        .collect();
    bars.sort_by_key(|bar| bar.date);
    bars.dedup_by_key(|bar| bar.date);
    bars
}

/// Unknown symbols and empty windows yield no bars; everything else is an error.
fn empty_or_error(err: yahoo::YahooError) -> Result<Vec<DailyBar>> {
    match err {
        yahoo::YahooError::NoQuotes | yahoo::YahooError::NoResult => Ok(Vec::new()),
        yahoo::YahooError::ApiError(ref message)
            if message.code.as_deref() == Some("Not Found") =>
        {
            Ok(Vec::new())
        }
        other => Err(other.into()),
    }
}

fn to_offset(date: NaiveDate) -> Result<time::OffsetDateTime> {
    let ts = date.and_time(NaiveTime::MIN).and_utc().timestamp();
    time::OffsetDateTime::from_unix_timestamp(ts)
        .map_err(|e| DataError::TimeConversion(e.to_string()))
}

/// Yahoo spells share classes with a dash (`BRK.B` -> `BRK-B`).
fn yahoo_ticker(symbol: &str) -> String {
    symbol.trim().replace('.', "-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("BRK.B", "BRK-B")]
    #[case("BF.B", "BF-B")]
    #[case(" AAPL ", "AAPL")]
    fn test_yahoo_ticker(#[case] symbol: &str, #[case] expected: &str) {
        assert_eq!(yahoo_ticker(symbol), expected);
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn quote(date: NaiveDate, open: f64) -> yahoo::Quote {
        yahoo::Quote {
            timestamp: date.and_hms_opt(14, 30, 0).unwrap().and_utc().timestamp(),
            open,
            high: open + 1.0,
            low: open - 1.0,
            volume: 1_000,
            close: open,
            adjclose: open,
        }
    }

    #[test]
    fn test_bars_from_quotes_filters_sorts_and_dedups() {
        let window = LookbackWindow::trailing(5, day(10)).unwrap();
        let quotes = vec![
            quote(day(8), 12.0),
            quote(day(4), 99.0),
            quote(day(5), 10.0),
            quote(day(10), 14.0),
            quote(day(8), 13.0),
            quote(day(11), 99.0),
        ];

        let bars = bars_from_quotes(&quotes, &window);
        let dates: Vec<NaiveDate> = bars.iter().map(|b| b.date).collect();

        assert_eq!(dates, vec![day(5), day(8), day(10)]);
        assert_eq!(bars[0].open, 10.0);
        assert_eq!(bars[2].open, 14.0);
        assert_eq!(bars[1].volume, 1_000);
    }

    #[test]
    fn test_bars_from_quotes_empty() {
        let window = LookbackWindow::trailing(5, day(10)).unwrap();
        assert!(bars_from_quotes(&[], &window).is_empty());
    }

    #[test]
    fn test_rate_limit_with_404_in_url_is_not_empty() {
        let err = yahoo::YahooError::TooManyRequests(
            "request url: https://query1.finance.yahoo.com/v8/finance/chart/AAPL?symbol=AAPL&period1=1790812800&period2=1793404800&interval=1d".to_string(),
        );
        assert!(matches!(
            empty_or_error(err),
            Err(DataError::RateLimited { .. })
        ));
    }

    #[rstest]
    #[case(yahoo::YahooError::NoQuotes)]
    #[case(yahoo::YahooError::NoResult)]
    fn test_empty_results(#[case] err: yahoo::YahooError) {
        assert!(empty_or_error(err).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_symbol_is_empty() {
        let chart: yahoo::YChart = serde_json::from_str(
            r#"{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}"#,
        )
        .unwrap();
        let err = yahoo::YahooError::ApiError(chart.error.unwrap());
        assert!(empty_or_error(err).unwrap().is_empty());
    }

    #[test]
    fn test_other_api_error_is_unavailable() {
        let chart: yahoo::YChart = serde_json::from_str(
            r#"{"result":null,"error":{"code":"Bad Request","description":"Invalid input"}}"#,
        )
        .unwrap();
        let err = yahoo::YahooError::ApiError(chart.error.unwrap());
        assert!(matches!(
            empty_or_error(err),
            Err(DataError::SourceUnavailable { .. })
        ));
    }

    #[test]
    fn test_connection_failure_is_unavailable() {
        let err = yahoo::YahooError::FetchFailed("HTTP error: 503 Service Unavailable".into());
        assert!(matches!(
            empty_or_error(err),
            Err(DataError::SourceUnavailable { .. })
        ));
    }

    #[test]
    fn test_to_offset_is_midnight_utc() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let offset = to_offset(date).unwrap();
        assert_eq!(offset.unix_timestamp(), 1_704_153_600);
    }

    #[tokio::test]
    #[ignore = "requires network access to Yahoo Finance"]
    async fn test_fetch_quotes_live() {
        let source = YahooPriceSource::new().unwrap();
        let window = LookbackWindow::ending_today(30).unwrap();

        let bars = source.daily_history("AAPL", &window).await.unwrap();
        assert!(!bars.is_empty());
        assert!(bars.iter().all(|b| window.contains(b.date)));
        assert!(bars.windows(2).all(|w| w[0].date < w[1].date));
    }
}
