//! In-memory price table produced by one fetch.

use crate::error::{DataError, Result};
use crate::window::LookbackWindow;
use chrono::NaiveDate;
use ndarray::Array2;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// One trading day for one symbol.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    /// Trading date
    pub date: NaiveDate,
    /// Price at market open
    pub open: f64,
    /// Intraday high
    pub high: f64,
    /// Intraday low
    pub low: f64,
    /// Price at market close
    pub close: f64,
    /// Shares traded
    pub volume: u64,
    /// Close adjusted for splits and dividends
    pub adjusted_close: f64,
}

impl DailyBar {
    /// Bar where every price field equals `price`.
    pub const fn flat(date: NaiveDate, price: f64) -> Self {
        Self {
            date,
            open: price,
            high: price,
            low: price,
            close: price,
            volume: 0,
            adjusted_close: price,
        }
    }
}

/// Daily bars fetched for a single symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolHistory {
    /// Ticker as requested
    pub symbol: String,
    /// Bars in ascending date order
    pub bars: Vec<DailyBar>,
}

/// Why a requested symbol has no rows in the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissingReason {
    /// The source returned nothing for the window (unknown or delisted symbol).
    NoData,
    /// The source rate limited the request.
    RateLimited,
    /// The request failed.
    Unavailable(String),
}

impl fmt::Display for MissingReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoData => write!(f, "no data in window"),
            Self::RateLimited => write!(f, "rate limited"),
            Self::Unavailable(reason) => write!(f, "unavailable: {reason}"),
        }
    }
}

/// A requested symbol that is absent from the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingSymbol {
    /// Ticker as requested
    pub symbol: String,
    /// Cause
    pub reason: MissingReason,
}

/// Open prices pivoted to one row per date and one column per symbol.
#[derive(Debug, Clone)]
pub struct OpenPrices {
    /// Row labels, ascending
    pub dates: Vec<NaiveDate>,
    /// Column labels, in table order
    pub symbols: Vec<String>,
    /// `dates.len() x symbols.len()`; `NaN` where a symbol has no bar for a date
    pub values: Array2<f64>,
}

/// Daily price history for a set of symbols over one window.
///
/// Backed by a long-form DataFrame with columns
/// `symbol, date, open, high, low, close, volume, adjusted_close`.
#[derive(Debug, Clone)]
pub struct PriceTable {
    frame: DataFrame,
    symbols: Vec<String>,
    missing: Vec<MissingSymbol>,
    window: LookbackWindow,
}

impl PriceTable {
    /// Build a table from per-symbol histories.
    ///
    /// Histories with no bars are moved to [`PriceTable::missing`] with
    /// [`MissingReason::NoData`].
    ///
    /// # Errors
    /// [`DataError::Parse`] if a symbol appears in two histories or has two
    /// bars for the same date.
    pub fn from_histories(
        window: LookbackWindow,
        histories: Vec<SymbolHistory>,
        mut missing: Vec<MissingSymbol>,
    ) -> Result<Self> {
        let mut symbols = Vec::with_capacity(histories.len());
        let mut sym_col = Vec::new();
        let mut dates = Vec::new();
        let mut opens = Vec::new();
        let mut highs = Vec::new();
        let mut lows = Vec::new();
        let mut closes = Vec::new();
        let mut volumes = Vec::new();
        let mut adj_closes = Vec::new();

        let mut seen = HashSet::new();
        for history in histories {
            if !seen.insert(history.symbol.clone()) {
                return Err(DataError::Parse(format!(
                    "duplicate history for {}",
                    history.symbol
                )));
            }
            if history.bars.is_empty() {
                missing.push(MissingSymbol {
                    symbol: history.symbol,
                    reason: MissingReason::NoData,
                });
                continue;
            }

            let mut days = HashSet::with_capacity(history.bars.len());
            for bar in &history.bars {
                if !days.insert(bar.date) {
                    return Err(DataError::Parse(format!(
                        "duplicate bar for {} on {}",
                        history.symbol, bar.date
                    )));
                }
                sym_col.push(history.symbol.clone());
                dates.push(bar.date.format(DATE_FORMAT).to_string());
                opens.push(bar.open);
                highs.push(bar.high);
                lows.push(bar.low);
                closes.push(bar.close);
                volumes.push(bar.volume);
                adj_closes.push(bar.adjusted_close);
            }
            symbols.push(history.symbol);
        }

        let frame = DataFrame::new(vec![
            Series::new("symbol".into(), sym_col).into(),
            Series::new("date".into(), dates).into(),
            Series::new("open".into(), opens).into(),
            Series::new("high".into(), highs).into(),
            Series::new("low".into(), lows).into(),
            Series::new("close".into(), closes).into(),
            Series::new("volume".into(), volumes).into(),
            Series::new("adjusted_close".into(), adj_closes).into(),
        ])?;

        let frame = frame
            .lazy()
            .with_column(col("date").cast(DataType::Date))
            .collect()?;

        Ok(Self {
            frame,
            symbols,
            missing,
            window,
        })
    }

    /// Underlying long-form DataFrame.
    pub const fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Symbols with at least one row, in request order.
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Requested symbols without rows.
    pub fn missing(&self) -> &[MissingSymbol] {
        &self.missing
    }

    /// Window the table was fetched for.
    pub const fn window(&self) -> &LookbackWindow {
        &self.window
    }

    /// Number of long-form rows (symbol-days).
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    /// Whether the table has no rows at all.
    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// Distinct trading dates, ascending.
    pub fn dates(&self) -> Result<Vec<NaiveDate>> {
        let set: BTreeSet<NaiveDate> = self.read_dates()?.into_iter().collect();
        Ok(set.into_iter().collect())
    }

    /// Number of distinct trading dates.
    pub fn trading_days(&self) -> Result<usize> {
        self.dates().map(|d| d.len())
    }

    /// Pivot the `open` column into a date x symbol matrix.
    pub fn open_prices(&self) -> Result<OpenPrices> {
        let row_dates = self.read_dates()?;
        let symbols = self.frame.column("symbol")?.str()?;
        let opens = self.frame.column("open")?.f64()?;

        let dates: Vec<NaiveDate> = row_dates
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let date_idx: HashMap<NaiveDate, usize> =
            dates.iter().enumerate().map(|(i, d)| (*d, i)).collect();
        let symbol_idx: HashMap<&str, usize> = self
            .symbols
            .iter()
            .enumerate()
            .map(|(i, s)| (s.as_str(), i))
            .collect();

        let mut values = Array2::<f64>::from_elem((dates.len(), self.symbols.len()), f64::NAN);

        for (i, date) in row_dates.iter().enumerate() {
            let symbol = symbols
                .get(i)
                .ok_or_else(|| DataError::Parse("Missing symbol".to_string()))?;
            let col_idx = symbol_idx
                .get(symbol)
                .copied()
                .ok_or_else(|| DataError::Parse(format!("Unexpected symbol {symbol}")))?;
            let row_idx = date_idx[date];
            values[[row_idx, col_idx]] = opens.get(i).unwrap_or(f64::NAN);
        }

        Ok(OpenPrices {
            dates,
            symbols: self.symbols.clone(),
            values,
        })
    }

    fn read_dates(&self) -> Result<Vec<NaiveDate>> {
        let dates = self.frame.column("date")?.cast(&DataType::String)?;
        let dates = dates.str()?;

        (0..dates.len())
            .map(|i| {
                let raw = dates
                    .get(i)
                    .ok_or_else(|| DataError::Parse("Missing date".to_string()))?;
                NaiveDate::parse_from_str(raw, DATE_FORMAT)
                    .map_err(|e| DataError::Parse(format!("date {raw:?}: {e}")))
            })
            .collect()
    }
}
