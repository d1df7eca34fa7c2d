//! Text and JSON rendering for CLI output.

use moments::data::{DataError, MissingSymbol, OpenPrices};
use moments::{PipelineReport, PriceTable};
use serde_json::{Value, json};
use std::fmt;

/// Widest matrix printed in text mode.
const MAX_MATRIX_COLUMNS: usize = 8;

/// Most dates printed by the `prices` command.
const MAX_PRICE_ROWS: usize = 10;

fn write_missing(f: &mut fmt::Formatter<'_>, missing: &[MissingSymbol]) -> fmt::Result {
    if missing.is_empty() {
        return Ok(());
    }
    writeln!(f, "\nMissing:")?;
    for m in missing {
        writeln!(f, "  {:<8} {}", m.symbol, m.reason)?;
    }
    Ok(())
}

/// Fetch summary plus the most recent Open prices.
struct PricesView<'a> {
    table: &'a PriceTable,
    open: &'a OpenPrices,
}

impl fmt::Display for PricesView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let open = self.open;
        writeln!(f, "Window:       {}", self.table.window())?;
        writeln!(f, "Symbols:      {}", self.table.symbols().len())?;
        writeln!(f, "Trading days: {}", open.dates.len())?;
        writeln!(f, "Rows:         {}", self.table.height())?;

        let shown = open.symbols.len().min(MAX_MATRIX_COLUMNS);
        write!(f, "\nOpen{:>8}", "")?;
        for symbol in &open.symbols[..shown] {
            write!(f, "{:>10}", symbol)?;
        }
        writeln!(f)?;

        let first = open.dates.len().saturating_sub(MAX_PRICE_ROWS);
        for (i, date) in open.dates.iter().enumerate().skip(first) {
            write!(f, "{}", date)?;
            for j in 0..shown {
                write!(f, "{:>10.2}", open.values[[i, j]])?;
            }
            writeln!(f)?;
        }

        write_missing(f, self.table.missing())
    }
}

/// Summary plus the most recent Open prices.
pub(crate) fn render_prices(table: &PriceTable) -> Result<String, DataError> {
    let open = table.open_prices()?;
    Ok(PricesView {
        table,
        open: &open,
    }
    .to_string())
}

/// Human-readable moments report.
struct ReportView<'a>(&'a PipelineReport);

impl fmt::Display for ReportView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        let moments = &report.moments;

        writeln!(f, "Window:       {}", report.table.window())?;
        writeln!(f, "Listed:       {}", report.listed.len())?;
        writeln!(
            f,
            "Priced:       {} ({} missing)",
            report.table.symbols().len(),
            report.table.missing().len()
        )?;
        writeln!(
            f,
            "Used:         {} over {} observations ({} excluded, {} rows dropped)",
            moments.symbols().len(),
            moments.observations(),
            moments.excluded().len(),
            moments.dropped_rows()
        )?;

        writeln!(f, "\n{:<8} {:>12} {:>12}", "Symbol", "Mean Open", "Std Dev")?;
        let vols = moments.volatilities();
        for (i, symbol) in moments.symbols().iter().enumerate() {
            writeln!(
                f,
                "{:<8} {:>12.4} {:>12.4}",
                symbol,
                moments.mean()[i],
                vols[i]
            )?;
        }

        let shown = moments.symbols().len().min(MAX_MATRIX_COLUMNS);
        let cov = moments.covariance();
        writeln!(f, "\nCovariance (first {} symbols):", shown)?;
        write!(f, "{:<8}", "")?;
        for symbol in &moments.symbols()[..shown] {
            write!(f, " {:>12}", symbol)?;
        }
        writeln!(f)?;
        for i in 0..shown {
            write!(f, "{:<8}", moments.symbols()[i])?;
            for j in 0..shown {
                write!(f, " {:>12.4}", cov[[i, j]])?;
            }
            writeln!(f)?;
        }

        if !moments.excluded().is_empty() {
            writeln!(f, "\nExcluded: {}", moments.excluded().join(", "))?;
        }
        write_missing(f, report.table.missing())
    }
}

pub(crate) fn render_report_text(report: &PipelineReport) -> String {
    ReportView(report).to_string()
}

/// Machine-readable moments report.
pub(crate) fn report_json(report: &PipelineReport) -> Value {
    let moments = &report.moments;
    let covariance: Vec<Vec<f64>> = moments
        .covariance()
        .rows()
        .into_iter()
        .map(|row| row.to_vec())
        .collect();
    let missing: Vec<Value> = report
        .table
        .missing()
        .iter()
        .map(|m| json!({ "symbol": m.symbol, "reason": m.reason.to_string() }))
        .collect();

    json!({
        "window": {
            "start": report.table.window().start().to_string(),
            "end": report.table.window().end().to_string(),
        },
        "listed": report.listed.len(),
        "observations": moments.observations(),
        "dropped_rows": moments.dropped_rows(),
        "symbols": moments.symbols(),
        "mean": moments.mean().to_vec(),
        "covariance": covariance,
        "excluded": moments.excluded(),
        "missing": missing,
    })
}
