//! Demo of the full moments pipeline.
//!
//! This example demonstrates how to:
//! - Scrape the S&P 500 constituents from Wikipedia
//! - Fetch 30 days of daily prices for a handful of them from Yahoo Finance
//! - Compute the mean Open price and the covariance matrix
//!
//! Run with: cargo run --example pipeline_demo

use moments::{
    Pipeline, PipelineConfig, StaticSymbols, SymbolSource, WikipediaConstituents, YahooPriceSource,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Fetching S&P 500 constituents...");
    let constituents = WikipediaConstituents::new()?.symbols().await?;
    println!("  {} symbols listed", constituents.len());

    // Keep the demo quick: only the first five constituents
    let subset: Vec<String> = constituents.into_iter().take(5).collect();
    println!("  Using {:?}", subset);

    let pipeline = Pipeline::new(
        StaticSymbols::new(subset),
        YahooPriceSource::new()?,
        PipelineConfig::default(),
    )?;

    println!(
        "\nRunning pipeline over the last {} days...",
        pipeline.lookback_days()
    );
    let report = pipeline.run().await?;
    let moments = &report.moments;

    println!("\nWindow: {}", report.table.window());
    println!("Observations: {}", moments.observations());
    for (i, symbol) in moments.symbols().iter().enumerate() {
        println!(
            "  {:<6} mean open {:>10.2}  std dev {:>8.2}",
            symbol,
            moments.mean()[i],
            moments.volatilities()[i]
        );
    }

    if let Some(corr) = moments.correlation() {
        println!("\nCorrelation matrix:\n{:.3}", corr);
    }

    for missing in report.table.missing() {
        println!("Missing {}: {}", missing.symbol, missing.reason);
    }

    Ok(())
}
