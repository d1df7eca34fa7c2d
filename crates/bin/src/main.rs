//! Moments CLI binary.
//!
//! Lists index constituents, fetches their recent price history, and prints
//! the mean and covariance of Open prices.

mod output;

use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use moments::{
    DEFAULT_LOOKBACK_DAYS, FetchConfig, Pipeline, PipelineConfig, PriceSource, StaticSymbols,
    SymbolSource, TableLocator, WikipediaConstituents, YahooPriceSource,
};
use moments_data::constituents::wikipedia::SP500_URL;
use std::process;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "moments")]
#[command(about = "Mean and covariance of index constituent Open prices", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List index constituents from the reference page
    Symbols {
        /// Page holding the constituents table
        #[arg(long, default_value = SP500_URL)]
        url: String,

        /// Zero-based index of the table on the page
        #[arg(long, default_value = "1")]
        table: usize,

        /// Zero-based index of the symbol column
        #[arg(long, default_value = "0")]
        column: usize,
    },

    /// Fetch daily prices for the trailing window
    Prices {
        #[command(flatten)]
        fetch: FetchArgs,
    },

    /// Compute mean and covariance of Open prices
    Stats {
        #[command(flatten)]
        fetch: FetchArgs,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
}

#[derive(clap::Args)]
struct FetchArgs {
    /// Lookback window in days
    #[arg(long, default_value_t = DEFAULT_LOOKBACK_DAYS, allow_negative_numbers = true)]
    days: i64,

    /// Comma-separated symbols (default: scrape the S&P 500 list)
    #[arg(long)]
    symbols: Option<String>,

    /// Fail if any symbol has no data
    #[arg(long)]
    strict: bool,

    /// Maximum concurrent price requests
    #[arg(long, default_value_t = moments_data::prices::DEFAULT_CONCURRENCY)]
    concurrency: usize,
}

impl FetchArgs {
    fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            lookback_days: self.days,
            fetch: FetchConfig {
                concurrency: self.concurrency,
                strict: self.strict,
            },
            ..Default::default()
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Symbols { url, table, column } => {
            let locator = TableLocator {
                table_index: table,
                column,
                ..Default::default()
            };
            let source = WikipediaConstituents::with_locator(url, locator)?;
            let symbols = source.symbols().await?;
            for symbol in &symbols {
                println!("{}", symbol);
            }
            eprintln!("{} symbols", symbols.len());
        }
        Commands::Prices { fetch } => {
            let prices = YahooPriceSource::new()?;
            match fetch.symbols.as_deref() {
                Some(list) => show_prices(StaticSymbols::from_csv(list), prices, &fetch).await?,
                None => show_prices(WikipediaConstituents::new()?, prices, &fetch).await?,
            }
        }
        Commands::Stats { fetch, format } => {
            let prices = YahooPriceSource::new()?;
            match fetch.symbols.as_deref() {
                Some(list) => {
                    show_stats(StaticSymbols::from_csv(list), prices, &fetch, format).await?;
                }
                None => show_stats(WikipediaConstituents::new()?, prices, &fetch, format).await?,
            }
        }
    }

    Ok(())
}

fn spinner(message: &'static str) -> Result<ProgressBar, Box<dyn std::error::Error>> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

async fn show_prices<S, P>(
    symbols: S,
    prices: P,
    args: &FetchArgs,
) -> Result<(), Box<dyn std::error::Error>>
where
    S: SymbolSource + Sync,
    P: PriceSource + Sync,
{
    let pipeline = Pipeline::new(symbols, prices, args.pipeline_config())?;

    let pb = spinner("Listing symbols...")?;
    let listed = pipeline.list_symbols().await;
    let listed = match listed {
        Ok(listed) => listed,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e.into());
        }
    };
    pb.set_message(format!("Fetching {} symbols...", listed.len()));
    let table = pipeline.fetch_prices(&listed).await;
    pb.finish_and_clear();

    print!("{}", output::render_prices(&table?)?);
    Ok(())
}

async fn show_stats<S, P>(
    symbols: S,
    prices: P,
    args: &FetchArgs,
    format: Format,
) -> Result<(), Box<dyn std::error::Error>>
where
    S: SymbolSource + Sync,
    P: PriceSource + Sync,
{
    let pipeline = Pipeline::new(symbols, prices, args.pipeline_config())?;

    let pb = spinner("Running pipeline...")?;
    let report = pipeline.run().await;
    pb.finish_and_clear();
    let report = report?;

    match format {
        Format::Text => print!("{}", output::render_report_text(&report)),
        Format::Json => println!(
            "{}",
            serde_json::to_string_pretty(&output::report_json(&report))?
        ),
    }
    Ok(())
}
