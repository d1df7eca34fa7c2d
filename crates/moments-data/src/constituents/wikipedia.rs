//! S&P 500 constituents scraped from Wikipedia.

use super::{SymbolSource, TableLocator};
use crate::error::{DataError, Result};
use reqwest::StatusCode;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::{debug, info};

/// Wikipedia page listing the S&P 500 constituents.
pub const SP500_URL: &str = "https://en.wikipedia.org/wiki/List_of_S%26P_500_companies";

/// User agent for page requests (Wikipedia rejects anonymous clients)
const USER_AGENT: &str = "moments/0.1 (+https://github.com/factordynamics/moments)";

const SOURCE_NAME: &str = "constituents page";

/// Constituent list scraped from an HTML table on a reference page.
#[derive(Debug, Clone)]
pub struct WikipediaConstituents {
    client: reqwest::Client,
    url: String,
    locator: TableLocator,
}

impl WikipediaConstituents {
    /// Create a scraper for the S&P 500 page with the default table layout.
    pub fn new() -> Result<Self> {
        Self::with_locator(SP500_URL, TableLocator::default())
    }

    /// Create a scraper for an arbitrary page and table layout.
    pub fn with_locator(url: impl Into<String>, locator: TableLocator) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DataError::unavailable(SOURCE_NAME, e))?;

        Ok(Self {
            client,
            url: url.into(),
            locator,
        })
    }

    /// Page being scraped.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Table layout being scraped.
    pub const fn locator(&self) -> &TableLocator {
        &self.locator
    }

    async fn fetch_page(&self) -> Result<String> {
        debug!(url = %self.url, "fetching constituents page");

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| DataError::unavailable(SOURCE_NAME, e))?;

        check_status(response.status(), &self.url)?;

        response
            .text()
            .await
            .map_err(|e| DataError::unavailable(SOURCE_NAME, e))
    }
}

impl SymbolSource for WikipediaConstituents {
    async fn symbols(&self) -> Result<Vec<String>> {
        let html = self.fetch_page().await?;
        let symbols = parse_constituents(&html, &self.locator)?;
        info!(count = symbols.len(), "listed index constituents");
        Ok(symbols)
    }
}

/// Map a page response status onto the error taxonomy.
fn check_status(status: StatusCode, url: &str) -> Result<()> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(DataError::rate_limited(SOURCE_NAME));
    }
    if !status.is_success() {
        return Err(DataError::unavailable(
            SOURCE_NAME,
            format!("HTTP {status} from {url}"),
        ));
    }
    Ok(())
}

fn selector(css: &'static str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| DataError::Parse(format!("selector {css:?}: {e:?}")))
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

/// Extract one column of one table from an HTML document.
///
/// Rows are returned in page order after skipping `locator.header_rows`.
///
/// # Errors
/// Returns [`DataError::SchemaMismatch`] when the table or column is absent,
/// when a symbol cell is empty, or when the table has no data rows.
pub fn parse_constituents(html: &str, locator: &TableLocator) -> Result<Vec<String>> {
    let table_sel = selector("table")?;
    let row_sel = selector("tr")?;
    let cell_sel = selector("th, td")?;

    let document = Html::parse_document(html);
    let tables: Vec<ElementRef<'_>> = document.select(&table_sel).collect();
    let table = tables.get(locator.table_index).ok_or_else(|| {
        DataError::SchemaMismatch(format!(
            "expected table #{} but page has {} table(s)",
            locator.table_index,
            tables.len()
        ))
    })?;

    let mut symbols = Vec::new();
    for (row_idx, row) in table
        .select(&row_sel)
        .enumerate()
        .skip(locator.header_rows)
    {
        let cell = row.select(&cell_sel).nth(locator.column).ok_or_else(|| {
            DataError::SchemaMismatch(format!(
                "row {row_idx} of table #{} has no column {}",
                locator.table_index, locator.column
            ))
        })?;

        let symbol = cell_text(cell);
        if symbol.is_empty() {
            return Err(DataError::SchemaMismatch(format!(
                "row {row_idx} of table #{} has an empty symbol cell",
                locator.table_index
            )));
        }
        symbols.push(symbol);
    }

    if symbols.is_empty() {
        return Err(DataError::SchemaMismatch(format!(
            "table #{} has no data rows",
            locator.table_index
        )));
    }

    Ok(symbols)
}
