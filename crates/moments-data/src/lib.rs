#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/moments/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod constituents;
pub mod error;
pub mod prices;
pub mod table;
pub mod window;
pub mod yahoo;

pub use constituents::{StaticSymbols, SymbolSource, TableLocator, WikipediaConstituents};
pub use error::{DataError, Result};
pub use prices::{FetchConfig, PriceFetcher, PriceSource};
pub use table::{DailyBar, MissingReason, MissingSymbol, OpenPrices, PriceTable, SymbolHistory};
pub use window::LookbackWindow;
pub use yahoo::YahooPriceSource;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
