#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/moments/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod pipeline;

// Re-export main types from sub-crates
pub use moments_data as data;
pub use moments_risk as risk;

pub use data::{
    FetchConfig, LookbackWindow, PriceFetcher, PriceSource, PriceTable, StaticSymbols,
    SymbolSource, TableLocator, WikipediaConstituents, YahooPriceSource,
};
pub use pipeline::{
    DEFAULT_LOOKBACK_DAYS, MomentsError, Pipeline, PipelineConfig, PipelineReport, Result,
    compute_statistics,
};
pub use risk::{MomentsCalculator, PortfolioMoments};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
