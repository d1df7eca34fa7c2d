#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/moments/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod clean;
pub mod covariance;
pub mod error;
pub mod moments;

// Re-export main types
pub use covariance::{CovarianceEstimator, SampleCovarianceEstimator};
pub use error::{Result, StatisticsError};
pub use moments::{MomentsCalculator, MomentsConfig, PortfolioMoments};
