//! GHG Baseline Estimator
//!
//! Predicts annual emissions for companies with little or no history.
//!
//! ## Overview
//!
//! - **Synthetic population**: a seeded, reproducible set of companies drawn
//!   around industry intensity benchmarks (t CO2e per $M revenue)
//! - **LogLinearModel**: least squares on log-transformed revenue, intensity
//!   and size measures, solved by SVD
//! - **RegressionEstimator**: point estimate from the full fit, 10th/90th
//!   percentile interval from a bootstrap ensemble, scope split by industry
//!
//! The estimator implements [`ghg_domain::traits::BaselineEstimator`], so the
//! normalization pipeline can blend its output with short monthly histories.
//!
//! ## Usage
//!
//! ```
//! use ghg_baseline::{BaselineConfig, RegressionEstimator};
//! use ghg_domain::traits::BaselineEstimator;
//! use ghg_domain::{CompanyProfile, Industry};
//!
//! let estimator = RegressionEstimator::new(BaselineConfig::fast()).unwrap();
//! let prediction = estimator
//!     .predict(&CompanyProfile {
//!         revenue: Some(50_000_000.0),
//!         employees: Some(180.0),
//!         industry: Some(Industry::ManufacturingLight),
//!         ..Default::default()
//!     })
//!     .unwrap();
//! assert!((prediction.scope_1 / prediction.total - 0.3).abs() < 1e-9);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod error;
mod estimator;
mod regression;
mod synthetic;

pub use config::BaselineConfig;
pub use error::BaselineError;
pub use estimator::{percentile, RegressionEstimator, AREA_PER_EMPLOYEE, ENERGY_SPEND_SHARE, REVENUE_PER_EMPLOYEE};
pub use regression::{solve_least_squares, Features, LogLinearModel, FEATURES};
pub use synthetic::{generate, TrainingSample};
