//! GHG Normalization Pipeline
//!
//! Turns one company's heterogeneous facility reports into a consistent,
//! audited inventory.
//!
//! ## Overview
//!
//! The pipeline runs four ordered, idempotent stages over a working copy of a
//! [`RawDataset`]:
//!
//! 1. **Units**: electricity onto kWh, natural gas onto therms, grid region
//!    validated or inferred from the address
//! 2. **Estimation**: missing scope totals are taken from nested blocks,
//!    calculated from activity records, or estimated (and flagged)
//! 3. **Annualization**: partial-year facilities scaled by `12 / months`
//! 4. **Aggregation**: company totals, the Scope 3 category breakdown and the
//!    emission-weighted quality score
//!
//! Data gaps never fail a run; each one becomes a flagged estimate and a
//! WARNING in the [`ghg_domain::NormalizationLog`]. Only a unit with no
//! conversion path is a hard error.
//!
//! ## Usage
//!
//! ```
//! use ghg_pipeline::{NormalizationPipeline, RawDataset};
//!
//! let raw = RawDataset::from_json(r#"{
//!     "facilities_raw": [
//!         {"facility_id": "FAB-1", "scope_1": 120.0, "electricity_mwh": 500, "address": "Dresden, Germany"}
//!     ]
//! }"#).unwrap();
//!
//! let out = NormalizationPipeline::default().run(&raw).unwrap();
//! let fab = &out.facilities[0];
//! assert_eq!(fab.electricity_kwh, Some(500_000.0));
//! assert!(fab.scope_2_estimated);
//! assert!(out.inventory.grand_total() > 120.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod audit;
mod blending;
mod config;
mod dataset;
mod error;
mod metrics;
mod pipeline;
pub mod stages;

pub use audit::AuditTrail;
pub use blending::{historical_annual, industry_average, resolve_baseline, BaselineMethod, BaselineOutcome};
pub use config::{PipelineConfig, TierScores};
pub use dataset::{
    DistanceItem, EmissionsData, FacilityRecord, NaturalGasEntry, RawDataset, Scope3CategoryRaw, SpendItem,
    WasteItem,
};
pub use error::PipelineError;
pub use metrics::PipelineMetrics;
pub use pipeline::{NormalizationPipeline, NormalizedDataset};
