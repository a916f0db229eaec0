//! GHG Domain Layer
//!
//! This crate contains the value types shared by every part of the emissions
//! inventory engine. It holds no calculation logic beyond small invariants and
//! derived values; formulas live in `ghg-calc` and orchestration in
//! `ghg-pipeline`.
//!
//! ## Key Concepts
//!
//! - **ActivityRecord**: one reported activity (fuel, electricity, spend, distance,
//!   waste, refrigerant) at one facility for one period
//! - **EmissionFactor**: a CO2e-per-unit multiplier scoped by scope/category/region/date
//! - **EmissionResult**: immutable output of one calculation, with its audit formula
//! - **Inventories**: per-facility and company-level scope totals
//! - **NormalizationLog**: append-only audit trail of a pipeline run
//! - **Tiers**: data-quality classes (Tier 1 measured → Tier 4 proxy)
//!
//! ## Architecture
//!
//! - Pure value types, serializable with serde
//! - Trait definitions for the external collaborators (factor lookup,
//!   baseline estimation) live in [`traits`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod activity;
pub mod factor;
pub mod interval;
pub mod inventory;
pub mod log;
pub mod profile;
pub mod result;
pub mod scope;
pub mod tier;
pub mod traits;

// Re-exports for convenience
pub use activity::ActivityRecord;
pub use factor::{EmissionFactor, GasBreakdown};
pub use interval::Interval;
pub use inventory::{CompanyInventory, FacilityInventory};
pub use log::{NormalizationLog, NormalizationLogEntry, Severity};
pub use profile::{BaselinePrediction, CompanyProfile, Industry};
pub use result::{Assumption, EmissionResult};
pub use scope::{Scope, Scope3Category, Scope3Method};
pub use tier::QualityTier;
