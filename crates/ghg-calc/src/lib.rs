//! GHG Calculation Engine
//!
//! Converts activity data into kg CO2e following the GHG Protocol.
//!
//! ## Overview
//!
//! - **UnitConverter**: energy, volume, mass and distance conversions, plus the
//!   collapse of any gas-mass description into kilograms of CO2e
//! - **Scope engines**: stationary/mobile/fugitive (Scope 1), location- and
//!   market-based electricity and steam/heat (Scope 2), spend, distance, waste
//!   and generic formulas across the fifteen Scope 3 categories
//! - **Calculator**: routes a scope/category/method hint to the right engine,
//!   validates and batches [`ghg_domain::ActivityRecord`]s
//! - **ReferenceTables / FactorTable**: the swappable factor configuration
//!
//! ## Failure model
//!
//! Only two things are hard errors: a unit with no conversion path, and a
//! scope outside 1..=3. Every other gap is defaulted, and defaults that touch
//! units are recorded on the result as [`ghg_domain::Assumption`]s.
//!
//! ## Usage
//!
//! ```
//! use ghg_calc::{CalculationContext, Calculator};
//!
//! let calc = Calculator::default();
//! let result = calc
//!     .calculate(1, "diesel", 100.0, "gallons", 2.68, "kg_co2e_per_liter", &CalculationContext::default())
//!     .unwrap();
//! assert!(result.co2e_kg > 1000.0);
//! assert_eq!(result.tons(), result.co2e_kg / 1000.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod factors;
mod router;
mod scope1;
mod scope2;
mod scope3;
mod tables;
mod units;

pub use error::CalcError;
pub use factors::FactorTable;
pub use router::{BatchOutcome, CalculationContext, Calculator, RecordCalculation, RecordFailure};
pub use scope1::Scope1Engine;
pub use scope2::{DualScope2, Scope2Engine, GRID_GAS_BREAKDOWN, MMBTU_PER_GJ, MMBTU_PER_KWH};
pub use scope3::Scope3Engine;
pub use tables::ReferenceTables;
pub use units::{Conversion, ConversionPath, FactorUnit, Unit, UnitCategory, UnitConverter};
