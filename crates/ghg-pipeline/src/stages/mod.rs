//! The four normalization stages
//!
//! Each stage mutates a working copy in place and is idempotent: running it a
//! second time on its own output changes nothing.

pub mod aggregate;
pub mod annualize;
pub mod estimate;
pub mod units;

pub use aggregate::{aggregate, scope_3_breakdown, Scope3Breakdown};
pub use annualize::annualize;
pub use estimate::estimate_missing;
pub use units::normalize_units;
