//! Command implementations.

pub mod baseline;
pub mod batch;
pub mod calculate;
pub mod config;
pub mod convert;
pub mod normalize;

pub use self::baseline::execute_baseline;
pub use self::batch::execute_batch;
pub use self::calculate::execute_calculate;
pub use self::config::execute_config;
pub use self::convert::execute_convert;
pub use self::normalize::execute_normalize;
