//! Error types for emission calculations

use thiserror::Error;

/// Errors that can occur during a single calculation
///
/// Each error aborts only the calculation that raised it. Batch callers
/// collect failures per record and carry on.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    /// No direct, inverse or category-table path between two units
    #[error("Unit conversion error: cannot convert '{from}' to '{to}'")]
    UnitConversion {
        /// Source unit as given
        from: String,
        /// Target unit as given
        to: String,
    },

    /// Scope outside {1, 2, 3}
    #[error("Invalid scope: {0} (expected 1, 2 or 3)")]
    InvalidScope(u8),

    /// Factor lookup found nothing for a record
    #[error("Missing emission factor: {0}")]
    MissingFactor(String),

    /// Activity record failed validation
    #[error("Invalid activity record: {0}")]
    InvalidRecord(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CalcError {
    /// Build a unit conversion error
    pub fn unit_conversion(from: &str, to: &str) -> Self {
        CalcError::UnitConversion {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}
