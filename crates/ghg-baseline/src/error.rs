//! Error types for baseline estimation

use thiserror::Error;

/// Errors that can occur while training or querying the estimator
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BaselineError {
    /// Profile lacks a usable revenue figure
    #[error("Insufficient profile: {0}")]
    InsufficientProfile(String),

    /// Least-squares system could not be solved
    #[error("Regression error: {0}")]
    Regression(String),

    /// Invalid distribution parameters
    #[error("Sampling error: {0}")]
    Sampling(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
