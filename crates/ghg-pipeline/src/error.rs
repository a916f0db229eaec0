//! Error types for pipeline runs

use ghg_calc::CalcError;
use thiserror::Error;

/// Errors that abort a pipeline run
///
/// Missing or partial data never produces one of these; gaps are estimated
/// and flagged instead.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Unit conversion failure in the input data
    #[error("Calculation error: {0}")]
    Calc(#[from] CalcError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input could not be parsed as a dataset
    #[error("Dataset error: {0}")]
    Dataset(String),
}

impl From<serde_json::Error> for PipelineError {
    fn from(e: serde_json::Error) -> Self {
        PipelineError::Dataset(e.to_string())
    }
}
