//! Batch command implementation.

use crate::cli::BatchArgs;
use crate::commands::normalize::load_factors;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use ghg_calc::{BatchOutcome, Calculator};
use ghg_domain::ActivityRecord;
use std::fs;

/// Execute the batch command.
pub fn execute_batch(args: BatchArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let outcome = batch(&args, config)?;
    println!("{}", formatter.format_batch(&outcome)?);
    Ok(())
}

/// Calculate every record in the file; failures are reported, not raised.
pub fn batch(args: &BatchArgs, config: &Config) -> Result<BatchOutcome> {
    let records: Vec<ActivityRecord> = serde_json::from_str(&fs::read_to_string(&args.records)?)?;
    let factors = load_factors(&args.factors)?;

    let calculator = Calculator::new(config.tables.clone());
    Ok(calculator.calculate_batch(&records, &factors, args.region.as_deref()))
}
