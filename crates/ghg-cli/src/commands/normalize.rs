//! Normalize command implementation.

use crate::cli::NormalizeArgs;
use crate::config::{Config, OutputFormat};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use ghg_baseline::RegressionEstimator;
use ghg_calc::FactorTable;
use ghg_pipeline::{NormalizationPipeline, NormalizedDataset, RawDataset};
use std::fs;
use std::path::Path;
use tracing::info;

/// Execute the normalize command.
pub fn execute_normalize(args: NormalizeArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let normalized = normalize(&args, config)?;

    if let Some(path) = &args.output {
        fs::write(path, serde_json::to_string_pretty(&normalized)?)?;
        if formatter.format() == OutputFormat::Table {
            println!("{}", formatter.success(&format!("Normalized dataset written to {}", path.display())));
        }
    }

    println!("{}", formatter.format_normalized(&normalized)?);

    // The JSON document already carries the log
    if args.show_log && formatter.format() == OutputFormat::Table {
        println!("{}", formatter.format_log(&normalized.normalization_log)?);
    }

    Ok(())
}

/// Load the dataset (and factor table) named by `args` and run the pipeline.
pub fn normalize(args: &NormalizeArgs, config: &Config) -> Result<NormalizedDataset> {
    let raw = RawDataset::from_json(&fs::read_to_string(&args.input)?)?;

    let mut pipeline = NormalizationPipeline::new(config.pipeline.clone(), config.tables.clone())?;
    if let Some(path) = &args.factors {
        let table = load_factors(path)?;
        info!("Loaded {} emission factors from {}", table.len(), path.display());
        pipeline = pipeline.with_factors(Box::new(table));
    }

    let normalized = if args.baseline {
        let estimator = RegressionEstimator::new(config.baseline.clone())?;
        pipeline.run_with_baseline(&raw, &estimator)?
    } else {
        pipeline.run(&raw)?
    };
    Ok(normalized)
}

/// Read a TOML factor table.
pub fn load_factors(path: &Path) -> Result<FactorTable> {
    let contents = fs::read_to_string(path)?;
    FactorTable::from_toml(&contents).map_err(|e| CliError::InvalidInput(format!("{}: {}", path.display(), e)))
}
