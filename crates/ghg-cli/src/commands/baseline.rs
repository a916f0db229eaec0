//! Baseline command implementation.

use crate::cli::BaselineArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use ghg_baseline::RegressionEstimator;
use ghg_domain::traits::BaselineEstimator;
use ghg_domain::{BaselinePrediction, CompanyProfile, Industry};
use ghg_pipeline::{resolve_baseline, AuditTrail, BaselineOutcome};

/// Execute the baseline command.
pub fn execute_baseline(args: BaselineArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let (prediction, outcome) = baseline(&args, config)?;
    println!("{}", formatter.format_baseline(Some(&prediction), outcome.as_ref())?);
    Ok(())
}

/// Company profile described by the arguments.
pub fn profile(args: &BaselineArgs) -> CompanyProfile {
    CompanyProfile {
        revenue: Some(args.revenue),
        employees: args.employees,
        energy_spend: args.energy_spend,
        facility_area: args.area,
        industry: args.industry.as_deref().map(Industry::parse),
        region: args.region.clone(),
    }
}

/// Predict from the profile; blend with the monthly history when one is given.
pub fn baseline(args: &BaselineArgs, config: &Config) -> Result<(BaselinePrediction, Option<BaselineOutcome>)> {
    let profile = profile(args);
    let estimator = RegressionEstimator::new(config.baseline.clone())?;
    let prediction = estimator.predict(&profile)?;

    let outcome = if args.history.is_empty() {
        None
    } else {
        let mut audit = AuditTrail::new();
        Some(resolve_baseline(&args.history, Some(&profile), Some(&estimator), &mut audit))
    };

    Ok((prediction, outcome))
}
