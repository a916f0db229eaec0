//! Calculate command implementation.

use crate::cli::CalculateArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use ghg_calc::{CalculationContext, Calculator};
use ghg_domain::EmissionResult;

/// Execute the calculate command.
pub fn execute_calculate(args: CalculateArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let result = calculate(&args, config)?;
    println!("{}", formatter.format_result(&result)?);
    Ok(())
}

/// Route one activity through the calculator.
pub fn calculate(args: &CalculateArgs, config: &Config) -> Result<EmissionResult> {
    let calculator = Calculator::new(config.tables.clone());
    let context = CalculationContext {
        scope_3_category: args.scope3_category,
        method: args.method.map(Into::into),
        gas_breakdown: None,
    };

    Ok(calculator.calculate(
        args.scope,
        &args.category,
        args.amount,
        &args.unit,
        args.factor,
        &args.factor_unit,
        &context,
    )?)
}
