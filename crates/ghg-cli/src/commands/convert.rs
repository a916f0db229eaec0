//! Convert command implementation.

use crate::cli::ConvertArgs;
use crate::error::Result;
use crate::output::Formatter;
use ghg_calc::UnitConverter;

/// Execute the convert command.
pub fn execute_convert(args: ConvertArgs, formatter: &Formatter) -> Result<()> {
    let converted = UnitConverter::new().convert(args.value, &args.from, &args.to)?;
    println!(
        "{}",
        formatter.format_conversion(args.value, &args.from, converted, &args.to)?
    );
    Ok(())
}
