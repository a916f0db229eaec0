//! CLI command definitions and argument parsing.

use clap::{ArgAction, Parser, Subcommand};
use ghg_domain::Scope3Method;
use std::path::PathBuf;

/// ghg - Greenhouse gas inventory calculations and dataset normalization.
#[derive(Debug, Parser)]
#[command(name = "ghg")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "GHG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Normalize a raw facility dataset into a company inventory
    Normalize(NormalizeArgs),

    /// Calculate emissions for a single activity
    Calculate(CalculateArgs),

    /// Calculate a batch of activity records against a factor table
    Batch(BatchArgs),

    /// Convert a value between units
    Convert(ConvertArgs),

    /// Estimate a baseline from a company profile
    Baseline(BaselineArgs),

    /// Manage the configuration file
    Config(ConfigArgs),
}

/// Arguments for the normalize command.
#[derive(Debug, Parser)]
pub struct NormalizeArgs {
    /// Raw dataset (JSON)
    pub input: PathBuf,

    /// Emission factor table (TOML) for activity records
    #[arg(long)]
    pub factors: Option<PathBuf>,

    /// Train the regression estimator for the baseline instead of using
    /// industry intensity alone
    #[arg(long)]
    pub baseline: bool,

    /// Print the normalization log
    #[arg(long)]
    pub show_log: bool,

    /// Write the normalized dataset (JSON) to a file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the calculate command.
#[derive(Debug, Parser)]
pub struct CalculateArgs {
    /// GHG Protocol scope (1, 2 or 3)
    #[arg(short, long)]
    pub scope: u8,

    /// Activity category (e.g. stationary_combustion, electricity)
    #[arg(long, default_value = "general")]
    pub category: String,

    /// Activity amount
    pub amount: f64,

    /// Activity unit
    pub unit: String,

    /// Emission factor value
    #[arg(long)]
    pub factor: f64,

    /// Emission factor unit (e.g. kg_co2e_per_kwh)
    #[arg(long)]
    pub factor_unit: String,

    /// Scope 3 category (1-15)
    #[arg(long)]
    pub scope3_category: Option<u8>,

    /// Override the Scope 3 formula family
    #[arg(long, value_enum)]
    pub method: Option<MethodArg>,
}

/// Scope 3 formula family.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum MethodArg {
    /// Spend × factor
    Spend,
    /// Distance × factor
    Distance,
    /// Mass × factor
    Waste,
    /// Activity × factor with unit harmonization
    Generic,
}

/// Arguments for the batch command.
#[derive(Debug, Parser)]
pub struct BatchArgs {
    /// Activity records (JSON array)
    pub records: PathBuf,

    /// Emission factor table (TOML)
    #[arg(long)]
    pub factors: PathBuf,

    /// Region for records that name none
    #[arg(short, long)]
    pub region: Option<String>,
}

/// Arguments for the convert command.
#[derive(Debug, Parser)]
pub struct ConvertArgs {
    /// Value to convert
    pub value: f64,

    /// Source unit
    pub from: String,

    /// Target unit
    pub to: String,
}

/// Arguments for the baseline command.
#[derive(Debug, Parser)]
pub struct BaselineArgs {
    /// Annual revenue, USD
    #[arg(long)]
    pub revenue: f64,

    /// Industry code (e.g. manufacturing_heavy, technology)
    #[arg(short, long)]
    pub industry: Option<String>,

    /// Headcount
    #[arg(long)]
    pub employees: Option<f64>,

    /// Annual energy spend, USD
    #[arg(long)]
    pub energy_spend: Option<f64>,

    /// Total floor area, sq ft
    #[arg(long)]
    pub area: Option<f64>,

    /// Region code
    #[arg(short, long)]
    pub region: Option<String>,

    /// Monthly emissions history, t CO2e (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub history: Vec<f64>,
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,

    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
        }
    }
}

impl From<MethodArg> for Scope3Method {
    fn from(method: MethodArg) -> Self {
        match method {
            MethodArg::Spend => Scope3Method::SpendBased,
            MethodArg::Distance => Scope3Method::DistanceBased,
            MethodArg::Waste => Scope3Method::WasteBased,
            MethodArg::Generic => Scope3Method::Generic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_parsing() {
        let cli = Cli::parse_from([
            "ghg",
            "normalize",
            "data.json",
            "--factors",
            "factors.toml",
            "--show-log",
        ]);

        match cli.command {
            Command::Normalize(args) => {
                assert_eq!(args.input, PathBuf::from("data.json"));
                assert_eq!(args.factors, Some(PathBuf::from("factors.toml")));
                assert!(args.show_log);
                assert!(!args.baseline);
            }
            _ => panic!("Expected Normalize command"),
        }
    }

    #[test]
    fn test_calculate_parsing() {
        let cli = Cli::parse_from([
            "ghg",
            "calculate",
            "--scope",
            "3",
            "5000",
            "USD",
            "--factor",
            "0.4",
            "--factor-unit",
            "kg_co2e_per_usd",
            "--scope3-category",
            "1",
            "--method",
            "spend",
        ]);

        match cli.command {
            Command::Calculate(args) => {
                assert_eq!(args.scope, 3);
                assert_eq!(args.amount, 5000.0);
                assert_eq!(args.unit, "USD");
                assert_eq!(args.category, "general");
                assert_eq!(args.scope3_category, Some(1));
                assert!(matches!(args.method, Some(MethodArg::Spend)));
            }
            _ => panic!("Expected Calculate command"),
        }
    }

    #[test]
    fn test_baseline_history_parsing() {
        let cli = Cli::parse_from([
            "ghg",
            "baseline",
            "--revenue",
            "1e7",
            "--industry",
            "retail",
            "--history",
            "10,12.5,11",
        ]);

        match cli.command {
            Command::Baseline(args) => {
                assert_eq!(args.revenue, 1e7);
                assert_eq!(args.history, vec![10.0, 12.5, 11.0]);
            }
            _ => panic!("Expected Baseline command"),
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["ghg", "convert", "1", "MWh", "kWh", "--format", "json", "-vv", "--no-color"]);
        assert!(matches!(cli.format, Some(CliFormat::Json)));
        assert_eq!(cli.verbose, 2);
        assert!(cli.no_color);
    }

    #[test]
    fn test_config_init_parsing() {
        let cli = Cli::parse_from(["ghg", "config", "init", "--force"]);
        match cli.command {
            Command::Config(args) => assert!(matches!(args.action, ConfigAction::Init { force: true })),
            _ => panic!("Expected Config command"),
        }
    }
}
