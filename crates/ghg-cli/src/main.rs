//! ghg - command-line interface for GHG inventory calculations.

use clap::Parser;
use ghg_cli::cli::{ConfigAction, ConfigArgs};
use ghg_cli::commands;
use ghg_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> ghg_cli::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // `config init` must work before any file exists
    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(_) if matches!(cli.command, Command::Config(ConfigArgs { action: ConfigAction::Init { .. } })) => {
            Config::default()
        }
        Err(e) => return Err(e),
    };

    let format = cli.format.map(Into::into).unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Normalize(args) => commands::execute_normalize(args, &config, &formatter),
        Command::Calculate(args) => commands::execute_calculate(args, &config, &formatter),
        Command::Batch(args) => commands::execute_batch(args, &config, &formatter),
        Command::Convert(args) => commands::execute_convert(args, &formatter),
        Command::Baseline(args) => commands::execute_baseline(args, &config, &formatter),
        Command::Config(args) => commands::execute_config(args, &config, cli.config.as_deref(), &formatter),
    }
}

/// Log to stderr; `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}
