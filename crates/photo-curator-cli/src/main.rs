//! Photo Curator CLI - Automated photo curation tool.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::{Cli, Commands, ExitCode};

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let app_config = config::AppConfig::load();

    let exit_code = match cli.command {
        Some(Commands::Curate(args)) => run_curate(args, &app_config),
        None => {
            if cli.curate.manifest.is_none() {
                eprintln!("error: No manifest specified. Use --help for usage information.");
                return ExitCode::Error.into();
            }
            run_curate(cli.curate, &app_config)
        }
    };

    exit_code.into()
}

fn run_curate(args: commands::curate::CurateArgs, config: &config::AppConfig) -> ExitCode {
    let args = commands::curate::CurateArgs::with_config(args, config);
    match commands::curate::run(&args) {
        Ok(result) => result.exit_code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::Error
        }
    }
}
