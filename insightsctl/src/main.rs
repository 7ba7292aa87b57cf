//! Command-line interface for the Insights client

use clap::Parser;
use std::process;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod errors;
mod fixture;
mod output;

use cli::*;
use config::CtlConfig;
use errors::CliError;

#[tokio::main]
async fn main() {
    let args = Cli::parse();

    // Initialize logging; RUST_LOG wins over -v/-q
    let log_level = if args.quiet {
        Level::ERROR
    } else {
        match args.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(&args).await {
        Ok(outcome) => {
            info!("Command completed successfully");
            if !args.quiet {
                output::display_outcome(&outcome, args.format);
            }
        }
        Err(e) => {
            error!("Command failed: {}", e);
            if !args.quiet {
                eprintln!("Error: {}", e);
            }
            process::exit(1);
        }
    }
}

async fn run(args: &Cli) -> Result<output::Outcome, CliError> {
    match &args.command {
        Commands::Import { input } => {
            let config = CtlConfig::load(args)?;
            info!("Using source {} at {}", config.connection.source_id, config.connection.base_url);
            commands::import::handle_import_command(input.clone(), &config).await
        }
        Commands::Encode { input, output } => {
            commands::encode::handle_encode_command(input.clone(), output.clone()).await
        }
        Commands::Log { level, message } => {
            let config = CtlConfig::load(args)?;
            commands::log::handle_log_command(*level, message.clone(), &config).await
        }
    }
}
