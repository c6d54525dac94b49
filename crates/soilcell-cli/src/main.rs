mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod report;
mod utils;

use crate::cli::{Cli, Commands};
use crate::error::Result;
use clap::Parser;
use tracing::{debug, error, info};

fn main() {
    if let Err(e) = run_app() {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    info!("soilcell CLI v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    configure_threads(cli.threads)?;

    let show_progress = !cli.quiet;
    let command_result = match cli.command {
        Commands::Optimize(args) => {
            info!("Dispatching to 'optimize' command.");
            commands::optimize::run(args, show_progress)
        }
        Commands::Cycle(args) => {
            info!("Dispatching to 'cycle' command.");
            commands::cycle::run(args)
        }
    };

    match &command_result {
        Ok(()) => info!("Command completed successfully."),
        Err(e) => error!("Command failed: {}", e),
    }
    command_result
}

#[cfg(feature = "parallel")]
fn configure_threads(threads: Option<usize>) -> Result<()> {
    use crate::error::CliError;

    if let Some(num_threads) = threads {
        info!("Setting Rayon global thread pool to {} threads.", num_threads);
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .map_err(|e| {
                CliError::Other(anyhow::anyhow!("Failed to build global thread pool: {}", e))
            })?;
    }
    Ok(())
}

#[cfg(not(feature = "parallel"))]
fn configure_threads(threads: Option<usize>) -> Result<()> {
    if threads.is_some() {
        tracing::warn!("Built without the `parallel` feature; --threads is ignored.");
    }
    Ok(())
}
