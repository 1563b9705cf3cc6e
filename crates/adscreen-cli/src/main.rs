mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod remote;
mod utils;

use crate::cli::{Cli, Commands};
use crate::config::PartialConfig;
use crate::error::Result;
use clap::Parser;
use tracing::{debug, error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run_app().await {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.clone())?;

    info!("🚀 adscreen v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    let config = PartialConfig::load(cli.config.as_deref(), &cli.set_values)?;

    let command_result = match cli.command {
        Commands::AdLocate(args) => {
            info!("Dispatching to 'ad-locate' command.");
            commands::ad_locate::run(args, &config).await
        }
        Commands::DbdLocate(args) => {
            info!("Dispatching to 'dbd-locate' command.");
            commands::dbd_locate::run(args, &config).await
        }
        Commands::Pairs(args) => {
            info!("Dispatching to 'pairs' command.");
            commands::pairs::run(args).await
        }
        Commands::Lis(args) => {
            info!("Dispatching to 'lis' command.");
            commands::lis::run(args, &config).await
        }
        Commands::Screen(args) => {
            info!("Dispatching to 'screen' command.");
            commands::screen::run(args, &config).await
        }
        Commands::Compare(args) => {
            info!("Dispatching to 'compare' command.");
            commands::compare::run(args, &config).await
        }
        Commands::Novel(args) => {
            info!("Dispatching to 'novel' command.");
            commands::novel::run(args, &config).await
        }
    };

    match &command_result {
        Ok(_) => {
            info!("✅ Command completed successfully.");
            println!("✅ Command completed successfully.");
        }
        Err(e) => error!("❌ Command failed: {}", e),
    }

    command_result
}
