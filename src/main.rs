use chrono::Utc;
use clap::{Parser, Subcommand};
use log::{info, LevelFilter};
use simple_logger::SimpleLogger;

use crate::client::HttpCluster;
use crate::config::{Config, Settings};
use crate::error::CurationError;
use crate::report::PlannedAction;

mod client;
mod config;
mod delete;
mod error;
mod job;
mod report;
mod retention;
mod source;
#[cfg(test)]
mod testutil;

/// Retention curation for date-stamped indices
#[derive(Debug, Parser)]
#[clap(name = "scythe")]
#[clap(about = "Retention curation for date-stamped indices", long_about = None)]
struct Cli {
    #[clap(flatten)]
    settings: Settings,
    /// Diagnostic verbosity
    #[clap(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: LevelFilter,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Deletes all indices that fall outside the retention window
    Run,
    /// Prints the actions that would be taken
    Dryrun,
}

#[tokio::main]
async fn main() -> Result<(), CurationError> {
    let args = Cli::parse();

    SimpleLogger::new()
        .with_level(args.log_level)
        .init()
        .map_err(|e| CurationError::Config(e.to_string()))?;

    let config = Config::resolve(&args.settings)?;
    let client = HttpCluster::new(&config)?;
    let now = Utc::now();

    match args.command {
        Commands::Run => {
            let report = job::run(&client, &config, now).await?;
            info!("{}", report);
        }
        Commands::Dryrun => {
            let actions = job::plan(&client, &config, now).await?;
            PlannedAction::print_tabled(&actions);
        }
    }

    Ok(())
}
