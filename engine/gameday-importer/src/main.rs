use anyhow::{anyhow, Context};
use clap::Parser;
use gameday_importer::cli::{Cli, CliHandler, Command};
use gameday_importer::{logging, ImporterConfig};
use std::process::ExitCode;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = ImporterConfig::load_from(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    cli.apply_overrides(&mut config);
    config.validate().map_err(|e| anyhow!("Invalid configuration: {e}"))?;

    logging::initialize_logging(&config.logging)?;

    let command = Command::from(cli.command);
    info!(?command, dry_run = cli.dry_run, "Starting gameday importer");

    let handler = CliHandler::new(config, cli.dry_run);
    match handler.handle_command(command).await {
        Ok(true) => Ok(ExitCode::SUCCESS),
        Ok(false) => {
            error!("One or more import jobs failed");
            Ok(ExitCode::FAILURE)
        }
        Err(e) => {
            error!("Command failed: {:#}", e);
            Err(e)
        }
    }
}
