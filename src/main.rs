//! robot-rag CLI entry point.

use anyhow::Context;
use clap::Parser;

use robot_rag::cli::{handle_error, Cli, Commands};
use robot_rag::infrastructure::config::ConfigLoader;
use robot_rag::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(err) => handle_error(err, cli.json),
    };

    let _logger = match LogConfig::try_from(&config.logging)
        .map_err(anyhow::Error::msg)
        .and_then(|log_config| LoggerImpl::init(&log_config))
        .context("Failed to initialize logging")
    {
        Ok(logger) => logger,
        Err(err) => handle_error(err, cli.json),
    };

    let result = match cli.command {
        Commands::Build(args) => robot_rag::cli::commands::build::execute(args, config, cli.json).await,
        Commands::Query(args) => robot_rag::cli::commands::query::execute(args, config, cli.json).await,
        Commands::Prompt(args) => robot_rag::cli::commands::prompt::execute(args, config, cli.json).await,
        Commands::Inspect(args) => robot_rag::cli::commands::inspect::execute(args, config, cli.json).await,
    };

    if let Err(err) = result {
        handle_error(err, cli.json);
    }
}
