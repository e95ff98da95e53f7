//! taskgen CLI entry point.

use anyhow::Result;
use clap::Parser;

use studio_taskgen::cli::{commands, handle_error, Cli, Commands};
use studio_taskgen::domain::models::Config;
use studio_taskgen::infrastructure::config::ConfigLoader;
use studio_taskgen::infrastructure::logging::LoggerImpl;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => handle_error(err, cli.json),
    };

    // Held for the life of the process so buffered file logs are flushed.
    let _logger = match LoggerImpl::init(&config.logging) {
        Ok(logger) => logger,
        Err(err) => handle_error(err, cli.json),
    };

    let result = match cli.command {
        Commands::Init(args) => commands::init::execute(args, &config, cli.json).await,
        Commands::Import(args) => commands::import::execute(args, &config, cli.json).await,
        Commands::Generate(args) => commands::generate::execute(args, &config, cli.json).await,
        Commands::Rules(args) => commands::rules::execute(args, &config, cli.json).await,
        Commands::Task(args) => commands::task::execute(args, &config, cli.json).await,
        Commands::Reminders(args) => commands::reminders::execute(args, &config, cli.json).await,
    };

    if let Err(err) = result {
        handle_error(err, cli.json);
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}
