use clap::Parser;
use sportsapp_core::core::failure::ClassifiedFailure;
use sportsapp_core::display::TableDisplay;
use sportsapp_core::error::{AppError, CliError};
use sportsapp_core::storage::config::Config;
use sportsapp_core::utils::logging::init_logging;
use std::path::PathBuf;

mod cli;

use cli::dispatcher::{Dispatcher, Overrides};
use cli::main_types::Cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Load Config
    let config_path = cli
        .config_dir
        .as_ref()
        .map(|dir| PathBuf::from(dir).join("config.toml"));

    let config = match Config::load(config_path.clone()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error loading config: {}", err);
            std::process::exit(1);
        }
    };

    if cli.verbose {
        println!("Verbose mode is enabled");

        if let Some(config_dir) = &cli.config_dir {
            println!("Using config directory: {}", config_dir);
        }

        if cli.api_key.as_ref().is_some_and(|key| !key.is_empty()) {
            println!("Using API key provided on the command line");
        }
    }

    let overrides = Overrides {
        url: cli.url,
        api_key: cli.api_key,
        no_persist: cli.no_persist,
    };
    let dispatcher = Dispatcher::new(config, config_path, cli.verbose, overrides);

    if let Err(e) = dispatcher.dispatch(cli.command).await {
        report_error(&e);
        std::process::exit(1);
    }

    Ok(())
}

fn report_error(error: &AppError) {
    match error {
        AppError::Cli(CliError::Reported(_)) => {}
        AppError::Api(_) => {
            let failure = ClassifiedFailure::from_error(error);
            eprint!("{}", TableDisplay::new().render_message(&failure.ui, true));
            log::debug!("{}", failure.detail);
        }
        _ => {
            eprintln!("{} Error: {}", error.severity().emoji(), error);
            if let Some(hint) = error.troubleshooting_hint() {
                eprintln!("   💡 {}", hint);
            }
        }
    }
}
