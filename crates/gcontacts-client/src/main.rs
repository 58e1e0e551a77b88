//! gcontacts CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing::Level;

use gcontacts_client::cli::{Cli, Command, ConfigAction};
use gcontacts_client::commands;
use gcontacts_client::config::ClientConfig;
use gcontacts_client::error::{ClientError, ClientResult};
use gcontacts_core::{TracingConfig, init_tracing};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    let mut config = match cli.config {
        Some(ref path) => ClientConfig::load_from(path).map_err(ClientError::Config)?,
        None => ClientConfig::load().map_err(ClientError::Config)?,
    };
    config.apply_cli(&cli);

    let tracing = match cli.command {
        Command::Serve { .. } if config.debug => TracingConfig::daemon().with_level(Level::DEBUG),
        Command::Serve { .. } => TracingConfig::daemon(),
        _ => TracingConfig::cli(config.debug),
    };
    init_tracing(tracing)?;

    match cli.command {
        Command::Create(args) => commands::contact::create(&config, args.into()).await,
        Command::Edit {
            resource_name,
            contact,
        } => commands::contact::edit(&config, &resource_name, contact.into()).await,
        Command::Delete { resource_name } => {
            commands::contact::delete(&config, &resource_name).await
        }
        Command::Token => commands::token::status(&config).await,
        Command::Serve { bind, prefix } => commands::server::run(&config, bind, prefix).await,
        Command::Config { action } => match action {
            ConfigAction::Dump => commands::config::dump(&config),
            ConfigAction::Validate => commands::config::validate(&config),
            ConfigAction::Path => commands::config::path(),
        },
    }
}
