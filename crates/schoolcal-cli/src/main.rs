//! schoolcal CLI entry point.

use std::process::ExitCode;

use clap::Parser;

use schoolcal_aggregator::Role;
use schoolcal_cli::cli::{CalendarArgs, Cli, Command, ConfigAction};
use schoolcal_cli::commands::{self, Session};
use schoolcal_cli::config::ClientConfig;
use schoolcal_cli::error::{ClientError, ClientResult};
use schoolcal_core::{TracingConfig, init_tracing};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let tracing_config = if cli.debug || config.debug {
        TracingConfig::cli_debug()
    } else {
        TracingConfig::default()
    };
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("warning: {}", e);
    }

    match run(cli, config).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Loads the config file and applies command-line overrides.
fn load_config(cli: &Cli) -> ClientResult<ClientConfig> {
    let mut config = match cli.config {
        Some(ref path) => ClientConfig::load_from(path),
        None => ClientConfig::load(),
    }
    .map_err(ClientError::Config)?;

    if let Some(ref dir) = cli.data_dir {
        config.store.data_dir = Some(dir.clone());
    }
    if let Some(secs) = cli.timeout {
        config.aggregator.timeout_secs = secs;
    }
    Ok(config)
}

async fn run(cli: Cli, config: ClientConfig) -> ClientResult<String> {
    let config_path = cli.config.unwrap_or_else(ClientConfig::default_path);

    match cli.command {
        Some(Command::Calendar(args)) => {
            let session = Session::open(&config, config.data_dir(), args.role)?;
            commands::calendar::run(&session, &args).await
        }
        Some(Command::Birthdays(args)) => {
            let session = Session::open(&config, config.data_dir(), Role::Student)?;
            commands::birthdays::run(&session, &args).await
        }
        Some(Command::Config { action }) => match action {
            ConfigAction::Dump => commands::config::dump(&config, &config_path),
            ConfigAction::Validate => commands::config::validate(&config),
            ConfigAction::Path => commands::config::path(&config_path, &config),
        },
        None => {
            let args = CalendarArgs::default();
            let session = Session::open(&config, config.data_dir(), args.role)?;
            commands::calendar::run(&session, &args).await
        }
    }
}
