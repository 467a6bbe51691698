//! logsieve CLI library.
//!
//! The binary in `main.rs` only parses arguments and maps errors to exit
//! codes; everything else lives here so integration tests can drive the
//! command handlers directly.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;

use std::path::Path;

use tracing::{debug, info};

use logsieve_core::config::{GeneralConfig, LogsieveConfig};

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::output::OutputWriter;

/// Configuration file read when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "logsieve.toml";

/// Load the effective configuration.
///
/// An explicit path must exist. Without one, `logsieve.toml` in the current
/// directory is used when present, otherwise built-in defaults. Environment
/// overrides apply in every case.
pub async fn load_config(path: Option<&Path>) -> Result<LogsieveConfig, CliError> {
    if let Some(path) = path {
        return Ok(LogsieveConfig::load(path).await?);
    }

    let default_path = Path::new(DEFAULT_CONFIG_PATH);
    if tokio::fs::try_exists(default_path).await.unwrap_or(false) {
        return Ok(LogsieveConfig::load(default_path).await?);
    }

    let mut config = LogsieveConfig::default();
    config.apply_env_overrides();
    config.validate()?;
    Ok(config)
}

/// Run a parsed command line.
pub async fn run(cli: Cli) -> Result<(), CliError> {
    let Cli {
        config: config_path,
        log_level,
        output,
        command,
    } = cli;
    let writer = OutputWriter::new(output);

    // `config` inspects the file itself, so a broken file must not stop it from starting.
    if let Commands::Config(args) = command {
        let mut general = GeneralConfig::default();
        if let Some(level) = log_level {
            general.log_level = level;
        }
        logging::init_tracing(&general).map_err(|e| CliError::Config(e.to_string()))?;

        let path = config_path.unwrap_or_else(|| DEFAULT_CONFIG_PATH.into());
        return commands::config::execute(args, &path, &writer).await;
    }

    let mut config = load_config(config_path.as_deref()).await?;
    if let Some(level) = log_level {
        config.general.log_level = level;
        config.validate()?;
    }
    logging::init_tracing(&config.general).map_err(|e| CliError::Config(e.to_string()))?;
    logsieve_core::metrics::describe_all();

    info!(version = env!("CARGO_PKG_VERSION"), "logsieve starting");
    debug!(?config, "effective configuration");

    match command {
        Commands::Parse(args) => commands::parse::execute(args, &config, &writer).await,
        Commands::Query(args) => commands::query::execute_query(args, &config, &writer).await,
        Commands::Count(args) => commands::query::execute_count(args, &config, &writer).await,
        Commands::Group(args) => commands::group::execute(args, &config, &writer).await,
        Commands::Detect(args) => commands::detect::execute(args, &config, &writer).await,
        Commands::Config(_) => Ok(()),
    }
}
