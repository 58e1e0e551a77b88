//! Configuration commands.

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Dump the effective configuration to stdout.
pub fn dump(config: &ClientConfig) -> ClientResult<()> {
    let toml_str = toml::to_string_pretty(config)
        .map_err(|e| ClientError::Config(format!("failed to serialize config: {}", e)))?;
    println!("# config.toml ({})", ClientConfig::default_path().display());
    println!("{}", toml_str);
    Ok(())
}

/// Validate the configuration, resolving secret references.
pub fn validate(config: &ClientConfig) -> ClientResult<()> {
    let google = config
        .google
        .to_provider_config()
        .map_err(|e| ClientError::Config(format!("[google]: {}", e)))?;
    if google.fallback_credentials.is_some() {
        println!("Fallback client credentials resolved.");
    }

    config
        .server
        .to_server_config()
        .map_err(|e| ClientError::Config(format!("[server]: {}", e)))?;

    if !google.token_path.exists() {
        println!("warning: token file {} does not exist", google.token_path.display());
    }

    println!("Configuration is valid.");
    Ok(())
}

/// Show the configuration file path.
pub fn path() -> ClientResult<()> {
    println!("config: {}", ClientConfig::default_path().display());
    Ok(())
}
