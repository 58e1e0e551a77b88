//! Serve command: runs the HTTP service in the foreground.

use tracing::info;

use gcontacts_server::{AppState, ServerConfig};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

use super::contact::google_config;

/// Starts the HTTP service and blocks until SIGINT or SIGTERM.
///
/// `bind` and `prefix` override the `[server]` section.
pub async fn run(config: &ClientConfig, bind: Option<String>, prefix: Option<String>) -> ClientResult<()> {
    let server_config = server_config(config, bind, prefix)?;
    let google = google_config(config)?;

    info!(
        token_path = %google.token_path.display(),
        bind = %server_config.bind,
        "starting HTTP service"
    );

    let state = AppState::from_config(google)?;
    gcontacts_server::serve(server_config, state).await?;
    Ok(())
}

fn server_config(
    config: &ClientConfig,
    bind: Option<String>,
    prefix: Option<String>,
) -> ClientResult<ServerConfig> {
    let mut settings = config.server.clone();
    if bind.is_some() {
        settings.bind = bind;
    }
    if let Some(prefix) = prefix {
        settings.route_prefix = prefix;
    }
    settings.to_server_config().map_err(ClientError::Config)
}
