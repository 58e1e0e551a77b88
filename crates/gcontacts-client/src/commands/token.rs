//! Token command: refresh if needed, then show status.

use chrono::{DateTime, Utc};
use gcontacts_providers::google::{AccessCredential, CredentialStore};

use crate::config::ClientConfig;
use crate::error::ClientResult;

use super::contact::google_config;

/// Loads the token file, refreshes it if stale and prints its status.
///
/// The access token itself is never printed.
pub async fn status(config: &ClientConfig) -> ClientResult<()> {
    let google = google_config(config)?;
    let store = CredentialStore::from_config(&google)?;
    let credential = store.load_and_refresh().await?;

    println!("token file: {}", store.path().display());
    println!("{}", describe(&credential, Utc::now()));
    Ok(())
}

fn describe(credential: &AccessCredential, now: DateTime<Utc>) -> String {
    let remaining = credential.expires_at - now;
    let state = if credential.refreshed { "refreshed" } else { "valid" };
    format!(
        "access token {}, expires {} (in {}m{:02}s)",
        state,
        credential.expires_at.to_rfc3339(),
        remaining.num_minutes(),
        remaining.num_seconds().rem_euclid(60)
    )
}
