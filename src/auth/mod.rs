pub mod storage;

pub use storage::AuthStorage;

use crate::consts::{KEY_PREFIX, PROBE_MAX_TOKENS};
use crate::error::{Error, Result};
use crate::provider::anthropic::AnthropicProvider;
use crate::provider::{Provider, Request};

/// The one provider this tool talks to.
pub const PROVIDER: &str = "anthropic";

/// Environment fallback when no key is stored.
pub const ENV_VAR: &str = "ANTHROPIC_API_KEY";

/// Check the key's shape without touching the network.
/// Runs before (and gates) the live probe.
pub fn validate_format(key: &str) -> Result<()> {
    let key = key.trim();
    if key.is_empty() {
        return Err(Error::Credential("no API key provided".to_string()));
    }
    if !key.starts_with(KEY_PREFIX) {
        return Err(Error::Credential(format!(
            "invalid API key format: Anthropic keys start with \"{KEY_PREFIX}\""
        )));
    }
    Ok(())
}

/// Validate a key and persist it: format check first, then a minimal live
/// call to confirm the upstream accepts it, then store.
///
/// This is the shared logic behind the `takeoff login` subcommand.
pub async fn login(db_path: &str, key: &str) -> Result<()> {
    let key = key.trim();
    validate_format(key)?;
    probe(key).await?;

    let storage = AuthStorage::open(db_path)?;
    storage.set(PROVIDER, key)?;
    Ok(())
}

/// Remove the stored key.
///
/// This is the shared logic behind the `takeoff logout` subcommand.
pub fn logout(db_path: &str) -> Result<()> {
    let storage = AuthStorage::open(db_path)?;
    storage.remove(PROVIDER)?;
    Ok(())
}

/// Cheapest possible call that exercises the credential.
async fn probe(key: &str) -> Result<()> {
    let provider = AnthropicProvider::new(None, key.to_string());
    provider
        .complete(Request::text("Hi", PROBE_MAX_TOKENS))
        .await
        .map_err(|e| Error::Credential(format!("API key validation failed: {e}")))?;
    Ok(())
}
