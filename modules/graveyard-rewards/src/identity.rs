use serde::Serialize;
use serde_json::Value;
use tapestry_client::ProfileEnvelope;
use tracing::debug;

use crate::error::{Result, RewardsError};
use crate::graph::SocialGraph;

const WALLET_MIN_LEN: usize = 20;
const WALLET_MAX_LEN: usize = 50;

/// Resolved caller identity. `username` is the display key every point in
/// the system is attributed to.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub id: String,
    pub username: String,
}

/// Wallet addresses are accepted as 20-50 ASCII-alphanumeric characters.
/// Anything else is rejected before any upstream call.
pub fn validate_wallet(wallet: &str) -> bool {
    (WALLET_MIN_LEN..=WALLET_MAX_LEN).contains(&wallet.len())
        && wallet.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Deterministic handle for wallets with no prior profile. Char-based so an
/// unvalidated wallet from a proxy route can't split a UTF-8 boundary.
pub fn fallback_username(wallet: &str) -> String {
    let prefix: String = wallet.chars().take(6).collect();
    format!("user_{prefix}")
}

/// Find-or-create the caller's profile. At most one network call; a
/// non-success upstream response aborts with the upstream status and body.
pub async fn resolve_profile(graph: &dyn SocialGraph, wallet: &str) -> Result<Profile> {
    let fallback = fallback_username(wallet);
    let raw = graph
        .find_or_create_profile(wallet, &fallback)
        .await
        .map_err(|e| RewardsError::from_upstream("profile", e))?;

    let profile = profile_from_envelope(raw, fallback);
    debug!(profile_id = %profile.id, username = %profile.username, "Resolved profile");
    Ok(profile)
}

/// Normalize the find-or-create envelope. Id precedence: upstream id, then
/// upstream username, then the derived fallback; username falls back the
/// same way.
pub fn profile_from_envelope(raw: Value, fallback: String) -> Profile {
    let envelope: ProfileEnvelope = serde_json::from_value(raw).unwrap_or_default();
    let profile = envelope.profile.unwrap_or_default();
    let username = profile.username.unwrap_or_else(|| fallback.clone());
    let id = profile.id.unwrap_or_else(|| username.clone());
    Profile { id, username }
}
