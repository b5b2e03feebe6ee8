use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use tracing::warn;

use graveyard_rewards::compute_for_wallet;

use super::{error_response, misconfigured};
use crate::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardsQuery {
    #[serde(default)]
    wallet_address: Option<String>,
}

/// GET /rewards?walletAddress= — the full scoring pipeline. Recomputed from
/// the live feed on every call; nothing is cached or persisted.
pub async fn rewards(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RewardsQuery>,
) -> Response {
    let Some(client) = state.tapestry.as_ref() else {
        return misconfigured();
    };

    let wallet = params.wallet_address.unwrap_or_default();
    match compute_for_wallet(client, &wallet, &state.schedule).await {
        Ok(resp) => Json(resp).into_response(),
        Err(err) => {
            warn!(error = %err, "Rewards computation failed");
            error_response(err)
        }
    }
}
