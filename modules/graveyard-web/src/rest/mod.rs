pub mod proxy;
pub mod rewards;

pub use proxy::{
    create_comment, create_post, create_profile, create_quest, feed, like, list_comments,
};
pub use rewards::rewards;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};

use graveyard_rewards::RewardsError;

/// Answer when TAPESTRY_API_KEY is absent. No upstream call is attempted.
pub(crate) fn misconfigured() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({"error": "Server misconfiguration"})),
    )
        .into_response()
}

pub(crate) fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({"error": message})),
    )
        .into_response()
}

/// Map engine errors onto the inbound contract: upstream failures relay the
/// upstream status with the raw body in `details`; transport and parse
/// failures are local 500s.
pub(crate) fn error_response(err: RewardsError) -> Response {
    match err {
        RewardsError::InvalidWallet => bad_request(&err.to_string()),
        RewardsError::Upstream {
            context,
            status,
            details,
        } => {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            (
                status,
                Json(serde_json::json!({
                    "error": format!("Tapestry {context} error"),
                    "details": details,
                })),
            )
                .into_response()
        }
        RewardsError::Network(msg) | RewardsError::Parse(msg) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": msg})),
        )
            .into_response(),
    }
}

/// Relay a raw client result verbatim: success bodies pass through, upstream
/// failures keep their status.
pub(crate) fn relay(
    context: &'static str,
    result: tapestry_client::Result<serde_json::Value>,
) -> Response {
    match result {
        Ok(body) => Json(body).into_response(),
        Err(err) => error_response(RewardsError::from_upstream(context, err)),
    }
}
