//! Single-call CRUD proxies onto Tapestry. Each handler validates required
//! string fields, resolves the caller's profile where the upstream call
//! needs one, forwards exactly one request, and relays the upstream
//! status/body verbatim on failure.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Response;
use serde::Deserialize;
use uuid::Uuid;

use graveyard_rewards::{fallback_username, profile_from_envelope, Profile, RewardsError};
use tapestry_client::{Property, TapestryClient};

use super::{bad_request, error_response, misconfigured, relay};
use crate::AppState;

const DEFAULT_PAGE_SIZE: u32 = 20;

/// Caller-supplied username when non-empty, else the wallet-derived handle.
fn choose_username(wallet: &str, username: Option<&str>) -> String {
    match username.map(str::trim).filter(|u| !u.is_empty()) {
        Some(custom) => custom.to_string(),
        None => fallback_username(wallet),
    }
}

/// Quest text body. The `[QUEST]` prefix keeps older feed readers that only
/// look at text classifying these correctly.
fn quest_text(title: &str, reward: &str, details: &str) -> String {
    let base = format!("[QUEST] {title} — Reward: {reward}");
    if details.is_empty() {
        base
    } else {
        format!("{base}\n{details}")
    }
}

/// Find-or-create the caller's profile with an optional custom username.
async fn resolve(
    client: &TapestryClient,
    wallet: &str,
    username: Option<&str>,
) -> Result<Profile, RewardsError> {
    let safe_username = choose_username(wallet, username);
    let raw = client
        .find_or_create_profile(wallet, &safe_username, "")
        .await
        .map_err(|e| RewardsError::from_upstream("profile", e))?;
    Ok(profile_from_envelope(raw, safe_username))
}

// --- POST /api/tapestry/profile ---

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    #[serde(default)]
    wallet_address: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    bio: Option<String>,
}

pub async fn create_profile(
    State(state): State<Arc<AppState>>,
    axum::Json(body): axum::Json<ProfileRequest>,
) -> Response {
    let Some(client) = state.tapestry.as_ref() else {
        return misconfigured();
    };
    let Some(wallet) = body.wallet_address.filter(|w| !w.is_empty()) else {
        return bad_request("walletAddress is required");
    };

    let username = choose_username(&wallet, body.username.as_deref());
    let bio = body.bio.unwrap_or_default();
    relay(
        "profile",
        client.find_or_create_profile(&wallet, &username, &bio).await,
    )
}

// --- POST /api/tapestry/post ---

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRequest {
    #[serde(default)]
    wallet_address: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    username: Option<String>,
}

pub async fn create_post(
    State(state): State<Arc<AppState>>,
    axum::Json(body): axum::Json<PostRequest>,
) -> Response {
    let Some(client) = state.tapestry.as_ref() else {
        return misconfigured();
    };
    let Some(wallet) = body.wallet_address.filter(|w| !w.is_empty()) else {
        return bad_request("walletAddress is required");
    };
    let text = body.text.as_deref().unwrap_or("").trim().to_string();
    if text.is_empty() {
        return bad_request("text is required");
    }

    let profile = match resolve(client, &wallet, body.username.as_deref()).await {
        Ok(profile) => profile,
        Err(err) => return error_response(err),
    };

    let properties = vec![Property {
        key: "text".to_string(),
        value: text,
    }];
    let content_id = Uuid::new_v4().to_string();
    relay(
        "content",
        client
            .create_content(&content_id, &profile.id, &properties)
            .await,
    )
}

// --- POST /api/tapestry/quest ---

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestRequest {
    #[serde(default)]
    wallet_address: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    reward: Option<String>,
    #[serde(default)]
    details: Option<String>,
}

pub async fn create_quest(
    State(state): State<Arc<AppState>>,
    axum::Json(body): axum::Json<QuestRequest>,
) -> Response {
    let Some(client) = state.tapestry.as_ref() else {
        return misconfigured();
    };
    let Some(wallet) = body.wallet_address.filter(|w| !w.is_empty()) else {
        return bad_request("walletAddress is required");
    };
    let title = body.title.as_deref().unwrap_or("").trim().to_string();
    if title.is_empty() {
        return bad_request("title is required");
    }
    let reward = body.reward.as_deref().unwrap_or("").trim().to_string();
    if reward.is_empty() {
        return bad_request("reward is required");
    }
    let details = body.details.as_deref().unwrap_or("").trim().to_string();

    let profile = match resolve(client, &wallet, None).await {
        Ok(profile) => profile,
        Err(err) => return error_response(err),
    };

    // The text property carries the tag for fallback detection; the extra
    // properties enable first-class quest detection without text parsing.
    let properties = vec![
        Property {
            key: "text".to_string(),
            value: quest_text(&title, &reward, &details),
        },
        Property {
            key: "type".to_string(),
            value: "quest".to_string(),
        },
        Property {
            key: "title".to_string(),
            value: title,
        },
        Property {
            key: "reward".to_string(),
            value: reward,
        },
        Property {
            key: "details".to_string(),
            value: details,
        },
    ];
    let content_id = Uuid::new_v4().to_string();
    relay(
        "quest",
        client
            .create_content(&content_id, &profile.id, &properties)
            .await,
    )
}

// --- POST /api/tapestry/like ---

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeRequest {
    #[serde(default)]
    wallet_address: Option<String>,
    #[serde(default)]
    content_id: Option<String>,
    #[serde(default)]
    action: Option<String>,
}

pub async fn like(
    State(state): State<Arc<AppState>>,
    axum::Json(body): axum::Json<LikeRequest>,
) -> Response {
    let Some(client) = state.tapestry.as_ref() else {
        return misconfigured();
    };
    let Some(wallet) = body.wallet_address.filter(|w| !w.is_empty()) else {
        return bad_request("walletAddress is required");
    };
    let Some(content_id) = body.content_id.filter(|c| !c.is_empty()) else {
        return bad_request("contentId is required");
    };
    let action = body.action.as_deref().unwrap_or("");
    if action != "like" && action != "unlike" {
        return bad_request(r#"action must be "like" or "unlike""#);
    }

    let profile = match resolve(client, &wallet, None).await {
        Ok(profile) => profile,
        Err(err) => return error_response(err),
    };

    let result = if action == "like" {
        client.like(&content_id, &profile.id).await
    } else {
        client.unlike(&content_id, &profile.id).await
    };
    relay("like", result)
}

// --- POST /api/tapestry/comment ---

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    #[serde(default)]
    wallet_address: Option<String>,
    #[serde(default)]
    content_id: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    axum::Json(body): axum::Json<CommentRequest>,
) -> Response {
    let Some(client) = state.tapestry.as_ref() else {
        return misconfigured();
    };
    let Some(wallet) = body.wallet_address.filter(|w| !w.is_empty()) else {
        return bad_request("walletAddress is required");
    };
    let Some(content_id) = body.content_id.filter(|c| !c.is_empty()) else {
        return bad_request("contentId is required");
    };
    let text = body.text.as_deref().unwrap_or("").trim().to_string();
    if text.is_empty() {
        return bad_request("text is required");
    }

    let profile = match resolve(client, &wallet, None).await {
        Ok(profile) => profile,
        Err(err) => return error_response(err),
    };

    relay(
        "comment",
        client.create_comment(&profile.id, &content_id, &text).await,
    )
}

// --- GET /api/tapestry/comments ---

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentsQuery {
    #[serde(default)]
    content_id: Option<String>,
    #[serde(default)]
    profile_id: Option<String>,
    #[serde(default)]
    page_size: Option<u32>,
    #[serde(default)]
    page: Option<u32>,
}

pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CommentsQuery>,
) -> Response {
    let Some(client) = state.tapestry.as_ref() else {
        return misconfigured();
    };
    // Upstream requires at least one filter.
    if params.content_id.is_none() && params.profile_id.is_none() {
        return bad_request("contentId or profileId is required");
    }

    relay(
        "comments",
        client
            .list_comments(
                params.content_id.as_deref(),
                params.profile_id.as_deref(),
                params.page.unwrap_or(1),
                params.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            )
            .await,
    )
}

// --- GET /api/tapestry/feed ---

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedQuery {
    #[serde(default)]
    wallet_address: Option<String>,
    #[serde(default)]
    profile_id: Option<String>,
    /// Accepted as an alias for pageSize.
    #[serde(default)]
    limit: Option<u32>,
    #[serde(default)]
    page_size: Option<u32>,
    #[serde(default)]
    page: Option<u32>,
}

pub async fn feed(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FeedQuery>,
) -> Response {
    let Some(client) = state.tapestry.as_ref() else {
        return misconfigured();
    };

    let profile_id = match params.profile_id {
        Some(id) => id,
        None => {
            let Some(wallet) = params.wallet_address.filter(|w| !w.is_empty()) else {
                return bad_request("Provide profileId or walletAddress");
            };
            match resolve(client, &wallet, None).await {
                Ok(profile) => profile.id,
                Err(err) => return error_response(err),
            }
        }
    };

    let page_size = params
        .limit
        .or(params.page_size)
        .unwrap_or(DEFAULT_PAGE_SIZE);
    relay(
        "feed",
        client
            .list_contents(&profile_id, params.page.unwrap_or(1), page_size)
            .await,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_username_wins_when_non_empty() {
        assert_eq!(
            choose_username("7f9GkQ2mP4xWn8vRt5Yz1", Some("  skeleton  ")),
            "skeleton"
        );
    }

    #[test]
    fn blank_username_falls_back_to_wallet_handle() {
        assert_eq!(
            choose_username("7f9GkQ2mP4xWn8vRt5Yz1", Some("   ")),
            "user_7f9GkQ"
        );
        assert_eq!(
            choose_username("7f9GkQ2mP4xWn8vRt5Yz1", None),
            "user_7f9GkQ"
        );
    }

    #[test]
    fn quest_text_without_details() {
        assert_eq!(
            quest_text("Sweep the crypt", "5 SOL", ""),
            "[QUEST] Sweep the crypt — Reward: 5 SOL"
        );
    }

    #[test]
    fn quest_text_appends_details_on_a_new_line() {
        assert_eq!(
            quest_text("Sweep the crypt", "5 SOL", "bring a broom"),
            "[QUEST] Sweep the crypt — Reward: 5 SOL\nbring a broom"
        );
    }
}
