pub mod error;
pub mod types;

pub use error::{Result, TapestryError};
pub use types::{
    AuthorRef, CommentBody, CommentItem, ContentBody, FeedItem, ListPayload, ProfileEnvelope,
    Property, RawProfile, SocialCounts, parse_comments, parse_feed_items,
};

use std::time::Duration;

use serde_json::Value;

const BASE_URL: &str = "https://api.usetapestry.dev/api/v1";

/// Per-call timeout. Tapestry occasionally hangs on comment listings; without
/// this a single stuck call would pin one fan-out slot forever.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Thin client over the Tapestry REST API. Methods return the raw JSON body
/// so callers can relay upstream responses verbatim; typed views live in
/// [`types`] and are applied by the consumer.
pub struct TapestryClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl TapestryClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// POST /profiles/findOrCreate. Idempotent upstream: returns the existing
    /// profile for a known wallet, creates one otherwise.
    pub async fn find_or_create_profile(
        &self,
        wallet_address: &str,
        username: &str,
        bio: &str,
    ) -> Result<Value> {
        let url = format!("{}/profiles/findOrCreate", self.base_url);
        let body = serde_json::json!({
            "walletAddress": wallet_address,
            "username": username,
            "bio": bio,
            "blockchain": "SOLANA",
            "execution": "FAST_UNCONFIRMED",
        });

        let resp = self
            .client
            .post(&url)
            .query(&[("apiKey", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        self.read_json(resp).await
    }

    /// GET /contents/ for a profile, page-based.
    pub async fn list_contents(
        &self,
        profile_id: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Value> {
        let url = format!("{}/contents/", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[
                ("apiKey", self.api_key.as_str()),
                ("profileId", profile_id),
                ("pageSize", &page_size.to_string()),
                ("page", &page.to_string()),
            ])
            .send()
            .await?;

        self.read_json(resp).await
    }

    /// GET /comments/. Upstream requires at least one of contentId/profileId;
    /// the caller enforces that.
    pub async fn list_comments(
        &self,
        content_id: Option<&str>,
        profile_id: Option<&str>,
        page: u32,
        page_size: u32,
    ) -> Result<Value> {
        let url = format!("{}/comments/", self.base_url);
        let mut query: Vec<(&str, String)> = vec![
            ("apiKey", self.api_key.clone()),
            ("pageSize", page_size.to_string()),
            ("page", page.to_string()),
        ];
        if let Some(content_id) = content_id {
            query.push(("contentId", content_id.to_string()));
        }
        if let Some(profile_id) = profile_id {
            query.push(("profileId", profile_id.to_string()));
        }

        let resp = self.client.get(&url).query(&query).send().await?;
        self.read_json(resp).await
    }

    /// POST /contents/findOrCreate. The id must be unique per content node;
    /// text and any extra attributes travel in `properties`.
    pub async fn create_content(
        &self,
        content_id: &str,
        profile_id: &str,
        properties: &[types::Property],
    ) -> Result<Value> {
        let url = format!("{}/contents/findOrCreate", self.base_url);
        let body = serde_json::json!({
            "id": content_id,
            "profileId": profile_id,
            "properties": properties,
        });

        let resp = self
            .client
            .post(&url)
            .query(&[("apiKey", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        self.read_json(resp).await
    }

    /// POST /comments/. No commentId is sent: upstream treats one as a
    /// lookup key and 404s when it does not exist.
    pub async fn create_comment(
        &self,
        profile_id: &str,
        content_id: &str,
        text: &str,
    ) -> Result<Value> {
        let url = format!("{}/comments/", self.base_url);
        let body = serde_json::json!({
            "profileId": profile_id,
            "text": text,
            "contentId": content_id,
        });

        let resp = self
            .client
            .post(&url)
            .query(&[("apiKey", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        self.read_json(resp).await
    }

    /// POST /likes/{contentId}.
    pub async fn like(&self, content_id: &str, profile_id: &str) -> Result<Value> {
        let url = format!("{}/likes/{}", self.base_url, content_id);
        let resp = self
            .client
            .post(&url)
            .query(&[("apiKey", self.api_key.as_str())])
            .json(&serde_json::json!({ "startId": profile_id }))
            .send()
            .await?;

        self.read_json(resp).await
    }

    /// DELETE /likes/{contentId}. startId rides in both the query string and
    /// the body because some HTTP stacks drop DELETE request bodies.
    pub async fn unlike(&self, content_id: &str, profile_id: &str) -> Result<Value> {
        let url = format!("{}/likes/{}", self.base_url, content_id);
        let resp = self
            .client
            .delete(&url)
            .query(&[
                ("apiKey", self.api_key.as_str()),
                ("startId", profile_id),
            ])
            .json(&serde_json::json!({ "startId": profile_id }))
            .send()
            .await?;

        self.read_json(resp).await
    }

    /// Common response handling: non-success statuses carry the raw body for
    /// verbatim relay; empty success bodies normalize to `{"success": true}`.
    async fn read_json(&self, resp: reqwest::Response) -> Result<Value> {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "Tapestry returned non-success status");
            return Err(TapestryError::Api {
                status: status.as_u16(),
                message: body,
            });
        }
        if body.is_empty() {
            return Ok(serde_json::json!({ "success": true }));
        }
        Ok(serde_json::from_str(&body)?)
    }
}
