// Trait seam over the social-graph service, covering only the operations
// the rewards pipeline consumes. Enables deterministic testing with an
// in-memory fake: no network, no API key.

use async_trait::async_trait;
use serde_json::Value;
use tapestry_client::{Result, TapestryClient};

#[async_trait]
pub trait SocialGraph: Send + Sync {
    /// Find-or-create the profile for a wallet. Returns the raw envelope;
    /// the identity resolver normalizes it.
    async fn find_or_create_profile(&self, wallet_address: &str, username: &str) -> Result<Value>;

    /// One page of the profile's visible feed.
    async fn list_contents(&self, profile_id: &str, page: u32, page_size: u32) -> Result<Value>;

    /// One page of the comment thread on a content node.
    async fn list_comments(&self, content_id: &str, page: u32, page_size: u32) -> Result<Value>;
}

#[async_trait]
impl SocialGraph for TapestryClient {
    async fn find_or_create_profile(&self, wallet_address: &str, username: &str) -> Result<Value> {
        TapestryClient::find_or_create_profile(self, wallet_address, username, "").await
    }

    async fn list_contents(&self, profile_id: &str, page: u32, page_size: u32) -> Result<Value> {
        TapestryClient::list_contents(self, profile_id, page, page_size).await
    }

    async fn list_comments(&self, content_id: &str, page: u32, page_size: u32) -> Result<Value> {
        TapestryClient::list_comments(self, Some(content_id), None, page, page_size).await
    }
}
