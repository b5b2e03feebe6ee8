use tapestry_client::{parse_comments, parse_feed_items, CommentItem, FeedItem, ListPayload};
use tracing::{debug, warn};

use crate::error::{Result, RewardsError};
use crate::graph::SocialGraph;
use crate::runner::run_bounded;

/// One bounded page of feed and of each comment thread.
pub const PAGE_SIZE: u32 = 50;

/// Cap on concurrent comment-thread fetches during the fan-out.
pub const COMMENT_FETCH_CONCURRENCY: usize = 5;

/// Fetch the profile's feed, then fan out one comment fetch per item. The
/// returned comment lists are position-aligned with the feed items.
///
/// A failed feed fetch aborts the whole computation with the upstream
/// status. A failed comment fetch only degrades that one item to an empty
/// thread: a single bad thread must never abort the rewards computation.
pub async fn collect(
    graph: &dyn SocialGraph,
    profile_id: &str,
) -> Result<(Vec<FeedItem>, Vec<Vec<CommentItem>>)> {
    let raw = graph
        .list_contents(profile_id, 1, PAGE_SIZE)
        .await
        .map_err(|e| RewardsError::from_upstream("feed", e))?;
    let items = parse_feed_items(ListPayload::from_value(raw));
    debug!(profile_id, items = items.len(), "Feed fetched");

    let tasks: Vec<_> = items
        .iter()
        .map(|item| {
            let content_id = item.content_id().map(str::to_string);
            async move {
                // No id to key the thread on: empty list, no fetch.
                let Some(content_id) = content_id else {
                    return Vec::new();
                };
                match graph.list_comments(&content_id, 1, PAGE_SIZE).await {
                    Ok(raw) => parse_comments(ListPayload::from_value(raw)),
                    Err(err) => {
                        warn!(content_id, error = %err, "Comment fetch failed, scoring item without comments");
                        Vec::new()
                    }
                }
            }
        })
        .collect();

    let comment_lists = run_bounded(tasks, COMMENT_FETCH_CONCURRENCY).await;
    Ok((items, comment_lists))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use tapestry_client::TapestryError;

    struct FakeGraph {
        feed: Value,
        comments: HashMap<String, Value>,
        failing: Vec<String>,
    }

    #[async_trait]
    impl SocialGraph for FakeGraph {
        async fn find_or_create_profile(
            &self,
            _wallet_address: &str,
            _username: &str,
        ) -> tapestry_client::Result<Value> {
            Ok(json!({"profile": {"id": "p-1", "username": "me"}}))
        }

        async fn list_contents(
            &self,
            _profile_id: &str,
            _page: u32,
            _page_size: u32,
        ) -> tapestry_client::Result<Value> {
            if let Some(err) = self.feed.get("error") {
                return Err(TapestryError::Api {
                    status: 503,
                    message: err.to_string(),
                });
            }
            Ok(self.feed.clone())
        }

        async fn list_comments(
            &self,
            content_id: &str,
            _page: u32,
            _page_size: u32,
        ) -> tapestry_client::Result<Value> {
            if self.failing.iter().any(|id| id == content_id) {
                return Err(TapestryError::Api {
                    status: 500,
                    message: "upstream hiccup".to_string(),
                });
            }
            Ok(self
                .comments
                .get(content_id)
                .cloned()
                .unwrap_or_else(|| json!([])))
        }
    }

    #[tokio::test]
    async fn one_failing_thread_never_drops_or_reorders_the_rest() {
        let graph = FakeGraph {
            feed: json!([{"id": "c1"}, {"id": "c2"}, {"id": "c3"}]),
            comments: HashMap::from([
                ("c1".to_string(), json!([{"text": "one"}])),
                ("c3".to_string(), json!([{"text": "three-a"}, {"text": "three-b"}])),
            ]),
            failing: vec!["c2".to_string()],
        };

        let (items, threads) = collect(&graph, "p-1").await.unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(threads.len(), 3);
        assert_eq!(threads[0][0].text(), "one");
        assert!(threads[1].is_empty());
        assert_eq!(threads[2].len(), 2);
    }

    #[tokio::test]
    async fn item_without_any_id_gets_empty_thread() {
        let graph = FakeGraph {
            feed: json!([{"text": "orphan"}, {"id": "c1"}]),
            comments: HashMap::from([("c1".to_string(), json!([{"text": "hi"}]))]),
            failing: vec![],
        };

        let (_, threads) = collect(&graph, "p-1").await.unwrap();
        assert!(threads[0].is_empty());
        assert_eq!(threads[1].len(), 1);
    }

    #[tokio::test]
    async fn feed_failure_aborts_with_upstream_status() {
        let graph = FakeGraph {
            feed: json!({"error": "down"}),
            comments: HashMap::new(),
            failing: vec![],
        };

        let err = collect(&graph, "p-1").await.unwrap_err();
        match err {
            RewardsError::Upstream { context, status, .. } => {
                assert_eq!(context, "feed");
                assert_eq!(status, 503);
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_feed_payload_is_an_empty_list_not_an_error() {
        let graph = FakeGraph {
            feed: json!({"unexpected": "shape"}),
            comments: HashMap::new(),
            failing: vec![],
        };

        let (items, threads) = collect(&graph, "p-1").await.unwrap();
        assert!(items.is_empty());
        assert!(threads.is_empty());
    }
}
