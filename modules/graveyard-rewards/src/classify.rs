//! Pure classification predicates. Everything here is a deterministic
//! function of the content; absent or malformed input is the negative case.

use tapestry_client::FeedItem;

/// Text prefix marking a quest for writers that predate the `type` property.
pub const QUEST_TAG: &str = "[QUEST]";

/// A completion comment must carry this marker.
pub const COMPLETION_MARKER: &str = "✅ Completed:";

/// Transaction-reference line inside a completion comment.
pub const TX_MARKER: &str = "Tx:";

/// Fallback proof token for memo-path completions that carry no transaction
/// reference.
pub const MEMO_PROOF_MARKER: &str = "GRAVEYARD_QUEST_COMPLETE";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Post,
    Quest,
}

/// Decide whether a feed item is a quest. Three tiers, highest first, so
/// content from older and newer writers of the format both classify:
/// an explicit `type` field, a `type=quest` property, or a `[QUEST]`-prefixed
/// text body.
pub fn classify_content(item: &FeedItem) -> ContentKind {
    let (content_type, text, properties) = item.classification_fields();

    if content_type == Some("quest") {
        return ContentKind::Quest;
    }
    if properties
        .iter()
        .any(|p| p.key == "type" && p.value == "quest")
    {
        return ContentKind::Quest;
    }
    if text.trim_start().to_uppercase().starts_with(QUEST_TAG) {
        return ContentKind::Quest;
    }
    ContentKind::Post
}

/// True iff the text asserts a completion: the marker plus either a tx
/// reference or the memo proof token. The engine trusts the text; no
/// on-chain verification happens here.
pub fn is_completion_comment(text: &str) -> bool {
    text.contains(COMPLETION_MARKER)
        && (text.contains(TX_MARKER) || text.contains(MEMO_PROOF_MARKER))
}
