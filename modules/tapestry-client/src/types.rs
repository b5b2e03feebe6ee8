use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// --- List payload normalization ---

/// Union of the list response shapes Tapestry has been observed to return:
/// a bare array, or an object wrapping the array under one of several
/// conventional keys. Anything else normalizes to an empty list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListPayload {
    Bare(Vec<Value>),
    Keyed(KeyedList),
    Other(Value),
}

#[derive(Debug, Default, Deserialize)]
pub struct KeyedList {
    #[serde(default)]
    contents: Option<Vec<Value>>,
    #[serde(default)]
    comments: Option<Vec<Value>>,
    #[serde(default)]
    data: Option<Vec<Value>>,
    #[serde(default)]
    items: Option<Vec<Value>>,
}

impl ListPayload {
    /// Flatten to the wrapped entries. Key precedence matches what older
    /// and newer API versions return: contents, comments, data, items.
    pub fn into_entries(self) -> Vec<Value> {
        match self {
            ListPayload::Bare(entries) => entries,
            ListPayload::Keyed(keyed) => keyed
                .contents
                .or(keyed.comments)
                .or(keyed.data)
                .or(keyed.items)
                .unwrap_or_default(),
            ListPayload::Other(_) => Vec::new(),
        }
    }

    pub fn from_value(value: Value) -> Self {
        // The untagged Other arm catches every shape, so this cannot fail.
        serde_json::from_value(value).unwrap_or(ListPayload::Other(Value::Null))
    }
}

/// Parse a raw list response into feed items. A malformed entry degrades to
/// an empty default item instead of poisoning the whole page.
pub fn parse_feed_items(payload: ListPayload) -> Vec<FeedItem> {
    payload
        .into_entries()
        .into_iter()
        .map(|entry| serde_json::from_value(entry).unwrap_or_default())
        .collect()
}

/// Parse a raw list response into comment items, same degradation rules.
pub fn parse_comments(payload: ListPayload) -> Vec<CommentItem> {
    payload
        .into_entries()
        .into_iter()
        .map(|entry| serde_json::from_value(entry).unwrap_or_default())
        .collect()
}

// --- Feed items ---

/// A key/value property attached to a content node.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Property {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: String,
}

/// Inner content node. Feed entries either nest one of these under
/// `content` or carry the same fields at the top level.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentBody {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "type")]
    pub content_type: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub properties: Option<Vec<Property>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorRef {
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SocialCounts {
    #[serde(default, rename = "likeCount", deserialize_with = "lenient_count")]
    pub like_count: u64,
    #[serde(default, rename = "commentCount", deserialize_with = "lenient_count")]
    pub comment_count: u64,
}

/// A single entry from GET /contents/. Every field is optional because the
/// upstream shape varies between envelope and flat forms.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedItem {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub content: Option<ContentBody>,
    #[serde(default, rename = "authorProfile")]
    pub author_profile: Option<AuthorRef>,
    #[serde(default, rename = "socialCounts")]
    pub social_counts: Option<SocialCounts>,
    // Flat form: the entry itself is the content node.
    #[serde(default, rename = "type")]
    pub content_type: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub properties: Option<Vec<Property>>,
}

impl FeedItem {
    /// Id used to fetch the item's comment thread: nested content id first,
    /// then the entry's own id.
    pub fn content_id(&self) -> Option<&str> {
        self.content
            .as_ref()
            .and_then(|c| c.id.as_deref())
            .or(self.id.as_deref())
    }

    pub fn author_username(&self) -> &str {
        self.author_profile
            .as_ref()
            .and_then(|a| a.username.as_deref())
            .unwrap_or("")
    }

    pub fn like_count(&self) -> u64 {
        self.social_counts.as_ref().map_or(0, |c| c.like_count)
    }

    pub fn comment_count(&self) -> u64 {
        self.social_counts.as_ref().map_or(0, |c| c.comment_count)
    }

    /// Classification fields, resolved against whichever form the entry
    /// uses. When a nested content node exists its fields win outright; the
    /// flat fields are not consulted as a fallback.
    pub fn classification_fields(&self) -> (Option<&str>, &str, &[Property]) {
        match &self.content {
            Some(body) => (
                body.content_type.as_deref(),
                body.text.as_deref().unwrap_or(""),
                body.properties.as_deref().unwrap_or(&[]),
            ),
            None => (
                self.content_type.as_deref(),
                self.text.as_deref().unwrap_or(""),
                self.properties.as_deref().unwrap_or(&[]),
            ),
        }
    }
}

// --- Comments ---

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentBody {
    #[serde(default)]
    pub text: Option<String>,
}

/// A single entry from GET /comments/. The comment text may be nested under
/// `comment` or flat; the author under `author` or `authorProfile`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentItem {
    #[serde(default)]
    pub comment: Option<CommentBody>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub author: Option<AuthorRef>,
    #[serde(default, rename = "authorProfile")]
    pub author_profile: Option<AuthorRef>,
}

impl CommentItem {
    pub fn text(&self) -> &str {
        match &self.comment {
            Some(body) => body.text.as_deref().unwrap_or(""),
            None => self.text.as_deref().unwrap_or(""),
        }
    }

    pub fn author_username(&self) -> &str {
        self.author
            .as_ref()
            .and_then(|a| a.username.as_deref())
            .or_else(|| {
                self.author_profile
                    .as_ref()
                    .and_then(|a| a.username.as_deref())
            })
            .unwrap_or("")
    }
}

// --- Profiles ---

/// Envelope from POST /profiles/findOrCreate.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileEnvelope {
    #[serde(default)]
    pub profile: Option<RawProfile>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawProfile {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

/// Engagement counts occasionally arrive as numeric strings; coerce both
/// forms, defaulting everything else to zero.
fn lenient_count<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_u64().unwrap_or(0),
        Value::String(s) => s.parse().unwrap_or(0),
        _ => 0,
    })
}
