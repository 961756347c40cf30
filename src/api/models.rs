//! Wire models for the video and news APIs
//!
//! Every field is optional: upstream responses are routinely partial, and
//! the collectors decide per field whether absence is fatal for a page,
//! skips one item, or becomes a missing-value sentinel.

use serde::Deserialize;
use serde_json::Value;

/// Response body of the search endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub items: Option<Vec<SearchItem>>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchItem {
    pub id: Option<SearchItemId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchItemId {
    pub video_id: Option<String>,
}

impl SearchItem {
    pub fn video_id(&self) -> Option<&str> {
        self.id.as_ref()?.video_id.as_deref()
    }
}

/// Response body of the item-detail (videos) endpoint
#[derive(Debug, Deserialize)]
pub struct VideosResponse {
    pub items: Option<Vec<VideoItem>>,
}

#[derive(Debug, Deserialize)]
pub struct VideoItem {
    pub statistics: Option<VideoStatistics>,
}

/// Metrics may be decimal strings or JSON numbers; both are read as counts
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatistics {
    pub view_count: Option<Value>,
    pub like_count: Option<Value>,
}

impl VideoStatistics {
    pub fn views(&self) -> Option<u64> {
        self.view_count.as_ref().and_then(parse_count)
    }

    pub fn likes(&self) -> Option<u64> {
        self.like_count.as_ref().and_then(parse_count)
    }
}

/// Reads a non-negative count from a JSON string or number
pub fn parse_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Response body of the comment-thread endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentThreadsResponse {
    pub items: Option<Vec<CommentThread>>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CommentThread {
    pub snippet: Option<ThreadSnippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadSnippet {
    pub top_level_comment: Option<TopLevelComment>,
}

#[derive(Debug, Deserialize)]
pub struct TopLevelComment {
    pub snippet: Option<CommentSnippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentSnippet {
    pub text_original: Option<String>,
    pub updated_at: Option<String>,
}

impl CommentThread {
    /// Returns the top-level comment's text and update timestamp, if both exist
    pub fn text_and_updated_at(&self) -> Option<(&str, &str)> {
        let snippet = self
            .snippet
            .as_ref()?
            .top_level_comment
            .as_ref()?
            .snippet
            .as_ref()?;
        Some((
            snippet.text_original.as_deref()?,
            snippet.updated_at.as_deref()?,
        ))
    }
}

/// Response body of the news search endpoint
#[derive(Debug, Deserialize)]
pub struct NewsResponse {
    pub articles: Option<Vec<NewsArticle>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub title: Option<String>,
    pub content: Option<String>,
    pub published_at: Option<String>,
    pub source: Option<NewsSource>,
}

#[derive(Debug, Deserialize)]
pub struct NewsSource {
    pub name: Option<String>,
    pub url: Option<String>,
}
