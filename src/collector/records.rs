//! Records produced by the collectors
//!
//! These are the rows of the output tables. Field order is column order.

use serde::Serialize;

/// Statistics for one video
///
/// `None` in either metric is the missing-value sentinel: the detail endpoint
/// did not return that metric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoStats {
    pub video_id: String,
    pub view_count: Option<u64>,
    pub like_count: Option<u64>,
}

impl VideoStats {
    /// Creates the sentinel record for a video whose metrics could not be read
    pub fn missing(video_id: impl Into<String>) -> Self {
        Self {
            video_id: video_id.into(),
            view_count: None,
            like_count: None,
        }
    }

    /// Returns true if both metrics are present
    pub fn is_complete(&self) -> bool {
        self.view_count.is_some() && self.like_count.is_some()
    }

    /// Likes per view, when both are known and the video has been viewed
    pub fn like_ratio(&self) -> Option<f64> {
        match (self.like_count, self.view_count) {
            (Some(likes), Some(views)) if views > 0 => Some(likes as f64 / views as f64),
            _ => None,
        }
    }
}

/// Mean like ratio over the videos that have one
pub fn mean_like_ratio(stats: &[VideoStats]) -> Option<f64> {
    let ratios: Vec<f64> = stats.iter().filter_map(VideoStats::like_ratio).collect();
    if ratios.is_empty() {
        return None;
    }
    Some(ratios.iter().sum::<f64>() / ratios.len() as f64)
}

/// One top-level comment, tagged with the video it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CommentRecord {
    pub text: String,

    /// Date part (`YYYY-MM-DD`) of the comment's last update
    pub updated_at: String,

    pub video_id: String,
}

impl CommentRecord {
    /// Creates a record, keeping only the date part of `updated_at`
    pub fn new(text: &str, updated_at: &str, video_id: &str) -> Self {
        let date = updated_at.get(..10).unwrap_or(updated_at);
        Self {
            text: text.to_string(),
            updated_at: date.to_string(),
            video_id: video_id.to_string(),
        }
    }
}

/// One news article
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct NewsRecord {
    pub title: String,
    pub content: String,
    pub published_on: String,
    pub link: String,
    pub source: String,
}
