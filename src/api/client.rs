//! HTTP client and video endpoint wrappers
//!
//! This module handles:
//! - Building HTTP clients with a user agent and per-request timeout
//! - Issuing search, videos and commentThreads requests
//! - Classifying failures into malformed pages versus failed requests

use crate::api::models::{CommentThreadsResponse, SearchItem, SearchResponse, VideosResponse};
use crate::api::Page;
use crate::collector::{CommentRecord, VideoStats};
use crate::config::{ApiConfig, CollectorConfig, Subject};
use crate::{HarvestError, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent string sent with every request
/// * `timeout` - Upper bound on each request, connect included
///
/// # Example
///
/// ```no_run
/// use celeb_harvest::api::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client("celeb-harvest/1.0", Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &str,
    timeout: Duration,
) -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Issues a GET request and decodes the JSON body
///
/// Non-success statuses become `HarvestError::Status`; bodies that are not
/// valid JSON for `T` become `HarvestError::MalformedResponse`.
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &Client,
    endpoint: &str,
    url: &str,
    query: &[(&str, String)],
) -> Result<T> {
    let response = client
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(|e| HarvestError::from_request(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(HarvestError::Status {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
        });
    }

    response.json::<T>().await.map_err(|e| {
        if e.is_decode() {
            HarvestError::MalformedResponse {
                endpoint: endpoint.to_string(),
                detail: e.to_string(),
            }
        } else {
            HarvestError::from_request(url, e)
        }
    })
}

pub(crate) fn missing_field(endpoint: &str, field: &str) -> HarvestError {
    HarvestError::MalformedResponse {
        endpoint: endpoint.to_string(),
        detail: format!("missing `{}` field", field),
    }
}

/// Client handle for the video endpoints
///
/// Each subject builds its own handle, so connection pools are never shared
/// across subjects.
#[derive(Debug)]
pub struct VideoApi {
    client: Client,
    search_url: String,
    videos_url: String,
    comment_threads_url: String,
    page_size: u32,
}

impl VideoApi {
    /// Creates a new handle with its own HTTP client
    pub fn new(api: &ApiConfig, collector: &CollectorConfig) -> Result<Self> {
        let client = build_http_client(&api.user_agent, collector.request_timeout())?;

        Ok(Self {
            client,
            search_url: api.search_url.clone(),
            videos_url: api.videos_url.clone(),
            comment_threads_url: api.comment_threads_url.clone(),
            page_size: collector.page_size,
        })
    }

    /// Fetches one page of video IDs matching the subject's search term and
    /// date window, newest first
    ///
    /// Search items without a video ID (channels, playlists) are dropped.
    pub async fn search_page(
        &self,
        subject: &Subject,
        cursor: Option<&str>,
    ) -> Result<Page<String>> {
        let mut query = vec![
            ("part", "id,snippet".to_string()),
            ("maxResults", self.page_size.to_string()),
            ("q", subject.search_term.clone()),
            ("type", "video".to_string()),
            ("publishedBefore", subject.published_before()),
            ("publishedAfter", subject.published_after()),
            ("order", "date".to_string()),
        ];
        if let Some(token) = cursor {
            query.push(("pageToken", token.to_string()));
        }

        let response: SearchResponse =
            get_json(&self.client, "search", &self.search_url, &query).await?;
        let items = response
            .items
            .ok_or_else(|| missing_field("search", "items"))?;

        let ids = items
            .iter()
            .filter_map(SearchItem::video_id)
            .map(str::to_string)
            .collect();

        Ok(Page::new(ids, response.next_page_token))
    }

    /// Fetches view and like counts for one video
    ///
    /// A response without an item or without a `statistics` object is
    /// malformed. A statistics object missing one metric yields `None` for
    /// that metric only.
    pub async fn video_stats(&self, video_id: &str) -> Result<VideoStats> {
        let query = [
            ("part", "id,snippet,statistics".to_string()),
            ("id", video_id.to_string()),
        ];

        let response: VideosResponse =
            get_json(&self.client, "videos", &self.videos_url, &query).await?;
        let statistics = response
            .items
            .and_then(|items| items.into_iter().next())
            .ok_or_else(|| missing_field("videos", "items"))?
            .statistics
            .ok_or_else(|| missing_field("videos", "statistics"))?;

        Ok(VideoStats {
            video_id: video_id.to_string(),
            view_count: statistics.views(),
            like_count: statistics.likes(),
        })
    }

    /// Fetches one page of top-level comments for a video
    ///
    /// Threads missing their text or timestamp are skipped individually.
    pub async fn comment_page(
        &self,
        video_id: &str,
        cursor: Option<&str>,
    ) -> Result<Page<CommentRecord>> {
        let mut query = vec![
            ("part", "id,snippet".to_string()),
            ("maxResults", self.page_size.to_string()),
            ("videoId", video_id.to_string()),
        ];
        if let Some(token) = cursor {
            query.push(("pageToken", token.to_string()));
        }

        let response: CommentThreadsResponse = get_json(
            &self.client,
            "commentThreads",
            &self.comment_threads_url,
            &query,
        )
        .await?;
        let items = response
            .items
            .ok_or_else(|| missing_field("commentThreads", "items"))?;

        let comments = items
            .iter()
            .filter_map(|thread| thread.text_and_updated_at())
            .map(|(text, updated_at)| CommentRecord::new(text, updated_at, video_id))
            .collect();

        Ok(Page::new(comments, response.next_page_token))
    }
}
