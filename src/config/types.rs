use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use std::num::NonZeroUsize;
use std::time::Duration;

/// Main configuration structure for Celeb-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub collector: CollectorConfig,
    pub api: ApiConfig,
    #[serde(default)]
    pub news: Option<NewsConfig>,
    pub output: OutputConfig,

    /// Optional JSON file holding additional subjects
    #[serde(rename = "subjects-file", default)]
    pub subjects_file: Option<String>,

    #[serde(rename = "subject", default)]
    pub subjects: Vec<Subject>,
}

impl Config {
    /// Finds a subject by its display name
    pub fn subject(&self, name: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.name == name)
    }
}

/// Collection limits and worker pool sizing
#[derive(Debug, Clone, Deserialize)]
pub struct CollectorConfig {
    /// Hard ceiling on video IDs collected per subject
    #[serde(rename = "max-video-count")]
    pub max_video_count: usize,

    /// Hard ceiling on comments collected per video
    #[serde(rename = "max-comments-per-video")]
    pub max_comments_per_video: usize,

    /// Page size requested from the search and comment endpoints
    #[serde(rename = "page-size", default = "default_page_size")]
    pub page_size: u32,

    /// Timeout applied to every HTTP request (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Optional hard ceiling on pages requested by any single pagination loop
    #[serde(rename = "max-pages", default)]
    pub max_pages: Option<u32>,

    /// Per-subject fetch pool size (defaults to available parallelism)
    #[serde(default)]
    pub workers: Option<usize>,

    /// Subject dispatch pool size (defaults to available parallelism)
    #[serde(rename = "subject-workers", default)]
    pub subject_workers: Option<usize>,
}

impl CollectorConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Number of concurrent fetch tasks per subject
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(available_parallelism)
    }

    /// Number of subjects processed concurrently
    pub fn subject_worker_count(&self) -> usize {
        self.subject_workers.unwrap_or_else(available_parallelism)
    }
}

fn available_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

fn default_page_size() -> u32 {
    50
}

fn default_request_timeout() -> u64 {
    30
}

/// Video API endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(rename = "search-url")]
    pub search_url: String,

    #[serde(rename = "videos-url")]
    pub videos_url: String,

    #[serde(rename = "comment-threads-url")]
    pub comment_threads_url: String,

    /// User agent sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

fn default_user_agent() -> String {
    format!("celeb-harvest/{}", env!("CARGO_PKG_VERSION"))
}

/// News search settings
#[derive(Debug, Clone, Deserialize)]
pub struct NewsConfig {
    #[serde(rename = "search-url")]
    pub search_url: String,

    /// Name of the environment variable holding the API key
    #[serde(rename = "api-key-env", default = "default_api_key_env")]
    pub api_key_env: String,

    /// Fixed pause between page requests (milliseconds)
    #[serde(rename = "page-delay-ms", default = "default_page_delay")]
    pub page_delay_ms: u64,

    #[serde(rename = "max-articles-per-page", default = "default_articles_per_page")]
    pub max_articles_per_page: u32,
}

impl NewsConfig {
    /// Reads the API key from the configured environment variable
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }

    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }
}

fn default_api_key_env() -> String {
    "GNEWS_API_KEY".to_string()
}

fn default_page_delay() -> u64 {
    200
}

fn default_articles_per_page() -> u32 {
    100
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving the per-subject and merged CSV files
    pub directory: String,

    /// Path to the markdown run summary
    #[serde(rename = "summary-path")]
    pub summary_path: String,
}

/// One input record: the entity the whole pipeline runs for
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Subject {
    /// Display name, also used to name output files
    pub name: String,

    #[serde(rename = "search-term", alias = "search_term")]
    pub search_term: String,

    #[serde(rename = "start-date", alias = "start_date")]
    pub start_date: DateTime<Utc>,

    #[serde(rename = "end-date", alias = "end_date")]
    pub end_date: DateTime<Utc>,
}

impl Subject {
    /// Start of the window in the `YYYY-MM-DDTHH:MM:SSZ` form the APIs expect
    pub fn published_after(&self) -> String {
        self.start_date.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    /// End of the window in the `YYYY-MM-DDTHH:MM:SSZ` form the APIs expect
    pub fn published_before(&self) -> String {
        self.end_date.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}
