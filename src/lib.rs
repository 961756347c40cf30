//! Celeb-Harvest: a bounded concurrent collector for celebrity media data
//!
//! This crate pages through a video search endpoint for each configured subject,
//! fans the discovered video IDs out to a bounded worker pool that fetches
//! statistics and comment threads, and writes the results as CSV tables.

pub mod api;
pub mod collector;
pub mod config;
pub mod output;
pub mod state;

use thiserror::Error;

/// Main error type for Celeb-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    #[error("Malformed response from {endpoint}: {detail}")]
    MalformedResponse { endpoint: String, detail: String },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Subject task for '{subject}' aborted: {message}")]
    TaskAborted { subject: String, message: String },
}

impl HarvestError {
    /// Returns true if this error means the upstream page could not be
    /// interpreted, as opposed to the request itself failing
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedResponse { .. })
    }

    /// Classifies a reqwest error raised while talking to `url`
    pub(crate) fn from_request(url: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else {
            Self::Http {
                url: url.to_string(),
                source,
            }
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to parse subjects file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Celeb-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use collector::{run_batch, BatchReport, Coordinator, SubjectReport};
pub use config::{Config, Subject};
pub use state::{PageStop, SubjectState};
