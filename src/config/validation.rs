use crate::config::types::{ApiConfig, CollectorConfig, Config, NewsConfig, OutputConfig, Subject};
use crate::output::MERGED_PREFIX;
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_collector_config(&config.collector)?;
    validate_api_config(&config.api)?;
    if let Some(news) = &config.news {
        validate_news_config(news)?;
    }
    validate_output_config(&config.output)?;
    validate_subjects(&config.subjects)?;
    Ok(())
}

/// Validates collection limits and pool sizes
fn validate_collector_config(config: &CollectorConfig) -> Result<(), ConfigError> {
    if config.max_video_count < 1 {
        return Err(ConfigError::Validation(format!(
            "max_video_count must be >= 1, got {}",
            config.max_video_count
        )));
    }

    if config.max_comments_per_video < 1 {
        return Err(ConfigError::Validation(format!(
            "max_comments_per_video must be >= 1, got {}",
            config.max_comments_per_video
        )));
    }

    if config.page_size < 1 || config.page_size > 50 {
        return Err(ConfigError::Validation(format!(
            "page_size must be between 1 and 50, got {}",
            config.page_size
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.max_pages == Some(0) {
        return Err(ConfigError::Validation(
            "max_pages must be >= 1 when set".to_string(),
        ));
    }

    for (key, value) in [
        ("workers", config.workers),
        ("subject_workers", config.subject_workers),
    ] {
        if let Some(n) = value {
            if n < 1 || n > 256 {
                return Err(ConfigError::Validation(format!(
                    "{} must be between 1 and 256, got {}",
                    key, n
                )));
            }
        }
    }

    Ok(())
}

fn validate_api_config(config: &ApiConfig) -> Result<(), ConfigError> {
    validate_endpoint("search_url", &config.search_url)?;
    validate_endpoint("videos_url", &config.videos_url)?;
    validate_endpoint("comment_threads_url", &config.comment_threads_url)?;

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_news_config(config: &NewsConfig) -> Result<(), ConfigError> {
    validate_endpoint("news.search_url", &config.search_url)?;

    if config.api_key_env.is_empty() {
        return Err(ConfigError::Validation(
            "news.api_key_env cannot be empty".to_string(),
        ));
    }

    if config.max_articles_per_page < 1 || config.max_articles_per_page > 100 {
        return Err(ConfigError::Validation(format!(
            "news.max_articles_per_page must be between 1 and 100, got {}",
            config.max_articles_per_page
        )));
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    if config.summary_path.is_empty() {
        return Err(ConfigError::Validation(
            "summary_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the subject list: non-empty, unique file-safe names, sane windows
fn validate_subjects(subjects: &[Subject]) -> Result<(), ConfigError> {
    if subjects.is_empty() {
        return Err(ConfigError::Validation(
            "at least one subject must be configured".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for subject in subjects {
        validate_subject_name(&subject.name)?;

        if !seen.insert(subject.name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate subject name '{}'",
                subject.name
            )));
        }

        if subject.search_term.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "subject '{}' has an empty search term",
                subject.name
            )));
        }

        if subject.start_date >= subject.end_date {
            return Err(ConfigError::Validation(format!(
                "subject '{}' start date must be before end date",
                subject.name
            )));
        }
    }

    Ok(())
}

/// Subject names become file name prefixes
fn validate_subject_name(name: &str) -> Result<(), ConfigError> {
    if name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "subject name cannot be empty".to_string(),
        ));
    }

    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(ConfigError::Validation(format!(
            "subject name '{}' cannot contain path separators",
            name
        )));
    }

    // Per-subject tables would collide with the merged tables
    if name.eq_ignore_ascii_case(MERGED_PREFIX) {
        return Err(ConfigError::Validation(format!(
            "subject name '{}' is reserved for merged output",
            name
        )));
    }

    Ok(())
}

fn validate_endpoint(key: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", key, value, e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} must use http or https, got '{}'",
            key, value
        )));
    }

    Ok(())
}
