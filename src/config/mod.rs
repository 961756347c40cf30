//! Configuration module for Celeb-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files,
//! including subject lists pulled in from an external JSON file.
//!
//! # Example
//!
//! ```no_run
//! use celeb_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Collecting up to {} videos per subject", config.collector.max_video_count);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{ApiConfig, CollectorConfig, Config, NewsConfig, OutputConfig, Subject};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, load_subjects_file};
