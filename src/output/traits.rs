//! Output handler traits and types
//!
//! This module defines the trait interface for output handlers and
//! associated error types.

use crate::collector::{CommentRecord, NewsRecord, SubjectHarvest, VideoStats};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for output handlers
///
/// Each subject's tables are written once, by the task orchestrating that
/// subject, after all of its fetches have joined. Writing a table for a
/// subject replaces any earlier table for the same subject. Implementations
/// must be thread-safe since subjects run concurrently.
pub trait OutputHandler: Send + Sync {
    /// Writes the per-video statistics table for a subject
    fn write_stats(&self, subject: &str, stats: &[VideoStats]) -> OutputResult<PathBuf>;

    /// Writes the comment table for a subject
    fn write_comments(&self, subject: &str, comments: &[CommentRecord]) -> OutputResult<PathBuf>;

    /// Writes the news article table for a subject
    fn write_news(&self, subject: &str, articles: &[NewsRecord]) -> OutputResult<PathBuf>;

    /// Writes the tables merged across every successfully harvested subject
    fn write_merged(&self, harvests: &[SubjectHarvest]) -> OutputResult<Vec<PathBuf>>;

    /// Removes every per-subject table of a subject, if present
    fn discard(&self, subject: &str) -> OutputResult<()>;
}
