//! CSV output handler
//!
//! Writes one column-headered CSV file per subject and data kind, plus merged
//! files carrying a leading `subject` column. Files are truncated on write, so
//! a rerun overwrites the previous tables.

use crate::collector::{CommentRecord, NewsRecord, SubjectHarvest, VideoStats};
use crate::output::traits::{OutputHandler, OutputResult};
use csv::WriterBuilder;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// File name prefix of the tables merged across subjects
pub const MERGED_PREFIX: &str = "merged";

const STATS_HEADER: [&str; 3] = ["video_id", "view_count", "like_count"];
const COMMENTS_HEADER: [&str; 3] = ["text", "updated_at", "video_id"];
const NEWS_HEADER: [&str; 5] = ["title", "content", "published_on", "link", "source"];

/// CSV-based output handler rooted at one directory
#[derive(Debug, Clone)]
pub struct CsvOutput {
    directory: PathBuf,
}

impl CsvOutput {
    /// Creates the handler, creating the output directory if needed
    pub fn new(directory: impl Into<PathBuf>) -> OutputResult<Self> {
        let directory = directory.into();
        std::fs::create_dir_all(&directory)?;
        Ok(Self { directory })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn stats_path(&self, subject: &str) -> PathBuf {
        self.directory.join(format!("{}_youtube_stats.csv", subject))
    }

    pub fn comments_path(&self, subject: &str) -> PathBuf {
        self.directory
            .join(format!("{}_youtube_comments.csv", subject))
    }

    pub fn news_path(&self, subject: &str) -> PathBuf {
        self.directory.join(format!("{}_news.csv", subject))
    }

    pub fn merged_stats_path(&self) -> PathBuf {
        self.directory
            .join(format!("{}_youtube_stats.csv", MERGED_PREFIX))
    }

    pub fn merged_comments_path(&self) -> PathBuf {
        self.directory
            .join(format!("{}_youtube_comments.csv", MERGED_PREFIX))
    }
}

#[derive(Serialize)]
struct MergedStatsRow<'a> {
    subject: &'a str,
    video_id: &'a str,
    view_count: Option<u64>,
    like_count: Option<u64>,
}

#[derive(Serialize)]
struct MergedCommentRow<'a> {
    subject: &'a str,
    text: &'a str,
    updated_at: &'a str,
    video_id: &'a str,
}

/// Writes a header row followed by one row per record
///
/// The header is written explicitly so that empty tables still carry it. Rows
/// go to a sibling `.tmp` file that replaces `path` only once complete.
fn write_table<R, I>(path: &Path, header: &[&str], rows: I) -> OutputResult<()>
where
    R: Serialize,
    I: IntoIterator<Item = R>,
{
    let staging = path.with_extension("csv.tmp");
    let written = write_rows(&staging, header, rows);
    if written.is_err() {
        let _ = std::fs::remove_file(&staging);
        return written;
    }
    std::fs::rename(&staging, path)?;
    Ok(())
}

fn write_rows<R, I>(path: &Path, header: &[&str], rows: I) -> OutputResult<()>
where
    R: Serialize,
    I: IntoIterator<Item = R>,
{
    let mut writer = WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record(header)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn remove_if_present(path: &Path) -> OutputResult<()> {
    match std::fs::remove_file(path) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
        _ => Ok(()),
    }
}

impl OutputHandler for CsvOutput {
    fn write_stats(&self, subject: &str, stats: &[VideoStats]) -> OutputResult<PathBuf> {
        let path = self.stats_path(subject);
        write_table(&path, &STATS_HEADER, stats)?;
        Ok(path)
    }

    fn write_comments(&self, subject: &str, comments: &[CommentRecord]) -> OutputResult<PathBuf> {
        let path = self.comments_path(subject);
        write_table(&path, &COMMENTS_HEADER, comments)?;
        Ok(path)
    }

    fn write_news(&self, subject: &str, articles: &[NewsRecord]) -> OutputResult<PathBuf> {
        let path = self.news_path(subject);
        write_table(&path, &NEWS_HEADER, articles)?;
        Ok(path)
    }

    fn write_merged(&self, harvests: &[SubjectHarvest]) -> OutputResult<Vec<PathBuf>> {
        let stats_path = self.merged_stats_path();
        let stats_rows = harvests.iter().flat_map(|h| {
            h.stats.iter().map(move |s| MergedStatsRow {
                subject: &h.subject,
                video_id: &s.video_id,
                view_count: s.view_count,
                like_count: s.like_count,
            })
        });
        let mut header = vec!["subject"];
        header.extend(STATS_HEADER);
        write_table(&stats_path, &header, stats_rows)?;

        let comments_path = self.merged_comments_path();
        let comment_rows = harvests.iter().flat_map(|h| {
            h.comments.iter().map(move |c| MergedCommentRow {
                subject: &h.subject,
                text: &c.text,
                updated_at: &c.updated_at,
                video_id: &c.video_id,
            })
        });
        let mut header = vec!["subject"];
        header.extend(COMMENTS_HEADER);
        write_table(&comments_path, &header, comment_rows)?;

        Ok(vec![stats_path, comments_path])
    }

    fn discard(&self, subject: &str) -> OutputResult<()> {
        remove_if_present(&self.stats_path(subject))?;
        remove_if_present(&self.comments_path(subject))?;
        remove_if_present(&self.news_path(subject))
    }
}
