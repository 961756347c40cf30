//! Batch statistics
//!
//! Aggregate counts derived from a finished batch, for console output and the
//! markdown summary.

use crate::collector::BatchReport;

/// Aggregate counts for one batch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchStatistics {
    pub subjects: usize,
    pub completed: usize,
    pub failed: usize,
    pub videos: usize,

    /// Videos whose statistics carry at least one missing metric
    pub videos_missing_stats: usize,

    pub comments: usize,
    pub news_articles: usize,
    pub duration_seconds: i64,
}

impl BatchStatistics {
    pub fn from_report(report: &BatchReport) -> Self {
        Self {
            subjects: report.subjects.len(),
            completed: report.completed().count(),
            failed: report.failed().count(),
            videos: report.harvests.iter().map(|h| h.video_ids.len()).sum(),
            videos_missing_stats: report
                .harvests
                .iter()
                .flat_map(|h| &h.stats)
                .filter(|s| !s.is_complete())
                .count(),
            comments: report.harvests.iter().map(|h| h.comments.len()).sum(),
            news_articles: report
                .harvests
                .iter()
                .filter_map(|h| h.news.as_ref())
                .map(Vec::len)
                .sum(),
            duration_seconds: (report.finished_at - report.started_at).num_seconds(),
        }
    }

    /// Completed subjects as a percentage of all subjects
    pub fn success_rate(&self) -> f64 {
        if self.subjects == 0 {
            return 0.0;
        }
        (self.completed as f64 / self.subjects as f64) * 100.0
    }
}

/// Prints a batch report to stdout in a formatted manner
pub fn print_statistics(report: &BatchReport) {
    let stats = BatchStatistics::from_report(report);

    println!("=== Harvest Statistics ===\n");

    println!("Overview:");
    println!(
        "  Subjects: {} ({} completed, {} failed)",
        stats.subjects, stats.completed, stats.failed
    );
    println!(
        "  Videos: {} ({} with missing metrics)",
        stats.videos, stats.videos_missing_stats
    );
    println!("  Comments: {}", stats.comments);
    println!("  News articles: {}", stats.news_articles);
    println!("  Duration: {}s", stats.duration_seconds);
    println!();

    println!("Subjects:");
    for subject in &report.subjects {
        match &subject.error {
            Some(error) => println!("  {} [{}]: {}", subject.name, subject.state, error),
            None => println!(
                "  {} [{}]: {} videos, {} comments{}",
                subject.name,
                subject.state,
                subject.videos,
                subject.comments,
                subject
                    .mean_like_ratio
                    .map(|r| format!(", like ratio {:.4}", r))
                    .unwrap_or_default()
            ),
        }
    }
    println!();

    println!("Success rate: {:.1}%", stats.success_rate());
}
