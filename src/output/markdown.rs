//! Markdown run summary
//!
//! Records, per subject, whether it completed or failed and how much it
//! collected. A failed subject and a subject that completed with no data
//! are therefore distinguishable after the fact.

use crate::collector::BatchReport;
use crate::output::stats::BatchStatistics;
use crate::output::traits::OutputResult;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the markdown summary of a batch to `output_path`
pub fn generate_markdown_summary(
    report: &BatchReport,
    config_hash: &str,
    output_path: &Path,
) -> OutputResult<()> {
    let markdown = format_markdown_summary(report, config_hash);

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a batch report as markdown
pub fn format_markdown_summary(report: &BatchReport, config_hash: &str) -> String {
    let stats = BatchStatistics::from_report(report);
    let mut md = String::new();

    md.push_str("# Celeb-Harvest Run Summary\n\n");

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Started**: {}\n", report.started_at.to_rfc3339()));
    md.push_str(&format!("- **Finished**: {}\n", report.finished_at.to_rfc3339()));
    md.push_str(&format!("- **Duration**: {} seconds\n", stats.duration_seconds));
    md.push_str(&format!("- **Config Hash**: {}\n\n", config_hash));

    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!(
        "- **Subjects**: {} ({} completed, {} failed)\n",
        stats.subjects, stats.completed, stats.failed
    ));
    md.push_str(&format!("- **Videos**: {}\n", stats.videos));
    md.push_str(&format!(
        "- **Videos With Missing Metrics**: {}\n",
        stats.videos_missing_stats
    ));
    md.push_str(&format!("- **Comments**: {}\n", stats.comments));
    md.push_str(&format!("- **News Articles**: {}\n", stats.news_articles));
    md.push_str(&format!("- **Success Rate**: {:.2}%\n\n", stats.success_rate()));

    md.push_str("## Subjects\n\n");
    md.push_str("| Subject | State | Videos | Comments | News | Mean Like Ratio |\n");
    md.push_str("|---------|-------|--------|----------|------|-----------------|\n");
    for subject in &report.subjects {
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} |\n",
            escape_cell(&subject.name),
            subject.state,
            subject.videos,
            subject.comments,
            subject
                .news
                .map(|n| n.to_string())
                .unwrap_or_else(|| "-".to_string()),
            subject
                .mean_like_ratio
                .map(|r| format!("{:.4}", r))
                .unwrap_or_else(|| "-".to_string()),
        ));
    }
    md.push('\n');

    let failures: Vec<_> = report
        .subjects
        .iter()
        .filter_map(|s| s.error.as_ref().map(|e| (&s.name, e)))
        .collect();
    if !failures.is_empty() {
        md.push_str("## Failed Subjects\n\n");
        for (name, error) in failures {
            md.push_str(&format!("- **{}**: {}\n", name, error));
        }
        md.push('\n');
    }

    md
}

fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|")
}
