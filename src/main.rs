//! Celeb-Harvest main entry point
//!
//! This is the command-line interface for the Celeb-Harvest media collector.

use anyhow::{bail, Context};
use celeb_harvest::config::{load_config_with_hash, Config, Subject};
use celeb_harvest::output::{generate_markdown_summary, print_statistics, CsvOutput};
use celeb_harvest::Coordinator;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Celeb-Harvest: a bounded concurrent collector for celebrity media data
///
/// For each configured subject, Celeb-Harvest pages through the video search
/// endpoint within the subject's date window, fetches statistics and comments
/// for every video found, and writes per-subject and merged CSV tables.
#[derive(Parser, Debug)]
#[command(name = "celeb-harvest")]
#[command(version)]
#[command(about = "A bounded concurrent collector for celebrity media data", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be collected without collecting
    #[arg(long)]
    dry_run: bool,

    /// Only run the named subjects (repeatable)
    #[arg(long, value_name = "NAME")]
    only: Vec<String>,

    /// Skip news collection even when configured
    #[arg(long)]
    skip_news: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    let subjects = select_subjects(&config, &cli.only)?;

    if cli.dry_run {
        print_plan(&config, &subjects, cli.skip_news);
        return Ok(());
    }

    handle_harvest(config, subjects, &config_hash, cli.skip_news).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("celeb_harvest=info,warn"),
            1 => EnvFilter::new("celeb_harvest=debug,info"),
            2 => EnvFilter::new("celeb_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Applies the `--only` filter, keeping configuration order
fn select_subjects(config: &Config, only: &[String]) -> anyhow::Result<Vec<Subject>> {
    if only.is_empty() {
        return Ok(config.subjects.clone());
    }

    for name in only {
        if config.subject(name).is_none() {
            bail!("Unknown subject: {}", name);
        }
    }

    Ok(config
        .subjects
        .iter()
        .filter(|s| only.contains(&s.name))
        .cloned()
        .collect())
}

/// Handles the --dry-run mode: shows what would be collected
fn print_plan(config: &Config, subjects: &[Subject], skip_news: bool) {
    println!("=== Celeb-Harvest Dry Run ===\n");

    let collector = &config.collector;
    println!("Collector Configuration:");
    println!("  Max videos per subject: {}", collector.max_video_count);
    println!(
        "  Max comments per video: {}",
        collector.max_comments_per_video
    );
    println!("  Page size: {}", collector.page_size);
    println!("  Request timeout: {}s", collector.request_timeout_secs);
    match collector.max_pages {
        Some(max) => println!("  Max pages per loop: {}", max),
        None => println!("  Max pages per loop: unbounded"),
    }
    println!("  Fetch workers per subject: {}", collector.worker_count());
    println!("  Subject workers: {}", collector.subject_worker_count());

    println!("\nEndpoints:");
    println!("  Search: {}", config.api.search_url);
    println!("  Videos: {}", config.api.videos_url);
    println!("  Comment threads: {}", config.api.comment_threads_url);
    println!("  User agent: {}", config.api.user_agent);

    match (&config.news, skip_news) {
        (Some(news), false) => {
            println!("\nNews:");
            println!("  Search: {}", news.search_url);
            println!(
                "  API key ({}): {}",
                news.api_key_env,
                if news.api_key().is_some() { "set" } else { "missing" }
            );
            println!("  Page delay: {}ms", news.page_delay_ms);
        }
        (Some(_), true) => println!("\nNews: skipped (--skip-news)"),
        (None, _) => println!("\nNews: not configured"),
    }

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory);
    println!("  Summary: {}", config.output.summary_path);

    println!("\nSubjects ({}):", subjects.len());
    for subject in subjects {
        println!(
            "  - {} ('{}', {} to {})",
            subject.name,
            subject.search_term,
            subject.published_after(),
            subject.published_before()
        );
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main harvest operation
async fn handle_harvest(
    config: Config,
    subjects: Vec<Subject>,
    config_hash: &str,
    skip_news: bool,
) -> anyhow::Result<()> {
    let output = CsvOutput::new(&config.output.directory).with_context(|| {
        format!(
            "Failed to create output directory {}",
            config.output.directory
        )
    })?;
    let summary_path = PathBuf::from(&config.output.summary_path);

    tracing::info!(
        "Starting harvest of {} subjects into {}",
        subjects.len(),
        output.directory().display()
    );

    let mut coordinator = Coordinator::new(config, Arc::new(output));
    if skip_news {
        coordinator = coordinator.without_news();
    }

    let report = coordinator.run(subjects).await;

    print_statistics(&report);
    write_summary(&report, config_hash, &summary_path);

    Ok(())
}

fn write_summary(report: &celeb_harvest::BatchReport, config_hash: &str, path: &Path) {
    match generate_markdown_summary(report, config_hash, path) {
        Ok(()) => tracing::info!("Summary written to: {}", path.display()),
        Err(e) => tracing::error!("Failed to write summary: {}", e),
    }
}
