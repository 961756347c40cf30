//! Harvest coordinator - subject orchestration and batch dispatch
//!
//! For one subject the coordinator:
//! - collects video IDs from the search endpoint
//! - fetches statistics and comments for those IDs concurrently
//! - optionally collects news articles
//! - writes the subject's tables once everything has joined
//!
//! For a batch it runs every subject in its own spawned task on a second,
//! coarser pool. A subject that errors or panics is logged, recorded as
//! failed and left out of the merged tables; its siblings carry on.

use crate::api::{NewsApi, VideoApi};
use crate::collector::comments::fetch_comments;
use crate::collector::news::collect_news;
use crate::collector::pool::WorkerPool;
use crate::collector::records::{mean_like_ratio, CommentRecord, NewsRecord, VideoStats};
use crate::collector::search::collect_video_ids;
use crate::collector::stats::fetch_video_stats;
use crate::config::{Config, Subject};
use crate::output::{CsvOutput, OutputHandler};
use crate::state::{PageStop, SubjectState};
use crate::{HarvestError, Result};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;

/// Everything collected for one subject
#[derive(Debug, Clone)]
pub struct SubjectHarvest {
    pub subject: String,

    /// Distinct video IDs in search order
    pub video_ids: Vec<String>,

    /// Why the video search stopped
    pub search_stop: PageStop,

    /// One record per video, in completion order
    pub stats: Vec<VideoStats>,

    pub comments: Vec<CommentRecord>,

    /// `None` when news collection did not run for this subject
    pub news: Option<Vec<NewsRecord>>,
}

impl SubjectHarvest {
    pub fn report(&self) -> SubjectReport {
        SubjectReport {
            name: self.subject.clone(),
            state: SubjectState::Completed,
            videos: self.video_ids.len(),
            comments: self.comments.len(),
            news: self.news.as_ref().map(Vec::len),
            mean_like_ratio: mean_like_ratio(&self.stats),
            error: None,
        }
    }
}

/// Outcome of one subject within a batch
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectReport {
    pub name: String,
    pub state: SubjectState,
    pub videos: usize,
    pub comments: usize,
    pub news: Option<usize>,
    pub mean_like_ratio: Option<f64>,
    pub error: Option<String>,
}

impl SubjectReport {
    pub fn failed(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: SubjectState::Failed,
            videos: 0,
            comments: 0,
            news: None,
            mean_like_ratio: None,
            error: Some(error.into()),
        }
    }
}

/// Outcome of a whole batch
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// One report per dispatched subject, in input order
    pub subjects: Vec<SubjectReport>,

    /// Harvests of the completed subjects only, in input order
    pub harvests: Vec<SubjectHarvest>,
}

impl BatchReport {
    pub fn completed(&self) -> impl Iterator<Item = &SubjectReport> {
        self.subjects
            .iter()
            .filter(|s| s.state == SubjectState::Completed)
    }

    pub fn failed(&self) -> impl Iterator<Item = &SubjectReport> {
        self.subjects
            .iter()
            .filter(|s| s.state == SubjectState::Failed)
    }
}

type SubjectOutcome = (String, std::result::Result<SubjectHarvest, String>);

/// Orchestrates collection for one or many subjects
#[derive(Clone)]
pub struct Coordinator {
    config: Arc<Config>,
    output: Arc<dyn OutputHandler>,
    include_news: bool,
}

impl Coordinator {
    /// Creates a coordinator writing through `output`
    ///
    /// News collection is enabled whenever the config has a `[news]` section.
    pub fn new(config: Config, output: Arc<dyn OutputHandler>) -> Self {
        let include_news = config.news.is_some();
        Self {
            config: Arc::new(config),
            output,
            include_news,
        }
    }

    /// Disables news collection regardless of configuration
    pub fn without_news(mut self) -> Self {
        self.include_news = false;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs the full pipeline for one subject and writes its tables
    ///
    /// Only search request failures and output failures are returned as
    /// errors. Per-video failures are absorbed into sentinels or partial
    /// comment streams.
    pub async fn run_subject(&self, subject: &Subject) -> Result<SubjectHarvest> {
        let collector = &self.config.collector;
        tracing::info!(
            "{}: searching '{}' from {} to {}",
            subject.name,
            subject.search_term,
            subject.published_after(),
            subject.published_before()
        );

        // Each subject owns its client handle
        let api = Arc::new(VideoApi::new(&self.config.api, collector)?);
        let pool = WorkerPool::new(collector.worker_count());

        let search = collect_video_ids(
            &api,
            subject,
            collector.max_video_count,
            collector.max_pages,
        )
        .await?;
        if search.stop.is_abnormal() {
            tracing::warn!(
                "{}: search ended early ({}), keeping {} videos",
                subject.name,
                search.stop,
                search.len()
            );
        } else {
            tracing::info!(
                "{}: {} videos over {} pages ({})",
                subject.name,
                search.len(),
                search.pages,
                search.stop
            );
        }
        let video_ids = search.items;

        let (stats, comments) = tokio::join!(
            fetch_video_stats(api.clone(), &pool, &video_ids),
            fetch_comments(
                api.clone(),
                &pool,
                &video_ids,
                collector.max_comments_per_video,
                collector.max_pages,
            ),
        );
        tracing::info!(
            "{}: {} stats records, {} comments",
            subject.name,
            stats.len(),
            comments.len()
        );

        let news = self.collect_news(subject).await;

        let harvest = SubjectHarvest {
            subject: subject.name.clone(),
            video_ids,
            search_stop: search.stop,
            stats,
            comments,
            news,
        };
        self.write_tables(&harvest)?;

        Ok(harvest)
    }

    /// Writes every table of a subject, or none of them
    ///
    /// On a failed write the tables already written for the subject are
    /// discarded so that a failed subject leaves no partial output behind.
    fn write_tables(&self, harvest: &SubjectHarvest) -> Result<()> {
        let written = self
            .output
            .write_stats(&harvest.subject, &harvest.stats)
            .and_then(|_| {
                self.output
                    .write_comments(&harvest.subject, &harvest.comments)
            })
            .and_then(|_| match &harvest.news {
                Some(articles) => self
                    .output
                    .write_news(&harvest.subject, articles)
                    .map(drop),
                None => Ok(()),
            });

        if let Err(e) = written {
            if let Err(cleanup) = self.output.discard(&harvest.subject) {
                tracing::warn!(
                    "{}: could not discard partial tables: {}",
                    harvest.subject,
                    cleanup
                );
            }
            return Err(e.into());
        }

        Ok(())
    }

    /// Collects news when enabled and an API key is available
    async fn collect_news(&self, subject: &Subject) -> Option<Vec<NewsRecord>> {
        if !self.include_news {
            return None;
        }
        let news = self.config.news.as_ref()?;

        let Some(api_key) = news.api_key() else {
            tracing::warn!(
                "{}: {} is not set, skipping news",
                subject.name,
                news.api_key_env
            );
            return None;
        };

        let api = match NewsApi::new(
            news,
            api_key,
            &self.config.api.user_agent,
            self.config.collector.request_timeout(),
        ) {
            Ok(api) => api,
            Err(e) => {
                tracing::warn!("{}: news client unavailable: {}", subject.name, e);
                return None;
            }
        };

        let collected = collect_news(
            &api,
            subject,
            self.config.collector.max_pages,
            news.page_delay(),
        )
        .await;
        Some(collected.items)
    }

    /// Runs every subject on the subject pool and writes the merged tables
    ///
    /// Never fails as a whole: subject failures are reported per subject.
    pub async fn run(&self, subjects: Vec<Subject>) -> BatchReport {
        let started_at = Utc::now();
        let order: Vec<String> = subjects.iter().map(|s| s.name.clone()).collect();
        let pool = WorkerPool::new(self.config.collector.subject_worker_count());

        tracing::info!(
            "Dispatching {} subjects across {} workers",
            subjects.len(),
            pool.size()
        );
        for name in &order {
            tracing::debug!("{}: {}", name, SubjectState::Pending);
        }

        let outcomes = pool
            .run(subjects, |subject| {
                let coordinator = self.clone();
                async move { coordinator.dispatch(subject).await }
            })
            .await;

        let mut reports = Vec::with_capacity(order.len());
        let mut harvests = Vec::new();
        let mut seen = HashSet::new();
        for (name, outcome) in outcomes {
            seen.insert(name.clone());
            match outcome {
                Ok(harvest) => {
                    reports.push(harvest.report());
                    harvests.push(harvest);
                }
                Err(error) => reports.push(SubjectReport::failed(name, error)),
            }
        }
        for name in order.iter().filter(|n| !seen.contains(*n)) {
            reports.push(SubjectReport::failed(name.as_str(), "subject task aborted"));
        }

        let position = |name: &str| order.iter().position(|n| n == name);
        reports.sort_by_key(|r| position(&r.name));
        harvests.sort_by_key(|h| position(&h.subject));

        match self.output.write_merged(&harvests) {
            Ok(paths) => tracing::info!(
                "Merged {} subjects into {} tables",
                harvests.len(),
                paths.len()
            ),
            Err(e) => tracing::error!("Failed to write merged tables: {}", e),
        }

        let report = BatchReport {
            started_at,
            finished_at: Utc::now(),
            subjects: reports,
            harvests,
        };
        tracing::info!(
            "Batch finished: {} completed, {} failed in {}s",
            report.completed().count(),
            report.failed().count(),
            (report.finished_at - report.started_at).num_seconds()
        );

        report
    }

    /// Runs one subject in its own task so that an error or panic stays
    /// contained to that subject
    async fn dispatch(self, subject: Subject) -> SubjectOutcome {
        let name = subject.name.clone();
        tracing::debug!("{}: {}", name, SubjectState::Collecting);

        let handle = tokio::spawn(async move { self.run_subject(&subject).await });
        let result = match handle.await {
            Ok(result) => result,
            Err(e) => Err(HarvestError::TaskAborted {
                subject: name.clone(),
                message: e.to_string(),
            }),
        };

        match result {
            Ok(harvest) => {
                tracing::info!("{}: {}", name, SubjectState::Completed);
                (name, Ok(harvest))
            }
            Err(e) => {
                tracing::error!(
                    "{}: {}, excluded from merged output: {}",
                    name,
                    SubjectState::Failed,
                    e
                );
                (name, Err(e.to_string()))
            }
        }
    }
}

/// Runs every configured subject, writing CSV tables to the configured directory
///
/// # Example
///
/// ```no_run
/// use celeb_harvest::config::load_config;
/// use celeb_harvest::collector::run_batch;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("harvest.toml"))?;
/// let report = run_batch(config).await?;
/// println!("{} subjects completed", report.harvests.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_batch(config: Config) -> Result<BatchReport> {
    let output = Arc::new(CsvOutput::new(&config.output.directory)?);
    let subjects = config.subjects.clone();
    Ok(Coordinator::new(config, output).run(subjects).await)
}
