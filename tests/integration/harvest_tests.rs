//! End-to-end tests for the video pipeline
//!
//! The search, videos and commentThreads endpoints are served by wiremock;
//! tables are written to a temporary directory.

use crate::support::*;
use celeb_harvest::api::VideoApi;
use celeb_harvest::collector::{
    collect_video_ids, fetch_comments, fetch_video_stats, run_batch, CommentRecord, Coordinator,
    NewsRecord, SubjectHarvest, VideoStats, WorkerPool,
};
use celeb_harvest::config::NewsConfig;
use celeb_harvest::output::{
    format_markdown_summary, CsvOutput, OutputError, OutputHandler, OutputResult,
};
use celeb_harvest::{PageStop, SubjectState};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer};

async fn mount_search(server: &MockServer, responder: SearchResponder) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(responder)
        .mount(server)
        .await;
}

async fn mount_videos(server: &MockServer, responder: VideosResponder) {
    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(responder)
        .mount(server)
        .await;
}

async fn mount_comments(server: &MockServer, responder: CommentsResponder) {
    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .respond_with(responder)
        .mount(server)
        .await;
}

fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_search_truncates_to_unique_cap() {
    let server = MockServer::start().await;
    mount_search(
        &server,
        SearchResponder::new().pages(
            "adele",
            vec![vec!["a", "b", "a"], vec!["c", "b", "d", "e"], vec!["f"]],
        ),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, dir.path(), vec![]);
    let api = VideoApi::new(&config.api, &config.collector).unwrap();

    let collected = collect_video_ids(&api, &subject("Adele", "adele"), 4, None)
        .await
        .unwrap();

    assert_eq!(collected.items, ids(&["a", "b", "c", "d"]));
    assert_eq!(collected.stop, PageStop::CapReached);
    assert_eq!(request_count(&server, "/search").await, 2);
}

#[tokio::test]
async fn test_search_stops_at_cap_on_endless_cursor() {
    let server = MockServer::start().await;
    mount_search(&server, SearchResponder::new().endless("adele")).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, dir.path(), vec![]);
    let api = VideoApi::new(&config.api, &config.collector).unwrap();

    let collected = collect_video_ids(&api, &subject("Adele", "adele"), 7, None)
        .await
        .unwrap();

    assert_eq!(collected.len(), 7);
    assert_eq!(collected.stop, PageStop::CapReached);
    assert_eq!(request_count(&server, "/search").await, 2);
}

#[tokio::test]
async fn test_search_stops_when_cursor_absent() {
    let server = MockServer::start().await;
    mount_search(
        &server,
        SearchResponder::new().pages("adele", vec![vec!["a", "b"], vec!["c"]]),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, dir.path(), vec![]);
    let api = VideoApi::new(&config.api, &config.collector).unwrap();

    let collected = collect_video_ids(&api, &subject("Adele", "adele"), 50, None)
        .await
        .unwrap();

    assert_eq!(collected.items, ids(&["a", "b", "c"]));
    assert_eq!(collected.stop, PageStop::CursorExhausted);
    assert_eq!(request_count(&server, "/search").await, 2);
    assert_eq!(
        request_count_with(&server, "/search", "pageToken", "p1").await,
        1
    );
}

#[tokio::test]
async fn test_search_sends_window_and_ordering() {
    let server = MockServer::start().await;
    mount_search(
        &server,
        SearchResponder::new().pages("adele tour", vec![vec!["a"]]),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, dir.path(), vec![]);
    let api = VideoApi::new(&config.api, &config.collector).unwrap();

    collect_video_ids(&api, &subject("Adele", "adele tour"), 10, None)
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(query(request, "q").as_deref(), Some("adele tour"));
    assert_eq!(query(request, "type").as_deref(), Some("video"));
    assert_eq!(query(request, "order").as_deref(), Some("date"));
    assert_eq!(
        query(request, "publishedAfter").as_deref(),
        Some("2023-01-01T00:00:00Z")
    );
    assert_eq!(
        query(request, "publishedBefore").as_deref(),
        Some("2023-06-30T00:00:00Z")
    );
    assert_eq!(query(request, "pageToken"), None);
}

#[tokio::test]
async fn test_stats_one_record_per_video() {
    let server = MockServer::start().await;
    mount_videos(
        &server,
        VideosResponder::new().malformed("c").failing("d"),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, dir.path(), vec![]);
    let api = Arc::new(VideoApi::new(&config.api, &config.collector).unwrap());
    let video_ids = ids(&["a", "b", "c", "d", "e"]);

    let mut stats = fetch_video_stats(api, &WorkerPool::new(3), &video_ids).await;
    stats.sort_by(|x, y| x.video_id.cmp(&y.video_id));

    assert_eq!(stats.len(), 5);
    for record in &stats {
        match record.video_id.as_str() {
            "c" | "d" => {
                assert_eq!(record.view_count, None);
                assert_eq!(record.like_count, None);
            }
            _ => {
                assert_eq!(record.view_count, Some(1000));
                assert_eq!(record.like_count, Some(50));
            }
        }
    }
    assert_eq!(request_count(&server, "/videos").await, 5);
}

#[tokio::test]
async fn test_comments_capped_per_video() {
    let server = MockServer::start().await;
    mount_comments(&server, CommentsResponder::new(3, 4)).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, dir.path(), vec![]);
    let api = Arc::new(VideoApi::new(&config.api, &config.collector).unwrap());

    let comments = fetch_comments(api, &WorkerPool::new(2), &ids(&["v1", "v2"]), 6, None).await;

    assert_eq!(comments.len(), 12);
    for video in ["v1", "v2"] {
        let texts: Vec<&str> = comments
            .iter()
            .filter(|c| c.video_id == video)
            .map(|c| c.text.as_str())
            .collect();
        let expected: Vec<String> = (0..6).map(|i| format!("{} comment {}", video, i)).collect();
        assert_eq!(texts, expected);
        assert_eq!(
            request_count_with(&server, "/commentThreads", "videoId", video).await,
            2
        );
    }

    // Rows from one video stay contiguous
    let first_v2 = comments.iter().position(|c| c.video_id == "v2").unwrap();
    assert!(comments[first_v2..first_v2 + 6]
        .iter()
        .all(|c| c.video_id == "v2"));
    assert!(comments.iter().all(|c| c.updated_at == "2023-02-01"));
}

#[tokio::test]
async fn test_comment_failure_keeps_partial_stream() {
    let server = MockServer::start().await;
    mount_comments(
        &server,
        CommentsResponder::new(3, 4).failing_after_first("v2"),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, dir.path(), vec![]);
    let api = Arc::new(VideoApi::new(&config.api, &config.collector).unwrap());

    let comments = fetch_comments(api, &WorkerPool::new(2), &ids(&["v1", "v2"]), 10, None).await;

    let count = |video: &str| comments.iter().filter(|c| c.video_id == video).count();
    assert_eq!(count("v1"), 10);
    assert_eq!(count("v2"), 4);
}

#[tokio::test]
async fn test_subject_tables_written() {
    let server = MockServer::start().await;
    mount_search(
        &server,
        SearchResponder::new().pages("adele", vec![vec!["a", "b"], vec!["c"]]),
    )
    .await;
    mount_videos(&server, VideosResponder::new().malformed("b")).await;
    mount_comments(&server, CommentsResponder::new(2, 2)).await;

    let dir = TempDir::new().unwrap();
    let adele = subject("Adele", "adele");
    let config = create_test_config(&server, dir.path(), vec![adele.clone()]);
    let output = CsvOutput::new(&config.output.directory).unwrap();
    let out_dir = output.directory().to_path_buf();

    let harvest = Coordinator::new(config, Arc::new(output))
        .run_subject(&adele)
        .await
        .unwrap();

    assert_eq!(harvest.video_ids, ids(&["a", "b", "c"]));
    assert_eq!(harvest.stats.len(), 3);
    assert_eq!(harvest.comments.len(), 12);
    assert!(harvest.news.is_none());

    let stats = read_lines(&out_dir.join("Adele_youtube_stats.csv"));
    assert_eq!(stats[0], "video_id,view_count,like_count");
    assert_eq!(stats.len(), 4);
    assert!(stats.contains(&"b,,".to_string()));
    assert!(stats.contains(&"a,1000,50".to_string()));

    let comments = read_lines(&out_dir.join("Adele_youtube_comments.csv"));
    assert_eq!(comments[0], "text,updated_at,video_id");
    assert_eq!(comments.len(), 13);
    assert!(comments.contains(&"a comment 0,2023-02-01,a".to_string()));
}

#[tokio::test]
async fn test_empty_search_writes_empty_tables() {
    let server = MockServer::start().await;
    mount_search(&server, SearchResponder::new()).await;
    mount_videos(&server, VideosResponder::new()).await;
    mount_comments(&server, CommentsResponder::new(1, 1)).await;

    let dir = TempDir::new().unwrap();
    let nobody = subject("Nobody", "nobody");
    let config = create_test_config(&server, dir.path(), vec![nobody.clone()]);
    let output = CsvOutput::new(&config.output.directory).unwrap();
    let out_dir = output.directory().to_path_buf();

    let harvest = Coordinator::new(config, Arc::new(output))
        .run_subject(&nobody)
        .await
        .unwrap();

    assert!(harvest.video_ids.is_empty());
    assert_eq!(harvest.search_stop, PageStop::CursorExhausted);
    assert_eq!(request_count(&server, "/videos").await, 0);
    assert_eq!(request_count(&server, "/commentThreads").await, 0);

    assert_eq!(
        read_lines(&out_dir.join("Nobody_youtube_stats.csv")),
        vec!["video_id,view_count,like_count"]
    );
    assert_eq!(
        read_lines(&out_dir.join("Nobody_youtube_comments.csv")),
        vec!["text,updated_at,video_id"]
    );
}

#[tokio::test]
async fn test_failing_subject_is_isolated() {
    let server = MockServer::start().await;
    mount_search(
        &server,
        SearchResponder::new()
            .pages("adele", vec![vec!["a1", "a2"]])
            .pages("drake", vec![vec!["d1"]])
            .failing("boom"),
    )
    .await;
    mount_videos(&server, VideosResponder::new()).await;
    mount_comments(&server, CommentsResponder::new(1, 1)).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(
        &server,
        dir.path(),
        vec![
            subject("Adele", "adele"),
            subject("Boom", "boom"),
            subject("Drake", "drake"),
        ],
    );
    let out_dir = Path::new(&config.output.directory).to_path_buf();

    let report = run_batch(config).await.unwrap();

    let names: Vec<&str> = report.subjects.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Adele", "Boom", "Drake"]);
    assert_eq!(report.subjects[0].state, SubjectState::Completed);
    assert_eq!(report.subjects[1].state, SubjectState::Failed);
    assert_eq!(report.subjects[2].state, SubjectState::Completed);
    assert!(report.subjects[1]
        .error
        .as_deref()
        .unwrap()
        .contains("500"));
    assert_eq!(report.harvests.len(), 2);

    assert!(out_dir.join("Adele_youtube_stats.csv").exists());
    assert!(out_dir.join("Drake_youtube_stats.csv").exists());
    assert!(!out_dir.join("Boom_youtube_stats.csv").exists());

    let merged = read_lines(&out_dir.join("merged_youtube_stats.csv"));
    assert_eq!(merged[0], "subject,video_id,view_count,like_count");
    assert_eq!(merged.len(), 4);
    assert!(merged.contains(&"Adele,a1,1000,50".to_string()));
    assert!(merged.contains(&"Drake,d1,1000,50".to_string()));
    assert!(!merged.iter().any(|line| line.starts_with("Boom,")));

    let merged_comments = read_lines(&out_dir.join("merged_youtube_comments.csv"));
    assert_eq!(merged_comments[0], "subject,text,updated_at,video_id");
    assert_eq!(merged_comments.len(), 4);

    let md = format_markdown_summary(&report, "hash");
    assert!(md.contains("## Failed Subjects"));
    assert!(md.contains("**Boom**"));
}

#[tokio::test]
async fn test_news_skipped_without_api_key() {
    let server = MockServer::start().await;
    mount_search(&server, SearchResponder::new().pages("adele", vec![vec!["a"]])).await;
    mount_videos(&server, VideosResponder::new()).await;
    mount_comments(&server, CommentsResponder::new(1, 1)).await;

    let dir = TempDir::new().unwrap();
    let adele = subject("Adele", "adele");
    let mut config = create_test_config(&server, dir.path(), vec![adele.clone()]);
    config.news = Some(NewsConfig {
        search_url: format!("{}/news", server.uri()),
        api_key_env: "CELEB_HARVEST_TEST_UNSET_KEY".to_string(),
        page_delay_ms: 0,
        max_articles_per_page: 10,
    });
    let output = CsvOutput::new(&config.output.directory).unwrap();
    let out_dir = output.directory().to_path_buf();

    let harvest = Coordinator::new(config, Arc::new(output))
        .run_subject(&adele)
        .await
        .unwrap();

    assert!(harvest.news.is_none());
    assert_eq!(request_count(&server, "/news").await, 0);
    assert!(!out_dir.join("Adele_news.csv").exists());
}

#[tokio::test]
async fn test_partial_statistics_keep_the_present_metric() {
    let server = MockServer::start().await;
    mount_search(
        &server,
        SearchResponder::new().pages("adele", vec![vec!["full", "nolikes", "noviews"]]),
    )
    .await;
    mount_videos(
        &server,
        VideosResponder::new()
            .without_likes("nolikes")
            .without_views("noviews"),
    )
    .await;
    mount_comments(&server, CommentsResponder::new(1, 0)).await;

    let dir = TempDir::new().unwrap();
    let adele = subject("Adele", "adele");
    let config = create_test_config(&server, dir.path(), vec![adele.clone()]);
    let output = CsvOutput::new(&config.output.directory).unwrap();
    let out_dir = output.directory().to_path_buf();

    let harvest = Coordinator::new(config, Arc::new(output))
        .run_subject(&adele)
        .await
        .unwrap();

    let record = |id: &str| harvest.stats.iter().find(|s| s.video_id == id).unwrap();
    assert_eq!(record("nolikes").view_count, Some(1000));
    assert_eq!(record("nolikes").like_count, None);
    assert_eq!(record("noviews").view_count, None);
    assert_eq!(record("noviews").like_count, Some(50));

    let stats = read_lines(&out_dir.join("Adele_youtube_stats.csv"));
    assert_eq!(stats.len(), 4);
    assert!(stats.contains(&"full,1000,50".to_string()));
    assert!(stats.contains(&"nolikes,1000,".to_string()));
    assert!(stats.contains(&"noviews,,50".to_string()));
}

/// Writes through CSV but refuses comment tables
struct RejectComments(CsvOutput);

impl OutputHandler for RejectComments {
    fn write_stats(&self, subject: &str, stats: &[VideoStats]) -> OutputResult<PathBuf> {
        self.0.write_stats(subject, stats)
    }

    fn write_comments(&self, _: &str, _: &[CommentRecord]) -> OutputResult<PathBuf> {
        Err(OutputError::Write("disk full".to_string()))
    }

    fn write_news(&self, subject: &str, articles: &[NewsRecord]) -> OutputResult<PathBuf> {
        self.0.write_news(subject, articles)
    }

    fn write_merged(&self, harvests: &[SubjectHarvest]) -> OutputResult<Vec<PathBuf>> {
        self.0.write_merged(harvests)
    }

    fn discard(&self, subject: &str) -> OutputResult<()> {
        self.0.discard(subject)
    }
}

#[tokio::test]
async fn test_failed_write_leaves_no_partial_tables() {
    let server = MockServer::start().await;
    mount_search(&server, SearchResponder::new().pages("adele", vec![vec!["a"]])).await;
    mount_videos(&server, VideosResponder::new()).await;
    mount_comments(&server, CommentsResponder::new(1, 1)).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, dir.path(), vec![subject("Adele", "adele")]);
    let output = CsvOutput::new(&config.output.directory).unwrap();
    let out_dir = output.directory().to_path_buf();

    let subjects = config.subjects.clone();
    let report = Coordinator::new(config, Arc::new(RejectComments(output)))
        .run(subjects)
        .await;

    assert_eq!(report.subjects[0].state, SubjectState::Failed);
    assert!(report.subjects[0]
        .error
        .as_deref()
        .unwrap()
        .contains("disk full"));
    assert!(!out_dir.join("Adele_youtube_stats.csv").exists());
    assert!(!out_dir.join("Adele_youtube_comments.csv").exists());

    let merged = read_lines(&out_dir.join("merged_youtube_stats.csv"));
    assert_eq!(merged, vec!["subject,video_id,view_count,like_count"]);
}
