//! Bounded concurrent statistics fetcher
//!
//! One task per video ID. A failed or incomplete detail response produces a
//! sentinel record for that video only; sibling tasks are unaffected.

use crate::api::VideoApi;
use crate::collector::pool::WorkerPool;
use crate::collector::records::VideoStats;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Fetches statistics for every video, one record per input ID
///
/// Records are returned in completion order.
pub async fn fetch_video_stats(
    api: Arc<VideoApi>,
    pool: &WorkerPool,
    video_ids: &[String],
) -> Vec<VideoStats> {
    let total = video_ids.len();
    let done = Arc::new(AtomicUsize::new(0));

    let mut records = pool
        .run(video_ids.iter().cloned(), |video_id| {
            let api = api.clone();
            let done = done.clone();
            async move {
                let record = match api.video_stats(&video_id).await {
                    Ok(stats) => stats,
                    Err(e) => {
                        tracing::warn!("Stats for {} unavailable: {}", video_id, e);
                        VideoStats::missing(video_id)
                    }
                };
                let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
                tracing::debug!("Stats: {} / {}", finished, total);
                record
            }
        })
        .await;

    // Aborted tasks still owe their video a record
    let seen: HashSet<String> = records.iter().map(|r| r.video_id.clone()).collect();
    for video_id in video_ids {
        if !seen.contains(video_id) {
            records.push(VideoStats::missing(video_id.as_str()));
        }
    }

    let missing = records.iter().filter(|r| !r.is_complete()).count();
    if missing > 0 {
        tracing::info!("Stats: {} of {} videos have missing metrics", missing, total);
    }

    records
}
