//! Bounded concurrent comment fetcher
//!
//! Each video's comment stream is paginated sequentially inside a single pool
//! task; videos are processed concurrently. A video whose stream fails part
//! way keeps the comments gathered before the failure.

use crate::api::VideoApi;
use crate::collector::paginate::{paginate, Pagination};
use crate::collector::pool::WorkerPool;
use crate::collector::records::CommentRecord;
use std::sync::Arc;

/// Fetches up to `cap` comments for every video and flattens them into one table
///
/// Rows from one video stay contiguous and in upstream order; videos appear
/// in completion order. Videos with no comments contribute no rows.
pub async fn fetch_comments(
    api: Arc<VideoApi>,
    pool: &WorkerPool,
    video_ids: &[String],
    cap: usize,
    max_pages: Option<u32>,
) -> Vec<CommentRecord> {
    let limits = Pagination::new(cap)
        .max_pages(max_pages)
        .tolerate_request_errors();

    let per_video = pool
        .run(video_ids.iter().cloned(), |video_id| {
            let api = api.clone();
            async move {
                let label = format!("comments[{}]", video_id);
                let fetched = paginate(&label, limits, |cursor| {
                    let api = api.clone();
                    let video_id = video_id.clone();
                    async move { api.comment_page(&video_id, cursor.as_deref()).await }
                })
                .await;

                match fetched {
                    Ok(collected) => collected.items,
                    Err(e) => {
                        tracing::warn!("Comments for {} unavailable: {}", video_id, e);
                        Vec::new()
                    }
                }
            }
        })
        .await;

    let rows: Vec<CommentRecord> = per_video.into_iter().flatten().collect();
    tracing::debug!(
        "Comments: {} rows from {} videos",
        rows.len(),
        video_ids.len()
    );
    rows
}
