//! Collection pipeline
//!
//! This module contains the collection logic:
//! - Cursor pagination over the search and comment endpoints
//! - A bounded worker pool for per-video fetches
//! - The statistics, comment and news collectors
//! - The coordinator that runs subjects in isolation

mod comments;
mod coordinator;
mod news;
mod paginate;
mod pool;
mod records;
mod search;
mod stats;

pub use comments::fetch_comments;
pub use coordinator::{run_batch, BatchReport, Coordinator, SubjectHarvest, SubjectReport};
pub use news::collect_news;
pub use paginate::{paginate, paginate_unique, Collected, Pagination};
pub use pool::WorkerPool;
pub use records::{mean_like_ratio, CommentRecord, NewsRecord, VideoStats};
pub use search::collect_video_ids;
pub use stats::fetch_video_stats;
