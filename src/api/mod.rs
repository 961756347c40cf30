//! Upstream API access
//!
//! This module wraps the three video endpoints (search, videos,
//! commentThreads) and the news search endpoint. Each wrapper issues a single
//! request and reshapes the JSON body into crate records; pagination and
//! concurrency live in `collector`.

mod client;
pub mod models;
mod news;

pub use client::{build_http_client, VideoApi};
pub use news::NewsApi;

/// One page of results from a paginated endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Items extracted from the page, in upstream order
    pub items: Vec<T>,

    /// Continuation cursor for the next page, absent on the last page
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    /// Creates a page, treating an empty cursor string as absent
    pub fn new(items: Vec<T>, next_cursor: Option<String>) -> Self {
        Self {
            items,
            next_cursor: next_cursor.filter(|c| !c.is_empty()),
        }
    }
}
