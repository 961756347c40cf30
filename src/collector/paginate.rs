//! Continuation-cursor pagination driver
//!
//! Drives any cursor-paginated endpoint until one of:
//! - the accumulator reaches its cap
//! - a page arrives without a continuation cursor
//! - a page is malformed (the partial accumulation is kept)
//! - the optional page ceiling is hit
//!
//! Page N+1 is never requested before page N has returned its cursor.

use crate::api::Page;
use crate::state::PageStop;
use crate::Result;
use std::collections::HashSet;
use std::future::Future;
use std::hash::Hash;

/// Bounds for one pagination loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Hard ceiling on accumulated items
    pub cap: usize,

    /// Optional hard ceiling on pages requested
    pub max_pages: Option<u32>,

    /// Stop with the partial accumulation on request failures instead of
    /// propagating them
    pub tolerate_request_errors: bool,
}

impl Pagination {
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            max_pages: None,
            tolerate_request_errors: false,
        }
    }

    pub fn max_pages(mut self, max_pages: Option<u32>) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn tolerate_request_errors(mut self) -> Self {
        self.tolerate_request_errors = true;
        self
    }
}

/// Items accumulated by one pagination loop
#[derive(Debug, Clone, PartialEq)]
pub struct Collected<T> {
    pub items: Vec<T>,

    /// Pages successfully fetched
    pub pages: u32,

    pub stop: PageStop,
}

impl<T> Collected<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Accumulates every item from every page, up to the cap
///
/// `fetch` receives the previous page's cursor (`None` for the first page).
pub async fn paginate<T, F, Fut>(
    label: &str,
    limits: Pagination,
    fetch: F,
) -> Result<Collected<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    drive(label, limits, fetch, |acc: &mut Vec<T>, items| acc.extend(items)).await
}

/// Accumulates distinct items in first-seen order, up to the cap
///
/// Duplicates are dropped on insert, so the cap counts unique items only.
pub async fn paginate_unique<T, F, Fut>(
    label: &str,
    limits: Pagination,
    fetch: F,
) -> Result<Collected<T>>
where
    T: Eq + Hash + Clone,
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut seen = HashSet::new();
    drive(label, limits, fetch, move |acc: &mut Vec<T>, items: Vec<T>| {
        for item in items {
            if seen.insert(item.clone()) {
                acc.push(item);
            }
        }
    })
    .await
}

async fn drive<T, F, Fut, A>(
    label: &str,
    limits: Pagination,
    mut fetch: F,
    mut absorb: A,
) -> Result<Collected<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
    A: FnMut(&mut Vec<T>, Vec<T>),
{
    let mut items = Vec::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0u32;

    let stop = loop {
        if items.len() >= limits.cap {
            break PageStop::CapReached;
        }

        if limits.max_pages.is_some_and(|max| pages >= max) {
            tracing::warn!("{}: stopping at page ceiling of {}", label, pages);
            break PageStop::PageLimit;
        }

        let page = match fetch(cursor.take()).await {
            Ok(page) => page,
            Err(e) if e.is_malformed() => {
                tracing::warn!("{}: {} (keeping {} items)", label, e, items.len());
                break PageStop::Malformed;
            }
            Err(e) if limits.tolerate_request_errors => {
                tracing::warn!("{}: {} (keeping {} items)", label, e, items.len());
                break PageStop::RequestFailed;
            }
            Err(e) => return Err(e),
        };

        pages += 1;
        let received = page.items.len();
        absorb(&mut items, page.items);
        tracing::trace!(
            "{}: page {} returned {} items, {} accumulated",
            label,
            pages,
            received,
            items.len()
        );

        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None if items.len() >= limits.cap => break PageStop::CapReached,
            None => break PageStop::CursorExhausted,
        }
    };

    items.truncate(limits.cap);
    tracing::debug!(
        "{}: collected {} items over {} pages ({})",
        label,
        items.len(),
        pages,
        stop
    );

    Ok(Collected { items, pages, stop })
}
