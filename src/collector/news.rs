//! Page-numbered news collector
//!
//! Requests pages 1, 2, 3, ... with a fixed pause between requests and stops
//! at the first empty, malformed or failed page. Nothing here is fatal to the
//! subject: failures end collection with what was gathered.

use crate::api::NewsApi;
use crate::collector::paginate::Collected;
use crate::collector::records::NewsRecord;
use crate::config::Subject;
use crate::state::PageStop;
use std::time::Duration;

pub async fn collect_news(
    api: &NewsApi,
    subject: &Subject,
    max_pages: Option<u32>,
    page_delay: Duration,
) -> Collected<NewsRecord> {
    let mut items = Vec::new();
    let mut pages = 0u32;

    let stop = loop {
        if max_pages.is_some_and(|max| pages >= max) {
            break PageStop::PageLimit;
        }

        if pages > 0 {
            tokio::time::sleep(page_delay).await;
        }

        let page = match api.article_page(subject, pages + 1).await {
            Ok(page) => page,
            Err(e) if e.is_malformed() => {
                tracing::warn!("news[{}]: {}", subject.name, e);
                break PageStop::Malformed;
            }
            Err(e) => {
                tracing::warn!("news[{}]: {}", subject.name, e);
                break PageStop::RequestFailed;
            }
        };

        if page.next_cursor.is_none() {
            break PageStop::EmptyPage;
        }

        pages += 1;
        items.extend(page.items);
    };

    tracing::info!(
        "news[{}]: {} articles over {} pages ({})",
        subject.name,
        items.len(),
        pages,
        stop
    );

    Collected { items, pages, stop }
}
