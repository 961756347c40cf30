use crate::api::VideoApi;
use crate::collector::paginate::{paginate_unique, Collected, Pagination};
use crate::config::Subject;
use crate::Result;

/// Collects up to `max_videos` distinct video IDs for a subject
///
/// IDs keep the order the search endpoint returned them in (newest first).
/// Request failures propagate; a malformed page ends the search with the IDs
/// gathered so far.
pub async fn collect_video_ids(
    api: &VideoApi,
    subject: &Subject,
    max_videos: usize,
    max_pages: Option<u32>,
) -> Result<Collected<String>> {
    let label = format!("search[{}]", subject.name);
    let limits = Pagination::new(max_videos).max_pages(max_pages);

    paginate_unique(&label, limits, |cursor| async move {
        api.search_page(subject, cursor.as_deref()).await
    })
    .await
}
