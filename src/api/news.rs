use crate::api::client::{build_http_client, get_json, missing_field};
use crate::api::models::{NewsArticle, NewsResponse};
use crate::api::Page;
use crate::collector::NewsRecord;
use crate::config::{NewsConfig, Subject};
use crate::Result;
use reqwest::Client;
use std::time::Duration;

/// Client handle for the page-numbered news search endpoint
#[derive(Debug)]
pub struct NewsApi {
    client: Client,
    search_url: String,
    api_key: String,
    per_page: u32,
}

impl NewsApi {
    pub fn new(
        news: &NewsConfig,
        api_key: String,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            client: build_http_client(user_agent, timeout)?,
            search_url: news.search_url.clone(),
            api_key,
            per_page: news.max_articles_per_page,
        })
    }

    /// Fetches page `page` (1-based) of articles for the subject's window
    ///
    /// The returned cursor holds the next page number, and is absent once the
    /// endpoint returns no articles. Articles lacking a title, content,
    /// publish time or source are dropped without ending pagination.
    pub async fn article_page(&self, subject: &Subject, page: u32) -> Result<Page<NewsRecord>> {
        let query = [
            ("apikey", self.api_key.clone()),
            ("from", subject.published_after()),
            ("to", subject.published_before()),
            ("q", subject.search_term.clone()),
            ("max", self.per_page.to_string()),
            ("expand", "content".to_string()),
            ("sortby", "publishedAt".to_string()),
            ("page", page.to_string()),
        ];

        let response: NewsResponse =
            get_json(&self.client, "news", &self.search_url, &query).await?;
        let articles = response
            .articles
            .ok_or_else(|| missing_field("news", "articles"))?;

        let next = (!articles.is_empty()).then(|| (page + 1).to_string());
        Ok(Page::new(
            articles.into_iter().filter_map(to_record).collect(),
            next,
        ))
    }
}

fn to_record(article: NewsArticle) -> Option<NewsRecord> {
    let source = article.source?;
    Some(NewsRecord {
        title: article.title?,
        content: article.content?,
        published_on: article.published_at?,
        link: source.url?,
        source: source.name?,
    })
}
