//! NewsAPI `everything` keyword search.
//!
//! Results are requested newest first, in English, with the page size set to
//! the topic limit. The API key is sent as the `apiKey` query parameter and
//! must come from configuration; there is no built-in key.

use super::ArticleSource;
use crate::api::{get_json, with_query};
use crate::error::FetchError;
use crate::models::RawArticle;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    status: Option<String>,
    code: Option<String>,
    message: Option<String>,
    #[serde(default)]
    articles: Vec<SearchArticle>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchArticle {
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    url_to_image: Option<String>,
    published_at: Option<String>,
    source: Option<SearchSourceRef>,
}

#[derive(Debug, Deserialize)]
struct SearchSourceRef {
    name: Option<String>,
}

impl From<SearchArticle> for RawArticle {
    fn from(a: SearchArticle) -> Self {
        RawArticle {
            title: a.title.unwrap_or_default(),
            link: a.url.unwrap_or_default(),
            summary: a.description.unwrap_or_default(),
            date: a.published_at.unwrap_or_default(),
            source: a.source.and_then(|s| s.name).unwrap_or_default(),
            image: Some(a.url_to_image.unwrap_or_default()),
        }
    }
}

/// NewsAPI `everything` search, newest first.
pub struct SearchApiSource {
    client: Client,
    base: Url,
    api_key: String,
    timeout: Duration,
}

impl SearchApiSource {
    /// Create a search source.
    ///
    /// # Arguments
    ///
    /// * `client` - Shared HTTP client
    /// * `base` - Search endpoint URL
    /// * `api_key` - NewsAPI key, sent as `apiKey` and never logged
    /// * `timeout` - Per-request timeout
    pub fn new(
        client: Client,
        base: &str,
        api_key: String,
        timeout: Duration,
    ) -> Result<Self, url::ParseError> {
        Ok(Self {
            client,
            base: Url::parse(base)?,
            api_key,
            timeout,
        })
    }

    fn search_url(&self, query: &str, limit: usize) -> Url {
        with_query(
            &self.base,
            &[
                ("q", query),
                ("language", "en"),
                ("sortBy", "publishedAt"),
                ("pageSize", limit.to_string().as_str()),
                ("apiKey", self.api_key.as_str()),
            ],
        )
    }
}

impl ArticleSource for SearchApiSource {
    fn name(&self) -> &'static str {
        "newsapi"
    }

    #[instrument(level = "debug", skip(self))]
    async fn fetch_raw(&self, query: &str, limit: usize) -> Result<Vec<RawArticle>, FetchError> {
        let url = self.search_url(query, limit);
        let resp: SearchResponse = get_json(&self.client, url, self.timeout).await?;

        if resp.status.as_deref() == Some("error") {
            return Err(FetchError::Api {
                code: resp.code.unwrap_or_else(|| "unknown".to_string()),
                message: resp.message.unwrap_or_default(),
            });
        }

        debug!(count = resp.articles.len(), "Search returned articles");
        Ok(resp.articles.into_iter().map(RawArticle::from).collect())
    }
}
