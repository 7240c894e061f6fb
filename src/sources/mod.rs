//! News sources and the shared article collection step.
//!
//! Each source module implements [`ArticleSource`], which only knows how to
//! turn a topic query into [`RawArticle`]s. Everything the sources have in
//! common lives in [`ArticleFetcher`]:
//!
//! 1. **Fetching**: one request to the source; any error yields an empty list
//! 2. **Filtering**: empty and `[Removed]` titles are dropped
//! 3. **Shaping**: summaries are cut to [`MAX_SUMMARY_CHARS`]
//! 4. **Translation**: title and non-empty summary, then a throttle pause
//!
//! # Supported Sources
//!
//! | Source | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | NewsAPI | [`newsapi`] | Keyword search API | Requires API key; provides images |
//! | Google News | [`google_news`] | RSS search feed | No key; no images |

pub mod google_news;
pub mod newsapi;

use crate::error::FetchError;
use crate::models::{Article, RawArticle, TopicQuery};
use crate::translate::Translator;
use crate::utils::truncate_chars;
use google_news::FeedSource;
use newsapi::SearchApiSource;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument};

/// Longest summary kept in the output, in characters.
pub const MAX_SUMMARY_CHARS: usize = 300;

/// Title the search API substitutes for articles pulled by the publisher.
const REMOVED_TITLE: &str = "[Removed]";

/// A backend that can list articles for a topic query.
pub trait ArticleSource {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Fetch up to roughly `limit` articles matching `query`.
    ///
    /// Implementations may return more than `limit`; the caller caps the list.
    async fn fetch_raw(&self, query: &str, limit: usize) -> Result<Vec<RawArticle>, FetchError>;
}

/// The source selected at startup.
pub enum NewsSource {
    Search(SearchApiSource),
    Feed(FeedSource),
}

impl ArticleSource for NewsSource {
    fn name(&self) -> &'static str {
        match self {
            NewsSource::Search(s) => s.name(),
            NewsSource::Feed(s) => s.name(),
        }
    }

    async fn fetch_raw(&self, query: &str, limit: usize) -> Result<Vec<RawArticle>, FetchError> {
        match self {
            NewsSource::Search(s) => s.fetch_raw(query, limit).await,
            NewsSource::Feed(s) => s.fetch_raw(query, limit).await,
        }
    }
}

/// True when the title is worth publishing.
pub fn is_usable_title(title: &str) -> bool {
    let title = title.trim();
    !title.is_empty() && title != REMOVED_TITLE
}

/// Fetches, filters, and translates the articles for one topic.
pub struct ArticleFetcher<S> {
    source: S,
    translator: Translator,
    /// Pause after each article's translation pair.
    pause: Duration,
}

impl<S: ArticleSource> ArticleFetcher<S> {
    /// # Arguments
    ///
    /// * `source` - Backend queried once per topic
    /// * `translator` - Used for each kept title and summary
    /// * `pause` - Sleep after each article's translation pair
    pub fn new(source: S, translator: Translator, pause: Duration) -> Self {
        Self {
            source,
            translator,
            pause,
        }
    }

    /// Collect at most `limit` publishable articles for `topic`.
    ///
    /// Never fails: fetch and parse errors are logged and produce an empty list.
    #[instrument(level = "info", skip_all, fields(topic = %topic.key, source = self.source.name()))]
    pub async fn fetch(&self, topic: &TopicQuery, limit: usize) -> Vec<Article> {
        let raw = match self.source.fetch_raw(&topic.query, limit).await {
            Ok(raw) => raw,
            Err(e) => {
                error!(error = %e, "News fetch failed; publishing empty section");
                return Vec::new();
            }
        };
        debug!(candidates = raw.len(), "Fetched raw articles");

        let mut articles = Vec::with_capacity(limit.min(raw.len()));
        for item in raw {
            if articles.len() >= limit {
                break;
            }
            if !is_usable_title(&item.title) {
                debug!(title = %item.title, "Skipping article without usable title");
                continue;
            }
            articles.push(self.translate(item).await);
            if !self.pause.is_zero() {
                sleep(self.pause).await;
            }
        }

        info!(count = articles.len(), "Collected articles");
        articles
    }

    async fn translate(&self, item: RawArticle) -> Article {
        let title = item.title.trim().to_string();
        let summary = truncate_chars(item.summary.trim(), MAX_SUMMARY_CHARS).to_string();

        let title_translated = self.translator.translate(&title).await;
        let summary_translated = if summary.is_empty() {
            String::new()
        } else {
            self.translator.translate(&summary).await
        };

        Article {
            title,
            title_translated,
            link: item.link,
            summary,
            summary_translated,
            date: item.date,
            source: item.source,
            image: item.image,
        }
    }
}
