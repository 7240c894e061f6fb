//! The aggregation run: quotes, then news, then one document.
//!
//! A run is linear and holds no state between runs:
//!
//! ```text
//! start → quotes (per ticker) → articles (per topic) → document → end
//! ```
//!
//! Per-item failures are logged and skipped. A failed ticker is omitted from
//! `stocks`; a failed topic still gets its key in `news`, with an empty list.

use crate::api::build_client;
use crate::config::{Settings, SourceKind, Throttle};
use crate::error::ConfigError;
use crate::models::{Article, OrderedMap, OutputDocument, StockEntry, TickerSpec, TopicQuery};
use crate::quotes::QuoteFetcher;
use crate::sources::google_news::FeedSource;
use crate::sources::newsapi::SearchApiSource;
use crate::sources::{ArticleFetcher, ArticleSource, NewsSource};
use crate::translate::Translator;
use crate::utils::{kst_label, utc_label};
use chrono::{DateTime, Utc};
use std::error::Error;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{error, info, instrument};

/// One full update run: quotes for every ticker, then articles for every topic.
///
/// Ticker and topic lists are fixed at construction. `S` is the news backend,
/// normally [`NewsSource`].
pub struct Pipeline<S> {
    tickers: Vec<TickerSpec>,
    topics: Vec<TopicQuery>,
    article_limit: usize,
    throttle: Throttle,
    quotes: QuoteFetcher,
    articles: ArticleFetcher<S>,
}

impl Pipeline<NewsSource> {
    /// Wire fetchers from `settings`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingApiKey`] when the search source is selected
    /// without a non-empty key; also fails if the HTTP client cannot be built.
    pub fn from_settings(
        settings: &Settings,
        news_api_key: Option<String>,
    ) -> Result<Self, Box<dyn Error>> {
        let client = build_client(&settings.user_agent)?;
        let endpoints = &settings.endpoints;
        let timeouts = &settings.timeouts;

        let source = match settings.news_source {
            SourceKind::Search => {
                let key = news_api_key
                    .filter(|k| !k.trim().is_empty())
                    .ok_or(ConfigError::MissingApiKey)?;
                NewsSource::Search(SearchApiSource::new(
                    client.clone(),
                    &endpoints.news_search,
                    key,
                    timeouts.news(),
                )?)
            }
            SourceKind::Feed => NewsSource::Feed(FeedSource::new(
                client.clone(),
                &endpoints.news_feed,
                timeouts.news(),
            )?),
        };

        let translator = Translator::new(
            client.clone(),
            &endpoints.translate,
            &settings.source_lang,
            &settings.target_lang,
            timeouts.translate(),
            settings.translate,
        )?;

        Ok(Self {
            tickers: settings.tickers.clone(),
            topics: settings.topics.clone(),
            article_limit: settings.article_limit,
            throttle: settings.throttle.clone(),
            quotes: QuoteFetcher::new(client, &endpoints.chart, timeouts.quote())?,
            articles: ArticleFetcher::new(source, translator, settings.throttle.article()),
        })
    }
}

async fn pause(d: Duration) {
    if !d.is_zero() {
        sleep(d).await;
    }
}

impl<S: ArticleSource> Pipeline<S> {
    /// Run every fetch and assemble the document stamped with `now`.
    #[instrument(level = "info", skip(self))]
    pub async fn run_at(&self, now: DateTime<Utc>) -> OutputDocument {
        let t0 = Instant::now();

        let stocks = self.fetch_stocks().await;
        let news = self.fetch_news().await;

        let articles: usize = news.iter().map(|(_, list)| list.len()).sum();
        let empty_sections: Vec<&str> = news
            .iter()
            .filter(|(_, list)| list.is_empty())
            .map(|(key, _)| key)
            .collect();
        info!(
            stocks_ok = stocks.len(),
            stocks_failed = self.tickers.len() - stocks.len(),
            sections = news.len(),
            ?empty_sections,
            articles,
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Run complete"
        );

        OutputDocument {
            updated: utc_label(now),
            updated_kst: kst_label(now),
            stocks,
            news,
        }
    }

    async fn fetch_stocks(&self) -> OrderedMap<StockEntry> {
        info!(count = self.tickers.len(), "Fetching stocks");
        let mut stocks = OrderedMap::new();

        for ticker in &self.tickers {
            match self.quotes.fetch(&ticker.symbol).await {
                Ok(quote) => {
                    info!(
                        ticker = %ticker.symbol,
                        "{} {:.2}  ({:+.2}%)",
                        quote.currency,
                        quote.price,
                        quote.change_pct
                    );
                    stocks.insert(ticker.symbol.clone(), StockEntry::new(quote, ticker));
                }
                Err(e) => {
                    error!(ticker = %ticker.symbol, error = %e, "Quote fetch failed; omitting ticker");
                }
            }
            pause(self.throttle.quote()).await;
        }

        stocks
    }

    async fn fetch_news(&self) -> OrderedMap<Vec<Article>> {
        info!(count = self.topics.len(), "Fetching news");
        let mut news = OrderedMap::new();

        for topic in &self.topics {
            info!(section = %topic.key, "Fetching section");
            let articles = self.articles.fetch(topic, self.article_limit).await;
            info!(section = %topic.key, count = articles.len(), "Section done");
            news.insert(topic.key.clone(), articles);
            pause(self.throttle.topic()).await;
        }

        news
    }
}
