//! Google News RSS search feed.
//!
//! The feed needs no key but carries no images, and its `description` is an
//! HTML snippet (a link to the story plus the outlet name), so it is reduced
//! to plain text. Publication dates arrive in RFC 2822 form and are
//! normalized to RFC 3339 to match the search API.
//!
//! # Feed Shape
//!
//! ```text
//! <rss><channel>
//!   <item>
//!     <title>…</title><link>…</link><pubDate>…</pubDate>
//!     <description>&lt;a href=…&gt;…&lt;/a&gt;</description>
//!     <source url="…">Outlet</source>
//!   </item>
//! </channel></rss>
//! ```

use super::ArticleSource;
use crate::api::{get_text, with_query};
use crate::error::FetchError;
use crate::models::RawArticle;
use crate::utils::strip_html;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<FeedItem>,
}

#[derive(Debug, Deserialize)]
struct FeedItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    description: String,
    #[serde(rename = "pubDate", default)]
    pub_date: String,
    #[serde(default)]
    source: Option<FeedSourceName>,
}

#[derive(Debug, Deserialize)]
struct FeedSourceName {
    #[serde(rename = "$text", default)]
    name: String,
}

/// RFC 2822 feed date to RFC 3339 UTC; unparseable dates pass through unchanged.
fn normalize_date(raw: &str) -> String {
    match DateTime::parse_from_rfc2822(raw.trim()) {
        Ok(dt) => dt
            .with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::Secs, true),
        Err(_) => raw.trim().to_string(),
    }
}

impl From<FeedItem> for RawArticle {
    fn from(item: FeedItem) -> Self {
        RawArticle {
            title: item.title,
            link: item.link.trim().to_string(),
            summary: strip_html(&item.description),
            date: normalize_date(&item.pub_date),
            source: item.source.map(|s| s.name.trim().to_string()).unwrap_or_default(),
            image: None,
        }
    }
}

/// Parse an RSS document into raw articles, in feed order.
fn parse_feed(xml: &str) -> Result<Vec<RawArticle>, FetchError> {
    let rss: Rss = quick_xml::de::from_str(xml)?;
    Ok(rss.channel.items.into_iter().map(RawArticle::from).collect())
}

/// Google News RSS search feed. Needs no key and carries no images.
pub struct FeedSource {
    client: Client,
    base: Url,
    timeout: Duration,
}

impl FeedSource {
    /// Create a feed source for the RSS search endpoint at `base`.
    pub fn new(client: Client, base: &str, timeout: Duration) -> Result<Self, url::ParseError> {
        Ok(Self {
            client,
            base: Url::parse(base)?,
            timeout,
        })
    }

    fn feed_url(&self, query: &str) -> Url {
        with_query(
            &self.base,
            &[("q", query), ("hl", "en-US"), ("gl", "US"), ("ceid", "US:en")],
        )
    }
}

impl ArticleSource for FeedSource {
    fn name(&self) -> &'static str {
        "google_news"
    }

    #[instrument(level = "debug", skip(self))]
    async fn fetch_raw(&self, query: &str, limit: usize) -> Result<Vec<RawArticle>, FetchError> {
        let url = self.feed_url(query);
        let body = get_text(&self.client, url, self.timeout).await?;
        let items = parse_feed(&body)?;
        debug!(count = items.len(), limit, "Parsed feed items");
        Ok(items)
    }
}
