//! Data models for quotes, articles, and the published document.
//!
//! This module defines the core data structures used throughout the application:
//! - [`TickerSpec`] and [`TopicQuery`]: static run configuration
//! - [`Quote`] and [`StockEntry`]: one price point per ticker
//! - [`RawArticle`] and [`Article`]: news items before and after translation
//! - [`OutputDocument`]: the single artifact written each run
//!
//! Field names of the serialized types match the JSON contract expected by the
//! static front end, so renames here are breaking changes.

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// A ticker to quote, with the display fields copied into the output.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TickerSpec {
    /// Exchange symbol, e.g. `"MBG.DE"`.
    pub symbol: String,
    /// Human readable company name.
    pub name: String,
    /// Region tag, rendered as a flag emoji by the front end.
    pub flag: String,
}

impl TickerSpec {
    pub fn new(symbol: &str, name: &str, flag: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            name: name.to_string(),
            flag: flag.to_string(),
        }
    }
}

/// A named news query. `key` becomes the section key under `news`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TopicQuery {
    pub key: String,
    pub query: String,
}

impl TopicQuery {
    pub fn new(key: &str, query: &str) -> Self {
        Self {
            key: key.to_string(),
            query: query.to_string(),
        }
    }
}

/// Current price point for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub price: f64,
    pub change_pct: f64,
    pub currency: String,
}

/// A [`Quote`] merged with the ticker's display fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockEntry {
    pub price: f64,
    pub change_pct: f64,
    pub currency: String,
    pub name: String,
    pub flag: String,
}

impl StockEntry {
    /// Attach `ticker`'s display name and flag to `quote`.
    pub fn new(quote: Quote, ticker: &TickerSpec) -> Self {
        Self {
            price: quote.price,
            change_pct: quote.change_pct,
            currency: quote.currency,
            name: ticker.name.clone(),
            flag: ticker.flag.clone(),
        }
    }
}

/// An article as returned by a news source, before filtering and translation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawArticle {
    pub title: String,
    pub link: String,
    pub summary: String,
    pub date: String,
    pub source: String,
    pub image: Option<String>,
}

/// A published article with its translated title and summary.
///
/// `title_ko`/`summary_ko` hold the translation into the configured target
/// language; the key names are part of the front end contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Article {
    pub title: String,
    #[serde(rename = "title_ko")]
    pub title_translated: String,
    pub link: String,
    pub summary: String,
    #[serde(rename = "summary_ko")]
    pub summary_translated: String,
    pub date: String,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// String-keyed map that serializes in insertion order.
///
/// The front end renders tickers and sections in configuration order, which a
/// hash or B-tree map would not preserve.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V>(Vec<(String, V)>);

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Insert or replace the value for `key`, keeping the original position on replace.
    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[cfg(test)]
    pub fn get(&self, key: &str) -> Option<&V> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    #[cfg(test)]
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// The document written to `data.json` each run.
#[derive(Debug, Clone, Serialize)]
pub struct OutputDocument {
    /// Run time as `YYYY-MM-DD HH:MM UTC`.
    pub updated: String,
    /// Run time shifted to UTC+9 as `YYYY-MM-DD HH:MM KST`.
    pub updated_kst: String,
    pub stocks: OrderedMap<StockEntry>,
    pub news: OrderedMap<Vec<Article>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_article(image: Option<&str>) -> Article {
        Article {
            title: "Epic ships Unreal Engine 6".to_string(),
            title_translated: "에픽, 언리얼 엔진 6 출시".to_string(),
            link: "https://example.com/ue6".to_string(),
            summary: "A new major version.".to_string(),
            summary_translated: "새로운 메이저 버전.".to_string(),
            date: "2025-05-06T14:30:00Z".to_string(),
            source: "Example".to_string(),
            image: image.map(str::to_string),
        }
    }

    #[test]
    fn test_stock_entry_merges_display_fields() {
        let quote = Quote {
            price: 250.0,
            change_pct: 25.0,
            currency: "USD".to_string(),
        };
        let entry = StockEntry::new(quote, &TickerSpec::new("TSLA", "Tesla", "🇺🇸"));

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "price": 250.0,
                "change_pct": 25.0,
                "currency": "USD",
                "name": "Tesla",
                "flag": "🇺🇸"
            })
        );
    }

    #[test]
    fn test_article_uses_front_end_keys() {
        let json = serde_json::to_value(sample_article(Some("https://example.com/a.jpg"))).unwrap();
        assert_eq!(json["title_ko"], "에픽, 언리얼 엔진 6 출시");
        assert_eq!(json["summary_ko"], "새로운 메이저 버전.");
        assert_eq!(json["image"], "https://example.com/a.jpg");
        assert!(json.get("title_translated").is_none());
    }

    #[test]
    fn test_article_without_image_omits_key() {
        let json = serde_json::to_value(sample_article(None)).unwrap();
        assert!(json.get("image").is_none());
    }

    #[test]
    fn test_ordered_map_keeps_insertion_order() {
        let mut map = OrderedMap::new();
        map.insert("zeta", 1);
        map.insert("alpha", 2);
        map.insert("mid", 3);
        map.insert("zeta", 4);

        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"zeta":4,"alpha":2,"mid":3}"#);
        assert_eq!(map.get("zeta"), Some(&4));
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_output_document_top_level_keys() {
        let mut news = OrderedMap::new();
        news.insert("unreal", vec![sample_article(None)]);
        let doc = OutputDocument {
            updated: "2025-05-06 05:30 UTC".to_string(),
            updated_kst: "2025-05-06 14:30 KST".to_string(),
            stocks: OrderedMap::new(),
            news,
        };

        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.starts_with(r#"{"updated":"2025-05-06 05:30 UTC","updated_kst":"2025-05-06 14:30 KST","stocks":{},"news":{"unreal":["#));
    }
}
