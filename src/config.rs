//! Run settings: tickers, topics, throttles, timeouts, and endpoints.
//!
//! Settings are an immutable value built once in `main` and passed into the
//! pipeline. Every field has a default, so a YAML file only needs to name what
//! it overrides:
//!
//! ```yaml
//! article_limit: 3
//! translate: false
//! news_source: feed
//! throttle:
//!   topic_ms: 2000
//! topics:
//!   - key: unreal
//!     query: '"Unreal Engine" OR "Epic Games"'
//! ```

use crate::error::ConfigError;
use crate::models::{TickerSpec, TopicQuery};
use clap::ValueEnum;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{info, instrument};
use url::Url;

/// Browser-like agent; the chart endpoint rejects the default reqwest agent.
const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Which news backend fills the `news` sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// NewsAPI keyword search; needs `NEWS_API_KEY`.
    #[default]
    Search,
    /// Google News RSS search feed.
    Feed,
}

/// Run settings, read from YAML.
///
/// Every field has a default, so a file only needs the keys it changes. The
/// NewsAPI key is not a setting; it comes from the CLI or environment.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Tickers to quote, in output order.
    pub tickers: Vec<TickerSpec>,
    /// News sections, in output order.
    pub topics: Vec<TopicQuery>,
    /// Backend used for every topic.
    pub news_source: SourceKind,
    /// Maximum number of articles kept per topic.
    pub article_limit: usize,
    /// When false, translated fields are copies of the originals.
    pub translate: bool,
    /// Language code of the fetched articles.
    pub source_lang: String,
    /// Language code of the `*_ko` fields.
    pub target_lang: String,
    /// Browser-like User-Agent sent with every request.
    pub user_agent: String,
    pub throttle: Throttle,
    pub timeouts: Timeouts,
    pub endpoints: Endpoints,
}

/// Fixed pauses between outbound requests, in milliseconds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Throttle {
    /// After each quote fetch.
    pub quote_ms: u64,
    /// After each article's title/summary translation pair.
    pub article_ms: u64,
    /// After each topic's article batch.
    pub topic_ms: u64,
}

/// Per-request timeouts, in seconds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    pub quote_secs: u64,
    pub news_secs: u64,
    pub translate_secs: u64,
}

/// Base URLs of the upstream services.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    /// Chart endpoint; the ticker symbol is appended as a path segment.
    pub chart: String,
    pub news_search: String,
    pub news_feed: String,
    pub translate: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tickers: default_tickers(),
            topics: default_topics(),
            news_source: SourceKind::default(),
            article_limit: 5,
            translate: true,
            source_lang: "en".to_string(),
            target_lang: "ko".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            throttle: Throttle::default(),
            timeouts: Timeouts::default(),
            endpoints: Endpoints::default(),
        }
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self {
            quote_ms: 400,
            article_ms: 300,
            topic_ms: 1000,
        }
    }
}

impl Throttle {
    /// No pauses at all. Used by tests against a local mock server.
    #[cfg(test)]
    pub fn none() -> Self {
        Self {
            quote_ms: 0,
            article_ms: 0,
            topic_ms: 0,
        }
    }

    pub fn quote(&self) -> Duration {
        Duration::from_millis(self.quote_ms)
    }

    pub fn article(&self) -> Duration {
        Duration::from_millis(self.article_ms)
    }

    pub fn topic(&self) -> Duration {
        Duration::from_millis(self.topic_ms)
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            quote_secs: 15,
            news_secs: 15,
            translate_secs: 10,
        }
    }
}

impl Timeouts {
    pub fn quote(&self) -> Duration {
        Duration::from_secs(self.quote_secs)
    }

    pub fn news(&self) -> Duration {
        Duration::from_secs(self.news_secs)
    }

    pub fn translate(&self) -> Duration {
        Duration::from_secs(self.translate_secs)
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            chart: "https://query1.finance.yahoo.com/v8/finance/chart/".to_string(),
            news_search: "https://newsapi.org/v2/everything".to_string(),
            news_feed: "https://news.google.com/rss/search".to_string(),
            translate: "https://translate.googleapis.com/translate_a/single".to_string(),
        }
    }
}

impl Endpoints {
    /// Point every endpoint at one mock server, keeping the real paths.
    #[cfg(test)]
    pub fn mock(base: &str) -> Self {
        Self {
            chart: format!("{base}/v8/finance/chart/"),
            news_search: format!("{base}/v2/everything"),
            news_feed: format!("{base}/rss/search"),
            translate: format!("{base}/translate_a/single"),
        }
    }
}

fn default_tickers() -> Vec<TickerSpec> {
    [
        ("TSLA", "Tesla", "🇺🇸"),
        ("NVDA", "NVIDIA", "🇺🇸"),
        ("TM", "Toyota", "🇯🇵"),
        ("HYMTF", "Hyundai", "🇰🇷"),
        ("BYDDF", "BYD", "🇨🇳"),
        ("MBG.DE", "Mercedes", "🇩🇪"),
        ("BMW.DE", "BMW", "🇩🇪"),
        ("GM", "GM", "🇺🇸"),
        ("F", "Ford", "🇺🇸"),
        ("MBLY", "Mobileye", "🇺🇸"),
        ("BIDU", "Baidu", "🇨🇳"),
        ("VWAGY", "Volkswagen", "🇩🇪"),
        ("HMC", "Honda", "🇯🇵"),
    ]
    .into_iter()
    .map(|(symbol, name, flag)| TickerSpec::new(symbol, name, flag))
    .collect()
}

fn default_topics() -> Vec<TopicQuery> {
    [
        ("unreal", r#""Unreal Engine" OR "Epic Games""#),
        (
            "gis",
            r#""Unreal Engine" GIS OR "digital twin" OR Cesium OR ArcGIS"#,
        ),
        (
            "us_av",
            r#"autonomous driving Waymo OR Tesla OR NVIDIA OR "self-driving""#,
        ),
        (
            "china_av",
            r#"China "autonomous vehicle" OR "self-driving" BYD OR Baidu OR DeepSeek"#,
        ),
        (
            "europe_av",
            r#"Europe "autonomous vehicle" OR "self-driving" Mercedes OR BMW OR Volkswagen OR Wayve"#,
        ),
        (
            "linkedin_av",
            r#""AV simulation" OR "autonomous driving simulation" OR "CARLA simulator" OR "driving simulator""#,
        ),
    ]
    .into_iter()
    .map(|(key, query)| TopicQuery::new(key, query))
    .collect()
}

impl Settings {
    /// Load settings from an optional YAML file, falling back to the built-in defaults.
    #[instrument(level = "info")]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let settings = match path {
            Some(path) => {
                let shown = path.display().to_string();
                let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: shown.clone(),
                    source,
                })?;
                let settings = Self::from_yaml(&text).map_err(|source| ConfigError::Parse {
                    path: shown.clone(),
                    source,
                })?;
                info!(path = %shown, "Loaded configuration");
                settings
            }
            None => {
                info!("No config file given; using built-in defaults");
                Self::default()
            }
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Parse YAML text, filling unnamed fields with defaults. Does not validate.
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.article_limit == 0 {
            return Err(ConfigError::Invalid {
                field: "article_limit",
                reason: "must be at least 1".to_string(),
            });
        }
        if let Some(t) = self.tickers.iter().find(|t| t.symbol.trim().is_empty()) {
            return Err(ConfigError::Invalid {
                field: "tickers",
                reason: format!("empty symbol for `{}`", t.name),
            });
        }
        if let Some(t) = self.topics.iter().find(|t| t.key.trim().is_empty()) {
            return Err(ConfigError::Invalid {
                field: "topics",
                reason: format!("empty key for query `{}`", t.query),
            });
        }
        for (field, value) in [
            ("endpoints.chart", &self.endpoints.chart),
            ("endpoints.news_search", &self.endpoints.news_search),
            ("endpoints.news_feed", &self.endpoints.news_feed),
            ("endpoints.translate", &self.endpoints.translate),
        ] {
            if let Err(e) = Url::parse(value) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("`{value}`: {e}"),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_published_sections() {
        let settings = Settings::default();
        assert_eq!(settings.tickers.len(), 13);
        assert_eq!(settings.tickers[0], TickerSpec::new("TSLA", "Tesla", "🇺🇸"));
        let keys: Vec<_> = settings.topics.iter().map(|t| t.key.as_str()).collect();
        assert_eq!(
            keys,
            ["unreal", "gis", "us_av", "china_av", "europe_av", "linkedin_av"]
        );
        assert_eq!(settings.article_limit, 5);
        assert_eq!(settings.news_source, SourceKind::Search);
        assert_eq!(settings.target_lang, "ko");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_other_defaults() {
        let yaml = r#"
article_limit: 3
translate: false
news_source: feed
throttle:
  topic_ms: 2000
topics:
  - key: unreal
    query: '"Unreal Engine"'
"#;
        let settings = Settings::from_yaml(yaml).unwrap();
        assert_eq!(settings.article_limit, 3);
        assert!(!settings.translate);
        assert_eq!(settings.news_source, SourceKind::Feed);
        assert_eq!(settings.throttle.topic_ms, 2000);
        assert_eq!(settings.throttle.quote_ms, 400);
        assert_eq!(settings.topics, vec![TopicQuery::new("unreal", "\"Unreal Engine\"")]);
        assert_eq!(settings.tickers.len(), 13);
        assert_eq!(settings.timeouts.translate(), Duration::from_secs(10));
    }

    #[test]
    fn test_zero_limit_rejected() {
        let settings = Settings {
            article_limit: 0,
            ..Settings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::Invalid { field: "article_limit", .. })
        ));
    }

    #[test]
    fn test_bad_endpoint_rejected() {
        let mut settings = Settings::default();
        settings.endpoints.translate = "not a url".to_string();
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::Invalid { field: "endpoints.translate", .. })
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "tickers:\n  - symbol: TSLA\n    name: Tesla\n    flag: \"🇺🇸\"").unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.tickers, vec![TickerSpec::new("TSLA", "Tesla", "🇺🇸")]);
        assert_eq!(settings.topics.len(), 6);
    }

    #[test]
    fn test_load_missing_file_is_read_error() {
        let err = Settings::load(Some(Path::new("/nonexistent/settings.yaml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_load_invalid_yaml_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "article_limit: [1, 2").unwrap();

        let err = Settings::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
