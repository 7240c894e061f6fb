//! Error types for fetching and configuration.
//!
//! Fetch errors never abort a run: the pipeline logs them and skips the
//! affected ticker or topic. Configuration errors are fatal and reach `main`.

use thiserror::Error;

/// Failure of a single outbound request or of decoding its response.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network failure, timeout, or body read error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("unexpected response status: {status} at {url}")]
    Status { status: u16, url: String },

    /// The body was not valid JSON for the expected shape.
    #[error("JSON decode error: {0}")]
    Json(#[from] serde_json::Error),

    /// The body was not a parseable RSS document.
    #[error("XML decode error: {0}")]
    Xml(#[from] quick_xml::de::DeError),

    /// A request URL could not be built.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The provider reported an error in an otherwise successful response.
    #[error("API error {code}: {message}")]
    Api { code: String, message: String },

    /// The response decoded but lacked a required field.
    #[error("data format unexpected or missing field: {0}")]
    Data(String),
}

/// Invalid or incomplete settings. Reported before any network call.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("NEWS_API_KEY is required for the search news source (set the env var or pass --news-api-key)")]
    MissingApiKey,

    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}
