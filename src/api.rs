//! Shared HTTP plumbing for the upstream APIs.
//!
//! Every request in a run goes through [`get_text`] or [`get_json`]: one
//! attempt, a per-request timeout, and non-2xx statuses mapped to
//! [`FetchError::Status`]. There is no retry here; callers decide whether a
//! failure skips an item or falls back.
//!
//! Query strings can carry API keys, so errors only ever mention the URL
//! without its query.

use crate::error::FetchError;
use crate::utils::truncate_for_log;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};
use url::Url;

/// Build the client shared by all fetchers.
pub fn build_client(user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder().user_agent(user_agent).build()
}

/// GET `url` and return the body as text.
///
/// # Errors
///
/// - [`FetchError::Http`] on connection failure, timeout, or body read error
/// - [`FetchError::Status`] when the server answers with a non-2xx status
#[instrument(level = "debug", skip_all, fields(host = url.host_str().unwrap_or_default()))]
pub async fn get_text(client: &Client, url: Url, timeout: Duration) -> Result<String, FetchError> {
    let t0 = Instant::now();
    let resp = client
        .get(url.clone())
        .timeout(timeout)
        .send()
        .await
        .map_err(reqwest::Error::without_url)?;
    let status = resp.status();

    if !status.is_success() {
        warn!(
            status = status.as_u16(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Upstream returned non-success status"
        );
        return Err(FetchError::Status {
            status: status.as_u16(),
            url: without_query(&url),
        });
    }

    let body = resp.text().await.map_err(reqwest::Error::without_url)?;
    debug!(
        bytes = body.len(),
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "Fetched response body"
    );
    Ok(body)
}

/// `base` with its query replaced by `pairs`, percent-encoded.
///
/// Spaces become `%20` rather than `+`, which every upstream here accepts.
pub fn with_query(base: &Url, pairs: &[(&str, &str)]) -> Url {
    let query = pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    let mut url = base.clone();
    url.set_query(Some(&query));
    url
}

/// `url` with its query string and fragment removed, for error messages.
pub fn without_query(url: &Url) -> String {
    let mut bare = url.clone();
    bare.set_query(None);
    bare.set_fragment(None);
    bare.to_string()
}

/// GET `url` and decode the body as JSON into `T`.
pub async fn get_json<T: DeserializeOwned>(
    client: &Client,
    url: Url,
    timeout: Duration,
) -> Result<T, FetchError> {
    let body = get_text(client, url, timeout).await?;
    serde_json::from_str(&body).map_err(|e| {
        debug!(error = %e, body = %truncate_for_log(&body, 200), "JSON body did not match expected shape");
        FetchError::Json(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::Method::GET;
    use httpmock::MockServer;

    #[tokio::test]
    async fn test_get_text_returns_body() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/ping").header("user-agent", "hub-test");
            then.status(200).body("pong");
        });

        let client = build_client("hub-test").unwrap();
        let url = Url::parse(&server.url("/ping")).unwrap();
        let body = get_text(&client, url, Duration::from_secs(5)).await.unwrap();

        mock.assert();
        assert_eq!(body, "pong");
    }

    #[tokio::test]
    async fn test_non_success_maps_to_status_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/down");
            then.status(503).body("unavailable");
        });

        let client = build_client("hub-test").unwrap();
        let url = Url::parse(&server.url("/down")).unwrap();
        let err = get_text(&client, url, Duration::from_secs(5)).await.unwrap_err();

        match err {
            FetchError::Status { status, url } => {
                assert_eq!(status, 503);
                assert!(url.ends_with("/down"));
            }
            other => panic!("expected Status error, got {other:?}"),
        }
    }

    #[test]
    fn test_with_query_percent_encodes() {
        let base = Url::parse("https://news.google.com/rss/search").unwrap();
        let url = with_query(&base, &[("q", "\"Unreal Engine\" OR Cesium"), ("ceid", "US:en")]);
        assert_eq!(
            url.as_str(),
            "https://news.google.com/rss/search?q=%22Unreal%20Engine%22%20OR%20Cesium&ceid=US%3Aen"
        );
    }

    #[test]
    fn test_without_query_hides_secrets() {
        let url = Url::parse("https://newsapi.org/v2/everything?q=x&apiKey=secret#frag").unwrap();
        assert_eq!(without_query(&url), "https://newsapi.org/v2/everything");
    }

    #[tokio::test]
    async fn test_get_json_reports_malformed_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/json");
            then.status(200).body("{not json");
        });

        let client = build_client("hub-test").unwrap();
        let url = Url::parse(&server.url("/json")).unwrap();
        let err = get_json::<serde_json::Value>(&client, url, Duration::from_secs(5))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Json(_)));
    }
}
