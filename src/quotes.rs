//! Current price points from the chart endpoint.
//!
//! One request per ticker with a two-day range at daily interval; only the
//! `meta` block of the first result is read.

use crate::api::{get_json, with_query};
use crate::error::FetchError;
use crate::models::Quote;
use crate::utils::round2;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    regular_market_price: Option<f64>,
    chart_previous_close: Option<f64>,
    currency: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: Option<String>,
    description: Option<String>,
}

/// Percent change from `prev` to `price`, rounded to two places.
///
/// A missing or zero previous close yields `0.0`.
pub fn change_pct(price: f64, prev: Option<f64>) -> f64 {
    match prev {
        Some(prev) if prev != 0.0 => round2((price - prev) / prev * 100.0),
        _ => 0.0,
    }
}

/// Fetches one [`Quote`] per request from the chart endpoint.
pub struct QuoteFetcher {
    client: Client,
    base: Url,
    timeout: Duration,
}

impl QuoteFetcher {
    /// Create a fetcher for the chart endpoint at `base`.
    ///
    /// # Arguments
    ///
    /// * `client` - Shared HTTP client carrying the User-Agent
    /// * `base` - Chart endpoint; the symbol becomes its last path segment
    /// * `timeout` - Per-request timeout
    ///
    /// A missing trailing `/` on `base` is added, so `.../chart` and
    /// `.../chart/` both resolve to `.../chart/{symbol}`.
    pub fn new(client: Client, base: &str, timeout: Duration) -> Result<Self, url::ParseError> {
        let mut base = Url::parse(base)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            client,
            base,
            timeout,
        })
    }

    fn chart_url(&self, symbol: &str) -> Result<Url, FetchError> {
        let url = self.base.join(&urlencoding::encode(symbol))?;
        Ok(with_query(&url, &[("interval", "1d"), ("range", "2d")]))
    }

    /// Fetch the current quote for `symbol`.
    ///
    /// # Errors
    ///
    /// Network and status errors from the request, [`FetchError::Json`] for an
    /// undecodable body, [`FetchError::Api`] when the endpoint reports an error
    /// object, and [`FetchError::Data`] when the result or price is missing.
    #[instrument(level = "info", skip(self))]
    pub async fn fetch(&self, symbol: &str) -> Result<Quote, FetchError> {
        let url = self.chart_url(symbol)?;
        let envelope: ChartEnvelope = get_json(&self.client, url, self.timeout).await?;

        if let Some(err) = envelope.chart.error {
            return Err(FetchError::Api {
                code: err.code.unwrap_or_else(|| "unknown".to_string()),
                message: err.description.unwrap_or_default(),
            });
        }

        let meta = envelope
            .chart
            .result
            .and_then(|results| results.into_iter().next())
            .map(|r| r.meta)
            .ok_or_else(|| FetchError::Data(format!("empty chart result for {symbol}")))?;

        let price = meta
            .regular_market_price
            .ok_or_else(|| FetchError::Data("missing regularMarketPrice".to_string()))?;

        let quote = Quote {
            price: round2(price),
            change_pct: change_pct(price, meta.chart_previous_close),
            currency: meta.currency.unwrap_or_else(|| "USD".to_string()),
        };
        debug!(?quote, "Parsed chart meta");
        Ok(quote)
    }
}
