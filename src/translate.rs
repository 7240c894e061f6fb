//! Best-effort machine translation through the unofficial `translate_a` endpoint.
//!
//! The endpoint is undocumented. Its response is a nested array whose first
//! element lists translated segments, each segment's first element being the
//! translated text:
//!
//! ```text
//! [[["번역된 문장. ","Translated sentence. ",null,null,10], ...], null, "en", ...]
//! ```
//!
//! All knowledge of that shape lives in [`parse_translation`].

use crate::api::{get_json, with_query};
use crate::error::FetchError;
use crate::utils::{truncate_chars, truncate_for_log};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{instrument, warn};
use url::Url;

/// Longest input submitted to the endpoint, in characters.
const MAX_INPUT_CHARS: usize = 500;

/// Extract the translated text from a raw endpoint response.
///
/// Returns `None` when the response does not have the expected shape.
pub fn parse_translation(value: &Value) -> Option<String> {
    let segments = value.get(0)?.as_array()?;
    let text: String = segments
        .iter()
        .filter_map(|seg| seg.get(0).and_then(Value::as_str))
        .filter(|s| !s.is_empty())
        .collect();
    Some(text)
}

/// Best-effort client for the public translate endpoint.
///
/// Never fails: disabled, empty, or failed translations return the input text.
pub struct Translator {
    client: Client,
    base: Url,
    source_lang: String,
    target_lang: String,
    timeout: Duration,
    enabled: bool,
}

impl Translator {
    /// Create a translator.
    ///
    /// # Arguments
    ///
    /// * `client` - Shared HTTP client
    /// * `base` - Translate endpoint URL
    /// * `source_lang` / `target_lang` - Language codes sent as `sl` and `tl`
    /// * `timeout` - Per-request timeout
    /// * `enabled` - When false no request is made and text passes through
    ///
    /// # Returns
    ///
    /// An error only if `base` is not a valid URL.
    pub fn new(
        client: Client,
        base: &str,
        source_lang: &str,
        target_lang: &str,
        timeout: Duration,
        enabled: bool,
    ) -> Result<Self, url::ParseError> {
        Ok(Self {
            client,
            base: Url::parse(base)?,
            source_lang: source_lang.to_string(),
            target_lang: target_lang.to_string(),
            timeout,
            enabled,
        })
    }

    /// Translate `text`, falling back to the original on any failure.
    ///
    /// Empty input is returned as-is without a request, as is any input when
    /// translation is disabled.
    pub async fn translate(&self, text: &str) -> String {
        if text.is_empty() || !self.enabled {
            return text.to_string();
        }
        match self.try_translate(text).await {
            Ok(translated) => translated,
            Err(e) => {
                warn!(
                    error = %e,
                    text = %truncate_for_log(text, 60),
                    "Translation failed; keeping original text"
                );
                text.to_string()
            }
        }
    }

    #[instrument(level = "debug", skip_all, fields(chars = text.chars().count()))]
    async fn try_translate(&self, text: &str) -> Result<String, FetchError> {
        let url = with_query(
            &self.base,
            &[
                ("client", "gtx"),
                ("sl", self.source_lang.as_str()),
                ("tl", self.target_lang.as_str()),
                ("dt", "t"),
                ("q", truncate_chars(text, MAX_INPUT_CHARS)),
            ],
        );

        let value: Value = get_json(&self.client, url, self.timeout).await?;
        parse_translation(&value)
            .ok_or_else(|| FetchError::Data("unexpected translation response shape".to_string()))
    }
}
