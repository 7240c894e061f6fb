//! Helpers for text shaping, rounding, timestamps, and output paths.

use chrono::{DateTime, Duration, Utc};
use scraper::Html;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Round to two decimal places, ties to even on the exact decimal value.
///
/// Goes through the formatter rather than `(x * 100.0).round()`, whose
/// multiplication is already inexact and which rounds ties away from zero.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(round2(2.675), 2.67);
/// assert_eq!(round2(10.125), 10.12);
/// ```
pub fn round2(x: f64) -> f64 {
    format!("{x:.2}").parse().unwrap_or(x)
}

/// Keep at most `max` characters of `s`.
///
/// Counts `char`s, not bytes, so multi-byte text is never split mid-character.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Truncate a string for logging, appending how much was dropped.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    let head = truncate_chars(s, max);
    if head.len() == s.len() {
        s.to_string()
    } else {
        format!("{}…(+{} bytes)", head, s.len() - head.len())
    }
}

/// Reduce an HTML fragment to its visible text.
///
/// Tags are dropped without inserting separators, entities decoded, and
/// whitespace runs collapsed to one space.
pub fn strip_html(fragment: &str) -> String {
    let doc = Html::parse_fragment(fragment);
    let text = doc.root_element().text().collect::<String>();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `YYYY-MM-DD HH:MM UTC` label for the run instant.
pub fn utc_label(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%d %H:%M UTC").to_string()
}

/// Same instant shifted by the fixed +9h offset, labelled `KST`.
pub fn kst_label(now: DateTime<Utc>) -> String {
    (now + Duration::hours(9))
        .format("%Y-%m-%d %H:%M KST")
        .to_string()
}

/// Ensure the directory that will hold `path` exists and is writable.
///
/// Creates missing parents, then writes and removes a probe file next to the
/// target so permission problems surface before any network work is done.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_parent(path: &Path) -> Result<(), Box<dyn Error>> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).await?;

    let probe = dir.join("..__probe_write__");
    fs::write(&probe, b"").await?;
    let _ = fs::remove_file(&probe).await;
    info!(dir = %dir.display(), "Output directory is writable");
    Ok(())
}
