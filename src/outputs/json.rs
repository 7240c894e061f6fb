//! JSON output for the static front end.
//!
//! The document is pretty-printed with two-space indentation and non-ASCII
//! text (flags, translations) kept as-is rather than `\u` escaped. It is written
//! to a sibling temp file first and renamed over the target, so readers never
//! see a partially written file.

use crate::models::OutputDocument;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// Serialize `doc` exactly as it is written to disk.
pub fn render(doc: &OutputDocument) -> Result<String, serde_json::Error> {
    let mut json = serde_json::to_string_pretty(doc)?;
    json.push('\n');
    Ok(json)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "data.json".into());
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write `doc` to `path`, replacing any previous run's output.
///
/// # Errors
///
/// Returns an error if serialization, the temp file write, or the rename fails.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_document(doc: &OutputDocument, path: &Path) -> Result<(), Box<dyn Error>> {
    let json = render(doc)?;
    let tmp = temp_path(path);

    if let Err(e) = fs::write(&tmp, json.as_bytes()).await {
        error!(tmp = %tmp.display(), error = %e, "Failed writing temp JSON");
        return Err(e.into());
    }
    if let Err(e) = fs::rename(&tmp, path).await {
        error!(tmp = %tmp.display(), error = %e, "Failed moving JSON into place");
        let _ = fs::remove_file(&tmp).await;
        return Err(e.into());
    }

    info!(bytes = json.len(), "Wrote JSON document");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OrderedMap, StockEntry};

    fn doc() -> OutputDocument {
        let mut stocks = OrderedMap::new();
        stocks.insert(
            "HYMTF",
            StockEntry {
                price: 41.5,
                change_pct: -1.25,
                currency: "USD".to_string(),
                name: "Hyundai".to_string(),
                flag: "🇰🇷".to_string(),
            },
        );
        let mut news = OrderedMap::new();
        news.insert("unreal", Vec::new());
        OutputDocument {
            updated: "2025-05-06 05:30 UTC".to_string(),
            updated_kst: "2025-05-06 14:30 KST".to_string(),
            stocks,
            news,
        }
    }

    #[test]
    fn test_render_two_space_indent_and_raw_unicode() {
        let json = render(&doc()).unwrap();
        assert!(json.starts_with("{\n  \"updated\": \"2025-05-06 05:30 UTC\",\n"));
        assert!(json.contains("\n    \"HYMTF\": {\n      \"price\": 41.5,"));
        assert!(json.contains("\"flag\": \"🇰🇷\""));
        assert!(!json.contains("\\u"));
        assert!(json.contains("\"unreal\": []"));
    }

    #[tokio::test]
    async fn test_write_document_overwrites_previous_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, "stale").unwrap();

        write_document(&doc(), &path).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["stocks"]["HYMTF"]["name"], "Hyundai");
        assert!(!temp_path(&path).exists());
    }

    #[tokio::test]
    async fn test_write_document_into_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing/data.json");
        assert!(write_document(&doc(), &path).await.is_err());
    }
}
