//! # Hub Data Updater
//!
//! A scheduled aggregation job that collects stock quotes and news for a
//! static front end and writes them to a single `data.json`.
//!
//! ## Features
//!
//! - Quotes a fixed list of tickers from the Yahoo Finance chart endpoint
//! - Collects news per topic from NewsAPI search or the Google News RSS feed
//! - Translates article titles and summaries (English to Korean by default)
//! - Writes one pretty-printed JSON document, replaced atomically each run
//!
//! ## Usage
//!
//! ```sh
//! NEWS_API_KEY=... hub_data_updater -o site/data.json
//! ```
//!
//! ## Architecture
//!
//! The run is strictly sequential, with fixed pauses between requests:
//! 1. **Quotes**: one chart request per ticker; failures omit the ticker
//! 2. **News**: one search per topic, then translation per article; failures leave the section empty
//! 3. **Output**: the document is stamped with UTC and KST labels and written

use chrono::Utc;
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod config;
mod error;
mod models;
mod outputs;
mod pipeline;
mod quotes;
mod sources;
mod translate;
mod utils;

use cli::Cli;
use config::Settings;
use outputs::json;
use pipeline::Pipeline;
use utils::ensure_writable_parent;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("hub_data_updater starting up");

    let args = Cli::parse();
    debug!(output = %args.output.display(), config = ?args.config, source = ?args.source, "Parsed CLI arguments");

    // ---- Settings ----
    let mut settings = match Settings::load(args.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };
    if let Some(source) = args.source {
        settings.news_source = source;
    }
    if args.no_translate {
        settings.translate = false;
    }
    info!(
        tickers = settings.tickers.len(),
        topics = settings.topics.len(),
        source = ?settings.news_source,
        translate = settings.translate,
        "Settings ready"
    );

    // Fail before any network work if the output can't be written
    if let Err(e) = ensure_writable_parent(&args.output).await {
        error!(
            path = %args.output.display(),
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let pipeline = match Pipeline::from_settings(&settings, args.news_api_key.clone()) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            error!(error = %e, "Cannot start run");
            return Err(e);
        }
    };

    // ---- Fetch ----
    let document = pipeline.run_at(Utc::now()).await;

    // ---- Output ----
    if let Err(e) = json::write_document(&document, &args.output).await {
        error!(path = %args.output.display(), error = %e, "Failed to write JSON");
        return Err(e);
    }

    let elapsed = start_time.elapsed();
    info!(
        path = %args.output.display(),
        updated_kst = %document.updated_kst,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Document saved"
    );

    Ok(())
}
