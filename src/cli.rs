//! Command-line interface definitions.
//!
//! Every argument is optional: with none given the updater uses the built-in
//! tickers and topics, the search news source, and writes `./data.json`.
//! Secrets and the source choice can also come from the environment.

use crate::config::SourceKind;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the data updater.
///
/// # Examples
///
/// ```sh
/// # Scheduled run with the key from the environment
/// NEWS_API_KEY=... hub_data_updater
///
/// # Keyless run against the RSS feed, into the site directory
/// hub_data_updater --source feed -o site/data.json
///
/// # Custom tickers and topics, no translation
/// hub_data_updater -c updater.yaml --no-translate
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path of the JSON document to write
    #[arg(short, long, default_value = "data.json")]
    pub output: PathBuf,

    /// Optional path to a YAML settings file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// News backend; overrides the settings file
    #[arg(short, long, env = "NEWS_SOURCE", value_enum)]
    pub source: Option<SourceKind>,

    /// NewsAPI key, required for the search source
    #[arg(long, env = "NEWS_API_KEY", hide_env_values = true)]
    pub news_api_key: Option<String>,

    /// Publish original text in the translated fields
    #[arg(long)]
    pub no_translate: bool,
}
