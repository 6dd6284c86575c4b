use std::path::PathBuf;

use anyhow::{Context, Result};
use ::config::{Config, Environment, File};
use serde::Deserialize;

use crate::detector::DEFAULT_THRESHOLD;

pub const DEFAULT_URL: &str = "https://www.kivano.kg/mobilnye-telefony";
pub const DEFAULT_CONFIG_FILE: &str = "kivano_watch";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Listing page watched for changes and used as the pagination base.
    pub url: String,
    pub snapshot_path: PathBuf,
    pub output_path: PathBuf,
    pub threshold: f64,
    /// Local time of day for the daily run, `HH:MM`.
    pub schedule_at: String,
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,
}

impl Settings {
    /// Defaults, then the optional config file, then `KIVANO_*` variables.
    /// Telegram secrets come from `TELEGRAM_BOT_TOKEN` and `TELEGRAM_CHAT_ID`.
    pub fn load(config_file: Option<&str>) -> Result<Self> {
        let file = config_file.unwrap_or(DEFAULT_CONFIG_FILE);

        Config::builder()
            .set_default("url", DEFAULT_URL)?
            .set_default("snapshot_path", "previous_version.html")?
            .set_default("output_path", "products.csv")?
            .set_default("threshold", DEFAULT_THRESHOLD)?
            .set_default("schedule_at", "18:00")?
            .add_source(File::with_name(file).required(config_file.is_some()))
            .add_source(Environment::with_prefix("KIVANO"))
            .set_override_option("telegram_bot_token", std::env::var("TELEGRAM_BOT_TOKEN").ok())?
            .set_override_option("telegram_chat_id", std::env::var("TELEGRAM_CHAT_ID").ok())?
            .build()
            .and_then(Config::try_deserialize)
            .with_context(|| format!("loading settings (config file {file:?})"))
    }
}
