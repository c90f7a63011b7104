use std::path::PathBuf;

use anyhow::{Context, Result};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, FileFormat};
use serde::Deserialize;

/// Optional settings file looked up in the working directory.
const SETTINGS_FILE: &str = "steam_scraper.toml";

/// Bounds of a random courtesy delay, in seconds.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct DelayRange {
    pub min_secs: f64,
    pub max_secs: f64,
}

impl DelayRange {
    pub const fn new(min_secs: f64, max_secs: f64) -> Self {
        DelayRange { min_secs, max_secs }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub store_url: String,
    pub user_agent: String,
    /// Search filter `category1` (998 = games).
    pub category: String,
    pub language: String,
    pub currency: String,
    /// The review histogram is requested with its own locale.
    pub histogram_language: String,
    pub page_size: u32,
    /// Page count used when the result-count marker can't be read.
    pub fallback_pages: u32,
    pub utc_offset_hours: i32,
    pub appid_file: PathBuf,
    pub history_dir: PathBuf,
    pub detail_delay: DelayRange,
    pub page_delay: DelayRange,
    pub histogram_delay: DelayRange,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            store_url: "https://store.steampowered.com".into(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
                .into(),
            category: "998".into(),
            language: "english".into(),
            currency: "us".into(),
            histogram_language: "schinese".into(),
            page_size: 25,
            fallback_pages: 5000,
            utc_offset_hours: 8,
            appid_file: PathBuf::from("steam_appids.txt"),
            history_dir: PathBuf::from("steam_recommendations_data"),
            detail_delay: DelayRange::new(1.0, 3.0),
            page_delay: DelayRange::new(2.0, 5.0),
            histogram_delay: DelayRange::new(1.0, 3.0),
        }
    }
}

impl Settings {
    /// Defaults, overlaid with `steam_scraper.toml` when present.
    pub fn load() -> Result<Self> {
        Self::builder()?
            .add_source(config::File::new(SETTINGS_FILE, FileFormat::Toml).required(false))
            .build()
            .context("Failed to read settings file")?
            .try_deserialize()
            .context("Invalid settings")
    }

    /// Builder seeded with the nested delay defaults, so a file may set
    /// just one bound of a range.
    fn builder() -> Result<ConfigBuilder<DefaultState>> {
        let d = Settings::default();
        let mut builder = Config::builder();
        for (key, range) in [
            ("detail_delay", d.detail_delay),
            ("page_delay", d.page_delay),
            ("histogram_delay", d.histogram_delay),
        ] {
            builder = builder
                .set_default(format!("{}.min_secs", key), range.min_secs)?
                .set_default(format!("{}.max_secs", key), range.max_secs)?;
        }
        Ok(builder)
    }

    pub fn search_url(&self) -> String {
        format!("{}/search/", self.store_url)
    }

    pub fn details_url(&self) -> String {
        format!("{}/api/appdetails", self.store_url)
    }

    pub fn histogram_url(&self, app_id: u32) -> String {
        format!("{}/appreviewhistogram/{}", self.store_url, app_id)
    }
}
