//! Configuration for the box score puller.

use serde::{Deserialize, Serialize};

/// Scraper configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Minimum seconds between consecutive request completions
    #[serde(default = "default_request_delay")]
    pub request_delay: f64,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_request_delay() -> f64 {
    4.0
}

fn default_base_url() -> String {
    crate::scraper::BASE_URL.to_string()
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            request_delay: default_request_delay(),
            base_url: default_base_url(),
        }
    }
}

/// Output sink configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving one JSON file per game
    #[serde(default = "default_output_dir")]
    pub dir: String,
}

fn default_output_dir() -> String {
    "data/llm_inputs".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl AppConfig {
    /// Load configuration from defaults, an optional config file, and
    /// environment variables (BOXPULL_SCRAPER__REQUEST_DELAY, etc.)
    pub fn load() -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("BOXPULL")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
