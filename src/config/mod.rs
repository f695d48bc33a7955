use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::sink::OutputFormat;

/// Top-level application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub session: SessionConfig,
    pub scraper: ScraperConfig,
    pub output: OutputConfig,
}

/// Browser session configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    #[serde(default = "default_signin_url")]
    pub signin_url: String,

    /// Account e-mail. Also read from AMAZON_EMAIL if unset.
    #[serde(default)]
    pub email: Option<String>,

    /// Account password. Also read from AMAZON_PASSWORD if unset.
    #[serde(default)]
    pub password: Option<String>,

    #[serde(default)]
    pub headless: bool,

    #[serde(default = "default_window_size")]
    pub window_size: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Interval between presence probes while waiting on a selector.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

/// Harvest configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScraperConfig {
    /// Category entry URLs, scraped in order.
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,

    /// Hard cap on pages harvested per category. Listing sites can present
    /// effectively unbounded pagination; the cap guarantees termination.
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// Upper bound per wait-until-present call.
    #[serde(default = "default_wait_timeout_secs")]
    pub wait_timeout_secs: u64,

    /// Fixed pause after activating the next-page control, before the next
    /// harvest.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    #[serde(default = "default_basename")]
    pub basename: String,

    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// Explicit output path; overrides dir/basename when set.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

// ── Defaults ─────────────────────────────────────────────────────────────────

fn default_webdriver_url() -> String {
    "http://localhost:9515".to_string()
}
fn default_signin_url() -> String {
    "https://www.amazon.in/ap/signin".to_string()
}
fn default_window_size() -> String {
    "1920,1080".to_string()
}
fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string()
}
fn default_poll_interval_ms() -> u64 {
    500
}
fn default_categories() -> Vec<String> {
    vec![
        "https://www.amazon.in/gp/bestsellers/kitchen/ref=zg_bs_nav_kitchen_0".to_string(),
        "https://www.amazon.in/gp/bestsellers/shoes/ref=zg_bs_nav_shoes_0".to_string(),
        "https://www.amazon.in/gp/bestsellers/computers/ref=zg_bs_nav_computers_0".to_string(),
        "https://www.amazon.in/gp/bestsellers/electronics/ref=zg_bs_nav_electronics_0".to_string(),
    ]
}
fn default_max_pages() -> u32 {
    15
}
fn default_wait_timeout_secs() -> u64 {
    10
}
fn default_settle_delay_ms() -> u64 {
    2000
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("data")
}
fn default_basename() -> String {
    "best_sellers".to_string()
}
fn default_format() -> OutputFormat {
    OutputFormat::Csv
}

// ── Loader ───────────────────────────────────────────────────────────────────

impl AppConfig {
    /// Load configuration from file + environment overrides
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let cfg = config::Config::builder()
            .add_source(
                config::File::with_name("config/default")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(
                config::File::with_name("config/local")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(config::Environment::with_prefix("BSETL").separator("__"))
            .build()?;

        let mut app_cfg: AppConfig = cfg.try_deserialize().unwrap_or_else(|_| AppConfig::default());

        // Credentials come from their own env vars, not the BSETL prefix.
        if app_cfg.session.email.is_none() {
            app_cfg.session.email = std::env::var("AMAZON_EMAIL").ok();
        }
        if app_cfg.session.password.is_none() {
            app_cfg.session.password = std::env::var("AMAZON_PASSWORD").ok();
        }

        app_cfg.validate()?;
        Ok(app_cfg)
    }

    /// Reject malformed category entry points up-front.
    pub fn validate(&self) -> Result<()> {
        for cat in &self.scraper.categories {
            url::Url::parse(cat)
                .with_context(|| format!("Invalid category URL: {}", cat))?;
        }
        url::Url::parse(&self.session.webdriver_url)
            .with_context(|| format!("Invalid webdriver URL: {}", self.session.webdriver_url))?;
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig {
                webdriver_url: default_webdriver_url(),
                signin_url: default_signin_url(),
                email: None,
                password: None,
                headless: false,
                window_size: default_window_size(),
                user_agent: default_user_agent(),
                poll_interval_ms: default_poll_interval_ms(),
            },
            scraper: ScraperConfig {
                categories: default_categories(),
                max_pages: default_max_pages(),
                wait_timeout_secs: default_wait_timeout_secs(),
                settle_delay_ms: default_settle_delay_ms(),
            },
            output: OutputConfig {
                dir: default_output_dir(),
                basename: default_basename(),
                format: default_format(),
                path: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.scraper.categories.len(), 4);
        assert_eq!(cfg.scraper.max_pages, 15);
        assert_eq!(cfg.scraper.wait_timeout_secs, 10);
        assert_eq!(cfg.output.format, OutputFormat::Csv);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_category_url() {
        let mut cfg = AppConfig::default();
        cfg.scraper.categories.push("not a url".to_string());
        assert!(cfg.validate().is_err());
    }
}
