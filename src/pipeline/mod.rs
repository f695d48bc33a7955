//! Run wiring: session up → sign in → harvest every category → write the
//! sink file → session down.
//!
//! Only session establishment (including sign-in) is fatal. Everything the
//! harvest layer hits degrades to partial results, and a sink failure
//! surfaces after the browser is already torn down.

use anyhow::{Context, Result};
use chrono::Utc;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::harvest::run_categories;
use crate::session::webdriver::WebDriverSession;
use crate::sink;

pub struct Pipeline {
    config: AppConfig,
}

impl Pipeline {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub async fn run(&self) -> Result<RunStats> {
        let started = Utc::now();
        let wait = Duration::from_secs(self.config.scraper.wait_timeout_secs);

        let session = WebDriverSession::connect(&self.config.session)
            .await
            .context("Failed to establish browser session")?;

        if let Err(e) = session.sign_in(&self.config.session, wait).await {
            // Tear the browser down before surfacing; no scraping without
            // the authenticated state.
            if let Err(quit_err) = session.quit().await {
                warn!("session teardown after failed sign-in: {}", quit_err);
            }
            return Err(e).context("Could not reach authenticated state");
        }

        let (records, harvest) = run_categories(&session, &self.config.scraper).await;

        if let Err(e) = session.quit().await {
            warn!("session teardown: {}", e);
        }

        let path = sink::resolve_path(&self.config.output);
        sink::write_records(&records, self.config.output.format, &path)
            .context("Failed to write output file")?;

        let stats = RunStats {
            categories: harvest.categories,
            pages_visited: harvest.pages_visited,
            records: records.len(),
            skipped_items: harvest.skipped_items,
        };

        info!(
            "=== Done: {} categories | {} pages | {} records | {} items skipped | {}s ===",
            stats.categories,
            stats.pages_visited,
            stats.records,
            stats.skipped_items,
            (Utc::now() - started).num_seconds(),
        );

        Ok(stats)
    }
}

#[derive(Debug)]
pub struct RunStats {
    pub categories: usize,
    pub pages_visited: usize,
    pub records: usize,
    pub skipped_items: usize,
}
