//! Pagination-driven extraction: page harvester, per-category pagination
//! driver, and the sequential category orchestrator.
//!
//! Failure handling is strictly layered. A bad item never aborts its page,
//! a timed-out page never aborts its category, and a dead category never
//! aborts the run; every level hands back whatever it accumulated.

pub mod extract;


use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::ScraperConfig;
use crate::models::{ProductRecord, ResultSet};
use crate::session::Session;

use self::extract::{extract_record, selectors};

// ── Page harvester ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    /// A next-page control was found and activated; re-harvest after the
    /// settle delay.
    MorePages,
    /// No items rendered within the bound, or no next-page control exists.
    Exhausted,
}

#[derive(Debug)]
pub struct PageHarvest {
    pub records: Vec<ProductRecord>,
    pub outcome: PageOutcome,
    /// Items abandoned because the required name element was missing or a
    /// handle lookup failed mid-extraction.
    pub skipped: usize,
}

impl PageHarvest {
    fn exhausted() -> Self {
        Self {
            records: Vec::new(),
            outcome: PageOutcome::Exhausted,
            skipped: 0,
        }
    }
}

/// Harvest every item currently on the page, then try to move pagination
/// forward. Never fails: anything unexpected degrades to `Exhausted`.
pub async fn harvest_page<S: Session>(session: &S, wait: Duration) -> PageHarvest {
    let items = match session.wait_until_present(selectors::ITEM, wait).await {
        Ok(items) => items,
        Err(e) if e.is_wait_timeout() => {
            debug!("no items rendered within {:?}, page exhausted", wait);
            return PageHarvest::exhausted();
        }
        Err(e) => {
            warn!("item lookup failed, treating page as exhausted: {}", e);
            return PageHarvest::exhausted();
        }
    };

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for item in &items {
        match extract_record(session, item).await {
            Ok(Some(record)) => records.push(record),
            Ok(None) => skipped += 1,
            Err(e) => {
                debug!("item extraction failed, skipping: {}", e);
                skipped += 1;
            }
        }
    }

    let outcome = match session.find_on_page(selectors::NEXT).await {
        Ok(Some(next)) => match session.force_click(&next).await {
            Ok(()) => PageOutcome::MorePages,
            Err(e) => {
                warn!("next-page activation failed, stopping category: {}", e);
                PageOutcome::Exhausted
            }
        },
        Ok(None) => PageOutcome::Exhausted,
        Err(e) => {
            warn!("next-page lookup failed, stopping category: {}", e);
            PageOutcome::Exhausted
        }
    };

    PageHarvest {
        records,
        outcome,
        skipped,
    }
}

// ── Pagination driver ─────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct CategoryHarvest {
    pub records: Vec<ProductRecord>,
    pub pages: usize,
    pub skipped: usize,
}

/// Navigate to a category entry point and harvest page after page until the
/// pagination is exhausted or the page cap is hit.
pub async fn scrape_category<S: Session>(
    session: &S,
    url: &str,
    cfg: &ScraperConfig,
) -> CategoryHarvest {
    let mut out = CategoryHarvest::default();

    if let Err(e) = session.navigate(url).await {
        warn!("navigation to {} failed, skipping category: {}", url, e);
        return out;
    }

    let wait = Duration::from_secs(cfg.wait_timeout_secs);
    let settle = Duration::from_millis(cfg.settle_delay_ms);

    for page in 1..=cfg.max_pages {
        let harvest = harvest_page(session, wait).await;
        info!(
            "  page {}: {} records, {} skipped",
            page,
            harvest.records.len(),
            harvest.skipped
        );

        out.records.extend(harvest.records);
        out.skipped += harvest.skipped;
        out.pages += 1;

        match harvest.outcome {
            PageOutcome::Exhausted => break,
            PageOutcome::MorePages if page == cfg.max_pages => {
                warn!("reached page limit ({}), stopping", cfg.max_pages);
            }
            PageOutcome::MorePages => tokio::time::sleep(settle).await,
        }
    }

    out
}

// ── Category orchestrator ─────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct HarvestStats {
    pub categories: usize,
    pub pages_visited: usize,
    pub skipped_items: usize,
}

/// Run every configured category in order, pooling records into one result
/// set. A category that yields nothing (timeout, dead page) contributes an
/// empty slice and the run moves on.
pub async fn run_categories<S: Session>(
    session: &S,
    cfg: &ScraperConfig,
) -> (ResultSet, HarvestStats) {
    let mut results = ResultSet::new();
    let mut stats = HarvestStats::default();

    for url in &cfg.categories {
        info!("Scraping category: {}", url);
        let harvest = scrape_category(session, url, cfg).await;
        info!(
            "  category done: {} records over {} pages",
            harvest.records.len(),
            harvest.pages
        );

        stats.categories += 1;
        stats.pages_visited += harvest.pages;
        stats.skipped_items += harvest.skipped;
        results.extend(harvest.records);
    }

    (results, stats)
}
