pub mod webdriver;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum SessionError {
    /// The browser session cannot be established or the authenticated state
    /// cannot be reached. Fatal to the whole run.
    #[error("browser session unavailable: {0}")]
    Unavailable(String),

    /// No element matched the selector within the wait bound. Absorbed by
    /// the harvest layer as page/category exhaustion.
    #[error("no element matching `{selector}` appeared within {waited:?}")]
    WaitTimeout { selector: String, waited: Duration },

    /// A required element was missing. Absorbed per-item.
    #[error("required element `{0}` is absent")]
    ElementAbsent(String),

    #[error(transparent)]
    Driver(#[from] thirtyfour::error::WebDriverError),
}

impl SessionError {
    pub fn is_wait_timeout(&self) -> bool {
        matches!(self, SessionError::WaitTimeout { .. })
    }
}

// ── Session seam ──────────────────────────────────────────────────────────────

/// Operations the harvest layer needs from an authenticated browser session.
///
/// `Node` is an opaque handle to one rendered element. Handles are not
/// assumed stable across navigations; callers re-fetch after any navigation
/// or re-render.
#[async_trait]
pub trait Session: Send + Sync {
    type Node: Send + Sync;

    async fn navigate(&self, url: &str) -> Result<(), SessionError>;

    /// Poll until at least one element matches `selector`, up to `bound`.
    /// Returns all matches in DOM order, or `WaitTimeout`.
    async fn wait_until_present(
        &self,
        selector: &str,
        bound: Duration,
    ) -> Result<Vec<Self::Node>, SessionError>;

    /// First page-level match, if any.
    async fn find_on_page(&self, selector: &str) -> Result<Option<Self::Node>, SessionError>;

    /// All matches scoped to `scope`, in DOM order.
    async fn find_within(
        &self,
        scope: &Self::Node,
        selector: &str,
    ) -> Result<Vec<Self::Node>, SessionError>;

    /// First match scoped to `scope`, if any. Existence-checked, never an
    /// error for zero matches.
    async fn find_optional(
        &self,
        scope: &Self::Node,
        selector: &str,
    ) -> Result<Option<Self::Node>, SessionError>;

    async fn text(&self, node: &Self::Node) -> Result<String, SessionError>;

    async fn attr(&self, node: &Self::Node, name: &str)
        -> Result<Option<String>, SessionError>;

    /// Activate an element through script injection, bypassing visibility
    /// checks. Overlays and lazy rendering make the standard click path
    /// unreliable on listing pages.
    async fn force_click(&self, node: &Self::Node) -> Result<(), SessionError>;
}
