//! Browser session port
//!
//! The harness never owns the browser lifecycle. It talks to an already open
//! page through [`BrowserSession`]; [`crate::chromium::ChromiumSession`] is the
//! production implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Browser session errors
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Timeout waiting for element: {0}")]
    Timeout(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Action failed: {0}")]
    ActionFailed(String),

    #[error("Script error: {0}")]
    Script(String),

    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    #[error("Browser error: {0}")]
    BrowserError(String),
}

/// Result type for session calls
pub type SessionResult<T> = Result<T, SessionError>;

/// Page viewport size in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Browser cookie as seen by the page's context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    /// Expiry as seconds since the epoch, `-1` for session cookies
    pub expires: f64,
    pub http_only: bool,
    pub secure: bool,
}

/// Handle to a live page
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// Current page URL
    async fn url(&self) -> SessionResult<String>;

    async fn title(&self) -> SessionResult<String>;

    /// Viewport size, `None` when the page has no fixed viewport
    async fn viewport(&self) -> SessionResult<Option<Viewport>>;

    async fn cookies(&self) -> SessionResult<Vec<Cookie>>;

    /// `localStorage` serialized as a JSON object
    async fn local_storage(&self) -> SessionResult<String>;

    /// `sessionStorage` serialized as a JSON object
    async fn session_storage(&self) -> SessionResult<String>;

    async fn user_agent(&self) -> SessionResult<String>;

    async fn goto(&self, url: &str) -> SessionResult<()>;

    async fn click(&self, selector: &str) -> SessionResult<()>;

    /// Replace the value of an input
    async fn fill(&self, selector: &str, value: &str) -> SessionResult<()>;

    async fn text_content(&self, selector: &str) -> SessionResult<Option<String>>;

    /// Trimmed text of every match, in document order
    async fn all_text_contents(&self, selector: &str) -> SessionResult<Vec<String>>;

    async fn is_visible(&self, selector: &str) -> SessionResult<bool>;

    async fn count(&self, selector: &str) -> SessionResult<usize>;

    /// PNG screenshot bytes
    async fn screenshot(&self, full_page: bool) -> SessionResult<Vec<u8>>;
}
