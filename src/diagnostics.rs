//! Best-effort page state capture for failure triage

use crate::logging::{ActionLogger, LogRecord};
use crate::session::{BrowserSession, Cookie, SessionResult, Viewport};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Browser-visible state at a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageState {
    pub url: String,
    pub title: String,
    pub viewport: Option<Viewport>,
    pub cookies: Vec<Cookie>,
    /// JSON object text
    pub local_storage: String,
    /// JSON object text
    pub session_storage: String,
    pub user_agent: String,
    pub timestamp: DateTime<Utc>,
}

/// Outcome of a diagnostics capture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DiagnosticsSnapshot {
    Captured(PageState),
    Unavailable { error: String },
}

impl DiagnosticsSnapshot {
    pub fn is_captured(&self) -> bool {
        matches!(self, DiagnosticsSnapshot::Captured(_))
    }

    pub fn page_state(&self) -> Option<&PageState> {
        match self {
            DiagnosticsSnapshot::Captured(state) => Some(state),
            DiagnosticsSnapshot::Unavailable { .. } => None,
        }
    }
}

/// Captures [`DiagnosticsSnapshot`]s from a live session
#[derive(Clone)]
pub struct DiagnosticsCapturer {
    session: Arc<dyn BrowserSession>,
    logger: Arc<dyn ActionLogger>,
}

impl DiagnosticsCapturer {
    pub fn new(session: Arc<dyn BrowserSession>, logger: Arc<dyn ActionLogger>) -> Self {
        Self { session, logger }
    }

    /// Capture the current page state. Never fails: query errors are folded
    /// into [`DiagnosticsSnapshot::Unavailable`].
    pub async fn capture(&self) -> DiagnosticsSnapshot {
        match self.try_capture().await {
            Ok(state) => {
                self.logger.log(
                    LogRecord::debug("Captured page diagnostics")
                        .with_field("url", state.url.as_str())
                        .with_field("cookies", state.cookies.len()),
                );
                DiagnosticsSnapshot::Captured(state)
            }
            Err(e) => {
                self.logger.log(
                    LogRecord::warn("Failed to capture diagnostics")
                        .with_field("error", e.to_string()),
                );
                DiagnosticsSnapshot::Unavailable {
                    error: e.to_string(),
                }
            }
        }
    }

    async fn try_capture(&self) -> SessionResult<PageState> {
        let session = self.session.as_ref();

        Ok(PageState {
            url: session.url().await?,
            title: session.title().await?,
            viewport: session.viewport().await?,
            cookies: session.cookies().await?,
            local_storage: session.local_storage().await?,
            session_storage: session.session_storage().await?,
            user_agent: session.user_agent().await?,
            timestamp: Utc::now(),
        })
    }
}
