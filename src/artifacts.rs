//! Failure artifacts: screenshots and diagnostics written for triage

use crate::diagnostics::{DiagnosticsCapturer, DiagnosticsSnapshot};
use crate::session::BrowserSession;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Artifact errors
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("Failed to write artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode artifact: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Captured PNG screenshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screenshot {
    /// Image data (PNG)
    pub data: Vec<u8>,
}

impl Screenshot {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Convert to base64 string
    pub fn to_base64(&self) -> String {
        use base64::{engine::general_purpose, Engine as _};
        general_purpose::STANDARD.encode(&self.data)
    }

    /// Get data URL (for embedding in HTML)
    pub fn to_data_url(&self) -> String {
        format!("data:image/png;base64,{}", self.to_base64())
    }

    /// Save to file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ArtifactError> {
        std::fs::write(path, &self.data)?;
        Ok(())
    }
}

/// JSON document written next to the screenshot
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureReport {
    pub name: String,
    pub recorded_at: DateTime<Utc>,
    pub diagnostics: DiagnosticsSnapshot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<String>,
}

/// Files written for one failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub report: PathBuf,
    pub screenshot: Option<PathBuf>,
}

/// Writes failure artifacts under a directory
#[derive(Debug, Clone)]
pub struct FailureArtifacts {
    dir: PathBuf,
}

impl FailureArtifacts {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Write `<slug>-<timestamp>.json` and, if given, the matching `.png`
    pub fn record(
        &self,
        name: &str,
        diagnostics: DiagnosticsSnapshot,
        screenshot: Option<&Screenshot>,
    ) -> Result<ArtifactPaths, ArtifactError> {
        std::fs::create_dir_all(&self.dir)?;

        let recorded_at = Utc::now();
        let stem = format!("{}-{}", slugify(name), recorded_at.format("%Y%m%dT%H%M%S%3f"));

        let screenshot_path = match screenshot {
            Some(shot) => {
                let path = self.dir.join(format!("{}.png", stem));
                shot.save_to_file(&path)?;
                Some(path)
            }
            None => None,
        };

        let report = FailureReport {
            name: name.to_string(),
            recorded_at,
            diagnostics,
            screenshot: screenshot.map(Screenshot::to_data_url),
        };

        let report_path = self.dir.join(format!("{}.json", stem));
        std::fs::write(&report_path, serde_json::to_vec_pretty(&report)?)?;

        info!("Failure artifacts written to {}", report_path.display());

        Ok(ArtifactPaths {
            report: report_path,
            screenshot: screenshot_path,
        })
    }

    /// Capture diagnostics and a screenshot from `session`, then record them.
    /// A failed screenshot is skipped rather than reported.
    pub async fn capture(
        &self,
        name: &str,
        session: &dyn BrowserSession,
        capturer: &DiagnosticsCapturer,
    ) -> Result<ArtifactPaths, ArtifactError> {
        let diagnostics = capturer.capture().await;

        let screenshot = match session.screenshot(true).await {
            Ok(data) => Some(Screenshot::new(data)),
            Err(e) => {
                warn!("Screenshot failed for {}: {}", name, e);
                None
            }
        };

        self.record(name, diagnostics, screenshot.as_ref())
    }
}

/// Lowercase, dash-separated file name stem
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }

    let slug = slug.trim_end_matches('-').to_string();
    if slug.is_empty() {
        "failure".to_string()
    } else {
        slug
    }
}
