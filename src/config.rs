//! Harness configuration
//!
//! Loaded from YAML, then overlaid with `E2E_*` environment variables. Only
//! the page-object layer and the CLI read this; the executor, retry and poll
//! components take their settings per call.

use crate::error::ErrorContext;
use crate::poll::{PollOptions, DEFAULT_POLL_INTERVAL_MS, DEFAULT_POLL_TIMEOUT_MS};
use crate::retry::{
    RetryOptions, DEFAULT_INITIAL_DELAY_MS, DEFAULT_MAX_DELAY_MS, DEFAULT_MAX_RETRIES,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid value for {name}: {value}")]
    InvalidEnv { name: String, value: String },

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Retry defaults for page-object actions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_delay_ms: DEFAULT_INITIAL_DELAY_MS,
            max_delay_ms: DEFAULT_MAX_DELAY_MS,
        }
    }
}

/// Poll defaults for page-object waits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollSettings {
    pub timeout_ms: u64,
    pub interval_ms: u64,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_POLL_TIMEOUT_MS,
            interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

/// Harness configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Storefront root URL
    pub base_url: String,

    /// Headless mode
    pub headless: bool,

    /// Viewport width
    pub viewport_width: u32,

    /// Viewport height
    pub viewport_height: u32,

    /// User agent override
    pub user_agent: Option<String>,

    /// Element lookup timeout (milliseconds)
    pub default_timeout_ms: u64,

    pub retry: RetrySettings,

    pub poll: PollSettings,

    /// Where failure screenshots and diagnostics are written
    pub artifacts_dir: PathBuf,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.saucedemo.com/".to_string(),
            headless: true,
            viewport_width: 1280,
            viewport_height: 720,
            user_agent: None,
            default_timeout_ms: 10_000,
            retry: RetrySettings::default(),
            poll: PollSettings::default(),
            artifacts_dir: PathBuf::from("reports/artifacts"),
        }
    }
}

impl HarnessConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Defaults overlaid with the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply `E2E_*` overrides from `lookup`
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("E2E_BASE_URL") {
            self.base_url = value;
        }
        if let Some(value) = lookup("E2E_HEADLESS") {
            self.headless = parse_bool("E2E_HEADLESS", &value)?;
        }
        if let Some(value) = lookup("E2E_TIMEOUT_MS") {
            self.default_timeout_ms = parse_number("E2E_TIMEOUT_MS", &value)?;
        }
        if let Some(value) = lookup("E2E_MAX_RETRIES") {
            self.retry.max_retries = parse_number("E2E_MAX_RETRIES", &value)?;
        }
        if let Some(value) = lookup("E2E_ARTIFACTS_DIR") {
            self.artifacts_dir = PathBuf::from(value);
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.base()?;

        if self.viewport_width == 0 || self.viewport_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "viewport must be non-zero, got {}x{}",
                self.viewport_width, self.viewport_height
            )));
        }

        Ok(())
    }

    /// Parsed base URL
    pub fn base(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidBaseUrl(format!("{}: {}", self.base_url, e)))
    }

    /// Resolve a storefront path against the base URL
    pub fn page_url(&self, path: &str) -> Result<Url, ConfigError> {
        self.base()?
            .join(path)
            .map_err(|e| ConfigError::InvalidBaseUrl(format!("{}: {}", path, e)))
    }

    pub fn retry_options(&self, context: ErrorContext) -> RetryOptions {
        RetryOptions::new(context)
            .with_max_retries(self.retry.max_retries)
            .with_initial_delay(Duration::from_millis(self.retry.initial_delay_ms))
            .with_max_delay(Duration::from_millis(self.retry.max_delay_ms))
    }

    pub fn poll_options(&self, context: ErrorContext) -> PollOptions {
        PollOptions::new(context)
            .with_timeout(Duration::from_millis(self.poll.timeout_ms))
            .with_interval(Duration::from_millis(self.poll.interval_ms))
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidEnv {
            name: name.to_string(),
            value: value.to_string(),
        }),
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        name: name.to_string(),
        value: value.to_string(),
    })
}
