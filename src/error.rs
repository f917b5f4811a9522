//! Error context and the normalized operation error
//!
//! Every failure that leaves the executor, the retry controller or the
//! condition poller is an [`OperationError`]. Step code can match on
//! [`OperationError::context`] without knowing which browser call failed.

use crate::diagnostics::DiagnosticsSnapshot;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Boxed error produced by a wrapped browser operation
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for wrapped operations
pub type OperationResult<T> = Result<T, OperationError>;

/// Describes the action being attempted when something goes wrong
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Action name, e.g. `click` or `navigate`
    pub action: String,

    /// Target selector, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,

    /// Page URL involved, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Free-form auxiliary fields
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub additional_info: BTreeMap<String, Value>,
}

impl ErrorContext {
    /// Create a context for the named action
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            ..Default::default()
        }
    }

    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = Some(selector.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Attach an auxiliary field
    pub fn with_info(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.additional_info.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.action)?;
        if let Some(selector) = &self.selector {
            write!(f, " selector={}", selector)?;
        }
        if let Some(url) = &self.url {
            write!(f, " url={}", url)?;
        }
        Ok(())
    }
}

/// Which boundary produced an [`OperationError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationErrorKind {
    /// A single wrapped action failed
    ActionFailed,

    /// Every retry attempt failed
    RetriesExhausted,

    /// A polled condition never became true
    ConditionTimeout,
}

/// Failure of a wrapped browser operation
#[derive(Error, Debug)]
#[error("{message}")]
pub struct OperationError {
    message: String,
    kind: OperationErrorKind,
    context: ErrorContext,
    attempts: Option<u32>,
    diagnostics: Option<DiagnosticsSnapshot>,
    #[source]
    source: Option<BoxError>,
}

impl OperationError {
    /// Build an error with no underlying cause
    pub fn new(kind: OperationErrorKind, message: impl Into<String>, context: ErrorContext) -> Self {
        Self {
            message: message.into(),
            kind,
            context,
            attempts: None,
            diagnostics: None,
            source: None,
        }
    }

    /// A single action failed; the message is taken from the original error
    pub fn action_failed(context: ErrorContext, source: BoxError) -> Self {
        Self {
            message: source.to_string(),
            source: Some(source),
            ..Self::new(OperationErrorKind::ActionFailed, String::new(), context)
        }
    }

    /// All attempts failed; `source` is the last attempt's error
    pub fn retries_exhausted(context: ErrorContext, attempts: u32, source: BoxError) -> Self {
        let message = format!(
            "{} failed after {} attempts: {}",
            context.action, attempts, source
        );
        Self {
            attempts: Some(attempts),
            source: Some(source),
            ..Self::new(OperationErrorKind::RetriesExhausted, message, context)
        }
    }

    pub fn condition_timeout(context: ErrorContext, message: impl Into<String>) -> Self {
        Self::new(OperationErrorKind::ConditionTimeout, message, context)
    }

    /// Attach a diagnostics snapshot taken at failure time
    pub fn with_diagnostics(mut self, snapshot: DiagnosticsSnapshot) -> Self {
        self.diagnostics = Some(snapshot);
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> OperationErrorKind {
        self.kind
    }

    pub fn context(&self) -> &ErrorContext {
        &self.context
    }

    /// Number of attempts made, for retry failures
    pub fn attempts(&self) -> Option<u32> {
        self.attempts
    }

    pub fn diagnostics(&self) -> Option<&DiagnosticsSnapshot> {
        self.diagnostics.as_ref()
    }

    /// The underlying error, if the failure wrapped one
    pub fn original_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.source.as_deref()
    }
}
