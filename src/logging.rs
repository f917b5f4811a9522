//! Structured logging port for wrapped actions
//!
//! Components receive an [`ActionLogger`] at construction instead of logging
//! through a process-wide handle. [`TracingLogger`] forwards to `tracing`;
//! [`MemoryLogger`] keeps records in memory for assertions and reports.

use crate::error::ErrorContext;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Log severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// A single structured log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub level: LogLevel,
    pub message: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, Value>,
}

impl LogRecord {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn debug(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Debug, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Info, message)
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Warn, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Error, message)
    }

    /// Add a structured field
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Copy `action`, `selector`, `url` and auxiliary info from a context
    pub fn with_context(mut self, context: &ErrorContext) -> Self {
        self.fields
            .insert("action".to_string(), Value::from(context.action.as_str()));
        if let Some(selector) = &context.selector {
            self.fields
                .insert("selector".to_string(), Value::from(selector.as_str()));
        }
        if let Some(url) = &context.url {
            self.fields.insert("url".to_string(), Value::from(url.as_str()));
        }
        if !context.additional_info.is_empty() {
            let info = context
                .additional_info
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect::<serde_json::Map<_, _>>();
            self.fields.insert("info".to_string(), Value::Object(info));
        }
        self
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

/// Sink for structured action logs
pub trait ActionLogger: Send + Sync {
    fn log(&self, record: LogRecord);
}

/// Forwards records to the `tracing` subscriber
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl ActionLogger for TracingLogger {
    fn log(&self, record: LogRecord) {
        let TracingFields {
            action,
            selector,
            attempt,
            rest,
        } = TracingFields::from_record(&record);

        match record.level {
            LogLevel::Debug => {
                debug!(action, selector, attempt, fields = %rest, "{}", record.message)
            }
            LogLevel::Info => {
                info!(action, selector, attempt, fields = %rest, "{}", record.message)
            }
            LogLevel::Warn => {
                warn!(action, selector, attempt, fields = %rest, "{}", record.message)
            }
            LogLevel::Error => {
                error!(action, selector, attempt, fields = %rest, "{}", record.message)
            }
        }
    }
}

/// Record fields emitted as separate `tracing` fields
const PROMOTED_FIELDS: [&str; 3] = ["action", "selector", "attempt"];

/// A record split into filterable `tracing` fields and a JSON remainder
#[derive(Debug, PartialEq)]
struct TracingFields<'a> {
    action: Option<&'a str>,
    selector: Option<&'a str>,
    attempt: Option<u64>,
    rest: String,
}

impl<'a> TracingFields<'a> {
    fn from_record(record: &'a LogRecord) -> Self {
        let rest: BTreeMap<&str, &Value> = record
            .fields
            .iter()
            .filter(|(key, _)| !PROMOTED_FIELDS.contains(&key.as_str()))
            .map(|(key, value)| (key.as_str(), value))
            .collect();

        Self {
            action: record.field("action").and_then(Value::as_str),
            selector: record.field("selector").and_then(Value::as_str),
            attempt: record.field("attempt").and_then(Value::as_u64),
            rest: serde_json::to_string(&rest).unwrap_or_default(),
        }
    }
}

/// Keeps every record in memory
#[derive(Debug, Default)]
pub struct MemoryLogger {
    records: Mutex<Vec<LogRecord>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all records so far
    pub fn records(&self) -> Vec<LogRecord> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn at_level(&self, level: LogLevel) -> Vec<LogRecord> {
        self.records()
            .into_iter()
            .filter(|record| record.level == level)
            .collect()
    }

    pub fn clear(&self) {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

impl ActionLogger for MemoryLogger {
    fn log(&self, record: LogRecord) {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(record);
    }
}

/// Logger used when the caller does not inject one
pub fn default_logger() -> Arc<dyn ActionLogger> {
    Arc::new(TracingLogger)
}

/// Initialize logging
pub fn init_logging() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront_e2e=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
