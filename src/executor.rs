//! Action executor with uniform logging, timing and failure normalization

use crate::diagnostics::DiagnosticsCapturer;
use crate::error::{BoxError, ErrorContext, OperationError, OperationResult};
use crate::logging::{ActionLogger, LogRecord};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Action execution statistics
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ExecutorStats {
    pub total_actions: u64,
    pub successful_actions: u64,
    pub failed_actions: u64,
    pub total_execution_time_ms: u64,
}

/// Runs single browser operations and turns their failures into
/// [`OperationError`]s
#[derive(Clone)]
pub struct ActionExecutor {
    logger: Arc<dyn ActionLogger>,
    diagnostics: Option<DiagnosticsCapturer>,
    stats: Arc<RwLock<ExecutorStats>>,
}

impl ActionExecutor {
    /// Create new action executor
    pub fn new(logger: Arc<dyn ActionLogger>) -> Self {
        Self {
            logger,
            diagnostics: None,
            stats: Arc::new(RwLock::new(ExecutorStats::default())),
        }
    }

    /// Capture page diagnostics whenever an action fails
    pub fn with_diagnostics(mut self, capturer: DiagnosticsCapturer) -> Self {
        self.diagnostics = Some(capturer);
        self
    }

    /// Execute a browser action
    ///
    /// The action's value is returned unchanged. A failure is logged, has
    /// diagnostics attached when a capturer is configured, and comes back as
    /// an [`OperationError`] carrying `context` and the original error.
    pub async fn execute<T, E, F, Fut>(&self, context: ErrorContext, action: F) -> OperationResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Into<BoxError>,
    {
        let start = Instant::now();

        self.logger
            .log(LogRecord::debug(format!("Starting {}", context.action)).with_context(&context));

        let result = action().await;
        let elapsed = start.elapsed();

        self.record(result.is_ok(), elapsed).await;

        match result {
            Ok(value) => {
                self.logger.log(
                    LogRecord::info(format!("Completed {}", context.action))
                        .with_context(&context)
                        .with_field("duration_ms", elapsed.as_millis() as u64),
                );
                Ok(value)
            }
            Err(e) => {
                let source: BoxError = e.into();

                self.logger.log(
                    LogRecord::error(format!("{} failed", context.action))
                        .with_context(&context)
                        .with_field("error", source.to_string())
                        .with_field("duration_ms", elapsed.as_millis() as u64),
                );

                let failure = OperationError::action_failed(context, source);

                Err(match &self.diagnostics {
                    Some(capturer) => failure.with_diagnostics(capturer.capture().await),
                    None => failure,
                })
            }
        }
    }

    async fn record(&self, success: bool, elapsed: Duration) {
        let mut stats = self.stats.write().await;
        stats.total_actions += 1;
        stats.total_execution_time_ms += elapsed.as_millis() as u64;

        if success {
            stats.successful_actions += 1;
        } else {
            stats.failed_actions += 1;
        }
    }

    /// Get executor statistics
    pub async fn get_stats(&self) -> ExecutorStats {
        self.stats.read().await.clone()
    }
}
