//! Predicate polling with a wall-clock timeout

use crate::error::{BoxError, ErrorContext, OperationError, OperationResult};
use crate::logging::{ActionLogger, LogRecord};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Default timeout for condition waits (30 seconds)
pub const DEFAULT_POLL_TIMEOUT_MS: u64 = 30_000;

/// Default interval between evaluations
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// Options for a single [`ConditionPoller::wait_for_condition`] call
#[derive(Debug, Clone, PartialEq)]
pub struct PollOptions {
    pub timeout: Duration,
    pub interval: Duration,
    /// Message for the timeout error; a generic one is used when unset
    pub error_message: Option<String>,
    pub context: ErrorContext,
}

impl PollOptions {
    pub fn new(context: ErrorContext) -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_POLL_TIMEOUT_MS),
            interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            error_message: None,
            context,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    fn timeout_message(&self) -> String {
        self.error_message.clone().unwrap_or_else(|| {
            format!("Condition not met within {} ms", self.timeout.as_millis())
        })
    }
}

/// Result of one predicate evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
enum Evaluation {
    Satisfied,
    Pending,
    /// The predicate failed; treated as not yet satisfied
    Errored(String),
}

impl<E: Into<BoxError>> From<Result<bool, E>> for Evaluation {
    fn from(result: Result<bool, E>) -> Self {
        match result {
            Ok(true) => Evaluation::Satisfied,
            Ok(false) => Evaluation::Pending,
            Err(e) => Evaluation::Errored(e.into().to_string()),
        }
    }
}

/// Waits for arbitrary conditions over page state
#[derive(Clone)]
pub struct ConditionPoller {
    logger: Arc<dyn ActionLogger>,
}

impl ConditionPoller {
    pub fn new(logger: Arc<dyn ActionLogger>) -> Self {
        Self { logger }
    }

    /// Evaluate `predicate` every `interval` until it returns `true`
    ///
    /// Predicate errors count as "not yet". Only a timeout fails the wait, and
    /// the errors seen along the way are not attached to it.
    pub async fn wait_for_condition<E, F, Fut>(
        &self,
        mut predicate: F,
        options: PollOptions,
    ) -> OperationResult<()>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<bool, E>>,
        E: Into<BoxError>,
    {
        let start = Instant::now();
        let mut evaluations = 0u32;

        while start.elapsed() < options.timeout {
            evaluations += 1;

            match Evaluation::from(predicate().await) {
                Evaluation::Satisfied => {
                    self.logger.log(
                        LogRecord::debug(format!("Condition for {} met", options.context.action))
                            .with_context(&options.context)
                            .with_field("evaluations", evaluations)
                            .with_field("elapsed_ms", start.elapsed().as_millis() as u64),
                    );
                    return Ok(());
                }
                Evaluation::Pending => {}
                Evaluation::Errored(reason) => {
                    self.logger.log(
                        LogRecord::debug("Condition check raised, treating as unmet")
                            .with_context(&options.context)
                            .with_field("error", reason),
                    );
                }
            }

            tokio::time::sleep(options.interval).await;
        }

        let message = options.timeout_message();

        self.logger.log(
            LogRecord::error(message.as_str())
                .with_context(&options.context)
                .with_field("timeout_ms", options.timeout.as_millis() as u64)
                .with_field("evaluations", evaluations),
        );

        Err(OperationError::condition_timeout(options.context, message))
    }
}
