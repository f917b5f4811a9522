//! Bounded retry with exponential backoff
//!
//! Attempts run strictly one after another. There is no overall time budget:
//! the bound is the attempt count only, so a hanging attempt stalls the whole
//! sequence.

use crate::error::{BoxError, ErrorContext, OperationError, OperationResult};
use crate::logging::{ActionLogger, LogRecord};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Default number of attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default delay before the first retry (1 second)
pub const DEFAULT_INITIAL_DELAY_MS: u64 = 1_000;

/// Default cap on any single delay (10 seconds)
pub const DEFAULT_MAX_DELAY_MS: u64 = 10_000;

/// Options for a single [`RetryController::retry`] call
#[derive(Debug, Clone, PartialEq)]
pub struct RetryOptions {
    /// Total attempts, including the first. Zero is treated as one.
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub context: ErrorContext,
}

impl RetryOptions {
    /// Default options for the given context
    pub fn new(context: ErrorContext) -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_delay: Duration::from_millis(DEFAULT_INITIAL_DELAY_MS),
            max_delay: Duration::from_millis(DEFAULT_MAX_DELAY_MS),
            context,
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_initial_delay(mut self, initial_delay: Duration) -> Self {
        self.initial_delay = initial_delay;
        self
    }

    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Number of attempts that will actually run
    pub fn effective_attempts(&self) -> u32 {
        self.max_retries.max(1)
    }

    /// Delay after failed attempt `attempt` (1-based)
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        backoff_delay(self.initial_delay, self.max_delay, attempt)
    }
}

/// `min(initial * 2^(attempt - 1), max)` for a 1-based attempt number
pub fn backoff_delay(initial: Duration, max: Duration, attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1).min(31);

    initial
        .checked_mul(1u32 << exponent)
        .map_or(max, |delay| delay.min(max))
}

/// Re-invokes failing operations with exponential backoff
#[derive(Clone)]
pub struct RetryController {
    logger: Arc<dyn ActionLogger>,
}

impl RetryController {
    pub fn new(logger: Arc<dyn ActionLogger>) -> Self {
        Self { logger }
    }

    /// Run `action` until it succeeds or the attempts run out
    ///
    /// Only the last failure is kept in the returned error; earlier ones are
    /// logged as they happen.
    pub async fn retry<T, E, F, Fut>(&self, mut action: F, options: RetryOptions) -> OperationResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Into<BoxError>,
    {
        let attempts = options.effective_attempts();
        let mut attempt = 1;

        loop {
            match action().await {
                Ok(value) => {
                    if attempt > 1 {
                        self.logger.log(
                            LogRecord::info(format!(
                                "{} succeeded on attempt {}",
                                options.context.action, attempt
                            ))
                            .with_context(&options.context)
                            .with_field("attempt", attempt),
                        );
                    }
                    return Ok(value);
                }
                Err(e) => {
                    let source: BoxError = e.into();

                    if attempt >= attempts {
                        self.logger.log(
                            LogRecord::error(format!(
                                "{} failed after {} attempts",
                                options.context.action, attempts
                            ))
                            .with_context(&options.context)
                            .with_field("attempt", attempt)
                            .with_field("error", source.to_string()),
                        );
                        return Err(OperationError::retries_exhausted(
                            options.context,
                            attempts,
                            source,
                        ));
                    }

                    let delay = options.delay_for_attempt(attempt);

                    self.logger.log(
                        LogRecord::warn(format!(
                            "Attempt {}/{} of {} failed, retrying in {}ms",
                            attempt,
                            attempts,
                            options.context.action,
                            delay.as_millis()
                        ))
                        .with_context(&options.context)
                        .with_field("attempt", attempt)
                        .with_field("delay_ms", delay.as_millis() as u64)
                        .with_field("error", source.to_string()),
                    );

                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
