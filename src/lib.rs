//! Storefront E2E - browser end-to-end harness for the demo storefront
//!
//! This library provides:
//! - An action executor that logs, times and normalizes browser failures
//! - Bounded retries with exponential backoff
//! - Predicate polling with a wall-clock timeout
//! - Best-effort page diagnostics and failure artifacts
//! - Headless Chrome sessions via chromiumoxide
//! - Page objects and test data for the storefront

pub mod artifacts;
pub mod chromium;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod executor;
pub mod logging;
pub mod pages;
pub mod poll;
pub mod retry;
pub mod session;
pub mod test_data;

pub use artifacts::{ArtifactError, ArtifactPaths, FailureArtifacts, Screenshot};
pub use chromium::{ChromiumSession, SessionConfig};
pub use config::{ConfigError, HarnessConfig};
pub use diagnostics::{DiagnosticsCapturer, DiagnosticsSnapshot, PageState};
pub use error::{BoxError, ErrorContext, OperationError, OperationErrorKind, OperationResult};
pub use executor::{ActionExecutor, ExecutorStats};
pub use logging::{init_logging, ActionLogger, LogLevel, LogRecord, MemoryLogger, TracingLogger};
pub use poll::{ConditionPoller, PollOptions};
pub use retry::{backoff_delay, RetryController, RetryOptions};
pub use session::{BrowserSession, Cookie, SessionError, SessionResult, Viewport};
