//! Shared page-object plumbing
//!
//! Every interaction goes through the executor, the retry controller or the
//! condition poller with an [`ErrorContext`] naming the action and selector.

use crate::config::HarnessConfig;
use crate::diagnostics::DiagnosticsCapturer;
use crate::error::{ErrorContext, OperationError, OperationErrorKind, OperationResult};
use crate::executor::ActionExecutor;
use crate::logging::ActionLogger;
use crate::poll::ConditionPoller;
use crate::retry::RetryController;
use crate::session::BrowserSession;
use std::sync::Arc;
use std::time::Duration;

/// Session plus the resilience components, shared by all page objects
#[derive(Clone)]
pub struct BasePage {
    session: Arc<dyn BrowserSession>,
    config: Arc<HarnessConfig>,
    executor: ActionExecutor,
    retry: RetryController,
    poller: ConditionPoller,
    diagnostics: DiagnosticsCapturer,
}

impl BasePage {
    pub fn new(
        session: Arc<dyn BrowserSession>,
        config: HarnessConfig,
        logger: Arc<dyn ActionLogger>,
    ) -> Self {
        let diagnostics = DiagnosticsCapturer::new(session.clone(), logger.clone());

        Self {
            executor: ActionExecutor::new(logger.clone()).with_diagnostics(diagnostics.clone()),
            retry: RetryController::new(logger.clone()),
            poller: ConditionPoller::new(logger),
            diagnostics,
            config: Arc::new(config),
            session,
        }
    }

    pub fn session(&self) -> &Arc<dyn BrowserSession> {
        &self.session
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn executor(&self) -> &ActionExecutor {
        &self.executor
    }

    pub fn poller(&self) -> &ConditionPoller {
        &self.poller
    }

    pub fn diagnostics(&self) -> &DiagnosticsCapturer {
        &self.diagnostics
    }

    /// Navigate to a path relative to the storefront base URL
    pub async fn navigate(&self, path: &str) -> OperationResult<()> {
        let url = self.config.page_url(path).map_err(|e| {
            OperationError::action_failed(ErrorContext::new("navigate").with_url(path), e.into())
        })?;
        let context = ErrorContext::new("navigate").with_url(url.as_str());

        self.executor
            .execute(context, || self.session.goto(url.as_str()))
            .await
    }

    pub async fn current_url(&self) -> OperationResult<String> {
        self.executor
            .execute(ErrorContext::new("read url"), || self.session.url())
            .await
    }

    pub async fn click(&self, selector: &str) -> OperationResult<()> {
        self.executor
            .execute(ErrorContext::new("click").with_selector(selector), || {
                self.session.click(selector)
            })
            .await
    }

    /// Click, retrying with the configured backoff
    pub async fn click_with_retry(&self, selector: &str) -> OperationResult<()> {
        let options = self
            .config
            .retry_options(ErrorContext::new("click").with_selector(selector));

        self.retry
            .retry(|| self.session.click(selector), options)
            .await
    }

    pub async fn fill(&self, selector: &str, value: &str) -> OperationResult<()> {
        self.executor
            .execute(
                ErrorContext::new("fill")
                    .with_selector(selector)
                    .with_info("length", value.len()),
                || self.session.fill(selector, value),
            )
            .await
    }

    /// Trimmed text of the first match, empty if it has none
    pub async fn text(&self, selector: &str) -> OperationResult<String> {
        let text = self
            .executor
            .execute(ErrorContext::new("read text").with_selector(selector), || {
                self.session.text_content(selector)
            })
            .await?;

        Ok(text.unwrap_or_default().trim().to_string())
    }

    pub async fn texts(&self, selector: &str) -> OperationResult<Vec<String>> {
        self.executor
            .execute(ErrorContext::new("read texts").with_selector(selector), || {
                self.session.all_text_contents(selector)
            })
            .await
    }

    pub async fn count(&self, selector: &str) -> OperationResult<usize> {
        self.executor
            .execute(ErrorContext::new("count").with_selector(selector), || {
                self.session.count(selector)
            })
            .await
    }

    pub async fn is_visible(&self, selector: &str) -> OperationResult<bool> {
        self.executor
            .execute(ErrorContext::new("check visibility").with_selector(selector), || {
                self.session.is_visible(selector)
            })
            .await
    }

    /// Poll until `selector` is visible
    pub async fn wait_for_visible(
        &self,
        selector: &str,
        timeout: Option<Duration>,
    ) -> OperationResult<()> {
        let mut options = self
            .config
            .poll_options(ErrorContext::new("wait for visible").with_selector(selector))
            .with_error_message(format!("{} did not become visible", selector));
        if let Some(timeout) = timeout {
            options = options.with_timeout(timeout);
        }

        self.poller
            .wait_for_condition(|| self.session.is_visible(selector), options)
            .await
    }

    /// Poll until the current URL contains `fragment`
    pub async fn wait_for_url_contains(&self, fragment: &str) -> OperationResult<()> {
        let options = self
            .config
            .poll_options(ErrorContext::new("wait for url").with_info("fragment", fragment))
            .with_error_message(format!("URL never contained {}", fragment));

        self.poller
            .wait_for_condition(
                || async move {
                    let url = self.session.url().await?;
                    Ok::<_, crate::session::SessionError>(url.contains(fragment))
                },
                options,
            )
            .await
    }

    /// Build an error for a value read from the page that made no sense
    pub(crate) fn unexpected(&self, context: ErrorContext, message: impl Into<String>) -> OperationError {
        OperationError::new(OperationErrorKind::ActionFailed, message, context)
    }
}
