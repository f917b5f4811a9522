//! Chromium-backed [`BrowserSession`] using chromiumoxide

use crate::config::HarnessConfig;
use crate::session::{BrowserSession, Cookie, SessionError, SessionResult, Viewport};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::element::Element;
use chromiumoxide::page::{Page, ScreenshotParams};
use futures::StreamExt;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Browser launch settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Headless mode
    pub headless: bool,

    /// Viewport width
    pub viewport_width: u32,

    /// Viewport height
    pub viewport_height: u32,

    /// User agent override
    pub user_agent: Option<String>,

    /// How long element lookups keep trying (milliseconds)
    pub default_timeout_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1280,
            viewport_height: 720,
            user_agent: None,
            default_timeout_ms: 10_000,
        }
    }
}

impl From<&HarnessConfig> for SessionConfig {
    fn from(config: &HarnessConfig) -> Self {
        Self {
            headless: config.headless,
            viewport_width: config.viewport_width,
            viewport_height: config.viewport_height,
            user_agent: config.user_agent.clone(),
            default_timeout_ms: config.default_timeout_ms,
        }
    }
}

/// A single Chromium page driven over CDP
pub struct ChromiumSession {
    browser: Arc<RwLock<Option<Browser>>>,
    page: Page,
    handler: JoinHandle<()>,
    default_timeout: Duration,
}

impl ChromiumSession {
    /// Launch a browser and open a blank page
    pub async fn launch(config: &SessionConfig) -> SessionResult<Self> {
        info!("Launching browser...");

        let mut config_builder = BrowserConfig::builder();

        if !config.headless {
            config_builder = config_builder.with_head();
        }

        config_builder = config_builder.viewport(chromiumoxide::handler::viewport::Viewport {
            width: config.viewport_width,
            height: config.viewport_height,
            device_scale_factor: Some(1.0),
            emulating_mobile: false,
            is_landscape: false,
            has_touch: false,
        });

        let browser_config = config_builder.build().map_err(|e| {
            SessionError::LaunchFailed(format!("Failed to build config: {}", e))
        })?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| SessionError::LaunchFailed(e.to_string()))?;

        let handler = tokio::task::spawn(async move {
            while let Some(event) = handler.next().await {
                debug!("Browser event: {:?}", event);
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| SessionError::BrowserError(e.to_string()))?;

        if let Some(user_agent) = &config.user_agent {
            page.set_user_agent(user_agent.as_str())
                .await
                .map_err(|e| SessionError::BrowserError(e.to_string()))?;
        }

        info!("Browser launched successfully");

        Ok(Self {
            browser: Arc::new(RwLock::new(Some(browser))),
            page,
            handler,
            default_timeout: Duration::from_millis(config.default_timeout_ms),
        })
    }

    /// Underlying chromiumoxide page
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Close the browser and stop the event handler
    pub async fn close(&self) {
        debug!("Closing browser...");

        let mut browser_lock = self.browser.write().await;
        if let Some(mut browser) = browser_lock.take() {
            if let Err(e) = browser.close().await {
                warn!("Failed to close browser gracefully: {}", e);
            }
        }

        self.handler.abort();
    }

    /// Find element, polling until the default timeout
    async fn find_element(&self, selector: &str) -> SessionResult<Element> {
        let deadline = tokio::time::Instant::now() + self.default_timeout;

        loop {
            match self.page.find_element(selector).await {
                Ok(element) => return Ok(element),
                Err(_) => {
                    if tokio::time::Instant::now() >= deadline {
                        return Err(SessionError::Timeout(selector.to_string()));
                    }
                    tokio::time::sleep(Duration::from_millis(100)).await;
                }
            }
        }
    }

    async fn eval<T: DeserializeOwned>(&self, script: String) -> SessionResult<T> {
        self.page
            .evaluate(script)
            .await
            .map_err(|e| SessionError::Script(e.to_string()))?
            .into_value::<T>()
            .map_err(|e| SessionError::Script(e.to_string()))
    }
}

/// Quote a selector for embedding in a script
fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn url(&self) -> SessionResult<String> {
        self.page
            .url()
            .await
            .map(|url| url.unwrap_or_default())
            .map_err(|e| SessionError::BrowserError(e.to_string()))
    }

    async fn title(&self) -> SessionResult<String> {
        self.page
            .get_title()
            .await
            .map(|title| title.unwrap_or_default())
            .map_err(|e| SessionError::BrowserError(e.to_string()))
    }

    async fn viewport(&self) -> SessionResult<Option<Viewport>> {
        self.eval("({ width: window.innerWidth, height: window.innerHeight })".to_string())
            .await
            .map(Some)
    }

    async fn cookies(&self) -> SessionResult<Vec<Cookie>> {
        let cookies = self
            .page
            .get_cookies()
            .await
            .map_err(|e| SessionError::BrowserError(e.to_string()))?;

        Ok(cookies
            .into_iter()
            .map(|cookie| Cookie {
                name: cookie.name,
                value: cookie.value,
                domain: cookie.domain,
                path: cookie.path,
                expires: cookie.expires,
                http_only: cookie.http_only,
                secure: cookie.secure,
            })
            .collect())
    }

    async fn local_storage(&self) -> SessionResult<String> {
        self.eval("JSON.stringify(window.localStorage)".to_string())
            .await
    }

    async fn session_storage(&self) -> SessionResult<String> {
        self.eval("JSON.stringify(window.sessionStorage)".to_string())
            .await
    }

    async fn user_agent(&self) -> SessionResult<String> {
        self.eval("navigator.userAgent".to_string()).await
    }

    async fn goto(&self, url: &str) -> SessionResult<()> {
        self.page
            .goto(url)
            .await
            .map_err(|e| SessionError::NavigationFailed(e.to_string()))?;
        Ok(())
    }

    async fn click(&self, selector: &str) -> SessionResult<()> {
        let element = self.find_element(selector).await?;

        element
            .click()
            .await
            .map_err(|e| SessionError::ActionFailed(e.to_string()))?;
        Ok(())
    }

    async fn fill(&self, selector: &str, value: &str) -> SessionResult<()> {
        let element = self.find_element(selector).await?;

        self.eval::<bool>(format!(
            "(() => {{ const el = document.querySelector({}); if (!el) return false; el.value = ''; return true; }})()",
            js_string(selector)
        ))
        .await?;

        element
            .click()
            .await
            .map_err(|e| SessionError::ActionFailed(e.to_string()))?;

        element
            .type_str(value)
            .await
            .map_err(|e| SessionError::ActionFailed(e.to_string()))?;
        Ok(())
    }

    async fn text_content(&self, selector: &str) -> SessionResult<Option<String>> {
        let element = self.find_element(selector).await?;

        element
            .inner_text()
            .await
            .map_err(|e| SessionError::ActionFailed(e.to_string()))
    }

    async fn all_text_contents(&self, selector: &str) -> SessionResult<Vec<String>> {
        self.eval(format!(
            "Array.from(document.querySelectorAll({})).map(el => (el.textContent || '').trim())",
            js_string(selector)
        ))
        .await
    }

    async fn is_visible(&self, selector: &str) -> SessionResult<bool> {
        self.eval(format!(
            "(() => {{ const el = document.querySelector({}); if (!el) return false; \
             const rect = el.getBoundingClientRect(); const style = getComputedStyle(el); \
             return rect.width > 0 && rect.height > 0 && style.visibility !== 'hidden' && style.display !== 'none'; }})()",
            js_string(selector)
        ))
        .await
    }

    async fn count(&self, selector: &str) -> SessionResult<usize> {
        self.eval(format!(
            "document.querySelectorAll({}).length",
            js_string(selector)
        ))
        .await
    }

    async fn screenshot(&self, full_page: bool) -> SessionResult<Vec<u8>> {
        self.page
            .screenshot(ScreenshotParams::builder().full_page(full_page).build())
            .await
            .map_err(|e| SessionError::BrowserError(e.to_string()))
    }
}
