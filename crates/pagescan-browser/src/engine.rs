use crate::error::{BrowserError, Result};
use crate::session::{LaunchTarget, PageSession, PageSessionFactory};
use chromiumoxide::browser::{Browser, BrowserConfig as ChromiumConfig};
use chromiumoxide::handler::Handler;
use chromiumoxide::Page;
use futures_util::stream::StreamExt;
use pagescan_core::BrowserConfig;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Browser, page and CDP handler task backing an open session.
struct OpenPage {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    /// Launched by us, so we own the browser process
    local: bool,
}

/// Page session driven over the Chrome DevTools Protocol.
pub struct ChromiumPage {
    config: BrowserConfig,
    open: Option<OpenPage>,
}

impl ChromiumPage {
    /// Create an unopened session using the given browser settings
    pub fn new(config: BrowserConfig) -> Self {
        Self { config, open: None }
    }

    fn launch_config(&self) -> Result<ChromiumConfig> {
        let mut builder = ChromiumConfig::builder()
            .window_size(self.config.window_width, self.config.window_height)
            .request_timeout(self.navigation_timeout());

        if self.config.no_sandbox {
            builder = builder.no_sandbox();
        }
        if !self.config.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &self.config.executable_path {
            builder = builder.chrome_executable(path);
        }

        builder.build().map_err(BrowserError::LaunchError)
    }

    fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.config.navigation_timeout_secs)
    }

    fn page(&self) -> Result<&Page> {
        self.open
            .as_ref()
            .map(|open| &open.page)
            .ok_or(BrowserError::NotOpen)
    }

    async fn connect(endpoint: &str) -> Result<(Browser, Handler)> {
        Browser::connect(endpoint)
            .await
            .map_err(|e| BrowserError::ConnectError {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
            })
    }

    async fn launch(&self) -> Result<(Browser, Handler)> {
        let config = self.launch_config()?;
        Browser::launch(config)
            .await
            .map_err(|e| BrowserError::LaunchError(e.to_string()))
    }
}

/// Drain CDP events until the connection goes away.
fn spawn_handler(mut handler: Handler) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(e) = event {
                tracing::debug!(error = %e, "CDP handler error");
            }
        }
        tracing::debug!("CDP handler stream ended");
    })
}

#[async_trait::async_trait]
impl PageSession for ChromiumPage {
    async fn open(&mut self, target: LaunchTarget) -> Result<()> {
        if self.open.is_some() {
            return Err(BrowserError::AlreadyOpen);
        }

        let local = matches!(target, LaunchTarget::Local);
        let (mut browser, handler) = match &target {
            LaunchTarget::Remote { endpoint } => {
                tracing::debug!(endpoint = %endpoint, "Connecting to remote browser");
                Self::connect(endpoint).await?
            }
            LaunchTarget::Local => {
                tracing::debug!(headless = self.config.headless, "Launching local browser");
                self.launch().await?
            }
        };
        let handler = spawn_handler(handler);

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                if local {
                    let _ = browser.close().await;
                    let _ = browser.wait().await;
                }
                handler.abort();
                return Err(BrowserError::ChromiumError(format!(
                    "failed to create page: {e}"
                )));
            }
        };

        self.open = Some(OpenPage {
            browser,
            page,
            handler,
            local,
        });
        Ok(())
    }

    async fn navigate(&mut self, url: &str) -> Result<()> {
        let timeout = self.navigation_timeout();
        let page = self.page()?;

        match tokio::time::timeout(timeout, page.goto(url)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(BrowserError::NavigationError(format!("{url}: {e}"))),
            Err(_) => Err(BrowserError::Timeout(format!(
                "navigation to {url} exceeded {}s",
                timeout.as_secs()
            ))),
        }
    }

    fn is_usable(&self) -> bool {
        self.open
            .as_ref()
            .is_some_and(|open| !open.handler.is_finished())
    }

    async fn evaluate(&self, script: &str) -> Result<serde_json::Value> {
        let result = self
            .page()?
            .evaluate(script)
            .await
            .map_err(|e| BrowserError::EvaluationError(e.to_string()))?;

        Ok(result.value().cloned().unwrap_or(serde_json::Value::Null))
    }

    async fn close(&mut self) -> Result<()> {
        let Some(OpenPage {
            mut browser,
            page,
            handler,
            local,
        }) = self.open.take()
        else {
            return Ok(());
        };

        let mut first_error = page
            .close()
            .await
            .err()
            .map(|e| BrowserError::ChromiumError(format!("failed to close page: {e}")));

        // A remote browser belongs to the pool; only our own process is shut down.
        if local {
            if let Err(e) = browser.close().await {
                first_error.get_or_insert(BrowserError::ChromiumError(format!(
                    "failed to close browser: {e}"
                )));
            }
            if let Err(e) = browser.wait().await {
                first_error.get_or_insert(BrowserError::ChromiumError(format!(
                    "failed to wait for browser exit: {e}"
                )));
            }
        }
        handler.abort();

        first_error.map_or(Ok(()), Err)
    }
}

impl Drop for ChromiumPage {
    fn drop(&mut self) {
        if let Some(open) = self.open.take() {
            tracing::warn!("Page session dropped without close");
            open.handler.abort();
        }
    }
}

/// Builds [`ChromiumPage`] sessions from shared browser settings.
#[derive(Debug, Clone)]
pub struct ChromiumPageFactory {
    config: BrowserConfig,
}

impl ChromiumPageFactory {
    /// Create a factory for the given browser settings
    pub fn new(config: BrowserConfig) -> Self {
        Self { config }
    }
}

impl PageSessionFactory for ChromiumPageFactory {
    fn new_session(&self) -> Box<dyn PageSession> {
        Box::new(ChromiumPage::new(self.config.clone()))
    }
}
