use crate::error::{BrowserError, Result};

/// Where a page session gets its browser from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchTarget {
    /// Connect to an already running browser at this endpoint
    Remote {
        /// WebSocket (or HTTP debugger) address of the browser
        endpoint: String,
    },
    /// Launch a browser process on this machine
    Local,
}

/// One browser-controlled page.
///
/// A session is opened once, used for a single scan, and closed once.
/// Implementations must tolerate `close` on a session that never opened.
#[async_trait::async_trait]
pub trait PageSession: Send + Sync {
    /// Open the page against the given browser target
    async fn open(&mut self, target: LaunchTarget) -> Result<()>;

    /// Navigate the open page to a URL
    async fn navigate(&mut self, url: &str) -> Result<()>;

    /// Whether the page can still be used for further operations
    fn is_usable(&self) -> bool;

    /// Evaluate a script in the page and return its JSON value
    async fn evaluate(&self, script: &str) -> Result<serde_json::Value>;

    /// Release the page and anything opened for it
    async fn close(&mut self) -> Result<()>;
}

/// Creates a fresh, unopened session per scan.
pub trait PageSessionFactory: Send + Sync {
    /// Create a new session
    fn new_session(&self) -> Box<dyn PageSession>;
}

/// Helper to extract domain from URL
pub fn extract_domain(url: &str) -> Result<String> {
    let url = url::Url::parse(url)
        .map_err(|e| BrowserError::NavigationError(format!("Invalid URL: {}", e)))?;

    url.host_str()
        .ok_or_else(|| BrowserError::NavigationError("No host in URL".to_string()))
        .map(|s| s.to_string())
}
