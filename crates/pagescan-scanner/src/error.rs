use pagescan_browser::BrowserError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Navigation to {url} failed: {source}")]
    Navigation {
        url: String,
        #[source]
        source: BrowserError,
    },

    #[error("axe-core script unavailable at {path}: {reason}")]
    AxeScriptUnavailable { path: String, reason: String },

    #[error("Accessibility scan failed: {0}")]
    Axe(String),

    #[error("Invalid axe results: {0}")]
    InvalidResults(#[from] serde_json::Error),

    #[error("Deep scan failed: {0}")]
    DeepScan(String),

    #[error("Browser error: {0}")]
    Browser(#[from] BrowserError),
}

pub type Result<T> = std::result::Result<T, ScanError>;
