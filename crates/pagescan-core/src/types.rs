//! Shared types used across pagescan.
//!
//! This module defines the scan request, the caller-owned scan record that
//! deep scans update, and the tag recording how the browser was obtained.

use crate::error::PagescanError;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Newtype for a scan target URL with validation.
///
/// Scan URLs must be absolute `http` or `https` URLs with a host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ScanUrl {
    raw: String,
    parsed: Url,
}

impl ScanUrl {
    /// Create a new `ScanUrl` from a string.
    ///
    /// # Errors
    /// Returns error if the URL is empty, unparsable, not http(s), or has no host.
    pub fn new(url: impl Into<String>) -> Result<Self, PagescanError> {
        let raw = url.into();
        let parsed = Self::validate(&raw)?;
        Ok(Self { raw, parsed })
    }

    /// Get the URL exactly as the caller supplied it.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Get the parsed form of the URL.
    #[must_use]
    pub fn as_url(&self) -> &Url {
        &self.parsed
    }

    fn validate(url: &str) -> Result<Url, PagescanError> {
        if url.trim().is_empty() {
            return Err(PagescanError::Validation(
                "scan URL must not be empty".to_string(),
            ));
        }

        let parsed = Url::parse(url)
            .map_err(|e| PagescanError::Validation(format!("invalid scan URL '{url}': {e}")))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(PagescanError::Validation(format!(
                "invalid scan URL '{url}': scheme must be http or https"
            )));
        }

        if parsed.host_str().is_none() {
            return Err(PagescanError::Validation(format!(
                "invalid scan URL '{url}': missing host"
            )));
        }

        Ok(parsed)
    }
}

impl fmt::Display for ScanUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl TryFrom<String> for ScanUrl {
    type Error = PagescanError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ScanUrl> for String {
    fn from(url: ScanUrl) -> Self {
        url.raw
    }
}

/// Request metadata for one page scan.
///
/// Created by the caller per invocation and never mutated by the scanner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanMetadata {
    /// Scan identifier
    pub id: String,
    /// Page to scan
    pub url: ScanUrl,
    /// Whether a multi-page deep scan should follow the page scan
    pub deep_scan: bool,
    /// Identifier of the deep scan this page belongs to, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deep_scan_id: Option<String>,
}

impl ScanMetadata {
    /// Create scan metadata with a fresh random id.
    #[must_use]
    pub fn new(url: ScanUrl, deep_scan: bool) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            url,
            deep_scan,
            deep_scan_id: None,
        }
    }

    /// Set the deep scan identifier.
    #[must_use]
    pub fn with_deep_scan_id(mut self, deep_scan_id: impl Into<String>) -> Self {
        self.deep_scan_id = Some(deep_scan_id.into());
        self
    }
}

/// Caller-owned record of the scan being updated.
///
/// The page scan orchestrator passes this through untouched; deep scanners
/// record their findings on it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageScanResult {
    /// Scan identifier
    pub id: String,
    /// Page the record describes
    pub url: String,
    /// Deep scan this record belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deep_scan_id: Option<String>,
    /// Pages known to the deep scan, in discovery order
    #[serde(default)]
    pub known_pages: Vec<String>,
}

impl PageScanResult {
    /// Create a scan record for the given request.
    #[must_use]
    pub fn for_scan(metadata: &ScanMetadata) -> Self {
        Self {
            id: metadata.id.clone(),
            url: metadata.url.to_string(),
            deep_scan_id: metadata.deep_scan_id.clone(),
            known_pages: Vec::new(),
        }
    }

    /// Seed the record with pages already known to the deep scan.
    #[must_use]
    pub fn with_known_pages(mut self, pages: impl IntoIterator<Item = String>) -> Self {
        self.known_pages.extend(pages);
        self
    }
}

/// How the browser page for a scan was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserLaunchMechanism {
    /// Connected to the remote browser endpoint
    Remote,
    /// Launched a browser on this machine
    Local,
}

impl fmt::Display for BrowserLaunchMechanism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote => write!(f, "remote"),
            Self::Local => write!(f, "local"),
        }
    }
}
