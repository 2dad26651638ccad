//! Page scan orchestration.
//!
//! This module provides the `PageScanProcessor`, which runs one page scan:
//! it opens a browser page (remote first, local as fallback), runs the
//! accessibility scanner, optionally hands the page to the deep scanner, and
//! always releases the page before returning.

use crate::axe::{AccessibilityScanner, AxeScanResults, AxeScanner};
use crate::deep_scanner::{DeepScanner, LinkDeepScanner};
use crate::error::{Result, ScanError};
use pagescan_browser::{ChromiumPageFactory, LaunchTarget, PageSession, PageSessionFactory};
use pagescan_core::{
    AppConfig, BrowserLaunchMechanism, PageScanResult, ScanMetadata, DEFAULT_REMOTE_ENDPOINT,
};
use std::sync::Arc;

/// Orchestrates a single-page scan.
///
/// Every call to [`PageScanProcessor::scan`] uses its own page session, so one
/// processor can serve concurrent scans.
pub struct PageScanProcessor {
    /// Source of fresh page sessions
    pages: Arc<dyn PageSessionFactory>,
    /// Accessibility scanner run against every page
    axe_scanner: Arc<dyn AccessibilityScanner>,
    /// Scanner run when a deep scan is requested
    deep_scanner: Arc<dyn DeepScanner>,
    /// Remote browser tried before a local launch
    remote_endpoint: Option<String>,
}

impl PageScanProcessor {
    /// Create a new page scan processor.
    ///
    /// The remote endpoint defaults to [`DEFAULT_REMOTE_ENDPOINT`].
    #[must_use]
    pub fn new(
        pages: Arc<dyn PageSessionFactory>,
        axe_scanner: Arc<dyn AccessibilityScanner>,
        deep_scanner: Arc<dyn DeepScanner>,
    ) -> Self {
        Self {
            pages,
            axe_scanner,
            deep_scanner,
            remote_endpoint: Some(DEFAULT_REMOTE_ENDPOINT.to_string()),
        }
    }

    /// Build a processor backed by Chromium, axe-core and link discovery.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let pages = Arc::new(ChromiumPageFactory::new(config.browser.clone()));
        let axe_scanner = Arc::new(AxeScanner::from_config(&config.scanner)?);
        let deep_scanner = Arc::new(LinkDeepScanner::new(config.deep_scan.max_known_pages));

        Ok(Self::new(pages, axe_scanner, deep_scanner)
            .with_remote_endpoint(config.browser.remote_endpoint.clone()))
    }

    /// Set the remote browser endpoint (`None` always launches locally).
    #[must_use]
    pub fn with_remote_endpoint(mut self, endpoint: Option<String>) -> Self {
        self.remote_endpoint = endpoint;
        self
    }

    /// Scan one page.
    ///
    /// Returns the accessibility results tagged with the launch mechanism.
    /// Deep scan findings are recorded on `page_scan_result`. The page is
    /// closed exactly once if it was opened; close failures are logged and
    /// never change the outcome.
    pub async fn scan(
        &self,
        metadata: &ScanMetadata,
        page_scan_result: &mut PageScanResult,
    ) -> Result<AxeScanResults> {
        let mut page = self.pages.new_session();

        // Nothing to release until a browser is open.
        let mechanism = self.open_page(page.as_mut()).await?;

        let result = self
            .scan_open_page(page.as_mut(), mechanism, metadata, page_scan_result)
            .await;
        Self::close_page(page.as_mut()).await;

        result
    }

    /// Open the page on the remote browser, falling back to a local launch.
    async fn open_page(&self, page: &mut dyn PageSession) -> Result<BrowserLaunchMechanism> {
        if let Some(endpoint) = &self.remote_endpoint {
            let target = LaunchTarget::Remote {
                endpoint: endpoint.clone(),
            };
            match page.open(target).await {
                Ok(()) => return Ok(BrowserLaunchMechanism::Remote),
                Err(e) => {
                    tracing::error!(
                        endpoint = %endpoint,
                        error = %e,
                        "Could not connect to remote browser, falling back to local launch"
                    );
                }
            }
        }

        page.open(LaunchTarget::Local).await?;
        Ok(BrowserLaunchMechanism::Local)
    }

    async fn scan_open_page(
        &self,
        page: &mut dyn PageSession,
        mechanism: BrowserLaunchMechanism,
        metadata: &ScanMetadata,
        page_scan_result: &mut PageScanResult,
    ) -> Result<AxeScanResults> {
        page.navigate(metadata.url.as_str())
            .await
            .map_err(|source| ScanError::Navigation {
                url: metadata.url.to_string(),
                source,
            })?;

        let report = self.axe_scanner.scan(page).await?;
        let results = AxeScanResults {
            browser_launch_mechanism: mechanism,
            report,
        };
        tracing::info!(
            url = %metadata.url,
            mechanism = %mechanism,
            violations = results.report.results.violation_count(),
            "The axe scanner completed a page scan"
        );

        if metadata.deep_scan {
            if page.is_usable() {
                self.deep_scanner
                    .run_deep_scan(metadata, page_scan_result, page)
                    .await?;
                tracing::info!(url = %metadata.url, "The deep scanner completed a page scan");
            } else {
                tracing::error!(url = %metadata.url, "Page is not ready. Unable to perform deep scan");
            }
        }

        Ok(results)
    }

    async fn close_page(page: &mut dyn PageSession) {
        if let Err(e) = page.close().await {
            tracing::error!(error = %e, "An error occurred while closing web browser");
        }
    }
}
