//! Deep scan support.
//!
//! A deep scan extends a single page scan into a crawl of the site. Its
//! findings are recorded on the caller's [`PageScanResult`], not returned.

use crate::error::{Result, ScanError};
use async_trait::async_trait;
use pagescan_browser::{extract_domain, PageSession};
use pagescan_core::{PageScanResult, ScanMetadata};
use std::collections::HashSet;
use url::Url;

/// Collects every link target on the page, resolved to absolute URLs.
const LINKS_SCRIPT: &str = "Array.from(document.querySelectorAll('a[href]'), (a) => a.href)";

/// Runs a multi-page scan starting from an open page.
#[async_trait]
pub trait DeepScanner: Send + Sync {
    /// Record deep scan findings for the page on `page_scan_result`.
    async fn run_deep_scan(
        &self,
        metadata: &ScanMetadata,
        page_scan_result: &mut PageScanResult,
        page: &dyn PageSession,
    ) -> Result<()>;
}

/// Deep scanner that discovers same-host pages from the current page's links.
#[derive(Debug, Clone)]
pub struct LinkDeepScanner {
    max_known_pages: usize,
}

impl LinkDeepScanner {
    /// Create a deep scanner that stops recording pages at `max_known_pages`.
    #[must_use]
    pub fn new(max_known_pages: usize) -> Self {
        Self { max_known_pages }
    }
}

#[async_trait]
impl DeepScanner for LinkDeepScanner {
    async fn run_deep_scan(
        &self,
        metadata: &ScanMetadata,
        page_scan_result: &mut PageScanResult,
        page: &dyn PageSession,
    ) -> Result<()> {
        let host = extract_domain(metadata.url.as_str())?;

        let links = match page.evaluate(LINKS_SCRIPT).await? {
            serde_json::Value::Array(items) => items
                .into_iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect::<Vec<_>>(),
            other => {
                return Err(ScanError::DeepScan(format!(
                    "expected a list of links, got {other}"
                )))
            }
        };

        page_scan_result.deep_scan_id.get_or_insert_with(|| {
            metadata
                .deep_scan_id
                .clone()
                .unwrap_or_else(|| metadata.id.clone())
        });

        let added = merge_known_pages(
            &mut page_scan_result.known_pages,
            &links,
            &host,
            self.max_known_pages,
        );

        tracing::info!(
            url = %metadata.url,
            discovered = links.len(),
            added,
            known = page_scan_result.known_pages.len(),
            "Deep scan recorded known pages"
        );

        Ok(())
    }
}

/// Append same-host http(s) links not already known, up to `max_known_pages`.
///
/// Fragments are dropped before comparison. Returns how many pages were added.
fn merge_known_pages(
    known_pages: &mut Vec<String>,
    links: &[String],
    host: &str,
    max_known_pages: usize,
) -> usize {
    let mut seen: HashSet<String> = known_pages.iter().cloned().collect();
    let mut added = 0;

    for link in links {
        if known_pages.len() >= max_known_pages {
            break;
        }

        let Ok(mut url) = Url::parse(link) else {
            continue;
        };
        if !matches!(url.scheme(), "http" | "https") || url.host_str() != Some(host) {
            continue;
        }
        url.set_fragment(None);

        let page = String::from(url);
        if seen.insert(page.clone()) {
            known_pages.push(page);
            added += 1;
        }
    }

    added
}
