use async_trait::async_trait;
use pagescan_browser::{LaunchTarget, PageSession};
use pagescan_core::{PageScanResult, ScanMetadata, ScanUrl};
use pagescan_scanner::{DeepScanner, LinkDeepScanner, ScanError};

/// Page whose every evaluation returns the same value.
struct LinkPage {
    value: serde_json::Value,
}

#[async_trait]
impl PageSession for LinkPage {
    async fn open(&mut self, _target: LaunchTarget) -> pagescan_browser::Result<()> {
        Ok(())
    }

    async fn navigate(&mut self, _url: &str) -> pagescan_browser::Result<()> {
        Ok(())
    }

    fn is_usable(&self) -> bool {
        true
    }

    async fn evaluate(&self, _script: &str) -> pagescan_browser::Result<serde_json::Value> {
        Ok(self.value.clone())
    }

    async fn close(&mut self) -> pagescan_browser::Result<()> {
        Ok(())
    }
}

fn metadata() -> ScanMetadata {
    ScanMetadata {
        id: "scan-1".to_string(),
        url: ScanUrl::new("https://example.com/start").expect("valid url"),
        deep_scan: true,
        deep_scan_id: None,
    }
}

#[tokio::test]
async fn test_records_same_host_links() {
    let page = LinkPage {
        value: serde_json::json!([
            "https://example.com/start",
            "https://example.com/docs#install",
            "https://cdn.example.net/app.js",
            "https://example.com/docs",
            42
        ]),
    };
    let metadata = metadata();
    let mut record = PageScanResult::for_scan(&metadata)
        .with_known_pages(vec!["https://example.com/start".to_string()]);

    LinkDeepScanner::new(10)
        .run_deep_scan(&metadata, &mut record, &page)
        .await
        .expect("deep scan");

    assert_eq!(
        record.known_pages,
        vec![
            "https://example.com/start".to_string(),
            "https://example.com/docs".to_string(),
        ]
    );
    assert_eq!(record.deep_scan_id.as_deref(), Some("scan-1"));
}

#[tokio::test]
async fn test_keeps_existing_deep_scan_id() {
    let page = LinkPage {
        value: serde_json::json!([]),
    };
    let metadata = metadata();
    let mut record = PageScanResult::for_scan(&metadata);
    record.deep_scan_id = Some("deep-7".to_string());

    LinkDeepScanner::new(10)
        .run_deep_scan(&metadata, &mut record, &page)
        .await
        .expect("deep scan");

    assert_eq!(record.deep_scan_id.as_deref(), Some("deep-7"));
    assert!(record.known_pages.is_empty());
}

#[tokio::test]
async fn test_rejects_non_list_result() {
    let page = LinkPage {
        value: serde_json::Value::Null,
    };
    let metadata = metadata();
    let mut record = PageScanResult::for_scan(&metadata);

    let result = LinkDeepScanner::new(10)
        .run_deep_scan(&metadata, &mut record, &page)
        .await;

    assert!(matches!(result, Err(ScanError::DeepScan(_))));
}
