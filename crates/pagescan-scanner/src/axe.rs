//! Accessibility scanning with axe-core.
//!
//! The [`AccessibilityScanner`] trait is the seam the page scan processor
//! drives; [`AxeScanner`] implements it by injecting axe-core into the page
//! and running it against the loaded document.

use crate::error::{Result, ScanError};
use async_trait::async_trait;
use pagescan_browser::PageSession;
use pagescan_core::{BrowserLaunchMechanism, ScannerConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Produces an accessibility report for the page currently loaded in a session.
#[async_trait]
pub trait AccessibilityScanner: Send + Sync {
    /// Scan the open, navigated page.
    async fn scan(&self, page: &dyn PageSession) -> Result<AxeScanReport>;
}

/// Name and version of the rule engine that produced a result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestEngine {
    /// Engine name
    pub name: String,
    /// Engine version
    pub version: String,
}

/// One DOM node matched by a rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AxeNode {
    /// Outer HTML of the node
    pub html: String,
    /// Selector path to the node (may cross frames and shadow roots)
    pub target: Vec<serde_json::Value>,
    /// Impact of the failure on this node
    pub impact: Option<String>,
    /// Human readable summary of what failed
    pub failure_summary: Option<String>,
}

/// Outcome of one rule across the page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AxeRuleResult {
    /// Rule identifier
    pub id: String,
    /// Highest impact among the matched nodes
    pub impact: Option<String>,
    /// Rule tags, e.g. `wcag2a`
    pub tags: Vec<String>,
    /// Rule description
    pub description: String,
    /// Short help text
    pub help: String,
    /// Link to the rule documentation
    pub help_url: String,
    /// Matched nodes
    pub nodes: Vec<AxeNode>,
}

/// Raw axe-core results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AxeResults {
    /// Engine that produced the results
    pub test_engine: Option<TestEngine>,
    /// Page URL as seen by axe
    pub url: String,
    /// When the run finished
    pub timestamp: String,
    /// Rules that failed
    pub violations: Vec<AxeRuleResult>,
    /// Rules that passed
    pub passes: Vec<AxeRuleResult>,
    /// Rules needing manual review
    pub incomplete: Vec<AxeRuleResult>,
    /// Rules that matched nothing on the page
    pub inapplicable: Vec<AxeRuleResult>,
}

impl AxeResults {
    /// Number of nodes failing any rule.
    #[must_use]
    pub fn violation_count(&self) -> usize {
        self.violations.iter().map(|rule| rule.nodes.len()).sum()
    }
}

/// Accessibility report for one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxeScanReport {
    /// axe-core results
    pub results: AxeResults,
    /// Document title at scan time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_title: Option<String>,
    /// URL of the page after navigation (redirects applied)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scanned_url: Option<String>,
}

/// Accessibility report tagged with how the browser was obtained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxeScanResults {
    /// Whether the page came from the remote browser or a local launch
    pub browser_launch_mechanism: BrowserLaunchMechanism,
    /// The scanner's report
    #[serde(flatten)]
    pub report: AxeScanReport,
}

/// Runs axe-core inside the page.
pub struct AxeScanner {
    script: String,
    rule_tags: Vec<String>,
}

impl AxeScanner {
    /// Create a scanner from axe-core script source.
    #[must_use]
    pub fn new(script: impl Into<String>) -> Self {
        Self {
            script: script.into(),
            rule_tags: Vec::new(),
        }
    }

    /// Load the axe-core script from a file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let script =
            std::fs::read_to_string(path).map_err(|e| ScanError::AxeScriptUnavailable {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        if script.trim().is_empty() {
            return Err(ScanError::AxeScriptUnavailable {
                path: path.display().to_string(),
                reason: "file is empty".to_string(),
            });
        }

        Ok(Self::new(script))
    }

    /// Build a scanner from configuration.
    pub fn from_config(config: &ScannerConfig) -> Result<Self> {
        let path = config
            .axe_script_path
            .as_deref()
            .ok_or_else(|| ScanError::AxeScriptUnavailable {
                path: "<unset>".to_string(),
                reason: "scanner.axe_script_path is not configured".to_string(),
            })?;

        Ok(Self::from_file(path)?.with_rule_tags(config.rule_tags.clone()))
    }

    /// Restrict the run to rules with these tags.
    #[must_use]
    pub fn with_rule_tags(mut self, tags: Vec<String>) -> Self {
        self.rule_tags = tags;
        self
    }

    /// Expression that runs axe and resolves to its results.
    fn run_expression(&self) -> Result<String> {
        let options = if self.rule_tags.is_empty() {
            serde_json::json!({})
        } else {
            serde_json::json!({ "runOnly": { "type": "tag", "values": self.rule_tags } })
        };
        Ok(format!(
            "axe.run(document, {})",
            serde_json::to_string(&options)?
        ))
    }

    async fn ensure_injected(&self, page: &dyn PageSession) -> Result<()> {
        let loaded = page.evaluate("typeof window.axe === 'object'").await?;
        if loaded.as_bool() != Some(true) {
            tracing::debug!("Injecting axe-core into page");
            page.evaluate(&self.script).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl AccessibilityScanner for AxeScanner {
    async fn scan(&self, page: &dyn PageSession) -> Result<AxeScanReport> {
        self.ensure_injected(page).await?;

        let raw = page.evaluate(&self.run_expression()?).await?;
        if raw.is_null() {
            return Err(ScanError::Axe("axe.run returned no results".to_string()));
        }
        let results: AxeResults = serde_json::from_value(raw)?;

        let page_title = page
            .evaluate("document.title")
            .await?
            .as_str()
            .map(str::to_string);
        let scanned_url = page
            .evaluate("window.location.href")
            .await?
            .as_str()
            .map(str::to_string);

        Ok(AxeScanReport {
            results,
            page_title,
            scanned_url,
        })
    }
}
