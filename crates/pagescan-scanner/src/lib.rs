//! Pagescan Scanner - single-page accessibility scan orchestration.
//!
//! This crate runs one accessibility scan of one page. It coordinates a
//! browser page session, the axe-core scanner and an optional deep scan,
//! and guarantees the page session is released whatever happens.
//!
//! # Features
//!
//! - Remote browser first, local launch as fallback
//! - axe-core results tagged with the launch mechanism that served them
//! - Deep scan gated on the request flag and page liveness
//! - Page close failures logged, never reported as the scan outcome
//!
//! # Example
//!
//! ```rust,ignore
//! use pagescan_core::{AppConfig, PageScanResult, ScanMetadata, ScanUrl};
//! use pagescan_scanner::PageScanProcessor;
//!
//! let config = AppConfig::load_with_env()?;
//! let processor = PageScanProcessor::from_config(&config)?;
//!
//! let metadata = ScanMetadata::new(ScanUrl::new("https://example.com")?, true);
//! let mut record = PageScanResult::for_scan(&metadata);
//! let results = processor.scan(&metadata, &mut record).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod axe;
pub mod deep_scanner;
#[allow(missing_docs)]
pub mod error;
pub mod orchestrator;

// Re-export commonly used types
pub use axe::{
    AccessibilityScanner, AxeNode, AxeResults, AxeRuleResult, AxeScanReport, AxeScanResults,
    AxeScanner, TestEngine,
};
pub use deep_scanner::{DeepScanner, LinkDeepScanner};
pub use error::{Result, ScanError};
pub use orchestrator::PageScanProcessor;
