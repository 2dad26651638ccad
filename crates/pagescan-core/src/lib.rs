//! Pagescan Core - Foundation crate for the pagescan workspace.
//!
//! This crate provides shared types, error handling, and configuration
//! management that the browser and scanner crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Scan request and result types (`ScanUrl`, `ScanMetadata`, `PageScanResult`)
//!
//! # Example
//!
//! ```rust
//! use pagescan_core::{AppConfig, ScanMetadata, ScanUrl};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! config.validate()?;
//!
//! let metadata = ScanMetadata::new(ScanUrl::new("https://example.com")?, true);
//! assert!(metadata.deep_scan);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{
    AppConfig, BrowserConfig, DeepScanConfig, ScannerConfig, DEFAULT_REMOTE_ENDPOINT,
};
pub use error::{ConfigError, ConfigResult, PagescanError, Result};
pub use types::{BrowserLaunchMechanism, PageScanResult, ScanMetadata, ScanUrl};
