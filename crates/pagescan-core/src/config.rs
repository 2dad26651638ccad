//! Configuration management for pagescan.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Remote browser endpoint used when none is configured.
pub const DEFAULT_REMOTE_ENDPOINT: &str = "ws://host.docker.internal:8585";

/// Main application configuration.
///
/// This is loaded from `~/.config/pagescan/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Browser session settings
    pub browser: BrowserConfig,
    /// Accessibility scanner settings
    pub scanner: ScannerConfig,
    /// Deep scan settings
    pub deep_scan: DeepScanConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit path.
    ///
    /// Unlike [`AppConfig::load`], a missing file is an error.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            });
        }

        tracing::debug!("Loading config from {}", path.display());
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `PAGESCAN_REMOTE_ENDPOINT`: Override the remote browser endpoint (empty disables it)
    /// - `PAGESCAN_HEADLESS`: Override browser headless mode (true/false)
    /// - `PAGESCAN_AXE_SCRIPT`: Override the axe-core script path
    /// - `PAGESCAN_MAX_KNOWN_PAGES`: Override the deep scan page cap
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_env();
        Ok(config)
    }

    /// Apply environment variable overrides to this configuration.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("PAGESCAN_REMOTE_ENDPOINT") {
            let val = val.trim();
            self.browser.remote_endpoint = if val.is_empty() {
                None
            } else {
                Some(val.to_string())
            };
            tracing::debug!(
                "Override browser.remote_endpoint from env: {:?}",
                self.browser.remote_endpoint
            );
        }

        if let Some(val) = lookup("PAGESCAN_HEADLESS") {
            if let Ok(headless) = val.parse() {
                self.browser.headless = headless;
                tracing::debug!("Override browser.headless from env: {}", headless);
            }
        }

        if let Some(val) = lookup("PAGESCAN_AXE_SCRIPT") {
            self.scanner.axe_script_path = Some(PathBuf::from(val));
            tracing::debug!("Override scanner.axe_script_path from env");
        }

        if let Some(val) = lookup("PAGESCAN_MAX_KNOWN_PAGES") {
            if let Ok(max) = val.parse() {
                self.deep_scan.max_known_pages = max;
                tracing::debug!("Override deep_scan.max_known_pages from env: {}", max);
            }
        }
    }

    /// Check values that would only fail later, at browser launch time.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.browser.navigation_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "browser.navigation_timeout_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.browser.window_width == 0 || self.browser.window_height == 0 {
            return Err(ConfigError::InvalidValue {
                field: "browser.window_width/window_height".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        if let Some(endpoint) = &self.browser.remote_endpoint {
            let parsed = url::Url::parse(endpoint).map_err(|e| ConfigError::InvalidValue {
                field: "browser.remote_endpoint".to_string(),
                reason: e.to_string(),
            })?;
            if !matches!(parsed.scheme(), "ws" | "wss" | "http" | "https") {
                return Err(ConfigError::InvalidValue {
                    field: "browser.remote_endpoint".to_string(),
                    reason: format!("unsupported scheme '{}'", parsed.scheme()),
                });
            }
        }

        Ok(())
    }

    /// Save configuration to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> ConfigResult<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to an explicit path.
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        let config_dir = path.parent().ok_or_else(|| ConfigError::InvalidValue {
            field: "config_path".to_string(),
            reason: "no parent directory".to_string(),
        })?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving config to {}", path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/pagescan/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("com", "pagescan", "pagescan").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Browser session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Remote browser endpoint tried before launching locally (`None` = always local)
    pub remote_endpoint: Option<String>,
    /// Run a locally launched browser in headless mode
    pub headless: bool,
    /// Launch the local browser with `--no-sandbox`
    pub no_sandbox: bool,
    /// Browser window width
    pub window_width: u32,
    /// Browser window height
    pub window_height: u32,
    /// Navigation timeout in seconds
    pub navigation_timeout_secs: u64,
    /// Chrome/Chromium executable for local launch (auto-detected when unset)
    pub executable_path: Option<PathBuf>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            remote_endpoint: Some(DEFAULT_REMOTE_ENDPOINT.to_string()),
            headless: true,
            no_sandbox: true,
            window_width: 1920,
            window_height: 1080,
            navigation_timeout_secs: 30,
            executable_path: None,
        }
    }
}

/// Accessibility scanner settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Path to the axe-core script (`axe.min.js`)
    pub axe_script_path: Option<PathBuf>,
    /// Restrict the run to rules carrying these tags (empty = all rules)
    pub rule_tags: Vec<String>,
}

/// Deep scan settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeepScanConfig {
    /// Maximum number of pages a deep scan may know about
    pub max_known_pages: usize,
}

impl Default for DeepScanConfig {
    fn default() -> Self {
        Self {
            max_known_pages: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(
            config.browser.remote_endpoint.as_deref(),
            Some(DEFAULT_REMOTE_ENDPOINT)
        );
        assert!(config.browser.headless);
        assert_eq!(config.browser.navigation_timeout_secs, 30);
        assert!(config.scanner.axe_script_path.is_none());
        assert_eq!(config.deep_scan.max_known_pages, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("[browser]"));
        assert!(toml_str.contains("[deep_scan]"));

        let parsed: AppConfig = toml::from_str(&toml_str).expect("parse serialized config");
        assert_eq!(parsed.browser.remote_endpoint, config.browser.remote_endpoint);
    }

    #[test]
    fn test_config_save_load() {
        let tmp = TempDir::new().expect("create temp dir");
        let config_path = tmp.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.browser.headless = false;
        config.scanner.rule_tags = vec!["wcag2a".to_string()];

        config.save_to(&config_path).expect("save config");
        let loaded = AppConfig::load_from(&config_path).expect("load config");

        assert!(!loaded.browser.headless);
        assert_eq!(loaded.scanner.rule_tags, vec!["wcag2a".to_string()]);
    }

    #[test]
    fn test_load_from_missing_file() {
        let tmp = TempDir::new().expect("create temp dir");
        let result = AppConfig::load_from(&tmp.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound { .. })));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("PAGESCAN_REMOTE_ENDPOINT", "ws://browsers:9222"),
            ("PAGESCAN_HEADLESS", "false"),
            ("PAGESCAN_AXE_SCRIPT", "/opt/axe/axe.min.js"),
            ("PAGESCAN_MAX_KNOWN_PAGES", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_overrides(|key| vars.get(key).map(ToString::to_string));

        assert_eq!(
            config.browser.remote_endpoint.as_deref(),
            Some("ws://browsers:9222")
        );
        assert!(!config.browser.headless);
        assert_eq!(
            config.scanner.axe_script_path,
            Some(PathBuf::from("/opt/axe/axe.min.js"))
        );
        // Unparsable values leave the default in place
        assert_eq!(config.deep_scan.max_known_pages, 100);
    }

    #[test]
    fn test_empty_remote_endpoint_disables_remote() {
        let mut config = AppConfig::default();
        config.apply_overrides(|key| (key == "PAGESCAN_REMOTE_ENDPOINT").then(String::new));
        assert!(config.browser.remote_endpoint.is_none());
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[browser]
headless = false

[deep_scan]
max_known_pages = 5
"#;

        let config: AppConfig = toml::from_str(toml_str).expect("parse partial config");
        assert!(!config.browser.headless);
        assert_eq!(config.deep_scan.max_known_pages, 5);
        // These should be defaults
        assert_eq!(config.browser.window_width, 1920);
        assert_eq!(
            config.browser.remote_endpoint.as_deref(),
            Some(DEFAULT_REMOTE_ENDPOINT)
        );
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.browser.navigation_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.browser.window_height = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.browser.remote_endpoint = Some("ftp://browsers".to_string());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));

        let mut config = AppConfig::default();
        config.browser.remote_endpoint = Some("not a url".to_string());
        assert!(config.validate().is_err());
    }
}
