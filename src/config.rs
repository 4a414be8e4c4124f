//! Application configuration.
//!
//! Handles loading configuration from environment variables and .env files.

use dotenv::dotenv;
use std::env;
use std::path::PathBuf;

use crate::constants::pagination::DEFAULT_MAX_RESULTS;
use crate::error::Result;

/// Configuration for the application.
#[derive(Debug, Clone)]
pub struct Config {
    /// The application name
    app_name: String,
    /// The application version
    app_version: String,
    /// Directory holding corpus files to load at startup
    pub data_path: Option<PathBuf>,
    /// Version used when a query names none
    pub default_version: Option<String>,
    /// Default page size for verse queries
    pub max_results: usize,
}

impl Config {
    /// Get the application name.
    #[must_use]
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Get the application version.
    #[must_use]
    pub fn app_version(&self) -> &str {
        &self.app_version
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: env!("CARGO_PKG_NAME").to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            data_path: None,
            default_version: None,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    #[allow(clippy::unnecessary_wraps)] // Returns Result for forward-compatible API
    pub fn load() -> Result<Self> {
        // Try to load .env file if present
        dotenv().ok();

        let mut config = Self::default();

        // Corpus directory: env var override, or the platform data dir
        config.data_path = env::var("SCRIPTURA_DATA_PATH").ok().map_or_else(
            || {
                dirs::data_dir()
                    .map(|d| d.join("scriptura"))
                    .filter(|p| p.is_dir())
            },
            |path| {
                let p = PathBuf::from(shellexpand::tilde(&path).to_string());
                p.is_dir().then_some(p)
            },
        );

        if let Ok(version) = env::var("SCRIPTURA_DEFAULT_VERSION") {
            if !version.trim().is_empty() {
                config.default_version = Some(version.trim().to_uppercase());
            }
        }

        if let Ok(max) = env::var("SCRIPTURA_MAX_RESULTS") {
            if let Ok(max) = max.parse::<usize>() {
                config.max_results = max;
            }
        }

        Ok(config)
    }

    /// Check if a corpus directory is configured and present.
    pub fn has_data_path(&self) -> bool {
        self.data_path.is_some()
    }
}
