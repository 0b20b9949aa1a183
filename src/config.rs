//! Configuration management for the application.
//!
//! This module handles loading and validating application configuration
//! in TOML format with platform-specific directory resolution.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::APP_NAME;
use crate::matcher::MatchOptions;

/// Path configuration for file system locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PathConfig {
    /// Data directory holding saved layouts (defaults to `<config dir>/data`)
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Keyword mapping JSON file (embedded table when unset)
    #[serde(default)]
    pub keyword_mappings: Option<PathBuf>,
    /// Template catalog JSON file (embedded catalog when unset)
    #[serde(default)]
    pub template_catalog: Option<PathBuf>,
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    3001
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Template search tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum number of templates returned by a keyword match
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Minimum token length in characters; shorter tokens are ignored
    #[serde(default = "default_min_token_chars")]
    pub min_token_chars: usize,
}

fn default_max_results() -> usize {
    MatchOptions::default().max_results
}

fn default_min_token_chars() -> usize {
    MatchOptions::default().min_token_chars
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            min_token_chars: default_min_token_chars(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// File system paths
    #[serde(default)]
    pub paths: PathConfig,
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Template search settings
    #[serde(default)]
    pub search: SearchConfig,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            paths: PathConfig::default(),
            server: ServerConfig::default(),
            search: SearchConfig::default(),
        }
    }

    /// Gets the platform-specific config directory path.
    ///
    /// - Linux: `~/.config/Pagesmith/`
    /// - macOS: `~/Library/Application Support/Pagesmith/`
    /// - Windows: `%APPDATA%\Pagesmith\`
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join(APP_NAME);

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Loads configuration from the platform config file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Loads configuration from `path`, or defaults if it doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .context(format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Validates configuration values.
    ///
    /// Checks:
    /// - `max_results` and `min_token_chars` are at least 1
    /// - configured keyword mapping and template catalog files exist
    pub fn validate(&self) -> Result<()> {
        if self.search.max_results == 0 {
            anyhow::bail!("search.max_results must be at least 1");
        }

        if self.search.min_token_chars == 0 {
            anyhow::bail!("search.min_token_chars must be at least 1");
        }

        if let Some(path) = &self.paths.keyword_mappings {
            if !path.is_file() {
                anyhow::bail!("Keyword mapping file does not exist: {}", path.display());
            }
        }

        if let Some(path) = &self.paths.template_catalog {
            if !path.is_file() {
                anyhow::bail!("Template catalog file does not exist: {}", path.display());
            }
        }

        Ok(())
    }

    /// Resolves the data directory.
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.paths.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::config_dir()?.join("data")),
        }
    }

    /// Matcher options derived from the search settings.
    #[must_use]
    pub const fn match_options(&self) -> MatchOptions {
        MatchOptions {
            max_results: self.search.max_results,
            min_token_chars: self.search.min_token_chars,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
