//! Configuration loading for redmine-mcp
//!
//! Configuration is loaded from:
//! 1. Environment variables (`REDMINE_URL`, `REDMINE_API_KEY`, ...), highest priority
//! 2. The file named by `REDMINE_CONFIG_PATH`
//! 3. `~/.binks/redmine.toml`
//! 4. Default values
//!
//! The result is validated once at startup and never changes afterwards.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::redmine::RedmineError;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub redmine: RedmineConfig,
}

/// Connection settings for one Redmine instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedmineConfig {
    /// Base URL, e.g. `https://redmine.example.com`
    #[serde(default)]
    pub url: String,
    /// REST API key, sent as `X-Redmine-API-Key`
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Set to false to accept self-signed certificates
    #[serde(default = "default_true")]
    pub verify_tls: bool,
    /// Project used by `create_issue` when the call names none
    #[serde(default)]
    pub default_project_id: Option<u64>,
}

fn default_timeout() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

impl Default for RedmineConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            timeout_seconds: default_timeout(),
            verify_tls: default_true(),
            default_project_id: None,
        }
    }
}

impl RedmineConfig {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn with_default_project(mut self, project_id: u64) -> Self {
        self.default_project_id = Some(project_id);
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    /// Check that the settings can produce a working client
    pub fn validate(&self) -> Result<(), RedmineError> {
        if self.url.trim().is_empty() {
            return Err(RedmineError::Config(
                "Redmine URL is not set (REDMINE_URL)".to_string(),
            ));
        }
        let parsed = url::Url::parse(self.base_url())
            .map_err(|e| RedmineError::Config(format!("invalid Redmine URL '{}': {}", self.url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(RedmineError::Config(format!(
                "Redmine URL must be http or https, got '{}'",
                parsed.scheme()
            )));
        }
        if self.api_key.trim().is_empty() {
            return Err(RedmineError::Config(
                "Redmine API key is not set (REDMINE_API_KEY)".to_string(),
            ));
        }
        if self.timeout_seconds == 0 {
            return Err(RedmineError::Config(
                "timeout_seconds must be greater than zero".to_string(),
            ));
        }
        if self.default_project_id == Some(0) {
            return Err(RedmineError::Config(
                "default_project_id must be a positive integer".to_string(),
            ));
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from file and environment, then validate it
    pub fn load() -> Result<Self> {
        let mut config = match Self::find_config_path() {
            Some(path) if path.exists() => {
                tracing::info!("Loading config from: {}", path.display());
                let content = std::fs::read_to_string(&path)?;
                toml::from_str(&content)?
            }
            Some(path) => {
                tracing::info!("Config file {} not found, using defaults", path.display());
                Self::default()
            }
            None => {
                tracing::info!("No config path specified, using defaults");
                Self::default()
            }
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.redmine.validate()?;
        Ok(config)
    }

    /// Overlay environment values read through `lookup`
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = lookup("REDMINE_URL") {
            self.redmine.url = url;
        }
        if let Some(key) = lookup("REDMINE_API_KEY") {
            self.redmine.api_key = key;
        }
        if let Some(secs) = lookup("REDMINE_TIMEOUT_SECS") {
            self.redmine.timeout_seconds = secs
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("REDMINE_TIMEOUT_SECS='{}': {}", secs, e))?;
        }
        if let Some(flag) = lookup("REDMINE_INSECURE_TLS") {
            if matches!(flag.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes") {
                self.redmine.verify_tls = false;
            }
        }
        if let Some(id) = lookup("REDMINE_DEFAULT_PROJECT_ID") {
            let id = id.trim();
            if !id.is_empty() {
                self.redmine.default_project_id = Some(id.parse().map_err(|e| {
                    anyhow::anyhow!("REDMINE_DEFAULT_PROJECT_ID='{}': {}", id, e)
                })?);
            }
        }
        Ok(())
    }

    fn find_config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("REDMINE_CONFIG_PATH") {
            return Some(PathBuf::from(path));
        }

        if let Ok(home) = std::env::var("HOME") {
            return Some(PathBuf::from(home).join(".binks").join("redmine.toml"));
        }

        None
    }
}
