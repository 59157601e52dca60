//! Configuration management for nbshare
//!
//! This module handles loading, parsing, and validation of configuration files.

use crate::constants::{
    CONFIG_GENERATED, DEFAULT_REFRESH_INTERVAL, DEFAULT_REFRESH_MAX, SIDEBAR_DEFAULT_WIDTH, SIDEBAR_MAX_WIDTH,
    SIDEBAR_MIN_WIDTH, TOAST_DISMISS_DELAY,
};
use crate::sync::poll::{PollConfig, Standby};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub polling: PollingConfig,
    pub toast: ToastConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

/// Sharing service connection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the sharing REST API
    pub base_url: String,
    /// Environment variable holding the API token
    pub api_token_env: String,
}

/// Shared notebooks list refresh
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Refresh interval in seconds
    pub interval_seconds: u64,
    /// Upper bound of the interval when backing off, in seconds
    pub max_seconds: u64,
    /// Grow the interval after failed or unchanged refreshes
    pub backoff: bool,
    /// Options: "when-hidden", "never"
    pub standby: Standby,
}

/// Progress toast behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToastConfig {
    /// Time a success/failure message stays visible, in milliseconds
    pub dismiss_delay_ms: u64,
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Sidebar width in columns
    pub sidebar_width: u16,
    /// Enable mouse support
    pub mouse_enabled: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// Write logs to a file in addition to the in-app log view
    pub enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8888/jupyter_sharing".to_string(),
            api_token_env: "NBSHARE_API_TOKEN".to_string(),
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_seconds: DEFAULT_REFRESH_INTERVAL.as_secs(),
            max_seconds: DEFAULT_REFRESH_MAX.as_secs(),
            backoff: true,
            standby: Standby::WhenHidden,
        }
    }
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            dismiss_delay_ms: TOAST_DISMISS_DELAY.as_millis() as u64,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            sidebar_width: SIDEBAR_DEFAULT_WIDTH,
            mouse_enabled: false,
        }
    }
}

impl PollingConfig {
    /// Scheduler settings derived from this section
    pub fn to_poll_config(&self) -> PollConfig {
        PollConfig {
            interval: Duration::from_secs(self.interval_seconds),
            max: Duration::from_secs(self.max_seconds),
            backoff: self.backoff,
            standby: self.standby,
        }
    }
}

impl ToastConfig {
    pub fn dismiss_delay(&self) -> Duration {
        Duration::from_millis(self.dismiss_delay_ms)
    }
}

impl ServerConfig {
    /// Read the API token from the configured environment variable
    pub fn api_token(&self) -> Option<String> {
        std::env::var(&self.api_token_env).ok().filter(|token| !token.is_empty())
    }
}

impl Config {
    /// Load configuration from file or return defaults
    pub fn load() -> Result<Self> {
        let config_path = Self::find_config_file()?;

        if let Some(path) = config_path {
            Self::load_from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Find configuration file in order of precedence
    fn find_config_file() -> Result<Option<PathBuf>> {
        // 1. Check current directory
        let current_dir_config = PathBuf::from("nbshare.toml");
        if current_dir_config.exists() {
            return Ok(Some(current_dir_config));
        }

        // 2. Check XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("nbshare").join("config.toml");
            if xdg_config.exists() {
                return Ok(Some(xdg_config));
            }
        }

        Ok(None)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.server.base_url.trim().is_empty() {
            anyhow::bail!("server.base_url cannot be empty");
        }
        if self.server.api_token_env.trim().is_empty() {
            anyhow::bail!("server.api_token_env cannot be empty");
        }

        if self.polling.interval_seconds == 0 {
            anyhow::bail!("polling.interval_seconds must be greater than 0");
        }
        if self.polling.interval_seconds > 86_400 {
            anyhow::bail!("polling.interval_seconds cannot exceed 86400 (24 hours)");
        }
        if self.polling.max_seconds < self.polling.interval_seconds {
            anyhow::bail!(
                "polling.max_seconds ({}) cannot be lower than polling.interval_seconds ({})",
                self.polling.max_seconds,
                self.polling.interval_seconds
            );
        }

        if self.toast.dismiss_delay_ms > 60_000 {
            anyhow::bail!("toast.dismiss_delay_ms cannot exceed 60000");
        }

        if self.ui.sidebar_width < SIDEBAR_MIN_WIDTH || self.ui.sidebar_width > SIDEBAR_MAX_WIDTH {
            anyhow::bail!(
                "sidebar_width must be between {} and {} columns, got {}",
                SIDEBAR_MIN_WIDTH,
                SIDEBAR_MAX_WIDTH,
                self.ui.sidebar_width
            );
        }

        Ok(())
    }

    /// Generate default configuration file
    pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
        let config = Self::default();
        let toml_content = toml::to_string_pretty(&config).context("Failed to serialize default config")?;

        let header = format!(
            "# nbshare Configuration File\n# Generated on {}\n\n",
            chrono::Local::now().format("%Y-%m-%d")
        );

        let full_content = header + &toml_content;

        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        std::fs::write(&path, full_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        println!("{}: {}", CONFIG_GENERATED, path.as_ref().display());
        Ok(())
    }

    /// Get the XDG config directory path
    pub fn get_xdg_config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
            .map(|dir| dir.join("nbshare"))
    }

    /// Get the default config file path
    pub fn get_default_config_path() -> Result<PathBuf> {
        Ok(Self::get_xdg_config_dir()?.join("config.toml"))
    }
}
