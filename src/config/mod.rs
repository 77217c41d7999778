//! Configuration module for pipeview
//!
//! This module handles the application configuration: the streaming
//! endpoint, transport tuning, and an optional initial pipeline applied at
//! startup. Configuration lives in a TOML file; every field has a default
//! so a missing or partial file still yields a working setup.
//!
//! # Config Location
//!
//! The default config file is `pipeview.toml` in the platform-appropriate
//! data directory:
//!
//! - **Linux**: `~/.local/share/pipeview/`
//! - **macOS**: `~/Library/Application Support/pipeview/`
//! - **Windows**: `%APPDATA%\pipeview\`
//!
//! An explicit path can be passed to [`AppConfig::load`] instead.

use crate::error::{PipeViewError, Result, ResultExt};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application identifier for data directories
pub const APP_ID: &str = "pipeview";

/// Config filename
pub const CONFIG_FILE: &str = "pipeview.toml";

/// Default streaming endpoint
pub const DEFAULT_ENDPOINT: &str = "ws://127.0.0.1:3000/ws";

/// Default transport read timeout in milliseconds
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 10;

/// Get the application data directory path
pub fn app_data_dir() -> Option<PathBuf> {
    dirs_next::data_dir().map(|p| p.join(APP_ID))
}

/// Get the default config file path
pub fn default_config_path() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join(CONFIG_FILE))
}

/// Stream channel configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamConfig {
    /// WebSocket endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint_url: String,

    /// Read timeout for inbound polling, in milliseconds
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,

    /// Use the scriptable mock transport instead of a real connection
    #[serde(default)]
    pub use_mock: bool,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_read_timeout_ms() -> u64 {
    DEFAULT_READ_TIMEOUT_MS
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            endpoint_url: default_endpoint(),
            read_timeout_ms: default_read_timeout_ms(),
            use_mock: false,
        }
    }
}

/// One configured pipeline edge, by node label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeSpec {
    /// Source node label
    pub source: String,
    /// Target node label
    pub target: String,
}

impl EdgeSpec {
    /// Create an edge spec from two labels
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Initial pipeline applied at startup
///
/// Edges go through the same admission control as interactive edits;
/// invalid pairs are logged and skipped.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Edges to commit after connecting, in order
    #[serde(default)]
    pub edges: Vec<EdgeSpec>,
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Stream channel settings
    #[serde(default)]
    pub stream: StreamConfig,

    /// Initial pipeline
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(PipeViewError::from)
            .with_context(|| format!("Failed to read {:?}", path))?;
        toml::from_str(&content)
            .map_err(|e| PipeViewError::Config(e.to_string()))
            .with_context(|| format!("Failed to parse {:?}", path))
    }

    /// Load from the default location, returning defaults on any error
    pub fn load_or_default() -> Self {
        let Some(path) = default_config_path() else {
            tracing::warn!("Could not determine config directory, using defaults");
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        Self::load(&path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(PipeViewError::from)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| PipeViewError::Config(e.to_string()))
            .context("Failed to serialize config")?;
        std::fs::write(path, content)
            .map_err(PipeViewError::from)
            .with_context(|| format!("Failed to write {:?}", path))
    }
}
