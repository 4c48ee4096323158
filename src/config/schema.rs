//! Configuration schema for Larder
//!
//! Configuration is stored at `~/.config/larder/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Cache layout settings
    pub cache: CacheConfig,

    /// Download settings
    pub network: NetworkConfig,

    /// npm tool settings
    pub npm: NpmConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Enable verbose logging
    pub verbose: bool,

    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            log_format: "text".to_string(),
        }
    }
}

/// Cache layout configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache root directory (default: ~/.cache/larder)
    pub root: Option<PathBuf>,
}

/// Download configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Overall timeout per download in seconds (0 = no timeout)
    pub timeout_secs: u64,

    /// Maximum accepted response body size in MB
    pub max_download_mb: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 300,
            max_download_mb: 512,
        }
    }
}

/// npm tool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NpmConfig {
    /// Minimum supported npm version
    pub min_version: String,

    /// Timeout per npm invocation in seconds (0 = no timeout)
    pub timeout_secs: u64,
}

impl Default for NpmConfig {
    fn default() -> Self {
        Self {
            min_version: "3.0.0".to_string(),
            timeout_secs: 600,
        }
    }
}
