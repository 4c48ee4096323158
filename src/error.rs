//! Error types for Larder
//!
//! All modules use `LarderResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Larder operations
pub type LarderResult<T> = Result<T, LarderError>;

/// All errors that can occur in Larder
#[derive(Error, Debug)]
pub enum LarderError {
    // Declaration errors
    #[error("Parameter \"{param}\" cannot be null or empty")]
    InvalidArgument { param: &'static str },

    #[error("Invalid manifest at {path}: {reason}")]
    ManifestInvalid { path: PathBuf, reason: String },

    // Tool errors
    #[error("Required tool not found: {name}. {hint}")]
    ToolNotFound { name: String, hint: String },

    #[error("{tool} version must be at least {minimum}. Found {found}")]
    UnsupportedToolVersion {
        tool: String,
        minimum: String,
        found: String,
    },

    #[error("Command failed: {command}, exit code: {code}, stderr: {stderr}")]
    ToolExecutionFailure {
        command: String,
        code: i32,
        stderr: String,
    },

    #[error("Command failed to start: {command}")]
    ToolSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    // Acquisition errors
    #[error("Download failed for {url}: {reason}")]
    NetworkFailure { url: String, reason: String },

    #[error("Timed out after {secs}s: {operation}")]
    Timeout { operation: String, secs: u64 },

    #[error("Checksum mismatch for {url}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        url: String,
        expected: String,
        actual: String,
    },

    #[error("Failed to extract archive {archive}: {reason}")]
    ExtractionFailure { archive: PathBuf, reason: String },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    User(String),
}

impl LarderError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a tool execution failure from an exit code and captured stderr
    pub fn tool_exec(command: impl Into<String>, code: i32, stderr: impl Into<String>) -> Self {
        Self::ToolExecutionFailure {
            command: command.into(),
            code,
            stderr: stderr.into(),
        }
    }

    /// Check if re-running the same fetch could plausibly succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::NetworkFailure { .. } | Self::Timeout { .. })
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::ToolNotFound { .. } => Some("Install Node.js (which bundles npm) and re-run"),
            Self::UnsupportedToolVersion { .. } => Some("Upgrade with: npm install -g npm"),
            Self::NetworkFailure { .. } | Self::Timeout { .. } => {
                Some("The partial download directory is left in place for inspection")
            }
            _ => None,
        }
    }
}
