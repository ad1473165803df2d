//! Unified error types for securethis.
//!
//! Every fatal condition of a scan run maps onto one [`SecureThisError`] variant.
//! The library never terminates the process; the binary decides exit codes.

use crate::config::{ModuleError, ValidationError};
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for securethis operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SecureThisError {
    /// No manifest file in the start directory or any ancestor
    #[error("Could not find {manifest} in {} or any parent directory", .start.display())]
    ProjectRootNotFound { start: PathBuf, manifest: String },

    /// The project config file was absent and has just been generated
    #[error(
        "A config file has been created at {}. Review it, then run the scan again.",
        .path.display()
    )]
    ConfigMissing { path: PathBuf },

    /// The project config file exists but could not be evaluated or validated
    #[error("Invalid config file {}: {source}", .path.display())]
    ConfigInvalid {
        path: PathBuf,
        #[source]
        source: ConfigInvalidKind,
    },

    /// The bundled scanner base config is unusable
    #[error("Base scanner config is unusable: {0}")]
    BaseConfig(String),

    /// The external scan process failed to start or exited non-zero
    #[error("External scan failed: {0}")]
    ScanExecution(String),

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Why a project config file was rejected.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConfigInvalidKind {
    #[error("could not evaluate module: {0}")]
    Module(#[from] ModuleError),

    #[error("schema validation failed: {0}")]
    Schema(#[from] ValidationError),
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for securethis operations
pub type Result<T> = std::result::Result<T, SecureThisError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl SecureThisError {
    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let message = format!("{source}");
        Self::Io {
            path: Some(path.into()),
            message,
            source,
        }
    }

    /// Create a config-invalid error for the file at `path`
    pub fn config_invalid(path: impl Into<PathBuf>, source: impl Into<ConfigInvalidKind>) -> Self {
        Self::ConfigInvalid {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Create a base config error
    pub fn base_config(message: impl Into<String>) -> Self {
        Self::BaseConfig(message.into())
    }

    /// Create a scan execution error
    pub fn scan_execution(message: impl Into<String>) -> Self {
        Self::ScanExecution(message.into())
    }

    /// Whether this is the expected first-run outcome rather than a failure.
    #[must_use]
    pub const fn is_config_created(&self) -> bool {
        matches!(self, Self::ConfigMissing { .. })
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for SecureThisError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}
