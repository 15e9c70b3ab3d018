//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    Filesystem { path: PathBuf, reason: String },

    /// A command could not be started at all.
    #[error("Failed to spawn '{command}': {reason}")]
    CommandSpawn { command: String, reason: String },

    /// Enhancement transport or response parsing failed.
    #[error("Enhancement failed: {reason}")]
    Enhancement { reason: String },

    /// Registry lookup or registration failed.
    #[error("Registry error: {reason}")]
    Registry { reason: String },

    /// The run was cancelled by the caller.
    #[error("cancelled")]
    Cancelled,

    /// Port/Adapter not configured.
    #[error("Required adapter not configured: {name}")]
    AdapterNotConfigured { name: &'static str },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Filesystem { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::CommandSpawn { command, .. } => vec![
                format!("Could not start: {command}"),
                "Make sure the tool is installed and on PATH".into(),
            ],
            Self::Enhancement { .. } => vec![
                "Check enhancer.base_url and enhancer.api_key in your config".into(),
                "Or disable enhancement: GENFORGE__ENHANCER__ENABLED=false".into(),
            ],
            Self::Registry { reason } => vec![
                format!("Registry problem: {reason}"),
                "Try: genforge list to see registered templates".into(),
            ],
            Self::AdapterNotConfigured { name } => vec![
                format!("Required component not configured: {name}"),
                "This is likely a configuration error".into(),
            ],
            Self::Cancelled => vec!["The run was interrupted; re-run to finish".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Filesystem { .. } | Self::Cancelled => ErrorCategory::Internal,
            Self::CommandSpawn { .. } | Self::Enhancement { .. } => ErrorCategory::External,
            Self::Registry { .. } => ErrorCategory::NotFound,
            Self::AdapterNotConfigured { .. } => ErrorCategory::Configuration,
        }
    }
}
