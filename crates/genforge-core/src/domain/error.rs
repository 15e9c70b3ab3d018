// ============================================================================
// domain/error.rs - DOMAIN INVARIANT VIOLATIONS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (results are cloned into reports)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
///
/// Constraint *validation* failures are not errors: they are reported as a
/// [`ConstraintReport`](crate::domain::ConstraintReport) so callers can
/// inspect every problem at once.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (400-level equivalent)
    // ========================================================================
    #[error("Invalid archetype: {0}")]
    InvalidArchetype(String),

    #[error("Unknown {kind} '{value}'")]
    UnknownName { kind: &'static str, value: String },

    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    #[error("Duplicate path in template: {path}")]
    DuplicatePath { path: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("Path escapes the project root: {path}")]
    PathEscapesRoot { path: String },

    #[error("Invalid variable assignment '{0}': expected key=value")]
    InvalidVariable(String),

    // ========================================================================
    // Not Found Errors (404-level equivalent)
    // ========================================================================
    #[error("No template registered for archetype '{0}'")]
    NoTemplateForArchetype(String),

    // ========================================================================
    // Constraint Violations
    // ========================================================================
    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },

    #[error("Illegal pipeline transition: {from} -> {to}")]
    IllegalTransition { from: String, to: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidArchetype(msg) => vec![
                format!("Details: {msg}"),
                "Archetypes are lowercase, kebab-case identifiers (e.g. expo-mobile)".into(),
                "Try: genforge list".into(),
            ],
            Self::UnknownName { kind, value } => vec![
                format!("'{value}' is not a recognised {kind}"),
                "Names are case-insensitive; see --help for accepted values".into(),
            ],
            Self::NoTemplateForArchetype(archetype) => vec![
                format!("No template generates '{archetype}' projects"),
                "Try: genforge list to see available archetypes".into(),
                "Or add a template manifest under your templates directory".into(),
            ],
            Self::DuplicatePath { path } => vec![
                format!("'{path}' is declared more than once"),
                "Each template file must have a unique path".into(),
            ],
            Self::AbsolutePathNotAllowed { .. } | Self::PathEscapesRoot { .. } => vec![
                "Template paths must be relative to the project root".into(),
                "Remove leading '/' and any '..' segments".into(),
            ],
            Self::InvalidVariable(_) => vec![
                "Pass variables as --var key=value".into(),
                "Example: genforge generate demo --archetype cli-tool --var author=me".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidArchetype(_)
            | Self::UnknownName { .. }
            | Self::InvalidTemplate(_)
            | Self::DuplicatePath { .. }
            | Self::AbsolutePathNotAllowed { .. }
            | Self::PathEscapesRoot { .. }
            | Self::InvalidVariable(_)
            | Self::MissingRequiredField { .. } => ErrorCategory::Validation,
            Self::NoTemplateForArchetype(_) => ErrorCategory::NotFound,
            Self::IllegalTransition { .. } => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}
