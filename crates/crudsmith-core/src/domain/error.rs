// ============================================================================
// domain/error.rs - PARSING AND NORMALIZATION ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (so the interactive session can report and keep going)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Input Errors (400-level equivalent)
    // ========================================================================
    #[error("invalid field input '{input}': {reason}")]
    InvalidFieldInput { input: String, reason: String },

    #[error("invalid relation input '{input}': {reason}")]
    InvalidRelationInput { input: String, reason: String },

    #[error("invalid payload: {reason}")]
    InvalidPayload { reason: String },

    #[error("unknown skip step '{step}'")]
    UnknownSkipStep { step: String },

    #[error("invalid model name '{name}'")]
    InvalidModelName { name: String },
}

impl DomainError {
    pub(crate) fn field(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidFieldInput {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn relation(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRelationInput {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidFieldInput { reason, .. } => vec![
                format!("Details: {reason}"),
                "Field descriptors look like: <name> <dbType> [<htmlType>] [<options>]".into(),
                "Example: title string text s,if".into(),
                "Run 'crudsmith types' to see db types, html types and option codes".into(),
            ],
            Self::InvalidRelationInput { reason, .. } => vec![
                format!("Details: {reason}"),
                "Relation descriptors look like: <mt1|mtm|1t1|1tm>,<Model>,<foreignKey>,<localKey>"
                    .into(),
                "Example: mt1,Author,author_id,id".into(),
            ],
            Self::InvalidPayload { reason } => vec![
                format!("Details: {reason}"),
                "The GUI payload must be a JSON object with a 'fields' array".into(),
            ],
            Self::UnknownSkipStep { .. } => vec![
                "Valid steps: migration, model, controllers, api_controller, scaffold_controller,"
                    .into(),
                "  repository, requests, api_requests, scaffold_requests, routes, api_routes,"
                    .into(),
                "  scaffold_routes, views, tests, menu, dump-autoload".into(),
            ],
            Self::InvalidModelName { name } => vec![
                format!("'{name}' cannot be used as a model name"),
                "Use a singular name made of letters, digits and underscores, e.g. BlogPost".into(),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidFieldInput { .. }
            | Self::InvalidRelationInput { .. }
            | Self::InvalidModelName { .. } => ErrorCategory::Validation,
            Self::InvalidPayload { .. } | Self::UnknownSkipStep { .. } => {
                ErrorCategory::Validation
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}
