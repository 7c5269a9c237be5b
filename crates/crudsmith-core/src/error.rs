//! Unified error handling for Crudsmith Core.
//!
//! Wraps domain and application errors so callers get one type with
//! categories and user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for Crudsmith Core operations.
#[derive(Debug, Error, Clone)]
pub enum CrudsmithError {
    /// Malformed descriptors, payloads or names.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Failures while reaching files, databases or the terminal.
    #[error(transparent)]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl CrudsmithError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {message}"),
                "Run 'crudsmith config path' to see which file is loaded".into(),
            ],
            Self::Internal { .. } => vec!["This appears to be a bug in Crudsmith".into()],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::NotFound => ErrorCategory::NotFound,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type CrudsmithResult<T> = Result<T, CrudsmithError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_are_validation() {
        let err: CrudsmithError = DomainError::UnknownSkipStep {
            step: "docs".into(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert!(err.to_string().contains("docs"));
    }

    #[test]
    fn missing_table_is_not_found() {
        let err: CrudsmithError = ApplicationError::TableNotFound {
            table: "posts".into(),
            connection: "main".into(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert!(err.suggestions().iter().any(|s| s.contains("--table")));
    }
}
