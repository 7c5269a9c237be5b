//! Application layer errors.
//!
//! These errors represent failures reaching the outside world (files,
//! databases, the terminal). Malformed input is a `DomainError`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// The introspected table does not exist on the connection.
    #[error("table '{table}' not found on connection '{connection}'")]
    TableNotFound { table: String, connection: String },

    /// The database could not be opened or queried.
    #[error("connection '{connection}' failed: {reason}")]
    ConnectionError { connection: String, reason: String },

    /// No schema file at any of the searched locations.
    #[error("schema file not found: {}", path.display())]
    SchemaFileNotFound { path: PathBuf },

    /// The schema file is not valid JSON or contains an invalid entry.
    #[error("malformed schema file {}: {reason}", path.display())]
    SchemaFileMalformed { path: PathBuf, reason: String },

    /// Filesystem operation failed.
    #[error("filesystem error at {}: {reason}", path.display())]
    FilesystemError { path: PathBuf, reason: String },

    /// The prompt backend failed (terminal gone, write error).
    #[error("prompt failed: {reason}")]
    PromptFailed { reason: String },

    /// The input stream ended while an answer was expected.
    #[error("input closed")]
    InputClosed,
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::TableNotFound { table, connection } => vec![
                format!("No table named '{table}' on connection '{connection}'"),
                "Pass the table explicitly with --table <NAME>".into(),
                "Or select another database with --connection <NAME>".into(),
            ],
            Self::ConnectionError { connection, .. } => vec![
                format!("Check the path configured for [database.connections] {connection}"),
                "Run 'crudsmith config list' to see configured connections".into(),
            ],
            Self::SchemaFileNotFound { path } => vec![
                format!("Looked for: {}", path.display()),
                "Paths are tried as given, then under paths.base, then under paths.schema_files"
                    .into(),
            ],
            Self::SchemaFileMalformed { .. } => vec![
                "The file must be a JSON array of field or relation objects".into(),
                "Example: [{\"name\": \"title\", \"dbType\": \"string\"}]".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::PromptFailed { .. } | Self::InputClosed => vec![
                "Interactive input is required for this step".into(),
                "Use --fields-file or --from-table for non-interactive runs".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TableNotFound { .. } | Self::SchemaFileNotFound { .. } => {
                ErrorCategory::NotFound
            }
            Self::SchemaFileMalformed { .. } | Self::InputClosed => ErrorCategory::Validation,
            Self::ConnectionError { .. } => ErrorCategory::Configuration,
            Self::FilesystemError { .. } | Self::PromptFailed { .. } => ErrorCategory::Internal,
        }
    }
}
