//! Infrastructure adapters for Crudsmith.
//!
//! This crate implements the ports defined in `crudsmith_core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod filesystem;
pub mod prompt;
pub mod sqlite;

// Re-export commonly used adapters
pub use filesystem::LocalFilesystem;
pub use prompt::LinePrompter;
pub use sqlite::SqliteSchemaReader;
