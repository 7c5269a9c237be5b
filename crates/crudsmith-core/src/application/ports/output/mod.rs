//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `crudsmith-adapters` crate provides implementations.

use std::path::Path;

use crate::error::CrudsmithResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `crudsmith_adapters::filesystem::LocalFilesystem` (production)
/// - `application::testing::MapFilesystem` (unit tests)
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> CrudsmithResult<()>;

    /// Read a whole UTF-8 file.
    fn read_file(&self, path: &Path) -> CrudsmithResult<String>;

    /// Write content to a file, replacing it if present.
    fn write_file(&self, path: &Path, content: &str) -> CrudsmithResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;
}

/// One column as reported by the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    /// Declared type, verbatim (`VARCHAR(255)`, `bigint unsigned`, ...).
    pub native_type: String,
    pub nullable: bool,
    pub default: Option<String>,
    pub primary: bool,
}

/// One foreign-key constraint on the introspected table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyInfo {
    pub column: String,
    pub referenced_table: String,
    pub referenced_column: String,
}

/// Port for read-only schema metadata queries.
///
/// Implemented by:
/// - `crudsmith_adapters::sqlite::SqliteSchemaReader`
#[cfg_attr(test, mockall::automock)]
pub trait SchemaReader {
    /// Name of the connection, for error messages.
    fn connection_name(&self) -> String;

    fn table_exists(&self, table: &str) -> CrudsmithResult<bool>;

    /// Columns in declaration order.
    fn columns(&self, table: &str) -> CrudsmithResult<Vec<ColumnInfo>>;

    fn foreign_keys(&self, table: &str) -> CrudsmithResult<Vec<ForeignKeyInfo>>;
}

/// Port for turn-based console questions.
///
/// Implemented by:
/// - `crudsmith_adapters::prompt::LinePrompter` (pipes, tests)
/// - the CLI's dialoguer prompter (terminals)
///
/// Every method returns `ApplicationError::InputClosed` once the input
/// stream is exhausted.
pub trait Prompter {
    /// Freeform answer; an empty answer yields `default` when given.
    fn input(&mut self, prompt: &str, default: Option<&str>) -> CrudsmithResult<String>;

    /// One of `items`, by index.
    fn select(&mut self, prompt: &str, items: &[String], default: usize) -> CrudsmithResult<usize>;

    /// Zero or more of `items`, by index, in ascending order.
    fn multi_select(
        &mut self,
        prompt: &str,
        items: &[String],
        defaults: &[bool],
    ) -> CrudsmithResult<Vec<usize>>;

    fn confirm(&mut self, prompt: &str, default: bool) -> CrudsmithResult<bool>;

    /// Informational line.
    fn note(&mut self, message: &str) -> CrudsmithResult<()>;

    /// Recoverable error line; the session keeps going.
    fn error(&mut self, message: &str) -> CrudsmithResult<()>;
}

/// Map a typed answer onto a choice list.
///
/// Accepts a 1-based index, the full item text, or the item's first word
/// (`s` for `s (not searchable)`).
pub fn resolve_choice(items: &[String], answer: &str) -> Option<usize> {
    let answer = answer.trim();
    if let Ok(n) = answer.parse::<usize>() {
        return (1..=items.len()).contains(&n).then(|| n - 1);
    }
    items.iter().position(|item| {
        item == answer || item.split_whitespace().next() == Some(answer)
    })
}
