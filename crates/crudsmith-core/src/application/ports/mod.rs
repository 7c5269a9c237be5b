//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `crudsmith-adapters` and the
//! CLI implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: schema file reads and writes
//!   - `SchemaReader`: live database metadata
//!   - `Prompter`: interactive console answers

pub mod output;

pub use output::{ColumnInfo, Filesystem, ForeignKeyInfo, Prompter, SchemaReader, resolve_choice};

#[cfg(test)]
pub use output::MockSchemaReader;
