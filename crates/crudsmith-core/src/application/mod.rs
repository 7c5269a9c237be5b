//! Application layer for Crudsmith.
//!
//! This layer contains:
//! - **Config**: `GeneratorConfig`, the run-scoped aggregate
//! - **Services**: field sources, the interactive session, introspection,
//!   the schema snapshot file and the generation plan
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! Parsing rules live in `crate::domain`; this layer wires them to I/O.

pub mod config;
pub mod error;
pub mod ports;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;

pub use config::GeneratorConfig;
pub use services::{
    Artifact, FieldSource, FieldSourceService, GenerationKind, GenerationPlan,
    INVALID_INPUT, InteractiveSession, IntrospectionService, MigrationAction, PlanFlags,
    PostAction, SaveOutcome, SchemaFileService, SchemaPaths, SessionSettings,
};

// Re-export port traits (for adapter implementation)
pub use ports::{ColumnInfo, Filesystem, ForeignKeyInfo, Prompter, SchemaReader};

pub use error::ApplicationError;
