//! Crudsmith Core - Hexagonal Architecture Implementation
//!
//! Domain and application layers of the crudsmith CRUD scaffolding tool.
//! Every field source (console, schema file, GUI payload, live table) ends in
//! the same `FieldSpec`/`RelationSpec` lists held by a `GeneratorConfig`.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           crudsmith-cli (CLI)           │
//! │   clap, config, dialoguer prompter      │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  InteractiveSession, FieldSourceService │
//! │  IntrospectionService, SchemaFileService│
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │  Filesystem, SchemaReader, Prompter     │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    crudsmith-adapters (Infrastructure)  │
//! │  LocalFilesystem, SqliteSchemaReader,   │
//! │  LinePrompter                           │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │  FieldSpec, RelationSpec, parsers,      │
//! │  shorthand tokens, options              │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use crudsmith_core::domain::{RelationSpec, parse_field_input};
//!
//! let field = parse_field_input("title string text s,if").unwrap();
//! assert_eq!(field.descriptor(), "title string text s,if");
//!
//! let relation: RelationSpec = "mt1,Author,author_id".parse().unwrap();
//! assert_eq!(relation.inputs(), ["Author", "author_id", "id"]);
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ApplicationError, FieldSource, FieldSourceService, GenerationKind, GenerationPlan,
        GeneratorConfig, InteractiveSession, IntrospectionService, SchemaFileService,
        SchemaPaths, SessionSettings,
        ports::{ColumnInfo, Filesystem, ForeignKeyInfo, Prompter, SchemaReader},
    };
    pub use crate::domain::{
        DbType, DomainError, FieldSpec, GenerationOptions, GuiPayload, HtmlType, ModelNames,
        RelationKind, RelationSpec, SkipStep,
    };
    pub use crate::error::{CrudsmithError, CrudsmithResult};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
