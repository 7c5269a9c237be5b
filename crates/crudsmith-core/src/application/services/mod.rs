//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports: fill a
//! `GeneratorConfig` from one field source, save its snapshot and plan the
//! generation pass.

pub mod introspect;
pub mod plan;
pub mod schema_file;
pub mod session;
pub mod sources;

pub use introspect::{IntrospectionService, map_native_type};
pub use plan::{
    Artifact, GenerationKind, GenerationPlan, MigrationAction, PlanFlags, PostAction,
};
pub use schema_file::{SaveOutcome, SchemaFileService};
pub use session::{INVALID_INPUT, InteractiveSession, SessionSettings};
pub use sources::{FieldSource, FieldSourceService, SchemaPaths};
