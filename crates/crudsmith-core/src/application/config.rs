//! Run-scoped aggregate of everything the generators consume.

use tracing::{debug, instrument};

use crate::domain::{
    FieldSpec, GenerationOptions, GuiPayload, ModelNames, NormalizedEntries, RelationSpec,
    SkipStep,
};

/// Fields, relations, naming and options for one `generate` run.
///
/// Owned by the command handler and passed by `&mut` to whichever field
/// source populates it. Generators only read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    names: ModelNames,
    table_name: String,
    connection: String,
    options: GenerationOptions,
    fields: Vec<FieldSpec>,
    relations: Vec<RelationSpec>,
}

impl GeneratorConfig {
    /// Empty aggregate; the table name defaults to the snake plural of the model.
    pub fn new(names: ModelNames, connection: impl Into<String>, options: GenerationOptions) -> Self {
        let table_name = names.table_name().to_owned();
        Self {
            names,
            table_name,
            connection: connection.into(),
            options,
            fields: Vec::new(),
            relations: Vec::new(),
        }
    }

    pub fn with_table_name(mut self, table: impl Into<String>) -> Self {
        self.table_name = table.into();
        self
    }

    pub fn names(&self) -> &ModelNames {
        &self.names
    }
    pub fn table_name(&self) -> &str {
        &self.table_name
    }
    pub fn connection(&self) -> &str {
        &self.connection
    }
    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }
    pub fn relations(&self) -> &[RelationSpec] {
        &self.relations
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name() == name)
    }

    /// The primary key field, if one was added.
    pub fn primary_field(&self) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.is_primary())
    }

    /// Merge GUI option overrides, table name and migrate directive.
    ///
    /// Called once, before any field is added.
    #[instrument(skip_all, fields(model = %self.names.name))]
    pub fn override_from_payload(&mut self, payload: &GuiPayload) {
        self.options.merge(&payload.options);
        if let Some(table) = payload.table_name.as_deref().map(str::trim) {
            debug!(table, "table name overridden by payload");
            self.table_name = table.to_owned();
        }
        if !payload.migrate {
            self.options.skip(SkipStep::Migration);
        }
    }

    pub fn push_field(&mut self, field: FieldSpec) {
        debug!(field = %field, "field added");
        self.fields.push(field);
    }

    pub fn push_relation(&mut self, relation: RelationSpec) {
        debug!(relation = %relation, "relation added");
        self.relations.push(relation);
    }

    /// Append a whole batch from a file, payload or table.
    pub fn extend(&mut self, entries: NormalizedEntries) {
        for field in entries.fields {
            self.push_field(field);
        }
        for relation in entries.relations {
            self.push_relation(relation);
        }
    }
}
