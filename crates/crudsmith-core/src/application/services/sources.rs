//! Batch field sources: schema files and GUI payloads.
//!
//! Batch sources are all-or-nothing. The first bad entry aborts the run and
//! the configuration is left without any of the batch's fields.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::application::ApplicationError;
use crate::application::config::GeneratorConfig;
use crate::application::ports::Filesystem;
use crate::domain::{DomainError, GuiPayload, SchemaEntry, normalize_entries};
use crate::error::CrudsmithResult;

/// Where the fields of a run come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSource {
    Console,
    JsonFile(PathBuf),
    GuiPayload(String),
    Table { ignored: Vec<String> },
}

impl FieldSource {
    /// Pick the source from the command flags.
    ///
    /// Priority: schema file, then GUI payload, then table, then console.
    pub fn select(
        fields_file: Option<PathBuf>,
        gui_payload: Option<String>,
        from_table: bool,
        ignored: Vec<String>,
    ) -> Self {
        if let Some(path) = fields_file {
            Self::JsonFile(path)
        } else if let Some(json) = gui_payload {
            Self::GuiPayload(json)
        } else if from_table {
            Self::Table { ignored }
        } else {
            Self::Console
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Console => "console",
            Self::JsonFile(_) => "schema file",
            Self::GuiPayload(_) => "gui payload",
            Self::Table { .. } => "table",
        }
    }
}

/// Directories used to resolve schema file paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaPaths {
    /// Project root that relative paths are tried against.
    pub base: PathBuf,
    /// Directory holding saved schema files.
    pub schema_dir: PathBuf,
}

impl SchemaPaths {
    /// Candidate locations for `given`, in lookup order.
    pub fn candidates(&self, given: &Path) -> Vec<PathBuf> {
        let mut out = vec![given.to_path_buf()];
        if given.is_relative() {
            out.push(self.base.join(given));
            out.push(self.schema_dir.join(given));
        }
        out
    }
}

/// Loads fields from schema files and GUI payloads.
pub struct FieldSourceService {
    filesystem: Box<dyn Filesystem>,
    paths: SchemaPaths,
}

impl FieldSourceService {
    pub fn new(filesystem: Box<dyn Filesystem>, paths: SchemaPaths) -> Self {
        Self { filesystem, paths }
    }

    /// First existing candidate for `given`.
    pub fn resolve_schema_file(&self, given: &Path) -> CrudsmithResult<PathBuf> {
        self.paths
            .candidates(given)
            .into_iter()
            .find(|p| self.filesystem.exists(p))
            .ok_or_else(|| {
                ApplicationError::SchemaFileNotFound {
                    path: given.to_path_buf(),
                }
                .into()
            })
    }

    /// Load a JSON schema file into `config`. Returns the resolved path.
    #[instrument(skip(self, config), fields(path = %given.display()))]
    pub fn load_json_file(
        &self,
        given: &Path,
        config: &mut GeneratorConfig,
    ) -> CrudsmithResult<PathBuf> {
        let path = self.resolve_schema_file(given)?;
        debug!(resolved = %path.display(), "schema file resolved");

        let raw = self.filesystem.read_file(&path)?;
        let malformed = |reason: String| ApplicationError::SchemaFileMalformed {
            path: path.clone(),
            reason,
        };

        let entries: Vec<SchemaEntry> =
            serde_json::from_str(&raw).map_err(|e| malformed(e.to_string()))?;
        let normalized = normalize_entries(entries).map_err(|e| malformed(e.to_string()))?;

        info!(
            fields = normalized.fields.len(),
            relations = normalized.relations.len(),
            "schema file loaded"
        );
        config.extend(normalized);
        Ok(path)
    }

    /// Apply a GUI payload: option overrides first, then its fields.
    #[instrument(skip_all)]
    pub fn load_gui_payload(&self, json: &str, config: &mut GeneratorConfig) -> CrudsmithResult<()> {
        let payload = GuiPayload::parse(json)?;
        let normalized = normalize_entries(payload.fields.clone()).map_err(|e| {
            DomainError::InvalidPayload {
                reason: format!("fields[{}]: {}", e.index, e.source),
            }
        })?;

        config.override_from_payload(&payload);
        info!(
            fields = normalized.fields.len(),
            relations = normalized.relations.len(),
            "gui payload loaded"
        );
        config.extend(normalized);
        Ok(())
    }
}
