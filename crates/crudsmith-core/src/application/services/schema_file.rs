//! Schema snapshot file.
//!
//! Writes `<schema_dir>/<Model>.json` so a later run can reload the same
//! fields with `--fields-file`.

use std::path::PathBuf;

use tracing::{info, instrument};

use crate::application::ApplicationError;
use crate::application::config::GeneratorConfig;
use crate::application::ports::{Filesystem, Prompter};
use crate::domain::entries_for;
use crate::error::CrudsmithResult;

/// What `save` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Written(PathBuf),
    /// The file existed and overwriting was declined.
    Kept(PathBuf),
    /// `save_schema_file` is off.
    Disabled,
}

/// Writes schema snapshot files.
pub struct SchemaFileService {
    filesystem: Box<dyn Filesystem>,
    schema_dir: PathBuf,
}

impl SchemaFileService {
    pub fn new(filesystem: Box<dyn Filesystem>, schema_dir: impl Into<PathBuf>) -> Self {
        Self {
            filesystem,
            schema_dir: schema_dir.into(),
        }
    }

    pub fn path_for(&self, config: &GeneratorConfig) -> PathBuf {
        self.schema_dir.join(format!("{}.json", config.names().name))
    }

    /// Pretty JSON of the config's fields followed by its relations.
    pub fn render(config: &GeneratorConfig) -> CrudsmithResult<String> {
        let entries = entries_for(config.fields(), config.relations());
        serde_json::to_string_pretty(&entries).map_err(|e| {
            crate::error::CrudsmithError::Internal {
                message: format!("schema serialization failed: {e}"),
            }
        })
    }

    /// Save the snapshot. An existing file is only replaced after `confirm`.
    #[instrument(skip_all, fields(model = %config.names().name))]
    pub fn save(
        &self,
        config: &GeneratorConfig,
        prompter: &mut dyn Prompter,
    ) -> CrudsmithResult<SaveOutcome> {
        if !config.options().save_schema_file {
            return Ok(SaveOutcome::Disabled);
        }

        let path = self.path_for(config);
        if self.filesystem.exists(&path) {
            let question = format!("{} already exists. Overwrite?", path.display());
            let overwrite = match prompter.confirm(&question, false) {
                Ok(answer) => answer,
                Err(crate::error::CrudsmithError::Application(ApplicationError::InputClosed)) => {
                    false
                }
                Err(e) => return Err(e),
            };
            if !overwrite {
                info!(path = %path.display(), "schema file kept");
                return Ok(SaveOutcome::Kept(path));
            }
        }

        let content = Self::render(config)?;
        self.filesystem.create_dir_all(&self.schema_dir)?;
        self.filesystem.write_file(&path, &content)?;
        info!(path = %path.display(), "schema file written");
        Ok(SaveOutcome::Written(path))
    }
}
