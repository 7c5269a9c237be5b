//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate only sees the values it is handed.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables, `CRUDSMITH__SECTION__KEY`
//! 3. Config file: `--config FILE`, else `.crudsmith.toml` in the current
//!    directory layered over the platform config file
//! 4. Built-in defaults (always present)

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crudsmith_core::domain::GenerationOptions;

/// Name of the per-project config file.
pub const LOCAL_CONFIG_FILE: &str = ".crudsmith.toml";

const ENV_PREFIX: &str = "CRUDSMITH";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where schema files live.
    pub paths: PathsConfig,
    /// Default generation toggles.
    pub generator: GeneratorDefaults,
    /// Named databases for `--from-table`.
    pub database: DatabaseConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Project root; relative schema and database paths resolve against it.
    pub base: PathBuf,
    /// Schema snapshot directory, relative to `base`.
    pub schema_files: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            base: PathBuf::from("."),
            schema_files: PathBuf::from("resources/model_schemas"),
        }
    }
}

impl PathsConfig {
    pub fn schema_dir(&self) -> PathBuf {
        self.base.join(&self.schema_files)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorDefaults {
    pub repository_pattern: bool,
    pub tests: bool,
    pub factory: bool,
    pub seeder: bool,
    pub resources: bool,
    pub localized: bool,
    pub save_schema_file: bool,
    pub timestamps: bool,
    /// Ask for validation rules in the console session.
    pub ask_validations: bool,
}

impl Default for GeneratorDefaults {
    fn default() -> Self {
        let options = GenerationOptions::default();
        Self {
            repository_pattern: options.repository_pattern,
            tests: options.tests,
            factory: options.factory,
            seeder: options.seeder,
            resources: options.resources,
            localized: options.localized,
            save_schema_file: options.save_schema_file,
            timestamps: options.timestamps,
            ask_validations: false,
        }
    }
}

impl GeneratorDefaults {
    /// Starting options for a run, before flags and payload overrides.
    pub fn to_options(&self) -> GenerationOptions {
        GenerationOptions {
            repository_pattern: self.repository_pattern,
            tests: self.tests,
            factory: self.factory,
            seeder: self.seeder,
            resources: self.resources,
            localized: self.localized,
            save_schema_file: self.save_schema_file,
            timestamps: self.timestamps,
            ..GenerationOptions::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub default_connection: String,
    /// Connection name to SQLite database file.
    pub connections: BTreeMap<String, PathBuf>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            default_connection: "main".into(),
            connections: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults, then file(s), then environment.
    ///
    /// `config_file` is the path passed via `--config`; it must exist.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let defaults = config::Config::try_from(&Self::default())
            .context("Failed to encode default configuration")?;
        let mut builder = config::Config::builder().add_source(defaults);

        match config_file {
            Some(path) => {
                builder = builder.add_source(config::File::from(path.as_path()).required(true));
            }
            None => {
                if let Some(global) = Self::global_config_path() {
                    builder = builder.add_source(config::File::from(global).required(false));
                }
                builder = builder
                    .add_source(config::File::from(Path::new(LOCAL_CONFIG_FILE)).required(false));
            }
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        builder
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Platform config file, e.g. `~/.config/crudsmith/config.toml`.
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "crudsmith", "crudsmith")
            .map(|d| d.config_dir().join("config.toml"))
    }

    /// The file a fresh `crudsmith init` writes to.
    ///
    /// Falls back to `.crudsmith.toml` in the current directory when the
    /// platform has no config dir.
    pub fn config_path() -> PathBuf {
        Self::global_config_path().unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }

    /// The file that `load` would read, if any exists.
    pub fn active_path(config_file: Option<&PathBuf>) -> Option<PathBuf> {
        if let Some(path) = config_file {
            return Some(path.clone());
        }
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.is_file() {
            return Some(local);
        }
        Self::global_config_path().filter(|p| p.is_file())
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Look up a dotted key such as `generator.tests`.
    ///
    /// Returns `None` when the key does not exist; tables render as TOML.
    pub fn get(&self, key: &str) -> Option<String> {
        let mut value = serde_json::to_value(self).ok()?;
        for segment in key.split('.') {
            value = value.get_mut(segment)?.take();
        }
        Some(match value {
            serde_json::Value::String(s) => s,
            serde_json::Value::Object(_) => toml::to_string_pretty(&value).ok()?,
            other => other.to_string(),
        })
    }

    /// SQLite path for a named connection, resolved against `paths.base`.
    pub fn connection_path(&self, name: &str) -> Option<PathBuf> {
        self.database
            .connections
            .get(name)
            .map(|p| self.paths.base.join(p))
    }
}
