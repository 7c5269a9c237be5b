//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crudsmith_core::application::GenerationKind;

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "crudsmith",
    bin_name = "crudsmith",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Field and relation specifications for CRUD generators",
    long_about = "crudsmith builds the field and relation list of a model from an \
                  interactive session, a JSON schema file, a GUI payload or an \
                  existing database table.",
    after_help = "EXAMPLES:\n\
        \x20 crudsmith generate Post\n\
        \x20 crudsmith generate Post --fields-file Post.json --kind api\n\
        \x20 crudsmith generate Post --from-table --table blog_posts --connection main\n\
        \x20 crudsmith types",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build the field specification of a model.
    #[command(
        visible_alias = "g",
        about = "Build the fields and relations of a model",
        after_help = "EXAMPLES:\n\
            \x20 crudsmith generate Post                         # console session\n\
            \x20 crudsmith generate Post --relations             # ask for relations too\n\
            \x20 crudsmith generate Post --fields-file Post.json\n\
            \x20 crudsmith generate Post --json-from-gui '{\"fields\": []}'\n\
            \x20 crudsmith generate Post --from-table --ignore-fields deleted_at\n\
            \x20 crudsmith --output-format json generate Post --fields-file Post.json"
    )]
    Generate(GenerateArgs),

    /// List database types, html types, option codes and shorthands.
    #[command(
        about = "Show the field input vocabulary",
        after_help = "EXAMPLES:\n\
            \x20 crudsmith types\n\
            \x20 crudsmith --output-format json types"
    )]
    Types,

    /// Initialise a crudsmith configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 crudsmith init           # platform config dir\n\
            \x20 crudsmith init --global  # same as above\n\
            \x20 crudsmith init --local   # .crudsmith.toml in CWD"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 crudsmith completions bash > ~/.local/share/bash-completion/completions/crudsmith\n\
            \x20 crudsmith completions zsh  > ~/.zfunc/_crudsmith\n\
            \x20 crudsmith completions fish > ~/.config/fish/completions/crudsmith.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the crudsmith configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 crudsmith config get generator.tests\n\
            \x20 crudsmith config get database.connections\n\
            \x20 crudsmith config list"
    )]
    Config(ConfigCommands),
}

// ── generate ──────────────────────────────────────────────────────────────────

/// Arguments for `crudsmith generate`.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Singular model name, e.g. `Post` or `blog_post`.
    #[arg(value_name = "MODEL", help = "Singular model name")]
    pub model: String,

    /// Which artifact family the plan covers.
    #[arg(
        short = 'k',
        long = "kind",
        value_enum,
        default_value = "api-scaffold",
        help = "Artifact family"
    )]
    pub kind: Kind,

    /// Load fields from a JSON schema file.
    ///
    /// Looked up as given, then under `paths.base`, then in the schema
    /// directory.
    #[arg(
        long = "fields-file",
        value_name = "PATH",
        help = "Load fields from a JSON schema file"
    )]
    pub fields_file: Option<PathBuf>,

    /// Load fields and option overrides from a GUI payload.
    #[arg(
        long = "json-from-gui",
        value_name = "JSON",
        help = "Load fields from a GUI JSON payload"
    )]
    pub json_from_gui: Option<String>,

    /// Read fields from an existing database table.
    #[arg(long = "from-table", help = "Introspect an existing table")]
    pub from_table: bool,

    /// Table name; defaults to the snake-case plural of the model.
    #[arg(long = "table", value_name = "NAME", help = "Table name")]
    pub table: Option<String>,

    /// Columns to leave out with `--from-table`.
    #[arg(
        long = "ignore-fields",
        value_name = "COLUMNS",
        value_delimiter = ',',
        requires = "from_table",
        help = "Comma-separated columns to ignore"
    )]
    pub ignore_fields: Vec<String>,

    /// Name of the implicit primary key in the console session.
    #[arg(long = "primary", value_name = "NAME", help = "Primary key name")]
    pub primary: Option<String>,

    /// Explicit plural of the model name.
    #[arg(long = "plural", value_name = "NAME", help = "Plural model name")]
    pub plural: Option<String>,

    /// Steps to skip, e.g. `migration,views,dump-autoload`.
    #[arg(long = "skip", value_name = "STEPS", help = "Comma-separated steps to skip")]
    pub skip: Option<String>,

    /// Ask for a relation after every field in the console session.
    #[arg(long = "relations", help = "Prompt for relations")]
    pub relations: bool,

    /// Named database from `[database.connections]`.
    #[arg(long = "connection", value_name = "NAME", help = "Database connection")]
    pub connection: Option<String>,

    /// Run the migration without asking.
    #[arg(long = "force-migrate", help = "Run the migration without asking")]
    pub force_migrate: bool,

    /// Do not add `created_at` and `updated_at`.
    #[arg(long = "no-timestamps", help = "Skip timestamp fields")]
    pub no_timestamps: bool,

    /// Save the schema snapshot file, overriding config.
    #[arg(
        long = "save-schema",
        overrides_with = "no_save_schema",
        help = "Save the schema file"
    )]
    pub save_schema: bool,

    /// Do not save the schema snapshot file.
    #[arg(
        long = "no-save-schema",
        overrides_with = "save_schema",
        help = "Do not save the schema file"
    )]
    pub no_save_schema: bool,
}

impl GenerateArgs {
    /// `Some` when a save-schema flag was given.
    pub fn save_schema_override(&self) -> Option<bool> {
        match (self.save_schema, self.no_save_schema) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

/// Artifact family accepted by `--kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Kind {
    Api,
    Scaffold,
    #[value(alias = "api_scaffold")]
    ApiScaffold,
}

impl From<Kind> for GenerationKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Api => GenerationKind::Api,
            Kind::Scaffold => GenerationKind::Scaffold,
            Kind::ApiScaffold => GenerationKind::ApiScaffold,
        }
    }
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `crudsmith init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to the global config location.
    #[arg(long = "global", conflicts_with = "local", help = "Create global configuration")]
    pub global: bool,

    /// Write to `.crudsmith.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `crudsmith completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `crudsmith config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `generator.tests`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    fn generate(args: &[&str]) -> GenerateArgs {
        let mut argv = vec!["crudsmith", "generate"];
        argv.extend_from_slice(args);
        match Cli::parse_from(argv).command {
            Commands::Generate(args) => args,
            other => panic!("expected Generate, got {other:?}"),
        }
    }

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn generate_defaults() {
        let args = generate(&["Post"]);
        assert_eq!(args.model, "Post");
        assert_eq!(args.kind, Kind::ApiScaffold);
        assert!(args.fields_file.is_none());
        assert!(!args.from_table);
        assert_eq!(args.save_schema_override(), None);
    }

    #[test]
    fn ignore_fields_split_on_commas() {
        let args = generate(&["Post", "--from-table", "--ignore-fields", "a,b"]);
        assert_eq!(args.ignore_fields, ["a", "b"]);
    }

    #[test]
    fn ignore_fields_requires_from_table() {
        let result =
            Cli::try_parse_from(["crudsmith", "generate", "Post", "--ignore-fields", "a"]);
        assert!(result.is_err());
    }

    #[test]
    fn kind_maps_to_core() {
        let args = generate(&["Post", "--kind", "api"]);
        assert_eq!(GenerationKind::from(args.kind), GenerationKind::Api);
        let args = generate(&["Post", "-k", "api_scaffold"]);
        assert_eq!(GenerationKind::from(args.kind), GenerationKind::ApiScaffold);
    }

    #[test]
    fn kind_names_match_core_and_reject_unknown() {
        for kind in Kind::value_variants() {
            let name = kind.to_possible_value().map(|v| v.get_name().to_owned());
            assert_eq!(name.as_deref(), Some(GenerationKind::from(*kind).as_str()));
        }
        let err = Cli::try_parse_from(["crudsmith", "generate", "Post", "--kind", "web"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn last_save_schema_flag_wins() {
        assert_eq!(
            generate(&["Post", "--no-save-schema"]).save_schema_override(),
            Some(false)
        );
        assert_eq!(
            generate(&["Post", "--no-save-schema", "--save-schema"]).save_schema_override(),
            Some(true)
        );
    }

    #[test]
    fn generate_alias() {
        let cli = Cli::parse_from(["crudsmith", "g", "Post"]);
        assert!(matches!(cli.command, Commands::Generate(_)));
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["crudsmith", "--quiet", "--verbose", "types"]);
        assert!(result.is_err());
    }
}
