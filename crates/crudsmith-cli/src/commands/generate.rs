//! Implementation of the `crudsmith generate` command.
//!
//! Responsibility: turn CLI arguments and config into a `GeneratorConfig`,
//! fill it from the selected field source, save the schema snapshot and
//! report the generation plan. No parsing rules live here.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, instrument};

use crudsmith_adapters::{LocalFilesystem, SqliteSchemaReader};
use crudsmith_core::{
    application::{
        FieldSource, FieldSourceService, GenerationPlan, GeneratorConfig, InteractiveSession,
        IntrospectionService, MigrationAction, PlanFlags, PostAction, SaveOutcome, SchemaFileService,
        SchemaPaths, SessionSettings,
    },
    domain::{
        GenerationOptions, HINTS_SENTINEL, ModelNames, SchemaEntry, SkipStep, entries_for,
    },
};

use crate::{
    cli::GenerateArgs,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
    prompt,
};

/// Execute the `crudsmith generate` command.
///
/// Dispatch sequence:
/// 1. Derive model names and options from config and flags
/// 2. Pick the field source and populate the `GeneratorConfig`
/// 3. Save the schema snapshot (unless disabled or unchanged)
/// 4. Build the generation plan and print the result
#[instrument(skip_all, fields(model = %args.model))]
pub fn execute(args: GenerateArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    // 1. Names, options, aggregate
    let names = ModelNames::new(&args.model, args.plural.as_deref())?;
    let options = build_options(&args, &config)?;
    let connection = args
        .connection
        .clone()
        .unwrap_or_else(|| config.database.default_connection.clone());

    let mut generator = GeneratorConfig::new(names, connection, options);
    if let Some(table) = args.table.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        generator = generator.with_table_name(table);
    }

    // 2. Field source
    let source = FieldSource::select(
        args.fields_file.clone(),
        args.json_from_gui.clone(),
        args.from_table,
        args.ignore_fields.clone(),
    );
    info!(source = source.label(), table = generator.table_name(), "field source selected");

    let paths = SchemaPaths {
        base: config.paths.base.clone(),
        schema_dir: config.paths.schema_dir(),
    };
    let mut prompter = prompt::for_stdin();

    let loaded_from = match &source {
        FieldSource::Console => {
            if !output.is_json() {
                output.header(&format!(
                    "Fields for {} (type {HINTS_SENTINEL} for help)",
                    generator.names().name
                ))?;
            }
            let settings = SessionSettings {
                primary_name: args.primary.clone().unwrap_or_else(|| "id".into()),
                relations: args.relations,
                ask_validations: config.generator.ask_validations,
            };
            InteractiveSession::new(prompter.as_mut(), settings).run(&mut generator)?;
            None
        }
        FieldSource::JsonFile(path) => {
            let service = FieldSourceService::new(Box::new(LocalFilesystem::new()), paths);
            Some(service.load_json_file(path, &mut generator)?)
        }
        FieldSource::GuiPayload(json) => {
            let service = FieldSourceService::new(Box::new(LocalFilesystem::new()), paths);
            service.load_gui_payload(json, &mut generator)?;
            None
        }
        FieldSource::Table { ignored } => {
            let reader = open_reader(&config, generator.connection())?;
            let entries = IntrospectionService::new(Box::new(reader))
                .describe_table(generator.table_name(), ignored)?;
            generator.extend(entries);
            None
        }
    };

    // 3. Schema snapshot
    let schema_files = SchemaFileService::new(Box::new(LocalFilesystem::new()), config.paths.schema_dir());
    let saved = match loaded_from {
        Some(ref from) if same_file(from, &schema_files.path_for(&generator)) => {
            debug!(path = %from.display(), "fields came from the schema file itself");
            SaveOutcome::Kept(from.clone())
        }
        _ => schema_files.save(&generator, prompter.as_mut())?,
    };

    // 4. Plan + report
    let plan = GenerationPlan::build(
        args.kind.into(),
        &generator,
        PlanFlags {
            from_table: matches!(source, FieldSource::Table { .. }),
            force_migrate: args.force_migrate,
            from_gui: matches!(source, FieldSource::GuiPayload(_)),
        },
    );
    info!(
        fields = generator.fields().len(),
        relations = generator.relations().len(),
        artifacts = plan.artifacts.len(),
        "specification complete"
    );

    if output.is_json() {
        output.json(&Report::new(&generator, source.label(), &plan, &saved))
    } else {
        print_human(&generator, &plan, &saved, &output)
    }
}

// ── Options ───────────────────────────────────────────────────────────────────

/// Config defaults, then `--no-timestamps`, the save-schema flags and `--skip`.
pub fn build_options(args: &GenerateArgs, config: &AppConfig) -> CliResult<GenerationOptions> {
    let mut options = config.generator.to_options();
    if args.no_timestamps {
        options.timestamps = false;
    }
    if let Some(save) = args.save_schema_override() {
        options.save_schema_file = save;
    }
    if let Some(raw) = &args.skip {
        for step in SkipStep::parse_list(raw)? {
            options.skip(step);
        }
    }
    Ok(options)
}

fn open_reader(config: &AppConfig, connection: &str) -> CliResult<SqliteSchemaReader> {
    let path = config
        .connection_path(connection)
        .ok_or_else(|| CliError::UnknownConnection {
            name: connection.to_owned(),
            available: config.database.connections.keys().cloned().collect(),
        })?;
    debug!(connection, path = %path.display(), "opening database");
    Ok(SqliteSchemaReader::open(connection, &path)?)
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

// ── Reporting ─────────────────────────────────────────────────────────────────

/// Machine-readable result of one run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Report<'a> {
    model: &'a ModelNames,
    table_name: &'a str,
    connection: &'a str,
    source: &'static str,
    fields: Vec<SchemaEntry>,
    relations: Vec<String>,
    options: &'a GenerationOptions,
    plan: &'a GenerationPlan,
    schema_file: Option<&'a Path>,
}

impl<'a> Report<'a> {
    fn new(
        generator: &'a GeneratorConfig,
        source: &'static str,
        plan: &'a GenerationPlan,
        saved: &'a SaveOutcome,
    ) -> Self {
        Self {
            model: generator.names(),
            table_name: generator.table_name(),
            connection: generator.connection(),
            source,
            fields: entries_for(generator.fields(), &[]),
            relations: generator.relations().iter().map(|r| r.descriptor()).collect(),
            options: generator.options(),
            plan,
            schema_file: saved_path(saved),
        }
    }
}

fn saved_path(saved: &SaveOutcome) -> Option<&Path> {
    match saved {
        SaveOutcome::Written(p) | SaveOutcome::Kept(p) => Some(p.as_path()),
        SaveOutcome::Disabled => None,
    }
}

fn print_human(
    generator: &GeneratorConfig,
    plan: &GenerationPlan,
    saved: &SaveOutcome,
    output: &OutputManager,
) -> CliResult<()> {
    let names = generator.names();
    output.print("")?;
    output.header(&format!(
        "{} \u{2192} {} ({})",
        names.name,
        generator.table_name(),
        generator.connection()
    ))?;

    let width = generator
        .fields()
        .iter()
        .map(|f| f.name().len())
        .max()
        .unwrap_or(0);
    for field in generator.fields() {
        let descriptor = field.descriptor();
        let rest = descriptor
            .strip_prefix(field.name())
            .map(str::trim_start)
            .unwrap_or(&descriptor);
        let validations = field.validations().to_string();
        let line = if validations.is_empty() {
            rest.to_owned()
        } else {
            format!("{rest}  [{validations}]")
        };
        output.row(field.name(), &line, width)?;
    }

    if !generator.relations().is_empty() {
        output.print("")?;
        output.header("Relations")?;
        for relation in generator.relations() {
            output.print(&format!("  {}", relation.descriptor()))?;
        }
    }

    output.print("")?;
    output.header(&format!("Plan ({})", plan.kind))?;
    let artifacts: Vec<&str> = plan.artifacts.iter().map(|a| a.label()).collect();
    output.print(&format!("  {}", artifacts.join(", ")))?;
    let actions: Vec<&str> = plan.post_actions.iter().map(post_action_label).collect();
    output.print(&format!("  then: {}", actions.join(", ")))?;

    match saved {
        SaveOutcome::Written(path) => {
            output.success(&format!("Schema saved to {}", path.display()))?
        }
        SaveOutcome::Kept(path) => output.info(&format!("Schema kept at {}", path.display()))?,
        SaveOutcome::Disabled => {}
    }
    Ok(())
}

fn post_action_label(action: &PostAction) -> &'static str {
    match action {
        PostAction::SaveSchemaFile => "save schema file",
        PostAction::Migrate(MigrationAction::Run) => "run migration",
        PostAction::Migrate(MigrationAction::Confirm) => "ask to run migration",
        PostAction::Migrate(MigrationAction::Skip) => "no migration",
        PostAction::SaveLocaleFile => "save locale file",
        PostAction::DumpAutoload => "dump autoload",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    fn args(extra: &[&str]) -> GenerateArgs {
        let mut argv = vec!["crudsmith", "generate", "Post"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Commands::Generate(args) => args,
            other => panic!("expected Generate, got {other:?}"),
        }
    }

    #[test]
    fn options_follow_config_then_flags() {
        let mut config = AppConfig::default();
        config.generator.tests = true;
        config.generator.save_schema_file = false;

        let options = build_options(
            &args(&["--no-timestamps", "--save-schema", "--skip", "views,menu"]),
            &config,
        )
        .unwrap();
        assert!(options.tests);
        assert!(!options.timestamps);
        assert!(options.save_schema_file);
        assert!(options.is_skipped(SkipStep::Views));
        assert!(options.is_skipped(SkipStep::Menu));
    }

    #[test]
    fn unknown_skip_step_is_user_error() {
        let err = build_options(&args(&["--skip", "docs"]), &AppConfig::default()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn unknown_connection_is_configuration_error() {
        let err = open_reader(&AppConfig::default(), "legacy").unwrap_err();
        assert!(matches!(err, CliError::UnknownConnection { .. }));
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn post_action_labels() {
        assert_eq!(
            post_action_label(&PostAction::Migrate(MigrationAction::Confirm)),
            "ask to run migration"
        );
        assert_eq!(post_action_label(&PostAction::DumpAutoload), "dump autoload");
    }
}
