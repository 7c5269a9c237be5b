//! Which artifacts a run would generate.
//!
//! Rendering the artifacts is left to external generators; the plan is the
//! contract between them and the normalized configuration.

use std::fmt;

use serde::Serialize;

use crate::application::config::GeneratorConfig;
use crate::domain::SkipStep;

/// Family of artifacts to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenerationKind {
    Api,
    Scaffold,
    ApiScaffold,
}

impl GenerationKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Api => "api",
            Self::Scaffold => "scaffold",
            Self::ApiScaffold => "api-scaffold",
        }
    }

    const fn includes_api(&self) -> bool {
        matches!(self, Self::Api | Self::ApiScaffold)
    }

    const fn includes_scaffold(&self) -> bool {
        matches!(self, Self::Scaffold | Self::ApiScaffold)
    }
}

impl fmt::Display for GenerationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One generated file or file group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Artifact {
    Migration,
    Model,
    Repository,
    Factory,
    Seeder,
    ApiRequests,
    ApiController,
    ApiRoutes,
    RepositoryTest,
    ApiTest,
    ApiResource,
    Requests,
    Controller,
    Views,
    Routes,
    Menu,
}

impl Artifact {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Migration => "migration",
            Self::Model => "model",
            Self::Repository => "repository",
            Self::Factory => "factory",
            Self::Seeder => "seeder",
            Self::ApiRequests => "api requests",
            Self::ApiController => "api controller",
            Self::ApiRoutes => "api routes",
            Self::RepositoryTest => "repository test",
            Self::ApiTest => "api test",
            Self::ApiResource => "api resource",
            Self::Requests => "requests",
            Self::Controller => "controller",
            Self::Views => "views",
            Self::Routes => "routes",
            Self::Menu => "menu",
        }
    }
}

/// What happens to the generated migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationAction {
    Run,
    /// Ask before running.
    Confirm,
    Skip,
}

/// Steps performed after the artifacts are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "action", content = "mode")]
pub enum PostAction {
    SaveSchemaFile,
    Migrate(MigrationAction),
    SaveLocaleFile,
    DumpAutoload,
}

/// Run flags that influence the plan besides the options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanFlags {
    pub from_table: bool,
    pub force_migrate: bool,
    pub from_gui: bool,
}

/// Ordered artifacts and post actions for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationPlan {
    pub kind: GenerationKind,
    pub artifacts: Vec<Artifact>,
    pub post_actions: Vec<PostAction>,
}

impl GenerationPlan {
    pub fn build(kind: GenerationKind, config: &GeneratorConfig, flags: PlanFlags) -> Self {
        let options = config.options();
        let skipped = |step| options.is_skipped(step);
        let tests = options.tests && !skipped(SkipStep::Tests);
        let mut artifacts = Vec::new();

        // common
        if !flags.from_table && !skipped(SkipStep::Migration) {
            artifacts.push(Artifact::Migration);
        }
        if !skipped(SkipStep::Model) {
            artifacts.push(Artifact::Model);
        }
        if options.repository_pattern && !skipped(SkipStep::Repository) {
            artifacts.push(Artifact::Repository);
        }
        if options.factory || tests {
            artifacts.push(Artifact::Factory);
        }
        if options.seeder {
            artifacts.push(Artifact::Seeder);
        }

        if kind.includes_api() {
            if !skipped(SkipStep::Requests) && !skipped(SkipStep::ApiRequests) {
                artifacts.push(Artifact::ApiRequests);
            }
            if !skipped(SkipStep::Controllers) && !skipped(SkipStep::ApiController) {
                artifacts.push(Artifact::ApiController);
            }
            if !skipped(SkipStep::Routes) && !skipped(SkipStep::ApiRoutes) {
                artifacts.push(Artifact::ApiRoutes);
            }
            if tests {
                if options.repository_pattern {
                    artifacts.push(Artifact::RepositoryTest);
                }
                artifacts.push(Artifact::ApiTest);
            }
            if options.resources {
                artifacts.push(Artifact::ApiResource);
            }
        }

        if kind.includes_scaffold() {
            if !skipped(SkipStep::Requests) && !skipped(SkipStep::ScaffoldRequests) {
                artifacts.push(Artifact::Requests);
            }
            if !skipped(SkipStep::Controllers) && !skipped(SkipStep::ScaffoldController) {
                artifacts.push(Artifact::Controller);
            }
            if !skipped(SkipStep::Views) {
                artifacts.push(Artifact::Views);
            }
            if !skipped(SkipStep::Routes) && !skipped(SkipStep::ScaffoldRoutes) {
                artifacts.push(Artifact::Routes);
            }
            if !skipped(SkipStep::Menu) {
                artifacts.push(Artifact::Menu);
            }
        }

        let mut post_actions = Vec::new();
        if options.save_schema_file {
            post_actions.push(PostAction::SaveSchemaFile);
        }
        let migration = if flags.force_migrate {
            MigrationAction::Run
        } else if flags.from_table || skipped(SkipStep::Migration) {
            MigrationAction::Skip
        } else if flags.from_gui {
            MigrationAction::Run
        } else {
            MigrationAction::Confirm
        };
        post_actions.push(PostAction::Migrate(migration));
        if options.localized {
            post_actions.push(PostAction::SaveLocaleFile);
        }
        if !skipped(SkipStep::DumpAutoload) {
            post_actions.push(PostAction::DumpAutoload);
        }

        Self {
            kind,
            artifacts,
            post_actions,
        }
    }

    pub fn migration_action(&self) -> MigrationAction {
        self.post_actions
            .iter()
            .find_map(|a| match a {
                PostAction::Migrate(m) => Some(*m),
                _ => None,
            })
            .unwrap_or(MigrationAction::Skip)
    }
}
