//! Generation options: feature toggles and the skip list.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// A named generation step that can be skipped with `--skip`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipStep {
    Migration,
    Model,
    Controllers,
    ApiController,
    ScaffoldController,
    Repository,
    Requests,
    ApiRequests,
    ScaffoldRequests,
    Routes,
    ApiRoutes,
    ScaffoldRoutes,
    Views,
    Tests,
    Menu,
    #[serde(rename = "dump-autoload")]
    DumpAutoload,
}

impl SkipStep {
    pub const ALL: [SkipStep; 16] = [
        SkipStep::Migration,
        SkipStep::Model,
        SkipStep::Controllers,
        SkipStep::ApiController,
        SkipStep::ScaffoldController,
        SkipStep::Repository,
        SkipStep::Requests,
        SkipStep::ApiRequests,
        SkipStep::ScaffoldRequests,
        SkipStep::Routes,
        SkipStep::ApiRoutes,
        SkipStep::ScaffoldRoutes,
        SkipStep::Views,
        SkipStep::Tests,
        SkipStep::Menu,
        SkipStep::DumpAutoload,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Migration => "migration",
            Self::Model => "model",
            Self::Controllers => "controllers",
            Self::ApiController => "api_controller",
            Self::ScaffoldController => "scaffold_controller",
            Self::Repository => "repository",
            Self::Requests => "requests",
            Self::ApiRequests => "api_requests",
            Self::ScaffoldRequests => "scaffold_requests",
            Self::Routes => "routes",
            Self::ApiRoutes => "api_routes",
            Self::ScaffoldRoutes => "scaffold_routes",
            Self::Views => "views",
            Self::Tests => "tests",
            Self::Menu => "menu",
            Self::DumpAutoload => "dump-autoload",
        }
    }

    /// Parse a comma-separated skip list, e.g. `migration,views`.
    pub fn parse_list(raw: &str) -> Result<BTreeSet<Self>, DomainError> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse)
            .collect()
    }
}

impl fmt::Display for SkipStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SkipStep {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|step| step.as_str() == s)
            .copied()
            .ok_or_else(|| DomainError::UnknownSkipStep { step: s.to_owned() })
    }
}

/// Feature toggles plus the set of skipped steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationOptions {
    pub repository_pattern: bool,
    pub tests: bool,
    pub factory: bool,
    pub seeder: bool,
    pub resources: bool,
    pub localized: bool,
    pub save_schema_file: bool,
    pub timestamps: bool,
    pub skip: BTreeSet<SkipStep>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            repository_pattern: true,
            tests: false,
            factory: false,
            seeder: false,
            resources: false,
            localized: false,
            save_schema_file: true,
            timestamps: true,
            skip: BTreeSet::new(),
        }
    }
}

impl GenerationOptions {
    pub fn is_skipped(&self, step: SkipStep) -> bool {
        self.skip.contains(&step)
    }

    pub fn skip(&mut self, step: SkipStep) {
        self.skip.insert(step);
    }

    /// Apply the toggles present in `overrides`; absent ones are untouched.
    pub fn merge(&mut self, overrides: &OptionOverrides) {
        let targets = [
            (overrides.repository_pattern, &mut self.repository_pattern),
            (overrides.tests, &mut self.tests),
            (overrides.factory, &mut self.factory),
            (overrides.seeder, &mut self.seeder),
            (overrides.resources, &mut self.resources),
            (overrides.localized, &mut self.localized),
            (overrides.save_schema_file, &mut self.save_schema_file),
        ];
        for (value, slot) in targets {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }
}

/// Optional toggles supplied by a GUI payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OptionOverrides {
    pub repository_pattern: Option<bool>,
    pub tests: Option<bool>,
    pub factory: Option<bool>,
    pub seeder: Option<bool>,
    pub resources: Option<bool>,
    pub localized: Option<bool>,
    pub save_schema_file: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_skip_list() {
        let steps = SkipStep::parse_list("migration, views,dump-autoload").unwrap();
        assert!(steps.contains(&SkipStep::Migration));
        assert!(steps.contains(&SkipStep::Views));
        assert!(steps.contains(&SkipStep::DumpAutoload));
        assert_eq!(steps.len(), 3);
    }

    #[test]
    fn unknown_skip_step_fails() {
        assert_eq!(
            SkipStep::parse_list("model,everything"),
            Err(DomainError::UnknownSkipStep {
                step: "everything".into()
            })
        );
    }

    #[test]
    fn merge_only_touches_present_toggles() {
        let mut options = GenerationOptions::default();
        options.merge(&OptionOverrides {
            tests: Some(true),
            repository_pattern: Some(false),
            ..Default::default()
        });
        assert!(options.tests);
        assert!(!options.repository_pattern);
        assert!(options.save_schema_file);
    }
}
