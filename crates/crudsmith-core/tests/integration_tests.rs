//! Integration tests for crudsmith-core, through the public API only.

use std::collections::VecDeque;

use crudsmith_core::application::ports::resolve_choice;
use crudsmith_core::domain::{
    DbType, RelationKind, RelationSpec, parse_field_input, validate_field_input,
};
use crudsmith_core::prelude::*;

/// Answers from a queue; stream closes when it runs dry.
struct Queue(VecDeque<&'static str>);

impl Queue {
    fn next(&mut self) -> CrudsmithResult<String> {
        self.0
            .pop_front()
            .map(str::to_owned)
            .ok_or(CrudsmithError::Application(ApplicationError::InputClosed))
    }
}

impl Prompter for Queue {
    fn input(&mut self, _: &str, default: Option<&str>) -> CrudsmithResult<String> {
        let answer = self.next()?;
        Ok(match default {
            Some(d) if answer.is_empty() => d.to_owned(),
            _ => answer,
        })
    }

    fn select(&mut self, _: &str, items: &[String], default: usize) -> CrudsmithResult<usize> {
        let answer = self.next()?;
        Ok(resolve_choice(items, &answer).unwrap_or(default))
    }

    fn multi_select(&mut self, _: &str, items: &[String], _: &[bool]) -> CrudsmithResult<Vec<usize>> {
        let answer = self.next()?;
        Ok(answer
            .split(',')
            .filter_map(|a| resolve_choice(items, a))
            .collect())
    }

    fn confirm(&mut self, _: &str, default: bool) -> CrudsmithResult<bool> {
        Ok(self.next()? == "y" || default)
    }

    fn note(&mut self, _: &str) -> CrudsmithResult<()> {
        Ok(())
    }

    fn error(&mut self, _: &str) -> CrudsmithResult<()> {
        Ok(())
    }
}

fn config() -> GeneratorConfig {
    GeneratorConfig::new(
        ModelNames::new("post", None).unwrap(),
        "main",
        GenerationOptions::default(),
    )
}

#[test]
fn descriptor_round_trip_normalizes_option_order() {
    let lines = [
        ("title string text s", "title string text s"),
        ("body text textarea ii,if,s", "body text textarea s,if,ii"),
        ("secret string password iv,if", "secret string password iv"),
        ("price decimal number NO", "price decimal number"),
        ("meta json", "meta json text"),
    ];
    for (line, expected) in lines {
        let field = parse_field_input(line).unwrap();
        assert_eq!(field.descriptor(), expected, "{line}");
        assert_eq!(parse_field_input(&field.descriptor()).unwrap(), field);
    }
}

#[test]
fn precheck_agrees_with_parse() {
    for line in ["", "title", "   ", "title nope", "title string text", "9x string"] {
        assert_eq!(validate_field_input(line), parse_field_input(line).is_ok(), "{line}");
    }
    assert!(!validate_field_input("title"));
}

#[test]
fn relation_arity_per_kind() {
    let cases = [
        ("mt1,Author,author_id", RelationKind::BelongsTo, 3),
        ("1t1,Profile,user_id,id", RelationKind::HasOne, 3),
        ("1tm,Comment,post_id", RelationKind::HasMany, 3),
        ("mtm,Tag,post_tag,post_id,tag_id", RelationKind::BelongsToMany, 4),
    ];
    for (descriptor, kind, len) in cases {
        let relation = RelationSpec::parse(descriptor).unwrap();
        assert_eq!(relation.kind(), kind);
        assert_eq!(relation.inputs().len(), len);
    }
    assert!(matches!(
        RelationSpec::parse("m2m,Tag"),
        Err(DomainError::InvalidRelationInput { .. })
    ));
}

#[test]
fn console_session_mixes_shorthand_and_prompts() {
    let mut prompter = Queue(VecDeque::from([
        "belongsTo-Author",
        "age:int:",
        "summary",
        "text",
        "textarea",
        "ii",
        ".exit",
    ]));
    let mut config = config();
    InteractiveSession::new(&mut prompter, SessionSettings::default())
        .run(&mut config)
        .unwrap();

    let names: Vec<&str> = config.fields().iter().map(FieldSpec::name).collect();
    assert_eq!(
        names,
        ["id", "author_id", "age", "summary", "created_at", "updated_at"]
    );
    assert_eq!(config.fields()[1].db_type(), DbType::ForeignId);
    assert!(config.fields()[1].validations().contains("exists:authors,id"));
    assert_eq!(config.fields()[3].descriptor(), "summary text textarea ii");
    assert_eq!(config.relations()[0].inputs(), ["Author", "author_id", "id"]);
}

#[test]
fn plan_for_gui_run_migrates() {
    let mut config = config();
    let payload = GuiPayload::parse(r#"{"migrate": true, "fields": []}"#).unwrap();
    config.override_from_payload(&payload);

    let plan = GenerationPlan::build(
        GenerationKind::ApiScaffold,
        &config,
        crudsmith_core::application::PlanFlags {
            from_gui: true,
            ..Default::default()
        },
    );
    assert_eq!(
        plan.migration_action(),
        crudsmith_core::application::MigrationAction::Run
    );
}
