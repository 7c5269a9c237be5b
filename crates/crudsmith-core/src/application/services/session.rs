//! Interactive console session.
//!
//! A turn-based state machine that turns prompt answers into fields and
//! relations on a [`GeneratorConfig`]. Each answer at the property prompt is
//! classified by [`PropertyToken`]; parse failures are reported through the
//! prompter and never abort the session.
//!
//! ```text
//! AwaitingPropertyName ─┬─ shorthand ──────────────────────────┐
//!                       └─ AwaitingDbType → AwaitingHtmlType    │
//!                                        → AwaitingOptions ─────┤
//!                                                               ▼
//!                                                          Composing
//!                                                               │
//!          AwaitingValidations → AwaitingRelation → Committed ◄─┘
//!                                                     │
//!                                 AwaitingPropertyName ◄┘   (.exit → Finished)
//! ```

use heck::ToUpperCamelCase;
use tracing::{debug, info, instrument, warn};

use crate::application::ApplicationError;
use crate::application::config::GeneratorConfig;
use crate::application::ports::Prompter;
use crate::domain::{
    DbType, FieldOption, FieldSpec, HINTS, HtmlType, PropertyToken, RelationKind, RelationSpec,
    ShorthandKind, Validations, parse_field_input_with_validations, pluralize,
    validate_field_input,
};
use crate::error::{CrudsmithError, CrudsmithResult};

/// Message shown whenever an answer is rejected.
pub const INVALID_INPUT: &str = "Invalid Input. Try again";

const CREATED_AT: &str = "created_at";
const UPDATED_AT: &str = "updated_at";

/// Knobs of one console session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    /// Name of the implicit primary key.
    pub primary_name: String,
    /// Ask for a freeform relation after every field.
    pub relations: bool,
    /// Ask for validations instead of using the defaults.
    pub ask_validations: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            primary_name: "id".into(),
            relations: false,
            ask_validations: false,
        }
    }
}

/// Field being assembled before it is validated.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Draft {
    name: String,
    db_type: DbType,
    html_type: HtmlType,
    options: Vec<String>,
    validations: Validations,
    relation: Option<RelationSpec>,
    from_shorthand: bool,
}

impl Draft {
    fn plain(name: String, db_type: DbType, html_type: HtmlType, options: Vec<String>) -> Self {
        Self {
            name,
            db_type,
            html_type,
            options,
            validations: Validations::new().with("required"),
            relation: None,
            from_shorthand: false,
        }
    }

    fn shorthand(name: String, db_type: DbType) -> Self {
        Self {
            from_shorthand: true,
            ..Self::plain(name, db_type, db_type.default_html_type(), Vec::new())
        }
    }

    /// One-line descriptor handed to the field parser.
    fn descriptor(&self) -> String {
        let mut line = format!("{} {} {}", self.name, self.db_type, self.html_type);
        if !self.options.is_empty() {
            line.push(' ');
            line.push_str(&self.options.join(","));
        }
        line
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    AwaitingPropertyName,
    AwaitingDbType {
        name: String,
    },
    AwaitingHtmlType {
        name: String,
        db_type: DbType,
    },
    AwaitingOptions {
        name: String,
        db_type: DbType,
        html_type: HtmlType,
    },
    Composing(Draft),
    AwaitingValidations {
        field: FieldSpec,
        defaults: Validations,
        relation: Option<RelationSpec>,
    },
    AwaitingRelation {
        field: FieldSpec,
        relation: Option<RelationSpec>,
    },
    Committed {
        field: FieldSpec,
        relation: Option<RelationSpec>,
    },
    Finished,
}

/// Console session driving a [`Prompter`].
pub struct InteractiveSession<'p> {
    prompter: &'p mut dyn Prompter,
    settings: SessionSettings,
}

impl<'p> InteractiveSession<'p> {
    pub fn new(prompter: &'p mut dyn Prompter, settings: SessionSettings) -> Self {
        Self { prompter, settings }
    }

    /// Run the session to completion, appending to `config`.
    ///
    /// The primary key is added first; timestamps are added after `.exit`
    /// when enabled. A closed input stream ends the session like `.exit`,
    /// discarding any half-entered field.
    #[instrument(skip_all, fields(model = %config.names().name))]
    pub fn run(&mut self, config: &mut GeneratorConfig) -> CrudsmithResult<()> {
        config.push_field(FieldSpec::primary_key(self.settings.primary_name.as_str())?);
        self.prompter.note(&format!(
            "Adding properties to {} ({} for shorthand help)",
            config.names().name,
            crate::domain::HINTS_SENTINEL
        ))?;

        let mut state = State::AwaitingPropertyName;
        loop {
            state = match self.step(state, config) {
                Ok(State::Finished) => break,
                Ok(next) => next,
                Err(CrudsmithError::Application(ApplicationError::InputClosed)) => {
                    warn!("input closed, finishing session");
                    break;
                }
                Err(e) => return Err(e),
            };
        }

        if config.options().timestamps {
            config.push_field(FieldSpec::timestamp(CREATED_AT)?);
            config.push_field(FieldSpec::timestamp(UPDATED_AT)?);
        }
        info!(
            fields = config.fields().len(),
            relations = config.relations().len(),
            "session finished"
        );
        Ok(())
    }

    fn step(&mut self, state: State, config: &mut GeneratorConfig) -> CrudsmithResult<State> {
        match state {
            State::AwaitingPropertyName => self.ask_property_name(config),
            State::AwaitingDbType { name } => self.ask_db_type(name),
            State::AwaitingHtmlType { name, db_type } => self.ask_html_type(name, db_type),
            State::AwaitingOptions {
                name,
                db_type,
                html_type,
            } => self.ask_options(name, db_type, html_type),
            State::Composing(draft) => self.compose(draft, config),
            State::AwaitingValidations {
                field,
                defaults,
                relation,
            } => self.ask_validations(field, defaults, relation),
            State::AwaitingRelation { field, relation } => self.ask_relation(field, relation),
            State::Committed { field, relation } => self.commit(field, relation, config),
            State::Finished => Ok(State::Finished),
        }
    }

    fn ask_property_name(&mut self, config: &GeneratorConfig) -> CrudsmithResult<State> {
        let answer = self
            .prompter
            .input("Enter property name (.exit to finish)", None)?;

        let token = match PropertyToken::parse(&answer) {
            Ok(token) => token,
            Err(e) => {
                debug!(error = %e, "rejected property name");
                self.prompter.error(INVALID_INPUT)?;
                return Ok(State::AwaitingPropertyName);
            }
        };

        Ok(match token {
            PropertyToken::Exit => State::Finished,
            PropertyToken::Hints => {
                for hint in HINTS {
                    self.prompter
                        .note(&format!("{:<20} {}", hint.token, hint.description))?;
                }
                State::AwaitingPropertyName
            }
            PropertyToken::ShorthandRelation { kind, model } => {
                State::Composing(relation_shorthand(kind, &model))
            }
            PropertyToken::ShorthandField { kind, name } => {
                State::Composing(type_shorthand(kind, name))
            }
            PropertyToken::PlainName(name) => match name_clash(&name, config) {
                Some(message) => {
                    self.prompter.error(&message)?;
                    State::AwaitingPropertyName
                }
                None => State::AwaitingDbType { name },
            },
        })
    }

    fn ask_db_type(&mut self, name: String) -> CrudsmithResult<State> {
        let items: Vec<String> = DbType::ALL.iter().map(|t| t.as_str().to_owned()).collect();
        let default = DbType::ALL
            .iter()
            .position(|t| *t == DbType::String)
            .unwrap_or_default();
        let index = self
            .prompter
            .select(&format!("Select db type for '{name}'"), &items, default)?;
        let db_type = DbType::ALL.get(index).copied().unwrap_or(DbType::String);

        Ok(if db_type.has_html_suggestions() {
            State::AwaitingHtmlType { name, db_type }
        } else {
            State::Composing(Draft::plain(name, db_type, HtmlType::Text, Vec::new()))
        })
    }

    fn ask_html_type(&mut self, name: String, db_type: DbType) -> CrudsmithResult<State> {
        let suggestions = db_type.html_suggestions();
        let items: Vec<String> = suggestions.iter().map(|h| h.as_str().to_owned()).collect();
        let index = self
            .prompter
            .select(&format!("Select html type for '{name}'"), &items, 0)?;
        let html_type = suggestions
            .get(index)
            .copied()
            .unwrap_or_else(|| db_type.default_html_type());

        Ok(State::AwaitingOptions {
            name,
            db_type,
            html_type,
        })
    }

    fn ask_options(
        &mut self,
        name: String,
        db_type: DbType,
        html_type: HtmlType,
    ) -> CrudsmithResult<State> {
        let codes: Vec<&str> = std::iter::once(FieldOption::NONE_CODE)
            .chain(FieldOption::ALL.iter().map(FieldOption::code))
            .collect();
        let items: Vec<String> = std::iter::once(format!("{} (no options)", FieldOption::NONE_CODE))
            .chain(
                FieldOption::ALL
                    .iter()
                    .map(|o| format!("{} ({})", o.code(), o.description())),
            )
            .collect();
        let mut defaults = vec![false; items.len()];
        defaults[0] = true;

        let picked = self.prompter.multi_select(
            &format!("Select options for '{name}'"),
            &items,
            &defaults,
        )?;
        let options = picked
            .into_iter()
            .filter_map(|i| codes.get(i).map(|c| (*c).to_owned()))
            .collect();

        Ok(State::Composing(Draft::plain(
            name, db_type, html_type, options,
        )))
    }

    fn compose(&mut self, draft: Draft, config: &GeneratorConfig) -> CrudsmithResult<State> {
        let line = draft.descriptor();
        let retry = || {
            if draft.from_shorthand {
                State::AwaitingPropertyName
            } else {
                State::AwaitingDbType {
                    name: draft.name.clone(),
                }
            }
        };

        if let Some(message) = name_clash(&draft.name, config) {
            self.prompter.error(&message)?;
            return Ok(State::AwaitingPropertyName);
        }
        if !validate_field_input(&line) {
            debug!(line, "composed descriptor rejected");
            self.prompter.error(INVALID_INPUT)?;
            return Ok(retry());
        }

        match parse_field_input_with_validations(&line, &draft.validations.to_string()) {
            Ok(field) => Ok(State::AwaitingValidations {
                field,
                defaults: draft.validations,
                relation: draft.relation,
            }),
            Err(e) => {
                debug!(error = %e, "composed descriptor rejected");
                self.prompter.error(INVALID_INPUT)?;
                Ok(retry())
            }
        }
    }

    fn ask_validations(
        &mut self,
        field: FieldSpec,
        defaults: Validations,
        relation: Option<RelationSpec>,
    ) -> CrudsmithResult<State> {
        let validations = if self.settings.ask_validations {
            let default = defaults.to_string();
            let answer = self.prompter.input(
                &format!("Enter validations for '{}'", field.name()),
                Some(default.as_str()),
            )?;
            Validations::parse(&answer)
        } else {
            defaults
        };
        let field = field.with_validations(validations);

        Ok(if self.settings.relations {
            State::AwaitingRelation { field, relation }
        } else {
            State::Committed { field, relation }
        })
    }

    fn ask_relation(
        &mut self,
        field: FieldSpec,
        relation: Option<RelationSpec>,
    ) -> CrudsmithResult<State> {
        let answer = self
            .prompter
            .input("Enter relationship (Leave Blank to skip)", Some(""))?;
        if answer.trim().is_empty() {
            return Ok(State::Committed { field, relation });
        }

        match RelationSpec::parse(&answer) {
            Ok(freeform) => {
                if let Some(previous) = &relation {
                    debug!(%previous, %freeform, "freeform relation replaces shorthand");
                }
                Ok(State::Committed {
                    field,
                    relation: Some(freeform),
                })
            }
            Err(e) => {
                self.prompter.error(&e.to_string())?;
                Ok(State::AwaitingRelation { field, relation })
            }
        }
    }

    fn commit(
        &mut self,
        field: FieldSpec,
        relation: Option<RelationSpec>,
        config: &mut GeneratorConfig,
    ) -> CrudsmithResult<State> {
        let mut summary = format!("Added {field}");
        if !field.validations().is_empty() {
            summary.push_str(&format!(" [{}]", field.validations()));
        }
        if let Some(relation) = &relation {
            summary.push_str(&format!(" with {relation}"));
        }

        config.push_field(field);
        if let Some(relation) = relation {
            config.push_relation(relation);
        }

        self.prompter.note(&summary)?;
        let names: Vec<&str> = config.fields().iter().map(FieldSpec::name).collect();
        self.prompter
            .note(&format!("Properties: {}", names.join(", ")))?;
        Ok(State::AwaitingPropertyName)
    }
}

/// Why `name` can not be added: it exists already, or it is a timestamp
/// column appended automatically at the end of the session.
fn name_clash(name: &str, config: &GeneratorConfig) -> Option<String> {
    if config.has_field(name) {
        Some(format!("Property '{name}' already exists"))
    } else if config.options().timestamps && [CREATED_AT, UPDATED_AT].contains(&name) {
        Some(format!("Property '{name}' is added with the timestamps"))
    } else {
        None
    }
}

/// `belongsTo-author` → `author_id foreignId:constrained` + relation.
///
/// The field keeps the model's casing past the first letter
/// (`belongsTo-BlogPost` → `blogPost_id`); the `exists` table is the
/// fully lowercased plural (`blogposts`).
fn relation_shorthand(kind: RelationKind, model: &str) -> Draft {
    let name = format!("{}_id", lowercase_first(model));

    let mut draft = Draft::shorthand(name.clone(), DbType::ForeignId);
    draft.validations.push("numeric");
    if kind.requires_existing_related() {
        draft
            .validations
            .push(format!("exists:{},id", pluralize(&model.to_lowercase())));
    }
    draft.relation = Some(RelationSpec::single(
        kind,
        model.to_upper_camel_case(),
        name,
        crate::domain::DEFAULT_LOCAL_KEY,
    ));
    draft
}

fn lowercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `age:int:` → `age integer`.
fn type_shorthand(kind: ShorthandKind, name: String) -> Draft {
    let mut draft = Draft::shorthand(name, kind.db_type());
    if kind == ShorthandKind::Int {
        draft.validations.push("numeric");
    }
    draft
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::ScriptedPrompter;
    use crate::domain::{GenerationOptions, ModelNames};

    fn config() -> GeneratorConfig {
        GeneratorConfig::new(
            ModelNames::new("Post", None).unwrap(),
            "main",
            GenerationOptions::default(),
        )
    }

    fn run(answers: &[&str], settings: SessionSettings) -> (GeneratorConfig, ScriptedPrompter) {
        let mut prompter = ScriptedPrompter::new(answers.iter().copied());
        let mut config = config();
        InteractiveSession::new(&mut prompter, settings)
            .run(&mut config)
            .unwrap();
        (config, prompter)
    }

    fn names(config: &GeneratorConfig) -> Vec<&str> {
        config.fields().iter().map(FieldSpec::name).collect()
    }

    #[test]
    fn exit_first_yields_only_implicit_fields() {
        let (config, _) = run(&[".exit"], SessionSettings::default());
        assert_eq!(names(&config), ["id", "created_at", "updated_at"]);
        assert!(config.fields()[0].is_primary());
        assert!(!config.fields()[1].is_fillable());
        assert!(config.relations().is_empty());
    }

    #[test]
    fn exit_without_timestamps_yields_primary_only() {
        let mut prompter = ScriptedPrompter::new([".exit"]);
        let options = GenerationOptions {
            timestamps: false,
            ..GenerationOptions::default()
        };
        let mut config = GeneratorConfig::new(ModelNames::new("Post", None).unwrap(), "main", options);
        InteractiveSession::new(&mut prompter, SessionSettings::default())
            .run(&mut config)
            .unwrap();
        assert_eq!(names(&config), ["id"]);
    }

    #[test]
    fn custom_primary_name() {
        let settings = SessionSettings {
            primary_name: "post_id".into(),
            ..SessionSettings::default()
        };
        let (config, _) = run(&[".exit"], settings);
        assert_eq!(config.primary_field().map(FieldSpec::name), Some("post_id"));
    }

    #[test]
    fn belongs_to_shorthand() {
        let (config, _) = run(&["belongsTo-Author", ".exit"], SessionSettings::default());
        let field = &config.fields()[1];
        assert_eq!(field.name(), "author_id");
        assert_eq!(field.db_type(), DbType::ForeignId);
        assert_eq!(field.html_type(), HtmlType::Number);
        assert_eq!(field.validations().to_string(), "required|numeric|exists:authors,id");

        let relation = &config.relations()[0];
        assert_eq!(relation.kind(), RelationKind::BelongsTo);
        assert_eq!(relation.inputs(), ["Author", "author_id", "id"]);
    }

    #[test]
    fn multi_word_shorthand_lowercases_only_the_first_letter() {
        let (config, _) = run(&["belongsTo-BlogPost", ".exit"], SessionSettings::default());
        let field = &config.fields()[1];
        assert_eq!(field.name(), "blogPost_id");
        assert_eq!(
            field.validations().to_string(),
            "required|numeric|exists:blogposts,id"
        );
        assert_eq!(config.relations()[0].descriptor(), "mt1,BlogPost,blogPost_id,id");
    }

    #[test]
    fn has_many_shorthand_skips_exists_rule() {
        let (config, _) = run(&[":hasMany-comment", ".exit"], SessionSettings::default());
        let field = &config.fields()[1];
        assert_eq!(field.name(), "comment_id");
        assert!(!field.validations().iter().any(|v| v.starts_with("exists:")));
        assert_eq!(config.relations()[0].descriptor(), "1tm,Comment,comment_id,id");
    }

    #[test]
    fn int_shorthand() {
        let (config, _) = run(&["age:int:", ".exit"], SessionSettings::default());
        let field = &config.fields()[1];
        assert_eq!(field.name(), "age");
        assert_eq!(field.db_type(), DbType::Integer);
        assert!(field.validations().contains("numeric"));
        assert!(field.validations().contains("required"));
    }

    #[test]
    fn plain_path_prompts_for_types_and_options() {
        let (config, prompter) = run(
            &["email", "string", "email", "s,if", ".exit"],
            SessionSettings::default(),
        );
        let field = &config.fields()[1];
        assert_eq!(field.descriptor(), "email string email s,if");
        assert_eq!(field.validations().to_string(), "required");
        assert!(prompter.notes.iter().any(|n| n.starts_with("Added email")));
    }

    #[test]
    fn no_option_is_dropped_when_others_selected() {
        let (config, _) = run(&["title", "", "", "NO,f", ".exit"], SessionSettings::default());
        let field = &config.fields()[1];
        assert_eq!(field.descriptor(), "title string text f");
    }

    #[test]
    fn type_without_suggestions_skips_html_and_options() {
        let (config, prompter) = run(&["meta", "json", ".exit"], SessionSettings::default());
        let field = &config.fields()[1];
        assert_eq!(field.html_type(), HtmlType::Text);
        assert!(!prompter.prompts.iter().any(|p| p.contains("html type")));
    }

    #[test]
    fn bad_name_reprompts_without_state_change() {
        let (config, prompter) = run(&["1abc", "", ".exit"], SessionSettings::default());
        assert_eq!(names(&config), ["id", "created_at", "updated_at"]);
        assert_eq!(prompter.errors, [INVALID_INPUT, INVALID_INPUT]);
    }

    #[test]
    fn hints_are_shown_without_consuming_a_field() {
        let (config, prompter) = run(&[".hints", ".exit"], SessionSettings::default());
        assert_eq!(config.fields().len(), 3);
        assert!(prompter.notes.iter().any(|n| n.contains("belongsTo-author")));
    }

    #[test]
    fn duplicate_property_is_rejected() {
        let (config, prompter) = run(&["title:str:", "title:str:", ".exit"], SessionSettings::default());
        assert_eq!(names(&config), ["id", "title", "created_at", "updated_at"]);
        assert_eq!(prompter.errors.len(), 1);
    }

    #[test]
    fn timestamp_names_are_reserved_while_timestamps_are_on() {
        let (config, prompter) = run(
            &["created_at", "updated_at:str:", "published_at", "timestamp", "", "", ".exit"],
            SessionSettings::default(),
        );
        assert_eq!(
            names(&config),
            ["id", "published_at", "created_at", "updated_at"]
        );
        assert_eq!(prompter.errors.len(), 2);
        assert!(prompter.errors[0].contains("timestamps"));
    }

    #[test]
    fn timestamp_names_are_free_without_timestamps() {
        let mut prompter = ScriptedPrompter::new(["created_at", "timestamp", "", "", ".exit"]);
        let options = GenerationOptions {
            timestamps: false,
            ..GenerationOptions::default()
        };
        let mut config = GeneratorConfig::new(ModelNames::new("Post", None).unwrap(), "main", options);
        InteractiveSession::new(&mut prompter, SessionSettings::default())
            .run(&mut config)
            .unwrap();
        assert_eq!(names(&config), ["id", "created_at"]);
    }

    #[test]
    fn freeform_relation_replaces_shorthand() {
        let settings = SessionSettings {
            relations: true,
            ..SessionSettings::default()
        };
        let (config, _) = run(&["belongsTo-author", "mt1,Writer,author_id", ".exit"], settings);
        assert_eq!(config.relations().len(), 1);
        assert_eq!(config.relations()[0].model(), "Writer");
    }

    #[test]
    fn blank_relation_keeps_shorthand() {
        let settings = SessionSettings {
            relations: true,
            ..SessionSettings::default()
        };
        let (config, _) = run(&["belongsTo-author", "", ".exit"], settings);
        assert_eq!(config.relations()[0].model(), "Author");
    }

    #[test]
    fn invalid_relation_is_reprompted() {
        let settings = SessionSettings {
            relations: true,
            ..SessionSettings::default()
        };
        let (config, prompter) = run(&["title:str:", "xx,Tag", "mtm,Tag", ".exit"], settings);
        assert_eq!(prompter.errors.len(), 1);
        assert_eq!(config.relations()[0].kind(), RelationKind::BelongsToMany);
    }

    #[test]
    fn asked_validations_default_to_required() {
        let settings = SessionSettings {
            ask_validations: true,
            ..SessionSettings::default()
        };
        let (config, _) = run(&["age:int:", "", "bio:str:", "nullable|max:200", ".exit"], settings);
        assert_eq!(config.fields()[1].validations().to_string(), "required|numeric");
        assert_eq!(config.fields()[2].validations().to_string(), "nullable|max:200");
    }

    #[test]
    fn closed_input_mid_field_discards_draft() {
        let (config, _) = run(&["title", "string"], SessionSettings::default());
        assert_eq!(names(&config), ["id", "created_at", "updated_at"]);
    }

    #[test]
    fn shorthand_draft_that_fails_validation_returns_to_name() {
        let mut draft = Draft::shorthand("flag".into(), DbType::Boolean);
        draft.html_type = HtmlType::Email;
        let mut prompter = ScriptedPrompter::default();
        let mut session = InteractiveSession::new(&mut prompter, SessionSettings::default());
        let next = session.compose(draft, &config()).unwrap();
        assert_eq!(next, State::AwaitingPropertyName);
    }

    #[test]
    fn plain_draft_that_fails_validation_returns_to_db_type() {
        let draft = Draft::plain("flag".into(), DbType::Boolean, HtmlType::Email, Vec::new());
        let mut prompter = ScriptedPrompter::default();
        let mut session = InteractiveSession::new(&mut prompter, SessionSettings::default());
        let next = session.compose(draft, &config()).unwrap();
        assert_eq!(next, State::AwaitingDbType { name: "flag".into() });
        drop(session);
        assert_eq!(prompter.errors, [INVALID_INPUT]);
    }
}
