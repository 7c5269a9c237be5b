//! Tokenizer for answers to the interactive "property name" prompt.
//!
//! An answer is classified exactly once into a [`PropertyToken`]; the session
//! state machine only ever matches on the variant.
//!
//! | answer                  | token                                         |
//! |-------------------------|-----------------------------------------------|
//! | `.exit`                 | `Exit`                                        |
//! | `.hints`                | `Hints`                                       |
//! | `age:int:` / `:int:age` | `ShorthandField { kind: Int, name: "age" }`   |
//! | `belongsTo-Author`      | `ShorthandRelation { kind: BelongsTo, .. }`   |
//! | `title`                 | `PlainName("title")`                          |

use crate::domain::error::DomainError;
use crate::domain::field::{DbType, is_identifier};
use crate::domain::relation::RelationKind;

pub const EXIT_SENTINEL: &str = ".exit";
pub const HINTS_SENTINEL: &str = ".hints";

/// Separates a relation prefix from the related model name.
const RELATION_DELIMITER: char = '-';

/// Inline type shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShorthandKind {
    Str,
    Int,
    Bool,
}

impl ShorthandKind {
    pub const ALL: [ShorthandKind; 3] = [ShorthandKind::Str, ShorthandKind::Int, ShorthandKind::Bool];

    pub const fn marker(&self) -> &'static str {
        match self {
            Self::Str => ":str:",
            Self::Int => ":int:",
            Self::Bool => ":bool:",
        }
    }

    pub const fn db_type(&self) -> DbType {
        match self {
            Self::Str => DbType::String,
            Self::Int => DbType::Integer,
            Self::Bool => DbType::Boolean,
        }
    }
}

/// Classified answer to the property-name prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyToken {
    Exit,
    Hints,
    ShorthandField { kind: ShorthandKind, name: String },
    ShorthandRelation { kind: RelationKind, model: String },
    PlainName(String),
}

impl PropertyToken {
    /// Classify a raw answer.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let answer = raw.trim();

        match answer {
            "" => return Err(DomainError::field(raw, "property name can not be empty")),
            EXIT_SENTINEL => return Ok(Self::Exit),
            HINTS_SENTINEL => return Ok(Self::Hints),
            _ => {}
        }

        if let Some((prefix, model)) = answer.split_once(RELATION_DELIMITER) {
            let prefix = prefix.strip_prefix(':').unwrap_or(prefix);
            let kind = RelationKind::from_name(prefix).ok_or_else(|| {
                DomainError::field(
                    raw,
                    format!(
                        "unknown relation shorthand '{prefix}-', expected belongsTo-, belongsToMany-, hasOne- or hasMany-"
                    ),
                )
            })?;
            if !is_identifier(model) {
                return Err(DomainError::field(raw, "related model name is not a valid identifier"));
            }
            return Ok(Self::ShorthandRelation {
                kind,
                model: model.to_owned(),
            });
        }

        let markers: Vec<ShorthandKind> = ShorthandKind::ALL
            .into_iter()
            .filter(|k| answer.contains(k.marker()))
            .collect();

        match markers.as_slice() {
            [] => {
                if !is_identifier(answer) {
                    return Err(DomainError::field(raw, "property name is not a valid identifier"));
                }
                Ok(Self::PlainName(answer.to_owned()))
            }
            [kind] => {
                let name = answer.replacen(kind.marker(), "", 1);
                if !is_identifier(&name) {
                    return Err(DomainError::field(raw, "property name is not a valid identifier"));
                }
                Ok(Self::ShorthandField { kind: *kind, name })
            }
            _ => Err(DomainError::field(raw, "only one type shorthand is allowed")),
        }
    }
}

/// One line of the shorthand glossary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hint {
    pub token: &'static str,
    pub description: &'static str,
}

/// Glossary shown for `.hints`.
pub const HINTS: &[Hint] = &[
    Hint {
        token: ".hints",
        description: "show this list",
    },
    Hint {
        token: ".exit",
        description: "finish adding properties",
    },
    Hint {
        token: "belongsTo-author",
        description: "adds author_id that must be numeric and exist in the authors table",
    },
    Hint {
        token: "belongsToMany-tag",
        description: "adds tag_id that must be numeric, with a belongsToMany relation to Tag",
    },
    Hint {
        token: "hasOne-author",
        description: "adds author_id that must exist in the authors table",
    },
    Hint {
        token: "hasMany-comment",
        description: "adds comment_id that must be numeric, with a hasMany relation to Comment",
    },
    Hint {
        token: "name:str:",
        description: "adds name as a string",
    },
    Hint {
        token: "amount:int:",
        description: "adds amount as an integer that must be numeric",
    },
    Hint {
        token: "active:bool:",
        description: "adds active as a boolean",
    },
];
