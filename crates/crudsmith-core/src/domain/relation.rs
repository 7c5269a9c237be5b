//! Relation value objects and the `RelationSpec` entity.
//!
//! Wire format: `<code>,<Model>[,<foreignKey>[,<localKey>]]` where `code` is
//! one of `mt1` (belongs-to), `mtm` (belongs-to-many), `1t1` (has-one) or
//! `1tm` (has-many).
//!
//! # Arity
//!
//! | code            | inputs                                                  | stored |
//! |-----------------|---------------------------------------------------------|--------|
//! | `mt1` `1t1` `1tm` | `Model,foreignKey[,localKey]` (`localKey` = `id`)     | 3      |
//! | `mtm`           | `Model[,pivotTable[,foreignPivotKey[,relatedPivotKey]]]` | 1..=4  |

use std::fmt;
use std::str::FromStr;

use crate::domain::error::DomainError;

/// Local key used when a single-column join omits it.
pub const DEFAULT_LOCAL_KEY: &str = "id";

/// Kind of model relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    BelongsTo,
    BelongsToMany,
    HasOne,
    HasMany,
}

impl RelationKind {
    pub const ALL: [RelationKind; 4] = [
        RelationKind::BelongsTo,
        RelationKind::BelongsToMany,
        RelationKind::HasOne,
        RelationKind::HasMany,
    ];

    /// Short wire code.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::BelongsTo => "mt1",
            Self::BelongsToMany => "mtm",
            Self::HasOne => "1t1",
            Self::HasMany => "1tm",
        }
    }

    /// Method-style name (`belongsTo`, ...), also the console shorthand prefix.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BelongsTo => "belongsTo",
            Self::BelongsToMany => "belongsToMany",
            Self::HasOne => "hasOne",
            Self::HasMany => "hasMany",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.iter().find(|k| k.code() == code).copied()
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().find(|k| k.as_str() == name).copied()
    }

    /// Whether the relation joins on a single foreign/local key pair.
    pub const fn is_single_column(&self) -> bool {
        !matches!(self, Self::BelongsToMany)
    }

    /// Whether the owning model carries the foreign key, so the related row
    /// must exist.
    pub const fn requires_existing_related(&self) -> bool {
        matches!(self, Self::BelongsTo | Self::HasOne)
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical description of one model-to-model relationship.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationSpec {
    kind: RelationKind,
    inputs: Vec<String>,
}

impl RelationSpec {
    /// Build a single-column relation from its parts.
    pub fn single(
        kind: RelationKind,
        model: impl Into<String>,
        foreign_key: impl Into<String>,
        local_key: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            inputs: vec![model.into(), foreign_key.into(), local_key.into()],
        }
    }

    /// Parse a comma-joined relation descriptor.
    pub fn parse(descriptor: &str) -> Result<Self, DomainError> {
        let mut tokens = descriptor.split(',').map(str::trim);

        let code = tokens.next().unwrap_or_default();
        let kind = RelationKind::from_code(code).ok_or_else(|| {
            DomainError::relation(
                descriptor,
                format!("unknown relation type '{code}', expected one of mt1, mtm, 1t1, 1tm"),
            )
        })?;

        let mut inputs: Vec<String> = tokens.map(str::to_owned).collect();
        if inputs.iter().any(String::is_empty) {
            return Err(DomainError::relation(descriptor, "empty relation token"));
        }

        if kind.is_single_column() {
            match inputs.len() {
                2 => inputs.push(DEFAULT_LOCAL_KEY.to_owned()),
                3 => {}
                n => {
                    return Err(DomainError::relation(
                        descriptor,
                        format!("{kind} expects Model,foreignKey[,localKey], got {n} input(s)"),
                    ));
                }
            }
        } else if !(1..=4).contains(&inputs.len()) {
            return Err(DomainError::relation(
                descriptor,
                format!(
                    "{kind} expects 1 to 4 inputs (Model[,pivotTable[,foreignPivotKey[,relatedPivotKey]]]), got {}",
                    inputs.len()
                ),
            ));
        }

        Ok(Self { kind, inputs })
    }

    pub const fn kind(&self) -> RelationKind {
        self.kind
    }

    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    /// Related model name (first input).
    pub fn model(&self) -> &str {
        &self.inputs[0]
    }

    /// Comma-joined wire form, e.g. `mt1,Author,author_id,id`.
    pub fn descriptor(&self) -> String {
        let mut out = self.kind.code().to_owned();
        for input in &self.inputs {
            out.push(',');
            out.push_str(input);
        }
        out
    }
}

impl fmt::Display for RelationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.descriptor())
    }
}

impl FromStr for RelationSpec {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_belongs_to() {
        let r = RelationSpec::parse("mt1,Author,author_id,id").unwrap();
        assert_eq!(r.kind(), RelationKind::BelongsTo);
        assert_eq!(r.inputs(), ["Author", "author_id", "id"]);
        assert_eq!(r.model(), "Author");
    }

    #[test]
    fn local_key_defaults_to_id() {
        let r = RelationSpec::parse("1tm,Comment,post_id").unwrap();
        assert_eq!(r.inputs(), ["Comment", "post_id", "id"]);
        assert_eq!(r.descriptor(), "1tm,Comment,post_id,id");
    }

    #[test]
    fn every_code_with_correct_arity_succeeds() {
        for (descriptor, len) in [
            ("mt1,Author,author_id,id", 3),
            ("1t1,Profile,user_id", 3),
            ("1tm,Comment,post_id,id", 3),
            ("mtm,Tag", 1),
            ("mtm,Tag,post_tag,post_id,tag_id", 4),
        ] {
            let r = RelationSpec::parse(descriptor).unwrap();
            assert_eq!(r.inputs().len(), len, "{descriptor}");
        }
    }

    #[test]
    fn unknown_code_fails() {
        for descriptor in ["m2o,Author,author_id", "", "belongsTo,Author,author_id", "MT1,A,b"] {
            assert!(
                matches!(
                    RelationSpec::parse(descriptor),
                    Err(DomainError::InvalidRelationInput { .. })
                ),
                "{descriptor}"
            );
        }
    }

    #[test]
    fn wrong_arity_fails() {
        assert!(RelationSpec::parse("mt1,Author").is_err());
        assert!(RelationSpec::parse("1t1,A,b,c,d").is_err());
        assert!(RelationSpec::parse("mtm").is_err());
        assert!(RelationSpec::parse("mtm,A,b,c,d,e").is_err());
    }

    #[test]
    fn empty_token_fails() {
        assert!(RelationSpec::parse("mt1,,author_id").is_err());
    }

    #[test]
    fn tokens_are_trimmed() {
        let r: RelationSpec = "mt1, Author , author_id".parse().unwrap();
        assert_eq!(r.inputs(), ["Author", "author_id", "id"]);
    }
}
