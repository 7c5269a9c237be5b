//! JSON shapes: schema-file entries and the GUI payload.
//!
//! Both formats are decoded once at the boundary into typed structs and then
//! normalized into `FieldSpec`/`RelationSpec`. Errors carry the index of the
//! offending entry.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::error::DomainError;
use crate::domain::field::{DbType, FieldFlags, FieldSpec, HtmlType, Validations};
use crate::domain::options::OptionOverrides;
use crate::domain::relation::RelationSpec;

const RELATION_ENTRY_TYPE: &str = "relation";

/// One element of a schema file or of the GUI `fields` array.
///
/// Either a relation-only object (`{"type": "relation", "relation": "..."}`)
/// or a field object, which may additionally carry a `relation` descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaEntry {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validations: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub searchable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fillable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_form: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_index: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_view: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation: Option<String>,
}

impl SchemaEntry {
    pub fn from_field(field: &FieldSpec) -> Self {
        Self {
            name: Some(field.name().to_owned()),
            db_type: Some(field.db_type().to_string()),
            html_type: Some(field.html_type().to_string()),
            validations: Some(field.validations().to_string()),
            searchable: Some(field.is_searchable()),
            fillable: Some(field.is_fillable()),
            primary: Some(field.is_primary()),
            in_form: Some(field.in_form()),
            in_index: Some(field.in_index()),
            in_view: Some(field.in_view()),
            ..Self::default()
        }
    }

    pub fn from_relation(relation: &RelationSpec) -> Self {
        Self {
            kind: Some(RELATION_ENTRY_TYPE.to_owned()),
            relation: Some(relation.descriptor()),
            ..Self::default()
        }
    }

    /// Normalize one entry into a field and/or a relation.
    pub fn into_parts(self) -> Result<(Option<FieldSpec>, Option<RelationSpec>), DomainError> {
        match self.kind.as_deref() {
            Some(RELATION_ENTRY_TYPE) => {
                let descriptor = self.relation.ok_or_else(|| DomainError::InvalidPayload {
                    reason: "relation entry without a 'relation' descriptor".into(),
                })?;
                return Ok((None, Some(RelationSpec::parse(&descriptor)?)));
            }
            Some(other) => {
                return Err(DomainError::InvalidPayload {
                    reason: format!("unknown entry type '{other}'"),
                });
            }
            None => {}
        }

        let name = self.name.ok_or_else(|| DomainError::field("", "missing 'name'"))?;
        let db_type: DbType = self
            .db_type
            .as_deref()
            .ok_or_else(|| DomainError::field(&name, "missing 'dbType'"))?
            .parse()
            .map_err(|e| rename_input(e, &name))?;
        let html_type = self
            .html_type
            .as_deref()
            .filter(|h| !h.is_empty())
            .map(str::parse::<HtmlType>)
            .transpose()
            .map_err(|e| rename_input(e, &name))?;

        let defaults = FieldFlags::default();
        let flags = FieldFlags {
            searchable: self.searchable.unwrap_or(defaults.searchable),
            fillable: self.fillable.unwrap_or(defaults.fillable),
            primary: self.primary.unwrap_or(defaults.primary),
            in_form: self.in_form.unwrap_or(defaults.in_form),
            in_index: self.in_index.unwrap_or(defaults.in_index),
            in_view: self.in_view.unwrap_or(defaults.in_view),
        };
        let validations = self
            .validations
            .as_deref()
            .map(Validations::parse)
            .unwrap_or_default();

        let field = FieldSpec::try_new(name, db_type, html_type, validations, flags)?;
        let relation = self
            .relation
            .as_deref()
            .filter(|r| !r.trim().is_empty())
            .map(RelationSpec::parse)
            .transpose()?;

        Ok((Some(field), relation))
    }
}

fn rename_input(err: DomainError, name: &str) -> DomainError {
    match err {
        DomainError::InvalidFieldInput { reason, .. } => DomainError::field(name, reason),
        other => other,
    }
}

/// An entry that failed to normalize.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("entry {index}: {source}")]
pub struct EntryError {
    pub index: usize,
    #[source]
    pub source: DomainError,
}

/// Fields and relations extracted from a list of entries, in entry order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedEntries {
    pub fields: Vec<FieldSpec>,
    pub relations: Vec<RelationSpec>,
}

/// Normalize every entry, stopping at the first failure.
pub fn normalize_entries(entries: Vec<SchemaEntry>) -> Result<NormalizedEntries, EntryError> {
    let mut out = NormalizedEntries::default();
    for (index, entry) in entries.into_iter().enumerate() {
        let (field, relation) = entry
            .into_parts()
            .map_err(|source| EntryError { index, source })?;
        out.fields.extend(field);
        out.relations.extend(relation);
    }
    Ok(out)
}

/// Serialize fields then relations into schema-file entries.
pub fn entries_for(fields: &[FieldSpec], relations: &[RelationSpec]) -> Vec<SchemaEntry> {
    fields
        .iter()
        .map(SchemaEntry::from_field)
        .chain(relations.iter().map(SchemaEntry::from_relation))
        .collect()
}

fn default_migrate() -> bool {
    true
}

/// JSON object passed by a GUI front-end.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuiPayload {
    #[serde(default)]
    pub table_name: Option<String>,
    #[serde(default = "default_migrate")]
    pub migrate: bool,
    #[serde(default)]
    pub options: OptionOverrides,
    pub fields: Vec<SchemaEntry>,
}

impl GuiPayload {
    /// Decode and validate the payload shape.
    pub fn parse(json: &str) -> Result<Self, DomainError> {
        let payload: Self = serde_json::from_str(json).map_err(|e| DomainError::InvalidPayload {
            reason: e.to_string(),
        })?;

        if let Some(table) = &payload.table_name {
            if table.trim().is_empty() {
                return Err(DomainError::InvalidPayload {
                    reason: "'tableName' must not be empty".into(),
                });
            }
        }
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::relation::RelationKind;

    #[test]
    fn field_entry_defaults() {
        let entry: SchemaEntry =
            serde_json::from_str(r#"{"name": "title", "dbType": "string"}"#).unwrap();
        let (field, relation) = entry.into_parts().unwrap();
        let field = field.unwrap();
        assert_eq!(field.html_type(), HtmlType::Text);
        assert!(field.is_searchable() && field.is_fillable() && field.in_view());
        assert!(!field.is_primary());
        assert!(relation.is_none());
    }

    #[test]
    fn relation_only_entry() {
        let entry: SchemaEntry =
            serde_json::from_str(r#"{"type": "relation", "relation": "mt1,Author,author_id,id"}"#)
                .unwrap();
        let (field, relation) = entry.into_parts().unwrap();
        assert!(field.is_none());
        assert_eq!(relation.unwrap().kind(), RelationKind::BelongsTo);
    }

    #[test]
    fn field_entry_with_relation() {
        let entry: SchemaEntry = serde_json::from_str(
            r#"{"name": "author_id", "dbType": "foreignId:constrained", "relation": "mt1,Author,author_id"}"#,
        )
        .unwrap();
        let (field, relation) = entry.into_parts().unwrap();
        assert_eq!(field.unwrap().db_type(), DbType::ForeignId);
        assert_eq!(relation.unwrap().inputs(), ["Author", "author_id", "id"]);
    }

    #[test]
    fn missing_db_type_is_reported_with_index() {
        let entries: Vec<SchemaEntry> = serde_json::from_str(
            r#"[{"name": "id", "dbType": "id"}, {"name": "title"}]"#,
        )
        .unwrap();
        let err = normalize_entries(entries).unwrap_err();
        assert_eq!(err.index, 1);
        assert!(err.to_string().contains("dbType"));
    }

    #[test]
    fn serialized_field_uses_camel_case_keys() {
        let field = crate::domain::field_input::parse_field_input("title string text s")
            .unwrap()
            .with_validations(Validations::parse("required"));
        let json = serde_json::to_value(SchemaEntry::from_field(&field)).unwrap();
        assert_eq!(json["dbType"], "string");
        assert_eq!(json["htmlType"], "text");
        assert_eq!(json["validations"], "required");
        assert_eq!(json["searchable"], false);
        assert_eq!(json["inForm"], true);
        assert!(json.get("type").is_none());
    }

    #[test]
    fn gui_payload_defaults_migrate_to_true() {
        let payload = GuiPayload::parse(r#"{"fields": []}"#).unwrap();
        assert!(payload.migrate);
        assert!(payload.table_name.is_none());
    }

    #[test]
    fn gui_payload_rejects_missing_fields() {
        assert!(matches!(
            GuiPayload::parse(r#"{"tableName": "posts"}"#),
            Err(DomainError::InvalidPayload { .. })
        ));
    }

    #[test]
    fn gui_payload_rejects_unknown_option() {
        assert!(GuiPayload::parse(r#"{"fields": [], "options": {"swagger": true}}"#).is_err());
    }
}
