// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Crudsmith.
//!
//! Pure parsing and normalization of field/relation descriptors, naming rules
//! and generation options. No I/O and no logging; every failure is a
//! [`DomainError`] value.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No I/O**: Prompts, files and databases are reached through ports
//! - **Immutable values**: `FieldSpec` and `RelationSpec` are validated on construction
//! - **One normalization path**: every input source ends in the same types

pub mod error;
pub mod field;
pub mod field_input;
pub mod naming;
pub mod options;
pub mod payload;
pub mod relation;
pub mod shorthand;

pub use error::{DomainError, ErrorCategory};
pub use field::{
    DbType, FieldFlags, FieldOption, FieldOptions, FieldSpec, HtmlType, Validations,
    is_identifier,
};
pub use field_input::{parse_field_input, parse_field_input_with_validations, validate_field_input};
pub use naming::{ModelNames, model_name_for_table, pluralize, singularize};
pub use options::{GenerationOptions, OptionOverrides, SkipStep};
pub use payload::{
    EntryError, GuiPayload, NormalizedEntries, SchemaEntry, entries_for, normalize_entries,
};
pub use relation::{DEFAULT_LOCAL_KEY, RelationKind, RelationSpec};
pub use shorthand::{EXIT_SENTINEL, HINTS, HINTS_SENTINEL, Hint, PropertyToken, ShorthandKind};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_source_normalizes_to_the_same_field() {
        let from_console = parse_field_input("email string email s").unwrap();
        let entry: SchemaEntry = serde_json::from_str(
            r#"{"name": "email", "dbType": "string", "htmlType": "email", "searchable": false}"#,
        )
        .unwrap();
        let (from_file, _) = entry.into_parts().unwrap();
        assert_eq!(from_file.unwrap(), from_console);
    }

    #[test]
    fn file_entries_round_trip_through_descriptor() {
        let field = parse_field_input("published_at dateTime date if,ii").unwrap();
        let relation = RelationSpec::parse("mtm,Tag,post_tag").unwrap();
        let entries = entries_for(std::slice::from_ref(&field), std::slice::from_ref(&relation));
        let normalized = normalize_entries(entries).unwrap();
        assert_eq!(normalized.fields, vec![field]);
        assert_eq!(normalized.relations, vec![relation]);
    }
}
