//! One-line field descriptor parser.
//!
//! Format: `<name> <dbType> [<htmlType>] [<options>]`, whitespace separated.
//! `options` is a comma-separated list of codes from `{NO, s, f, p, if, ii, iv}`.
//!
//! The third token is always read as the html type; a line that wants
//! options must spell out the html type first.

use crate::domain::error::DomainError;
use crate::domain::field::{DbType, FieldFlags, FieldOptions, FieldSpec, HtmlType, Validations};

/// Parse a descriptor line into a [`FieldSpec`] with no validations.
pub fn parse_field_input(line: &str) -> Result<FieldSpec, DomainError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();

    let (name, db_type, html_type, options) = match tokens.as_slice() {
        [] => return Err(DomainError::field(line, "missing field name")),
        [_] => return Err(DomainError::field(line, "missing db type")),
        [name, db] => (*name, *db, None, None),
        [name, db, html] => (*name, *db, Some(*html), None),
        [name, db, html, options] => (*name, *db, Some(*html), Some(*options)),
        _ => {
            return Err(DomainError::field(
                line,
                format!("expected at most 4 tokens, found {}", tokens.len()),
            ));
        }
    };

    let db_type: DbType = db_type.parse().map_err(|e| relabel(e, line))?;
    let html_type = html_type
        .map(str::parse::<HtmlType>)
        .transpose()
        .map_err(|e| relabel(e, line))?;
    let options = options
        .map(FieldOptions::parse)
        .transpose()
        .map_err(|e| relabel(e, line))?
        .unwrap_or_default();

    FieldSpec::try_new(
        name,
        db_type,
        html_type,
        Validations::new(),
        FieldFlags::from_options(&options),
    )
    .map_err(|e| relabel(e, line))
}

/// Parse a descriptor line and attach a pipe-joined validation list.
pub fn parse_field_input_with_validations(
    line: &str,
    validations: &str,
) -> Result<FieldSpec, DomainError> {
    parse_field_input(line).map(|f| f.with_validations(Validations::parse(validations)))
}

/// Pure pre-check: `true` exactly when [`parse_field_input`] would succeed.
pub fn validate_field_input(line: &str) -> bool {
    parse_field_input(line).is_ok()
}

/// Report errors against the whole line rather than the offending token.
fn relabel(err: DomainError, line: &str) -> DomainError {
    match err {
        DomainError::InvalidFieldInput { reason, .. } => DomainError::field(line, reason),
        other => other,
    }
}
