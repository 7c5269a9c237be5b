//! Field value objects and the `FieldSpec` entity.
//!
//! # Design
//!
//! `DbType`, `HtmlType` and `FieldOption` are closed enums with a string form
//! that matches the descriptor wire format. The html-type suggestion table
//! lives in [`DbType::html_suggestions`]; it is the single source of truth for
//! which widgets a storage type accepts and which one is the default.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

// ── DbType ───────────────────────────────────────────────────────────────────

/// Abstract storage-type category of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DbType {
    Id,
    String,
    Text,
    Integer,
    BigInteger,
    Boolean,
    Double,
    Float,
    Decimal,
    Date,
    DateTime,
    Timestamp,
    Time,
    Json,
    /// Constrained foreign id (`foreignId:constrained`).
    ForeignId,
}

impl DbType {
    /// Every db type, in the order they are offered to the user.
    pub const ALL: [DbType; 15] = [
        DbType::String,
        DbType::Text,
        DbType::Integer,
        DbType::BigInteger,
        DbType::Boolean,
        DbType::Double,
        DbType::Float,
        DbType::Decimal,
        DbType::Date,
        DbType::DateTime,
        DbType::Timestamp,
        DbType::Time,
        DbType::Json,
        DbType::Id,
        DbType::ForeignId,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::String => "string",
            Self::Text => "text",
            Self::Integer => "integer",
            Self::BigInteger => "bigInteger",
            Self::Boolean => "boolean",
            Self::Double => "double",
            Self::Float => "float",
            Self::Decimal => "decimal",
            Self::Date => "date",
            Self::DateTime => "dateTime",
            Self::Timestamp => "timestamp",
            Self::Time => "time",
            Self::Json => "json",
            Self::ForeignId => "foreignId:constrained",
        }
    }

    /// Html widgets registered for this type; the first entry is the default.
    ///
    /// Empty for types that have no suggestions (their html type is always
    /// `text` and the options prompt is skipped).
    pub const fn html_suggestions(&self) -> &'static [HtmlType] {
        use HtmlType::*;
        match self {
            Self::String => &[Text, Email, Password, File, Textarea],
            Self::Text => &[Textarea, Text],
            Self::Integer | Self::BigInteger => &[Number, Text, Select],
            Self::Boolean => &[Checkbox, Select],
            Self::Double | Self::Float | Self::Decimal => &[Number, Text],
            Self::Date => &[Date, Text],
            Self::DateTime | Self::Timestamp => &[DatetimeLocal, Date, Text],
            Self::Time => &[Time, Text],
            Self::ForeignId => &[Number, Select],
            Self::Id | Self::Json => &[],
        }
    }

    pub fn has_html_suggestions(&self) -> bool {
        !self.html_suggestions().is_empty()
    }

    /// Default html widget for this type.
    pub fn default_html_type(&self) -> HtmlType {
        self.html_suggestions()
            .first()
            .copied()
            .unwrap_or(HtmlType::Text)
    }

    /// Whether `html` is an acceptable widget for this type.
    pub fn allows_html_type(&self, html: HtmlType) -> bool {
        let suggestions = self.html_suggestions();
        if suggestions.is_empty() {
            html == HtmlType::Text
        } else {
            suggestions.contains(&html)
        }
    }
}

impl fmt::Display for DbType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DbType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(Self::Id),
            "string" => Ok(Self::String),
            "text" => Ok(Self::Text),
            "integer" => Ok(Self::Integer),
            "bigInteger" => Ok(Self::BigInteger),
            "boolean" => Ok(Self::Boolean),
            "double" => Ok(Self::Double),
            "float" => Ok(Self::Float),
            "decimal" => Ok(Self::Decimal),
            "date" => Ok(Self::Date),
            "dateTime" => Ok(Self::DateTime),
            "timestamp" => Ok(Self::Timestamp),
            "time" => Ok(Self::Time),
            "json" => Ok(Self::Json),
            "foreignId" | "foreignId:constrained" => Ok(Self::ForeignId),
            other => Err(DomainError::field(other, format!("unknown db type '{other}'"))),
        }
    }
}

// ── HtmlType ─────────────────────────────────────────────────────────────────

/// Input-widget hint for forms and views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HtmlType {
    Text,
    Textarea,
    Number,
    Email,
    Password,
    File,
    Checkbox,
    Select,
    Date,
    DatetimeLocal,
    Time,
}

impl HtmlType {
    pub const ALL: [HtmlType; 11] = [
        HtmlType::Text,
        HtmlType::Textarea,
        HtmlType::Number,
        HtmlType::Email,
        HtmlType::Password,
        HtmlType::File,
        HtmlType::Checkbox,
        HtmlType::Select,
        HtmlType::Date,
        HtmlType::DatetimeLocal,
        HtmlType::Time,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::Number => "number",
            Self::Email => "email",
            Self::Password => "password",
            Self::File => "file",
            Self::Checkbox => "checkbox",
            Self::Select => "select",
            Self::Date => "date",
            Self::DatetimeLocal => "datetime-local",
            Self::Time => "time",
        }
    }
}

impl fmt::Display for HtmlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HtmlType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HtmlType::ALL
            .iter()
            .find(|h| h.as_str() == s)
            .copied()
            .ok_or_else(|| DomainError::field(s, format!("unknown html type '{s}'")))
    }
}

// ── Options ──────────────────────────────────────────────────────────────────

/// One option code of the descriptor's `options` token.
///
/// Variant order is the serialization order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldOption {
    /// `s`
    NotSearchable,
    /// `f`
    NotFillable,
    /// `p`
    Primary,
    /// `if`
    NotInForm,
    /// `ii`
    NotInIndex,
    /// `iv`
    NotInView,
}

impl FieldOption {
    pub const ALL: [FieldOption; 6] = [
        FieldOption::NotSearchable,
        FieldOption::NotFillable,
        FieldOption::Primary,
        FieldOption::NotInForm,
        FieldOption::NotInIndex,
        FieldOption::NotInView,
    ];

    /// Code meaning "no options".
    pub const NONE_CODE: &'static str = "NO";

    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotSearchable => "s",
            Self::NotFillable => "f",
            Self::Primary => "p",
            Self::NotInForm => "if",
            Self::NotInIndex => "ii",
            Self::NotInView => "iv",
        }
    }

    pub const fn description(&self) -> &'static str {
        match self {
            Self::NotSearchable => "not searchable",
            Self::NotFillable => "not fillable",
            Self::Primary => "primary key",
            Self::NotInForm => "hidden from forms",
            Self::NotInIndex => "hidden from index view",
            Self::NotInView => "hidden from all views",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.iter().find(|o| o.code() == code).copied()
    }
}

/// A set of option codes.
///
/// Parsing drops the `NO` sentinel; serialization is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldOptions(BTreeSet<FieldOption>);

impl FieldOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options of the implicit primary key (`s,f,p,if,ii`).
    pub fn primary_key() -> Self {
        [
            FieldOption::NotSearchable,
            FieldOption::NotFillable,
            FieldOption::Primary,
            FieldOption::NotInForm,
            FieldOption::NotInIndex,
        ]
        .into_iter()
        .collect()
    }

    /// Options of implicit timestamp columns (`s,f,if,ii`).
    pub fn timestamp() -> Self {
        [
            FieldOption::NotSearchable,
            FieldOption::NotFillable,
            FieldOption::NotInForm,
            FieldOption::NotInIndex,
        ]
        .into_iter()
        .collect()
    }

    /// Parse a comma-separated list of codes.
    ///
    /// `NO` is accepted and ignored; unknown codes are rejected.
    pub fn parse(token: &str) -> Result<Self, DomainError> {
        let mut set = BTreeSet::new();
        for code in token.split(',').map(str::trim).filter(|c| !c.is_empty()) {
            if code == FieldOption::NONE_CODE {
                continue;
            }
            let option = FieldOption::from_code(code)
                .ok_or_else(|| DomainError::field(token, format!("unknown option code '{code}'")))?;
            set.insert(option);
        }
        Ok(Self(set))
    }

    pub fn insert(&mut self, option: FieldOption) {
        self.0.insert(option);
    }

    pub fn contains(&self, option: FieldOption) -> bool {
        self.0.contains(&option)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = FieldOption> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<FieldOption> for FieldOptions {
    fn from_iter<I: IntoIterator<Item = FieldOption>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for FieldOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let codes: Vec<&str> = self.iter().map(|o| o.code()).collect();
        f.write_str(&codes.join(","))
    }
}

// ── Validations ──────────────────────────────────────────────────────────────

/// Ordered, duplicate-free list of validation rules, pipe-joined on output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Validations(Vec<String>);

impl Validations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a pipe-joined rule list; blank segments are dropped.
    pub fn parse(raw: &str) -> Self {
        let mut rules = Self::new();
        for rule in raw.split('|') {
            rules.push(rule);
        }
        rules
    }

    /// Append a rule unless it is blank or already present.
    pub fn push(&mut self, rule: impl AsRef<str>) {
        let rule = rule.as_ref().trim();
        if !rule.is_empty() && !self.contains(rule) {
            self.0.push(rule.to_owned());
        }
    }

    pub fn with(mut self, rule: impl AsRef<str>) -> Self {
        self.push(rule);
        self
    }

    pub fn contains(&self, rule: &str) -> bool {
        self.0.iter().any(|r| r == rule)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl fmt::Display for Validations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("|"))
    }
}

impl From<String> for Validations {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<Validations> for String {
    fn from(v: Validations) -> Self {
        v.to_string()
    }
}

// ── FieldSpec ────────────────────────────────────────────────────────────────

/// Visibility and behaviour flags of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldFlags {
    pub searchable: bool,
    pub fillable: bool,
    pub primary: bool,
    pub in_form: bool,
    pub in_index: bool,
    pub in_view: bool,
}

impl Default for FieldFlags {
    fn default() -> Self {
        Self {
            searchable: true,
            fillable: true,
            primary: false,
            in_form: true,
            in_index: true,
            in_view: true,
        }
    }
}

impl FieldFlags {
    /// Flags produced by applying `options` on top of the defaults.
    pub fn from_options(options: &FieldOptions) -> Self {
        let mut flags = Self::default();
        for option in options.iter() {
            match option {
                FieldOption::NotSearchable => flags.searchable = false,
                FieldOption::NotFillable => flags.fillable = false,
                FieldOption::Primary => flags.primary = true,
                FieldOption::NotInForm => flags.in_form = false,
                FieldOption::NotInIndex => flags.in_index = false,
                FieldOption::NotInView => {
                    flags.in_form = false;
                    flags.in_index = false;
                    flags.in_view = false;
                }
            }
        }
        flags
    }

    /// The smallest option set that reproduces these flags.
    ///
    /// `if`/`ii` are folded into `iv` when the field is hidden everywhere.
    pub fn to_options(&self) -> FieldOptions {
        let mut options = FieldOptions::new();
        if !self.searchable {
            options.insert(FieldOption::NotSearchable);
        }
        if !self.fillable {
            options.insert(FieldOption::NotFillable);
        }
        if self.primary {
            options.insert(FieldOption::Primary);
        }
        if !self.in_view {
            options.insert(FieldOption::NotInView);
        }
        if !self.in_form && self.in_view {
            options.insert(FieldOption::NotInForm);
        }
        if !self.in_index && self.in_view {
            options.insert(FieldOption::NotInIndex);
        }
        options
    }
}

/// Canonical description of one generated column/property.
///
/// Invariant: `html_type` is allowed for `db_type`. Enforced at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    name: String,
    db_type: DbType,
    html_type: HtmlType,
    validations: Validations,
    flags: FieldFlags,
}

impl FieldSpec {
    /// Validated constructor shared by every input source.
    pub fn try_new(
        name: impl Into<String>,
        db_type: DbType,
        html_type: Option<HtmlType>,
        validations: Validations,
        flags: FieldFlags,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        if !is_identifier(&name) {
            return Err(DomainError::field(
                &name,
                "name must start with a letter or '_' and contain only letters, digits and '_'",
            ));
        }

        let html_type = html_type.unwrap_or_else(|| db_type.default_html_type());
        if !db_type.allows_html_type(html_type) {
            return Err(DomainError::field(
                &name,
                format!("html type '{html_type}' is not allowed for db type '{db_type}'"),
            ));
        }

        Ok(Self {
            name,
            db_type,
            html_type,
            validations,
            flags,
        })
    }

    /// The implicit primary key field.
    pub fn primary_key(name: impl Into<String>) -> Result<Self, DomainError> {
        Self::try_new(
            name,
            DbType::Id,
            None,
            Validations::new(),
            FieldFlags::from_options(&FieldOptions::primary_key()),
        )
    }

    /// An implicit timestamp column (`created_at`, `updated_at`).
    pub fn timestamp(name: impl Into<String>) -> Result<Self, DomainError> {
        Self::try_new(
            name,
            DbType::Timestamp,
            None,
            Validations::new(),
            FieldFlags::from_options(&FieldOptions::timestamp()),
        )
    }

    /// Same field with a replaced validation list.
    pub fn with_validations(mut self, validations: Validations) -> Self {
        self.validations = validations;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub const fn db_type(&self) -> DbType {
        self.db_type
    }
    pub const fn html_type(&self) -> HtmlType {
        self.html_type
    }
    pub fn validations(&self) -> &Validations {
        &self.validations
    }
    pub const fn flags(&self) -> FieldFlags {
        self.flags
    }
    pub const fn is_searchable(&self) -> bool {
        self.flags.searchable
    }
    pub const fn is_fillable(&self) -> bool {
        self.flags.fillable
    }
    pub const fn is_primary(&self) -> bool {
        self.flags.primary
    }
    pub const fn in_form(&self) -> bool {
        self.flags.in_form
    }
    pub const fn in_index(&self) -> bool {
        self.flags.in_index
    }
    pub const fn in_view(&self) -> bool {
        self.flags.in_view
    }

    /// Re-serialize to the one-line descriptor format.
    pub fn descriptor(&self) -> String {
        let options = self.flags.to_options();
        if options.is_empty() {
            format!("{} {} {}", self.name, self.db_type, self.html_type)
        } else {
            format!(
                "{} {} {} {}",
                self.name, self.db_type, self.html_type, options
            )
        }
    }
}

impl fmt::Display for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.descriptor())
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_suggestion_list_contains_its_default() {
        for db in DbType::ALL {
            assert!(db.allows_html_type(db.default_html_type()), "{db}");
        }
    }

    #[test]
    fn types_without_suggestions_only_allow_text() {
        assert_eq!(DbType::Json.default_html_type(), HtmlType::Text);
        assert!(DbType::Id.allows_html_type(HtmlType::Text));
        assert!(!DbType::Id.allows_html_type(HtmlType::Number));
    }

    #[test]
    fn db_type_parses_its_own_string_form() {
        for db in DbType::ALL {
            assert_eq!(db.as_str().parse::<DbType>().unwrap(), db);
        }
        assert_eq!("foreignId".parse::<DbType>().unwrap(), DbType::ForeignId);
        assert!("varchar".parse::<DbType>().is_err());
    }

    #[test]
    fn options_drop_no_sentinel() {
        let opts = FieldOptions::parse("NO,s,p").unwrap();
        assert_eq!(opts.to_string(), "s,p");
        assert!(FieldOptions::parse("NO").unwrap().is_empty());
    }

    #[test]
    fn options_serialize_in_fixed_order() {
        let opts = FieldOptions::parse("ii,s,if").unwrap();
        assert_eq!(opts.to_string(), "s,if,ii");
    }

    #[test]
    fn unknown_option_code_is_rejected() {
        assert!(matches!(
            FieldOptions::parse("s,zz"),
            Err(DomainError::InvalidFieldInput { .. })
        ));
    }

    #[test]
    fn iv_hides_field_everywhere() {
        let flags = FieldFlags::from_options(&FieldOptions::parse("iv").unwrap());
        assert!(!flags.in_form && !flags.in_index && !flags.in_view);
        assert_eq!(flags.to_options().to_string(), "iv");
    }

    #[test]
    fn primary_key_flags() {
        let pk = FieldSpec::primary_key("id").unwrap();
        assert!(pk.is_primary());
        assert!(!pk.is_searchable());
        assert!(!pk.is_fillable());
        assert!(!pk.in_form());
        assert!(!pk.in_index());
        assert!(pk.in_view());
        assert_eq!(pk.descriptor(), "id id text s,f,p,if,ii");
    }

    #[test]
    fn validations_keep_order_and_skip_duplicates() {
        let v = Validations::parse("required|numeric||required")
            .with("exists:authors,id");
        assert_eq!(v.to_string(), "required|numeric|exists:authors,id");
    }

    #[test]
    fn identifier_rules() {
        assert!(is_identifier("author_id"));
        assert!(is_identifier("_x1"));
        assert!(!is_identifier("1st"));
        assert!(!is_identifier("my-field"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn rejects_disallowed_html_type() {
        let err = FieldSpec::try_new(
            "active",
            DbType::Boolean,
            Some(HtmlType::Textarea),
            Validations::new(),
            FieldFlags::default(),
        );
        assert!(err.is_err());
    }
}
