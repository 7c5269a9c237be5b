//! Model naming: case conversion and English inflection.
//!
//! Case conversion uses `heck`. Inflection is a small rule table that
//! covers the regular English forms used for table names; irregular nouns
//! can be overridden with an explicit plural.

use heck::{ToLowerCamelCase, ToSnakeCase, ToUpperCamelCase};
use serde::Serialize;

use crate::domain::error::DomainError;
use crate::domain::field::is_identifier;

const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("child", "children"),
    ("man", "men"),
    ("woman", "women"),
    ("mouse", "mice"),
    ("goose", "geese"),
];

const UNCOUNTABLE: &[&str] = &["equipment", "information", "news", "series", "species", "data"];

/// Pluralize the last word of a lowercase or snake_case noun.
pub fn pluralize(word: &str) -> String {
    let (head, last) = split_last_word(word);
    format!("{head}{}", pluralize_word(last))
}

/// Singularize the last word of a lowercase or snake_case noun.
pub fn singularize(word: &str) -> String {
    let (head, last) = split_last_word(word);
    format!("{head}{}", singularize_word(last))
}

fn split_last_word(word: &str) -> (&str, &str) {
    match word.rfind('_') {
        Some(i) => word.split_at(i + 1),
        None => ("", word),
    }
}

fn pluralize_word(word: &str) -> String {
    let lower = word.to_ascii_lowercase();
    if word.is_empty() || UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_owned();
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(s, _)| *s == lower) {
        return (*plural).to_owned();
    }
    if IRREGULAR.iter().any(|(_, p)| *p == lower) {
        return word.to_owned();
    }

    if let Some(stem) = word.strip_suffix('y') {
        if !stem.ends_with(['a', 'e', 'i', 'o', 'u']) {
            return format!("{stem}ies");
        }
    }
    if ["s", "x", "z", "ch", "sh"].iter().any(|s| word.ends_with(s)) {
        return format!("{word}es");
    }
    format!("{word}s")
}

fn singularize_word(word: &str) -> String {
    let lower = word.to_ascii_lowercase();
    if word.is_empty() || UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_owned();
    }
    if let Some((singular, _)) = IRREGULAR.iter().find(|(_, p)| *p == lower) {
        return (*singular).to_owned();
    }

    if let Some(stem) = word.strip_suffix("ies") {
        return format!("{stem}y");
    }
    for suffix in ["sses", "xes", "zes", "ches", "shes"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_owned();
        }
    }
    if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
        return word.to_owned();
    }
    match word.strip_suffix('s') {
        Some(stem) => stem.to_owned(),
        None => word.to_owned(),
    }
}

/// Derived forms of the model name used across generated artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelNames {
    /// `BlogPost`
    pub name: String,
    /// `BlogPosts`
    pub plural: String,
    /// `blogPost`
    pub camel: String,
    /// `blog_post`
    pub snake: String,
    /// `blog_posts`
    pub snake_plural: String,
}

impl ModelNames {
    /// Derive names from a singular model name and an optional explicit plural.
    pub fn new(model: &str, plural: Option<&str>) -> Result<Self, DomainError> {
        let name = model.trim().to_upper_camel_case();
        if !is_identifier(&name) {
            return Err(DomainError::InvalidModelName {
                name: model.to_owned(),
            });
        }

        let snake = name.to_snake_case();
        let snake_plural = match plural {
            Some(p) => p.trim().to_snake_case(),
            None => pluralize(&snake),
        };

        Ok(Self {
            camel: name.to_lower_camel_case(),
            plural: snake_plural.to_upper_camel_case(),
            name,
            snake,
            snake_plural,
        })
    }

    /// Default table name (`snake_plural`).
    pub fn table_name(&self) -> &str {
        &self.snake_plural
    }
}

/// `Author` from `authors`, `BlogPost` from `blog_posts`.
pub fn model_name_for_table(table: &str) -> String {
    singularize(&table.to_snake_case()).to_upper_camel_case()
}
