//! `crudsmith types`: the vocabulary accepted by field and relation input.

use serde::Serialize;

use crudsmith_core::domain::{DbType, FieldOption, HINTS, HtmlType, RelationKind, SkipStep};

use crate::{error::CliResult, output::OutputManager};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Vocabulary {
    db_types: Vec<DbTypeEntry>,
    html_types: Vec<&'static str>,
    options: Vec<Code>,
    relations: Vec<Code>,
    skip_steps: Vec<&'static str>,
    shorthands: Vec<Code>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DbTypeEntry {
    name: &'static str,
    default_html_type: &'static str,
    html_types: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
struct Code {
    code: &'static str,
    description: &'static str,
}

fn vocabulary() -> Vocabulary {
    Vocabulary {
        db_types: DbType::ALL
            .iter()
            .map(|t| DbTypeEntry {
                name: t.as_str(),
                default_html_type: t.default_html_type().as_str(),
                html_types: t.html_suggestions().iter().map(HtmlType::as_str).collect(),
            })
            .collect(),
        html_types: HtmlType::ALL.iter().map(HtmlType::as_str).collect(),
        options: FieldOption::ALL
            .iter()
            .map(|o| Code {
                code: o.code(),
                description: o.description(),
            })
            .collect(),
        relations: RelationKind::ALL
            .iter()
            .map(|k| Code {
                code: k.code(),
                description: k.as_str(),
            })
            .collect(),
        skip_steps: SkipStep::ALL.iter().map(SkipStep::as_str).collect(),
        shorthands: HINTS
            .iter()
            .map(|h| Code {
                code: h.token,
                description: h.description,
            })
            .collect(),
    }
}

pub fn execute(output: OutputManager) -> CliResult<()> {
    let vocabulary = vocabulary();
    if output.is_json() {
        return output.json(&vocabulary);
    }

    output.header("Database types")?;
    let width = vocabulary.db_types.iter().map(|t| t.name.len()).max().unwrap_or(0);
    for entry in &vocabulary.db_types {
        let html = if entry.html_types.is_empty() {
            entry.default_html_type.to_owned()
        } else {
            entry.html_types.join(", ")
        };
        output.row(entry.name, &html, width)?;
    }

    output.print("")?;
    output.header("HTML types")?;
    output.print(&format!("  {}", vocabulary.html_types.join(", ")))?;

    for (title, codes) in [
        ("Options", &vocabulary.options),
        ("Relations", &vocabulary.relations),
        ("Shorthands", &vocabulary.shorthands),
    ] {
        output.print("")?;
        output.header(title)?;
        let width = codes.iter().map(|c| c.code.len()).max().unwrap_or(0);
        for code in codes {
            output.row(code.code, code.description, width)?;
        }
    }

    output.print("")?;
    output.header("Skip steps")?;
    output.print(&format!("  {}", vocabulary.skip_steps.join(", ")))?;
    Ok(())
}
