//! Inspection views
//!
//! Each view renders one stage of the parse for a human or a tool:
//!
//! - `expanded`: the flattened source after include expansion, markers and all
//! - `outline`: document kind, title and the chapter / appendix sequence
//! - `labels`: the label registry, one key per line
//! - `document-json` / `metadata-json`: the model as JSON
//!
//! Extra parameters (`--extra-<name> [value]`):
//!
//! - `files`: "true" appends the list of files the expander read (`expanded` only)
//! - `warnings`: "false" hides per-unit warnings in the outline
//!
//! Example: `texbook inspect main.tex outline --extra-warnings false`

use std::collections::HashMap;
use std::fmt::Write;
use texbook_babel::ingest::Expansion;
use texbook_babel::model::{ContentType, Document, StructuralUnit};

/// All available inspection views
pub const AVAILABLE_VIEWS: &[&str] = &[
    "outline",
    "expanded",
    "labels",
    "document-json",
    "metadata-json",
];

pub const DEFAULT_VIEW: &str = "outline";

/// Render `view_name` for a parsed document.
///
/// Returns the text to print, or an error message for unknown views and
/// serialization failures.
pub fn execute_view(
    document: &Document,
    expansion: &Expansion,
    view_name: &str,
    extra_params: &HashMap<String, String>,
) -> Result<String, String> {
    match view_name {
        "outline" => Ok(outline(document, flag(extra_params, "warnings", true))),
        "expanded" => {
            let mut output = expansion.text.clone();
            if flag(extra_params, "files", false) {
                output.push_str("\n\n% files:\n");
                for file in &expansion.files {
                    let _ = writeln!(output, "%   {}", file.display());
                }
            }
            Ok(output)
        }
        "labels" => Ok(labels(document)),
        "document-json" => to_json(document),
        "metadata-json" => to_json(&document.metadata),
        other => Err(format!(
            "Unknown view '{other}'. Available views: {}",
            AVAILABLE_VIEWS.join(", ")
        )),
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

fn flag(params: &HashMap<String, String>, key: &str, default: bool) -> bool {
    params
        .get(key)
        .map(|value| matches!(value.to_lowercase().as_str(), "true" | "1" | "yes" | "y"))
        .unwrap_or(default)
}

fn outline(document: &Document, show_warnings: bool) -> String {
    let kind = match document.metadata.content_type {
        ContentType::Book => "book",
        ContentType::Article => "article",
    };
    let title = if document.metadata.title.is_empty() {
        "(untitled)"
    } else {
        document.metadata.title.as_str()
    };

    let mut output = format!("{title} [{kind}]\n");
    if !document.metadata.author.is_empty() {
        let _ = writeln!(output, "by {}", document.metadata.author);
    }
    for unit in document.units() {
        outline_unit(&mut output, unit, show_warnings);
    }
    let _ = writeln!(
        output,
        "{} labels, {} images",
        document.labels.len(),
        document.images.len()
    );
    output
}

fn outline_unit(output: &mut String, unit: &StructuralUnit, show_warnings: bool) {
    let marker = if unit.numbered { "" } else { " *" };
    let _ = writeln!(output, "  {:<6} {}{marker}", unit.id(), unit.title);
    for image in &unit.images {
        let found = if image.path.is_some() { "" } else { " (missing)" };
        let _ = writeln!(output, "           image {}{found}", image.name);
    }
    if show_warnings {
        for warning in &unit.warnings {
            let _ = writeln!(output, "           ! {warning}");
        }
    }
}

fn labels(document: &Document) -> String {
    let mut output = String::new();
    for (key, label) in document.labels.iter() {
        match &label.file {
            Some(file) => {
                let _ = writeln!(output, "{key}\t{}\t{file}", label.number);
            }
            None => {
                let _ = writeln!(output, "{key}\t{}", label.number);
            }
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use texbook_babel::model::{LabelDescriptor, UnitKind};

    fn sample() -> (Document, Expansion) {
        let mut document = Document::new("/tmp/book");
        document.metadata.title = "Deep Work".to_string();
        document
            .chapters
            .push(StructuralUnit::new(UnitKind::Chapter, 1, "Intro"));
        let mut appendix = StructuralUnit::new(UnitKind::Appendix, 1, "Data");
        appendix.warn("reference to undefined label 'x'");
        document.appendices.push(appendix);
        document
            .labels
            .insert("sec:a", LabelDescriptor::unscoped("sec:a"));
        let expansion = Expansion {
            text: "\\chapter{Intro}".to_string(),
            files: vec!["/tmp/book/main.tex".into()],
            issues: Vec::new(),
        };
        (document, expansion)
    }

    #[test]
    fn outline_lists_units_in_order() {
        let (document, expansion) = sample();
        let output = execute_view(&document, &expansion, "outline", &HashMap::new()).unwrap();
        let intro = output.find("ch01").unwrap();
        let data = output.find("appA").unwrap();
        assert!(output.starts_with("Deep Work [book]\n"));
        assert!(intro < data);
        assert!(output.contains("! reference to undefined label 'x'"));
        assert!(output.ends_with("1 labels, 0 images\n"));
    }

    #[test]
    fn outline_can_hide_warnings() {
        let (document, expansion) = sample();
        let mut params = HashMap::new();
        params.insert("warnings".to_string(), "false".to_string());
        let output = execute_view(&document, &expansion, "outline", &params).unwrap();
        assert!(!output.contains("undefined label"));
    }

    #[test]
    fn expanded_can_list_files() {
        let (document, expansion) = sample();
        let mut params = HashMap::new();
        params.insert("files".to_string(), "true".to_string());
        let output = execute_view(&document, &expansion, "expanded", &params).unwrap();
        assert!(output.starts_with("\\chapter{Intro}"));
        assert!(output.contains("%   /tmp/book/main.tex"));
    }

    #[test]
    fn metadata_json_is_valid_json() {
        let (document, expansion) = sample();
        let output =
            execute_view(&document, &expansion, "metadata-json", &HashMap::new()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["title"], "Deep Work");
        assert_eq!(value["lang"], "fa");
    }

    #[test]
    fn unknown_view_is_an_error() {
        let (document, expansion) = sample();
        let err = execute_view(&document, &expansion, "ast-tag", &HashMap::new()).unwrap_err();
        assert!(err.contains("Available views"));
    }
}
