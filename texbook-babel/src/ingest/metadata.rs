//! Document-level declarations: title, author, date, keywords, abstract and graphics paths.
//!
//! Each field is located independently and the first declaration wins. Absent fields
//! keep the [`DocumentMetadata`] defaults; no fallback text is invented here, that is
//! the renderer's business.

use crate::common::scan::{braced_group, find_command, find_commands};
use crate::model::{ContentType, DocumentMetadata};
use once_cell::sync::Lazy;
use regex::Regex;

static TITLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\(title)\b").unwrap());
static AUTHOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\(author)\b").unwrap());
static DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\(date)\b").unwrap());
static KEYWORDS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\(keywords)\b").unwrap());
static DOCUMENT_CLASS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\(documentclass)\b").unwrap());
static GRAPHICS_PATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\(graphicspath)\b").unwrap());
static ABSTRACT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\\begin\{abstract\}(.*?)\\end\{abstract\}").unwrap());

/// Commands whose first argument is a macro name being defined, not used.
const DEFINERS: &[&str] = &[
    "\\newcommand",
    "\\renewcommand",
    "\\providecommand",
    "\\DeclareRobustCommand",
    "\\def",
    "\\let",
];

const BOOK_CLASSES: &[&str] = &["book", "report", "memoir", "scrbook", "scrreprt"];

/// Extract every document-level declaration from expanded text.
pub fn extract_metadata(text: &str) -> DocumentMetadata {
    let mut metadata = DocumentMetadata::default();

    if let Some(title) = declaration(text, &TITLE) {
        metadata.title = title;
    }
    if let Some(author) = declaration(text, &AUTHOR) {
        metadata.author = author;
    }
    if let Some(date) = declaration(text, &DATE) {
        metadata.publish_date = date;
    }
    if let Some(keywords) = declaration(text, &KEYWORDS) {
        metadata.tags = split_keywords(&keywords);
    }
    if let Some(abstract_text) = extract_abstract(text) {
        metadata.description = abstract_text;
    }
    metadata.content_type = infer_content_type(text);

    metadata
}

/// Trimmed argument of the first real use of a declaration command.
///
/// Occurrences without a braced argument and macro definitions
/// (`\providecommand{\keywords}[1]{...}`, `\newcommand\keywords[1]{...}`) are skipped.
fn declaration(text: &str, pattern: &Regex) -> Option<String> {
    find_commands(text, pattern)
        .into_iter()
        .filter(|command| !is_definition(text, command.start))
        .find_map(|command| command.argument)
        .map(|arg| arg.trim().to_string())
}

fn is_definition(text: &str, start: usize) -> bool {
    let before = text[..start].trim_end();
    let before = before.strip_suffix('{').unwrap_or(before).trim_end();
    let before = before.strip_suffix('*').unwrap_or(before);
    DEFINERS.iter().any(|definer| before.ends_with(definer))
}

/// Comma separated list, trimmed, empty entries dropped.
pub fn split_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Body of the first `abstract` environment, trimmed.
pub fn extract_abstract(text: &str) -> Option<String> {
    ABSTRACT
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|body| body.as_str().trim().to_string())
}

/// Book-like classes produce chapters; everything else is a single article.
pub fn infer_content_type(text: &str) -> ContentType {
    let class = find_command(text, &DOCUMENT_CLASS).and_then(|cmd| cmd.argument);
    match class.map(str::trim) {
        Some(name) if !BOOK_CLASSES.contains(&name) => ContentType::Article,
        _ => ContentType::Book,
    }
}

/// Directories listed by every `\graphicspath{{a/}{b/}}`, in declaration order.
///
/// A bare `\graphicspath{dir}` is accepted too. Nothing is resolved here.
pub fn extract_graphics_paths(text: &str) -> Vec<String> {
    let mut paths = Vec::new();
    for command in find_commands(text, &GRAPHICS_PATH) {
        let Some(argument) = command.argument else {
            continue;
        };
        let groups = inner_groups(argument);
        if groups.is_empty() {
            push_path(&mut paths, argument);
        } else {
            for group in groups {
                push_path(&mut paths, group);
            }
        }
    }
    paths
}

fn push_path(paths: &mut Vec<String>, raw: &str) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        paths.push(trimmed.to_string());
    }
}

/// Top-level `{...}` groups of a string.
fn inner_groups(text: &str) -> Vec<&str> {
    let mut groups = Vec::new();
    let mut pos = 0;
    while let Some(offset) = text[pos..].find('{') {
        let open = pos + offset;
        match braced_group(text, open) {
            Some((inner, end)) => {
                groups.push(inner);
                pos = end;
            }
            None => break,
        }
    }
    groups
}
