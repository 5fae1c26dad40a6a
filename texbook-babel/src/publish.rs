//! Publishing: file naming, front matter and final file text.
//!
//! Bridges a rendered [`Document`] and whatever writes files for a static-site
//! generator. [`prepare`] assigns slugs and file names, [`publish`] assembles one output
//! file (front matter plus Markdown body) and either returns it or writes it.
//!
//! Layout produced for a book:
//!
//! ```text
//! index.md                     overview (title heading only)
//! ch01-<slug>.md ...           chapters
//! app01-<slug>.md ...          appendices
//! ```
//!
//! An article is a single `<slug>.md` carrying the overview front matter and the body
//! of its first unit.

use crate::error::{BabelError, Result};
use crate::model::{
    ContentType, Document, DocumentMetadata, LabelRegistry, StructuralUnit, UnitKind,
};
use crate::templates::{
    index_front_matter, slugify, unit_front_matter, DEFAULT_BOOK_DESCRIPTION, SLUG_LIMIT,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrepareOptions {
    /// Re-register labels per unit so references link across files.
    pub scope_labels: bool,
    pub slug_limit: usize,
}

impl Default for PrepareOptions {
    fn default() -> Self {
        PrepareOptions {
            scope_labels: false,
            slug_limit: SLUG_LIMIT,
        }
    }
}

/// Derive missing slugs and assign output file names.
///
/// Slugs already set (by the caller or a previous run) are kept. Call again after
/// reordering units so file names follow the new numbers.
pub fn prepare(document: &mut Document, options: &PrepareOptions) {
    if document.metadata.slug.is_empty() {
        document.metadata.slug = slugify(&document.metadata.title, options.slug_limit);
    }
    for unit in document.units_mut() {
        if unit.slug.is_empty() {
            unit.slug = slugify(&unit.title, options.slug_limit);
        }
        unit.filename = unit_file_name(unit);
    }
    if options.scope_labels {
        let scoped = LabelRegistry::collect_scoped(document.units());
        debug!(labels = scoped.len(), "scoped labels to unit files");
        document.labels.merge(scoped);
    }
}

/// `ch03-<slug>.md` / `app01-<slug>.md`; the slug part is omitted when empty.
pub fn unit_file_name(unit: &StructuralUnit) -> String {
    let prefix = match unit.kind {
        UnitKind::Chapter => "ch",
        UnitKind::Appendix => "app",
    };
    if unit.slug.is_empty() {
        format!("{prefix}{:02}.md", unit.ordinal)
    } else {
        format!("{prefix}{:02}-{}.md", unit.ordinal, unit.slug)
    }
}

/// Front matter plus rendered body of one unit.
pub fn render_unit_file(unit: &StructuralUnit, metadata: &DocumentMetadata) -> String {
    let body = unit.rendered.as_deref().unwrap_or_default();
    format!("{}\n\n{}", unit_front_matter(unit, metadata).render(), body)
}

/// The book overview file.
pub fn render_index_file(metadata: &DocumentMetadata, fallback_description: &str) -> String {
    format!(
        "{}\n\n# {}\n",
        index_front_matter(metadata, fallback_description).render(),
        metadata.title
    )
}

/// A single-file article: overview front matter and the first unit's body.
pub fn render_article_file(document: &Document, fallback_description: &str) -> String {
    let body = document
        .chapters
        .first()
        .and_then(|unit| unit.rendered.as_deref())
        .unwrap_or_default();
    format!(
        "{}\n\n{}",
        index_front_matter(&document.metadata, fallback_description).render(),
        body
    )
}

/// What to publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishTarget {
    /// `index.md` for books, the whole article otherwise.
    Index,
    /// A unit by number (`"3"`, `"C"`) or id (`"ch03"`).
    Unit(String),
}

impl PublishTarget {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "" | "index" => PublishTarget::Index,
            other => PublishTarget::Unit(other.to_string()),
        }
    }
}

/// Specifies how to publish a document.
///
/// ```ignore
/// let spec = PublishSpec::new(&document, PublishTarget::parse("2"))
///     .with_output_path("ch02.md");
/// ```
#[derive(Debug)]
pub struct PublishSpec<'a> {
    pub document: &'a Document,
    pub target: PublishTarget,
    /// Optional file path for writing output.
    pub output: Option<PathBuf>,
    /// Overview description when the document has none.
    pub fallback_description: String,
}

impl<'a> PublishSpec<'a> {
    pub fn new(document: &'a Document, target: PublishTarget) -> Self {
        Self {
            document,
            target,
            output: None,
            fallback_description: DEFAULT_BOOK_DESCRIPTION.to_string(),
        }
    }

    /// Sets the output file path. If provided, content is written to disk.
    pub fn with_output_path(mut self, path: impl AsRef<Path>) -> Self {
        self.output = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_fallback_description(mut self, description: impl Into<String>) -> Self {
        self.fallback_description = description.into();
        self
    }
}

/// The output from a successful publish operation.
#[derive(Debug, Clone, PartialEq)]
pub enum PublishArtifact {
    /// Content held in memory (no output path given).
    InMemory(String),
    /// Path to the written file.
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PublishResult {
    pub artifact: PublishArtifact,
    /// File name the target is published under in the site layout.
    pub file_name: String,
}

/// Assemble the file for the requested target and return or write it.
///
/// # Errors
///
/// Returns [`BabelError::UnitNotFound`] for an unknown unit reference and
/// [`BabelError::Io`] when writing fails.
pub fn publish(spec: PublishSpec<'_>) -> Result<PublishResult> {
    let document = spec.document;
    let (text, file_name) = match &spec.target {
        PublishTarget::Index => match document.metadata.content_type {
            ContentType::Book => (
                render_index_file(&document.metadata, &spec.fallback_description),
                "index.md".to_string(),
            ),
            ContentType::Article => (
                render_article_file(document, &spec.fallback_description),
                article_file_name(&document.metadata),
            ),
        },
        PublishTarget::Unit(reference) => {
            let unit = document
                .find_unit(reference)
                .ok_or_else(|| BabelError::UnitNotFound(reference.clone()))?;
            let file_name = if unit.filename.is_empty() {
                unit_file_name(unit)
            } else {
                unit.filename.clone()
            };
            (render_unit_file(unit, &document.metadata), file_name)
        }
    };

    let artifact = match spec.output {
        Some(path) => {
            fs::write(&path, text).map_err(|source| BabelError::Io {
                path: path.clone(),
                source,
            })?;
            PublishArtifact::File(path)
        }
        None => PublishArtifact::InMemory(text),
    };
    Ok(PublishResult {
        artifact,
        file_name,
    })
}

fn article_file_name(metadata: &DocumentMetadata) -> String {
    if metadata.slug.is_empty() {
        "index.md".to_string()
    } else {
        format!("{}.md", metadata.slug)
    }
}
