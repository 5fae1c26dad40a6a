//! Core data structures of the document model.

use serde::Serialize;
use std::path::PathBuf;

/// Distinguishes multi-file books from single-file articles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum ContentType {
    #[default]
    Book,
    Article,
}

/// Document-level declarations.
///
/// Created once per parse. Fields are public because the hosting application
/// is expected to override them (for instance from a review screen) before
/// rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentMetadata {
    pub title: String,
    pub author: String,
    pub publish_date: String,
    pub updated_date: String,
    pub description: String,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
    pub lang: String,
    pub content_type: ContentType,
    /// Explicit slug; empty means "derive from the title".
    pub slug: String,
    pub draft: bool,
    pub cover_image: String,
    pub pdf_url: String,
    pub order: i64,
}

pub const DEFAULT_LANG: &str = "fa";

impl Default for DocumentMetadata {
    fn default() -> Self {
        DocumentMetadata {
            title: String::new(),
            author: String::new(),
            publish_date: String::new(),
            updated_date: String::new(),
            description: String::new(),
            tags: Vec::new(),
            categories: Vec::new(),
            lang: DEFAULT_LANG.to_string(),
            content_type: ContentType::Book,
            slug: String::new(),
            draft: true,
            cover_image: String::new(),
            pdf_url: String::new(),
            order: 0,
        }
    }
}

/// Whether a structural unit belongs to the main body or the appendix region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnitKind {
    Chapter,
    Appendix,
}

impl UnitKind {
    /// Human label used for placeholder titles ("Chapter 2", "Appendix B").
    pub fn label(&self) -> &'static str {
        match self {
            UnitKind::Chapter => "Chapter",
            UnitKind::Appendix => "Appendix",
        }
    }

    fn id_prefix(&self) -> &'static str {
        match self {
            UnitKind::Chapter => "ch",
            UnitKind::Appendix => "app",
        }
    }
}

/// A chapter or appendix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructuralUnit {
    pub kind: UnitKind,
    /// 1-based position inside its region.
    pub ordinal: usize,
    pub title: String,
    pub short_title: Option<String>,
    /// False for starred (`\chapter*`) markers.
    pub numbered: bool,
    pub slug: String,
    pub filename: String,
    /// Raw LaTeX between this unit's marker and the next one.
    pub source: String,
    /// Markdown produced by the renderer; `None` until rendered.
    pub rendered: Option<String>,
    pub description: String,
    pub is_draft: bool,
    pub is_approved: bool,
    pub is_included: bool,
    pub images: Vec<ImageRef>,
    pub warnings: Vec<String>,
}

impl StructuralUnit {
    pub fn new(kind: UnitKind, ordinal: usize, title: impl Into<String>) -> Self {
        StructuralUnit {
            kind,
            ordinal,
            title: title.into(),
            short_title: None,
            numbered: true,
            slug: String::new(),
            filename: String::new(),
            source: String::new(),
            rendered: None,
            description: String::new(),
            is_draft: false,
            is_approved: false,
            is_included: true,
            images: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Display number: `"3"` for chapters, `"C"` for appendices.
    pub fn number(&self) -> String {
        match self.kind {
            UnitKind::Chapter => self.ordinal.to_string(),
            UnitKind::Appendix => appendix_letter(self.ordinal),
        }
    }

    /// Stable identifier such as `ch03` or `appC`.
    pub fn id(&self) -> String {
        match self.kind {
            UnitKind::Chapter => format!("{}{:02}", self.kind.id_prefix(), self.ordinal),
            UnitKind::Appendix => format!("{}{}", self.kind.id_prefix(), self.number()),
        }
    }

    pub fn is_rendered(&self) -> bool {
        self.rendered.is_some()
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

/// Letter code for an appendix ordinal: 1 → A, 26 → Z, 27 → AA.
pub fn appendix_letter(ordinal: usize) -> String {
    let mut n = ordinal;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// What a label points at. Only `Unknown` is assigned today.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum LabelKind {
    Chapter,
    Section,
    Figure,
    Table,
    Equation,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelDescriptor {
    pub kind: LabelKind,
    pub number: String,
    pub title: String,
    /// Output file owning the label, when known.
    pub file: Option<String>,
}

impl LabelDescriptor {
    pub fn unscoped(key: &str) -> Self {
        LabelDescriptor {
            kind: LabelKind::Unknown,
            number: "0".to_string(),
            title: key.to_string(),
            file: None,
        }
    }
}

/// An image referenced by `\includegraphics`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageRef {
    /// Name as written in the source, usually without extension.
    pub name: String,
    /// Resolved file on disk, if any candidate matched.
    pub path: Option<PathBuf>,
    /// File name the image should be published under.
    pub output_name: String,
    /// PDF and EPS sources must be rasterized before publishing.
    pub needs_conversion: bool,
}
