use super::text::quote;
use crate::model::{DocumentMetadata, StructuralUnit};

pub const DEFAULT_PUBLISH_DATE: &str = "2025-01-01";

/// An ordered YAML front-matter block.
///
/// Values are stored already formatted; use [`FrontMatter::text`] for quoted strings
/// and [`FrontMatter::raw`] for numbers, booleans and bare words.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    entries: Vec<(String, String)>,
}

impl FrontMatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, key: &str, value: &str) -> Self {
        self.entries.push((key.to_string(), quote(value)));
        self
    }

    pub fn raw(mut self, key: &str, value: impl ToString) -> Self {
        self.entries.push((key.to_string(), value.to_string()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// `---` delimited block, without a trailing newline.
    pub fn render(&self) -> String {
        let mut lines = Vec::with_capacity(self.entries.len() + 2);
        lines.push("---".to_string());
        for (key, value) in &self.entries {
            lines.push(format!("{key}: {value}"));
        }
        lines.push("---".to_string());
        lines.join("\n")
    }
}

/// Front matter of a chapter or appendix file.
pub fn unit_front_matter(unit: &StructuralUnit, metadata: &DocumentMetadata) -> FrontMatter {
    FrontMatter::new()
        .text("title", &unit.title)
        .text("description", &unit.description)
        .raw("chapterNumber", unit.ordinal)
        .raw("lang", &metadata.lang)
        .raw("draft", unit.is_draft)
}

/// Front matter of the book overview (`index.md`) or of a single-file article.
pub fn index_front_matter(metadata: &DocumentMetadata, fallback_description: &str) -> FrontMatter {
    let description = if metadata.description.is_empty() {
        fallback_description
    } else {
        metadata.description.as_str()
    };
    let publish_date = if metadata.publish_date.is_empty() {
        DEFAULT_PUBLISH_DATE
    } else {
        metadata.publish_date.as_str()
    };
    FrontMatter::new()
        .text("title", &metadata.title)
        .text("description", description)
        .raw("lang", &metadata.lang)
        .text("author", &metadata.author)
        .text("coverImage", &metadata.cover_image)
        .text("pdfUrl", &metadata.pdf_url)
        .raw("publishDate", publish_date)
        .raw("draft", metadata.draft)
        .raw("order", metadata.order)
}
