//! Project parsing: runs the ingestion passes in order and assembles a [`Document`].

use crate::error::Result;
use crate::ingest::images::{
    discover_images, ImageResolver, DEFAULT_EXTENSIONS, DEFAULT_SUBDIRECTORIES,
};
use crate::ingest::metadata::{extract_graphics_paths, extract_metadata};
use crate::ingest::source::{Expansion, SourceExpander, DEFAULT_ENCODINGS, DEFAULT_EXTENSION};
use crate::ingest::structure::{split_units, whole_body_unit};
use crate::model::{ContentType, Document, ImageRef, LabelRegistry, StructuralUnit, DEFAULT_LANG};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

/// Knobs for the ingestion passes.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOptions {
    /// Extension tried for include targets written without one.
    pub default_extension: String,
    /// Decoding chain for source files (encoding labels, e.g. `utf-8`).
    pub encodings: Vec<String>,
    /// Extensions tried when resolving images; `""` is the name as written.
    pub image_extensions: Vec<String>,
    /// Sub-directories searched under each image directory.
    pub image_subdirectories: Vec<String>,
    /// Author used when the source declares none.
    pub default_author: String,
    pub default_lang: String,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            default_extension: DEFAULT_EXTENSION.to_string(),
            encodings: DEFAULT_ENCODINGS.iter().map(|e| e.to_string()).collect(),
            image_extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            image_subdirectories: DEFAULT_SUBDIRECTORIES
                .iter()
                .map(|d| d.to_string())
                .collect(),
            default_author: String::new(),
            default_lang: DEFAULT_LANG.to_string(),
        }
    }
}

/// Parses one LaTeX project into a [`Document`].
///
/// Each call to [`ProjectParser::parse`] starts from scratch; to refresh a document
/// after the sources changed, parse again rather than patching the old one.
#[derive(Debug, Clone)]
pub struct ProjectParser {
    root_file: PathBuf,
    options: ParseOptions,
}

impl ProjectParser {
    pub fn new(root_file: impl AsRef<Path>) -> Self {
        ProjectParser {
            root_file: root_file.as_ref().to_path_buf(),
            options: ParseOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    pub fn parse(&self) -> Result<Document> {
        self.parse_with_expansion().map(|(document, _)| document)
    }

    /// Parse and also hand back the expansion (flattened text, files read, markers used).
    pub fn parse_with_expansion(&self) -> Result<(Document, Expansion)> {
        let expander = SourceExpander::for_root_file(&self.root_file)
            .with_default_extension(self.options.default_extension.clone())
            .with_encodings(&self.options.encodings);
        let expansion = expander.expand_with_report(&self.root_file)?;
        let text = expansion.text.as_str();

        let mut document = Document::new(expander.root_dir());

        document.metadata = extract_metadata(text);
        if document.metadata.author.is_empty() {
            document.metadata.author = self.options.default_author.clone();
        }
        document.metadata.lang = self.options.default_lang.clone();

        let resolver = ImageResolver::new(expander.root_dir())
            .with_graphics_paths(&extract_graphics_paths(text))
            .with_extensions(&self.options.image_extensions)
            .with_subdirectories(&self.options.image_subdirectories);
        document.graphics_paths = resolver.graphics_paths().to_vec();

        let (mut chapters, mut appendices) = split_units(text);
        if chapters.is_empty() && document.metadata.content_type == ContentType::Article {
            chapters.push(whole_body_unit(text, &document.metadata.title));
        }
        for unit in chapters.iter_mut().chain(appendices.iter_mut()) {
            attach_images(unit, &resolver, &mut document.images);
        }
        for name in discover_images(text) {
            if !document.images.contains_key(&name) {
                let image = resolver.resolve(&name);
                document.images.insert(name, image);
            }
        }
        document.chapters = chapters;
        document.appendices = appendices;

        document.labels = LabelRegistry::collect(text);

        info!(
            root = %self.root_file.display(),
            files = expansion.files.len(),
            chapters = document.chapters.len(),
            appendices = document.appendices.len(),
            labels = document.labels.len(),
            images = document.images.len(),
            "parsed project"
        );

        Ok((document, expansion))
    }
}

fn attach_images(
    unit: &mut StructuralUnit,
    resolver: &ImageResolver,
    known: &mut BTreeMap<String, ImageRef>,
) {
    for name in discover_images(&unit.source) {
        let image = known
            .entry(name.clone())
            .or_insert_with(|| resolver.resolve(&name))
            .clone();
        if image.path.is_none() {
            unit.warn(format!("image '{name}' could not be found"));
        }
        unit.images.push(image);
    }
}
