//! Unit rendering: LaTeX source to Markdown with resolved references.
//!
//!     Per unit, in order:
//!
//!         1. protect references (placeholder tokens, see [`crate::refs`])
//!         2. convert with the selected converter; a failing converter falls back to
//!            the rule engine and leaves a warning on the unit
//!         3. restore references as Markdown links
//!         4. point image links at their published location
//!         5. store the Markdown and its short description on the unit
//!
//!     A unit that already carries rendered text is skipped, so rendering a document
//!     twice never converts a unit twice.

use crate::error::Result;
use crate::format::Converter;
use crate::formats::fallback::FallbackConverter;
use crate::model::{Document, ImageRef, LabelRegistry, StructuralUnit};
use crate::refs::ReferenceResolver;
use crate::registry::ConverterRegistry;
use crate::templates::{describe, DEFAULT_UNIT_DESCRIPTION};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use tracing::{debug, warn};

static IMAGE_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)\s]+)\)").unwrap());

/// Which converter the renderer uses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConverterChoice {
    /// First available converter in registry priority order.
    #[default]
    Auto,
    Named(String),
}

impl ConverterChoice {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "" | "auto" => ConverterChoice::Auto,
            name => ConverterChoice::Named(name.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub converter: ConverterChoice,
    /// Prefix for published image links; empty leaves bare output names.
    pub image_base_url: String,
    /// Description used when a unit renders to nothing readable.
    pub description_fallback: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            converter: ConverterChoice::Auto,
            image_base_url: String::new(),
            description_fallback: DEFAULT_UNIT_DESCRIPTION.to_string(),
        }
    }
}

pub struct Renderer {
    registry: ConverterRegistry,
    fallback: FallbackConverter,
    options: RenderOptions,
}

impl Renderer {
    pub fn new(options: RenderOptions) -> Self {
        Self::with_registry(ConverterRegistry::with_defaults(), options)
    }

    pub fn with_registry(registry: ConverterRegistry, options: RenderOptions) -> Self {
        Renderer {
            registry,
            fallback: FallbackConverter::default(),
            options,
        }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// The converter selected by the options.
    ///
    /// A named converter that is missing or cannot run is an error; `Auto` always
    /// succeeds because the rule engine is the last resort.
    pub fn converter(&self) -> Result<&dyn Converter> {
        match &self.options.converter {
            ConverterChoice::Auto => Ok(self
                .registry
                .preferred()
                .unwrap_or(&self.fallback as &dyn Converter)),
            ConverterChoice::Named(name) => self.registry.get_available(name),
        }
    }

    /// Render every included unit that has not been rendered yet.
    ///
    /// Returns the number of units rendered by this call.
    pub fn render_document(&self, document: &mut Document) -> Result<usize> {
        let converter = self.converter()?;
        let Document {
            chapters,
            appendices,
            labels,
            images,
            ..
        } = document;

        let mut rendered = 0;
        for unit in chapters.iter_mut().chain(appendices.iter_mut()) {
            if unit.is_included && self.render_unit_with(converter, unit, labels, images) {
                rendered += 1;
            }
        }
        debug!(converter = converter.name(), rendered, "rendered document");
        Ok(rendered)
    }

    /// Render one unit; `Ok(false)` when it was already rendered.
    pub fn render_unit(
        &self,
        unit: &mut StructuralUnit,
        labels: &LabelRegistry,
        images: &BTreeMap<String, ImageRef>,
    ) -> Result<bool> {
        let converter = self.converter()?;
        Ok(self.render_unit_with(converter, unit, labels, images))
    }

    fn render_unit_with(
        &self,
        converter: &dyn Converter,
        unit: &mut StructuralUnit,
        labels: &LabelRegistry,
        images: &BTreeMap<String, ImageRef>,
    ) -> bool {
        if unit.is_rendered() {
            return false;
        }

        let protected = ReferenceResolver::new(labels).protect(&unit.source);
        let converted = match converter.convert(&protected.text) {
            Ok(markdown) => markdown,
            Err(err) => {
                warn!(
                    unit = %unit.id(),
                    converter = converter.name(),
                    error = %err,
                    "converter failed, using fallback rules"
                );
                unit.warn(format!(
                    "{} conversion failed ({err}); used the fallback converter",
                    converter.name()
                ));
                self.fallback.convert_text(&protected.text)
            }
        };
        let markdown = self.link_images(&protected.restore(&converted), images);

        for key in &protected.missing {
            unit.warn(format!("reference to undefined label '{key}'"));
        }
        unit.description = describe(&markdown, &self.options.description_fallback);
        unit.rendered = Some(markdown);
        debug!(unit = %unit.id(), missing = protected.missing.len(), "rendered unit");
        true
    }

    /// Point image links whose target is a known image name at its published file.
    pub fn link_images(&self, markdown: &str, images: &BTreeMap<String, ImageRef>) -> String {
        IMAGE_LINK
            .replace_all(markdown, |caps: &Captures<'_>| {
                match images.get(caps[2].trim()) {
                    Some(image) => format!("![{}]({})", &caps[1], self.image_url(image)),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }

    fn image_url(&self, image: &ImageRef) -> String {
        let base = self.options.image_base_url.trim_end_matches('/');
        if base.is_empty() {
            image.output_name.clone()
        } else {
            format!("{base}/{}", image.output_name)
        }
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}

/// Convert a fragment with the rule engine and resolve references directly.
///
/// Shortcut for callers that only need text, with no unit bookkeeping.
pub fn render_fragment(latex: &str, labels: &LabelRegistry) -> String {
    let protected = ReferenceResolver::new(labels).protect(latex);
    protected.restore(&FallbackConverter::default().convert_text(&protected.text))
}

impl From<&str> for ConverterChoice {
    fn from(value: &str) -> Self {
        ConverterChoice::parse(value)
    }
}
