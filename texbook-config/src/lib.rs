//! Shared configuration loader for the texbook toolchain.
//!
//! `defaults/texbook.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`TexbookConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;
use texbook_babel::publish::PrepareOptions;
use texbook_babel::render::{ConverterChoice, RenderOptions};
use texbook_babel::templates::SLUG_LIMIT;
use texbook_babel::ParseOptions;

const DEFAULT_TOML: &str = include_str!("../defaults/texbook.default.toml");

/// File picked up from the working directory when present.
pub const PROJECT_CONFIG_FILE: &str = "texbook.toml";

/// Top-level configuration consumed by texbook applications.
#[derive(Debug, Clone, Deserialize)]
pub struct TexbookConfig {
    pub source: SourceConfig,
    pub metadata: MetadataConfig,
    pub images: ImagesConfig,
    pub render: RenderConfig,
}

/// How source files are located and decoded.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    pub default_extension: String,
    pub encodings: Vec<String>,
}

/// Defaults for document-level fields the source does not declare.
#[derive(Debug, Clone, Deserialize)]
pub struct MetadataConfig {
    pub default_author: String,
    pub default_lang: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImagesConfig {
    pub base_url: String,
    pub extensions: Vec<String>,
    pub subdirectories: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    pub converter: ConverterSetting,
    pub description_fallback: String,
    pub book_description_fallback: String,
    pub scope_labels: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ConverterSetting {
    #[serde(rename = "auto")]
    Auto,
    #[serde(rename = "pandoc")]
    Pandoc,
    #[serde(rename = "fallback")]
    Fallback,
}

impl From<ConverterSetting> for ConverterChoice {
    fn from(setting: ConverterSetting) -> Self {
        match setting {
            ConverterSetting::Auto => ConverterChoice::Auto,
            ConverterSetting::Pandoc => ConverterChoice::Named("pandoc".to_string()),
            ConverterSetting::Fallback => ConverterChoice::Named("fallback".to_string()),
        }
    }
}

impl From<&TexbookConfig> for ParseOptions {
    fn from(config: &TexbookConfig) -> Self {
        ParseOptions {
            default_extension: config.source.default_extension.clone(),
            encodings: config.source.encodings.clone(),
            image_extensions: config.images.extensions.clone(),
            image_subdirectories: config.images.subdirectories.clone(),
            default_author: config.metadata.default_author.clone(),
            default_lang: config.metadata.default_lang.clone(),
        }
    }
}

impl From<&TexbookConfig> for RenderOptions {
    fn from(config: &TexbookConfig) -> Self {
        RenderOptions {
            converter: config.render.converter.into(),
            image_base_url: config.images.base_url.clone(),
            description_fallback: config.render.description_fallback.clone(),
        }
    }
}

impl From<&TexbookConfig> for PrepareOptions {
    fn from(config: &TexbookConfig) -> Self {
        PrepareOptions {
            scope_labels: config.render.scope_labels,
            slug_limit: SLUG_LIMIT,
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<TexbookConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<TexbookConfig, ConfigError> {
    Loader::new().build()
}
