//! Error types for ingestion and rendering
//!
//! Malformed LaTeX never produces an error: the pipeline degrades to inline markers,
//! placeholder titles and unit warnings instead. The variants below cover the
//! conditions that are outside the content itself.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while parsing a project or rendering its units
#[derive(Error, Debug)]
pub enum BabelError {
    /// The root document could not be located, even after trying the default extension
    #[error("Root document '{}' could not be resolved", .0.display())]
    RootUnresolvable(PathBuf),

    /// The root document exists but could not be read
    #[error("I/O error reading '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Converter not found in registry
    #[error("Converter '{0}' not found")]
    ConverterNotFound(String),

    /// Converter is registered but cannot run on this machine
    #[error("Converter '{0}' is not available")]
    ConverterUnavailable(String),

    /// No chapter or appendix matches the given number or id
    #[error("No unit '{0}' in the document")]
    UnitNotFound(String),

    /// Error reported by a converter while producing Markdown
    #[error("Conversion error: {0}")]
    Conversion(String),
}

pub type Result<T> = std::result::Result<T, BabelError>;
