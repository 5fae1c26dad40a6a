//! Converter trait definition
//!
//! A converter turns one LaTeX fragment (the body of a chapter or appendix) into Markdown.
//! Converters see text only: cross references have already been swapped for placeholder
//! tokens by the renderer, and they must pass unknown characters through untouched.

use crate::error::Result;

/// Trait for LaTeX to Markdown converters
///
/// # Examples
///
/// ```ignore
/// struct Upper;
///
/// impl Converter for Upper {
///     fn name(&self) -> &str {
///         "upper"
///     }
///
///     fn convert(&self, latex: &str) -> Result<String> {
///         Ok(latex.to_uppercase())
///     }
/// }
/// ```
pub trait Converter: Send + Sync {
    /// The name of this converter (e.g., "pandoc", "fallback")
    fn name(&self) -> &str;

    /// Optional description of this converter
    fn description(&self) -> &str {
        ""
    }

    /// Whether the converter can run on this machine.
    ///
    /// Converters backed by an external program return `false` when the program
    /// cannot be located.
    fn is_available(&self) -> bool {
        true
    }

    /// Convert a LaTeX fragment into Markdown
    fn convert(&self, latex: &str) -> Result<String>;
}
