//! Converter implementations
//!
//! This module contains the converters that turn LaTeX fragments into Markdown.

pub mod fallback;
#[cfg(feature = "native-export")]
pub mod pandoc;

pub use fallback::FallbackConverter;
#[cfg(feature = "native-export")]
pub use pandoc::PandocConverter;
