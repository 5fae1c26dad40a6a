//! LaTeX book projects to Markdown
//!
//!     This crate reads a multi-file LaTeX project (a root document pulling in others through
//!     `\input`, `\include` and `\subfile`), builds a normalized document model from it, and
//!     renders that model into Markdown files with front matter for a static-site generator.
//!
//!     TLDR:
//!         - Malformed input never aborts a parse. Missing files, include cycles and undecodable
//!           files become inline markers; untitled chapters get placeholder titles; problems
//!           found while rendering are recorded as warnings on the unit.
//!         - The only hard errors are an unresolvable root document and I/O around it, plus
//!           converter selection and output writing.
//!         - This is a pure lib: it powers texbook-cli but never prints, reads env vars for
//!           behavior (converter binary lookup aside) or writes files unless asked to.
//!
//! Architecture
//!
//!     Parsing is a fixed sequence of passes over one flattened text:
//!
//!         expand includes → metadata → chapter / appendix split → images → labels
//!
//!     Each pass lives in ./ingest and is a plain function of the expanded text, which keeps the
//!     passes testable in isolation. ./project.rs wires them into a [`model::Document`].
//!
//!     Rendering converts one unit at a time. Cross references are swapped for opaque tokens
//!     before conversion (./refs.rs, ./common/stash.rs) so no converter can mangle them, then
//!     restored as links against the label registry.
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── model                   # Document, units, labels, images
//!     ├── ingest                  # Parsing passes
//!     ├── project.rs              # Pass orchestration
//!     ├── refs.rs                 # Reference resolution
//!     ├── format.rs               # Converter trait definition
//!     ├── registry.rs             # ConverterRegistry for discovery and selection
//!     ├── formats
//!     │   ├── fallback            # Rule-based converter
//!     │   └── pandoc              # External pandoc converter
//!     ├── render.rs               # Per-unit rendering pipeline
//!     ├── templates               # Front matter, descriptions, slugs
//!     ├── publish.rs              # File naming and output assembly
//!     └── common                  # Brace scanning, placeholder stash
//!
//! Testing
//!     tests
//!     ├── common                  # Shared project fixtures
//!     ├── ingest
//!     └── render
//!
//!     Note that rust does not by default discover tests in subdirectories, so we need to include these
//!     in the mod.
//!
//! Converters
//!
//!     Pandoc gives the best output and is used when installed. The fallback converter is a fixed,
//!     ordered list of rewrite rules: it handles headings, emphasis, math, lists, images and labels,
//!     and strips whatever LaTeX remains. It is lossy on purpose and always available.
//!
pub mod error;
pub mod format;
pub mod formats;
pub mod project;
pub mod publish;
pub mod refs;
pub mod registry;
pub mod render;
pub mod templates;

pub mod common;
pub mod ingest;
pub mod model;

pub use error::{BabelError, Result};
pub use format::Converter;
pub use model::Document;
pub use project::{ParseOptions, ProjectParser};
pub use registry::ConverterRegistry;
pub use render::{ConverterChoice, RenderOptions, Renderer};

use std::path::Path;

/// Parse the project rooted at `root_file` with default options.
pub fn parse_project(root_file: impl AsRef<Path>) -> Result<Document> {
    ProjectParser::new(root_file).parse()
}
