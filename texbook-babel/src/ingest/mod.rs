//! Ingestion passes over a LaTeX project
//!
//!     source      Flattens the include graph into one text (cycle and missing-file safe).
//!     metadata    Title, author, date, keywords, abstract, document class, graphics paths.
//!     structure   Chapter / appendix partitioning.
//!     labels      `\label` registry.
//!     images      `\includegraphics` discovery and file resolution.
//!
//!     Apart from `source`, the passes are pure functions of the expanded text and share no
//!     state, so they can run in any order. [`crate::project::ProjectParser`] wires them
//!     together.

pub mod images;
pub mod labels;
pub mod metadata;
pub mod source;
pub mod structure;

pub use images::{discover_images, ImageResolver};
pub use metadata::{extract_graphics_paths, extract_metadata};
pub use source::{Expansion, ExpansionIssue, SourceExpander, SourceUnit};
pub use structure::split_units;
