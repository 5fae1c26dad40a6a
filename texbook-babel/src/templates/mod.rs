//! Text helpers for the publishing side.
//!
//! Static-site generators expect each Markdown file to start with a YAML front-matter
//! block and to live under a URL-safe file name. This module provides:
//!
//! - **Front matter** ([`frontmatter`]): the unit and overview blocks, with string values
//!   quoted and escaped.
//! - **Descriptions** ([`describe`]): a bounded plain-text summary of rendered Markdown.
//! - **Slugs** ([`slugify`]): file-name-safe identifiers that keep Persian/Arabic letters.

mod text;

pub mod frontmatter;

pub use frontmatter::{index_front_matter, unit_front_matter, FrontMatter, DEFAULT_PUBLISH_DATE};
pub use text::{
    describe, quote, slugify, DEFAULT_BOOK_DESCRIPTION, DEFAULT_UNIT_DESCRIPTION,
    DESCRIPTION_LIMIT, SLUG_LIMIT,
};
