//! Cross-reference resolution against a [`LabelRegistry`]
//!
//!     Every reference directive (`\ref`, `\eqref`, `\autoref`, `\cref`, `\Cref`, `\pageref`)
//!     becomes one of:
//!
//!     | registry state             | output                |
//!     |----------------------------|-----------------------|
//!     | key with an owning file    | `[key](file#key)`     |
//!     | key without a file         | `[REF:key](#key)`     |
//!     | key absent                 | `[MISSING-REF:key]`   |
//!
//!     Gaps stay visible in the output instead of disappearing.
//!
//!     Converters (the external one in particular) do not know about these links and would
//!     escape or drop them, so the renderer uses [`ReferenceResolver::protect`] before
//!     conversion and [`Protected::restore`] after it.

use crate::common::stash::Stash;
use crate::model::LabelRegistry;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\(?:ref|eqref|autoref|cref|Cref|pageref)\s*\{([^}]+)\}").unwrap()
});

pub const MISSING_PREFIX: &str = "MISSING-REF:";

/// Text whose references were swapped for placeholder tokens.
#[derive(Debug, Clone)]
pub struct Protected {
    pub text: String,
    stash: Stash,
    /// Keys cited but not registered, in order of appearance.
    pub missing: Vec<String>,
}

impl Protected {
    /// Swap the tokens in (converted) text back for resolved links.
    pub fn restore(&self, converted: &str) -> String {
        self.stash.restore(converted)
    }
}

pub struct ReferenceResolver<'a> {
    labels: &'a LabelRegistry,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(labels: &'a LabelRegistry) -> Self {
        ReferenceResolver { labels }
    }

    /// Markdown for a single key.
    pub fn link_for(&self, key: &str) -> String {
        match self.labels.get(key) {
            Some(label) => match label.file.as_deref().filter(|file| !file.is_empty()) {
                Some(file) => format!("[{key}]({file}#{key})"),
                None => format!("[REF:{key}](#{key})"),
            },
            None => format!("[{MISSING_PREFIX}{key}]"),
        }
    }

    /// Markdown for a directive argument; `\cref{a,b}` lists several keys.
    pub fn links_for(&self, keys: &str) -> String {
        split_keys(keys)
            .map(|key| self.link_for(key))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Replace every reference directive in `text` directly.
    pub fn resolve(&self, text: &str) -> String {
        REFERENCE
            .replace_all(text, |caps: &Captures<'_>| self.links_for(&caps[1]))
            .into_owned()
    }

    /// Replace every reference directive with a placeholder token.
    pub fn protect(&self, text: &str) -> Protected {
        let mut stash = Stash::new('R');
        let mut missing = Vec::new();
        let protected = REFERENCE
            .replace_all(text, |caps: &Captures<'_>| {
                for key in split_keys(&caps[1]) {
                    if !self.labels.contains(key) && !missing.iter().any(|m| m == key) {
                        missing.push(key.to_string());
                    }
                }
                stash.hold(self.links_for(&caps[1]))
            })
            .into_owned();
        Protected {
            text: protected,
            stash,
            missing,
        }
    }
}

fn split_keys(keys: &str) -> impl Iterator<Item = &str> {
    keys.split(',').map(str::trim).filter(|key| !key.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LabelDescriptor;

    fn registry() -> LabelRegistry {
        let mut labels = LabelRegistry::new();
        labels.insert("sec:intro", LabelDescriptor::unscoped("sec:intro"));
        let mut owned = LabelDescriptor::unscoped("fig:plot");
        owned.file = Some("ch02-results.md".to_string());
        labels.insert("fig:plot", owned);
        labels
    }

    #[test]
    fn resolves_each_registry_state() {
        let labels = registry();
        let resolver = ReferenceResolver::new(&labels);
        let out = resolver.resolve(r"See \ref{sec:intro}, \eqref{fig:plot} and \ref{fig:missing}.");
        assert_eq!(
            out,
            "See [REF:sec:intro](#sec:intro), [fig:plot](ch02-results.md#fig:plot) and [MISSING-REF:fig:missing]."
        );
    }

    #[test]
    fn protect_hides_directives_and_reports_missing() {
        let labels = registry();
        let resolver = ReferenceResolver::new(&labels);
        let protected = resolver.protect(r"\ref{a} \ref{sec:intro} \autoref{a}");

        assert!(!protected.text.contains('\\'));
        assert_eq!(protected.missing, vec!["a"]);
        assert_eq!(
            protected.restore(&protected.text),
            "[MISSING-REF:a] [REF:sec:intro](#sec:intro) [MISSING-REF:a]"
        );
    }

    #[test]
    fn key_lists_resolve_each_key() {
        let labels = registry();
        let resolver = ReferenceResolver::new(&labels);
        assert_eq!(
            resolver.resolve(r"\cref{sec:intro, fig:plot}"),
            "[REF:sec:intro](#sec:intro), [fig:plot](ch02-results.md#fig:plot)"
        );

        let protected = resolver.protect(r"\Cref{fig:plot,gone,}");
        assert_eq!(protected.missing, vec!["gone"]);
        assert_eq!(
            protected.restore(&protected.text),
            "[fig:plot](ch02-results.md#fig:plot), [MISSING-REF:gone]"
        );
    }
}
