//! Placeholder stash for spans that later passes must not touch.
//!
//! A span is swapped for an opaque token built from Unicode private-use
//! characters, which no LaTeX rule and no Markdown converter rewrites. After the
//! risky passes ran, [`Stash::restore`] swaps the tokens back. Each stash has its
//! own namespace letter so stashes can be layered (references around a converter,
//! math inside the fallback converter).

use regex::Regex;

const OPEN: char = '\u{E000}';
const CLOSE: char = '\u{E001}';

#[derive(Debug, Clone)]
pub struct Stash {
    namespace: char,
    entries: Vec<String>,
}

impl Stash {
    /// `namespace` must be an ASCII letter.
    pub fn new(namespace: char) -> Self {
        debug_assert!(namespace.is_ascii_alphabetic());
        Stash {
            namespace,
            entries: Vec::new(),
        }
    }

    /// Store `content` and return the token standing in for it.
    pub fn hold(&mut self, content: impl Into<String>) -> String {
        self.entries.push(content.into());
        format!("{OPEN}{}{}{CLOSE}", self.namespace, self.entries.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replace every token of this namespace in `text` with its stored content.
    ///
    /// Tokens a converter dropped are simply gone; unknown indices are left as is.
    pub fn restore(&self, text: &str) -> String {
        if self.entries.is_empty() {
            return text.to_string();
        }
        let pattern = Regex::new(&format!("{OPEN}{}([0-9]+){CLOSE}", self.namespace))
            .expect("stash token pattern is valid");
        pattern
            .replace_all(text, |caps: &regex::Captures<'_>| {
                caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|idx| self.entries.get(idx))
                    .cloned()
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}
