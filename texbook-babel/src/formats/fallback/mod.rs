//! Built-in rule-based converter
//!
//!     Used when pandoc is not installed or fails on a fragment. It is a deterministic,
//!     lossy substitution engine, not a LaTeX parser: it translates the handful of
//!     constructs listed in [`rules`] and strips everything else.
//!
//!     Known limitations:
//!
//!         - Nested lists come out flat.
//!         - Tables, footnotes, citations and custom macros are removed along with their
//!           arguments.
//!         - Comments are passed through as text.

pub mod rules;

use crate::error::Result;
use crate::format::Converter;
pub use rules::{RewriteRule, RuleContext, RuleSet};

pub struct FallbackConverter {
    rules: RuleSet,
}

impl FallbackConverter {
    pub fn new(rules: RuleSet) -> Self {
        FallbackConverter { rules }
    }

    /// Convert without going through the [`Converter`] interface; never fails.
    pub fn convert_text(&self, latex: &str) -> String {
        self.rules.apply(latex)
    }
}

impl Default for FallbackConverter {
    fn default() -> Self {
        Self::new(RuleSet::standard())
    }
}

impl Converter for FallbackConverter {
    fn name(&self) -> &str {
        "fallback"
    }

    fn description(&self) -> &str {
        "Rule-based LaTeX to Markdown substitution (lossy)"
    }

    fn convert(&self, latex: &str) -> Result<String> {
        Ok(self.convert_text(latex))
    }
}
