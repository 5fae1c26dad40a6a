//! Rewrite rules used by the fallback converter.
//!
//! Each rule is an independent text transformation. The order in [`RuleSet::standard`]
//! matters: math is stashed before anything else so its contents stay verbatim, and the
//! cleanup rule runs last because it removes every command still left, including the
//! ones earlier rules know how to translate.

use crate::common::scan::{rewrite_commands, rewrite_commands_with, Spacing};
use crate::common::stash::Stash;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// State shared by the rules of one conversion.
#[derive(Debug)]
pub struct RuleContext {
    /// Math spans removed by [`MathRule`], restored after the last rule.
    pub math: Stash,
    /// Characters produced by [`EscapeRule`], hidden from the cleanup.
    pub literals: Stash,
}

impl RuleContext {
    pub fn new() -> Self {
        RuleContext {
            math: Stash::new('M'),
            literals: Stash::new('L'),
        }
    }
}

impl RuleContext {
    pub fn restore(&self, text: &str) -> String {
        self.math.restore(&self.literals.restore(text))
    }
}

impl Default for RuleContext {
    fn default() -> Self {
        Self::new()
    }
}

pub trait RewriteRule: Send + Sync {
    fn name(&self) -> &'static str;

    fn apply(&self, text: &str, context: &mut RuleContext) -> String;
}

/// An ordered list of rules.
pub struct RuleSet {
    rules: Vec<Box<dyn RewriteRule>>,
}

impl RuleSet {
    pub fn new() -> Self {
        RuleSet { rules: Vec::new() }
    }

    pub fn push<R: RewriteRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Math, headings, emphasis, lists, images, labels, escapes, cleanup.
    pub fn standard() -> Self {
        RuleSet::new()
            .push(MathRule)
            .push(HeadingRule)
            .push(EmphasisRule)
            .push(ListRule)
            .push(ImageRule)
            .push(LabelRule)
            .push(EscapeRule)
            .push(CleanupRule)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// Run every rule in order, then put the stashed literals and math back.
    pub fn apply(&self, text: &str) -> String {
        let mut context = RuleContext::new();
        let mut current = text.to_string();
        for rule in &self.rules {
            current = rule.apply(&current, &mut context);
        }
        context.restore(&current)
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::standard()
    }
}

static ESCAPED_DOLLAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\\$").unwrap());
static MATH_ENVIRONMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?s)\\begin\s*\{(equation|align|gather|multline)\*?\}(.*?)\\end\s*\{(equation|align|gather|multline)\*?\}",
    )
    .unwrap()
});
static DOUBLE_DOLLAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\$\$(.+?)\$\$").unwrap());
static DISPLAY_BRACKETS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\\\[(.*?)\\\]").unwrap());
static INLINE_PARENS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\\\((.*?)\\\)").unwrap());
static SINGLE_DOLLAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$([^$]+?)\$").unwrap());

/// Display and inline math, kept verbatim between `$$` / `$` delimiters.
pub struct MathRule;

impl RewriteRule for MathRule {
    fn name(&self) -> &'static str {
        "math"
    }

    fn apply(&self, text: &str, context: &mut RuleContext) -> String {
        let math = &mut context.math;
        let text = ESCAPED_DOLLAR.replace_all(text, |caps: &Captures<'_>| math.hold(&caps[0]));
        let text = MATH_ENVIRONMENT.replace_all(&text, |caps: &Captures<'_>| {
            if caps[1] == caps[3] {
                math.hold(format!("$${}$$", &caps[2]))
            } else {
                caps[0].to_string()
            }
        });
        let text = DOUBLE_DOLLAR.replace_all(&text, |caps: &Captures<'_>| {
            math.hold(format!("$${}$$", &caps[1]))
        });
        let text = DISPLAY_BRACKETS.replace_all(&text, |caps: &Captures<'_>| {
            math.hold(format!("$${}$$", &caps[1]))
        });
        let text = INLINE_PARENS.replace_all(&text, |caps: &Captures<'_>| {
            math.hold(format!("${}$", &caps[1]))
        });
        SINGLE_DOLLAR
            .replace_all(&text, |caps: &Captures<'_>| {
                math.hold(format!("${}$", &caps[1]))
            })
            .into_owned()
    }
}

static HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\(section|subsection|subsubsection|paragraph)\b").unwrap());

/// Sectioning commands below chapter level become Markdown headings.
pub struct HeadingRule;

impl HeadingRule {
    fn marker(name: &str) -> &'static str {
        match name {
            "section" => "##",
            "subsection" => "###",
            "subsubsection" => "####",
            _ => "#####",
        }
    }
}

impl RewriteRule for HeadingRule {
    fn name(&self) -> &'static str {
        "headings"
    }

    fn apply(&self, text: &str, _context: &mut RuleContext) -> String {
        rewrite_commands(text, &HEADING, |command| {
            let title = command.argument?;
            Some(format!("{} {}", Self::marker(command.name), title.trim()))
        })
    }
}

static EMPHASIS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\(textbf|textit|emph|texttt)\b").unwrap());

/// Bold, italic and monospace.
pub struct EmphasisRule;

impl RewriteRule for EmphasisRule {
    fn name(&self) -> &'static str {
        "emphasis"
    }

    fn apply(&self, text: &str, _context: &mut RuleContext) -> String {
        // An outer match hides nested commands in its argument, so repeat until stable.
        let mut current = text.to_string();
        loop {
            let next = rewrite_commands(&current, &EMPHASIS, |command| {
                let inner = command.argument?;
                let wrapped = match command.name {
                    "textbf" => format!("**{inner}**"),
                    "texttt" => format!("`{inner}`"),
                    _ => format!("*{inner}*"),
                };
                Some(wrapped)
            });
            if next == current {
                return current;
            }
            current = next;
        }
    }
}

static LIST_DELIMITER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\(?:begin|end)\s*\{(?:itemize|enumerate|description)\}(?:\[[^\]]*\])?").unwrap()
});
static ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\item\b(?:\s*\[([^\]]*)\])?\s*").unwrap());

/// List environments flattened to `- ` bullets.
pub struct ListRule;

impl RewriteRule for ListRule {
    fn name(&self) -> &'static str {
        "lists"
    }

    fn apply(&self, text: &str, _context: &mut RuleContext) -> String {
        let text = LIST_DELIMITER.replace_all(text, "");
        ITEM.replace_all(&text, |caps: &Captures<'_>| match caps.get(1) {
            Some(term) => format!("- **{}** ", term.as_str().trim()),
            None => "- ".to_string(),
        })
        .into_owned()
    }
}

static INCLUDE_GRAPHICS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\(includegraphics)\b").unwrap());

/// `\includegraphics` becomes an image link named after the reference; the renderer
/// rewrites the target to the published location.
pub struct ImageRule;

impl RewriteRule for ImageRule {
    fn name(&self) -> &'static str {
        "images"
    }

    fn apply(&self, text: &str, _context: &mut RuleContext) -> String {
        rewrite_commands(text, &INCLUDE_GRAPHICS, |command| {
            let name = command.argument?.trim();
            Some(format!("![{name}]({name})"))
        })
    }
}

static LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\label\s*\{([^}]+)\}").unwrap());

/// Labels become HTML anchors so `file#key` links land somewhere.
pub struct LabelRule;

impl RewriteRule for LabelRule {
    fn name(&self) -> &'static str {
        "labels"
    }

    fn apply(&self, text: &str, _context: &mut RuleContext) -> String {
        LABEL
            .replace_all(text, |caps: &Captures<'_>| {
                format!("<a id=\"{}\"></a>", caps[1].trim())
            })
            .into_owned()
    }
}

static ESCAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\\(\\|[%&#_{}])|\\(['`"^~=.])\s*(?:\{\s*([^{}]*?)\s*\}|([a-zA-Z]))|~"#).unwrap()
});

/// Escaped special characters become literals, `\\` a line break and `~` a space.
///
/// Accent commands keep their base letter (`\'e` and `\'{e}` both give `e`).
/// The literals are stashed so the cleanup cannot mistake `{x}` for a command argument.
pub struct EscapeRule;

impl RewriteRule for EscapeRule {
    fn name(&self) -> &'static str {
        "escapes"
    }

    fn apply(&self, text: &str, context: &mut RuleContext) -> String {
        let literals = &mut context.literals;
        ESCAPE
            .replace_all(text, |caps: &Captures<'_>| {
                if let Some(escaped) = caps.get(1) {
                    return match escaped.as_str() {
                        "\\" => "\n".to_string(),
                        other => literals.hold(other),
                    };
                }
                if caps.get(2).is_some() {
                    let base = caps.get(3).or_else(|| caps.get(4));
                    return base.map(|m| m.as_str().to_string()).unwrap_or_default();
                }
                " ".to_string()
            })
            .into_owned()
    }
}

static ENVIRONMENT_DELIMITER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\(?:begin|end)\s*\{[^}]*\}").unwrap());
static ANY_COMMAND: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\([a-zA-Z]+)").unwrap());
static CONTROL_SYMBOL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\\([^a-zA-Z])").unwrap());
static BLANK_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n[ \t]*(?:\n[ \t]*){2,}").unwrap());

/// Last resort: drop whatever LaTeX is left and tidy blank lines.
pub struct CleanupRule;

impl RewriteRule for CleanupRule {
    fn name(&self) -> &'static str {
        "cleanup"
    }

    fn apply(&self, text: &str, _context: &mut RuleContext) -> String {
        let text = ENVIRONMENT_DELIMITER.replace_all(text, "");
        let text = rewrite_commands_with(&text, &ANY_COMMAND, Spacing::Tight, |_| {
            Some(String::new())
        });
        // `\,`, `\@`, `\-` and friends vanish; a control space stays a space.
        let text = CONTROL_SYMBOL.replace_all(&text, |caps: &Captures<'_>| {
            if caps[1].trim().is_empty() {
                " ".to_string()
            } else {
                String::new()
            }
        });
        BLANK_RUN.replace_all(&text, "\n\n").trim().to_string()
    }
}
