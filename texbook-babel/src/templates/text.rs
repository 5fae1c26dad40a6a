use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum description length in characters, before the ellipsis.
pub const DESCRIPTION_LIMIT: usize = 150;
pub const SLUG_LIMIT: usize = 50;

pub const DEFAULT_UNIT_DESCRIPTION: &str = "توضیحات این بخش بزودی اضافه خواهد شد.";
pub const DEFAULT_BOOK_DESCRIPTION: &str = "توضیحات این کتاب بزودی اضافه خواهد شد.";

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"</?[a-zA-Z][^>]*>").unwrap());
static MARKUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"[#*`\[\]]").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s_\x{200C}]+").unwrap());
static HYPHENS: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+").unwrap());

/// Short plain-text summary of rendered Markdown.
///
/// HTML tags (label anchors) and markup punctuation are dropped and whitespace
/// collapsed; the result is cut at [`DESCRIPTION_LIMIT`] characters with `...`
/// appended. Returns `fallback` when nothing is left.
pub fn describe(markdown: &str, fallback: &str) -> String {
    let untagged = HTML_TAG.replace_all(markdown, "");
    let stripped = MARKUP.replace_all(&untagged, "");
    let collapsed = WHITESPACE.replace_all(&stripped, " ");
    let text = collapsed.trim();
    if text.is_empty() {
        return fallback.to_string();
    }
    match text.char_indices().nth(DESCRIPTION_LIMIT) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn is_arabic_script(c: char) -> bool {
    ('\u{0600}'..='\u{06FF}').contains(&c)
}

/// URL-safe slug that keeps Arabic-script letters.
///
/// Whitespace, underscores and zero-width non-joiners become hyphens; anything that is
/// not an Arabic-script character (U+0600 to U+06FF), an ASCII letter, a digit or a
/// hyphen is dropped. Accented Latin letters are dropped rather than folded.
pub fn slugify(text: &str, max_len: usize) -> String {
    let separated = SEPARATORS.replace_all(text, "-");
    let kept: String = separated
        .chars()
        .filter(|c| *c == '-' || c.is_ascii_alphanumeric() || is_arabic_script(*c))
        .collect();
    let collapsed = HYPHENS.replace_all(&kept, "-");
    let slug = collapsed.trim_matches('-').to_lowercase();

    match slug.char_indices().nth(max_len) {
        Some((cut, _)) => slug[..cut].trim_end_matches('-').to_string(),
        None => slug,
    }
}

/// Quote a value for a double-quoted YAML scalar.
pub fn quote(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', " ");
    format!("\"{escaped}\"")
}
