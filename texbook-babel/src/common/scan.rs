//! Brace-aware scanning of LaTeX command invocations.
//!
//! Regexes find where a command starts; the argument itself is read here with a
//! balanced-brace scanner, so `\title{The \emph{Big} Book}` yields the whole
//! argument instead of stopping at the first closing brace. Escaped braces
//! (`\{`, `\}`) do not count towards nesting.

use regex::Regex;

/// A single command occurrence such as `\section*[Short]{Long title}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandMatch<'a> {
    /// Byte offset of the leading backslash.
    pub start: usize,
    /// Byte offset just past the last consumed character.
    pub end: usize,
    /// Command name without the backslash.
    pub name: &'a str,
    pub starred: bool,
    /// Contents of the `[...]` argument, if present.
    pub optional: Option<&'a str>,
    /// Contents of the first `{...}` argument, if present and balanced.
    pub argument: Option<&'a str>,
}

/// Read a balanced `{...}` group whose opening brace sits at `open`.
///
/// Returns the inner text and the offset just past the closing brace, or `None`
/// when `open` is not a brace or the group never closes.
pub fn braced_group(text: &str, open: usize) -> Option<(&str, usize)> {
    let bytes = text.as_bytes();
    if bytes.get(open) != Some(&b'{') {
        return None;
    }
    let mut depth = 0usize;
    let mut i = open;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => {
                i += 2;
                continue;
            }
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some((&text[open + 1..i], i + 1));
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Read a `[...]` group (no nesting) whose opening bracket sits at `open`.
pub fn bracket_group(text: &str, open: usize) -> Option<(&str, usize)> {
    if text.as_bytes().get(open) != Some(&b'[') {
        return None;
    }
    let close = text[open + 1..].find(']')? + open + 1;
    Some((&text[open + 1..close], close + 1))
}

pub fn skip_whitespace(text: &str, from: usize) -> usize {
    text[from..]
        .char_indices()
        .find(|(_, c)| !c.is_whitespace())
        .map(|(idx, _)| from + idx)
        .unwrap_or(text.len())
}

/// Whether whitespace may separate a command name from its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spacing {
    /// `\section {Title}` is accepted, as LaTeX does.
    Loose,
    /// Arguments must follow immediately; used by lossy cleanup passes.
    Tight,
}

/// Parse the tail of a command whose name ends at `name_end`.
fn parse_tail<'a>(
    text: &'a str,
    start: usize,
    name: &'a str,
    name_end: usize,
    spacing: Spacing,
) -> CommandMatch<'a> {
    let skip = |from: usize| match spacing {
        Spacing::Loose => skip_whitespace(text, from),
        Spacing::Tight => from,
    };
    let mut end = name_end;
    let starred = text.as_bytes().get(end) == Some(&b'*');
    if starred {
        end += 1;
    }

    let mut optional = None;
    let after_star = skip(end);
    if let Some((inner, next)) = bracket_group(text, after_star) {
        optional = Some(inner);
        end = next;
    }

    let mut argument = None;
    let before_arg = skip(end);
    if let Some((inner, next)) = braced_group(text, before_arg) {
        argument = Some(inner);
        end = next;
    }

    CommandMatch {
        start,
        end,
        name,
        starred,
        optional,
        argument,
    }
}

/// Find every occurrence of a command matched by `pattern`.
///
/// `pattern` must match the backslash and the command name and capture the name in
/// group 1 (e.g. `\\(section|subsection)\b`). Occurrences nested inside an earlier
/// match's arguments are skipped.
pub fn find_commands<'a>(text: &'a str, pattern: &Regex) -> Vec<CommandMatch<'a>> {
    find_commands_with(text, pattern, Spacing::Loose)
}

pub fn find_commands_with<'a>(
    text: &'a str,
    pattern: &Regex,
    spacing: Spacing,
) -> Vec<CommandMatch<'a>> {
    let mut found = Vec::new();
    let mut pos = 0;
    while pos < text.len() {
        let Some(caps) = pattern.captures_at(text, pos) else {
            break;
        };
        let Some(whole) = caps.get(0) else {
            break;
        };
        let name = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        let matched = parse_tail(text, whole.start(), name, whole.end(), spacing);
        pos = matched.end.max(whole.end());
        found.push(matched);
    }
    found
}

/// First occurrence of a command matched by `pattern`, if any.
pub fn find_command<'a>(text: &'a str, pattern: &Regex) -> Option<CommandMatch<'a>> {
    let caps = pattern.captures(text)?;
    let whole = caps.get(0)?;
    let name = caps.get(1).map(|m| m.as_str()).unwrap_or("");
    Some(parse_tail(
        text,
        whole.start(),
        name,
        whole.end(),
        Spacing::Loose,
    ))
}

/// Rewrite every command matched by `pattern`.
///
/// The callback returns the replacement text, or `None` to keep the original
/// occurrence untouched.
pub fn rewrite_commands<F>(text: &str, pattern: &Regex, rewrite: F) -> String
where
    F: FnMut(&CommandMatch<'_>) -> Option<String>,
{
    rewrite_commands_with(text, pattern, Spacing::Loose, rewrite)
}

pub fn rewrite_commands_with<F>(
    text: &str,
    pattern: &Regex,
    spacing: Spacing,
    mut rewrite: F,
) -> String
where
    F: FnMut(&CommandMatch<'_>) -> Option<String>,
{
    let mut output = String::with_capacity(text.len());
    let mut last = 0;
    for matched in find_commands_with(text, pattern, spacing) {
        if let Some(replacement) = rewrite(&matched) {
            output.push_str(&text[last..matched.start]);
            output.push_str(&replacement);
            last = matched.end;
        }
    }
    output.push_str(&text[last..]);
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn braced_group_handles_nesting_and_escapes() {
        let text = r"{a {b} \} c}rest";
        let (inner, end) = braced_group(text, 0).unwrap();
        assert_eq!(inner, r"a {b} \} c");
        assert_eq!(&text[end..], "rest");
    }

    #[test]
    fn braced_group_rejects_unterminated() {
        assert!(braced_group("{never closed", 0).is_none());
        assert!(braced_group("no brace", 0).is_none());
    }

    #[test]
    fn find_commands_reads_star_optional_and_argument() {
        let pattern = Regex::new(r"\\(chapter)\b").unwrap();
        let text = r"\chapter*[Short] {Long {nested} title} body";
        let found = find_commands(text, &pattern);
        assert_eq!(found.len(), 1);
        let cmd = &found[0];
        assert!(cmd.starred);
        assert_eq!(cmd.optional, Some("Short"));
        assert_eq!(cmd.argument, Some("Long {nested} title"));
        assert_eq!(&text[cmd.end..], " body");
    }

    #[test]
    fn word_boundary_excludes_longer_names() {
        let pattern = Regex::new(r"\\(section)\b").unwrap();
        let found = find_commands(r"\sectionmark{x} \section{y}", &pattern);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].argument, Some("y"));
    }

    #[test]
    fn tight_spacing_ignores_detached_groups() {
        let pattern = Regex::new(r"\\([a-zA-Z]+)").unwrap();
        let found = find_commands_with(r"\noindent {kept}", &pattern, Spacing::Tight);
        assert_eq!(found[0].argument, None);
        let found = find_commands_with(r"\noindent {kept}", &pattern, Spacing::Loose);
        assert_eq!(found[0].argument, Some("kept"));
    }

    #[test]
    fn rewrite_keeps_declined_matches() {
        let pattern = Regex::new(r"\\(textbf|foo)\b").unwrap();
        let out = rewrite_commands(r"\textbf{a} and \foo{b}", &pattern, |cmd| {
            (cmd.name == "textbf").then(|| format!("**{}**", cmd.argument.unwrap_or("")))
        });
        assert_eq!(out, r"**a** and \foo{b}");
    }
}
