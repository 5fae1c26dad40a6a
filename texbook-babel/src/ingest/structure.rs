//! Chapter and appendix partitioning.
//!
//! The expanded text is cut once at the first `\appendix`; each side is then
//! segmented at every `\chapter` marker. Whatever precedes the first marker of a
//! region (the preamble, front matter) belongs to no unit.

use crate::common::scan::{find_commands, skip_whitespace, CommandMatch};
use crate::model::{StructuralUnit, UnitKind};
use once_cell::sync::Lazy;
use regex::Regex;

static APPENDIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\appendix\b").unwrap());
static CHAPTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\(chapter)\b").unwrap());
static BEGIN_DOCUMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\begin\s*\{document\}").unwrap());
static END_DOCUMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\end\s*\{document\}").unwrap());

/// Split expanded text into `(main_body, appendix_region)`.
pub fn split_regions(text: &str) -> (&str, Option<&str>) {
    match APPENDIX.find(text) {
        Some(marker) => (&text[..marker.start()], Some(&text[marker.end()..])),
        None => (text, None),
    }
}

/// Partition expanded text into chapters and appendices, both in document order.
pub fn split_units(text: &str) -> (Vec<StructuralUnit>, Vec<StructuralUnit>) {
    let (body, appendix) = split_regions(text);
    let chapters = segment(body, UnitKind::Chapter);
    let appendices = appendix
        .map(|region| segment(region, UnitKind::Appendix))
        .unwrap_or_default();
    (chapters, appendices)
}

/// The text between `\begin{document}` and `\end{document}`, or all of it.
pub fn document_body(text: &str) -> &str {
    let start = BEGIN_DOCUMENT.find(text).map(|m| m.end()).unwrap_or(0);
    let end = END_DOCUMENT
        .find_at(text, start)
        .map(|m| m.start())
        .unwrap_or(text.len());
    &text[start..end]
}

/// An article without chapters becomes one chapter holding its whole main body.
pub fn whole_body_unit(text: &str, title: &str) -> StructuralUnit {
    let (main, _) = split_regions(text);
    let title = if title.trim().is_empty() {
        format!("{} 1", UnitKind::Chapter.label())
    } else {
        title.trim().to_string()
    };
    StructuralUnit::new(UnitKind::Chapter, 1, title).with_source(document_body(main))
}

/// Segment one region at every chapter marker, numbering from 1.
///
/// A marker needs its `{title}` group; bare `\chapter` tokens such as the one in
/// `\titleformat{\chapter}` are not section starts.
pub fn segment(region: &str, kind: UnitKind) -> Vec<StructuralUnit> {
    let markers: Vec<_> = find_commands(region, &CHAPTER)
        .into_iter()
        .filter(|marker| opens_title(region, marker))
        .collect();
    let mut units = Vec::with_capacity(markers.len());

    for (idx, marker) in markers.iter().enumerate() {
        let ordinal = idx + 1;
        let body_end = markers
            .get(idx + 1)
            .map(|next| next.start)
            .unwrap_or(region.len());
        let body_start = marker.end.min(body_end);

        let mut unit = StructuralUnit::new(kind, ordinal, String::new())
            .with_source(&region[body_start..body_end]);
        unit.numbered = !marker.starred;
        unit.short_title = marker
            .optional
            .map(str::trim)
            .filter(|short| !short.is_empty())
            .map(str::to_string);

        match marker_title(marker) {
            Some(title) => unit.title = title,
            None => {
                unit.title = format!("{} {}", kind.label(), unit.number());
                unit.warn(format!(
                    "could not read the title of {} {}; using a placeholder",
                    kind.label().to_lowercase(),
                    unit.number()
                ));
            }
        }
        units.push(unit);
    }

    units
}

/// Whether a `{` follows the star and short title, even if it never closes.
fn opens_title(region: &str, marker: &CommandMatch<'_>) -> bool {
    marker.argument.is_some() || region[skip_whitespace(region, marker.end)..].starts_with('{')
}

fn marker_title(marker: &CommandMatch<'_>) -> Option<String> {
    marker
        .argument
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .map(str::to_string)
}
