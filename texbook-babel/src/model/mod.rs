//! Document model produced by the ingestion pipeline
//!
//!     [`Document`] is the aggregate root and the only artifact handed to collaborators
//!     (writers, review UIs, site generators). It owns its children outright: units carry no
//!     pointer back to the document, so "which document owns this unit" is answered by whoever
//!     holds the aggregate.
//!
//!     Chapter ordinals are always 1..N in document order and appendix ordinals always map to
//!     A, B, C.. in their own region. Reordering goes through [`Document::move_unit`], which
//!     renumbers the affected sequence so that stays true.

pub mod labels;
pub mod nodes;

pub use labels::LabelRegistry;
pub use nodes::{
    appendix_letter, ContentType, DocumentMetadata, ImageRef, LabelDescriptor, LabelKind,
    StructuralUnit, UnitKind, DEFAULT_LANG,
};

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub metadata: DocumentMetadata,
    pub chapters: Vec<StructuralUnit>,
    pub appendices: Vec<StructuralUnit>,
    pub labels: LabelRegistry,
    /// Every distinct image referenced anywhere in the project, keyed by source name.
    pub images: BTreeMap<String, ImageRef>,
    /// Existing directories registered through `\graphicspath`.
    pub graphics_paths: Vec<PathBuf>,
    /// Project root (directory of the root document).
    pub source_dir: PathBuf,
}

impl Document {
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Document {
            metadata: DocumentMetadata::default(),
            chapters: Vec::new(),
            appendices: Vec::new(),
            labels: LabelRegistry::new(),
            images: BTreeMap::new(),
            graphics_paths: Vec::new(),
            source_dir: source_dir.into(),
        }
    }

    /// Chapters followed by appendices, in document order.
    pub fn units(&self) -> impl Iterator<Item = &StructuralUnit> {
        self.chapters.iter().chain(self.appendices.iter())
    }

    pub fn units_mut(&mut self) -> impl Iterator<Item = &mut StructuralUnit> {
        self.chapters.iter_mut().chain(self.appendices.iter_mut())
    }

    /// Units the caller has not excluded.
    pub fn included_units(&self) -> impl Iterator<Item = &StructuralUnit> {
        self.units().filter(|unit| unit.is_included)
    }

    /// Look a unit up by its display number (`"2"`, `"B"`) or id (`"ch02"`, `"appB"`).
    pub fn find_unit(&self, reference: &str) -> Option<&StructuralUnit> {
        let wanted = reference.trim();
        self.units().find(|unit| {
            unit.id().eq_ignore_ascii_case(wanted) || unit.number().eq_ignore_ascii_case(wanted)
        })
    }

    fn sequence_mut(&mut self, kind: UnitKind) -> &mut Vec<StructuralUnit> {
        match kind {
            UnitKind::Chapter => &mut self.chapters,
            UnitKind::Appendix => &mut self.appendices,
        }
    }

    /// Move a unit within its own sequence and renumber the sequence.
    ///
    /// Indices are 0-based positions. Returns false (and leaves the order untouched)
    /// when either index is out of range.
    pub fn move_unit(&mut self, kind: UnitKind, from: usize, to: usize) -> bool {
        let units = self.sequence_mut(kind);
        if from >= units.len() || to >= units.len() {
            return false;
        }
        let unit = units.remove(from);
        units.insert(to, unit);
        renumber(units);
        true
    }

    /// Image paths relative to the project root, for display.
    pub fn relative_image_paths(&self) -> Vec<(String, Option<PathBuf>)> {
        self.images
            .iter()
            .map(|(name, image)| {
                let relative = image
                    .path
                    .as_deref()
                    .map(|path| relative_to(path, &self.source_dir));
                (name.clone(), relative)
            })
            .collect()
    }
}

fn renumber(units: &mut [StructuralUnit]) {
    for (idx, unit) in units.iter_mut().enumerate() {
        unit.ordinal = idx + 1;
    }
}

/// `path` relative to `base`, falling back to `path` itself.
pub fn relative_to(path: &Path, base: &Path) -> PathBuf {
    pathdiff::diff_paths(path, base).unwrap_or_else(|| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        let mut doc = Document::new("/project");
        doc.chapters = vec![
            StructuralUnit::new(UnitKind::Chapter, 1, "Intro"),
            StructuralUnit::new(UnitKind::Chapter, 2, "Methods"),
            StructuralUnit::new(UnitKind::Chapter, 3, "Results"),
        ];
        doc.appendices = vec![StructuralUnit::new(UnitKind::Appendix, 1, "Data")];
        doc
    }

    #[test]
    fn move_unit_renumbers_contiguously() {
        let mut doc = sample();
        assert!(doc.move_unit(UnitKind::Chapter, 2, 0));

        let titles: Vec<_> = doc.chapters.iter().map(|u| u.title.as_str()).collect();
        let ordinals: Vec<_> = doc.chapters.iter().map(|u| u.ordinal).collect();
        assert_eq!(titles, vec!["Results", "Intro", "Methods"]);
        assert_eq!(ordinals, vec![1, 2, 3]);
        assert_eq!(doc.appendices[0].number(), "A");
    }

    #[test]
    fn move_unit_rejects_out_of_range() {
        let mut doc = sample();
        assert!(!doc.move_unit(UnitKind::Appendix, 0, 4));
        assert_eq!(doc.appendices.len(), 1);
    }

    #[test]
    fn find_unit_by_number_or_id() {
        let doc = sample();
        assert_eq!(doc.find_unit("2").unwrap().title, "Methods");
        assert_eq!(doc.find_unit("ch03").unwrap().title, "Results");
        assert_eq!(doc.find_unit("a").unwrap().title, "Data");
        assert!(doc.find_unit("9").is_none());
    }

    #[test]
    fn included_units_skip_excluded() {
        let mut doc = sample();
        doc.chapters[1].is_included = false;
        let titles: Vec<_> = doc.included_units().map(|u| u.title.as_str()).collect();
        assert_eq!(titles, vec!["Intro", "Results", "Data"]);
    }
}
