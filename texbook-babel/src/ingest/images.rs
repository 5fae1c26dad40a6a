//! Image discovery and resolution.
//!
//! `\includegraphics` usually names an image without its extension and relative to
//! one of the `\graphicspath` directories. [`ImageResolver`] reproduces that lookup:
//! candidate directories in order (project root, then graphics paths), each tried
//! with a fixed extension list, then the conventional image sub-directories.

use crate::model::ImageRef;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::debug;

static INCLUDE_GRAPHICS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\includegraphics\s*(?:\[[^\]]*\])?\s*\{([^}]+)\}").unwrap());

pub const DEFAULT_EXTENSIONS: &[&str] = &["", "png", "jpg", "jpeg", "pdf", "eps", "svg"];
pub const DEFAULT_SUBDIRECTORIES: &[&str] = &["images", "figures", "figs", "img"];

/// Extensions that cannot be shown by a browser and need rasterizing.
const CONVERTED_EXTENSIONS: &[&str] = &["pdf", "eps"];

/// Image names referenced in `text`, in order of first appearance, without duplicates.
pub fn discover_images(text: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in INCLUDE_GRAPHICS.captures_iter(text) {
        let Some(name) = caps.get(1).map(|m| m.as_str().trim()) else {
            continue;
        };
        if !name.is_empty() && !names.iter().any(|known| known == name) {
            names.push(name.to_string());
        }
    }
    names
}

#[derive(Debug, Clone)]
pub struct ImageResolver {
    search_dirs: Vec<PathBuf>,
    extensions: Vec<String>,
    subdirectories: Vec<String>,
}

impl ImageResolver {
    /// Resolver searching only the project root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ImageResolver {
            search_dirs: vec![root.into()],
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            subdirectories: DEFAULT_SUBDIRECTORIES
                .iter()
                .map(|d| d.to_string())
                .collect(),
        }
    }

    /// Register `\graphicspath` entries relative to the project root.
    ///
    /// Entries that do not name an existing directory are skipped.
    pub fn with_graphics_paths<S: AsRef<str>>(mut self, paths: &[S]) -> Self {
        let root = self.search_dirs[0].clone();
        for raw in paths {
            let cleaned = raw.as_ref().trim().trim_matches(|c| c == '{' || c == '}');
            if cleaned.is_empty() {
                continue;
            }
            let dir = root.join(cleaned);
            if dir.is_dir() {
                if !self.search_dirs.contains(&dir) {
                    self.search_dirs.push(dir);
                }
            } else {
                debug!(path = %dir.display(), "skipping missing graphics path");
            }
        }
        self
    }

    /// Replace the extension list; `""` means "the name as written".
    pub fn with_extensions<S: AsRef<str>>(mut self, extensions: &[S]) -> Self {
        self.extensions = extensions
            .iter()
            .map(|ext| ext.as_ref().trim_start_matches('.').to_string())
            .collect();
        self
    }

    pub fn with_subdirectories<S: AsRef<str>>(mut self, subdirectories: &[S]) -> Self {
        self.subdirectories = subdirectories
            .iter()
            .map(|dir| dir.as_ref().to_string())
            .collect();
        self
    }

    /// Registered directories after the project root.
    pub fn graphics_paths(&self) -> &[PathBuf] {
        &self.search_dirs[1..]
    }

    /// First existing regular file for `name`, or `None`.
    pub fn find(&self, name: &str) -> Option<PathBuf> {
        for base in &self.search_dirs {
            if let Some(found) = self.find_in(base, name) {
                return Some(found);
            }
            for subdir in &self.subdirectories {
                let nested = base.join(subdir);
                if nested.is_dir() {
                    if let Some(found) = self.find_in(&nested, name) {
                        return Some(found);
                    }
                }
            }
        }
        None
    }

    fn find_in(&self, dir: &Path, name: &str) -> Option<PathBuf> {
        self.extensions.iter().find_map(|ext| {
            let candidate = if ext.is_empty() {
                dir.join(name)
            } else {
                dir.join(format!("{name}.{ext}"))
            };
            candidate.is_file().then_some(candidate)
        })
    }

    /// Build the [`ImageRef`] for a referenced name.
    pub fn resolve(&self, name: &str) -> ImageRef {
        let path = self.find(name);
        let extension = path
            .as_deref()
            .and_then(Path::extension)
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        let needs_conversion = extension
            .as_deref()
            .is_some_and(|ext| CONVERTED_EXTENSIONS.contains(&ext));
        ImageRef {
            name: name.to_string(),
            output_name: output_name(name, extension.as_deref(), needs_conversion),
            path,
            needs_conversion,
        }
    }
}

/// Flat file name the image is published under.
fn output_name(name: &str, extension: Option<&str>, needs_conversion: bool) -> String {
    let stem_source = Path::new(name);
    let file_name = stem_source
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(name);
    let stem = stem_source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);

    match (extension, needs_conversion) {
        (_, true) => format!("{stem}.png"),
        (Some(ext), false) if stem_source.extension().is_none() => format!("{file_name}.{ext}"),
        _ => file_name.to_string(),
    }
}
