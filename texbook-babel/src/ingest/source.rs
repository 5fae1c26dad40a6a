//! Recursive expansion of `\input`, `\include` and `\subfile`
//!
//!     The expander turns a project into one flattened LaTeX string. Traversal is depth-first
//!     and driven by an explicit stack of frames rather than by call-stack recursion, so a deep
//!     or hostile include graph cannot overflow the stack.
//!
//!     Every resolved file is expanded at most once per traversal. Revisiting a file (a cycle,
//!     or the same file included twice) splices a visible marker comment instead, which is what
//!     guarantees termination. Missing and undecodable files splice their own markers and the
//!     traversal carries on with the rest of the document.
//!
//!     Include paths are resolved against the project root (the directory of the root document),
//!     not against the including file, matching how LaTeX resolves them when compiled from the
//!     root.

use crate::error::{BabelError, Result};
use crate::model::relative_to;
use encoding_rs::Encoding;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

static INCLUDE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\(?:input|include|subfile)\s*\{([^}]+)\}").unwrap());

pub const CIRCULAR_MARKER: &str = "% Circular include detected:";
pub const MISSING_MARKER: &str = "% File not found:";
pub const UNREADABLE_MARKER: &str = "% Error reading file:";

pub const DEFAULT_EXTENSION: &str = "tex";
pub const DEFAULT_ENCODINGS: &[&str] = &["utf-8", "utf-16"];

/// A resolved file and its decoded text, alive while its frame is on the stack.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceUnit {
    pub path: PathBuf,
    pub text: String,
}

/// Something the expander had to paper over with a marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpansionIssue {
    Missing(PathBuf),
    Circular(PathBuf),
    Unreadable(PathBuf),
}

/// Result of a full expansion.
#[derive(Debug, Clone, PartialEq)]
pub struct Expansion {
    pub text: String,
    /// Files that were read and spliced, in the order they were entered.
    pub files: Vec<PathBuf>,
    pub issues: Vec<ExpansionIssue>,
}

struct Frame {
    unit: SourceUnit,
    cursor: usize,
    output: String,
}

impl Frame {
    fn new(unit: SourceUnit) -> Self {
        let capacity = unit.text.len();
        Frame {
            unit,
            cursor: 0,
            output: String::with_capacity(capacity),
        }
    }
}

enum Inclusion {
    Inline(String),
    Descend(SourceUnit),
}

/// Flattens a LaTeX project into a single text stream.
#[derive(Debug, Clone)]
pub struct SourceExpander {
    root_dir: PathBuf,
    default_extension: String,
    encodings: Vec<&'static Encoding>,
}

impl SourceExpander {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        SourceExpander {
            root_dir: root_dir.into(),
            default_extension: DEFAULT_EXTENSION.to_string(),
            encodings: Vec::new(),
        }
        .with_encodings(DEFAULT_ENCODINGS)
    }

    /// Expander rooted at the directory containing `root_file`.
    pub fn for_root_file(root_file: &Path) -> Self {
        let root_dir = root_file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self::new(root_dir)
    }

    /// Extension appended to include targets that have none and do not exist as written.
    pub fn with_default_extension(mut self, extension: impl Into<String>) -> Self {
        self.default_extension = extension.into().trim_start_matches('.').to_string();
        self
    }

    /// Decoding chain tried in order after BOM sniffing. Unknown labels are skipped.
    pub fn with_encodings<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.encodings = labels
            .into_iter()
            .filter_map(|label| {
                let label = label.as_ref();
                let encoding = Encoding::for_label(label.trim().as_bytes());
                if encoding.is_none() {
                    warn!(label, "ignoring unknown source encoding");
                }
                encoding
            })
            .collect();
        self
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Flatten the project rooted at `root_file` into one string.
    pub fn expand(&self, root_file: &Path) -> Result<String> {
        self.expand_with_report(root_file)
            .map(|expansion| expansion.text)
    }

    /// Flatten the project and report which files were read and which were replaced by markers.
    ///
    /// Fails only when the root document itself cannot be found or read.
    pub fn expand_with_report(&self, root_file: &Path) -> Result<Expansion> {
        let root_path = self
            .locate(root_file)
            .ok_or_else(|| BabelError::RootUnresolvable(root_file.to_path_buf()))?;
        let bytes = fs::read(&root_path).map_err(|source| BabelError::Io {
            path: root_path.clone(),
            source,
        })?;

        let mut visited = HashSet::new();
        visited.insert(identity(&root_path));
        let mut files = vec![root_path.clone()];
        let mut issues = Vec::new();

        let Some(text) = self.decode(&bytes) else {
            warn!(path = %root_path.display(), "root document could not be decoded");
            issues.push(ExpansionIssue::Unreadable(root_path.clone()));
            return Ok(Expansion {
                text: self.marker(UNREADABLE_MARKER, &root_path),
                files,
                issues,
            });
        };

        let mut stack = vec![Frame::new(SourceUnit {
            path: root_path,
            text,
        })];

        while let Some(frame) = stack.last_mut() {
            let next = INCLUDE
                .captures_at(&frame.unit.text, frame.cursor)
                .and_then(|caps| {
                    let whole = caps.get(0)?;
                    let target = caps.get(1)?.as_str().trim().to_string();
                    Some((whole.start(), whole.end(), target))
                });

            match next {
                Some((start, end, target)) => {
                    frame.output.push_str(&frame.unit.text[frame.cursor..start]);
                    frame.cursor = end;
                    match self.open_include(&target, &mut visited, &mut issues) {
                        Inclusion::Inline(marker) => frame.output.push_str(&marker),
                        Inclusion::Descend(unit) => {
                            files.push(unit.path.clone());
                            stack.push(Frame::new(unit));
                        }
                    }
                }
                None => {
                    frame.output.push_str(&frame.unit.text[frame.cursor..]);
                    let Some(finished) = stack.pop() else {
                        break;
                    };
                    debug!(
                        path = %finished.unit.path.display(),
                        depth = stack.len(),
                        "expanded source file"
                    );
                    match stack.last_mut() {
                        Some(parent) => parent.output.push_str(&finished.output),
                        None => {
                            return Ok(Expansion {
                                text: finished.output,
                                files,
                                issues,
                            })
                        }
                    }
                }
            }
        }

        Ok(Expansion {
            text: String::new(),
            files,
            issues,
        })
    }

    fn open_include(
        &self,
        target: &str,
        visited: &mut HashSet<PathBuf>,
        issues: &mut Vec<ExpansionIssue>,
    ) -> Inclusion {
        let candidate = self.root_dir.join(target);
        let Some(path) = self.locate(&candidate) else {
            warn!(include = target, "included file not found");
            issues.push(ExpansionIssue::Missing(candidate.clone()));
            return Inclusion::Inline(self.marker(MISSING_MARKER, &candidate));
        };

        if !visited.insert(identity(&path)) {
            warn!(path = %path.display(), "circular include skipped");
            issues.push(ExpansionIssue::Circular(path.clone()));
            return Inclusion::Inline(self.marker(CIRCULAR_MARKER, &path));
        }

        let decoded = fs::read(&path).ok().and_then(|bytes| self.decode(&bytes));
        match decoded {
            Some(text) => Inclusion::Descend(SourceUnit { path, text }),
            None => {
                warn!(path = %path.display(), "included file could not be read or decoded");
                issues.push(ExpansionIssue::Unreadable(path.clone()));
                Inclusion::Inline(self.marker(UNREADABLE_MARKER, &path))
            }
        }
    }

    /// The path as written if it is a file, else the path with the default extension.
    fn locate(&self, path: &Path) -> Option<PathBuf> {
        if path.is_file() {
            return Some(path.to_path_buf());
        }
        if path.extension().is_none() && !self.default_extension.is_empty() {
            let mut with_extension = path.as_os_str().to_owned();
            with_extension.push(".");
            with_extension.push(&self.default_extension);
            let with_extension = PathBuf::from(with_extension);
            if with_extension.is_file() {
                return Some(with_extension);
            }
        }
        None
    }

    /// BOM first, then each configured encoding, decoding strictly.
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
            if let Some(text) =
                encoding.decode_without_bom_handling_and_without_replacement(&bytes[bom_len..])
            {
                return Some(text.into_owned());
            }
        }
        self.encodings.iter().find_map(|encoding| {
            encoding
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(|text| text.into_owned())
        })
    }

    fn marker(&self, prefix: &str, path: &Path) -> String {
        format!("{prefix} {}\n", relative_to(path, &self.root_dir).display())
    }
}

/// Key used by the visited set; canonical when the file system allows it.
fn identity(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
