//! On-disk project fixtures.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use texbook_babel::ingest::source::Expansion;
use texbook_babel::model::Document;
use texbook_babel::ProjectParser;

/// A throwaway LaTeX project; files are written relative to its root.
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn new() -> Self {
        Project {
            dir: tempfile::tempdir().expect("create temp project"),
        }
    }

    pub fn with_file(self, relative: &str, contents: impl AsRef<[u8]>) -> Self {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create fixture directory");
        }
        fs::write(&path, contents).expect("write fixture file");
        self
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn main(&self) -> PathBuf {
        self.root().join("main.tex")
    }

    pub fn parse(&self) -> Document {
        ProjectParser::new(self.main()).parse().expect("parse project")
    }

    pub fn expand(&self) -> Expansion {
        ProjectParser::new(self.main())
            .parse_with_expansion()
            .expect("expand project")
            .1
    }
}

/// Number of (non-overlapping) occurrences of `needle`.
pub fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}
