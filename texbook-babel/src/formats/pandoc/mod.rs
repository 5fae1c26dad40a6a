//! Pandoc-backed converter
//!
//! Shells out to a `pandoc` binary (`--from latex --to markdown --wrap=none`). The fragment
//! is written to a temporary file rather than piped, so very large chapters do not
//! deadlock on a full stdout buffer.
//!
//! Binary lookup order: `TEXBOOK_PANDOC_BIN`, `PANDOC_BIN`, then `pandoc` on `PATH`.

use crate::error::{BabelError, Result};
use crate::format::Converter;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;
use tracing::debug;
use which::which;

#[derive(Debug, Clone, Default)]
pub struct PandocConverter {
    /// Explicit binary; bypasses the lookup when set.
    binary: Option<PathBuf>,
}

impl PandocConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        PandocConverter {
            binary: Some(binary.into()),
        }
    }

    fn resolve_binary(&self) -> Result<PathBuf> {
        if let Some(binary) = &self.binary {
            return Ok(binary.clone());
        }
        resolve_pandoc_binary()
    }
}

impl Converter for PandocConverter {
    fn name(&self) -> &str {
        "pandoc"
    }

    fn description(&self) -> &str {
        "LaTeX to Markdown via an external pandoc binary"
    }

    fn is_available(&self) -> bool {
        match self.resolve_binary() {
            Ok(path) => path.is_file() || which(&path).is_ok(),
            Err(_) => false,
        }
    }

    fn convert(&self, latex: &str) -> Result<String> {
        let pandoc = self.resolve_binary()?;
        let temp_dir =
            tempdir().map_err(|e| BabelError::Conversion(format!("Temp dir error: {e}")))?;
        let input_path = temp_dir.path().join("fragment.tex");
        fs::write(&input_path, latex).map_err(|e| BabelError::Conversion(e.to_string()))?;

        debug!(pandoc = %pandoc.display(), bytes = latex.len(), "running pandoc");
        let output = Command::new(&pandoc)
            .arg("--from")
            .arg("latex")
            .arg("--to")
            .arg("markdown")
            .arg("--wrap=none")
            .arg(&input_path)
            .output()
            .map_err(|e| {
                BabelError::Conversion(format!(
                    "Failed to launch pandoc ({}): {}",
                    pandoc.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BabelError::Conversion(format!(
                "pandoc exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        String::from_utf8(output.stdout)
            .map(|markdown| markdown.trim().to_string())
            .map_err(|e| BabelError::Conversion(format!("pandoc produced invalid UTF-8: {e}")))
    }
}

fn resolve_pandoc_binary() -> Result<PathBuf> {
    for var in ["TEXBOOK_PANDOC_BIN", "PANDOC_BIN"] {
        if let Some(path) = env::var_os(var) {
            if !path.is_empty() {
                return Ok(PathBuf::from(path));
            }
        }
    }

    which("pandoc").map_err(|_| {
        BabelError::ConverterUnavailable(
            "pandoc (not on PATH; set TEXBOOK_PANDOC_BIN to override the detection)".to_string(),
        )
    })
}
