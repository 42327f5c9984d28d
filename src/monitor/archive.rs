use std::{fs, path::PathBuf};

use anyhow::{Context, Result};

/// Append-only directory of per-run snapshots, diffs and debug captures,
/// every file named by the run stamp.
#[derive(Debug, Clone)]
pub struct Archive {
    dir: PathBuf,
}

impl Archive {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn write_snapshot(&self, stamp: &str, text: &str) -> Result<PathBuf> {
        self.write(format!("{stamp}.txt"), text.as_bytes())
    }

    pub fn write_diff(&self, stamp: &str, diff: &str) -> Result<PathBuf> {
        self.write(format!("{stamp}.diff.txt"), diff.as_bytes())
    }

    pub fn write_missing_screenshot(&self, stamp: &str, png: &[u8]) -> Result<PathBuf> {
        self.write(format!("{stamp}.missing_selector.png"), png)
    }

    pub fn write_missing_markup(&self, stamp: &str, html: &str) -> Result<PathBuf> {
        self.write(format!("{stamp}.missing_selector.html"), html.as_bytes())
    }

    fn write(&self, name: String, contents: &[u8]) -> Result<PathBuf> {
        let path = self.dir.join(name);
        fs::write(&path, contents)
            .with_context(|| format!("failed to write archive file {}", path.display()))?;
        Ok(path)
    }
}
