use std::{fs, path::PathBuf};

use anyhow::{Context, Result};

use crate::domain::SnapshotRecord;

/// Single JSON file holding the last snapshot. Overwritten in place, unlocked.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> Result<Option<SnapshotRecord>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let record = serde_json::from_str(&raw)
            .with_context(|| format!("malformed snapshot state in {}", self.path.display()))?;
        Ok(Some(record))
    }

    pub fn save(&self, record: &SnapshotRecord) -> Result<()> {
        let body = serde_json::to_string_pretty(record)?;
        fs::write(&self.path, body)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        tracing::debug!(target: "store", path = %self.path.display(), hash = %record.hash, "snapshot state saved");
        Ok(())
    }
}
