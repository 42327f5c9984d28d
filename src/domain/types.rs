use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Last observed normalized page content. Exactly one is persisted at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    pub hash: String,
    pub text: String,
    pub timestamp: String,
}

/// What a single watch run ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    QuietHours,
    FirstRun {
        snapshot: PathBuf,
    },
    Unchanged,
    Changed {
        snapshot: PathBuf,
        diff: PathBuf,
    },
}
