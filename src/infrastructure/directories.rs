use std::{fs, path::PathBuf};

use anyhow::{Context, Result};

use crate::config::DirectoryConfig;

#[derive(Debug, Clone)]
pub struct ResolvedPaths {
    pub logs_dir: PathBuf,
    pub state_dir: PathBuf,
    pub state_file: PathBuf,
    pub snapshot_dir: PathBuf,
}

/// Creates the log, state and archive directories once at startup and checks
/// that the state directory is writable.
pub fn ensure_directories(cfg: &DirectoryConfig) -> Result<ResolvedPaths> {
    let logs_dir = ensure_dir(PathBuf::from(&cfg.logs_dir))?;
    let state_dir = ensure_dir(PathBuf::from(&cfg.state_dir))?;
    let snapshot_dir = ensure_dir(state_dir.join(&cfg.snapshot_dirname))?;
    let state_file = state_dir.join(&cfg.state_filename);

    let probe_file = state_dir.join(".write-test");
    fs::write(&probe_file, b"ok")
        .with_context(|| format!("state directory {} is not writable", state_dir.display()))?;
    fs::remove_file(&probe_file)?;

    Ok(ResolvedPaths {
        logs_dir,
        state_dir,
        state_file,
        snapshot_dir,
    })
}

fn ensure_dir(dir: PathBuf) -> Result<PathBuf> {
    if !dir.exists() {
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create directory {}", dir.display()))?;
    }
    Ok(dir.canonicalize().unwrap_or(dir))
}
