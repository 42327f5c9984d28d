mod app;
mod config;
mod domain;
mod infrastructure;
mod monitor;
mod page;

use anyhow::Result;
use domain::Outcome;
use infrastructure::{directories, logging};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = config::load_config()?;
    let paths = directories::ensure_directories(&config.directories)?;
    let _log_guard = logging::init_tracing(&config.logging.level, &paths.logs_dir)?;

    match app::PageWatchApp::new(config, paths).run().await? {
        Outcome::QuietHours => {}
        Outcome::FirstRun { snapshot } => {
            tracing::info!(target: "watch", snapshot = %snapshot.display(), "initial snapshot saved");
        }
        Outcome::Unchanged => {
            tracing::info!(target: "watch", "check complete, nothing changed");
        }
        Outcome::Changed { snapshot, diff } => {
            tracing::info!(
                target: "watch",
                snapshot = %snapshot.display(),
                diff = %diff.display(),
                "check complete, change recorded"
            );
        }
    }
    Ok(())
}
