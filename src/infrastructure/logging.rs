use std::{io, path::Path};

use anyhow::Result;
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log targets emitted by the watch run.
const TARGETS: [&str; 4] = ["watch", "page", "notify", "store"];
const KEPT_LOG_FILES: usize = 14;

/// Installs stdout and file logging for one check. The returned guard must
/// live until the process exits so the file writer flushes.
pub fn init_tracing(level: &str, logs_dir: &Path) -> Result<WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives(level)))
        .unwrap_or_else(|_| EnvFilter::new(default_directives("info")));

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("watch")
        .filename_suffix("log")
        .max_log_files(KEPT_LOG_FILES)
        .build(logs_dir)?;
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let console_layer = fmt::layer()
        .compact()
        .with_writer(io::stdout)
        .with_target(false);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_target(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    tracing::debug!(target: "watch", logs = %logs_dir.display(), "logging ready");
    Ok(guard)
}

/// `level` for this tool's targets, `warn` for everything else (browser and
/// HTTP internals).
fn default_directives(level: &str) -> String {
    let mut directives = vec!["warn".to_string()];
    directives.extend(TARGETS.iter().map(|target| format!("{target}={level}")));
    directives.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_scope_level_to_watch_targets() {
        let directives = default_directives("debug");
        assert_eq!(
            directives,
            "warn,watch=debug,page=debug,notify=debug,store=debug"
        );
        assert!(EnvFilter::try_new(&directives).is_ok());
    }

    #[test]
    fn bogus_level_is_rejected_by_filter() {
        assert!(EnvFilter::try_new(default_directives("loudest")).is_err());
    }
}
