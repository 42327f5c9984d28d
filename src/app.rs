use anyhow::Result;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use reqwest::Client;

use crate::{
    config::AppConfig,
    domain::{Outcome, QuietHours},
    infrastructure::{directories::ResolvedPaths, notifier::PushoverNotifier},
    monitor::{Archive, SnapshotStore, Watcher},
    page::BrowserPageSource,
};

pub struct PageWatchApp {
    config: AppConfig,
    paths: ResolvedPaths,
}

impl PageWatchApp {
    pub fn new(config: AppConfig, paths: ResolvedPaths) -> Self {
        Self { config, paths }
    }

    pub async fn run(self) -> Result<Outcome> {
        let now = Utc::now().with_timezone(&self.config.timezone);
        self.run_at(now).await
    }

    /// Runs a single check. Quiet hours end the run before the browser starts.
    async fn run_at(self, now: DateTime<Tz>) -> Result<Outcome> {
        let PageWatchApp { config, paths } = self;

        if let Some(quiet) = config.quiet_hours {
            if in_quiet_hours(quiet, now) {
                tracing::info!(
                    target: "watch",
                    window = %quiet,
                    timezone = %config.timezone,
                    "skipping due to quiet hours"
                );
                return Ok(Outcome::QuietHours);
            }
        }

        tracing::info!(
            target: "watch",
            state = %paths.state_dir.display(),
            target_url = %config.site.target_url,
            "page watch starting"
        );

        let http = Client::builder()
            .user_agent(format!("page-watch/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        let notifier = PushoverNotifier::new(http, config.pushover.clone());
        let source = BrowserPageSource::new(config.site.clone(), config.browser.clone());

        let watcher = Watcher::new(
            source,
            notifier,
            SnapshotStore::new(&paths.state_file),
            Archive::new(&paths.snapshot_dir),
            config.policy.clone(),
        );
        watcher.run(now).await
    }
}

fn in_quiet_hours(quiet: QuietHours, now: DateTime<Tz>) -> bool {
    quiet.contains(now.time())
}
