use anyhow::Result;
use async_trait::async_trait;
use chrono::DateTime;
use chrono_tz::Tz;
use tracing::{info, warn};

use crate::{
    config::NotifyPolicy,
    domain::{Extraction, MissingContent, Outcome, SnapshotRecord},
};

use super::{
    archive::Archive, differ::unified_diff, fingerprint::fingerprint, normalize::normalize,
    store::SnapshotStore,
};

pub const STAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Produces the monitored region of the page for one run.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(&self) -> Result<Extraction>;
}

/// Delivers a titled message to every configured recipient.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, title: &str, message: &str) -> Result<()>;
}

pub struct Watcher<S, N> {
    source: S,
    notifier: N,
    store: SnapshotStore,
    archive: Archive,
    policy: NotifyPolicy,
}

impl<S, N> Watcher<S, N>
where
    S: PageSource,
    N: Notifier,
{
    pub fn new(
        source: S,
        notifier: N,
        store: SnapshotStore,
        archive: Archive,
        policy: NotifyPolicy,
    ) -> Self {
        Self {
            source,
            notifier,
            store,
            archive,
            policy,
        }
    }

    /// One fetch/compare/persist/notify cycle stamped with `now`.
    pub async fn run(&self, now: DateTime<Tz>) -> Result<Outcome> {
        let stamp = now.format(STAMP_FORMAT).to_string();
        let previous = self.store.load()?;

        let extraction = self.source.fetch().await?;
        if let Extraction::Missing(missing) = &extraction {
            self.archive_missing(&stamp, missing)?;
        }

        let text = normalize(&extraction.into_content());
        let record = SnapshotRecord {
            hash: fingerprint(&text),
            text,
            timestamp: stamp.clone(),
        };

        let Some(previous) = previous else {
            info!(target: "watch", "no previous snapshot found, saving initial snapshot");
            self.store.save(&record)?;
            let snapshot = self.archive.write_snapshot(&stamp, &record.text)?;
            if self.policy.notify_on_first_run {
                self.notifier
                    .notify(&self.policy.title, &format!("WATCH STARTED: {}", record.text))
                    .await?;
            }
            return Ok(Outcome::FirstRun { snapshot });
        };

        if previous.hash == record.hash {
            info!(target: "watch", hash = %record.hash, "no change detected");
            self.store.save(&record)?;
            if self.policy.notify_on_no_change {
                self.notifier
                    .notify(&self.policy.title, &self.policy.no_change_message)
                    .await?;
            }
            return Ok(Outcome::Unchanged);
        }

        info!(target: "watch", old = %previous.hash, new = %record.hash, "change detected");
        let diff_text = unified_diff(&previous.text, &record.text);
        let snapshot = self.archive.write_snapshot(&stamp, &record.text)?;
        let diff = self.archive.write_diff(&stamp, &diff_text)?;
        self.store.save(&record)?;
        info!(target: "watch", snapshot = %snapshot.display(), diff = %diff.display(), "saved snapshot and diff");

        self.notifier
            .notify(&self.policy.title, &format!("CHANGE DETECTED: {}", record.text))
            .await?;

        Ok(Outcome::Changed { snapshot, diff })
    }

    fn archive_missing(&self, stamp: &str, missing: &MissingContent) -> Result<()> {
        warn!(
            target: "watch",
            selector = %missing.selector,
            url = %missing.url,
            "content selector missing, recording sentinel"
        );
        if let Some(png) = &missing.screenshot {
            self.archive.write_missing_screenshot(stamp, png)?;
        }
        if let Some(html) = &missing.markup {
            self.archive.write_missing_markup(stamp, html)?;
        }
        Ok(())
    }
}
