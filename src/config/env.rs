use std::time::Duration;

use chrono_tz::Tz;
use thiserror::Error;
use url::Url;

use crate::domain::QuietHours;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub site: SiteConfig,
    pub pushover: PushoverConfig,
    pub directories: DirectoryConfig,
    pub logging: LoggingConfig,
    pub timezone: Tz,
    pub quiet_hours: Option<QuietHours>,
    pub policy: NotifyPolicy,
    pub browser: BrowserConfig,
}

/// Login form and monitored region of the watched site.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub login_url: Url,
    pub target_url: Url,
    pub username: String,
    pub password: String,
    pub username_selector: String,
    pub password_selector: String,
    pub submit_selector: String,
    pub content_selector: String,
}

#[derive(Debug, Clone)]
pub struct PushoverConfig {
    pub app_token: String,
    pub user_keys: Vec<String>,
    pub api_url: String,
    pub max_chars: usize,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    pub logs_dir: String,
    pub state_dir: String,
    pub state_filename: String,
    pub snapshot_dirname: String,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

/// Which runs push a message besides an actual change.
#[derive(Debug, Clone)]
pub struct NotifyPolicy {
    pub title: String,
    pub notify_on_first_run: bool,
    pub notify_on_no_change: bool,
    pub no_change_message: String,
}

impl Default for NotifyPolicy {
    fn default() -> Self {
        Self {
            title: "Watcher".to_string(),
            notify_on_first_run: false,
            notify_on_no_change: false,
            no_change_message: "No change detected.".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BrowserConfig {
    pub headless: bool,
    pub idle_timeout: Duration,
    pub selector_timeout: Duration,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}
