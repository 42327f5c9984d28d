use std::{env, str::FromStr, time::Duration};

use chrono_tz::Tz;
use url::Url;

use super::env::{
    AppConfig, BrowserConfig, ConfigError, DirectoryConfig, LoggingConfig, NotifyPolicy,
    PushoverConfig, SiteConfig,
};
use crate::domain::QuietHours;

const DEFAULT_PUSHOVER_URL: &str = "https://api.pushover.net/1/messages.json";
/// Smallest cap that still leaves one character before the `...` suffix.
const MIN_MESSAGE_CHARS: usize = 4;

pub fn load_config() -> Result<AppConfig, ConfigError> {
    AppConfig::from_env()
}

impl AppConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars { lookup };

        let site = SiteConfig {
            login_url: vars.url("LOGIN_URL")?,
            target_url: vars.url("TARGET_URL")?,
            username: vars.required("USERNAME")?,
            password: vars.required("PASSWORD")?,
            username_selector: vars.required("USERNAME_SELECTOR")?,
            password_selector: vars.required("PASSWORD_SELECTOR")?,
            submit_selector: vars.required("SUBMIT_SELECTOR")?,
            content_selector: vars.or("CONTENT_SELECTOR", "body"),
        };

        let app_token = vars.required("PUSHOVER_APP_TOKEN")?;
        let user_keys = vars.user_keys()?;
        let max_chars: usize = vars.parsed("PUSHOVER_MAX_CHARS", 1024)?;
        if max_chars < MIN_MESSAGE_CHARS {
            return Err(ConfigError::Invalid {
                key: "PUSHOVER_MAX_CHARS",
                value: max_chars.to_string(),
                reason: format!("must be at least {MIN_MESSAGE_CHARS}"),
            });
        }
        let pushover = PushoverConfig {
            app_token,
            user_keys,
            api_url: vars.or("PUSHOVER_API_URL", DEFAULT_PUSHOVER_URL),
            max_chars,
            timeout: Duration::from_millis(vars.parsed("NOTIFY_TIMEOUT_MS", 15_000)?),
        };

        let directories = DirectoryConfig {
            logs_dir: vars.or("LOGS_DIR", "logs"),
            state_dir: vars.or("STATE_DIR", "state"),
            state_filename: vars.or("STATE_FILENAME", "last_snapshot.json"),
            snapshot_dirname: vars.or("SNAPSHOT_DIRNAME", "snapshots"),
        };

        let logging = LoggingConfig {
            level: vars.or("LOG_LEVEL", "info"),
        };

        let timezone_raw = vars.or("WATCH_TIMEZONE", "America/Chicago");
        let timezone = timezone_raw
            .parse::<Tz>()
            .map_err(|err| ConfigError::Invalid {
                key: "WATCH_TIMEZONE",
                value: timezone_raw.clone(),
                reason: err.to_string(),
            })?;

        let quiet_hours = match vars.optional("QUIET_HOURS") {
            Some(raw) => Some(QuietHours::from_str(&raw).map_err(|reason| {
                ConfigError::Invalid {
                    key: "QUIET_HOURS",
                    value: raw.clone(),
                    reason,
                }
            })?),
            None => None,
        };

        let defaults = NotifyPolicy::default();
        let policy = NotifyPolicy {
            title: vars.or("NOTIFY_TITLE", &defaults.title),
            notify_on_first_run: vars.flag("NOTIFY_ON_FIRST_RUN", defaults.notify_on_first_run)?,
            notify_on_no_change: vars.flag("NOTIFY_ON_NO_CHANGE", defaults.notify_on_no_change)?,
            no_change_message: vars.or("NO_CHANGE_MESSAGE", &defaults.no_change_message),
        };

        let browser = BrowserConfig {
            headless: vars.flag("BROWSER_HEADLESS", true)?,
            idle_timeout: Duration::from_millis(vars.parsed("PAGE_IDLE_TIMEOUT_MS", 20_000)?),
            selector_timeout: Duration::from_millis(vars.parsed("SELECTOR_TIMEOUT_MS", 20_000)?),
        };

        Ok(Self {
            site,
            pushover,
            directories,
            logging,
            timezone,
            quiet_hours,
            policy,
            browser,
        })
    }
}

struct Vars<F> {
    lookup: F,
}

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Trimmed value, with blanks treated as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn required(&self, key: &'static str) -> Result<String, ConfigError> {
        self.optional(key).ok_or(ConfigError::Missing(key))
    }

    fn or(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    fn url(&self, key: &'static str) -> Result<Url, ConfigError> {
        let raw = self.required(key)?;
        match Url::parse(&raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(url),
            Ok(url) => Err(ConfigError::Invalid {
                key,
                value: raw,
                reason: format!("unsupported scheme {}", url.scheme()),
            }),
            Err(err) => Err(ConfigError::Invalid {
                key,
                value: raw,
                reason: err.to_string(),
            }),
        }
    }

    fn parsed<T>(&self, key: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.optional(key) {
            Some(raw) => raw.parse::<T>().map_err(|err| ConfigError::Invalid {
                key,
                value: raw.clone(),
                reason: err.to_string(),
            }),
            None => Ok(default),
        }
    }

    fn flag(&self, key: &'static str, default: bool) -> Result<bool, ConfigError> {
        let Some(raw) = self.optional(key) else {
            return Ok(default);
        };
        match raw.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid {
                key,
                value: raw,
                reason: "expected a boolean".to_string(),
            }),
        }
    }

    /// `PUSHOVER_USER_KEYS` wins; `PUSHOVER_USER_KEY` is the single-key legacy form.
    fn user_keys(&self) -> Result<Vec<String>, ConfigError> {
        if let Some(raw) = self.optional("PUSHOVER_USER_KEYS") {
            let keys = raw
                .split(',')
                .map(|part| part.trim().to_string())
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>();
            if !keys.is_empty() {
                return Ok(keys);
            }
        }
        self.optional("PUSHOVER_USER_KEY")
            .map(|key| vec![key])
            .ok_or(ConfigError::Missing("PUSHOVER_USER_KEYS"))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn base() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("LOGIN_URL", "https://example.com/login"),
            ("TARGET_URL", "https://example.com/games"),
            ("USERNAME", "rich"),
            ("PASSWORD", "hunter2"),
            ("USERNAME_SELECTOR", "#user"),
            ("PASSWORD_SELECTOR", "#pass"),
            ("SUBMIT_SELECTOR", "button[type=submit]"),
            ("PUSHOVER_APP_TOKEN", "app-token"),
            ("PUSHOVER_USER_KEYS", "u1, u2 ,,u3"),
        ])
    }

    fn load(vars: &HashMap<&'static str, &'static str>) -> Result<AppConfig, ConfigError> {
        AppConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
    }

    #[test]
    fn defaults_apply_when_optional_values_absent() {
        let config = load(&base()).unwrap();
        assert_eq!(config.site.content_selector, "body");
        assert_eq!(config.pushover.user_keys, vec!["u1", "u2", "u3"]);
        assert_eq!(config.pushover.max_chars, 1024);
        assert_eq!(config.timezone, chrono_tz::America::Chicago);
        assert!(config.quiet_hours.is_none());
        assert!(!config.policy.notify_on_first_run);
        assert!(!config.policy.notify_on_no_change);
        assert!(config.browser.headless);
        assert_eq!(config.directories.state_filename, "last_snapshot.json");
    }

    #[test]
    fn legacy_single_user_key_is_accepted() {
        let mut vars = base();
        vars.remove("PUSHOVER_USER_KEYS");
        vars.insert("PUSHOVER_USER_KEY", "solo");
        let config = load(&vars).unwrap();
        assert_eq!(config.pushover.user_keys, vec!["solo"]);
    }

    #[test]
    fn missing_recipients_is_an_error() {
        let mut vars = base();
        vars.remove("PUSHOVER_USER_KEYS");
        let err = load(&vars).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("PUSHOVER_USER_KEYS")));
    }

    #[test]
    fn missing_required_value_is_reported_by_name() {
        let mut vars = base();
        vars.remove("PASSWORD");
        let err = load(&vars).unwrap_err();
        assert_eq!(err.to_string(), "missing required environment variable: PASSWORD");
    }

    #[test]
    fn non_http_target_is_rejected() {
        let mut vars = base();
        vars.insert("TARGET_URL", "ftp://example.com/file");
        assert!(matches!(
            load(&vars),
            Err(ConfigError::Invalid { key: "TARGET_URL", .. })
        ));
    }

    #[test]
    fn flags_and_quiet_hours_are_parsed() {
        let mut vars = base();
        vars.insert("NOTIFY_ON_FIRST_RUN", "yes");
        vars.insert("NOTIFY_ON_NO_CHANGE", "TRUE");
        vars.insert("QUIET_HOURS", "00:00-07:00");
        let config = load(&vars).unwrap();
        assert!(config.policy.notify_on_first_run);
        assert!(config.policy.notify_on_no_change);
        assert!(config.quiet_hours.is_some());
    }

    #[test]
    fn message_cap_too_small_for_ellipsis_is_rejected() {
        for cap in ["0", "3"] {
            let mut vars = base();
            vars.insert("PUSHOVER_MAX_CHARS", cap);
            assert!(
                matches!(
                    load(&vars),
                    Err(ConfigError::Invalid { key: "PUSHOVER_MAX_CHARS", .. })
                ),
                "cap {cap} accepted"
            );
        }

        let mut vars = base();
        vars.insert("PUSHOVER_MAX_CHARS", "4");
        assert_eq!(load(&vars).unwrap().pushover.max_chars, 4);
    }

    #[test]
    fn bad_flag_and_timezone_are_config_errors() {
        let mut vars = base();
        vars.insert("NOTIFY_ON_NO_CHANGE", "maybe");
        assert!(load(&vars).is_err());

        let mut vars = base();
        vars.insert("WATCH_TIMEZONE", "Mars/Olympus");
        assert!(matches!(
            load(&vars),
            Err(ConfigError::Invalid { key: "WATCH_TIMEZONE", .. })
        ));
    }
}
