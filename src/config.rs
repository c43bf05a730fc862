use std::{path::PathBuf, time::Duration};

use anyhow::Context as _;
use url::Url;

use crate::{format::Zone, notice::Notices, poller::Poller};

#[derive(Clone, Debug)]
pub struct Config {
    pub api_url: Url,
    pub poll_interval: Duration,
    pub notice_duration: Duration,
    pub output: PathBuf,
    /// Zone for displayed and entered times, the host's by default.
    pub zone: Zone,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    api_url: Option<String>,
    poll_interval_ms: Option<u64>,
    notice_duration_ms: Option<u64>,
    output: Option<PathBuf>,
}

impl Config {
    pub const DEFAULT_FILE: &'static str = "notifier-panel.toml";
    pub const DEFAULT_API_URL: &'static str = "http://localhost:8080/";
    pub const DEFAULT_OUTPUT: &'static str = "notifications.html";

    /// Defaults, then the TOML file (if any), then `NOTIFIER_*` variables.
    pub fn load() -> anyhow::Result<Self> {
        let explicit = std::env::var("NOTIFIER_CONFIG").ok();
        let path = explicit.as_deref().unwrap_or(Self::DEFAULT_FILE);

        let file = match std::fs::read_to_string(path) {
            Ok(data) => Some(data),
            Err(err) if explicit.is_none() && err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => return Err(err).with_context(|| format!("cannot read config '{path}'")),
        };

        Self::from_sources(file.as_deref(), |key| std::env::var(key).ok())
            .with_context(|| format!("invalid configuration (file: '{path}')"))
    }

    fn from_sources(
        file: Option<&str>,
        env: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<Self> {
        let file = file
            .map(toml::from_str::<FileConfig>)
            .transpose()
            .context("cannot parse config file")?
            .unwrap_or_default();

        let millis = |key: &str| -> anyhow::Result<Option<u64>> {
            env(key)
                .map(|raw| {
                    raw.trim()
                        .parse::<u64>()
                        .with_context(|| format!("'{key}' must be a number of milliseconds"))
                })
                .transpose()
        };

        let api_url = env("NOTIFIER_API_URL")
            .or(file.api_url)
            .unwrap_or_else(|| Self::DEFAULT_API_URL.to_string());
        let api_url = Url::parse(&api_url).with_context(|| format!("invalid api url '{api_url}'"))?;

        let poll_interval = millis("NOTIFIER_POLL_MS")?
            .or(file.poll_interval_ms)
            .map_or(Poller::DEFAULT_INTERVAL, Duration::from_millis);
        anyhow::ensure!(!poll_interval.is_zero(), "poll interval cannot be zero");

        let notice_duration = millis("NOTIFIER_NOTICE_MS")?
            .or(file.notice_duration_ms)
            .map_or(Notices::<()>::DEFAULT_DURATION, Duration::from_millis);

        let output = env("NOTIFIER_OUTPUT")
            .map(PathBuf::from)
            .or(file.output)
            .unwrap_or_else(|| PathBuf::from(Self::DEFAULT_OUTPUT));

        Ok(Self {
            api_url,
            poll_interval,
            notice_duration,
            output,
            zone: Zone::Local,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults() {
        let config = Config::from_sources(None, no_env).unwrap();
        assert_eq!(config.api_url.as_str(), "http://localhost:8080/");
        assert_eq!(config.poll_interval, Duration::from_millis(5000));
        assert_eq!(config.notice_duration, Duration::from_millis(5000));
        assert_eq!(config.output, PathBuf::from("notifications.html"));
        assert_eq!(config.zone, Zone::Local);
    }

    #[test]
    fn env_overrides_file() {
        let file = r#"
            api_url = "http://notifier:9000/"
            poll_interval_ms = 1000
            output = "/tmp/panel.html"
        "#;
        let env = |key: &str| match key {
            "NOTIFIER_POLL_MS" => Some("250".to_string()),
            _ => None,
        };

        let config = Config::from_sources(Some(file), env).unwrap();
        assert_eq!(config.api_url.as_str(), "http://notifier:9000/");
        assert_eq!(config.poll_interval, Duration::from_millis(250));
        assert_eq!(config.output, PathBuf::from("/tmp/panel.html"));
    }

    #[test]
    fn rejects_bad_values() {
        let env = |key: &str| (key == "NOTIFIER_NOTICE_MS").then(|| "soon".to_string());
        assert!(Config::from_sources(None, env).is_err());

        assert!(Config::from_sources(Some("poll_interval_ms = 0"), no_env).is_err());
        assert!(Config::from_sources(Some("api_url = 'not a url'"), no_env).is_err());
        assert!(Config::from_sources(Some("colour = 'red'"), no_env).is_err());
    }
}
