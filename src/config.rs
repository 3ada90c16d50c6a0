//! Configuration module for herald.

use serde::Deserialize;
use std::path::Path;

use crate::{HeraldError, Result};

/// Feed source configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// URL of the syndication feed to poll.
    #[serde(default)]
    pub url: String,
    /// Total fetch timeout in seconds.
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
}

fn default_fetch_timeout() -> u64 {
    30
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            fetch_timeout_secs: default_fetch_timeout(),
        }
    }
}

/// Webhook destination configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookConfig {
    /// URL of the chat webhook that receives announcements.
    #[serde(default)]
    pub url: String,
}

/// Message rendering configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageConfig {
    /// Optional label line prepended to every announcement.
    #[serde(default)]
    pub label: String,
    /// Maximum abstract length in characters (0 disables truncation).
    #[serde(default = "default_max_abstract_chars")]
    pub max_abstract_chars: usize,
    /// Pause between deliveries in milliseconds.
    #[serde(default = "default_delivery_pause_ms")]
    pub delivery_pause_ms: u64,
}

fn default_max_abstract_chars() -> usize {
    400
}

fn default_delivery_pause_ms() -> u64 {
    500
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            label: String::new(),
            max_abstract_chars: default_max_abstract_chars(),
            delivery_pause_ms: default_delivery_pause_ms(),
        }
    }
}

/// Announcement state configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StateConfig {
    /// Path to the state file recording already-announced entries.
    #[serde(default = "default_state_path")]
    pub path: String,
}

fn default_state_path() -> String {
    "data/herald-state.json".to_string()
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            path: default_state_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/herald.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Feed source configuration.
    #[serde(default)]
    pub feed: FeedConfig,
    /// Webhook destination configuration.
    #[serde(default)]
    pub webhook: WebhookConfig,
    /// Message rendering configuration.
    #[serde(default)]
    pub message: MessageConfig,
    /// Announcement state configuration.
    #[serde(default)]
    pub state: StateConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(HeraldError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| HeraldError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables (highest priority):
    /// - `HERALD_FEED_URL`: feed source URL
    /// - `HERALD_WEBHOOK_URL`: webhook destination URL
    /// - `HERALD_STATE_PATH`: state file path
    /// - `HERALD_LABEL`: message label line
    /// - `HERALD_ABSTRACT_CHARS`: maximum abstract length
    /// - `HERALD_FETCH_TIMEOUT_SECS`: feed fetch timeout
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(value) = std::env::var("HERALD_FEED_URL") {
            if !value.is_empty() {
                self.feed.url = value;
            }
        }
        if let Ok(value) = std::env::var("HERALD_WEBHOOK_URL") {
            if !value.is_empty() {
                self.webhook.url = value;
            }
        }
        if let Ok(value) = std::env::var("HERALD_STATE_PATH") {
            if !value.is_empty() {
                self.state.path = value;
            }
        }
        if let Ok(value) = std::env::var("HERALD_LABEL") {
            if !value.is_empty() {
                self.message.label = value;
            }
        }
        if let Ok(value) = std::env::var("HERALD_ABSTRACT_CHARS") {
            self.message.max_abstract_chars = value.parse().map_err(|_| {
                HeraldError::Config(format!("HERALD_ABSTRACT_CHARS is not a number: {value}"))
            })?;
        }
        if let Ok(value) = std::env::var("HERALD_FETCH_TIMEOUT_SECS") {
            self.feed.fetch_timeout_secs = value.parse().map_err(|_| {
                HeraldError::Config(format!("HERALD_FETCH_TIMEOUT_SECS is not a number: {value}"))
            })?;
        }
        Ok(())
    }

    /// Validate the configuration.
    ///
    /// Returns an error if the feed or webhook URL is missing or not an
    /// http(s) URL.
    pub fn validate(&self) -> Result<()> {
        validate_http_url("feed.url", &self.feed.url)?;
        validate_http_url("webhook.url", &self.webhook.url)?;
        if self.state.path.trim().is_empty() {
            return Err(HeraldError::Config("state.path is not set".to_string()));
        }
        Ok(())
    }
}

/// Check that a required setting holds an http(s) URL.
fn validate_http_url(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(HeraldError::Config(format!(
            "{name} is not set. Set it in config.toml or via the environment."
        )));
    }
    let parsed = url::Url::parse(value)
        .map_err(|e| HeraldError::Config(format!("{name} is not a valid URL: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(HeraldError::Config(format!(
            "{name} has unsupported scheme: {scheme}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Environment overrides are process-global; serialize the tests that
    /// touch them.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.feed.url, "");
        assert_eq!(config.feed.fetch_timeout_secs, 30);

        assert_eq!(config.webhook.url, "");

        assert_eq!(config.message.label, "");
        assert_eq!(config.message.max_abstract_chars, 400);
        assert_eq!(config.message.delivery_pause_ms, 500);

        assert_eq!(config.state.path, "data/herald-state.json");

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.file, "logs/herald.log");
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r##"
[feed]
url = "https://example.com/feed.xml"
fetch_timeout_secs = 10

[webhook]
url = "https://hooks.example.com/services/T/B/X"

[message]
label = "#papers"
max_abstract_chars = 200
delivery_pause_ms = 100

[state]
path = "/var/lib/herald/state.json"

[logging]
level = "debug"
file = "/var/log/herald.log"
"##;
        let config = Config::parse(toml).unwrap();
        assert_eq!(config.feed.url, "https://example.com/feed.xml");
        assert_eq!(config.feed.fetch_timeout_secs, 10);
        assert_eq!(config.webhook.url, "https://hooks.example.com/services/T/B/X");
        assert_eq!(config.message.label, "#papers");
        assert_eq!(config.message.max_abstract_chars, 200);
        assert_eq!(config.message.delivery_pause_ms, 100);
        assert_eq!(config.state.path, "/var/lib/herald/state.json");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_parse_partial_config_uses_defaults() {
        let toml = r#"
[feed]
url = "https://example.com/feed.xml"
"#;
        let config = Config::parse(toml).unwrap();
        assert_eq!(config.feed.url, "https://example.com/feed.xml");
        assert_eq!(config.feed.fetch_timeout_secs, 30);
        assert_eq!(config.message.max_abstract_chars, 400);
        assert_eq!(config.state.path, "data/herald-state.json");
    }

    #[test]
    fn test_parse_invalid_config() {
        assert!(Config::parse("not valid toml [").is_err());
    }

    #[test]
    fn test_validate_requires_urls() {
        let config = Config::default();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.feed.url = "https://example.com/feed.xml".to_string();
        assert!(config.validate().is_err());

        config.webhook.url = "https://hooks.example.com/x".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_http_schemes() {
        let mut config = Config::default();
        config.feed.url = "ftp://example.com/feed.xml".to_string();
        config.webhook.url = "https://hooks.example.com/x".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("unsupported scheme"));
    }

    #[test]
    fn test_env_overrides() {
        let _guard = ENV_LOCK.lock().unwrap();

        std::env::set_var("HERALD_FEED_URL", "https://env.example.com/feed.xml");
        std::env::set_var("HERALD_WEBHOOK_URL", "https://env.example.com/hook");
        std::env::set_var("HERALD_STATE_PATH", "/tmp/env-state.json");
        std::env::set_var("HERALD_LABEL", "#env");
        std::env::set_var("HERALD_ABSTRACT_CHARS", "123");
        std::env::set_var("HERALD_FETCH_TIMEOUT_SECS", "7");

        let mut config = Config::default();
        config.apply_env_overrides().unwrap();

        assert_eq!(config.feed.url, "https://env.example.com/feed.xml");
        assert_eq!(config.webhook.url, "https://env.example.com/hook");
        assert_eq!(config.state.path, "/tmp/env-state.json");
        assert_eq!(config.message.label, "#env");
        assert_eq!(config.message.max_abstract_chars, 123);
        assert_eq!(config.feed.fetch_timeout_secs, 7);

        std::env::remove_var("HERALD_FEED_URL");
        std::env::remove_var("HERALD_WEBHOOK_URL");
        std::env::remove_var("HERALD_STATE_PATH");
        std::env::remove_var("HERALD_LABEL");
        std::env::remove_var("HERALD_ABSTRACT_CHARS");
        std::env::remove_var("HERALD_FETCH_TIMEOUT_SECS");
    }

    #[test]
    fn test_env_override_rejects_bad_number() {
        let _guard = ENV_LOCK.lock().unwrap();

        std::env::set_var("HERALD_ABSTRACT_CHARS", "lots");
        let mut config = Config::default();
        let err = config.apply_env_overrides().unwrap_err();
        assert!(err.to_string().contains("HERALD_ABSTRACT_CHARS"));
        std::env::remove_var("HERALD_ABSTRACT_CHARS");
    }
}
