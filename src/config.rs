// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the admission pipeline.
//!
//! Loaded once at startup from a JSON file, optionally overridden by
//! environment variables, and treated as immutable afterwards.

use crate::error::ConfigError;
use crate::event::fold_eq;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Default tracing directive (default: info)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Skip the re-broadcast action and only log admitted events (default: false)
    #[serde(default)]
    pub test_mode: bool,

    /// Gate thresholds and deny lists
    #[serde(default)]
    pub settings: GateSettings,

    /// Bounded cache capacities
    #[serde(default)]
    pub caches: CacheCapacities,

    /// Muted identity seeding
    #[serde(default)]
    pub muted: MutedConfig,
}

/// Behaviour tunables for the anti-abuse gates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GateSettings {
    /// Handle that authors must follow. Empty disables the follow gate.
    #[serde(default)]
    pub must_follow: String,

    /// Handle whose posts are never admitted (case-insensitive).
    #[serde(default)]
    pub ignore_from: String,

    /// Minimum seconds between admitted posts from one author
    #[serde(default)]
    pub post_time_delta_seconds: i64,

    /// Minimum seconds between admitted posts of one content class from one author
    #[serde(default)]
    pub content_time_delta_seconds: i64,

    /// Content classes subject to the content delta. Empty gates every class.
    #[serde(default)]
    pub delta_gated_content: Vec<String>,

    /// Reject posts flagged as possibly sensitive
    #[serde(default)]
    pub deny_sensitive_content: bool,

    /// Minimum author account age in days. Zero or negative disables the check.
    #[serde(default)]
    pub min_account_age_days: i64,

    /// Require the follow relationship in both directions
    #[serde(default)]
    pub mutual_follow: bool,

    /// Mentioned handles that cause rejection
    #[serde(default)]
    pub prohibited_mentions: Vec<String>,

    /// Words that cause rejection
    #[serde(default)]
    pub prohibited_words: Vec<String>,
}

/// Capacities of the process-wide bounded caches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheCapacities {
    /// Follow status per author handle (default: 128)
    #[serde(default = "default_follow_status")]
    pub follow_status: usize,

    /// Last admitted post time per author (default: 128)
    #[serde(default = "default_post_delta")]
    pub post_delta: usize,

    /// Last admitted post time per author and content class (default: 27)
    #[serde(default = "default_content_delta")]
    pub content_delta: usize,

    /// Recently seen post texts (default: 25)
    #[serde(default = "default_post_text")]
    pub post_text: usize,

    /// Recently re-broadcast media URLs (default: 10)
    #[serde(default = "default_content_url")]
    pub content_url: usize,
}

/// Muted identity configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MutedConfig {
    /// Identities muted at startup
    #[serde(default)]
    pub ids: Vec<i64>,

    /// Re-seed the muted set every N seconds
    #[serde(default)]
    pub refresh_secs: Option<u64>,
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_follow_status() -> usize {
    128
}

fn default_post_delta() -> usize {
    128
}

fn default_content_delta() -> usize {
    27
}

fn default_post_text() -> usize {
    25
}

fn default_content_url() -> usize {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            test_mode: false,
            settings: GateSettings::default(),
            caches: CacheCapacities::default(),
            muted: MutedConfig::default(),
        }
    }
}

impl Default for CacheCapacities {
    fn default() -> Self {
        Self {
            follow_status: default_follow_status(),
            post_delta: default_post_delta(),
            content_delta: default_content_delta(),
            post_text: default_post_text(),
            content_url: default_content_url(),
        }
    }
}

impl Config {
    /// Read and validate a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Config = serde_json::from_str(&raw)?;
        config.validate()?;
        debug!(path = %path.as_ref().display(), "Configuration loaded");
        Ok(config)
    }

    /// Apply environment variable overrides on top of the loaded file.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            self.log_level = v;
        }
        if let Ok(v) = std::env::var("MUST_FOLLOW") {
            self.settings.must_follow = v;
        }
        if let Some(v) = env_parse("MIN_ACCOUNT_AGE_DAYS") {
            self.settings.min_account_age_days = v;
        }
        if let Some(v) = env_parse("POST_TIME_DELTA_SECONDS") {
            self.settings.post_time_delta_seconds = v;
        }
        if let Some(v) = env_parse("CONTENT_TIME_DELTA_SECONDS") {
            self.settings.content_time_delta_seconds = v;
        }
        if let Some(v) = env_parse("MUTUAL_FOLLOW") {
            self.settings.mutual_follow = v;
        }
    }

    /// Reject configurations the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let caches = &self.caches;
        for (name, capacity) in [
            ("follow_status", caches.follow_status),
            ("post_delta", caches.post_delta),
            ("content_delta", caches.content_delta),
            ("post_text", caches.post_text),
            ("content_url", caches.content_url),
        ] {
            if capacity == 0 {
                return Err(ConfigError::ZeroCapacity(name));
            }
        }

        let settings = &self.settings;
        for (name, seconds) in [
            ("post_time_delta_seconds", settings.post_time_delta_seconds),
            ("content_time_delta_seconds", settings.content_time_delta_seconds),
        ] {
            if seconds < 0 {
                return Err(ConfigError::Invalid(format!("{} must not be negative", name)));
            }
            if Duration::try_seconds(seconds).is_none() {
                return Err(ConfigError::Invalid(format!("{} is out of range", name)));
            }
        }
        if Duration::try_days(settings.min_account_age_days).is_none() {
            return Err(ConfigError::Invalid(
                "min_account_age_days is out of range".to_string(),
            ));
        }
        if self.muted.refresh_secs == Some(0) {
            return Err(ConfigError::Invalid(
                "muted.refresh_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl GateSettings {
    /// Minimum time between admitted posts from one author.
    pub fn post_delta(&self) -> Duration {
        saturating_seconds(self.post_time_delta_seconds)
    }

    /// Minimum time between admitted posts of one content class.
    pub fn content_delta(&self) -> Duration {
        saturating_seconds(self.content_time_delta_seconds)
    }

    /// Minimum account age, clamped to zero.
    pub fn min_account_age(&self) -> Duration {
        Duration::try_days(self.min_account_age_days.max(0)).unwrap_or(Duration::MAX)
    }

    /// Whether the content class is rate limited by the content delta.
    pub fn is_delta_gated(&self, content_class: &str) -> bool {
        self.delta_gated_content.is_empty()
            || self
                .delta_gated_content
                .iter()
                .any(|c| fold_eq(c, content_class))
    }
}

/// Values that do not fit a `Duration` never get past `Config::validate`.
fn saturating_seconds(seconds: i64) -> Duration {
    Duration::try_seconds(seconds).unwrap_or(if seconds < 0 {
        Duration::MIN
    } else {
        Duration::MAX
    })
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_document() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.log_level, "info");
        assert!(!config.test_mode);
        assert_eq!(config.caches.follow_status, 128);
        assert_eq!(config.caches.post_delta, 128);
        assert_eq!(config.caches.content_delta, 27);
        assert_eq!(config.caches.post_text, 25);
        assert_eq!(config.caches.content_url, 10);
        assert!(config.settings.must_follow.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_settings() {
        let config: Config = serde_json::from_str(
            r#"{
                "log_level": "debug",
                "settings": {
                    "must_follow": "jack",
                    "ignore_from": "chim",
                    "post_time_delta_seconds": 300,
                    "content_time_delta_seconds": 600,
                    "delta_gated_content": ["gif"],
                    "deny_sensitive_content": true,
                    "min_account_age_days": 5,
                    "mutual_follow": true,
                    "prohibited_mentions": ["cake"],
                    "prohibited_words": ["potassium"]
                },
                "caches": { "post_text": 5 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.settings.must_follow, "jack");
        assert_eq!(config.settings.post_delta(), Duration::seconds(300));
        assert_eq!(config.settings.content_delta(), Duration::seconds(600));
        assert_eq!(config.settings.min_account_age(), Duration::days(5));
        assert!(config.settings.mutual_follow);
        assert_eq!(config.caches.post_text, 5);
        assert_eq!(config.caches.content_url, 10);
    }

    #[test]
    fn test_negative_account_age_clamps_to_zero() {
        let settings = GateSettings {
            min_account_age_days: -5,
            ..Default::default()
        };
        assert_eq!(settings.min_account_age(), Duration::zero());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let mut config = Config::default();
        config.caches.content_url = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroCapacity("content_url"))
        ));
    }

    #[test]
    fn test_negative_delta_rejected() {
        let mut config = Config::default();
        config.settings.post_time_delta_seconds = -1;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_out_of_range_durations_rejected() {
        let mut config = Config::default();
        config.settings.post_time_delta_seconds = i64::MAX;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = Config::default();
        config.settings.content_time_delta_seconds = i64::MAX / 10;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = Config::default();
        config.settings.min_account_age_days = i64::MAX;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_out_of_range_accessors_do_not_panic() {
        let settings = GateSettings {
            post_time_delta_seconds: i64::MAX,
            content_time_delta_seconds: i64::MIN,
            min_account_age_days: i64::MAX,
            ..Default::default()
        };
        assert_eq!(settings.post_delta(), Duration::MAX);
        assert_eq!(settings.content_delta(), Duration::MIN);
        assert_eq!(settings.min_account_age(), Duration::MAX);
    }

    #[test]
    fn test_delta_gated_content() {
        let mut settings = GateSettings::default();
        assert!(settings.is_delta_gated("video"));

        settings.delta_gated_content = vec!["GIF".to_string()];
        assert!(settings.is_delta_gated("gif"));
        assert!(!settings.is_delta_gated("video"));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let path = std::env::temp_dir().join(format!(
            "rebroadcast-gate-config-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, "{ not json").unwrap();
        let result = Config::from_file(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = Config::from_file("/nonexistent/rebroadcast-gate.json");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
