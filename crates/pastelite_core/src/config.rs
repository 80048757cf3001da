//! Configuration loading from environment variables.

use crate::constants::{DEFAULT_MAX_PASTE_SIZE, DEFAULT_PORT, DEFAULT_REAP_INTERVAL_SECS};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Runtime configuration for PasteLite.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub db_path: String,
    pub port: u16,
    pub max_paste_size: usize,
    pub reap_interval_secs: u64,
    /// Honor the injected request time header.
    pub test_mode: bool,
    /// Base URL used when building share links, e.g. `https://paste.example`.
    pub public_url: Option<String>,
    /// Raw `BIND` override; parsed and checked by the server.
    pub bind: Option<String>,
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: String) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = resolve_home_dir() {
            return home.join(rest).to_string_lossy().to_string();
        }
    }
    path
}

fn resolve_home_dir() -> Option<PathBuf> {
    if let Ok(home) = env::var("HOME") {
        if !home.trim().is_empty() {
            return Some(PathBuf::from(home));
        }
    }

    if let Ok(profile) = env::var("USERPROFILE") {
        if !profile.trim().is_empty() {
            return Some(PathBuf::from(profile));
        }
    }

    std::env::current_dir().ok()
}

/// Parse a boolean-like environment flag value.
///
/// # Supported Values
/// - Truthy: `1`, `true`, `yes`, `on`
/// - Falsy: `0`, `false`, `no`, `off`, empty string
///
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// # Returns
/// `Some(bool)` when the value is recognized, otherwise `None`.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read a boolean flag from the environment.
///
/// Missing or unrecognized values are treated as `false`.
pub fn env_flag_enabled(name: &str) -> bool {
    env::var(name)
        .ok()
        .and_then(|value| parse_env_flag(&value))
        .unwrap_or(false)
}

fn env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|value| value.trim().parse().ok())
}

fn normalize_public_url(value: String) -> Option<String> {
    let trimmed = value.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Returns
    /// A populated [`Config`] with defaults applied when env vars are missing
    /// or unparsable.
    pub fn from_env() -> Self {
        Self {
            db_path: env::var("DB_PATH").map(expand_tilde).unwrap_or_else(|_| {
                let home = resolve_home_dir().unwrap_or_else(|| PathBuf::from("."));
                let cache_dir = home.join(".cache").join("pastelite");
                cache_dir.join("db").to_string_lossy().to_string()
            }),
            port: env_parsed("PORT").unwrap_or(DEFAULT_PORT),
            max_paste_size: env_parsed("MAX_PASTE_SIZE").unwrap_or(DEFAULT_MAX_PASTE_SIZE),
            reap_interval_secs: env_parsed::<u64>("REAP_INTERVAL_SECS")
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_REAP_INTERVAL_SECS),
            test_mode: env_flag_enabled("TEST_MODE"),
            public_url: env::var("PUBLIC_URL").ok().and_then(normalize_public_url),
            bind: env::var("BIND")
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty()),
        }
    }

    /// Interval between reaper sweeps.
    pub fn reap_interval(&self) -> Duration {
        Duration::from_secs(self.reap_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_env_flag, Config};
    use crate::constants::{DEFAULT_PORT, DEFAULT_REAP_INTERVAL_SECS};
    use crate::env::with_env;

    #[test]
    fn parse_env_flag_accepts_truthy_values() {
        for value in ["1", "true", "TRUE", " yes ", "on"] {
            assert_eq!(parse_env_flag(value), Some(true), "value: {}", value);
        }
    }

    #[test]
    fn parse_env_flag_accepts_falsy_values() {
        for value in ["", "0", "false", "FALSE", " no ", "off"] {
            assert_eq!(parse_env_flag(value), Some(false), "value: {}", value);
        }
    }

    #[test]
    fn parse_env_flag_rejects_unknown_values() {
        assert_eq!(parse_env_flag("maybe"), None);
        assert_eq!(parse_env_flag("enabled"), None);
    }

    #[test]
    fn from_env_applies_defaults_for_missing_or_invalid_values() {
        let config = with_env(
            &[
                ("PORT", Some("not-a-port")),
                ("REAP_INTERVAL_SECS", Some("0")),
                ("TEST_MODE", None),
                ("PUBLIC_URL", Some("   ")),
                ("BIND", Some("  ")),
            ],
            Config::from_env,
        );
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.reap_interval_secs, DEFAULT_REAP_INTERVAL_SECS);
        assert!(!config.test_mode);
        assert!(config.public_url.is_none());
        assert!(config.bind.is_none());
    }

    #[test]
    fn from_env_reads_overrides() {
        let config = with_env(
            &[
                ("DB_PATH", Some("/tmp/pastelite-config-test")),
                ("PORT", Some("4545")),
                ("REAP_INTERVAL_SECS", Some("30")),
                ("TEST_MODE", Some("1")),
                ("PUBLIC_URL", Some("https://paste.example/")),
                ("BIND", Some(" 0.0.0.0:4545 ")),
            ],
            Config::from_env,
        );
        assert_eq!(config.db_path, "/tmp/pastelite-config-test");
        assert_eq!(config.port, 4545);
        assert_eq!(config.reap_interval().as_secs(), 30);
        assert!(config.test_mode);
        assert_eq!(config.public_url.as_deref(), Some("https://paste.example"));
        assert_eq!(config.bind.as_deref(), Some("0.0.0.0:4545"));
    }

    #[test]
    fn db_path_expands_home_directory() {
        let config = with_env(
            &[("HOME", Some("/home/paster")), ("DB_PATH", Some("~/pastes"))],
            Config::from_env,
        );
        assert_eq!(config.db_path, "/home/paster/pastes");
    }
}
