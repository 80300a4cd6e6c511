//! Configuration for the nestling dashboard.
//!
//! TOML file + `NESTLING_*` environment overrides, and translation to
//! the gateway and service configs. The backend base URL lives here and
//! nowhere else -- every request the dashboard makes derives from the
//! one `base_url` value resolved at startup.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use nestling_api::GatewayConfig;
use nestling_core::DashboardConfig;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Config struct ───────────────────────────────────────────────────

/// Top-level configuration, flat on purpose -- a single baby monitor,
/// a single backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Base URL of the monitor backend.
    #[serde(default = "default_base_url")]
    pub base_url: Url,

    /// Refresh period for the stats subscriptions, in seconds.
    #[serde(default = "default_stats_interval")]
    pub stats_interval_secs: u64,

    /// Refresh period for the health subscription, in seconds.
    #[serde(default = "default_health_interval")]
    pub health_interval_secs: u64,

    /// Row cap for the event-log reads.
    #[serde(default = "default_history_limit")]
    pub history_limit: u32,

    /// Baby's age in months, used only for display.
    pub baby_age_months: Option<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            stats_interval_secs: default_stats_interval(),
            health_interval_secs: default_health_interval(),
            history_limit: default_history_limit(),
            baby_age_months: None,
        }
    }
}

fn default_base_url() -> Url {
    Url::parse("http://127.0.0.1:8001").expect("static default URL")
}
fn default_stats_interval() -> u64 {
    15
}
fn default_health_interval() -> u64 {
    30
}
fn default_history_limit() -> u32 {
    25
}

impl Config {
    /// Gateway config for [`nestling_api::ApiClient`].
    pub fn gateway(&self) -> GatewayConfig {
        GatewayConfig {
            base_url: self.base_url.clone(),
        }
    }

    /// Refresh cadence for the dashboard service.
    pub fn dashboard(&self) -> DashboardConfig {
        DashboardConfig {
            stats_interval: Duration::from_secs(self.stats_interval_secs),
            health_interval: Duration::from_secs(self.health_interval_secs),
            history_limit: self.history_limit,
        }
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.stats_interval_secs == 0 {
            return Err(ConfigError::Validation {
                field: "stats_interval_secs".into(),
                reason: "must be at least 1".into(),
            });
        }
        if self.health_interval_secs == 0 {
            return Err(ConfigError::Validation {
                field: "health_interval_secs".into(),
                reason: "must be at least 1".into(),
            });
        }
        if self.history_limit == 0 {
            return Err(ConfigError::Validation {
                field: "history_limit".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(self)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "nestling", "nestling").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("nestling");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load from defaults, then a TOML file, then `NESTLING_*` env vars.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("NESTLING_"));

    let config: Config = figment.extract()?;
    config.validate()
}

/// Load from the canonical config path.
pub fn load_config() -> Result<Config, ConfigError> {
    load_from(&config_path())
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_without_file_or_env() {
        figment::Jail::expect_with(|_jail| {
            let cfg = load_from(Path::new("config.toml")).expect("defaults load");
            assert_eq!(cfg.base_url.as_str(), "http://127.0.0.1:8001/");
            assert_eq!(cfg.stats_interval_secs, 15);
            assert_eq!(cfg.health_interval_secs, 30);
            assert_eq!(cfg.history_limit, 25);
            assert_eq!(cfg.baby_age_months, None);
            Ok(())
        });
    }

    #[test]
    fn toml_file_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                    base_url = "http://nursery.local:8001"
                    stats_interval_secs = 5
                    baby_age_months = 7
                "#,
            )?;
            let cfg = load_from(Path::new("config.toml")).expect("file load");
            assert_eq!(cfg.base_url.as_str(), "http://nursery.local:8001/");
            assert_eq!(cfg.stats_interval_secs, 5);
            assert_eq!(cfg.history_limit, 25);
            assert_eq!(cfg.baby_age_months, Some(7));
            Ok(())
        });
    }

    #[test]
    fn env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("config.toml", r#"stats_interval_secs = 5"#)?;
            jail.set_env("NESTLING_STATS_INTERVAL_SECS", "60");
            jail.set_env("NESTLING_BASE_URL", "http://10.0.0.8:8001");
            let cfg = load_from(Path::new("config.toml")).expect("env load");
            assert_eq!(cfg.stats_interval_secs, 60);
            assert_eq!(cfg.base_url.as_str(), "http://10.0.0.8:8001/");
            Ok(())
        });
    }

    #[test]
    fn zero_interval_is_rejected() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("config.toml", r#"stats_interval_secs = 0"#)?;
            let err = load_from(Path::new("config.toml")).expect_err("rejected");
            assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "stats_interval_secs"));
            Ok(())
        });
    }

    #[test]
    fn interval_translation() {
        let cfg = Config {
            stats_interval_secs: 7,
            ..Config::default()
        };
        let dash = cfg.dashboard();
        assert_eq!(dash.stats_interval, Duration::from_secs(7));
        assert_eq!(dash.health_interval, Duration::from_secs(30));
        assert_eq!(cfg.gateway().base_url, cfg.base_url);
    }
}
