//! Configuration for the wattdown daemon.
//!
//! TOML file + `WATTDOWN_*` environment variables via figment, credential
//! resolution (env var → system keyring → plaintext config), and
//! translation to `wattdown_core::WatchConfig` with validation.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use wattdown_core::{BootThresholds, PowerBand, WatchConfig};

/// Keyring service name and entry for the metrics password.
const KEYRING_SERVICE: &str = "wattdown";
const KEYRING_ENTRY: &str = "metrics-password";

/// Environment variable checked first in the credential chain. The same
/// variable also reaches the config through figment's env provider; the
/// explicit check just makes the precedence obvious.
const PASSWORD_ENV: &str = "WATTDOWN_METRICS_PASSWORD";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no metrics password configured")]
    NoPassword,

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

// ── TOML config struct ──────────────────────────────────────────────

/// File-facing configuration. Durations are humantime strings ("60s",
/// "15m"); parsing and range validation happen in [`to_watch_config`].
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Metrics backend base URL.
    pub metrics_url: String,

    /// Basic-auth user for the metrics backend.
    pub metrics_user: String,

    /// Plaintext password -- prefer `WATTDOWN_METRICS_PASSWORD` or the
    /// system keyring.
    pub metrics_password: Option<String>,

    /// Backend-side regex matched against the plug's `device_name` label.
    pub device_pattern: String,

    /// Evaluation cycle interval.
    pub check_interval: String,

    /// Standby band, watts. Readings exactly on either bound are out of
    /// band.
    pub min_watts: f64,
    pub max_watts: f64,

    /// How long power must sit in the band before shutoff.
    pub standby_duration: String,

    /// Shutoff suspension window after a detected power-on.
    pub boot_grace: String,

    /// Log the shutoff instead of sending it.
    pub dry_run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            metrics_url: "http://localhost:8428".into(),
            metrics_user: "admin".into(),
            metrics_password: None,
            device_pattern: ".*[Pp]rinter.*".into(),
            check_interval: "60s".into(),
            min_watts: 7.0,
            max_watts: 9.0,
            standby_duration: "15m".into(),
            boot_grace: "20m".into(),
            dry_run: false,
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("de", "r4b2", "wattdown").map_or_else(
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
    p.push("wattdown");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the config from defaults + file + environment.
///
/// `path` overrides the canonical config file location (CLI `--config`).
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let file = path.map_or_else(config_path, Path::to_path_buf);

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&file))
        .merge(Env::prefixed("WATTDOWN_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path` (or the canonical
/// location), creating parent directories as needed.
pub fn save_config(cfg: &Config, path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let file = path.map_or_else(config_path, Path::to_path_buf);
    if let Some(parent) = file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&file, toml_str)?;
    Ok(file)
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the metrics password from the credential chain.
pub fn resolve_password(cfg: &Config) -> Result<SecretString, ConfigError> {
    // 1. Environment variable
    if let Ok(val) = std::env::var(PASSWORD_ENV) {
        if !val.is_empty() {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, KEYRING_ENTRY) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(ref password) = cfg.metrics_password {
        if !password.is_empty() {
            return Ok(SecretString::from(password.clone()));
        }
    }

    Err(ConfigError::NoPassword)
}

// ── Translation to WatchConfig ──────────────────────────────────────

fn parse_duration(field: &str, value: &str) -> Result<Duration, ConfigError> {
    let d = humantime::parse_duration(value).map_err(|e| ConfigError::Validation {
        field: field.into(),
        reason: format!("invalid duration '{value}': {e}"),
    })?;
    if d.is_zero() {
        return Err(ConfigError::Validation {
            field: field.into(),
            reason: "duration must be non-zero".into(),
        });
    }
    Ok(d)
}

/// Validate the config and build a `WatchConfig`, resolving credentials.
pub fn to_watch_config(cfg: &Config) -> Result<WatchConfig, ConfigError> {
    let metrics_url: url::Url = cfg
        .metrics_url
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "metrics_url".into(),
            reason: format!("invalid URL: {}", cfg.metrics_url),
        })?;

    if cfg.min_watts < 0.0 || cfg.max_watts < 0.0 {
        return Err(ConfigError::Validation {
            field: "min_watts/max_watts".into(),
            reason: "wattage thresholds must be non-negative".into(),
        });
    }
    if cfg.min_watts >= cfg.max_watts {
        return Err(ConfigError::Validation {
            field: "min_watts/max_watts".into(),
            reason: format!(
                "min_watts ({}) must be below max_watts ({})",
                cfg.min_watts, cfg.max_watts
            ),
        });
    }

    let metrics_password = resolve_password(cfg)?;

    Ok(WatchConfig {
        metrics_url,
        metrics_user: cfg.metrics_user.clone(),
        metrics_password,
        device_pattern: cfg.device_pattern.clone(),
        check_interval: parse_duration("check_interval", &cfg.check_interval)?,
        band: PowerBand {
            min_watts: cfg.min_watts,
            max_watts: cfg.max_watts,
        },
        standby_duration: parse_duration("standby_duration", &cfg.standby_duration)?,
        boot_grace: parse_duration("boot_grace", &cfg.boot_grace)?,
        boot_thresholds: BootThresholds::default(),
        dry_run: cfg.dry_run,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_password(mut cfg: Config) -> Config {
        cfg.metrics_password = Some("secret".into());
        cfg
    }

    #[test]
    fn defaults_translate_once_a_password_exists() {
        let cfg = with_password(Config::default());
        let watch = to_watch_config(&cfg).expect("defaults are valid");
        assert_eq!(watch.check_interval, Duration::from_secs(60));
        assert_eq!(watch.standby_duration, Duration::from_secs(15 * 60));
        assert_eq!(watch.boot_grace, Duration::from_secs(20 * 60));
        assert!(!watch.dry_run);
    }

    #[test]
    fn inverted_band_is_rejected() {
        let mut cfg = with_password(Config::default());
        cfg.min_watts = 9.0;
        cfg.max_watts = 7.0;
        assert!(matches!(
            to_watch_config(&cfg),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn malformed_duration_is_rejected() {
        let mut cfg = with_password(Config::default());
        cfg.check_interval = "soon".into();
        assert!(matches!(
            to_watch_config(&cfg),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let mut cfg = with_password(Config::default());
        cfg.check_interval = "0s".into();
        assert!(matches!(
            to_watch_config(&cfg),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn config_file_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");

        let mut cfg = Config::default();
        cfg.device_pattern = "workshop-plug".into();
        cfg.dry_run = true;
        save_config(&cfg, Some(&path)).expect("save");

        let loaded = load_config(Some(&path)).expect("load");
        assert_eq!(loaded.device_pattern, "workshop-plug");
        assert!(loaded.dry_run);
    }
}
