//! # Alarm Configuration Module
//!
//! Loads settings for the alarm engine from environment variables.
//!
//! ## Environment Variables
//!
//! - `SENIORCARE_DATA_DIR`: Directory holding the local key-value store (default: "./data")
//! - `ALARM_CHECK_INTERVAL_SECONDS`: Seconds between alarm checks (default: 60)
//! - `NOTIFICATION_PERMISSION`: Initial permission for native notifications,
//!   one of "default", "granted" or "denied" (default: "default")
//! - `LOG_LEVEL`: Logging level (default: "info")

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use eyre::{Result, WrapErr, eyre};
use tracing::Level;

use crate::notify::Permission;

/// Configuration for the alarm engine and its local storage.
#[derive(Debug, Clone)]
pub struct AlarmConfig {
    /// Directory for the on-device key-value store
    pub data_dir: PathBuf,

    /// How often the alarm list is checked against the clock
    pub check_interval: Duration,

    /// Permission state notifications start in
    pub notification_permission: Permission,

    /// Log level for the application
    pub log_level: Level,
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            check_interval: Duration::from_secs(60),
            notification_permission: Permission::Default,
            log_level: Level::INFO,
        }
    }
}

impl AlarmConfig {
    /// Creates an AlarmConfig from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `ALARM_CHECK_INTERVAL_SECONDS` is not a positive
    /// integer or `NOTIFICATION_PERMISSION` is not a known state.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let data_dir = env::var("SENIORCARE_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let interval_secs: u64 = env::var("ALARM_CHECK_INTERVAL_SECONDS")
            .unwrap_or_else(|_| "60".to_string())
            .parse()
            .wrap_err("Invalid ALARM_CHECK_INTERVAL_SECONDS value")?;
        if interval_secs == 0 {
            return Err(eyre!("ALARM_CHECK_INTERVAL_SECONDS must be greater than zero"));
        }

        let notification_permission = match env::var("NOTIFICATION_PERMISSION") {
            Ok(raw) => raw.parse().wrap_err("Invalid NOTIFICATION_PERMISSION value")?,
            Err(_) => defaults.notification_permission,
        };

        Ok(Self {
            data_dir,
            check_interval: Duration::from_secs(interval_secs),
            notification_permission,
            log_level: parse_log_level(&env::var("LOG_LEVEL").unwrap_or_default()),
        })
    }
}

/// Maps a `LOG_LEVEL` value to a tracing level, defaulting to info.
pub fn parse_log_level(raw: &str) -> Level {
    match raw.trim().to_ascii_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}
