//! Configuration management for the application.
//!
//! Settings load from an optional `ticketline.toml` file and are overridden
//! by `TICKETLINE_*` environment variables (double underscore as the section
//! separator, e.g. `TICKETLINE_DATABASE__URL`).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Database connection settings.
    pub database: DatabaseSettings,
    /// Allocator behavior settings.
    #[serde(default)]
    pub allocator: AllocatorSettings,
    /// Logging settings.
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

impl AppConfig {
    /// Load configuration from file and environment.
    pub fn load() -> Result<Self> {
        Self::load_from("ticketline")
    }

    /// Load configuration with an explicit file stem (without extension).
    pub fn load_from(file_stem: &str) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::File::with_name(file_stem).required(false))
            .add_source(config::Environment::with_prefix("TICKETLINE").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        cfg.try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

/// Database connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// Database connection URL.
    pub url: String,

    /// Connection pool size.
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,

    /// Connection acquire timeout in seconds.
    #[serde(default = "default_db_timeout")]
    pub timeout_seconds: u64,
}

/// Allocator behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocatorSettings {
    /// Platform commission in basis points (500 = 5%).
    #[serde(default = "default_commission_bps")]
    pub commission_bps: u16,

    /// Upper bound on waiting for a contended event lock, in milliseconds.
    #[serde(default = "default_lock_wait_ms")]
    pub lock_wait_ms: u64,

    /// Maximum number of per-event locks retained in memory.
    #[serde(default = "default_lock_table_capacity")]
    pub lock_table_capacity: usize,
}

impl AllocatorSettings {
    /// The lock wait bound as a [`Duration`].
    pub fn lock_wait(&self) -> Duration {
        Duration::from_millis(self.lock_wait_ms)
    }
}

impl Default for AllocatorSettings {
    fn default() -> Self {
        Self {
            commission_bps: default_commission_bps(),
            lock_wait_ms: default_lock_wait_ms(),
            lock_table_capacity: default_lock_table_capacity(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetrySettings {
    /// Service name reported in logs.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Enable JSON logging format.
    #[serde(default)]
    pub json_logging: bool,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            json_logging: false,
            log_level: default_log_level(),
        }
    }
}

// Default value functions

fn default_pool_size() -> u32 {
    10
}

fn default_db_timeout() -> u64 {
    30
}

fn default_commission_bps() -> u16 {
    500
}

fn default_lock_wait_ms() -> u64 {
    5_000
}

fn default_lock_table_capacity() -> usize {
    1_024
}

fn default_service_name() -> String {
    "ticketline".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocator_defaults() {
        let settings = AllocatorSettings::default();
        assert_eq!(settings.commission_bps, 500);
        assert_eq!(settings.lock_wait(), Duration::from_secs(5));
        assert_eq!(settings.lock_table_capacity, 1_024);
    }

    #[test]
    fn test_settings_deserialization_fills_defaults() {
        let json = r#"{ "database": { "url": "postgres://localhost/ticketline" } }"#;
        let cfg: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.database.pool_size, 10);
        assert_eq!(cfg.allocator.commission_bps, 500);
        assert_eq!(cfg.telemetry.log_level, "info");
        assert!(!cfg.telemetry.json_logging);
    }
}
