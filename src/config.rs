//! Layered configuration.
//!
//! Sources, lowest precedence first: built-in defaults, an optional TOML
//! file, then `PONDWATCH__*` environment variables (`__` separates nested
//! keys, e.g. `PONDWATCH__API__BASE_URL`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use pondwatch_types::Locale;
use serde::Deserialize;

const DEFAULTS: &str = r#"
locale = "id"

[api]
base_url = "http://localhost:5000"
timeout_secs = 10

[polling]
dashboard_interval_ms = 60000
notifications_interval_ms = 30000

[session]
store_path = "pondwatch-session.json"

[logging]
level = "info"
json = false
"#;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MonitorConfig {
    pub api: ApiConfig,
    pub polling: PollingConfig,
    pub session: SessionConfig,
    pub locale: Locale,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Cadence of the two polling schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PollingConfig {
    pub dashboard_interval_ms: u64,
    pub notifications_interval_ms: u64,
}

impl PollingConfig {
    pub fn dashboard_interval(&self) -> Duration {
        Duration::from_millis(self.dashboard_interval_ms)
    }

    pub fn notifications_interval(&self) -> Duration {
        Duration::from_millis(self.notifications_interval_ms)
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            dashboard_interval_ms: 60_000,
            notifications_interval_ms: 30_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SessionConfig {
    pub store_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
    pub json: bool,
}

impl MonitorConfig {
    /// Load defaults, then `path` if given (it must exist), then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULTS, FileFormat::Toml));

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }

        builder
            .add_source(
                Environment::with_prefix("PONDWATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to load configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "http://localhost:5000".to_string(),
                timeout_secs: 10,
            },
            polling: PollingConfig::default(),
            session: SessionConfig {
                store_path: PathBuf::from("pondwatch-session.json"),
            },
            locale: Locale::Indonesian,
            logging: LoggingConfig {
                level: "info".to_string(),
                json: false,
            },
        }
    }
}
