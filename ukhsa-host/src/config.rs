//! Host configuration.
//!
//! Loaded from an optional TOML file, then overridden by `UKHSA__*`
//! environment variables (e.g. `UKHSA__API__TIMEOUT_SECS=10`). Every field
//! has a default, so running without a file polls the production API every
//! 24 hours.
//!
//! ```toml
//! entry_id = "default"
//!
//! [api]
//! base_url = "https://api.ukhsa-dashboard.data.gov.uk"
//! timeout_secs = 30
//!
//! [schedule]
//! interval_secs = 86400
//!
//! [setup_retry]
//! initial_secs = 30
//! max_secs = 1800
//!
//! [log]
//! filter = "ukhsa_tracker=info,ukhsa_client=info,ukhsa_host=info"
//! ```

use std::path::Path;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use ukhsa_client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use ukhsa_tracker::{DEFAULT_INTERVAL, MAX_INTERVAL, MIN_INTERVAL};

/// Top-level host configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Id of the tracker entry the host sets up.
    pub entry_id: String,
    pub api: ApiConfig,
    pub schedule: ScheduleConfig,
    pub setup_retry: RetryConfig,
    pub log: LogConfig,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            entry_id: "default".to_string(),
            api: ApiConfig::default(),
            schedule: ScheduleConfig::default(),
            setup_retry: RetryConfig::default(),
            log: LogConfig::default(),
        }
    }
}

/// API client settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// Refresh schedule settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub interval_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_INTERVAL.as_secs(),
        }
    }
}

impl ScheduleConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs).clamp(MIN_INTERVAL, MAX_INTERVAL)
    }
}

/// Backoff between setup attempts while the first refresh keeps failing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub initial_secs: u64,
    pub max_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_secs: 30,
            max_secs: 30 * 60,
        }
    }
}

/// Logging settings. `RUST_LOG` takes precedence over `filter`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "ukhsa_tracker=info,ukhsa_client=info,ukhsa_host=info".to_string(),
        }
    }
}

impl HostConfig {
    /// Load configuration from an optional file and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(path, environment())
    }

    fn load_with(path: Option<&Path>, env: Environment) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        builder.add_source(env).build()?.try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix("UKHSA")
        .separator("__")
        .try_parsing(true)
}
