//! Monitor configuration
//!
//! Loaded from an optional TOML file, then overridden by `MONITOR__*`
//! environment variables (`MONITOR__DMS__EAR_THRESHOLD=0.22`).

use std::path::{Path, PathBuf};

use alerting::AlarmConfig;
use config::{Config, ConfigError, Environment, File, Map};
use dms::DmsConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Max tracing level (trace, debug, info, warn, error)
    pub log_level: String,

    /// JSON-lines landmark trace to replay
    pub trace_path: PathBuf,

    /// Directory for run reports
    pub log_dir: PathBuf,

    /// Pace replay by frame timestamps instead of running flat out
    pub realtime: bool,

    /// Write the run report when the trace ends
    pub save_report: bool,

    pub dms: DmsConfig,

    pub alarm: AlarmConfig,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            trace_path: PathBuf::from("landmarks.jsonl"),
            log_dir: PathBuf::from("logs"),
            realtime: false,
            save_report: true,
            dms: DmsConfig::default(),
            alarm: AlarmConfig::default(),
        }
    }
}

impl MonitorConfig {
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, None)
    }

    /// Like [`load`](Self::load), reading overrides from `env` instead of the
    /// process environment when given
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        builder
            .add_source(
                Environment::with_prefix("MONITOR")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?
            .try_deserialize()
    }
}
