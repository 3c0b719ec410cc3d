//! Alerting System
//!
//! Turns DMS events into spoken alarms: a repeating drowsiness alarm that runs
//! until the driver's eyes reopen, and one-shot phrases for yawns and fatigue.

mod manager;
mod player;

pub use manager::{AlarmAction, AlarmConfig, AlarmManager, AlarmStats};
pub use player::{AlarmPlayer, LogSpeaker, Speaker};

use thiserror::Error;

/// Alarm errors
#[derive(Debug, Error)]
pub enum AlarmError {
    #[error("Alarm task failed: {0}")]
    Task(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
