//! Alarm Manager Implementation

use crate::AlarmError;
use dms::DmsEvent;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Alarm configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlarmConfig {
    /// Phrase repeated while the driver is drowsy
    pub drowsiness_phrase: String,
    /// Pause between drowsiness phrases (milliseconds)
    pub repeat_interval_ms: u64,
    /// Phrase for a counted yawn
    pub yawn_phrase: String,
    /// Phrase for a fatigue warning (replaces the yawn phrase on that tick)
    pub fatigue_phrase: String,
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self {
            drowsiness_phrase: "Drowsiness detected! Wake up!".to_string(),
            repeat_interval_ms: 2000,
            yawn_phrase: "Yawn Detected".to_string(),
            fatigue_phrase: "Too many yawns, take a break!".to_string(),
        }
    }
}

impl AlarmConfig {
    /// Reject settings that would make the alarm spin or stay silent
    pub fn validate(&self) -> Result<(), AlarmError> {
        if self.repeat_interval_ms == 0 {
            return Err(AlarmError::Config("repeat_interval_ms must be at least 1".into()));
        }
        for (name, phrase) in [
            ("drowsiness_phrase", &self.drowsiness_phrase),
            ("yawn_phrase", &self.yawn_phrase),
            ("fatigue_phrase", &self.fatigue_phrase),
        ] {
            if phrase.trim().is_empty() {
                return Err(AlarmError::Config(format!("{} must not be empty", name)));
            }
        }
        Ok(())
    }
}

/// What the audio side should do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlarmAction {
    /// Speak `phrase` now and every `interval` until stopped
    StartRepeating { phrase: String, interval: Duration },
    /// Stop the repeating alarm
    StopRepeating,
    /// Speak once
    Speak(String),
}

/// Counts of alarms raised during a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmStats {
    pub drowsiness_alarms: usize,
    pub yawn_announcements: usize,
    pub fatigue_warnings: usize,
}

/// Alarm manager: maps per-tick events to alarm actions
///
/// Tracks whether the repeating alarm is running so duplicate starts and stops
/// are never issued.
pub struct AlarmManager {
    /// Configuration
    config: AlarmConfig,
    /// Repeating alarm currently running
    repeating: bool,
    /// Alarms raised so far
    stats: AlarmStats,
}

impl AlarmManager {
    /// Create a new alarm manager
    pub fn new(config: AlarmConfig) -> Self {
        info!("Creating alarm manager with config: {:?}", config);
        Self {
            config,
            repeating: false,
            stats: AlarmStats::default(),
        }
    }

    /// Translate one tick's events into alarm actions
    pub fn handle_tick(&mut self, events: &[DmsEvent]) -> Vec<AlarmAction> {
        let fatigue = events.contains(&DmsEvent::FatigueWarning);
        let mut actions = Vec::new();

        for event in events {
            match event {
                DmsEvent::DrowsinessOnset => {
                    if self.repeating {
                        debug!("Drowsiness alarm already running");
                        continue;
                    }
                    self.repeating = true;
                    self.stats.drowsiness_alarms += 1;
                    info!("Starting drowsiness alarm");
                    actions.push(AlarmAction::StartRepeating {
                        phrase: self.config.drowsiness_phrase.clone(),
                        interval: Duration::from_millis(self.config.repeat_interval_ms),
                    });
                }
                DmsEvent::DrowsinessCleared => {
                    if let Some(action) = self.stop() {
                        actions.push(action);
                    }
                }
                DmsEvent::YawnDetected(count) => {
                    if fatigue {
                        debug!("Yawn #{} announced as fatigue warning", count);
                        continue;
                    }
                    self.stats.yawn_announcements += 1;
                    actions.push(AlarmAction::Speak(self.config.yawn_phrase.clone()));
                }
                DmsEvent::FatigueWarning => {
                    self.stats.fatigue_warnings += 1;
                    actions.push(AlarmAction::Speak(self.config.fatigue_phrase.clone()));
                }
                DmsEvent::NoFaceDetected => {}
            }
        }

        actions
    }

    /// Stop the repeating alarm if it is running (eyes reopened or run stopped)
    pub fn stop(&mut self) -> Option<AlarmAction> {
        if !self.repeating {
            return None;
        }
        self.repeating = false;
        info!("Stopping drowsiness alarm");
        Some(AlarmAction::StopRepeating)
    }

    pub fn is_repeating(&self) -> bool {
        self.repeating
    }

    pub fn stats(&self) -> AlarmStats {
        self.stats
    }
}

impl Default for AlarmManager {
    fn default() -> Self {
        Self::new(AlarmConfig::default())
    }
}
