//! Driver state tracking

use std::time::Instant;

use serde::{Deserialize, Serialize};

/// Coarse drowsiness phase derived from [`DrowsinessState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DrowsinessPhase {
    #[default]
    Awake,
    /// Eyes closed, debounce window not yet exhausted
    Pending,
    /// Alarm raised
    Alerting,
}

/// Eye-closure debounce state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DrowsinessState {
    /// Consecutive ticks with EAR below threshold
    pub consecutive_low_frames: u32,

    /// Onset emitted and not yet cleared
    pub alarm_active: bool,
}

impl DrowsinessState {
    pub fn phase(&self) -> DrowsinessPhase {
        if self.alarm_active {
            DrowsinessPhase::Alerting
        } else if self.consecutive_low_frames > 0 {
            DrowsinessPhase::Pending
        } else {
            DrowsinessPhase::Awake
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Mouth phase of the yawn hysteresis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MouthPhase {
    #[default]
    Closed,
    Open,
}

/// Yawn detector state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct YawnState {
    pub mouth_phase: MouthPhase,

    /// When the last counted yawn closed
    pub last_yawn_at: Option<Instant>,

    /// Yawns counted over the whole run
    pub yawn_count: u32,
}

impl YawnState {
    /// Clear the transient phase and cooldown, keeping `yawn_count`
    pub fn reset_transient(&mut self) {
        self.mouth_phase = MouthPhase::Closed;
        self.last_yawn_at = None;
    }
}

/// Append-only EAR / MAR series for the run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalHistory {
    pub ear: Vec<f64>,
    pub mar: Vec<f64>,
}

impl SignalHistory {
    pub fn push_ear(&mut self, value: f64) {
        self.ear.push(value);
    }

    pub fn push_mar(&mut self, value: f64) {
        self.mar.push(value);
    }

    /// PERCLOS: share of EAR samples below `ear_threshold`
    /// Higher PERCLOS indicates drowsiness
    pub fn perclos(&self, ear_threshold: f64) -> f64 {
        if self.ear.is_empty() {
            return 0.0;
        }

        let closed_count = self.ear.iter().filter(|&&v| v < ear_threshold).count();

        closed_count as f64 / self.ear.len() as f64
    }
}
