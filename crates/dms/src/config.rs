//! DMS configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::landmarks::LandmarkLayout;
use crate::DmsError;

/// DMS configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DmsConfig {
    /// EAR below this counts as a closed-eye frame
    pub ear_threshold: f64,

    /// Consecutive closed-eye frames before a drowsiness alert
    pub ear_consec_frames: u32,

    /// MAR above this opens the mouth phase
    pub mar_open: f64,

    /// MAR below this closes the mouth phase (must be < `mar_open`)
    pub mar_close: f64,

    /// Minimum time between two counted yawns (milliseconds)
    pub yawn_cooldown_ms: u64,

    /// Every n-th yawn also raises a fatigue warning
    pub fatigue_yawn_interval: u32,

    /// Landmark indices for eyes and mouth
    pub landmarks: LandmarkLayout,
}

impl Default for DmsConfig {
    fn default() -> Self {
        Self {
            ear_threshold: 0.20,
            ear_consec_frames: 30,
            mar_open: 0.6,
            mar_close: 0.4,
            yawn_cooldown_ms: 1500,
            fatigue_yawn_interval: 5,
            landmarks: LandmarkLayout::default(),
        }
    }
}

impl DmsConfig {
    /// Create strict config (alerts sooner)
    pub fn strict() -> Self {
        Self {
            ear_consec_frames: 20,
            fatigue_yawn_interval: 3,
            ..Default::default()
        }
    }

    /// Create lenient config (alerts later)
    pub fn lenient() -> Self {
        Self {
            ear_consec_frames: 45,
            fatigue_yawn_interval: 8,
            ..Default::default()
        }
    }

    pub fn yawn_cooldown(&self) -> Duration {
        Duration::from_millis(self.yawn_cooldown_ms)
    }

    /// Reject threshold combinations the detectors cannot work with
    pub fn validate(&self) -> Result<(), DmsError> {
        if !(self.ear_threshold.is_finite() && self.ear_threshold > 0.0) {
            return Err(DmsError::Config(format!(
                "ear_threshold must be positive, got {}",
                self.ear_threshold
            )));
        }
        if self.ear_consec_frames == 0 {
            return Err(DmsError::Config("ear_consec_frames must be at least 1".into()));
        }
        if !(self.mar_close.is_finite() && self.mar_open.is_finite()) {
            return Err(DmsError::Config("MAR thresholds must be finite".into()));
        }
        if self.mar_open <= self.mar_close {
            return Err(DmsError::Config(format!(
                "mar_open ({}) must be greater than mar_close ({})",
                self.mar_open, self.mar_close
            )));
        }
        if self.fatigue_yawn_interval == 0 {
            return Err(DmsError::Config("fatigue_yawn_interval must be at least 1".into()));
        }
        Ok(())
    }
}
