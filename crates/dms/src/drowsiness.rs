//! Eye-closure debounce over the EAR stream

use tracing::{debug, info};

use crate::analysis::DmsEvent;
use crate::state::DrowsinessState;

/// Raises an onset after `consec_frames` consecutive low-EAR ticks and a clear
/// on the first tick back above threshold
#[derive(Debug, Clone)]
pub struct DrowsinessDetector {
    ear_threshold: f64,
    consec_frames: u32,
    state: DrowsinessState,
}

impl DrowsinessDetector {
    pub fn new(ear_threshold: f64, consec_frames: u32) -> Self {
        Self {
            ear_threshold,
            consec_frames,
            state: DrowsinessState::default(),
        }
    }

    pub fn state(&self) -> &DrowsinessState {
        &self.state
    }

    /// Feed one EAR sample
    pub fn update(&mut self, ear: f64) -> Option<DmsEvent> {
        if ear < self.ear_threshold {
            self.state.consecutive_low_frames = self.state.consecutive_low_frames.saturating_add(1);
            if self.state.consecutive_low_frames >= self.consec_frames && !self.state.alarm_active {
                self.state.alarm_active = true;
                info!(
                    "Drowsiness onset after {} frames (EAR {:.3})",
                    self.state.consecutive_low_frames, ear
                );
                return Some(DmsEvent::DrowsinessOnset);
            }
            None
        } else {
            let was_active = self.state.alarm_active;
            if self.state.consecutive_low_frames > 0 && !was_active {
                debug!(
                    "Eye closure of {} frames below debounce window",
                    self.state.consecutive_low_frames
                );
            }
            self.state.reset();
            if was_active {
                info!("Drowsiness cleared (EAR {:.3})", ear);
                Some(DmsEvent::DrowsinessCleared)
            } else {
                None
            }
        }
    }

    pub fn reset(&mut self) {
        self.state.reset();
    }
}
