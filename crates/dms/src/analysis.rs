//! Per-tick analysis results and events

use serde::{Deserialize, Serialize};

/// Events raised by the detectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DmsEvent {
    /// No face in this tick; detector state left untouched
    NoFaceDetected,

    /// Eyes closed for the full debounce window
    DrowsinessOnset,

    /// Eyes reopened after an onset
    DrowsinessCleared,

    /// Completed yawn, carrying the run's yawn count
    YawnDetected(u32),

    /// Yawn count reached a multiple of the fatigue interval
    FatigueWarning,
}

impl DmsEvent {
    fn urgency(&self) -> u8 {
        match self {
            DmsEvent::DrowsinessOnset => 4,
            DmsEvent::FatigueWarning => 3,
            DmsEvent::YawnDetected(_) => 2,
            DmsEvent::DrowsinessCleared => 1,
            DmsEvent::NoFaceDetected => 0,
        }
    }
}

/// Result of one `process_tick` call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickAnalysis {
    /// Whether a landmark snapshot was supplied
    pub face_detected: bool,

    /// Events in emission order: drowsiness first, then yawn
    pub events: Vec<DmsEvent>,

    /// Combined EAR, if computable this tick
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ear: Option<f64>,

    /// MAR, if computable this tick
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mar: Option<f64>,
}

impl TickAnalysis {
    pub(crate) fn no_face() -> Self {
        Self {
            face_detected: false,
            events: vec![DmsEvent::NoFaceDetected],
            ear: None,
            mar: None,
        }
    }

    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }

    pub fn contains(&self, event: DmsEvent) -> bool {
        self.events.contains(&event)
    }

    /// Get the event a driver should hear about first
    pub fn most_urgent_event(&self) -> Option<DmsEvent> {
        self.events.iter().copied().max_by_key(DmsEvent::urgency)
    }
}
