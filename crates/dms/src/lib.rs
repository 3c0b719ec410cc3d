//! Driver Monitoring System (DMS)
//!
//! Per-tick driver state analysis from facial landmarks:
//! - Eye aspect ratio (EAR) and mouth aspect ratio (MAR) extraction
//! - Drowsiness detection (debounced eye closure)
//! - Yawn counting (two-threshold hysteresis with cooldown)
//! - Fatigue warnings from repeated yawning
//!
//! The session only consumes landmark snapshots and emits events. Cameras,
//! landmark models, audio and log persistence live outside this crate.

pub mod analysis;
pub mod config;
pub mod drowsiness;
pub mod geometry;
pub mod landmarks;
pub mod signal;
pub mod state;
pub mod yawn;

pub use analysis::{DmsEvent, TickAnalysis};
pub use config::DmsConfig;
pub use drowsiness::DrowsinessDetector;
pub use geometry::{distance, Point2};
pub use landmarks::{EyePoints, LandmarkLayout, LandmarkSnapshot, MouthPoints};
pub use signal::{combined_ear, eye_aspect_ratio, mouth_aspect_ratio, SignalExtractor};
pub use state::{DrowsinessPhase, DrowsinessState, MouthPhase, SignalHistory, YawnState};
pub use yawn::YawnDetector;

use std::time::Instant;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// DMS error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DmsError {
    #[error("Degenerate landmark geometry for {0}")]
    DegenerateGeometry(&'static str),

    #[error("Landmark {0} missing from snapshot")]
    LandmarkMissing(u32),

    #[error("Tick at {now:?} is not after previous tick at {last:?}")]
    OutOfOrderTick { last: Instant, now: Instant },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Run-level counters for reporting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub ticks: u64,
    pub face_ticks: u64,
    pub no_face_ticks: u64,
    pub drowsiness_episodes: u32,
    pub yawn_count: u32,
}

/// Owns detector state and signal history for one monitoring run
///
/// Not internally synchronized: callers sharing a session across threads must
/// serialize access themselves.
#[derive(Debug, Clone)]
pub struct DmsSession {
    config: DmsConfig,
    extractor: SignalExtractor,
    drowsiness: DrowsinessDetector,
    yawn: YawnDetector,
    history: SignalHistory,
    summary: SessionSummary,
    last_tick: Option<Instant>,
}

impl DmsSession {
    /// Create a new session with configuration
    pub fn new(config: DmsConfig) -> Result<Self, DmsError> {
        config.validate()?;
        info!(
            "Creating DMS session (EAR < {} for {} frames, MAR {}/{}, cooldown {} ms)",
            config.ear_threshold,
            config.ear_consec_frames,
            config.mar_open,
            config.mar_close,
            config.yawn_cooldown_ms
        );
        Ok(Self {
            extractor: SignalExtractor::new(config.landmarks.clone()),
            drowsiness: DrowsinessDetector::new(config.ear_threshold, config.ear_consec_frames),
            yawn: YawnDetector::new(
                config.mar_open,
                config.mar_close,
                config.yawn_cooldown(),
                config.fatigue_yawn_interval,
            ),
            history: SignalHistory::default(),
            summary: SessionSummary::default(),
            last_tick: None,
            config,
        })
    }

    /// Analyze one tick. `None` means no face was found in this frame.
    ///
    /// Ticks must arrive with strictly increasing `now`; a late or duplicate
    /// tick is rejected before any state changes.
    pub fn process_tick(
        &mut self,
        snapshot: Option<&LandmarkSnapshot>,
        now: Instant,
    ) -> Result<TickAnalysis, DmsError> {
        if let Some(last) = self.last_tick {
            if now <= last {
                warn!("Rejecting out-of-order tick");
                return Err(DmsError::OutOfOrderTick { last, now });
            }
        }
        self.last_tick = Some(now);
        self.summary.ticks += 1;

        let Some(snapshot) = snapshot else {
            self.summary.no_face_ticks += 1;
            debug!("No face detected");
            return Ok(TickAnalysis::no_face());
        };
        self.summary.face_ticks += 1;

        let mut analysis = TickAnalysis {
            face_detected: true,
            ..Default::default()
        };

        match self.extractor.ear(snapshot) {
            Ok(ear) => {
                self.history.push_ear(ear);
                analysis.ear = Some(ear);
                if let Some(event) = self.drowsiness.update(ear) {
                    if event == DmsEvent::DrowsinessOnset {
                        self.summary.drowsiness_episodes += 1;
                    }
                    analysis.events.push(event);
                }
            }
            Err(e) => debug!("EAR skipped this tick: {}", e),
        }

        match self.extractor.mar(snapshot) {
            Ok(mar) => {
                self.history.push_mar(mar);
                analysis.mar = Some(mar);
                analysis.events.extend(self.yawn.update(mar, now));
            }
            Err(e) => debug!("MAR skipped this tick: {}", e),
        }

        self.summary.yawn_count = self.yawn.yawn_count();
        Ok(analysis)
    }

    /// Reset detector state between runs
    ///
    /// Clears the eye-closure counter, alarm flag, mouth phase, yawn cooldown
    /// and tick ordering. EAR/MAR history and the yawn count are kept for the
    /// run summary.
    pub fn reset(&mut self) {
        info!("Resetting DMS detector state");
        self.drowsiness.reset();
        self.yawn.reset();
        self.last_tick = None;
    }

    pub fn config(&self) -> &DmsConfig {
        &self.config
    }

    pub fn drowsiness_state(&self) -> &DrowsinessState {
        self.drowsiness.state()
    }

    pub fn yawn_state(&self) -> &YawnState {
        self.yawn.state()
    }

    pub fn yawn_count(&self) -> u32 {
        self.yawn.yawn_count()
    }

    pub fn history(&self) -> &SignalHistory {
        &self.history
    }

    pub fn ear_history(&self) -> &[f64] {
        &self.history.ear
    }

    pub fn mar_history(&self) -> &[f64] {
        &self.history.mar
    }

    /// Share of EAR samples below the closed-eye threshold
    pub fn perclos(&self) -> f64 {
        self.history.perclos(self.config.ear_threshold)
    }

    pub fn summary(&self) -> SessionSummary {
        self.summary
    }
}
