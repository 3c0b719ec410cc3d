//! Yawn counting over the MAR stream
//!
//! Two thresholds form a hysteresis band: the mouth opens above `mar_open` and
//! only closes again below `mar_close`. A yawn is counted when the mouth closes,
//! unless the previous counted yawn closed less than `cooldown` ago.

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::analysis::DmsEvent;
use crate::state::{MouthPhase, YawnState};

#[derive(Debug, Clone)]
pub struct YawnDetector {
    mar_open: f64,
    mar_close: f64,
    cooldown: Duration,
    fatigue_interval: u32,
    state: YawnState,
}

impl YawnDetector {
    pub fn new(mar_open: f64, mar_close: f64, cooldown: Duration, fatigue_interval: u32) -> Self {
        Self {
            mar_open,
            mar_close,
            cooldown,
            fatigue_interval,
            state: YawnState::default(),
        }
    }

    pub fn state(&self) -> &YawnState {
        &self.state
    }

    pub fn yawn_count(&self) -> u32 {
        self.state.yawn_count
    }

    /// Feed one MAR sample taken at `now`
    pub fn update(&mut self, mar: f64, now: Instant) -> Vec<DmsEvent> {
        match self.state.mouth_phase {
            MouthPhase::Closed if mar > self.mar_open => {
                debug!("Mouth opened (MAR {:.3})", mar);
                self.state.mouth_phase = MouthPhase::Open;
                Vec::new()
            }
            MouthPhase::Open if mar < self.mar_close => {
                self.state.mouth_phase = MouthPhase::Closed;
                self.complete_yawn(now)
            }
            _ => Vec::new(),
        }
    }

    fn complete_yawn(&mut self, now: Instant) -> Vec<DmsEvent> {
        if let Some(last) = self.state.last_yawn_at {
            let elapsed = now.saturating_duration_since(last);
            if elapsed <= self.cooldown {
                debug!("Yawn suppressed: {:?} since last yawn", elapsed);
                return Vec::new();
            }
        }

        self.state.yawn_count += 1;
        self.state.last_yawn_at = Some(now);
        info!("Yawn #{} detected", self.state.yawn_count);

        let mut events = vec![DmsEvent::YawnDetected(self.state.yawn_count)];
        if self.state.yawn_count % self.fatigue_interval == 0 {
            info!("Fatigue warning after {} yawns", self.state.yawn_count);
            events.push(DmsEvent::FatigueWarning);
        }
        events
    }

    /// Clear phase and cooldown; the run's yawn count survives
    pub fn reset(&mut self) {
        self.state.reset_transient();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn detector() -> YawnDetector {
        YawnDetector::new(0.6, 0.4, Duration::from_millis(1500), 5)
    }

    fn at(base: Instant, ms: u64) -> Instant {
        base + Duration::from_millis(ms)
    }

    /// Feed [0.3, 0.7, 0.7, 0.3] starting at `start_ms`, 100 ms apart
    fn yawn_cycle(d: &mut YawnDetector, base: Instant, start_ms: u64) -> Vec<Vec<DmsEvent>> {
        [0.3, 0.7, 0.7, 0.3]
            .iter()
            .enumerate()
            .map(|(i, &mar)| d.update(mar, at(base, start_ms + 100 * i as u64)))
            .collect()
    }

    #[test]
    fn test_single_yawn_cycle() {
        let base = Instant::now();
        let mut d = detector();

        assert!(d.update(0.3, at(base, 0)).is_empty());
        assert_eq!(d.state().mouth_phase, MouthPhase::Closed);
        assert!(d.update(0.7, at(base, 100)).is_empty());
        assert_eq!(d.state().mouth_phase, MouthPhase::Open);
        assert!(d.update(0.7, at(base, 200)).is_empty());
        assert_eq!(d.update(0.3, at(base, 300)), vec![DmsEvent::YawnDetected(1)]);
        assert_eq!(d.state().mouth_phase, MouthPhase::Closed);
    }

    #[test]
    fn test_cooldown_suppresses_then_allows() {
        let base = Instant::now();
        let mut d = detector();

        let first = yawn_cycle(&mut d, base, 0);
        assert_eq!(first[3], vec![DmsEvent::YawnDetected(1)]);

        // closes at 1100 ms, 800 ms after the counted yawn
        let second = yawn_cycle(&mut d, base, 800);
        assert!(second.iter().all(Vec::is_empty));
        assert_eq!(d.state().mouth_phase, MouthPhase::Closed);
        assert_eq!(d.state().last_yawn_at, Some(at(base, 300)));

        // closes at 3400 ms
        let third = yawn_cycle(&mut d, base, 3100);
        assert_eq!(third[3], vec![DmsEvent::YawnDetected(2)]);
    }

    #[test]
    fn test_suppressed_yawn_does_not_extend_cooldown() {
        let base = Instant::now();
        let mut d = detector();

        yawn_cycle(&mut d, base, 0); // counted at 300
        yawn_cycle(&mut d, base, 1000); // closes at 1300, suppressed
        // closes at 1900: 1600 ms after the counted yawn
        let events = yawn_cycle(&mut d, base, 1600);
        assert_eq!(events[3], vec![DmsEvent::YawnDetected(2)]);
    }

    #[test]
    fn test_cooldown_boundary_is_exclusive() {
        let base = Instant::now();
        let mut d = detector();
        yawn_cycle(&mut d, base, 0); // counted at 300
        d.update(0.7, at(base, 1700));
        assert!(d.update(0.3, at(base, 1800)).is_empty());
    }

    #[test]
    fn test_hysteresis_band_holds_phase() {
        let base = Instant::now();
        let mut d = detector();

        for (i, mar) in [0.5, 0.59, 0.6, 0.45].iter().enumerate() {
            assert!(d.update(*mar, at(base, i as u64 * 100)).is_empty());
            assert_eq!(d.state().mouth_phase, MouthPhase::Closed);
        }
        d.update(0.65, at(base, 400));
        for (i, mar) in [0.55, 0.4, 0.45, 0.61].iter().enumerate() {
            assert!(d.update(*mar, at(base, 500 + i as u64 * 100)).is_empty());
            assert_eq!(d.state().mouth_phase, MouthPhase::Open);
        }
    }

    #[test]
    fn test_reset_keeps_count() {
        let base = Instant::now();
        let mut d = detector();
        yawn_cycle(&mut d, base, 0);
        d.update(0.9, at(base, 500));
        d.reset();
        assert_eq!(d.state().mouth_phase, MouthPhase::Closed);
        assert_eq!(d.state().last_yawn_at, None);
        assert_eq!(d.yawn_count(), 1);
    }

    proptest! {
        #[test]
        fn prop_fatigue_only_on_multiples_of_five(cycles in 1usize..40) {
            let base = Instant::now();
            let mut d = detector();
            for n in 0..cycles {
                let events = yawn_cycle(&mut d, base, n as u64 * 2000);
                let count = (n + 1) as u32;
                let closing = &events[3];
                prop_assert_eq!(closing[0], DmsEvent::YawnDetected(count));
                let warned = closing.contains(&DmsEvent::FatigueWarning);
                prop_assert_eq!(warned, count % 5 == 0);
                prop_assert!(events[..3].iter().all(Vec::is_empty));
            }
        }
    }
}
