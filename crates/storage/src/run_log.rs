//! Run log: timestamped, human-readable lines for one monitoring run

use std::fmt;

use chrono::{DateTime, Local};
use dms::DmsEvent;
use serde::Serialize;
use tracing::debug;

const DROWSINESS_DETECTED: &str = "Drowsiness Detected";

/// One log line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.timestamp.format("%H:%M:%S"), self.message)
    }
}

/// Log for a monitoring run (in-memory, unbounded)
#[derive(Debug, Clone, Default)]
pub struct RunLog {
    entries: Vec<LogEntry>,
}

impl RunLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message stamped with the current local time
    pub fn log(&mut self, message: impl Into<String>) {
        self.log_at(Local::now(), message);
    }

    pub fn log_at(&mut self, timestamp: DateTime<Local>, message: impl Into<String>) {
        let entry = LogEntry {
            timestamp,
            message: message.into(),
        };
        debug!("{}", entry);
        self.entries.push(entry);
    }

    /// Append one line per event
    pub fn record_events(&mut self, events: &[DmsEvent]) {
        self.record_events_at(Local::now(), events);
    }

    pub fn record_events_at(&mut self, timestamp: DateTime<Local>, events: &[DmsEvent]) {
        for event in events {
            let message = match event {
                DmsEvent::NoFaceDetected => "No face detected".to_string(),
                DmsEvent::DrowsinessOnset => DROWSINESS_DETECTED.to_string(),
                DmsEvent::DrowsinessCleared => "Drowsiness Cleared".to_string(),
                DmsEvent::YawnDetected(count) => format!("Yawn #{} Detected", count),
                DmsEvent::FatigueWarning => "Too many yawns, take a break!".to_string(),
            };
            self.log_at(timestamp, message);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drowsiness onsets still present in the log
    pub fn drowsiness_event_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.message.contains(DROWSINESS_DETECTED))
            .count()
    }

    /// All lines, newline-terminated
    pub fn render(&self) -> String {
        self.entries.iter().map(|e| format!("{}\n", e)).collect()
    }

    /// Clear the log (signal history lives in the session and is unaffected)
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 1, h, m, s).unwrap()
    }

    #[test]
    fn test_event_messages() {
        let mut log = RunLog::new();
        log.record_events_at(
            at(9, 15, 2),
            &[
                DmsEvent::DrowsinessOnset,
                DmsEvent::YawnDetected(5),
                DmsEvent::FatigueWarning,
            ],
        );
        log.record_events_at(at(9, 15, 3), &[DmsEvent::NoFaceDetected]);

        assert_eq!(
            log.render(),
            "[09:15:02] Drowsiness Detected\n\
             [09:15:02] Yawn #5 Detected\n\
             [09:15:02] Too many yawns, take a break!\n\
             [09:15:03] No face detected\n"
        );
    }

    #[test]
    fn test_drowsiness_count_and_clear() {
        let mut log = RunLog::new();
        log.log_at(at(8, 0, 0), "Detection started.");
        log.record_events_at(at(8, 0, 5), &[DmsEvent::DrowsinessOnset]);
        log.record_events_at(at(8, 0, 7), &[DmsEvent::DrowsinessCleared]);
        log.record_events_at(at(8, 1, 0), &[DmsEvent::DrowsinessOnset]);
        assert_eq!(log.drowsiness_event_count(), 2);
        assert_eq!(log.len(), 4);

        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.drowsiness_event_count(), 0);
    }
}
