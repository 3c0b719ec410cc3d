//! Run report written when the operator saves logs

use std::path::{Path, PathBuf};

use chrono::Local;
use dms::DmsSession;
use tracing::info;

use crate::{RunLog, StorageError};

/// Snapshot of everything the report contains
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    pub log_text: String,
    pub ear: Vec<f64>,
    pub mar: Vec<f64>,
    pub yawn_count: u32,
    pub drowsiness_events: usize,
}

impl RunReport {
    pub fn new(log: &RunLog, session: &DmsSession) -> Self {
        Self {
            log_text: log.render(),
            ear: session.ear_history().to_vec(),
            mar: session.mar_history().to_vec(),
            yawn_count: session.yawn_count(),
            drowsiness_events: log.drowsiness_event_count(),
        }
    }
}

fn join_values(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the report text
pub fn render_report(report: &RunReport) -> String {
    let mut out = String::from("==== Detection Logs ====\n");
    out.push_str(&report.log_text);
    out.push_str("\n==== EAR Values ====\n");
    out.push_str(&join_values(&report.ear));
    out.push_str("\n\n==== MAR Values ====\n");
    out.push_str(&join_values(&report.mar));
    out.push_str("\n\n==== Summary ====\n");
    out.push_str(&format!("Total Yawns Detected: {}\n", report.yawn_count));
    out.push_str(&format!("Total Drowsiness Events: {}\n", report.drowsiness_events));
    out
}

/// Write the report to `dir/log-<timestamp>.txt` and return its path
pub async fn save_report(dir: impl AsRef<Path>, report: &RunReport) -> Result<PathBuf, StorageError> {
    if report.log_text.trim().is_empty() {
        return Err(StorageError::EmptyLog);
    }

    let dir = dir.as_ref();
    tokio::fs::create_dir_all(dir).await?;

    let filename = format!("log-{}.txt", Local::now().format("%Y-%m-%d_%H-%M-%S"));
    let path = dir.join(filename);
    tokio::fs::write(&path, render_report(report)).await?;

    info!("Run report saved to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> RunReport {
        RunReport {
            log_text: "[10:00:00] Detection started.\n[10:00:04] Yawn #1 Detected\n".into(),
            ear: vec![0.31, 0.12],
            mar: vec![0.2, 0.75],
            yawn_count: 1,
            drowsiness_events: 0,
        }
    }

    #[test]
    fn test_render_layout() {
        let text = render_report(&report());
        assert_eq!(
            text,
            "==== Detection Logs ====\n\
             [10:00:00] Detection started.\n\
             [10:00:04] Yawn #1 Detected\n\
             \n==== EAR Values ====\n\
             0.31\n0.12\
             \n\n==== MAR Values ====\n\
             0.2\n0.75\
             \n\n==== Summary ====\n\
             Total Yawns Detected: 1\n\
             Total Drowsiness Events: 0\n"
        );
    }

    #[tokio::test]
    async fn test_save_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("logs");

        let path = save_report(&logs, &report()).await.unwrap();
        assert!(path.starts_with(&logs));
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("log-") && name.ends_with(".txt"));

        let written = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(written, render_report(&report()));
    }

    #[tokio::test]
    async fn test_empty_log_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let empty = RunReport::default();
        assert!(matches!(
            save_report(dir.path(), &empty).await,
            Err(StorageError::EmptyLog)
        ));
    }
}
