//! Drowsiness Monitor
//!
//! Wires the DMS session to its collaborators: a landmark source, the spoken
//! alarm and the run log / report.

pub mod config;
pub mod trace;

pub use config::MonitorConfig;
pub use trace::{LandmarkSource, TraceFrame, TraceReader};

use std::path::PathBuf;
use std::time::Duration;

use alerting::{AlarmError, AlarmManager, AlarmPlayer, AlarmStats, Speaker};
use dms::{DmsError, DmsSession, SessionSummary};
use storage::{save_report, RunLog, RunReport, StorageError};
use thiserror::Error;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Monitor errors
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid trace line {line}: {source}")]
    Trace {
        line: usize,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Dms(#[from] DmsError),

    #[error(transparent)]
    Alarm(#[from] AlarmError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// What a finished run produced
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub summary: SessionSummary,
    pub perclos: f64,
    pub alarms: AlarmStats,
    pub report_path: Option<PathBuf>,
}

fn parse_log_level(level: &str) -> Option<Level> {
    level.trim().parse::<Level>().ok()
}

/// Initialize logging
///
/// An unrecognized level falls back to `INFO` and is reported once the
/// subscriber is installed.
pub fn init_logging(level: &str) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let parsed = parse_log_level(level);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(parsed.unwrap_or(Level::INFO))
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    if parsed.is_none() {
        warn!("Unknown log level {:?}, using INFO", level);
    }
    Ok(())
}

/// Run one detection session over `source` until it is exhausted
pub async fn run<L, S>(
    config: &MonitorConfig,
    source: &mut L,
    speaker: S,
) -> Result<RunOutcome, MonitorError>
where
    L: LandmarkSource,
    S: Speaker,
{
    let mut session = DmsSession::new(config.dms.clone())?;
    config.alarm.validate()?;
    let mut alarms = AlarmManager::new(config.alarm.clone());
    let mut player = AlarmPlayer::new(speaker);
    let mut log = RunLog::new();

    log.log("Detection started.");
    info!("Detection started");

    let clock = tokio::time::Instant::now();
    while let Some(frame) = source.next_frame().await? {
        let at = clock + Duration::from_millis(frame.t_ms);
        if config.realtime {
            tokio::time::sleep_until(at).await;
        }

        let analysis = match session.process_tick(frame.landmarks.as_ref(), at.into_std()) {
            Ok(analysis) => analysis,
            Err(e @ DmsError::OutOfOrderTick { .. }) => {
                warn!("Dropping frame at {} ms: {}", frame.t_ms, e);
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        if analysis.has_events() {
            if let Some(event) = analysis.most_urgent_event() {
                info!("t={} ms: {:?} ({} events)", frame.t_ms, event, analysis.events.len());
            }
        }
        log.record_events(&analysis.events);
        for action in alarms.handle_tick(&analysis.events) {
            player.apply(action).await?;
        }
    }

    if let Some(action) = alarms.stop() {
        player.apply(action).await?;
    }
    player.stop().await?;
    session.reset();
    log.log("Detection stopped.");

    let summary = session.summary();
    info!(
        "Detection stopped: {} ticks ({} without face), {} drowsiness episodes, {} yawns",
        summary.ticks, summary.no_face_ticks, summary.drowsiness_episodes, summary.yawn_count
    );

    let report_path = if config.save_report {
        let report = RunReport::new(&log, &session);
        Some(save_report(&config.log_dir, &report).await?)
    } else {
        None
    };

    Ok(RunOutcome {
        summary,
        perclos: session.perclos(),
        alarms: alarms.stats(),
        report_path,
    })
}
