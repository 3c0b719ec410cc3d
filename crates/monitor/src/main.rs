//! Drowsiness Monitor - Main Entry Point
//!
//! Usage: `drowsiness-monitor [config.toml]`

use std::path::PathBuf;

use alerting::LogSpeaker;
use monitor::{init_logging, run, MonitorConfig, TraceReader};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = MonitorConfig::load(config_path.as_deref())?;
    init_logging(&config.log_level)?;

    info!("=== Drowsiness Monitor v{} ===", env!("CARGO_PKG_VERSION"));
    info!("Replaying landmark trace {}", config.trace_path.display());

    let mut source = TraceReader::open(&config.trace_path).await?;
    let outcome = run(&config, &mut source, LogSpeaker).await?;

    info!("PERCLOS over run: {:.1}%", outcome.perclos * 100.0);
    if let Some(path) = outcome.report_path {
        info!("All data saved to {}", path.display());
    }

    Ok(())
}
