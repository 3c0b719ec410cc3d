//! Storage Layer
//!
//! Keeps the human-readable run log and writes the run report on demand.

mod report;
mod run_log;

pub use report::{render_report, save_report, RunReport};
pub use run_log::RunLog;

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("No logs to save")]
    EmptyLog,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
