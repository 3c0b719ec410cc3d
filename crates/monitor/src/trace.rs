//! Landmark trace replay
//!
//! One JSON object per line:
//! `{"t_ms": 33, "landmarks": {"33": {"x": 412.0, "y": 230.5}, ...}}`.
//! A missing or `null` `landmarks` field means no face was found in that frame.

use std::future::Future;
use std::path::Path;

use dms::LandmarkSnapshot;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

use crate::MonitorError;

/// One frame's landmark output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceFrame {
    /// Milliseconds since the start of the run
    pub t_ms: u64,
    #[serde(default)]
    pub landmarks: Option<LandmarkSnapshot>,
}

/// Supplies one frame per tick
pub trait LandmarkSource {
    /// `Ok(None)` once the source is exhausted
    fn next_frame(
        &mut self,
    ) -> impl Future<Output = Result<Option<TraceFrame>, MonitorError>> + Send;
}

/// Reads frames from a JSON-lines trace
pub struct TraceReader<R> {
    lines: Lines<R>,
    line_no: usize,
}

impl TraceReader<BufReader<tokio::fs::File>> {
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, MonitorError> {
        let file = tokio::fs::File::open(path.as_ref()).await?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: AsyncBufRead + Unpin> TraceReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }
}

impl<R: AsyncBufRead + Unpin + Send> LandmarkSource for TraceReader<R> {
    async fn next_frame(&mut self) -> Result<Option<TraceFrame>, MonitorError> {
        while let Some(line) = self.lines.next_line().await? {
            self.line_no += 1;
            if line.trim().is_empty() {
                continue;
            }
            let frame = serde_json::from_str(&line).map_err(|source| MonitorError::Trace {
                line: self.line_no,
                source,
            })?;
            return Ok(Some(frame));
        }
        Ok(None)
    }
}
