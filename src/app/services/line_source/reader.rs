//! Cancellable line reading
//!
//! The token is polled before every line read, which covers both "before the
//! first line" and "after each completed line". A read already in flight is
//! never interrupted.

use tokio::io::AsyncBufReadExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

use super::sources::LineSource;
use crate::{Error, Result};

/// Lines collected by [`read_lines`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// The whole source was read
    Complete { lines: Vec<String> },
    /// The token fired; `lines` holds everything read before that point
    Cancelled { lines: Vec<String> },
}

impl ReadOutcome {
    pub fn lines(&self) -> &[String] {
        match self {
            ReadOutcome::Complete { lines } | ReadOutcome::Cancelled { lines } => lines,
        }
    }

    pub fn into_lines(self) -> Vec<String> {
        match self {
            ReadOutcome::Complete { lines } | ReadOutcome::Cancelled { lines } => lines,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ReadOutcome::Cancelled { .. })
    }
}

/// Read every line of `source`, stopping early if `cancel` fires
///
/// The opened stream lives only inside this function, so it is released on
/// every return path. A mid-stream I/O error discards the partial lines and
/// reports how many had been read.
pub async fn read_lines(source: &dyn LineSource, cancel: &CancellationToken) -> Result<ReadOutcome> {
    let source_id = source.describe();
    let reader = source.open().await?;
    let mut stream = reader.lines();
    let mut lines = Vec::new();

    loop {
        if cancel.is_cancelled() {
            info!(
                "Reading {} cancelled after {} lines",
                source_id,
                lines.len()
            );
            return Ok(ReadOutcome::Cancelled { lines });
        }

        match stream.next_line().await {
            Ok(Some(line)) => {
                trace!("Read line {} from {}", lines.len() + 1, source_id);
                lines.push(line);
            }
            Ok(None) => break,
            Err(e) => {
                debug!(
                    "Read failure in {} after {} lines: {}",
                    source_id,
                    lines.len(),
                    e
                );
                return Err(Error::read_failure(source_id, lines.len(), e));
            }
        }
    }

    debug!("Read {} lines from {}", lines.len(), source_id);
    Ok(ReadOutcome::Complete { lines })
}
