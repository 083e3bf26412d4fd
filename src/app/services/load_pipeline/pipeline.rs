//! Single-load pipeline: read on a worker task, then parse

use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::outcome::{CancelStage, CancellationNotice, LoadOutcome};
use crate::app::services::line_source::{LineSource, ReadOutcome, read_lines};
use crate::app::services::record_parser::RecordParser;
use crate::{Error, Result};

/// Load and parse one source, honouring `cancel`
///
/// The read loop runs on its own tokio task so the caller's task stays free.
/// Once it returns, the token is checked again and parsing runs only if no
/// request arrived. Cancellation is an outcome, not an error: failures are
/// reserved for the source and for malformed lines under the abort policy.
pub async fn run_load(
    source: Arc<dyn LineSource>,
    parser: &RecordParser,
    cancel: &CancellationToken,
) -> Result<LoadOutcome> {
    let source_id = source.describe();
    info!("Loading stock prices from {}", source_id);

    let read_token = cancel.clone();
    let read_task =
        tokio::spawn(async move { read_lines(source.as_ref(), &read_token).await });

    let lines = match read_task
        .await
        .map_err(|e| Error::session_aborted(format!("read task for {}: {}", source_id, e)))??
    {
        ReadOutcome::Cancelled { lines } => {
            return Ok(cancelled(lines.len(), CancelStage::Reading));
        }
        ReadOutcome::Complete { lines } => lines,
    };

    if cancel.is_cancelled() {
        debug!("Cancellation observed after reading {} lines", lines.len());
        return Ok(cancelled(lines.len(), CancelStage::BeforeParse));
    }

    let result = parser.parse(&lines)?;
    info!(
        "Loaded {} records from {}",
        result.records.len(),
        source_id
    );
    Ok(LoadOutcome::Completed(result))
}

fn cancelled(lines_read: usize, stage: CancelStage) -> LoadOutcome {
    LoadOutcome::Cancelled(CancellationNotice { lines_read, stage })
}
