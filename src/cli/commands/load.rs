//! Load command implementation
//!
//! Resolves the configured source, runs one load session and prints the
//! records. Ctrl+C cancels the session; nothing is printed for a cancelled
//! load except the notice.

use super::output::{render_cancellation, render_records};
use super::shared::{
    CommandReport, CommandStatus, drive_session, load_configuration, output_error, setup_logging,
};
use crate::Result;
use crate::app::services::load_pipeline::{LoadOutcome, StockLoader};
use crate::cli::args::LoadArgs;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Load command runner
pub async fn run_load(args: LoadArgs, shutdown: CancellationToken) -> Result<CommandReport> {
    let start_time = Instant::now();

    args.validate()?;
    let mut config = load_configuration(&args.common)?;
    if let Some(policy) = args.on_malformed {
        config.parsing.on_malformed = policy;
    }

    setup_logging(&config.logging.level, args.common.quiet);
    debug!("Load arguments: {:?}", args);
    info!(
        "Loading from {} (malformed lines: {})",
        config.source.descriptor, config.parsing.on_malformed
    );

    let source = config.source_descriptor()?.into_source();
    let source_id = source.describe();
    let loader = StockLoader::new(config.record_parser()?);

    let outcome = drive_session(&loader, source, &shutdown, args.common.show_progress()).await?;

    let mut report = CommandReport::default();
    match outcome {
        LoadOutcome::Completed(result) => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            render_records(
                &mut out,
                args.common.output_format,
                &source_id,
                &result.records,
                &result.stats,
                args.limit,
            )
            .map_err(output_error)?;

            report.records_delivered = result.records.len();
            report.lines_rejected = result.stats.lines_rejected;
        }
        LoadOutcome::Cancelled(notice) => {
            let stderr = std::io::stderr();
            let mut err = stderr.lock();
            render_cancellation(&mut err, &notice).map_err(output_error)?;
            report.status = CommandStatus::Cancelled;
        }
    }

    report.processing_time = start_time.elapsed();
    info!(
        "Load finished in {:.2}s",
        report.processing_time.as_secs_f64()
    );
    Ok(report)
}
