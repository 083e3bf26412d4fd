//! Validate command implementation
//!
//! Parses the whole source with the skip policy and reports every line that
//! could not be converted. The command fails when any line was rejected.

use super::output::{render_cancellation, render_validation};
use super::shared::{
    CommandReport, CommandStatus, drive_session, load_configuration, output_error, setup_logging,
};
use crate::Result;
use crate::app::models::MalformedLinePolicy;
use crate::app::services::load_pipeline::{LoadOutcome, StockLoader};
use crate::cli::args::ValidateArgs;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Validate command runner
pub async fn run_validate(args: ValidateArgs, shutdown: CancellationToken) -> Result<CommandReport> {
    let start_time = Instant::now();

    args.validate()?;
    let config = load_configuration(&args.common)?.with_policy(MalformedLinePolicy::Skip);

    setup_logging(&config.logging.level, args.common.quiet);
    debug!("Validation arguments: {:?}", args);
    info!("Validating {}", config.source.descriptor);

    let source = config.source_descriptor()?.into_source();
    let source_id = source.describe();
    let loader = StockLoader::new(config.record_parser()?);

    let outcome = drive_session(&loader, source, &shutdown, args.common.show_progress()).await?;

    let mut report = CommandReport::default();
    match outcome {
        LoadOutcome::Completed(result) => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            render_validation(&mut out, args.common.output_format, &source_id, &result.stats)
                .map_err(output_error)?;

            report.records_delivered = result.records.len();
            report.lines_rejected = result.stats.lines_rejected;
            if !result.stats.is_clean() {
                warn!(
                    "{} of {} data lines rejected",
                    result.stats.lines_rejected, result.stats.total_lines
                );
                report.status = CommandStatus::Rejected;
            }
        }
        LoadOutcome::Cancelled(notice) => {
            let stderr = std::io::stderr();
            let mut err = stderr.lock();
            render_cancellation(&mut err, &notice).map_err(output_error)?;
            report.status = CommandStatus::Cancelled;
        }
    }

    report.processing_time = start_time.elapsed();
    Ok(report)
}
