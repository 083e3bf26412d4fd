//! Shared components for CLI commands
//!
//! This module contains common types, utilities, and functions used by both
//! the load and validate commands.

use crate::app::services::line_source::LineSource;
use crate::app::services::load_pipeline::{LoadOutcome, SessionEvent, StockLoader, TriggerResponse};
use crate::cli::args::CommonArgs;
use crate::config::Config;
use crate::constants::{EXIT_CODE_CANCELLED, EXIT_CODE_REJECTED, LOG_TARGET};
use crate::{Error, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// How a command ended, independent of the records it produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CommandStatus {
    #[default]
    Success,
    /// The load was cancelled before delivery
    Cancelled,
    /// Validation found lines that cannot be parsed
    Rejected,
}

/// Summary returned by every command
#[derive(Debug, Clone, Default)]
pub struct CommandReport {
    pub status: CommandStatus,
    /// Records delivered after filtering
    pub records_delivered: usize,
    /// Lines rejected under the skip policy
    pub lines_rejected: usize,
    /// Total command time
    pub processing_time: Duration,
}

impl CommandReport {
    /// Process exit code for this report
    pub fn exit_code(&self) -> i32 {
        match self.status {
            CommandStatus::Success => 0,
            CommandStatus::Cancelled => EXIT_CODE_CANCELLED,
            CommandStatus::Rejected => EXIT_CODE_REJECTED,
        }
    }
}

/// Set up structured logging on stderr
///
/// `RUST_LOG` wins over `level` when set. A subscriber installed earlier in the
/// process is left in place.
pub fn setup_logging(level: &str, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}={}", LOG_TARGET, level)));

    let installed = if quiet {
        // Minimal logging for quiet mode
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        // Standard logging with timestamps
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    if installed.is_ok() {
        debug!("Logging initialized at level: {}", level);
    }
}

/// Load configuration using layered approach (file -> env -> args)
pub fn load_configuration(args: &CommonArgs) -> Result<Config> {
    let mut config = Config::load(args.config_file.as_deref())?;

    // Apply CLI argument overrides
    apply_cli_overrides(&mut config, args);

    // Final validation
    config.validate()?;

    Ok(config)
}

/// Apply CLI argument overrides to configuration
pub fn apply_cli_overrides(config: &mut Config, args: &CommonArgs) {
    if let Some(source) = &args.source {
        config.source.descriptor = source.clone();
    }
    if let Some(filter) = &args.tickers {
        config.parsing.tickers = filter.tickers().to_vec();
    }

    config.logging.level = args.get_log_level(&config.logging.level).to_string();
}

/// Run one session on `loader`, cancelling it when `shutdown` fires
///
/// The spinner follows the session's events so a pending cancellation is
/// visible while the in-flight line finishes.
pub async fn drive_session(
    loader: &StockLoader,
    source: Arc<dyn LineSource>,
    shutdown: &CancellationToken,
    show_progress: bool,
) -> Result<LoadOutcome> {
    let spinner = show_progress.then(|| create_spinner(&format!("Loading {}", source.describe())));
    let mut events = loader.subscribe();

    let handle = match loader.trigger(source, None).await {
        TriggerResponse::Started(handle) => handle,
        TriggerResponse::CancelledActive(session_id) => {
            return Err(Error::session_aborted(format!(
                "session {} was still loading",
                session_id
            )));
        }
    };

    let interrupt = {
        let loader = loader.clone();
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            shutdown.cancelled().await;
            if let Some(session_id) = loader.cancel_active().await {
                info!("Interrupt received, cancelling session {}", session_id);
            }
        })
    };

    let progress = spinner.clone().map(|pb| {
        tokio::spawn(async move {
            while let Ok(event) = events.recv().await {
                if let SessionEvent::CancellationRequested { .. } = event {
                    pb.set_message("Cancelling after the current line...");
                }
            }
        })
    });

    let outcome = handle.outcome().await;

    interrupt.abort();
    if let Some(task) = progress {
        task.abort();
    }
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    outcome
}

/// Create a spinner with the standard styling
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Convert a rendering failure into the library error type
pub fn output_error(error: anyhow::Error) -> Error {
    Error::io(
        "Failed to write output",
        std::io::Error::other(format!("{:#}", error)),
    )
}
