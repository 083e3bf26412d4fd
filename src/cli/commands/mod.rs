//! Command implementations for the stock price loader CLI
//!
//! This module contains the command execution logic, progress reporting and
//! output rendering for the CLI interface. Each command lives in its own module.

pub mod load;
pub mod output;
pub mod shared;
pub mod validate;

pub use shared::{CommandReport, CommandStatus};

use crate::cli::args::{Args, Commands};
use crate::{Error, Result};
use tokio_util::sync::CancellationToken;

/// Main command runner
///
/// Dispatches to the subcommand handler. `shutdown` is cancelled by the
/// binary on Ctrl+C and forwarded to the active load session.
pub async fn run(args: Args, shutdown: CancellationToken) -> Result<CommandReport> {
    match args.command {
        Some(Commands::Load(load_args)) => load::run_load(load_args, shutdown).await,
        Some(Commands::Validate(validate_args)) => {
            validate::run_validate(validate_args, shutdown).await
        }
        None => Err(Error::configuration("No command given")),
    }
}
