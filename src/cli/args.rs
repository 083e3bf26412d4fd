//! Command-line argument definitions for the stock price loader
//!
//! This module defines the complete CLI interface using clap derive API.

use crate::app::models::{MalformedLinePolicy, TickerFilter};
use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the stock price loader
///
/// Loads stock price series from delimited text files or stdin into validated
/// records, with Ctrl+C cancelling the load in progress.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "stockprice-loader",
    version,
    about = "Load and validate stock price series from delimited text files",
    long_about = "Reads a stock price file (header line followed by quoted, comma-separated \
                  rows of ticker, trade time, volume, change and change percent), converts \
                  every row into a typed record and prints the result. Ctrl+C cancels the \
                  load in progress without printing partial data."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Load a price file and print its records
    Load(LoadArgs),
    /// Check a price file and report every line that cannot be parsed
    Validate(ValidateArgs),
}

/// Options shared by every subcommand
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CommonArgs {
    /// Source to read: a file path, a file:// URI, or '-' for stdin
    ///
    /// Overrides the configured source. Defaults to StockPrices_Small.csv.
    #[arg(
        short = 's',
        long = "source",
        value_name = "SOURCE",
        help = "File path, file:// URI or '-' for stdin"
    )]
    pub source: Option<String>,

    /// Only keep these tickers (comma-separated, case-insensitive)
    ///
    /// Filtering happens after parsing, so malformed lines are still reported
    /// even when they belong to other tickers.
    #[arg(
        short = 't',
        long = "ticker",
        value_name = "LIST",
        help = "Comma-separated tickers to keep"
    )]
    pub tickers: Option<TickerFilter>,

    /// Path to configuration file
    ///
    /// TOML configuration file. If not specified, looks for
    /// <config dir>/stockprice-loader/config.toml
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Output format for results
    #[arg(
        long = "output-format",
        value_enum,
        default_value = "human",
        help = "Output format for results"
    )]
    pub output_format: OutputFormat,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    ///
    /// Only show errors. Overrides verbose settings and hides the spinner.
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Arguments for the load command
#[derive(Debug, Clone, Default, Parser)]
pub struct LoadArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// What to do with a line that cannot be parsed
    ///
    /// 'abort' fails the whole load on the first bad line, 'skip' drops the
    /// line and reports it in the statistics.
    #[arg(
        long = "on-malformed",
        value_name = "POLICY",
        help = "Malformed line policy: abort or skip"
    )]
    pub on_malformed: Option<MalformedLinePolicy>,

    /// Print at most this many records
    #[arg(
        short = 'n',
        long = "limit",
        value_name = "COUNT",
        help = "Print at most COUNT records"
    )]
    pub limit: Option<usize>,
}

/// Arguments for the validate command
#[derive(Debug, Clone, Default, Parser)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

/// Output format options for machine-readable results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    #[default]
    Human,
    /// JSON format for scripting
    Json,
    /// CSV format, readable by this tool again
    Csv,
}

impl CommonArgs {
    /// Validate the shared arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if let Some(config_file) = &self.config_file {
            if !config_file.exists() {
                return Err(Error::configuration(format!(
                    "Config file does not exist: {}",
                    config_file.display()
                )));
            }
        }

        if let Some(source) = &self.source {
            if source.trim().is_empty() {
                return Err(Error::configuration("Source cannot be empty"));
            }
        }

        Ok(())
    }

    /// Log level from `-v`/`-q`, falling back to `configured` without flags
    pub fn get_log_level<'a>(&self, configured: &'a str) -> &'a str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => configured,
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show the spinner (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

impl LoadArgs {
    pub fn validate(&self) -> Result<()> {
        self.common.validate()?;

        if self.limit == Some(0) {
            return Err(Error::configuration("Limit must be greater than 0"));
        }

        Ok(())
    }
}

impl ValidateArgs {
    pub fn validate(&self) -> Result<()> {
        self.common.validate()
    }
}
