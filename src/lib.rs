//! Stock Price Loader Library
//!
//! A Rust library for loading stock price series from delimited text sources
//! into validated, strongly-typed records with cooperative cancellation.
//!
//! This library provides tools for:
//! - Reading raw lines from files, in-memory buffers or already-open streams
//! - Checking a cancellation token between line reads so long loads can be abandoned
//! - Parsing quoted, comma-separated price lines into [`StockPrice`] records
//! - Orchestrating load sessions with start/cancel toggle semantics
//! - Layered configuration and structured logging for the command-line front end

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod line_source;
        pub mod load_pipeline;
        pub mod record_parser;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{MalformedLinePolicy, StockPrice, TickerFilter};
pub use app::services::line_source::{LineSource, ReadOutcome, SourceDescriptor, read_lines};
pub use app::services::load_pipeline::{
    CancelHandle, CancellationNotice, LoadHandle, LoadOutcome, SessionState, StockLoader,
    TriggerResponse, run_load,
};
pub use app::services::record_parser::{LineError, ParseResult, ParseStats, RecordParser};
pub use config::Config;

/// Result type alias for the stock price loader
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for stock price loading operations
///
/// Cancellation is deliberately absent: a cancelled load is reported as
/// [`LoadOutcome::Cancelled`], not as an error.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The source could not be opened at all
    #[error("Source unavailable: {source_id}: {message}")]
    SourceUnavailable {
        source_id: String,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// I/O failed after the source was opened; lines read so far are discarded
    #[error("Read failure in {source_id} after {lines_read} lines")]
    ReadFailure {
        source_id: String,
        lines_read: usize,
        #[source]
        source: std::io::Error,
    },

    /// A data line could not be converted into a record
    #[error("Malformed line {line_number}: {reason} (line: {line:?})")]
    MalformedLine {
        line_number: usize,
        line: String,
        #[source]
        reason: LineError,
    },

    /// The source descriptor names something this crate cannot read
    #[error("Unsupported source '{descriptor}': {message}")]
    UnsupportedSource { descriptor: String, message: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// I/O operation failed outside of source reading
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// A pipeline task panicked or was aborted before producing an outcome
    #[error("Load session aborted: {reason}")]
    SessionAborted { reason: String },
}

impl Error {
    /// Create a source unavailable error from an I/O failure
    pub fn source_unavailable(source_id: impl Into<String>, source: std::io::Error) -> Self {
        Self::SourceUnavailable {
            source_id: source_id.into(),
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Create a source unavailable error without an underlying I/O error
    pub fn source_unavailable_msg(
        source_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::SourceUnavailable {
            source_id: source_id.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a read failure error
    pub fn read_failure(
        source_id: impl Into<String>,
        lines_read: usize,
        source: std::io::Error,
    ) -> Self {
        Self::ReadFailure {
            source_id: source_id.into(),
            lines_read,
            source,
        }
    }

    /// Create a malformed line error
    pub fn malformed_line(line_number: usize, line: impl Into<String>, reason: LineError) -> Self {
        Self::MalformedLine {
            line_number,
            line: line.into(),
            reason,
        }
    }

    /// Create an unsupported source error
    pub fn unsupported_source(descriptor: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UnsupportedSource {
            descriptor: descriptor.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a session aborted error
    pub fn session_aborted(reason: impl Into<String>) -> Self {
        Self::SessionAborted {
            reason: reason.into(),
        }
    }

    /// True for failures of the source itself (open or mid-stream)
    pub fn is_source_error(&self) -> bool {
        matches!(
            self,
            Error::SourceUnavailable { .. } | Error::ReadFailure { .. }
        )
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}
