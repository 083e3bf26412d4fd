//! Line sources for stock price data
//!
//! This module turns "where the prices live" into an ordered stream of raw text
//! lines. The read loop is the only place the pipeline blocks on I/O, and it
//! checks the cancellation token between lines so a long read can be abandoned.
//!
//! ## Architecture
//!
//! - [`sources`] - the [`LineSource`] capability and its file, memory and stream implementations
//! - [`descriptor`] - parsing user-supplied source strings into concrete sources
//! - [`reader`] - the cancellable [`read_lines`] loop and its [`ReadOutcome`]
//!
//! ## Usage
//!
//! ```rust
//! use stockprice_loader::app::services::line_source::{MemorySource, read_lines};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> stockprice_loader::Result<()> {
//! let source = MemorySource::new("fixture", "Ticker,TradeDate\nAAPL,1/2/2020 9:30:00 AM\n");
//! let outcome = read_lines(&source, &CancellationToken::new()).await?;
//!
//! assert!(!outcome.is_cancelled());
//! assert_eq!(outcome.lines().len(), 2);
//! # Ok(())
//! # }
//! ```

pub mod descriptor;
pub mod reader;
pub mod sources;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use descriptor::SourceDescriptor;
pub use reader::{ReadOutcome, read_lines};
pub use sources::{FileSource, LineReader, LineSource, MemorySource, StreamSource};
