//! Cancellable load pipeline
//!
//! Glues the line source and the record parser together and adds session
//! management on top.
//!
//! ## Architecture
//!
//! - [`pipeline`] - [`run_load`], one read-then-parse pass against a caller-owned token
//! - [`session`] - [`CancelHandle`], [`LoadHandle`] and the controller's [`LoadSession`] slot
//! - [`controller`] - [`StockLoader`], the start/cancel toggle holding at most one session
//! - [`outcome`] - [`LoadOutcome`], [`CancellationNotice`], [`SessionState`], [`SessionEvent`]
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use stockprice_loader::app::services::line_source::MemorySource;
//! use stockprice_loader::app::services::load_pipeline::{StockLoader, TriggerResponse};
//! use stockprice_loader::RecordParser;
//!
//! # async fn example() -> stockprice_loader::Result<()> {
//! let loader = StockLoader::new(RecordParser::new());
//! let source = Arc::new(MemorySource::new(
//!     "fixture",
//!     "Ticker,TradeDate,Open,High,Low,Close,Volume,Change,ChangePercent\n\
//!      \"AAPL\",\"1/2/2020 9:30:00 AM\",0,0,0,0,\"1000\",\"1.23\",\"0.45\"\n",
//! ));
//!
//! if let TriggerResponse::Started(handle) = loader.trigger(source, None).await {
//!     let outcome = handle.outcome().await?;
//!     assert_eq!(outcome.records().map(|r| r.len()), Some(1));
//! }
//! # Ok(())
//! # }
//! ```

pub mod controller;
pub mod outcome;
pub mod pipeline;
pub mod session;

#[cfg(test)]
mod tests;

// Re-export main types for easy access
pub use controller::{StockLoader, TriggerResponse};
pub use outcome::{
    CancelStage, CancellationNotice, LoadOutcome, SessionEvent, SessionId, SessionState,
};
pub use pipeline::run_load;
pub use session::{CancelHandle, LoadHandle, LoadSession};
