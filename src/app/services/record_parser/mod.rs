//! Stock price record parser
//!
//! Turns the raw lines produced by the line source into validated
//! [`StockPrice`](crate::StockPrice) records. The first line is a header and is
//! never parsed; every other line must carry the full positional layout.
//!
//! ## Architecture
//!
//! - [`parser`] - orchestration over a line sequence, malformed-line policy, ticker post-filter
//! - [`line_parser`] - conversion of one line into one record
//! - [`field_parsers`] - tokenizing, quote trimming and typed field conversion
//! - [`stats`] - parsing statistics and result structures
//!
//! ## Usage
//!
//! ```rust
//! use stockprice_loader::app::services::record_parser::RecordParser;
//!
//! let lines = vec![
//!     "Ticker,TradeDate,Open,High,Low,Close,Volume,Change,ChangePercent".to_string(),
//!     r#""AAPL","1/2/2020 9:30:00 AM",0,0,0,0,"1000","1.23","0.45""#.to_string(),
//! ];
//!
//! let result = RecordParser::new().parse(&lines).unwrap();
//! assert_eq!(result.records.len(), 1);
//! assert_eq!(result.records[0].volume, 1000);
//! ```

pub mod field_parsers;
pub mod line_parser;
pub mod parser;
pub mod stats;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use field_parsers::LineError;
pub use line_parser::parse_price_line;
pub use parser::RecordParser;
pub use stats::{LineRejection, ParseResult, ParseStats};
