//! Application constants for the stock price loader
//!
//! Wire-format details of the upstream price files, default values and
//! environment variable names used throughout the crate.

// =============================================================================
// Wire Format
// =============================================================================

/// Field delimiter used by the price files
pub const FIELD_DELIMITER: char = ',';

/// Characters stripped from both ends of every field
pub const QUOTE_CHARS: &[char] = &['\'', '"'];

/// Number of leading lines treated as header and never parsed
pub const HEADER_LINE_COUNT: usize = 1;

/// chrono equivalent of the invariant `M/d/yyyy h:mm:ss tt` pattern
pub const TRADE_DATE_FORMAT: &str = "%m/%d/%Y %I:%M:%S %p";

/// Positional layout of a price line
pub mod fields {
    pub const TICKER: usize = 0;
    pub const TRADE_DATE: usize = 1;
    pub const VOLUME: usize = 6;
    pub const CHANGE: usize = 7;
    pub const CHANGE_PERCENT: usize = 8;

    /// Minimum field count; anything after `CHANGE_PERCENT` is ignored
    pub const MIN_FIELD_COUNT: usize = CHANGE_PERCENT + 1;

    /// Placeholder written for fields 2..=5 when rendering a record back out
    pub const UNUSED_PLACEHOLDER: &str = "0";

    /// Header written when rendering records in the wire format
    pub const HEADER: &[&str] = &[
        "Ticker",
        "TradeDate",
        "Open",
        "High",
        "Low",
        "Close",
        "Volume",
        "Change",
        "ChangePercent",
    ];
}

// =============================================================================
// Defaults
// =============================================================================

/// Application name used for config directories and log filters
pub const APP_NAME: &str = "stockprice-loader";

/// Crate name used as the tracing filter target
pub const LOG_TARGET: &str = "stockprice_loader";

/// Source loaded when nothing else is configured
pub const DEFAULT_SOURCE: &str = "StockPrices_Small.csv";

/// Default log level when no verbosity flags are given
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Accepted log levels
pub const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Capacity of the session event broadcast channel
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Descriptor meaning "read standard input"
pub const STDIN_DESCRIPTOR: &str = "-";

/// Exit code used when a load was cancelled
pub const EXIT_CODE_CANCELLED: i32 = 130;

/// Exit code used by `validate` when at least one line was rejected
pub const EXIT_CODE_REJECTED: i32 = 2;

// =============================================================================
// Environment Variables
// =============================================================================

pub mod env {
    pub const SOURCE: &str = "STOCKPRICE_LOADER_SOURCE";
    pub const TICKERS: &str = "STOCKPRICE_LOADER_TICKERS";
    pub const ON_MALFORMED: &str = "STOCKPRICE_LOADER_ON_MALFORMED";
    pub const LOG_LEVEL: &str = "STOCKPRICE_LOADER_LOG_LEVEL";
}
