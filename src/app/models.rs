//! Data models for stock price loading
//!
//! This module contains the validated record type produced by the parser and
//! the small value types that steer parsing (ticker filters and the policy for
//! malformed lines).

use crate::app::services::record_parser::LineError;
use crate::constants::{self, fields};
use crate::{Error, Result};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Stock Price Record
// =============================================================================

/// One fully validated stock price entry
///
/// A record is either built completely from a well-formed line or not at all;
/// there is no partially populated state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockPrice {
    /// Instrument symbol, never empty
    pub ticker: String,

    /// Trade timestamp as written by the producer (no zone information)
    pub trade_date: NaiveDateTime,

    /// Shares traded
    pub volume: u64,

    /// Absolute price delta
    pub change: Decimal,

    /// Percentage price delta
    pub change_percent: Decimal,
}

impl StockPrice {
    /// Create a new validated record
    pub fn new(
        ticker: impl Into<String>,
        trade_date: NaiveDateTime,
        volume: u64,
        change: Decimal,
        change_percent: Decimal,
    ) -> std::result::Result<Self, LineError> {
        let ticker = ticker.into();
        if ticker.is_empty() {
            return Err(LineError::EmptyTicker);
        }

        Ok(Self {
            ticker,
            trade_date,
            volume,
            change,
            change_percent,
        })
    }

    /// Field values in upstream positional order, unquoted
    ///
    /// Fields 2..=5 are not retained by the parser and are filled with a
    /// placeholder so the row has the full positional layout.
    pub fn to_fields(&self) -> Vec<String> {
        let mut columns = vec![fields::UNUSED_PLACEHOLDER.to_string(); fields::MIN_FIELD_COUNT];
        columns[fields::TICKER] = self.ticker.clone();
        columns[fields::TRADE_DATE] = self.formatted_trade_date();
        columns[fields::VOLUME] = self.volume.to_string();
        columns[fields::CHANGE] = self.change.to_string();
        columns[fields::CHANGE_PERCENT] = self.change_percent.to_string();
        columns
    }

    /// Render the record in the upstream delimited format
    ///
    /// Retained fields are double-quoted the way the producer writes them.
    pub fn to_delimited_line(&self) -> String {
        self.to_fields()
            .into_iter()
            .enumerate()
            .map(|(index, value)| match index {
                fields::TICKER | fields::TRADE_DATE | fields::VOLUME | fields::CHANGE
                | fields::CHANGE_PERCENT => format!("\"{}\"", value),
                _ => value,
            })
            .collect::<Vec<_>>()
            .join(&constants::FIELD_DELIMITER.to_string())
    }

    /// Trade date in the producer's `M/d/yyyy h:mm:ss tt` form
    pub fn formatted_trade_date(&self) -> String {
        self.trade_date
            .format("%-m/%-d/%Y %-I:%M:%S %p")
            .to_string()
    }
}

impl fmt::Display for StockPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} vol={} chg={} ({}%)",
            self.ticker,
            self.trade_date.format("%Y-%m-%d %H:%M:%S"),
            self.volume,
            self.change,
            self.change_percent
        )
    }
}

// =============================================================================
// Ticker Filter
// =============================================================================

/// Restricts parsed output to one or more instruments
///
/// Matching is ASCII case-insensitive; symbols are stored upper-cased.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerFilter {
    tickers: Vec<String>,
}

impl TickerFilter {
    /// Build a filter from symbols, ignoring blanks
    pub fn new<I, S>(tickers: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for ticker in tickers {
            let ticker = ticker.as_ref().trim().to_ascii_uppercase();
            if !ticker.is_empty() && !normalized.contains(&ticker) {
                normalized.push(ticker);
            }
        }

        if normalized.is_empty() {
            return Err(Error::configuration("Ticker filter cannot be empty"));
        }

        Ok(Self {
            tickers: normalized,
        })
    }

    /// Check whether a parsed ticker passes the filter
    pub fn matches(&self, ticker: &str) -> bool {
        self.tickers.iter().any(|t| t.eq_ignore_ascii_case(ticker))
    }

    /// Symbols accepted by this filter
    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }
}

impl FromStr for TickerFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s.split(','))
    }
}

impl fmt::Display for TickerFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tickers.join(","))
    }
}

// =============================================================================
// Malformed Line Policy
// =============================================================================

/// What the parser does when a data line cannot be converted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedLinePolicy {
    /// Fail the whole parse on the first malformed line
    #[default]
    Abort,
    /// Exclude the line, record the rejection and keep going
    Skip,
}

impl FromStr for MalformedLinePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "skip" => Ok(Self::Skip),
            other => Err(Error::configuration(format!(
                "Unknown malformed-line policy '{}' (expected 'abort' or 'skip')",
                other
            ))),
        }
    }
}

impl fmt::Display for MalformedLinePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Abort => write!(f, "abort"),
            Self::Skip => write!(f, "skip"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn sample_date() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 1, 2)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_stock_price_rejects_empty_ticker() {
        let result = StockPrice::new("", sample_date(), 10, dec!(1), dec!(1));
        assert_eq!(result.unwrap_err(), LineError::EmptyTicker);
    }

    #[test]
    fn test_to_delimited_line_layout() {
        let price = StockPrice::new("AAPL", sample_date(), 1000, dec!(1.23), dec!(-0.45)).unwrap();
        assert_eq!(
            price.to_delimited_line(),
            r#""AAPL","1/2/2020 9:30:00 AM",0,0,0,0,"1000","1.23","-0.45""#
        );
    }

    #[test]
    fn test_formatted_trade_date_afternoon() {
        let date = NaiveDate::from_ymd_opt(2019, 12, 31)
            .unwrap()
            .and_hms_opt(16, 5, 9)
            .unwrap();
        let price = StockPrice::new("MSFT", date, 1, dec!(0), dec!(0)).unwrap();
        assert_eq!(price.formatted_trade_date(), "12/31/2019 4:05:09 PM");
    }

    #[test]
    fn test_serde_json_shape() {
        let price = StockPrice::new("AAPL", sample_date(), 1000, dec!(1.23), dec!(0.45)).unwrap();
        let json = serde_json::to_value(&price).unwrap();
        assert_eq!(json["ticker"], "AAPL");
        assert_eq!(json["trade_date"], "2020-01-02T09:30:00");
        assert_eq!(json["volume"], 1000);

        let back: StockPrice = serde_json::from_value(json).unwrap();
        assert_eq!(back, price);
    }

    #[test]
    fn test_ticker_filter_parsing() {
        let filter = TickerFilter::from_str(" aapl , MSFT,,").unwrap();
        assert_eq!(filter.tickers(), &["AAPL".to_string(), "MSFT".to_string()]);
        assert!(filter.matches("AAPL"));
        assert!(filter.matches("msft"));
        assert!(!filter.matches("GOOG"));
        assert_eq!(filter.to_string(), "AAPL,MSFT");

        assert!(TickerFilter::from_str("").is_err());
        assert!(TickerFilter::from_str(" , ,").is_err());
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!(
            MalformedLinePolicy::from_str("Abort").unwrap(),
            MalformedLinePolicy::Abort
        );
        assert_eq!(
            MalformedLinePolicy::from_str("skip").unwrap(),
            MalformedLinePolicy::Skip
        );
        assert!(MalformedLinePolicy::from_str("ignore").is_err());
        assert_eq!(MalformedLinePolicy::default(), MalformedLinePolicy::Abort);
    }
}
