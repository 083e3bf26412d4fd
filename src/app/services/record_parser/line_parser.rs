//! Individual line parsing for price files
//!
//! This module maps the positional fields of one data line onto a
//! [`StockPrice`]. Fields 2..=5 are part of the producer's layout but are not
//! retained.

use super::field_parsers::{
    LineError, parse_decimal, parse_ticker, parse_trade_date, parse_unsigned, split_fields,
};
use crate::app::models::StockPrice;
use crate::constants::fields;

/// Parse a single data line into a record
pub fn parse_price_line(line: &str) -> Result<StockPrice, LineError> {
    let segments = split_fields(line);
    if segments.len() < fields::MIN_FIELD_COUNT {
        return Err(LineError::FieldCount {
            expected: fields::MIN_FIELD_COUNT,
            found: segments.len(),
        });
    }

    let ticker = parse_ticker(segments[fields::TICKER])?;
    let trade_date = parse_trade_date(segments[fields::TRADE_DATE])?;
    let volume = parse_unsigned("volume", segments[fields::VOLUME])?;
    let change = parse_decimal("change", segments[fields::CHANGE])?;
    let change_percent = parse_decimal("change_percent", segments[fields::CHANGE_PERCENT])?;

    StockPrice::new(ticker, trade_date, volume, change, change_percent)
}
