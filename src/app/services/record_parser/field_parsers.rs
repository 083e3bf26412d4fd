//! Field parsing utilities for price lines
//!
//! This module provides helper functions for splitting a line into fields and
//! converting individual fields to typed values with invariant conventions:
//! `.` is the only decimal separator and dates use a fixed English AM/PM form.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::constants::{FIELD_DELIMITER, QUOTE_CHARS, TRADE_DATE_FORMAT};

/// Why a single line could not become a record
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LineError {
    #[error("expected at least {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("ticker is empty")]
    EmptyTicker,

    #[error("invalid trade date '{value}' (expected M/d/yyyy h:mm:ss AM|PM)")]
    InvalidDate { value: String },

    #[error("invalid integer for {field}: '{value}'")]
    InvalidInteger { field: &'static str, value: String },

    #[error("invalid decimal for {field}: '{value}'")]
    InvalidDecimal { field: &'static str, value: String },
}

/// Split a line on the delimiter and strip quoting from every field
pub fn split_fields(line: &str) -> Vec<&str> {
    line.split(FIELD_DELIMITER).map(trim_quotes).collect()
}

/// Strip `'` and `"` from both ends of a field
pub fn trim_quotes(field: &str) -> &str {
    field.trim_matches(QUOTE_CHARS)
}

/// Parse the ticker field; it must not be empty
pub fn parse_ticker(value: &str) -> Result<String, LineError> {
    if value.is_empty() {
        return Err(LineError::EmptyTicker);
    }
    Ok(value.to_string())
}

/// Parse a trade timestamp in `M/d/yyyy h:mm:ss AM|PM` form
///
/// chrono accepts any digit count for the year, minute and second, so the
/// component widths are checked before handing the value over.
pub fn parse_trade_date(value: &str) -> Result<NaiveDateTime, LineError> {
    let invalid = || LineError::InvalidDate {
        value: value.to_string(),
    };

    if !has_trade_date_shape(value) {
        return Err(invalid());
    }
    NaiveDateTime::parse_from_str(value, TRADE_DATE_FORMAT).map_err(|_| invalid())
}

/// `M/d/yyyy h:mm:ss tt`: 1-2 digit month, day and hour, 4 digit year,
/// 2 digit minute and second
fn has_trade_date_shape(value: &str) -> bool {
    let mut parts = value.split(' ');
    let (Some(date), Some(time), Some(_meridiem), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };

    digit_groups(date, '/', [1..=2, 1..=2, 4..=4]) && digit_groups(time, ':', [1..=2, 2..=2, 2..=2])
}

fn digit_groups(value: &str, separator: char, widths: [RangeInclusive<usize>; 3]) -> bool {
    let groups: Vec<&str> = value.split(separator).collect();
    groups.len() == widths.len()
        && groups.iter().zip(widths.iter()).all(|(group, width)| {
            width.contains(&group.len()) && group.bytes().all(|b| b.is_ascii_digit())
        })
}

/// Parse a non-negative integer, tolerating surrounding whitespace
pub fn parse_unsigned(field: &'static str, value: &str) -> Result<u64, LineError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| LineError::InvalidInteger {
            field,
            value: value.to_string(),
        })
}

/// Parse a signed decimal with `.` as the separator
///
/// Exponents, thousands separators and other locale forms are rejected even
/// where the decimal library itself would accept them.
pub fn parse_decimal(field: &'static str, value: &str) -> Result<Decimal, LineError> {
    let invalid = || LineError::InvalidDecimal {
        field,
        value: value.to_string(),
    };

    let trimmed = value.trim();
    if !is_plain_decimal(trimmed) {
        return Err(invalid());
    }

    Decimal::from_str(trimmed).map_err(|_| invalid())
}

/// Optional sign, digits, at most one `.`, at least one digit
fn is_plain_decimal(value: &str) -> bool {
    let unsigned = value
        .strip_prefix('-')
        .or_else(|| value.strip_prefix('+'))
        .unwrap_or(value);

    let mut digits = 0usize;
    let mut points = 0usize;
    for c in unsigned.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => points += 1,
            _ => return false,
        }
    }

    digits > 0 && points <= 1
}
