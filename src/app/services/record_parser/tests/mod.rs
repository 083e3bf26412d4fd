//! Test utilities for record parser testing

use chrono::{NaiveDate, NaiveDateTime};

mod parser_tests;

pub const HEADER: &str = "Ticker,TradeDate,Open,High,Low,Close,Volume,Change,ChangePercent";

/// Header followed by the given data lines
pub fn with_header(data: &[&str]) -> Vec<String> {
    std::iter::once(HEADER)
        .chain(data.iter().copied())
        .map(str::to_string)
        .collect()
}

pub fn datetime(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, s)
        .unwrap()
}

/// A small mixed-ticker file as the upstream producer writes it
pub fn sample_lines() -> Vec<String> {
    with_header(&[
        r#""AAPL","1/2/2020 9:30:00 AM",74.06,75.15,73.80,75.09,"135480400","1.23","0.45""#,
        r#""MSFT","1/2/2020 9:30:00 AM",158.78,160.73,158.33,160.62,"22622100","2.10","1.33""#,
        r#"'AAPL','1/3/2020 9:30:00 AM',74.29,75.14,74.13,74.36,'146322800','-0.72','-0.97'"#,
        r#"MSFT,1/3/2020 4:00:00 PM,158.32,159.95,158.06,158.62,21116200,-2.00,-1.25"#,
    ])
}
