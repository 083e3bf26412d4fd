//! Tests for the main record parser functionality

use super::*;
use crate::app::models::{MalformedLinePolicy, StockPrice, TickerFilter};
use crate::app::services::record_parser::{LineError, RecordParser, parse_price_line};
use crate::Error;
use rust_decimal_macros::dec;
use std::str::FromStr;

#[test]
fn test_reference_line_parses_to_expected_record() {
    let lines = with_header(&[
        r#""AAPL","1/2/2020 9:30:00 AM",0,0,0,0,"1000","1.23","0.45""#,
    ]);

    let result = RecordParser::new().parse(&lines).unwrap();

    assert_eq!(
        result.records,
        vec![StockPrice {
            ticker: "AAPL".to_string(),
            trade_date: datetime(2020, 1, 2, 9, 30, 0),
            volume: 1000,
            change: dec!(1.23),
            change_percent: dec!(0.45),
        }]
    );
    assert_eq!(result.stats.total_lines, 1);
    assert_eq!(result.stats.records_parsed, 1);
}

#[test]
fn test_header_is_never_parsed() {
    // A header that would itself be malformed must not trip the parser
    let lines = vec![
        "this is not a price line".to_string(),
        r#""AAPL","1/2/2020 9:30:00 AM",0,0,0,0,"1000","1.23","0.45""#.to_string(),
    ];

    let result = RecordParser::new().parse(&lines).unwrap();
    assert_eq!(result.records.len(), 1);
}

#[test]
fn test_empty_and_header_only_sources_yield_empty_success() {
    let result = RecordParser::new().parse(&[]).unwrap();
    assert!(result.records.is_empty());
    assert_eq!(result.stats.total_lines, 0);
    assert_eq!(result.stats.header_lines, 0);

    let result = RecordParser::new().parse(&with_header(&[])).unwrap();
    assert!(result.records.is_empty());
    assert!(result.stats.is_clean());
    assert_eq!(result.stats.lines_consumed(), 1);
}

#[test]
fn test_output_preserves_source_order() {
    let result = RecordParser::new().parse(&sample_lines()).unwrap();

    let order: Vec<(&str, u64)> = result
        .records
        .iter()
        .map(|r| (r.ticker.as_str(), r.volume))
        .collect();
    assert_eq!(
        order,
        vec![
            ("AAPL", 135480400),
            ("MSFT", 22622100),
            ("AAPL", 146322800),
            ("MSFT", 21116200),
        ]
    );
    assert_eq!(result.records[3].trade_date, datetime(2020, 1, 3, 16, 0, 0));
    assert_eq!(result.records[3].change, dec!(-2.00));
}

#[test]
fn test_quoting_is_transparent() {
    let bare = r#"AAPL,1/2/2020 9:30:00 AM,0,0,0,0,1000,1.23,0.45"#;
    let double = r#""AAPL","1/2/2020 9:30:00 AM","0","0","0","0","1000","1.23","0.45""#;
    let single = r#"'AAPL','1/2/2020 9:30:00 AM','0','0','0','0','1000','1.23','0.45'"#;
    let mixed = r#"'AAPL","1/2/2020 9:30:00 AM',0,0,0,0,"1000",'1.23',"0.45""#;

    let expected = parse_price_line(bare).unwrap();
    for line in [double, single, mixed] {
        assert_eq!(parse_price_line(line).unwrap(), expected, "line: {}", line);
    }
}

#[test]
fn test_rendered_record_reparses_to_equal_record() {
    let originals = vec![
        StockPrice::new("AAPL", datetime(2020, 1, 2, 9, 30, 0), 1000, dec!(1.23), dec!(0.45))
            .unwrap(),
        StockPrice::new("BRK.B", datetime(2019, 12, 31, 12, 0, 59), 0, dec!(-0.001), dec!(0))
            .unwrap(),
        StockPrice::new("TSLA", datetime(2021, 11, 9, 0, 5, 0), u64::MAX, dec!(-120.5), dec!(-9.75))
            .unwrap(),
    ];

    let mut lines = with_header(&[]);
    lines.extend(originals.iter().map(StockPrice::to_delimited_line));

    let result = RecordParser::new().parse(&lines).unwrap();
    assert_eq!(result.records, originals);
}

#[test]
fn test_abort_policy_fails_on_first_malformed_line() {
    let lines = with_header(&[
        r#""AAPL","1/2/2020 9:30:00 AM",0,0,0,0,"1000","1.23","0.45""#,
        r#""AAPL","1/3/2020 9:30:00 AM",0,0,0,0,"abc","1.23","0.45""#,
        r#""AAPL","1/4/2020 9:30:00 AM",0,0,0,0,"xyz","1.23","0.45""#,
    ]);

    let err = RecordParser::new()
        .with_policy(MalformedLinePolicy::Abort)
        .parse(&lines)
        .unwrap_err();

    match err {
        Error::MalformedLine {
            line_number,
            line,
            reason,
        } => {
            assert_eq!(line_number, 3);
            assert!(line.contains("abc"));
            assert_eq!(
                reason,
                LineError::InvalidInteger {
                    field: "volume",
                    value: "abc".to_string()
                }
            );
        }
        other => panic!("Expected MalformedLine, got {:?}", other),
    }
}

#[test]
fn test_skip_policy_excludes_only_bad_lines() {
    let lines = with_header(&[
        r#""AAPL","1/2/2020 9:30:00 AM",0,0,0,0,"1000","1.23","0.45""#,
        r#""AAPL","1/3/2020 9:30:00 AM",0,0,0,0,"abc","1.23","0.45""#,
        r#""AAPL","13/45/2020 9:30:00 AM",0,0,0,0,"1000","1.23","0.45""#,
        r#""AAPL","1/4/2020 9:30:00 AM",0,0,0"#,
        "",
        r#""MSFT","1/5/2020 9:30:00 AM",0,0,0,0,"2000","-1.5","-0.7""#,
    ]);

    let result = RecordParser::new()
        .with_policy(MalformedLinePolicy::Skip)
        .parse(&lines)
        .unwrap();

    assert_eq!(result.records.len(), 2);
    assert_eq!(result.records[0].volume, 1000);
    assert_eq!(result.records[1].ticker, "MSFT");

    // records = data lines - rejected lines
    let stats = &result.stats;
    assert_eq!(stats.total_lines, 6);
    assert_eq!(stats.lines_rejected, 4);
    assert_eq!(stats.records_parsed, stats.total_lines - stats.lines_rejected);

    let numbers: Vec<usize> = stats.rejections.iter().map(|r| r.line_number).collect();
    assert_eq!(numbers, vec![3, 4, 5, 6]);
    assert!(matches!(stats.rejections[1].reason, LineError::InvalidDate { .. }));
    assert_eq!(
        stats.rejections[2].reason,
        LineError::FieldCount {
            expected: 9,
            found: 5
        }
    );
    assert_eq!(
        stats.rejections[3].reason,
        LineError::FieldCount {
            expected: 9,
            found: 1
        }
    );
}

#[test]
fn test_ticker_filter_keeps_matching_records_only() {
    let filter = TickerFilter::from_str("msft").unwrap();
    let result = RecordParser::new()
        .with_filter(Some(filter))
        .parse(&sample_lines())
        .unwrap();

    assert_eq!(result.records.len(), 2);
    assert!(result.records.iter().all(|r| r.ticker == "MSFT"));
    assert_eq!(result.stats.records_parsed, 4);
    assert_eq!(result.stats.records_filtered_out, 2);
    assert_eq!(result.stats.records_delivered(), 2);
}

#[test]
fn test_ticker_filter_does_not_hide_malformed_lines() {
    let filter = TickerFilter::from_str("AAPL").unwrap();
    let lines = with_header(&[
        r#""AAPL","1/2/2020 9:30:00 AM",0,0,0,0,"1000","1.23","0.45""#,
        r#""MSFT","1/2/2020 9:30:00 AM",0,0,0,0,"oops","1.23","0.45""#,
    ]);

    let aborting = RecordParser::new().with_filter(Some(filter.clone()));
    assert!(matches!(
        aborting.parse(&lines),
        Err(Error::MalformedLine { line_number: 3, .. })
    ));

    let skipping = RecordParser::new()
        .with_filter(Some(filter))
        .with_policy(MalformedLinePolicy::Skip);
    let result = skipping.parse(&lines).unwrap();
    assert_eq!(result.records.len(), 1);
    assert_eq!(result.stats.lines_rejected, 1);
}

#[test]
fn test_extra_trailing_fields_are_ignored() {
    let line = r#""AAPL","1/2/2020 9:30:00 AM",0,0,0,0,"1000","1.23","0.45","extra","more""#;
    let price = parse_price_line(line).unwrap();
    assert_eq!(price.change_percent, dec!(0.45));
}

#[test]
fn test_empty_ticker_is_rejected() {
    let line = r#""","1/2/2020 9:30:00 AM",0,0,0,0,"1000","1.23","0.45""#;
    assert_eq!(parse_price_line(line).unwrap_err(), LineError::EmptyTicker);
}

#[test]
fn test_negative_volume_is_rejected() {
    let line = r#""AAPL","1/2/2020 9:30:00 AM",0,0,0,0,"-5","1.23","0.45""#;
    assert!(matches!(
        parse_price_line(line),
        Err(LineError::InvalidInteger { field: "volume", .. })
    ));
}

#[test]
fn test_parser_accessors() {
    let parser = RecordParser::new().with_policy(MalformedLinePolicy::Skip);
    assert_eq!(parser.policy(), MalformedLinePolicy::Skip);
    assert!(parser.filter().is_none());
}
