//! Tests for the single-load pipeline

use super::*;
use crate::Error;
use crate::app::models::{MalformedLinePolicy, TickerFilter};
use crate::app::services::line_source::{FileSource, StreamSource};
use crate::app::services::load_pipeline::{CancelStage, LoadOutcome, run_load};
use crate::app::services::record_parser::RecordParser;
use tokio::io::AsyncReadExt;
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn test_completed_load_delivers_every_record() {
    let source = memory_source("prices", &price_lines(5));
    let outcome = run_load(source, &RecordParser::new(), &CancellationToken::new())
        .await
        .unwrap();

    assert!(!outcome.is_cancelled());
    let result = outcome.into_result().unwrap();
    assert_eq!(result.records.len(), 5);
    assert_eq!(result.records[0].volume, 1000);
    assert_eq!(result.records[4].volume, 1004);
    assert_eq!(result.stats.lines_consumed(), 6);
}

#[tokio::test]
async fn test_token_cancelled_before_start_reads_nothing() {
    let token = CancellationToken::new();
    token.cancel();

    let outcome = run_load(memory_source("prices", &price_lines(5)), &RecordParser::new(), &token)
        .await
        .unwrap();

    let notice = outcome.notice().copied().unwrap();
    assert_eq!(notice.lines_read, 0);
    assert_eq!(notice.stage, CancelStage::Reading);
    assert!(outcome.records().is_none());
}

#[tokio::test]
async fn test_cancel_mid_read_stops_after_current_line() {
    let token = CancellationToken::new();
    let lines = price_lines(20);
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    let reader = CancellingReader::new(&refs, 4, token.clone());
    let source = Arc::new(StreamSource::new("scripted", reader));

    let outcome = run_load(source, &RecordParser::new(), &token).await.unwrap();

    match outcome {
        LoadOutcome::Cancelled(notice) => {
            assert_eq!(notice.lines_read, 4);
            assert_eq!(notice.stage, CancelStage::Reading);
        }
        LoadOutcome::Completed(_) => panic!("load should have been cancelled"),
    }
}

#[tokio::test]
async fn test_cancel_after_last_line_skips_parsing() {
    let token = CancellationToken::new();
    let mut lines = price_lines(3);
    // would abort the parse if it ran
    lines.push("not a price line".to_string());
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    let source = Arc::new(StreamSource::new(
        "scripted",
        CancellingReader::at_eof(&refs, token.clone()),
    ));

    let outcome = run_load(source, &RecordParser::new(), &token).await.unwrap();

    match outcome {
        LoadOutcome::Cancelled(notice) => {
            assert_eq!(notice.lines_read, 5);
            assert_eq!(notice.stage, CancelStage::BeforeParse);
        }
        LoadOutcome::Completed(_) => panic!("records delivered after cancellation"),
    }
}

#[tokio::test]
async fn test_mid_stream_io_error_fails_the_load() {
    let head = std::io::Cursor::new(price_lines(2).join("\n").into_bytes());
    let failing = head.chain(FailingReader {
        kind: std::io::ErrorKind::ConnectionAborted,
    });
    let source = Arc::new(StreamSource::new("flaky", failing));

    let err = run_load(source, &RecordParser::new(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::ReadFailure { .. }));
}

#[tokio::test]
async fn test_missing_file_is_source_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let source = Arc::new(FileSource::new(dir.path().join("absent.csv")));

    let err = run_load(source, &RecordParser::new(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::SourceUnavailable { .. }));
}

#[tokio::test]
async fn test_abort_policy_fails_on_malformed_line() {
    let source = memory_source("mixed", &mixed_lines_with_bad_row());

    let err = run_load(source, &RecordParser::new(), &CancellationToken::new())
        .await
        .unwrap_err();

    match err {
        Error::MalformedLine { line_number, .. } => assert_eq!(line_number, 3),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_skip_policy_and_filter_apply_together() {
    let source = memory_source("mixed", &mixed_lines_with_bad_row());
    let parser = RecordParser::new()
        .with_policy(MalformedLinePolicy::Skip)
        .with_filter(Some(TickerFilter::new(["aapl"]).unwrap()));

    let outcome = run_load(source, &parser, &CancellationToken::new())
        .await
        .unwrap();

    let result = outcome.into_result().unwrap();
    let tickers: Vec<&str> = result.records.iter().map(|r| r.ticker.as_str()).collect();
    assert_eq!(tickers, vec!["AAPL", "aapl"]);
    assert_eq!(result.stats.lines_rejected, 1);
    assert_eq!(result.stats.records_filtered_out, 1);
}

#[tokio::test]
async fn test_header_only_source_completes_empty() {
    let source = memory_source("header", &price_lines(0));
    let outcome = run_load(source, &RecordParser::new(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.records().map(<[_]>::len), Some(0));
}
