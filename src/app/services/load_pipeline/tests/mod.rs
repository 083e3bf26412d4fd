//! Test utilities for load pipeline testing

use std::sync::Arc;

use crate::app::services::line_source::{LineSource, MemorySource};

mod pipeline_tests;

pub use crate::app::services::line_source::tests::{CancellingReader, FailingReader, price_lines};

/// In-memory source holding `lines` joined with newlines
pub fn memory_source(label: &str, lines: &[String]) -> Arc<dyn LineSource> {
    Arc::new(MemorySource::new(label, lines.join("\n")))
}

/// Mixed-ticker fixture with one line that cannot be parsed (line 3)
pub fn mixed_lines_with_bad_row() -> Vec<String> {
    [
        "Ticker,TradeDate,Open,High,Low,Close,Volume,Change,ChangePercent",
        r#""AAPL","1/2/2020 9:30:00 AM",0,0,0,0,"100","1.00","0.50""#,
        r#""MSFT","not a date",0,0,0,0,"200","2.00","1.00""#,
        r#""MSFT","1/3/2020 9:30:00 AM",0,0,0,0,"300","3.00","1.50""#,
        r#""aapl","1/6/2020 4:00:00 PM",0,0,0,0,"400","-4.00","-2.00""#,
    ]
    .iter()
    .map(|line| line.to_string())
    .collect()
}
