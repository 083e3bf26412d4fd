//! Parsing statistics and result structures for price files
//!
//! This module provides types for tracking how many lines became records,
//! which lines were rejected and why, and how many records a ticker filter
//! removed.

use serde::Serialize;

use super::field_parsers::LineError;
use crate::app::models::StockPrice;

/// Parsing result with records and statistics
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Successfully parsed records, in source order, after filtering
    pub records: Vec<StockPrice>,

    /// Parsing statistics
    pub stats: ParseStats,
}

/// A data line that was excluded from the output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineRejection {
    /// 1-based line number in the source, header included
    pub line_number: usize,

    /// The raw line as read
    pub line: String,

    pub reason: LineError,
}

/// Parsing statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    /// Number of leading header lines skipped
    pub header_lines: usize,

    /// Number of data lines examined (header excluded)
    pub total_lines: usize,

    /// Number of lines converted into records
    pub records_parsed: usize,

    /// Number of lines rejected as malformed
    pub lines_rejected: usize,

    /// Number of parsed records removed by the ticker filter
    pub records_filtered_out: usize,

    /// Rejected lines with their reasons
    pub rejections: Vec<LineRejection>,
}

impl ParseStats {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw lines consumed, header included
    pub fn lines_consumed(&self) -> usize {
        self.header_lines + self.total_lines
    }

    /// Records delivered after filtering
    pub fn records_delivered(&self) -> usize {
        self.records_parsed - self.records_filtered_out
    }

    /// Share of data lines that parsed, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_lines == 0 {
            100.0
        } else {
            (self.records_parsed as f64 / self.total_lines as f64) * 100.0
        }
    }

    /// True when no line was rejected
    pub fn is_clean(&self) -> bool {
        self.lines_rejected == 0
    }
}
