//! Core price file parser implementation
//!
//! This module walks the raw line sequence, skips the header, applies the
//! malformed-line policy and finally the optional ticker post-filter.

use tracing::{debug, info, warn};

use super::line_parser::parse_price_line;
use super::stats::{LineRejection, ParseResult, ParseStats};
use crate::app::models::{MalformedLinePolicy, TickerFilter};
use crate::constants::HEADER_LINE_COUNT;
use crate::{Error, Result};

/// Parser for stock price line sequences
///
/// - Header line(s) are skipped, never validated
/// - Output preserves source line order
/// - The ticker filter runs after every line has been parsed, so it can never
///   hide a malformed line
#[derive(Debug, Clone, Default)]
pub struct RecordParser {
    policy: MalformedLinePolicy,
    filter: Option<TickerFilter>,
}

impl RecordParser {
    /// Create a parser that aborts on the first malformed line
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(mut self, policy: MalformedLinePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_filter(mut self, filter: Option<TickerFilter>) -> Self {
        self.filter = filter;
        self
    }

    pub fn policy(&self) -> MalformedLinePolicy {
        self.policy
    }

    pub fn filter(&self) -> Option<&TickerFilter> {
        self.filter.as_ref()
    }

    /// Parse a complete line sequence (header first)
    pub fn parse(&self, lines: &[String]) -> Result<ParseResult> {
        let mut stats = ParseStats {
            header_lines: lines.len().min(HEADER_LINE_COUNT),
            ..ParseStats::new()
        };
        let mut records = Vec::with_capacity(lines.len().saturating_sub(HEADER_LINE_COUNT));

        for (index, line) in lines.iter().enumerate().skip(HEADER_LINE_COUNT) {
            let line_number = index + 1;
            stats.total_lines += 1;

            match parse_price_line(line) {
                Ok(price) => {
                    records.push(price);
                    stats.records_parsed += 1;
                }
                Err(reason) => match self.policy {
                    MalformedLinePolicy::Abort => {
                        warn!("Aborting parse at line {}: {}", line_number, reason);
                        return Err(Error::malformed_line(line_number, line.clone(), reason));
                    }
                    MalformedLinePolicy::Skip => {
                        debug!("Skipped line {}: {}", line_number, reason);
                        stats.lines_rejected += 1;
                        stats.rejections.push(LineRejection {
                            line_number,
                            line: line.clone(),
                            reason,
                        });
                    }
                },
            }
        }

        if let Some(filter) = &self.filter {
            let before = records.len();
            records.retain(|price| filter.matches(&price.ticker));
            stats.records_filtered_out = before - records.len();
            debug!(
                "Ticker filter {} kept {} of {} records",
                filter,
                records.len(),
                before
            );
        }

        info!(
            "Parsed {} records from {} data lines ({} rejected)",
            stats.records_parsed, stats.total_lines, stats.lines_rejected
        );

        Ok(ParseResult { records, stats })
    }
}
