//! Result rendering for the CLI
//!
//! Every renderer writes to a caller-supplied writer so commands print to
//! stdout and tests capture into a buffer.

use crate::app::models::StockPrice;
use crate::app::services::load_pipeline::CancellationNotice;
use crate::app::services::record_parser::ParseStats;
use crate::cli::args::OutputFormat;
use crate::constants::fields;
use anyhow::{Context, Result};
use colored::Colorize;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct LoadReport<'a> {
    source: &'a str,
    stats: &'a ParseStats,
    records: &'a [StockPrice],
}

#[derive(Serialize)]
struct ValidationReport<'a> {
    source: &'a str,
    success_rate: f64,
    stats: &'a ParseStats,
}

/// Print loaded records, at most `limit` of them
pub fn render_records(
    out: &mut dyn Write,
    format: OutputFormat,
    source: &str,
    records: &[StockPrice],
    stats: &ParseStats,
    limit: Option<usize>,
) -> Result<()> {
    let shown = &records[..limit.unwrap_or(records.len()).min(records.len())];

    match format {
        OutputFormat::Human => {
            writeln!(
                out,
                "{}",
                format!(
                    "{:<8} {:<24} {:>14} {:>12} {:>10}",
                    "Ticker", "Trade date", "Volume", "Change", "Change %"
                )
                .bold()
            )?;
            for price in shown {
                writeln!(
                    out,
                    "{:<8} {:<24} {:>14} {} {}",
                    price.ticker,
                    price.formatted_trade_date(),
                    price.volume,
                    signed(price.change, 12),
                    signed(price.change_percent, 10)
                )?;
            }
            writeln!(out)?;

            let mut summary = format!(
                "Loaded {} records from {}",
                records.len().to_string().bold(),
                source
            );
            if shown.len() < records.len() {
                summary.push_str(&format!(" (showing first {})", shown.len()));
            }
            writeln!(out, "{}", summary)?;
            if stats.lines_rejected > 0 {
                writeln!(
                    out,
                    "{}",
                    format!("{} malformed lines skipped", stats.lines_rejected).yellow()
                )?;
            }
            if stats.records_filtered_out > 0 {
                writeln!(
                    out,
                    "{} records removed by the ticker filter",
                    stats.records_filtered_out
                )?;
            }
        }
        OutputFormat::Json => {
            let report = LoadReport {
                source,
                stats,
                records: shown,
            };
            serde_json::to_writer_pretty(&mut *out, &report)
                .context("Failed to serialize records as JSON")?;
            writeln!(out)?;
        }
        OutputFormat::Csv => {
            let mut writer = csv::WriterBuilder::new()
                .quote_style(csv::QuoteStyle::Always)
                .from_writer(&mut *out);
            writer
                .write_record(fields::HEADER)
                .context("Failed to write CSV header")?;
            for price in shown {
                writer
                    .write_record(price.to_fields())
                    .with_context(|| format!("Failed to write CSV row for {}", price.ticker))?;
            }
            writer.flush().context("Failed to flush CSV output")?;
        }
    }

    Ok(())
}

/// Print the outcome of a validation pass
pub fn render_validation(
    out: &mut dyn Write,
    format: OutputFormat,
    source: &str,
    stats: &ParseStats,
) -> Result<()> {
    match format {
        OutputFormat::Human => {
            writeln!(out, "{} {}", "Validated".bold(), source)?;
            writeln!(out, "  Data lines:  {}", stats.total_lines)?;
            writeln!(out, "  Parsed:      {}", stats.records_parsed)?;
            writeln!(out, "  Rejected:    {}", stats.lines_rejected)?;
            writeln!(out, "  Success:     {:.1}%", stats.success_rate())?;

            if stats.is_clean() {
                writeln!(out, "{}", "All lines parsed".green())?;
            } else {
                writeln!(out)?;
                for rejection in &stats.rejections {
                    writeln!(
                        out,
                        "{} {}",
                        format!("line {}:", rejection.line_number).red(),
                        rejection.reason
                    )?;
                    writeln!(out, "    {}", rejection.line.dimmed())?;
                }
            }
        }
        OutputFormat::Json => {
            let report = ValidationReport {
                source,
                success_rate: stats.success_rate(),
                stats,
            };
            serde_json::to_writer_pretty(&mut *out, &report)
                .context("Failed to serialize validation report as JSON")?;
            writeln!(out)?;
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(&mut *out);
            writer
                .write_record(["line_number", "reason", "line"])
                .context("Failed to write CSV header")?;
            for rejection in &stats.rejections {
                writer
                    .write_record([
                        rejection.line_number.to_string(),
                        rejection.reason.to_string(),
                        rejection.line.clone(),
                    ])
                    .with_context(|| {
                        format!("Failed to write CSV row for line {}", rejection.line_number)
                    })?;
            }
            writer.flush().context("Failed to flush CSV output")?;
        }
    }

    Ok(())
}

/// Print a cancellation notice on stderr-style output
pub fn render_cancellation(out: &mut dyn Write, notice: &CancellationNotice) -> Result<()> {
    writeln!(
        out,
        "{}",
        format!("Load cancelled {} ({} lines read, nothing delivered)", notice.stage, notice.lines_read)
            .yellow()
    )?;
    Ok(())
}

fn signed(value: Decimal, width: usize) -> String {
    let text = format!("{:>width$}", value.to_string(), width = width);
    if value.is_sign_negative() && !value.is_zero() {
        text.red().to_string()
    } else if value.is_zero() {
        text
    } else {
        text.green().to_string()
    }
}
