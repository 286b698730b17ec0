// Comparison report rendering (text and JSON)

use std::fmt::Write as _;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use sheetdiff_recon::{CellValue, ComparisonResult, ComparisonSummary, KeyedRecord};

const RULE_WIDTH: usize = 70;

#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    pub file_a: String,
    pub file_b: String,
    pub detailed: bool,
    pub engine_version: &'static str,
    /// RFC 3339, UTC, second precision.
    pub generated_at: String,
}

impl ReportMeta {
    pub fn new(file_a: impl Into<String>, file_b: impl Into<String>, detailed: bool) -> Self {
        Self {
            file_a: file_a.into(),
            file_b: file_b.into(),
            detailed,
            engine_version: env!("CARGO_PKG_VERSION"),
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    meta: &'a ReportMeta,
    summary: ComparisonSummary,
    result: &'a ComparisonResult,
}

/// Single JSON document: `{meta, summary, result}`.
pub fn render_json(
    meta: &ReportMeta,
    result: &ComparisonResult,
) -> Result<String, serde_json::Error> {
    let report = JsonReport {
        meta,
        summary: result.summary(),
        result,
    };
    serde_json::to_string_pretty(&report)
}

/// Plain-text report, one section per non-empty bucket.
pub fn render_text(result: &ComparisonResult) -> String {
    let summary = result.summary();
    let mut out = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
    let _ = writeln!(out, "File 1 Row Count: {}", summary.count_a);
    let _ = writeln!(out, "File 2 Row Count: {}", summary.count_b);
    let _ = writeln!(out, "Difference: {} rows", summary.row_count_delta);
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
    out.push('\n');

    if !result.only_in_a.is_empty() {
        let title = format!("{} Products in File 1 but NOT in File 2:", result.only_in_a.len());
        section(&mut out, &title);
        keyed_lines(&mut out, &result.only_in_a);
    }

    if !result.only_in_b.is_empty() {
        let title = format!("{} Products in File 2 but NOT in File 1:", result.only_in_b.len());
        section(&mut out, &title);
        keyed_lines(&mut out, &result.only_in_b);
    }

    if !result.differences.is_empty() {
        let title = format!("{} Products with Detailed Differences:", result.differences.len());
        section(&mut out, &title);
        for diff in &result.differences {
            let _ = writeln!(out, "  • Code: {} - {}", diff.key, diff.description);
            for change in &diff.fields {
                let _ = writeln!(
                    out,
                    "    {}: {} → {}",
                    change.field,
                    show(&change.value_a),
                    show(&change.value_b)
                );
            }
            out.push('\n');
        }
    }

    if summary.identical {
        out.push_str("No differences found. Files are identical!\n");
    }

    out
}

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
}

fn keyed_lines(out: &mut String, records: &[KeyedRecord]) {
    for record in records {
        let _ = writeln!(out, "  • Code: {} - {}", record.key, record.description);
    }
    out.push('\n');
}

fn show(value: &CellValue) -> String {
    if value.is_empty() {
        "(empty)".to_string()
    } else {
        value.to_string()
    }
}
