//! Output formatting for check results.
//!
//! - Text: one `<file>: Line <n>: <code> <message>` line per diagnostic
//! - JSON: structured output for programmatic consumption
//!
//! Read failures never go into the diagnostic stream; `write_failures` prints
//! them to stderr.

use colored::*;
use serde::Serialize;
use std::io::Write;

use crate::detect::{CheckReport, Diagnostic, FileFailure};

/// Output formats for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    Text,
    Json,
}

/// Write diagnostics as plain text lines.
pub fn write_text<W: Write>(out: &mut W, report: &CheckReport) -> std::io::Result<()> {
    for line in report.render_lines() {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

// =============================================================================
// JSON Format
// =============================================================================

/// JSON report structure.
#[derive(Serialize)]
pub struct JsonReport<'a> {
    pub version: &'static str,
    pub path: &'a str,
    pub files_scanned: usize,
    pub parse_failures: usize,
    pub diagnostics: Vec<JsonDiagnostic<'a>>,
    pub errors: &'a [FileFailure],
}

/// JSON diagnostic structure.
#[derive(Serialize)]
pub struct JsonDiagnostic<'a> {
    pub file: &'a str,
    pub line: usize,
    pub code: &'static str,
    pub message: &'a str,
}

impl<'a> From<&'a Diagnostic> for JsonDiagnostic<'a> {
    fn from(d: &'a Diagnostic) -> Self {
        Self {
            file: &d.file,
            line: d.line,
            code: d.code.as_str(),
            message: &d.message,
        }
    }
}

/// Write results in JSON format.
pub fn write_json<W: Write>(out: &mut W, path: &str, report: &CheckReport) -> anyhow::Result<()> {
    let json = JsonReport {
        version: env!("CARGO_PKG_VERSION"),
        path,
        files_scanned: report.scanned,
        parse_failures: report.parse_failures,
        diagnostics: report.diagnostics.iter().map(JsonDiagnostic::from).collect(),
        errors: &report.failures,
    };
    serde_json::to_writer_pretty(&mut *out, &json)?;
    writeln!(out)?;
    Ok(())
}

/// Print files that could not be checked to stderr.
pub fn write_failures(report: &CheckReport) {
    for failure in &report.failures {
        eprintln!("{} {}", "error:".red().bold(), failure.message);
    }
}
