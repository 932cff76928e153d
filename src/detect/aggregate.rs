//! Diagnostic collection and the final ordering contract.

use serde::Serialize;

use super::Diagnostic;

/// Collects diagnostics for one run, across every file.
///
/// Diagnostics are kept in the order they were produced and never
/// deduplicated. Sorting happens once, in `into_sorted`, after every file has
/// been checked.
#[derive(Debug, Default)]
pub struct Aggregator {
    diagnostics: Vec<Diagnostic>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Diagnostics in production order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Sort by path, then line number, then code.
    pub fn into_sorted(self) -> Vec<Diagnostic> {
        let mut diagnostics = self.diagnostics;
        diagnostics.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        diagnostics
    }
}

/// A file that could not be checked.
#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    pub file: String,
    pub message: String,
}

/// Results of one run.
#[derive(Debug, Default, Serialize)]
pub struct CheckReport {
    /// Sorted diagnostics.
    pub diagnostics: Vec<Diagnostic>,
    /// Files that could not be read; reported separately from diagnostics.
    pub failures: Vec<FileFailure>,
    /// Number of files handed to the runner.
    pub scanned: usize,
    /// Files whose syntax-tree rules were skipped because they do not parse.
    pub parse_failures: usize,
}

impl CheckReport {
    /// One output line per diagnostic, in sorted order.
    pub fn render_lines(&self) -> Vec<String> {
        self.diagnostics.iter().map(|d| d.to_string()).collect()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}
