//! Detection runner that orchestrates the lexical and syntax-tree checks.

use std::path::{Path, PathBuf};

use super::lexical::{normalize_newlines, LexicalRuleSet};
use super::{Aggregator, CheckReport, FileFailure, SyntaxRuleSet};
use crate::analysis::{LanguageAnalyzer, PythonAnalyzer};
use crate::error::CheckError;

/// Checks files one at a time and collects their diagnostics.
pub struct Runner {
    analyzer: PythonAnalyzer,
}

impl Runner {
    /// Create a new detection runner.
    pub fn new() -> Self {
        Self {
            analyzer: PythonAnalyzer::new(),
        }
    }

    /// The analyzer used for the syntax-tree rules.
    pub fn analyzer(&self) -> &dyn LanguageAnalyzer {
        &self.analyzer
    }

    /// Check source text that has already been read.
    ///
    /// The lexical rules always run. If the text does not parse, the syntax
    /// rules are skipped and `CheckError::Parse` is returned; the lexical
    /// diagnostics stay in `sink`.
    pub fn check_source(
        &self,
        path: &str,
        text: &str,
        sink: &mut Aggregator,
    ) -> Result<(), CheckError> {
        let text = normalize_newlines(text);
        LexicalRuleSet::check_text(path, &text, sink);

        let parsed = self.analyzer.parse(Path::new(path), text.as_bytes())?;
        let facts = self.analyzer.extract_facts(&parsed)?;
        SyntaxRuleSet::check_facts(&facts, sink);
        Ok(())
    }

    /// Read and check a single file.
    pub fn check_file(&self, path: &Path, sink: &mut Aggregator) -> Result<(), CheckError> {
        let label = path.display().to_string();
        tracing::debug!("checking {}", label);

        let bytes = std::fs::read(path).map_err(|source| CheckError::Io {
            path: label.clone(),
            source,
        })?;
        let text = String::from_utf8(bytes).map_err(|_| CheckError::Decode {
            path: label.clone(),
        })?;

        self.check_source(&label, &text, sink)
    }

    /// Check every file in order and produce the sorted report.
    ///
    /// A file that cannot be read is recorded in `failures` and does not stop
    /// the batch.
    pub fn check_files(&self, files: &[PathBuf]) -> CheckReport {
        let mut sink = Aggregator::new();
        let mut report = CheckReport::default();

        for file in files {
            report.scanned += 1;
            match self.check_file(file, &mut sink) {
                Ok(()) => {}
                Err(CheckError::Parse { path }) => {
                    tracing::debug!("{} does not parse, syntax rules skipped", path);
                    report.parse_failures += 1;
                }
                Err(e) => {
                    if e.is_io_failure() {
                        tracing::warn!("{}", e);
                    } else {
                        tracing::error!("{}", e);
                    }
                    report.failures.push(FileFailure {
                        file: file.display().to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }

        report.diagnostics = sink.into_sorted();
        tracing::info!(
            "checked {} files, {} diagnostics",
            report.scanned,
            report.diagnostics.len()
        );
        report
    }
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}
