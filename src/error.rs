//! Error types for per-file checking.

use thiserror::Error;

/// Failures that stop some or all checks for a single file.
///
/// None of these abort a batch: the runner records them per file and moves on.
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is not valid UTF-8")]
    Decode { path: String },
    #[error("{path} does not parse as Python")]
    Parse { path: String },
    #[error("grammar error: {0}")]
    Grammar(String),
}

impl CheckError {
    /// True for failures that mean the file could not be read at all.
    pub fn is_io_failure(&self) -> bool {
        matches!(self, CheckError::Io { .. } | CheckError::Decode { .. })
    }
}

impl From<tree_sitter::LanguageError> for CheckError {
    fn from(e: tree_sitter::LanguageError) -> Self {
        CheckError::Grammar(e.to_string())
    }
}

impl From<tree_sitter::QueryError> for CheckError {
    fn from(e: tree_sitter::QueryError) -> Self {
        CheckError::Grammar(e.to_string())
    }
}

/// An assignment target shape the variable-name rule does not judge.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported assignment target `{kind}` on line {line}")]
pub struct UnsupportedTarget {
    /// Tree-sitter node kind of the target (e.g. `subscript`, `pattern_list`).
    pub kind: String,
    pub line: usize,
}
