//! Pystylecheck - static style checker for Python sources.
//!
//! Each file is looked at through two lenses:
//!
//! - a per-line lexical scan (line length, indentation, semicolons, comment
//!   spacing, TODOs, blank-line runs, `class`/`def` spacing and naming)
//! - a tree-sitter syntax tree walk over function definitions (argument
//!   names, variable names, mutable defaults)
//!
//! Diagnostics from every file are collected and sorted by path, line and
//! rule code, so identical input always produces identical output.
//!
//! # Architecture
//!
//! - `naming`: identifier classifiers shared by both rule sets
//! - `analysis`: tree-sitter parsing and the read-only function views
//! - `detect`: lexical rules, syntax rules, the runner and the aggregator
//! - `report`: text and JSON output
//! - `cli`: argument parsing and source-file discovery

pub mod analysis;
pub mod cli;
pub mod detect;
pub mod error;
pub mod naming;
pub mod report;

pub use analysis::{LanguageAnalyzer, PythonAnalyzer};
pub use detect::{Aggregator, CheckReport, Diagnostic, RuleCode, Runner};
pub use error::CheckError;
