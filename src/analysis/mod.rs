//! AST-backed analysis of Python source files.
//!
//! This module parses a file with tree-sitter and projects the tree into the
//! small set of read-only views the syntax rules consume:
//!
//! ```text
//! ┌─────────────┐     ┌────────────────┐     ┌────────────────────┐
//! │ Source text │────▶│ PythonAnalyzer │────▶│ FileFacts          │
//! └─────────────┘     │ (tree-sitter)  │     │  FunctionDef       │
//!                     └────────────────┘     │   Parameter        │
//!                                            │   DefaultValue     │
//!                                            │   Assignment       │
//!                                            └────────────────────┘
//! ```
//!
//! The parse tree itself never leaves this module; once the views are built it
//! is dropped along with the `ParsedFile`.

mod facts;
mod python;
mod traits;

pub use facts::{AssignTarget, Assignment, DefaultValue, FileFacts, FunctionDef, Parameter};
pub use python::PythonAnalyzer;
pub use traits::{LanguageAnalyzer, ParsedFile};
