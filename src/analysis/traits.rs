//! Core traits for language analysis.

use std::path::Path;

use super::FileFacts;
use crate::error::CheckError;

/// Holds a parsed tree-sitter tree and associated metadata.
///
/// Owned by the file being checked and dropped once its syntax rules have run.
pub struct ParsedFile {
    /// The tree-sitter parse tree.
    pub tree: tree_sitter::Tree,
    /// The source text (kept for node text extraction).
    pub source: Vec<u8>,
    /// The file path (for diagnostics and error reporting).
    pub path: String,
}

impl ParsedFile {
    /// Get text for a tree-sitter node.
    pub fn node_text(&self, node: tree_sitter::Node) -> &str {
        node.utf8_text(&self.source).unwrap_or("")
    }
}

/// Language-specific analyzer trait.
///
/// Note: tree_sitter::Parser is not Sync, so implementations create parsers
/// as needed.
pub trait LanguageAnalyzer: Send + Sync {
    /// Returns the language identifier (e.g., "python").
    fn language_id(&self) -> &'static str;

    /// Returns file extensions this analyzer handles (without dot).
    fn file_extensions(&self) -> &'static [&'static str];

    /// Parse a source file into a tree-sitter tree.
    ///
    /// Returns `CheckError::Parse` if the source is not valid for the language.
    fn parse(&self, path: &Path, source: &[u8]) -> Result<ParsedFile, CheckError>;

    /// Extract the syntax-rule views from a parsed file.
    fn extract_facts(&self, parsed: &ParsedFile) -> Result<FileFacts, CheckError>;

    /// Check if this analyzer handles the given file extension.
    fn handles_extension(&self, ext: &str) -> bool {
        self.file_extensions().contains(&ext)
    }

    /// Check if this analyzer handles the given path, by extension.
    fn handles_path(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| self.handles_extension(ext))
            .unwrap_or(false)
    }
}
