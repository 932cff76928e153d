//! Core types for style diagnostics.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Style rule codes.
///
/// Variants are declared in code order, so the derived `Ord` agrees with the
/// lexicographic order of the code strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RuleCode {
    S001,
    S002,
    S003,
    S004,
    S005,
    S006,
    S007,
    S008,
    S009,
    S010,
    S011,
    S012,
}

/// Message template for every rule code.
///
/// `{keyword}` and `{name}` are replaced by the offending keyword or identifier.
pub const RULE_TABLE: [(RuleCode, &str); 12] = [
    (RuleCode::S001, "Too long"),
    (RuleCode::S002, "Indentation is not a multiple of four"),
    (RuleCode::S003, "Unnecessary semicolon after a statement"),
    (RuleCode::S004, "Less than two spaces before inline comments"),
    (RuleCode::S005, "TODO found"),
    (RuleCode::S006, "More than two blank lines preceding a code line"),
    (RuleCode::S007, "Too many spaces after '{keyword}'"),
    (RuleCode::S008, "Class name '{name}' should be written in CamelCase"),
    (RuleCode::S009, "Function name {name} should be written in snake_case"),
    (RuleCode::S010, "Argument name {name} should be written in snake_case"),
    (RuleCode::S011, "Variable {name} should be written in snake_case"),
    (RuleCode::S012, "Default argument value is mutable"),
];

impl RuleCode {
    pub const ALL: [RuleCode; 12] = [
        RuleCode::S001,
        RuleCode::S002,
        RuleCode::S003,
        RuleCode::S004,
        RuleCode::S005,
        RuleCode::S006,
        RuleCode::S007,
        RuleCode::S008,
        RuleCode::S009,
        RuleCode::S010,
        RuleCode::S011,
        RuleCode::S012,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleCode::S001 => "S001",
            RuleCode::S002 => "S002",
            RuleCode::S003 => "S003",
            RuleCode::S004 => "S004",
            RuleCode::S005 => "S005",
            RuleCode::S006 => "S006",
            RuleCode::S007 => "S007",
            RuleCode::S008 => "S008",
            RuleCode::S009 => "S009",
            RuleCode::S010 => "S010",
            RuleCode::S011 => "S011",
            RuleCode::S012 => "S012",
        }
    }

    /// The message template from `RULE_TABLE`.
    pub fn template(&self) -> &'static str {
        RULE_TABLE[*self as usize].1
    }

    /// Render the message, substituting the placeholder with `arg`.
    pub fn message(&self, arg: Option<&str>) -> String {
        let template = self.template();
        match arg {
            Some(arg) => template.replace("{keyword}", arg).replace("{name}", arg),
            None => template.to_string(),
        }
    }
}

impl fmt::Display for RuleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single style violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub file: String,
    pub line: usize,
    pub code: RuleCode,
    pub message: String,
}

impl Diagnostic {
    pub fn new(file: &str, line: usize, code: RuleCode, arg: Option<&str>) -> Self {
        Self {
            file: file.to_string(),
            line,
            code,
            message: code.message(arg),
        }
    }

    /// Sort key: path, then line, then code.
    pub fn sort_key(&self) -> (&str, usize, &'static str) {
        (self.file.as_str(), self.line, self.code.as_str())
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: Line {}: {} {}",
            self.file, self.line, self.code, self.message
        )
    }
}
