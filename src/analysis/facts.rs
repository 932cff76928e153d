//! Read-only views extracted from a parsed Python file.

use std::fmt;

use crate::error::UnsupportedTarget;

/// A plain `def` function found anywhere in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDef {
    pub name: String,
    /// Line of the `def` keyword (1-indexed).
    pub line: usize,
    /// Positional-or-keyword parameters, in declaration order.
    pub params: Vec<Parameter>,
    /// Defaults of the positional parameters, in declaration order.
    pub defaults: Vec<DefaultValue>,
    /// Plain assignments that are direct statements of the function body.
    pub assignments: Vec<Assignment>,
}

/// A function parameter name and where it is declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub line: usize,
}

/// A parameter default value expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultValue {
    pub line: usize,
    /// Tree-sitter node kind of the expression, with parentheses unwrapped.
    pub kind: String,
    /// True if the expression is a literal constant.
    pub is_constant: bool,
}

/// A plain assignment statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub line: usize,
    /// One entry per `=` target, left to right.
    pub targets: Vec<Result<AssignTarget, UnsupportedTarget>>,
}

/// Assignment target shapes judged by the variable-name rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignTarget {
    /// `name = ...`
    Simple(String),
    /// `base.attr = ...`
    Attribute { base: String, attr: String },
    /// `base.mid.attr = ...`
    NestedAttribute {
        base: String,
        mid: String,
        attr: String,
    },
}

impl AssignTarget {
    /// The dotted name used in diagnostics.
    pub fn dotted_name(&self) -> String {
        match self {
            AssignTarget::Simple(name) => name.clone(),
            AssignTarget::Attribute { base, attr } => format!("{}.{}", base, attr),
            AssignTarget::NestedAttribute { base, mid, attr } => {
                format!("{}.{}.{}", base, mid, attr)
            }
        }
    }
}

impl fmt::Display for AssignTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dotted_name())
    }
}

/// Everything the syntax rules need from one file.
#[derive(Debug, Clone, Default)]
pub struct FileFacts {
    pub path: String,
    pub functions: Vec<FunctionDef>,
}
