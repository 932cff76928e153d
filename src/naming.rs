//! Identifier naming classifiers shared by the lexical and syntax rules.
//!
//! These are regex heuristics, not a grammar for Python identifiers. Their
//! boundary behavior is part of the rule contract:
//!
//! - `is_snake_case` accepts any run of lowercase letters, digits and
//!   underscores, including degenerate names such as `___` or the empty string.
//! - `lowercase_class_name` only recognises class names that start with a
//!   lowercase letter and contain at most one capital. `MyClass` and `my_class`
//!   are both outside its reach in different ways: the former is accepted, the
//!   latter is reported by its leading `my` segment only.
//! - `is_snake_case_function_def` accepts names wrapped in up to two leading and
//!   trailing underscores, so dunder methods like `__init__` are never reported.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Argument names.
    static ref SNAKE_CASE: Regex = Regex::new(r"^[a-z0-9_]*_?[a-z0-9]*$").unwrap();

    /// Assignment target names with up to two attribute levels (`obj.attr.sub`).
    static ref SNAKE_CASE_TARGET: Regex =
        Regex::new(r"^[a-z0-9_]*(?:\._?[a-z0-9]*){0,2}$").unwrap();

    /// Leading segment of a class name that looks snake_case or mixedCase.
    static ref LOWERCASE_CLASS_NAME: Regex = Regex::new(r"^[a-z]+[a-z]*[A-Z]?[a-z]*").unwrap();

    /// A `def` line whose name is snake_case, optionally dunder-wrapped.
    static ref SNAKE_CASE_DEF: Regex =
        Regex::new(r"^.*def _{0,2}?[a-z]*_?[a-z0-9]*_{0,2}?\(.*\):$").unwrap();

    /// A `def` line whose name starts with a capital letter.
    static ref UPPERCASE_DEF: Regex = Regex::new(r"^.*def ([A-Z].*)\(.*\)").unwrap();
}

/// Returns true if `name` is an acceptable snake_case identifier.
pub fn is_snake_case(name: &str) -> bool {
    SNAKE_CASE.is_match(name)
}

/// Returns true if a dotted assignment target (`x`, `obj.attr`, `obj.mid.attr`)
/// is acceptable.
///
/// Each attribute segment after a dot may carry one leading underscore and no
/// further underscores, so `self.value` passes while `self.my_value` does not.
pub fn is_snake_case_target(name: &str) -> bool {
    SNAKE_CASE_TARGET.is_match(name)
}

/// Returns the leading segment of `candidate` if it looks like a non-CamelCase
/// class name, or `None` if the name is accepted.
pub fn lowercase_class_name(candidate: &str) -> Option<&str> {
    LOWERCASE_CLASS_NAME.find(candidate).map(|m| m.as_str())
}

/// Returns true if `candidate` passes the CamelCase class-name heuristic.
pub fn is_camel_case_class_name(candidate: &str) -> bool {
    lowercase_class_name(candidate).is_none()
}

/// Returns true if a line holds a `def` with a snake_case or dunder name.
///
/// The line is expected without its terminator.
pub fn is_snake_case_function_def(line: &str) -> bool {
    SNAKE_CASE_DEF.is_match(line)
}

/// Returns the function name of a `def` line whose name starts with a capital
/// letter.
///
/// The capture runs up to the last `(` that is followed by a `)`, so it is the
/// plain name for ordinary signatures.
pub fn uppercase_function_name(line: &str) -> Option<&str> {
    UPPERCASE_DEF
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
