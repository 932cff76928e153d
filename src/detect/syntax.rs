//! Syntax-tree style rules (S010-S012).
//!
//! These run over the views extracted by the Python analyzer, one function
//! definition at a time.

use super::{Aggregator, Diagnostic, RuleCode};
use crate::analysis::{FileFacts, FunctionDef};
use crate::naming;

/// The syntax-tree rules.
pub struct SyntaxRuleSet;

impl SyntaxRuleSet {
    /// Run every rule over every function in the file.
    pub fn check_facts(facts: &FileFacts, sink: &mut Aggregator) {
        for func in &facts.functions {
            Self::check_function(&facts.path, func, sink);
        }
    }

    pub fn check_function(path: &str, func: &FunctionDef, sink: &mut Aggregator) {
        check_argument_names(path, func, sink);
        check_variable_names(path, func, sink);
        check_mutable_defaults(path, func, sink);
    }
}

fn check_argument_names(path: &str, func: &FunctionDef, sink: &mut Aggregator) {
    for param in &func.params {
        if !naming::is_snake_case(&param.name) {
            sink.push(Diagnostic::new(
                path,
                param.line,
                RuleCode::S010,
                Some(&param.name),
            ));
        }
    }
}

/// Judges the target name only, never the assigned value.
fn check_variable_names(path: &str, func: &FunctionDef, sink: &mut Aggregator) {
    for assignment in &func.assignments {
        for target in &assignment.targets {
            match target {
                Ok(target) => {
                    let name = target.dotted_name();
                    if !naming::is_snake_case_target(&name) {
                        sink.push(Diagnostic::new(
                            path,
                            assignment.line,
                            RuleCode::S011,
                            Some(&name),
                        ));
                    }
                }
                Err(unsupported) => {
                    tracing::debug!("{}: skipping {}", path, unsupported);
                }
            }
        }
    }
}

fn check_mutable_defaults(path: &str, func: &FunctionDef, sink: &mut Aggregator) {
    for default in &func.defaults {
        if !default.is_constant {
            tracing::trace!("{}:{}: non-constant default `{}`", path, default.line, default.kind);
            sink.push(Diagnostic::new(path, default.line, RuleCode::S012, None));
        }
    }
}
