//! Style rules and the pipeline that runs them.

mod aggregate;
pub mod lexical;
mod runner;
mod syntax;
mod types;

pub use aggregate::{Aggregator, CheckReport, FileFailure};
pub use lexical::{LexicalRuleSet, LexicalState, Line};
pub use runner::Runner;
pub use syntax::SyntaxRuleSet;
pub use types::{Diagnostic, RuleCode, RULE_TABLE};
