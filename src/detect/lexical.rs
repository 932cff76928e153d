//! Line-oriented style rules (S001-S009).
//!
//! Every rule looks at one physical line, terminator included, and appends at
//! most one diagnostic. The rules are textual: string literals and comments
//! are not told apart, so `print("a;b");` and `x = "# TODO"` both match.

use lazy_static::lazy_static;
use regex::Regex;

use super::{Aggregator, Diagnostic, RuleCode};
use crate::naming;

/// Lines this long or longer (in characters, terminator included) are reported.
pub const MAX_LINE_LENGTH: usize = 80;

/// Leading spaces must come in multiples of this.
pub const INDENT_WIDTH: usize = 4;

/// Blank lines allowed in a row before the next one is reported.
pub const MAX_BLANK_LINES: usize = 2;

lazy_static! {
    static ref CALL_THEN_SEMICOLON: Regex = Regex::new(r"^.*\(.*\);").unwrap();
    static ref BARE_WORD_SEMICOLON: Regex = Regex::new(r"^ *[A-Za-z]*;").unwrap();
    static ref SINGLE_SPACE_COMMENT: Regex = Regex::new(r"^.*\S # ").unwrap();
    static ref TODO_COMMENT: Regex = Regex::new(r"(?i)^.*#.*TODO").unwrap();
    static ref KEYWORD_EXTRA_SPACES: Regex = Regex::new(r"^.*(class|def) {2,}").unwrap();
}

/// Per-file state carried from line to line.
///
/// Create a fresh one for every file.
#[derive(Debug, Default)]
pub struct LexicalState {
    blank_lines: usize,
}

impl LexicalState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// One physical line handed to the rules.
#[derive(Debug, Clone, Copy)]
pub struct Line<'a> {
    pub path: &'a str,
    /// 1-indexed line number.
    pub number: usize,
    /// Raw text, including the trailing `\n` when present.
    pub text: &'a str,
}

impl<'a> Line<'a> {
    /// The text without its terminator.
    fn content(&self) -> &'a str {
        self.text.strip_suffix('\n').unwrap_or(self.text)
    }

    fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    fn report(&self, code: RuleCode, arg: Option<&str>) -> Diagnostic {
        Diagnostic::new(self.path, self.number, code, arg)
    }
}

/// The lexical rules, evaluated in code order.
pub struct LexicalRuleSet;

impl LexicalRuleSet {
    /// Run every rule over one line.
    pub fn check_line(line: &Line, state: &mut LexicalState, sink: &mut Aggregator) {
        if !line.is_blank() {
            state.blank_lines = 0;
        }

        let rules: [fn(&Line, &mut LexicalState) -> Option<Diagnostic>; 9] = [
            check_line_length,
            check_indentation,
            check_semicolon,
            check_comment_spacing,
            check_todo,
            check_blank_lines,
            check_keyword_spacing,
            check_class_name,
            check_function_name,
        ];

        for rule in rules {
            if let Some(diagnostic) = rule(line, state) {
                sink.push(diagnostic);
            }
        }
    }

    /// Run every rule over a whole file, with fresh state.
    pub fn check_text(path: &str, text: &str, sink: &mut Aggregator) {
        let mut state = LexicalState::new();
        for (idx, raw) in split_lines(text).enumerate() {
            let line = Line {
                path,
                number: idx + 1,
                text: raw,
            };
            Self::check_line(&line, &mut state, sink);
        }
    }
}

/// Split text into lines that keep their `\n` terminator.
///
/// Expects `\r\n` and `\r` already normalized to `\n`.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split_inclusive('\n')
}

/// Normalize `\r\n` and lone `\r` line endings to `\n`.
pub fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

fn check_line_length(line: &Line, _: &mut LexicalState) -> Option<Diagnostic> {
    (line.text.chars().count() >= MAX_LINE_LENGTH).then(|| line.report(RuleCode::S001, None))
}

fn check_indentation(line: &Line, _: &mut LexicalState) -> Option<Diagnostic> {
    let indent = line.text.len() - line.text.trim_start_matches(' ').len();
    (indent % INDENT_WIDTH != 0).then(|| line.report(RuleCode::S002, None))
}

fn check_semicolon(line: &Line, _: &mut LexicalState) -> Option<Diagnostic> {
    let text = line.text;
    (CALL_THEN_SEMICOLON.is_match(text) || BARE_WORD_SEMICOLON.is_match(text))
        .then(|| line.report(RuleCode::S003, None))
}

/// Only the exact single-space case is reported; three or more spaces pass.
fn check_comment_spacing(line: &Line, _: &mut LexicalState) -> Option<Diagnostic> {
    SINGLE_SPACE_COMMENT
        .is_match(line.text)
        .then(|| line.report(RuleCode::S004, None))
}

fn check_todo(line: &Line, _: &mut LexicalState) -> Option<Diagnostic> {
    TODO_COMMENT
        .is_match(line.text)
        .then(|| line.report(RuleCode::S005, None))
}

/// Reported on the line after the third blank line in a row, then the count
/// starts over. A run at end of file can point one past the last line.
fn check_blank_lines(line: &Line, state: &mut LexicalState) -> Option<Diagnostic> {
    if !line.is_blank() {
        return None;
    }
    state.blank_lines += 1;
    if state.blank_lines <= MAX_BLANK_LINES {
        return None;
    }
    state.blank_lines = 0;
    Some(Diagnostic::new(
        line.path,
        line.number + 1,
        RuleCode::S006,
        None,
    ))
}

fn check_keyword_spacing(line: &Line, _: &mut LexicalState) -> Option<Diagnostic> {
    let caps = KEYWORD_EXTRA_SPACES.captures(line.text)?;
    let keyword = caps.get(1)?.as_str();
    Some(line.report(RuleCode::S007, Some(keyword)))
}

fn check_class_name(line: &Line, _: &mut LexicalState) -> Option<Diagnostic> {
    let candidate = line.text.strip_prefix("class ")?;
    let name = naming::lowercase_class_name(candidate)?;
    Some(line.report(RuleCode::S008, Some(name)))
}

fn check_function_name(line: &Line, _: &mut LexicalState) -> Option<Diagnostic> {
    let content = line.content();
    if naming::is_snake_case_function_def(content) {
        return None;
    }
    let name = naming::uppercase_function_name(content)?;
    Some(line.report(RuleCode::S009, Some(name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes_for(text: &str) -> Vec<(usize, RuleCode)> {
        let mut sink = Aggregator::new();
        LexicalRuleSet::check_text("test.py", text, &mut sink);
        sink.diagnostics().iter().map(|d| (d.line, d.code)).collect()
    }

    fn single_line(text: &str) -> Vec<RuleCode> {
        codes_for(text).into_iter().map(|(_, code)| code).collect()
    }

    #[test]
    fn test_line_length_counts_terminator() {
        let exact = format!("{}\n", "x".repeat(79));
        assert_eq!(single_line(&exact), vec![RuleCode::S001]);

        let short = format!("{}\n", "x".repeat(78));
        assert!(single_line(&short).is_empty());

        let unterminated = "x".repeat(79);
        assert!(single_line(&unterminated).is_empty());

        let long_comment = format!("# {}\n", "y".repeat(100));
        assert_eq!(single_line(&long_comment), vec![RuleCode::S001]);
    }

    #[test]
    fn test_indentation() {
        for spaces in 0..13 {
            let line = format!("{}x = 1\n", " ".repeat(spaces));
            let fired = single_line(&line).contains(&RuleCode::S002);
            assert_eq!(fired, spaces % 4 != 0, "spaces = {}", spaces);
        }

        // Tabs are not counted
        assert!(single_line("\tx = 1\n").is_empty());
    }

    #[test]
    fn test_semicolon() {
        assert_eq!(single_line("print('hello');\n"), vec![RuleCode::S003]);
        assert_eq!(single_line("    pass;\n"), vec![RuleCode::S003]);
        assert!(single_line("x = 1\n").is_empty());
        assert!(single_line("x = 1;\n").is_empty());

        // Textual match, so semicolons in strings count too
        assert_eq!(single_line("print('a;b');\n"), vec![RuleCode::S003]);
    }

    #[test]
    fn test_comment_spacing() {
        assert_eq!(single_line("x = 1 # note\n"), vec![RuleCode::S004]);
        assert!(single_line("x = 1  # note\n").is_empty());
        assert!(single_line("x = 1   # note\n").is_empty());
        assert!(single_line("# note\n").is_empty());
    }

    #[test]
    fn test_todo() {
        assert_eq!(single_line("x = 1  # TODO fix\n"), vec![RuleCode::S005]);
        assert_eq!(single_line("# todo: later\n"), vec![RuleCode::S005]);
        assert!(single_line("todo = 1\n").is_empty());
    }

    #[test]
    fn test_blank_lines_reported_after_third() {
        let text = "x = 1\n\n\n\n\ny = 2\n";
        assert_eq!(codes_for(text), vec![(5, RuleCode::S006)]);
    }

    #[test]
    fn test_blank_lines_counter_resets_after_report() {
        // Five blank lines: the fourth and fifth start a new run
        let text = "\n\n\n\n\nx = 1\n";
        assert_eq!(codes_for(text), vec![(4, RuleCode::S006)]);

        // Six blank lines fire twice
        let text = "\n\n\n\n\n\nx = 1\n";
        assert_eq!(
            codes_for(text),
            vec![(4, RuleCode::S006), (7, RuleCode::S006)]
        );

        // Two blank lines are fine
        assert!(codes_for("x = 1\n\n\ny = 2\n").is_empty());
    }

    #[test]
    fn test_blank_lines_at_end_of_file() {
        let text = "x = 1\n\n\n\n";
        assert_eq!(codes_for(text), vec![(5, RuleCode::S006)]);
    }

    #[test]
    fn test_whitespace_only_lines_are_blank() {
        let text = "x = 1\n    \n\n    \ny = 2\n";
        let codes = codes_for(text);
        assert!(codes.contains(&(5, RuleCode::S006)));
    }

    #[test]
    fn test_keyword_spacing() {
        let mut sink = Aggregator::new();
        LexicalRuleSet::check_text("test.py", "class  Person:\n", &mut sink);
        let diagnostics = sink.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "Too many spaces after 'class'");

        assert_eq!(single_line("def  run():\n"), vec![RuleCode::S007]);
        assert!(single_line("def run():\n").is_empty());
    }

    #[test]
    fn test_class_name() {
        let mut sink = Aggregator::new();
        LexicalRuleSet::check_text("test.py", "class somename:\n", &mut sink);
        assert_eq!(
            sink.diagnostics()[0].message,
            "Class name 'somename' should be written in CamelCase"
        );

        assert!(single_line("class GoodName:\n").is_empty());
        assert!(single_line("class GoodName(Base):\n").is_empty());

        // Only the lowercase prefix is named
        let mut sink = Aggregator::new();
        LexicalRuleSet::check_text("test.py", "class my_class:\n", &mut sink);
        assert_eq!(sink.diagnostics().len(), 1);
        assert_eq!(
            sink.diagnostics()[0].message,
            "Class name 'my' should be written in CamelCase"
        );

        // Nested classes are not checked
        assert!(single_line("    class bad:\n").is_empty());
    }

    #[test]
    fn test_function_name() {
        assert!(single_line("def __init__(self):\n").is_empty());
        assert!(single_line("def snake_case():\n").is_empty());

        let mut sink = Aggregator::new();
        LexicalRuleSet::check_text("test.py", "def MyFunc():\n", &mut sink);
        assert_eq!(sink.diagnostics()[0].code, RuleCode::S009);
        assert_eq!(
            sink.diagnostics()[0].message,
            "Function name MyFunc should be written in snake_case"
        );
    }

    #[test]
    fn test_multiple_codes_on_one_line_in_order() {
        let line = "   print('x'); # TODO\n";
        assert_eq!(
            single_line(line),
            vec![RuleCode::S002, RuleCode::S003, RuleCode::S004, RuleCode::S005]
        );
    }

    #[test]
    fn test_normalize_newlines() {
        assert_eq!(normalize_newlines("a\r\nb\rc\n"), "a\nb\nc\n");
        let lines: Vec<_> = split_lines("a\nb").collect();
        assert_eq!(lines, vec!["a\n", "b"]);
    }
}
