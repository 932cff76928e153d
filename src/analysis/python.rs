//! Python language analyzer using tree-sitter.

use std::path::Path;

use streaming_iterator::StreamingIterator;
use tree_sitter::{Language, Node, Parser, Query, QueryCursor};

use crate::analysis::{
    AssignTarget, Assignment, DefaultValue, FileFacts, FunctionDef, LanguageAnalyzer, Parameter,
    ParsedFile,
};
use crate::error::{CheckError, UnsupportedTarget};

/// Every function definition, nested ones and methods included.
const FUNCTION_QUERY: &str = r#"
(function_definition) @function
"#;

/// Python 2 statements the grammar still accepts but Python 3 rejects.
const LEGACY_STATEMENT_KINDS: &[&str] = &["print_statement", "exec_statement"];

/// Nodes that begin a logical line without being a direct child of a block.
const LINE_START_KINDS: &[&str] = &[
    "elif_clause",
    "else_clause",
    "except_clause",
    "except_group_clause",
    "finally_clause",
    "case_clause",
    "function_definition",
    "class_definition",
];

/// Column width of a tab under the primary and the alternate tab size.
const TAB_SIZE: usize = 8;
const ALT_TAB_SIZE: usize = 1;

pub struct PythonAnalyzer {
    language: Language,
}

impl PythonAnalyzer {
    pub fn new() -> Self {
        Self {
            language: tree_sitter_python::LANGUAGE.into(),
        }
    }

    fn create_parser(&self) -> Result<Parser, CheckError> {
        let mut parser = Parser::new();
        parser.set_language(&self.language)?;
        Ok(parser)
    }

    fn extract_functions(&self, parsed: &ParsedFile) -> Result<Vec<FunctionDef>, CheckError> {
        let query = Query::new(&self.language, FUNCTION_QUERY)?;
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&query, parsed.tree.root_node(), &parsed.source[..]);

        let mut functions = Vec::new();

        while let Some(m) = matches.next() {
            for capture in m.captures {
                // `async def` is a separate statement kind in Python's own tree
                if is_async(capture.node) {
                    continue;
                }
                functions.push(self.extract_function(parsed, capture.node));
            }
        }

        Ok(functions)
    }

    fn extract_function(&self, parsed: &ParsedFile, func_node: Node) -> FunctionDef {
        let name = func_node
            .child_by_field_name("name")
            .map(|n| parsed.node_text(n).to_string())
            .unwrap_or_default();

        let (params, defaults) = match func_node.child_by_field_name("parameters") {
            Some(params_node) => self.extract_parameters(parsed, params_node),
            None => (Vec::new(), Vec::new()),
        };

        let assignments = func_node
            .child_by_field_name("body")
            .map(|body| self.extract_assignments(parsed, body))
            .unwrap_or_default();

        FunctionDef {
            name,
            line: line_of(func_node),
            params,
            defaults,
            assignments,
        }
    }

    /// Collect positional-or-keyword parameters and positional defaults.
    ///
    /// Parameters before `/` only contribute defaults. Everything from `*`,
    /// `*args` or `**kwargs` onward is ignored.
    fn extract_parameters(
        &self,
        parsed: &ParsedFile,
        params_node: Node,
    ) -> (Vec<Parameter>, Vec<DefaultValue>) {
        let mut positional: Vec<Parameter> = Vec::new();
        let mut defaults = Vec::new();
        let mut positional_only = 0;

        for child in params_node.named_children(&mut params_node.walk()) {
            match child.kind() {
                "identifier" => positional.push(self.parameter(parsed, child)),
                "typed_parameter" => match child.named_child(0) {
                    Some(inner) if inner.kind() == "identifier" => {
                        positional.push(self.parameter(parsed, inner));
                    }
                    // `*args: T` or `**kwargs: T`
                    _ => break,
                },
                "default_parameter" | "typed_default_parameter" => {
                    if let Some(name) = child.child_by_field_name("name") {
                        positional.push(self.parameter(parsed, name));
                    }
                    if let Some(value) = child.child_by_field_name("value") {
                        defaults.push(self.default_value(parsed, value));
                    }
                }
                "positional_separator" => positional_only = positional.len(),
                "keyword_separator" | "list_splat_pattern" | "dictionary_splat_pattern" => break,
                _ => {}
            }
        }

        (positional.split_off(positional_only), defaults)
    }

    fn parameter(&self, parsed: &ParsedFile, name_node: Node) -> Parameter {
        Parameter {
            name: parsed.node_text(name_node).to_string(),
            line: line_of(name_node),
        }
    }

    fn default_value(&self, parsed: &ParsedFile, value: Node) -> DefaultValue {
        let expr = unwrap_parentheses(value);
        DefaultValue {
            line: line_of(expr),
            kind: expr.kind().to_string(),
            is_constant: is_constant(parsed, expr),
        }
    }

    /// Plain assignments that are direct children of a function body.
    ///
    /// Statements nested in `if`/`for`/`with`/`try` blocks are not visited.
    fn extract_assignments(&self, parsed: &ParsedFile, body_node: Node) -> Vec<Assignment> {
        let mut assignments = Vec::new();

        for stmt in body_node.named_children(&mut body_node.walk()) {
            if stmt.kind() != "expression_statement" {
                continue;
            }
            let Some(expr) = stmt.named_child(0) else {
                continue;
            };
            if expr.kind() != "assignment" || expr.child_by_field_name("type").is_some() {
                continue;
            }

            // `a = b = value` nests the second assignment on the right
            let mut targets = Vec::new();
            let mut current = Some(expr);
            while let Some(assign) = current {
                if assign.kind() != "assignment" || assign.child_by_field_name("type").is_some() {
                    break;
                }
                if let Some(left) = assign.child_by_field_name("left") {
                    targets.push(self.resolve_target(parsed, left));
                }
                current = assign.child_by_field_name("right");
            }

            assignments.push(Assignment {
                line: line_of(stmt),
                targets,
            });
        }

        assignments
    }

    fn resolve_target(
        &self,
        parsed: &ParsedFile,
        target: Node,
    ) -> Result<AssignTarget, UnsupportedTarget> {
        let unsupported = || UnsupportedTarget {
            kind: target.kind().to_string(),
            line: line_of(target),
        };

        match target.kind() {
            "identifier" => Ok(AssignTarget::Simple(parsed.node_text(target).to_string())),
            "attribute" => {
                let (object, attr) = attribute_parts(target).ok_or_else(unsupported)?;
                let attr = parsed.node_text(attr).to_string();
                match object.kind() {
                    "identifier" => Ok(AssignTarget::Attribute {
                        base: parsed.node_text(object).to_string(),
                        attr,
                    }),
                    "attribute" => match attribute_parts(object) {
                        Some((base, mid)) if base.kind() == "identifier" => {
                            Ok(AssignTarget::NestedAttribute {
                                base: parsed.node_text(base).to_string(),
                                mid: parsed.node_text(mid).to_string(),
                                attr,
                            })
                        }
                        _ => Err(unsupported()),
                    },
                    _ => Err(unsupported()),
                }
            }
            _ => Err(unsupported()),
        }
    }
}

impl Default for PythonAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageAnalyzer for PythonAnalyzer {
    fn language_id(&self) -> &'static str {
        "python"
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        &["py"]
    }

    fn parse(&self, path: &Path, source: &[u8]) -> Result<ParsedFile, CheckError> {
        let path = path.to_string_lossy().to_string();
        let mut parser = self.create_parser()?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| CheckError::Parse { path: path.clone() })?;

        let root = tree.root_node();
        if root.has_error() || has_rejected_construct(root) || has_ambiguous_tabs(root, source) {
            return Err(CheckError::Parse { path });
        }

        Ok(ParsedFile {
            tree,
            source: source.to_vec(),
            path,
        })
    }

    fn extract_facts(&self, parsed: &ParsedFile) -> Result<FileFacts, CheckError> {
        Ok(FileFacts {
            path: parsed.path.clone(),
            functions: self.extract_functions(parsed)?,
        })
    }
}

fn line_of(node: Node) -> usize {
    node.start_position().row + 1 // tree-sitter is 0-indexed
}

fn is_async(func_node: Node) -> bool {
    func_node
        .child(0)
        .map(|first| first.kind() == "async")
        .unwrap_or(false)
}

fn attribute_parts(node: Node) -> Option<(Node, Node)> {
    Some((
        node.child_by_field_name("object")?,
        node.child_by_field_name("attribute")?,
    ))
}

fn unwrap_parentheses(mut node: Node) -> Node {
    while node.kind() == "parenthesized_expression" {
        match node.named_child(0) {
            Some(inner) => node = inner,
            None => break,
        }
    }
    node
}

/// Literal constants: numbers, non-formatted strings, `True`, `False`,
/// `None` and `...`.
fn is_constant(parsed: &ParsedFile, expr: Node) -> bool {
    match expr.kind() {
        "integer" | "float" | "true" | "false" | "none" | "ellipsis" => true,
        "string" => !is_format_string(parsed, expr),
        "concatenated_string" => expr
            .named_children(&mut expr.walk())
            .all(|part| part.kind() == "string" && !is_format_string(parsed, part)),
        _ => false,
    }
}

fn is_format_string(parsed: &ParsedFile, string: Node) -> bool {
    string.named_children(&mut string.walk()).any(|child| match child.kind() {
        "interpolation" => true,
        "string_start" => parsed.node_text(child).to_lowercase().contains('f'),
        _ => false,
    })
}

/// Constructs the grammar accepts without an ERROR node but Python 3 rejects.
fn has_rejected_construct(root: Node) -> bool {
    any_node(root, |node| {
        LEGACY_STATEMENT_KINDS.contains(&node.kind())
            || (matches!(node.kind(), "parameters" | "lambda_parameters")
                && has_required_after_default(node))
    })
}

/// A required positional parameter after a defaulted one, e.g. `def f(a=1, b)`.
///
/// Keyword-only parameters after `*` or `*args` may go without defaults.
fn has_required_after_default(params_node: Node) -> bool {
    let mut seen_default = false;
    for child in params_node.named_children(&mut params_node.walk()) {
        match child.kind() {
            "default_parameter" | "typed_default_parameter" => seen_default = true,
            "identifier" => {
                if seen_default {
                    return true;
                }
            }
            "typed_parameter" => match child.named_child(0) {
                Some(inner) if inner.kind() == "identifier" => {
                    if seen_default {
                        return true;
                    }
                }
                _ => return false,
            },
            "keyword_separator" | "list_splat_pattern" | "dictionary_splat_pattern" => {
                return false
            }
            _ => {}
        }
    }
    false
}

/// Indentation that mixes tabs and spaces so that its meaning depends on the
/// tab size.
///
/// Each logical line's indent is measured with tabs of width 8 and width 1.
/// Both measurements must agree on whether the line indents, dedents or stays
/// at the level of the enclosing block.
fn has_ambiguous_tabs(root: Node, source: &[u8]) -> bool {
    let lines: Vec<&[u8]> = source.split(|&b| b == b'\n').collect();

    let mut rows = Vec::new();
    any_node(root, |node| {
        if starts_logical_line(node) {
            let position = node.start_position();
            let indent = lines.get(position.row).map(|line| indent_width(line)).unwrap_or(0);
            if position.column == indent {
                rows.push(position.row);
            }
        }
        false
    });
    rows.sort_unstable();
    rows.dedup();

    let mut levels = vec![(0usize, 0usize)];
    for row in rows {
        let Some(line) = lines.get(row) else {
            continue;
        };
        let (col, alt_col) = indent_columns(line);
        let Some(&(top_col, top_alt)) = levels.last() else {
            return true;
        };

        if col == top_col {
            if alt_col != top_alt {
                return true;
            }
        } else if col > top_col {
            if alt_col <= top_alt {
                return true;
            }
            levels.push((col, alt_col));
        } else {
            while levels.len() > 1 && levels.last().map_or(false, |&(c, _)| col < c) {
                levels.pop();
            }
            if levels.last() != Some(&(col, alt_col)) {
                return true;
            }
        }
    }
    false
}

fn starts_logical_line(node: Node) -> bool {
    if !node.is_named() || node.kind() == "comment" {
        return false;
    }
    LINE_START_KINDS.contains(&node.kind())
        || node
            .parent()
            .map(|parent| matches!(parent.kind(), "module" | "block"))
            .unwrap_or(false)
}

fn indent_width(line: &[u8]) -> usize {
    line.iter()
        .take_while(|&&b| matches!(b, b' ' | b'\t' | b'\x0c'))
        .count()
}

/// Indent column under `TAB_SIZE` and under `ALT_TAB_SIZE`.
fn indent_columns(line: &[u8]) -> (usize, usize) {
    let mut col = 0;
    let mut alt_col = 0;
    for &b in &line[..indent_width(line)] {
        match b {
            b' ' => {
                col += 1;
                alt_col += 1;
            }
            b'\t' => {
                col = (col / TAB_SIZE + 1) * TAB_SIZE;
                alt_col = (alt_col / ALT_TAB_SIZE + 1) * ALT_TAB_SIZE;
            }
            // form feed resets the column
            _ => {
                col = 0;
                alt_col = 0;
            }
        }
    }
    (col, alt_col)
}

/// Depth-first walk that stops as soon as `pred` returns true.
fn any_node<'a>(root: Node<'a>, mut pred: impl FnMut(Node<'a>) -> bool) -> bool {
    let mut cursor = root.walk();
    loop {
        if pred(cursor.node()) {
            return true;
        }
        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facts_for(source: &str) -> FileFacts {
        let analyzer = PythonAnalyzer::new();
        let parsed = analyzer
            .parse(Path::new("test.py"), source.as_bytes())
            .unwrap();
        analyzer.extract_facts(&parsed).unwrap()
    }

    #[test]
    fn test_extract_functions() {
        let source = r#"
def simple():
    pass

class MyClass:
    def method(self):
        def inner():
            pass

async def fetch():
    pass
"#;
        let facts = facts_for(source);
        let names: Vec<_> = facts.functions.iter().map(|f| f.name.as_str()).collect();

        assert!(names.contains(&"simple"));
        assert!(names.contains(&"method"));
        assert!(names.contains(&"inner"));
        assert!(!names.contains(&"fetch"));
    }

    #[test]
    fn test_parameter_sections() {
        let source = "def f(a, /, b, c: int, d=1, *args, e=[], **kwargs):\n    pass\n";
        let facts = facts_for(source);
        let func = &facts.functions[0];

        let names: Vec<_> = func.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c", "d"]);

        // Only the positional default is collected, not the keyword-only one
        assert_eq!(func.defaults.len(), 1);
        assert!(func.defaults[0].is_constant);
    }

    #[test]
    fn test_positional_only_defaults_collected() {
        let facts = facts_for("def f(a=[], /, b=None):\n    pass\n");
        let func = &facts.functions[0];

        assert_eq!(func.params.len(), 1);
        assert_eq!(func.defaults.len(), 2);
        assert!(!func.defaults[0].is_constant);
        assert!(func.defaults[1].is_constant);
    }

    #[test]
    fn test_default_constants() {
        let source = r#"
def f(a=5, b=None, c="x", d=(3), e=True, f=..., g=1.5, h="a" "b"):
    pass

def g(a=[], b={}, c=list(), d=-1, e=f"{x}", f=(1, 2), g=name):
    pass
"#;
        let facts = facts_for(source);

        assert!(facts.functions[0].defaults.iter().all(|d| d.is_constant));
        assert!(facts.functions[1].defaults.iter().all(|d| !d.is_constant));
        assert_eq!(facts.functions[1].defaults.len(), 7);
    }

    #[test]
    fn test_assignment_targets() {
        let source = r#"
def f(self):
    x = 1
    self.name = 2
    self.config.port = 3
    a = b = 4
    items[0] = 5
    first, second = 6, 7
    self.a.b.c = 8
    count: int = 9
    total += 10
    if x:
        Hidden = 11
"#;
        let facts = facts_for(source);
        let assignments = &facts.functions[0].assignments;

        assert_eq!(assignments.len(), 7);
        assert_eq!(assignments[0].targets, vec![Ok(AssignTarget::Simple("x".into()))]);
        assert_eq!(
            assignments[1].targets,
            vec![Ok(AssignTarget::Attribute {
                base: "self".into(),
                attr: "name".into(),
            })]
        );
        assert_eq!(
            assignments[2].targets,
            vec![Ok(AssignTarget::NestedAttribute {
                base: "self".into(),
                mid: "config".into(),
                attr: "port".into(),
            })]
        );
        assert_eq!(assignments[3].targets.len(), 2);
        assert!(assignments[4].targets[0].is_err());
        assert!(assignments[5].targets[0].is_err());
        assert!(assignments[6].targets[0].is_err());
        assert_eq!(assignments[6].line, 9);
    }

    #[test]
    fn test_parse_failure() {
        let analyzer = PythonAnalyzer::new();
        assert!(analyzer
            .parse(Path::new("bad.py"), b"def broken(:\n    pass\n")
            .is_err());
        assert!(analyzer
            .parse(Path::new("legacy.py"), b"print \"hello\"\n")
            .is_err());
    }

    #[test]
    fn test_required_parameter_after_default_fails() {
        let analyzer = PythonAnalyzer::new();
        let rejected: [&[u8]; 4] = [
            b"def f(data=[], BadArg):\n    pass\n",
            b"def f(a=1, /, b):\n    pass\n",
            b"def f(a: int = 1, b: int):\n    pass\n",
            b"g = lambda a=1, b: a\n",
        ];
        for source in rejected {
            assert!(
                matches!(
                    analyzer.parse(Path::new("t.py"), source),
                    Err(CheckError::Parse { .. })
                ),
                "{}",
                String::from_utf8_lossy(source)
            );
        }

        let accepted: [&[u8]; 3] = [
            b"def f(a, b=1, *args, c, **kwargs):\n    pass\n",
            b"def f(a=1, *, b):\n    pass\n",
            b"def f(a=1, *args: int, b):\n    pass\n",
        ];
        for source in accepted {
            assert!(
                analyzer.parse(Path::new("t.py"), source).is_ok(),
                "{}",
                String::from_utf8_lossy(source)
            );
        }
    }

    #[test]
    fn test_mixed_tab_indentation_fails() {
        let analyzer = PythonAnalyzer::new();
        assert!(matches!(
            analyzer.parse(Path::new("t.py"), b"def f():\n\tif x:\n        pass\n"),
            Err(CheckError::Parse { .. })
        ));

        // Consistent tabs and plain spaces are both fine
        assert!(analyzer
            .parse(Path::new("t.py"), b"def f():\n\tif x:\n\t\tpass\n\treturn 1\n")
            .is_ok());
        assert!(analyzer
            .parse(
                Path::new("t.py"),
                b"class A:\n    def f(self):\n        if x:\n            pass\n        else:\n            y = [\n\t1]\n"
            )
            .is_ok());
    }
}
