//! Syntax file wrapper for parsed Java test sources.
//!
//! Bundles the rowan parse result with the unit name and a line index so that
//! later stages can turn CST ranges into provenance spans.

use std::sync::Arc;

use crate::base::{LineIndex, Position, Span, TextRange, TextSize};
use crate::parser::{AstNode, Parse, SourceFile, SyntaxError, SyntaxNode};

/// A parsed source unit that wraps a rowan Parse result.
#[derive(Debug, Clone)]
pub struct SyntaxFile {
    unit_name: Arc<str>,
    parse: Parse,
    line_index: LineIndex,
}

// Two SyntaxFiles are equal if they belong to the same unit and carry the same errors
impl PartialEq for SyntaxFile {
    fn eq(&self, other: &Self) -> bool {
        self.unit_name == other.unit_name && self.parse.errors == other.parse.errors
    }
}

impl Eq for SyntaxFile {}

impl SyntaxFile {
    pub(crate) fn new(unit_name: &str, text: &str, parse: Parse) -> Self {
        Self {
            unit_name: Arc::from(unit_name),
            parse,
            line_index: LineIndex::new(text),
        }
    }

    pub fn unit_name(&self) -> &Arc<str> {
        &self.unit_name
    }

    /// Get the underlying parse result
    pub fn parse(&self) -> &Parse {
        &self.parse
    }

    pub fn syntax(&self) -> SyntaxNode {
        self.parse.syntax()
    }

    /// Get the root source file AST node
    pub fn source_file(&self) -> Option<SourceFile> {
        SourceFile::cast(self.parse.syntax())
    }

    /// Recoverable errors the parser worked around
    pub fn errors(&self) -> &[SyntaxError] {
        &self.parse.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.parse.errors.is_empty()
    }

    /// Whether a recovered error lies inside `range`
    pub fn has_error_in(&self, range: TextRange) -> bool {
        self.parse
            .errors
            .iter()
            .any(|e| range.contains_range(e.range) || range.contains(e.range.start()))
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    pub fn position(&self, offset: TextSize) -> Position {
        let lc = self.line_index.line_col(offset);
        Position::new(lc.line, lc.col)
    }

    /// Convert a CST range to a line/column span, ignoring trailing trivia
    pub fn span(&self, node: &SyntaxNode) -> Span {
        let range = significant_range(node);
        Span::new(self.position(range.start()), self.position(range.end()))
    }
}

/// Range of `node` without leading or trailing trivia
fn significant_range(node: &SyntaxNode) -> TextRange {
    let mut tokens = node
        .descendants_with_tokens()
        .filter_map(|e| e.into_token())
        .filter(|t| !t.kind().is_trivia());
    let Some(first) = tokens.next() else {
        return node.text_range();
    };
    let last = tokens.last().unwrap_or_else(|| first.clone());
    TextRange::new(first.text_range().start(), last.text_range().end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::SyntaxKind;
    use crate::syntax::parse;

    #[test]
    fn test_span_skips_trivia() {
        let file = parse("class A {\n  void m() {\n    go();\n  }\n}\n", "A.java").expect("parse");
        let stmt = file
            .syntax()
            .descendants()
            .find(|n| n.kind() == SyntaxKind::EXPR_STMT)
            .expect("statement");
        let span = file.span(&stmt);
        assert_eq!(span.start, Position::new(2, 4));
        assert_eq!(span.end, Position::new(2, 9));
    }

    #[test]
    fn test_errors_are_located() {
        let file = parse("class A { void m() { a.b(,); } }", "A.java").expect("parse");
        assert!(file.has_errors());
        let stmt = file
            .syntax()
            .descendants()
            .find(|n| n.kind() == SyntaxKind::EXPR_STMT)
            .expect("statement");
        assert!(file.has_error_in(stmt.text_range()));
    }
}
