//! Syntax-level parsing interface.
//!
//! Turns source text into a [`SyntaxFile`], failing only when the structure of
//! the unit is broken beyond recovery.

use thiserror::Error;
use tracing::debug;

use crate::base::{LineIndex, Position};
use crate::parser::{ErrorCode, parse_java};
use crate::syntax::file::SyntaxFile;

/// A unit that cannot be parsed at all
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{unit_name}:{position}: {reason}")]
pub struct ParseError {
    pub unit_name: String,
    pub position: Position,
    pub reason: String,
    pub code: ErrorCode,
}

impl ParseError {
    pub fn new(
        unit_name: impl Into<String>,
        position: Position,
        reason: impl Into<String>,
        code: ErrorCode,
    ) -> Self {
        Self {
            unit_name: unit_name.into(),
            position,
            reason: reason.into(),
            code,
        }
    }
}

/// Parse one source unit.
///
/// Unrecognized constructs are kept as `ERROR` nodes on the returned file.
/// Only unterminated literals and unbalanced delimiters produce a `ParseError`.
pub fn parse(text: &str, unit_name: &str) -> Result<SyntaxFile, ParseError> {
    let parse = parse_java(text);
    if let Some(fatal) = parse.fatal_error() {
        let lc = LineIndex::new(text).line_col(fatal.range.start());
        return Err(ParseError::new(
            unit_name,
            Position::new(lc.line, lc.col),
            fatal.message.clone(),
            fatal.code,
        ));
    }
    debug!(
        unit = unit_name,
        errors = parse.errors.len(),
        "parsed unit"
    );
    Ok(SyntaxFile::new(unit_name, text, parse))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ok() {
        let file = parse("package p;\nclass A {}\n", "p/A.java").expect("parse");
        assert_eq!(&**file.unit_name(), "p/A.java");
        assert!(!file.has_errors());
    }

    #[test]
    fn test_unclosed_brace_reports_position() {
        let err = parse("class A {\n  void m() {\n}\n", "A.java").unwrap_err();
        assert_eq!(err.unit_name, "A.java");
        assert_eq!(err.code, ErrorCode::E0202);
        assert_eq!(err.position.line, 3);
        assert!(err.to_string().starts_with("A.java:4:1:"));
    }

    #[test]
    fn test_unterminated_comment() {
        let err = parse("class A {} /* never closed", "A.java").unwrap_err();
        assert_eq!(err.code, ErrorCode::E0103);
        assert_eq!(err.position, Position::new(0, 11));
    }
}
