//! Error code definitions for parser diagnostics
//!
//! Error codes follow a naming convention: E{category}{number}
//! - E01xx: Lexical errors (invalid tokens)
//! - E02xx: Structural errors (braces, semicolons)
//! - E03xx: Declaration errors (classes, members)
//! - E04xx: Expression and statement errors
//! - E09xx: Generic/fallback errors

use std::fmt;

/// Error codes for parser diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // E01xx: Lexical errors (invalid tokens)
    // =========================================================================
    /// Invalid or unexpected character in source
    E0101,
    /// Unterminated string or char literal
    E0102,
    /// Unterminated block comment
    E0103,

    // =========================================================================
    // E02xx: Structural errors (braces, semicolons, delimiters)
    // =========================================================================
    /// Missing semicolon
    E0201,
    /// Unclosed delimiter `{`, `(` or `[`
    E0202,
    /// Unexpected closing delimiter
    E0205,
    /// Mismatched delimiters
    E0207,

    // =========================================================================
    // E03xx: Declaration errors
    // =========================================================================
    /// Missing identifier/name
    E0301,
    /// Unexpected token in a class body
    E0304,
    /// Missing type
    E0305,
    /// Missing body (neither `;` nor `{`)
    E0307,

    // =========================================================================
    // E04xx: Expression and statement errors
    // =========================================================================
    /// Invalid expression
    E0401,
    /// Unclosed method call
    E0404,
    /// Missing expression where expected
    E0406,

    // =========================================================================
    // E09xx: Generic/fallback errors
    // =========================================================================
    /// Unexpected token in current context
    E0901,
    /// Expected a specific token
    E0902,
}

impl ErrorCode {
    /// Get the string representation of the error code (e.g., "E0201")
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::E0101 => "E0101",
            Self::E0102 => "E0102",
            Self::E0103 => "E0103",
            Self::E0201 => "E0201",
            Self::E0202 => "E0202",
            Self::E0205 => "E0205",
            Self::E0207 => "E0207",
            Self::E0301 => "E0301",
            Self::E0304 => "E0304",
            Self::E0305 => "E0305",
            Self::E0307 => "E0307",
            Self::E0401 => "E0401",
            Self::E0404 => "E0404",
            Self::E0406 => "E0406",
            Self::E0901 => "E0901",
            Self::E0902 => "E0902",
        }
    }

    /// Get a short description of the error category
    pub fn category_description(&self) -> &'static str {
        match self {
            Self::E0101 | Self::E0102 | Self::E0103 => "lexical error",
            Self::E0201 | Self::E0202 | Self::E0205 | Self::E0207 => "structural error",
            Self::E0301 | Self::E0304 | Self::E0305 | Self::E0307 => "declaration error",
            Self::E0401 | Self::E0404 | Self::E0406 => "expression error",
            Self::E0901 | Self::E0902 => "syntax error",
        }
    }

    /// Get the default message template for this error code
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::E0101 => "invalid character",
            Self::E0102 => "unterminated literal",
            Self::E0103 => "unterminated block comment",
            Self::E0201 => "missing semicolon",
            Self::E0202 => "unclosed delimiter",
            Self::E0205 => "unexpected closing delimiter",
            Self::E0207 => "mismatched delimiters",
            Self::E0301 => "missing identifier",
            Self::E0304 => "unexpected token in class body",
            Self::E0305 => "missing type",
            Self::E0307 => "missing body",
            Self::E0401 => "invalid expression",
            Self::E0404 => "unclosed method call",
            Self::E0406 => "expected expression",
            Self::E0901 => "unexpected token",
            Self::E0902 => "expected token",
        }
    }

    /// Errors that make the whole unit unusable. Everything else recovers into an
    /// `ERROR` node and is later passed through as opaque text.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::E0102 | Self::E0103 | Self::E0202 | Self::E0205 | Self::E0207
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_as_str() {
        assert_eq!(ErrorCode::E0201.as_str(), "E0201");
        assert_eq!(ErrorCode::E0901.to_string(), "E0901");
    }

    #[test]
    fn test_fatal_codes_are_lexical_or_structural() {
        for code in [ErrorCode::E0102, ErrorCode::E0103, ErrorCode::E0202, ErrorCode::E0207] {
            assert!(code.is_fatal(), "{code} should be fatal");
            assert_ne!(code.category_description(), "expression error");
        }
        assert!(!ErrorCode::E0201.is_fatal());
        assert!(!ErrorCode::E0406.is_fatal());
    }
}
