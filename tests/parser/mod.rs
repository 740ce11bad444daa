//! Parser layer tests
//!
//! - Token kinds produced by the lexer
//! - Lossless CST construction over real test sources
//! - Fatal errors surfaced through `syntax::parse`

pub mod tests_lexer;
pub mod tests_parse;
