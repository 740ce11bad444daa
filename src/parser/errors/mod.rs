//! Parser errors
//!
//! - Error codes grouped by category (lexical, structural, declaration, expression)
//! - Syntax errors with a hint and related locations such as "opened here"

mod codes;
mod error;

pub use codes::ErrorCode;
pub use error::{RelatedInfo, SyntaxError, SyntaxErrorBuilder};
