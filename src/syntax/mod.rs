// Syntax layer: parsed units with line information
pub mod file;
pub mod parser;

pub use file::SyntaxFile;
pub use parser::{ParseError, parse};

// Re-export Position and Span from base for convenience
pub use crate::base::{Position, Span};
