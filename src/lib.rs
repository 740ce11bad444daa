//! # testport-base
//!
//! Converts Selenium/JUnit browser tests written in Java into Playwright or
//! WebdriverIO test projects.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! project   → Converter runs, source collection, atomic output
//!   ↓
//! emit      → Target profiles and per-unit rendering
//!   ↓
//! hir       → Source units, actions, linking into an ActionModel
//!   ↓
//! syntax    → SyntaxFile, ParseError
//!   ↓
//! parser    → Logos lexer, recursive-descent parser, rowan CST
//!   ↓
//! base      → Primitives (Position, Span, LineIndex)
//! ```
//!
//! ## Example
//!
//! ```
//! use testport::project::{Converter, RunStatus, SourceInput};
//!
//! let source = r#"
//! public class LoginTest {
//!     WebDriver driver;
//!     @Test public void opens() { driver.get("https://example.com"); }
//! }
//! "#;
//! let run = Converter::default().convert(&[SourceInput::new("LoginTest.java", source)]);
//! assert_eq!(run.status, RunStatus::Success);
//! assert!(run.units[0].text.contains("await page.goto('https://example.com');"));
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → syntax → hir → emit → project)
// ============================================================================

/// Foundation types: Position, Span, line indexing
pub mod base;

/// Parser: Logos lexer, recursive-descent parser, rowan CST
pub mod parser;

/// Syntax: parsed units and fatal parse errors
pub mod syntax;

/// High-level IR: source units, actions and the linked action model
pub mod hir;

/// Emission through target profiles
pub mod emit;

/// Pipeline runs, source collection and output
pub mod project;

// Re-export the pipeline stages
pub use emit::{ConversionKind, ConversionUnit, EmitError, EmitOutput, TargetProfile, emit};
pub use hir::{ActionModel, Diagnostic, LinkError, Severity, SourceUnit, extract, link};
pub use project::{BuildFile, ConversionRun, Converter, ConverterOptions, RunStatus, SourceInput};
pub use syntax::{ParseError, SyntaxFile, parse};

// Re-export foundation types
pub use base::{LineCol, LineIndex, Position, Span, TextRange, TextSize};
