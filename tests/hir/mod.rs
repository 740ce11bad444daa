//! HIR layer tests
//!
//! - Extraction of actions and unit kinds from fixtures
//! - Linking: resolved call sites, dependency order, link errors

pub mod tests_extraction;
pub mod tests_linking;
