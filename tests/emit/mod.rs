//! Emission tests
//!
//! - Action order and template use in converted tests
//! - Delegated and inlined page-object calls
//! - Utility modules and support files

pub mod tests_scenarios;
pub mod tests_units;
