//! Shared fixtures and pipeline helpers for the integration tests.

#![allow(dead_code)]

pub mod model_helpers;
pub mod source_fixtures;
