//! Project-level tests: whole runs from disk to disk.

pub mod tests_runs;
