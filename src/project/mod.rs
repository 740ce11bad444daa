//! Project helpers: running the pipeline over a set of inputs.
//!
//! [`Converter`] is the whole pipeline: parse and extract every input (in
//! parallel), link once, emit sequentially. [`file_loader`] collects inputs
//! from disk, [`build_file`] reads a Gradle project's layout and name, and
//! [`output`] writes a run's files atomically.

pub mod build_file;
pub mod file_loader;
pub mod output;

use std::sync::Arc;

use rayon::prelude::*;
use tracing::{info, warn};

use crate::base::Span;
use crate::emit::{ConversionUnit, TargetProfile, emit};
use crate::hir::{Diagnostic, DiagnosticCollector, SourceUnit, extract, link};
use crate::syntax::{ParseError, parse};

pub use build_file::{BuildDependency, BuildFile, BuildFileError};
pub use file_loader::{ProjectSources, collect_project, collect_sources};
pub use output::{OutputError, write_atomic};

/// One input file
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceInput {
    /// Name used in diagnostics, usually the path relative to the input root
    pub unit_name: String,
    pub text: String,
}

impl SourceInput {
    pub fn new(unit_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            unit_name: unit_name.into(),
            text: text.into(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ConverterOptions {
    pub profile: TargetProfile,
    /// Parse and extract inputs on the rayon pool
    pub parallel: bool,
}

impl Default for ConverterOptions {
    fn default() -> Self {
        Self {
            profile: TargetProfile::default(),
            parallel: true,
        }
    }
}

/// Outcome of a run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunStatus {
    /// Every unit converted
    Success,
    /// Some units failed, at least one converted
    PartialSuccess,
    /// Linking failed, or nothing converted
    Failed,
}

#[derive(Clone, Debug)]
pub struct ConversionRun {
    pub status: RunStatus,
    pub units: Vec<ConversionUnit>,
    /// Scaffold files; empty when nothing converted
    pub support_files: Vec<ConversionUnit>,
    pub diagnostics: Vec<Diagnostic>,
    /// Input names of the units that produced no output
    pub failed_units: Vec<Arc<str>>,
}

impl ConversionRun {
    /// Converted units followed by the scaffold files
    pub fn files(&self) -> impl Iterator<Item = &ConversionUnit> {
        self.units.iter().chain(&self.support_files)
    }

    fn failed(diagnostics: Vec<Diagnostic>, failed_units: Vec<Arc<str>>) -> Self {
        Self {
            status: RunStatus::Failed,
            units: Vec::new(),
            support_files: Vec::new(),
            diagnostics,
            failed_units,
        }
    }
}

/// Runs the conversion pipeline with fixed options.
#[derive(Clone, Debug, Default)]
pub struct Converter {
    options: ConverterOptions,
}

impl Converter {
    pub fn new(options: ConverterOptions) -> Self {
        Self { options }
    }

    pub fn with_profile(profile: TargetProfile) -> Self {
        Self::new(ConverterOptions {
            profile,
            ..ConverterOptions::default()
        })
    }

    pub fn options(&self) -> &ConverterOptions {
        &self.options
    }

    pub fn convert(&self, inputs: &[SourceInput]) -> ConversionRun {
        let front: Vec<FrontEnd> = if self.options.parallel {
            inputs.par_iter().map(front_end).collect()
        } else {
            inputs.iter().map(front_end).collect()
        };

        let mut diagnostics = DiagnosticCollector::new();
        let mut failed_units: Vec<Arc<str>> = Vec::new();
        let mut units = Vec::with_capacity(front.len());
        for result in front {
            match result {
                Ok((unit, unit_diagnostics)) => {
                    diagnostics.extend(unit_diagnostics);
                    units.push(unit);
                }
                Err(error) => {
                    warn!(unit = %error.unit_name, %error, "unit failed to parse");
                    diagnostics.add(parse_diagnostic(&error));
                    failed_units.push(Arc::from(error.unit_name.as_str()));
                }
            }
        }

        let model = match link(units) {
            Ok(model) => model,
            Err(error) => {
                warn!(%error, "linking failed");
                diagnostics.add(error.to_diagnostic());
                failed_units.push(error.unit().clone());
                return ConversionRun::failed(diagnostics.take(), failed_units);
            }
        };

        let output = emit(&model, &self.options.profile);
        for error in &output.errors {
            warn!(unit = %error.unit(), %error, "unit failed to emit");
        }
        for skipped in &output.skipped {
            warn!(unit = %skipped, "unit skipped after a dependency failed");
        }
        diagnostics.extend(output.diagnostics.iter().cloned());
        failed_units.extend(output.failed_units());

        let status = if failed_units.is_empty() {
            RunStatus::Success
        } else if output.units.is_empty() {
            RunStatus::Failed
        } else {
            RunStatus::PartialSuccess
        };
        let support_files = if output.units.is_empty() {
            Vec::new()
        } else {
            output.support
        };
        info!(
            profile = %self.options.profile.name,
            converted = output.units.len(),
            failed = failed_units.len(),
            errors = diagnostics.error_count(),
            warnings = diagnostics.warning_count(),
            status = ?status,
            "conversion finished"
        );
        ConversionRun {
            status,
            units: output.units,
            support_files,
            diagnostics: diagnostics.take(),
            failed_units,
        }
    }
}

type FrontEnd = Result<(SourceUnit, Vec<Diagnostic>), ParseError>;

fn front_end(input: &SourceInput) -> FrontEnd {
    let file = parse(&input.text, &input.unit_name)?;
    let mut diagnostics = DiagnosticCollector::new();
    let unit = extract(&file, &mut diagnostics);
    Ok((unit, diagnostics.take()))
}

fn parse_diagnostic(error: &ParseError) -> Diagnostic {
    Diagnostic::error(error.unit_name.as_str(), error.reason.as_str())
        .with_code(error.code.as_str())
        .with_span(Span::new(error.position, error.position))
}
