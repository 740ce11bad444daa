//! Pipeline helpers: parse, extract and link fixtures.

use testport::hir::{ActionModel, Diagnostic, DiagnosticCollector, LinkError, SourceUnit, extract, link};
use testport::{EmitOutput, TargetProfile, emit, parse};

/// Parse and extract one source, panicking on a fatal parse error.
pub fn unit_from(name: &str, source: &str) -> SourceUnit {
    unit_with_diagnostics(name, source).0
}

pub fn unit_with_diagnostics(name: &str, source: &str) -> (SourceUnit, Vec<Diagnostic>) {
    let file = parse(source, name).unwrap_or_else(|e| panic!("{name} failed to parse: {e}"));
    let mut diagnostics = DiagnosticCollector::new();
    let unit = extract(&file, &mut diagnostics);
    (unit, diagnostics.take())
}

/// Link `(unit name, source)` pairs.
pub fn try_model(sources: &[(&str, &str)]) -> Result<ActionModel, LinkError> {
    link(sources.iter().map(|(name, text)| unit_from(name, text)).collect())
}

pub fn model_from(sources: &[(&str, &str)]) -> ActionModel {
    try_model(sources).unwrap_or_else(|e| panic!("link failed: {e}"))
}

pub fn emit_with(sources: &[(&str, &str)], profile: &TargetProfile) -> EmitOutput {
    emit(&model_from(sources), profile)
}

/// Text of the emitted file for the unit with qualified name `name`
pub fn emitted<'a>(output: &'a EmitOutput, name: &str) -> &'a str {
    output
        .units
        .iter()
        .find(|u| u.name == name)
        .map(|u| u.text.as_str())
        .unwrap_or_else(|| {
            let names: Vec<_> = output.units.iter().map(|u| u.name.as_str()).collect();
            panic!("no emitted unit {name}, have {names:?}")
        })
}

/// Assert that each needle occurs in `text` after the previous one.
pub fn assert_in_order(text: &str, needles: &[&str]) {
    let mut from = 0;
    for needle in needles {
        match text[from..].find(needle) {
            Some(at) => from += at + needle.len(),
            None => panic!("`{needle}` not found after offset {from} in:\n{text}"),
        }
    }
}
