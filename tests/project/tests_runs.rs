//! Converter runs over fixture projects.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use rstest::rstest;
use tempfile::TempDir;
use testport::project::{
    ConversionRun, Converter, ConverterOptions, RunStatus, SourceInput, collect_project,
    collect_sources, write_atomic,
};
use testport::{Severity, TargetProfile};

use crate::helpers::source_fixtures::{
    BROKEN, DASHBOARD_PAGE, LOGIN_PAGE, LOGIN_SUITE_TEST, LOGIN_TEST, UNRESOLVED_SUITE_TEST,
};

fn write_sources(root: &Path, sources: &[(&str, &str)]) {
    for (name, text) in sources {
        let path = root.join(name);
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(path, text).expect("write source");
    }
}

fn run(sources: &[(&str, &str)], parallel: bool) -> ConversionRun {
    let inputs: Vec<_> = sources
        .iter()
        .map(|(name, text)| SourceInput::new(*name, *text))
        .collect();
    Converter::new(ConverterOptions {
        parallel,
        ..ConverterOptions::default()
    })
    .convert(&inputs)
}

#[test]
fn test_project_round_trip_through_disk() {
    let input = TempDir::new().expect("input dir");
    write_sources(
        input.path(),
        &[
            ("com/example/tests/LoginSuiteTest.java", LOGIN_SUITE_TEST),
            ("com/example/pages/LoginPage.java", LOGIN_PAGE),
            ("com/example/pages/DashboardPage.java", DASHBOARD_PAGE),
        ],
    );
    let inputs = collect_sources(input.path()).expect("collect");
    assert_eq!(inputs.len(), 3);

    let run = Converter::default().convert(&inputs);
    assert_eq!(run.status, RunStatus::Success);

    let output = TempDir::new().expect("output dir");
    let files: Vec<_> = run.files().cloned().collect();
    write_atomic(output.path(), &files).expect("write");
    for relative in [
        "tests/com/example/tests/LoginSuiteTest.spec.ts",
        "tests/com/example/pages/LoginPage.ts",
        "tests/com/example/pages/DashboardPage.ts",
        "playwright.config.ts",
        "package.json",
        "tsconfig.json",
        "README.md",
    ] {
        assert!(output.path().join(relative).is_file(), "missing {relative}");
    }
}

#[rstest]
#[case::parallel(true)]
#[case::sequential(false)]
fn test_runs_are_deterministic(#[case] parallel: bool) {
    let sources = [
        ("LoginSuiteTest.java", LOGIN_SUITE_TEST),
        ("LoginPage.java", LOGIN_PAGE),
        ("DashboardPage.java", DASHBOARD_PAGE),
    ];
    let first = run(&sources, parallel);
    let second = run(&sources, parallel);
    let texts = |run: &ConversionRun| -> Vec<String> { run.files().map(|f| f.text.clone()).collect() };
    assert_eq!(texts(&first), texts(&second));
}

#[test]
fn test_unresolved_delegate_emits_nothing() {
    let run = run(
        &[
            ("LogoutSuiteTest.java", UNRESOLVED_SUITE_TEST),
            ("LoginPage.java", LOGIN_PAGE),
            ("LoginTest.java", LOGIN_TEST),
        ],
        false,
    );
    assert_eq!(run.status, RunStatus::Failed);
    assert_eq!(run.files().count(), 0);
    assert_eq!(run.failed_units, vec![Arc::<str>::from("LogoutSuiteTest.java")]);
    let error = run
        .diagnostics
        .iter()
        .find(|d| d.severity == Severity::Error)
        .expect("link error");
    assert_eq!(error.code.as_deref(), Some("E0001"));
    assert!(error.message.contains("LoginPage.logout/0"));
}

#[test]
fn test_broken_unit_does_not_stop_the_others() {
    let run = run(&[("LoginTest.java", LOGIN_TEST), ("BrokenTest.java", BROKEN)], true);
    assert_eq!(run.status, RunStatus::PartialSuccess);
    assert_eq!(run.units.len(), 1);
    assert_eq!(run.support_files.len(), 4);
    let parse_error = run
        .diagnostics
        .iter()
        .find(|d| &*d.unit == "BrokenTest.java")
        .expect("parse diagnostic");
    assert_eq!(parse_error.code.as_deref(), Some("E0102"));
    assert_eq!(parse_error.span.map(|s| s.start.line), Some(6));
}

#[test]
fn test_webdriverio_profile_run() {
    let converter = Converter::with_profile(TargetProfile::webdriverio());
    let run = converter.convert(&[SourceInput::new("LoginTest.java", LOGIN_TEST)]);
    assert_eq!(run.status, RunStatus::Success);
    assert_eq!(converter.options().profile.name, "webdriverio");
    assert!(run.units[0].path.to_string_lossy().ends_with("LoginTest.spec.js"));
}

#[test]
fn test_gradle_project_names_the_output() {
    let input = TempDir::new().expect("input dir");
    write_sources(
        input.path(),
        &[
            ("build.gradle", "rootProject.name = 'Login Flows'\n"),
            ("src/test/java/com/example/tests/LoginSuiteTest.java", LOGIN_SUITE_TEST),
            ("src/main/java/com/example/pages/LoginPage.java", LOGIN_PAGE),
            ("src/main/java/com/example/pages/DashboardPage.java", DASHBOARD_PAGE),
        ],
    );
    let project = collect_project(input.path()).expect("collect");
    assert_eq!(project.inputs.len(), 3);

    let run = Converter::with_profile(project.configure(TargetProfile::playwright())).convert(&project.inputs);
    assert_eq!(run.status, RunStatus::Success);
    let text = |path: &str| -> String {
        run.files()
            .find(|f| f.path == Path::new(path))
            .map(|f| f.text.clone())
            .unwrap_or_else(|| panic!("missing {path}"))
    };
    assert!(text("package.json").contains("\"name\": \"login-flows\""));
    assert!(text("README.md").starts_with("# login-flows\n"));
    assert!(text("playwright.config.ts").contains("testDir: './tests',"));
    // unit names are relative to the Java roots, so packages map to directories
    text("tests/com/example/tests/LoginSuiteTest.spec.ts");
}
