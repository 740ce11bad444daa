//! Parsing whole units.

use pretty_assertions::assert_eq;
use testport::parser::ErrorCode;
use testport::parse;

use crate::helpers::source_fixtures::{BROKEN, LOGIN_PAGE, LOGIN_SUITE_TEST, LOGIN_TEST};

#[test]
fn test_tree_is_lossless() {
    for source in [LOGIN_TEST, LOGIN_PAGE, LOGIN_SUITE_TEST] {
        let file = parse(source, "Fixture.java").expect("parse");
        assert_eq!(file.syntax().text().to_string(), source);
    }
}

#[test]
fn test_declarations_are_visible() {
    let file = parse(LOGIN_SUITE_TEST, "LoginSuiteTest.java").expect("parse");
    assert!(!file.has_errors(), "{:?}", file.errors());
    let source = file.source_file().expect("source file");
    assert_eq!(
        source.package().and_then(|p| p.name()).as_deref(),
        Some("com.example.tests")
    );
    let imports: Vec<_> = source.imports().filter_map(|i| i.path()).collect();
    assert_eq!(imports.len(), 5);
    assert_eq!(imports[0], "com.example.pages.DashboardPage");
    let classes: Vec<_> = source.classes().filter_map(|c| c.name()).collect();
    assert_eq!(classes, vec!["LoginSuiteTest"]);
}

#[test]
fn test_unterminated_string_is_fatal() {
    let err = parse(BROKEN, "BrokenTest.java").unwrap_err();
    assert_eq!(err.unit_name, "BrokenTest.java");
    assert_eq!(err.code, ErrorCode::E0102);
    assert_eq!(err.code.as_str(), "E0102");
    assert_eq!(err.position.line, 6);
}

#[test]
fn test_unknown_member_syntax_is_recovered() {
    let source = "public class Odd {\n    int[] values = {1, 2};\n    @Test public void t() { driver.get(\"x\"); }\n}\n";
    let file = parse(source, "Odd.java").expect("recovered");
    assert_eq!(file.syntax().text().to_string(), source);
}
