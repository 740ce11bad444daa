//! Linking units into an action model.

use pretty_assertions::assert_eq;
use testport::hir::{ActionKind, LinkError, ResolvedTarget};

use crate::helpers::model_helpers::{model_from, try_model};
use crate::helpers::source_fixtures::{
    CYCLE_A, CYCLE_B, DASHBOARD_PAGE, LOGIN_PAGE, LOGIN_SUITE_TEST, UNRESOLVED_SUITE_TEST,
};

const SUITE_SOURCES: [(&str, &str); 3] = [
    ("LoginSuiteTest.java", LOGIN_SUITE_TEST),
    ("LoginPage.java", LOGIN_PAGE),
    ("DashboardPage.java", DASHBOARD_PAGE),
];

#[test]
fn test_suite_delegate_resolves_to_the_page_method() {
    let model = model_from(&SUITE_SOURCES);
    let suite = model.unit_id("com.example.tests.LoginSuiteTest").expect("suite");
    let unit = model.unit(suite).expect("suite unit");
    let test = unit.tests().next().expect("test");

    let login = test
        .body
        .actions
        .iter()
        .find_map(|a| match &a.kind {
            ActionKind::Delegate(call) if call.method == "login" => Some(call),
            _ => None,
        })
        .expect("login delegate");
    let resolution = model.resolution(suite, login.site).expect("resolved");
    assert_eq!(resolution.unit, model.unit_id("com.example.pages.LoginPage").expect("page"));
    assert!(matches!(resolution.target, ResolvedTarget::Method(_)));

    let method = model.method(resolution).expect("method");
    assert_eq!(method.name, "login");
    assert!(
        method
            .body
            .actions
            .iter()
            .any(|a| matches!(a.kind, ActionKind::Interact { .. }))
    );
}

#[test]
fn test_dependencies_follow_unit_order() {
    let model = model_from(&SUITE_SOURCES);
    let suite = model.unit_id("com.example.tests.LoginSuiteTest").expect("suite");
    let deps: Vec<_> = model
        .dependencies(suite)
        .iter()
        .filter_map(|id| model.unit(*id))
        .map(|u| u.simple_name.as_str())
        .collect();
    assert_eq!(deps, vec!["DashboardPage", "LoginPage"]);
}

#[test]
fn test_link_does_not_depend_on_input_order() {
    let forward = model_from(&SUITE_SOURCES);
    let mut reversed_sources = SUITE_SOURCES;
    reversed_sources.reverse();
    let reversed = model_from(&reversed_sources);
    assert_eq!(forward.resolved_count(), reversed.resolved_count());

    let names = |model: &testport::ActionModel| -> Vec<String> {
        model.units().iter().map(|u| u.name.to_string()).collect()
    };
    assert_eq!(names(&forward), names(&reversed));
}

#[test]
fn test_undeclared_method_is_unresolved() {
    let err = try_model(&[
        ("LogoutSuiteTest.java", UNRESOLVED_SUITE_TEST),
        ("LoginPage.java", LOGIN_PAGE),
    ])
    .unwrap_err();
    let LinkError::Unresolved { unit, name, span } = &err else {
        panic!("expected unresolved, got {err}");
    };
    assert_eq!(&**unit, "LogoutSuiteTest.java");
    assert_eq!(name, "LoginPage.logout/0");
    assert!(span.is_some());
    assert_eq!(err.to_diagnostic().code.as_deref(), Some("E0001"));
}

#[test]
fn test_circular_delegation() {
    let err = try_model(&[("FlowA.java", CYCLE_A), ("FlowB.java", CYCLE_B)]).unwrap_err();
    let LinkError::Cycle { path, .. } = &err else {
        panic!("expected cycle, got {err}");
    };
    assert_eq!(path, "FlowA.start -> FlowB.next -> FlowA.start");
}
