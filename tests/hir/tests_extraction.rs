//! Extraction from whole fixture units.

use pretty_assertions::assert_eq;
use rstest::rstest;
use testport::hir::{
    ActionKind, AssertKind, BinaryOp, Condition, Expr, InteractOp, Severity, Strategy, UnitKind,
    WaitTarget,
};

use crate::helpers::model_helpers::{unit_from, unit_with_diagnostics};
use crate::helpers::source_fixtures::{
    DASHBOARD_PAGE, HOME_PAGE, LOGIN_PAGE, LOGIN_SUITE_TEST, LOGIN_TEST, SEARCH_EDGE_TEST,
    SHOPPING_CART_TEST, TEST_UTILS,
};

#[rstest]
#[case::plain_test("LoginTest.java", LOGIN_TEST, UnitKind::TestClass)]
#[case::suite("LoginSuiteTest.java", LOGIN_SUITE_TEST, UnitKind::Suite)]
#[case::suite_calling_utilities("ShoppingCartTest.java", SHOPPING_CART_TEST, UnitKind::Suite)]
#[case::page_object("LoginPage.java", LOGIN_PAGE, UnitKind::PageObject)]
#[case::page_object_by_name("DashboardPage.java", DASHBOARD_PAGE, UnitKind::PageObject)]
#[case::utility("TestUtils.java", TEST_UTILS, UnitKind::UtilityModule)]
fn test_unit_kinds(#[case] name: &str, #[case] source: &str, #[case] expected: UnitKind) {
    assert_eq!(unit_from(name, source).kind, expected);
}

#[test]
fn test_login_actions_keep_source_order() {
    let unit = unit_from("LoginTest.java", LOGIN_TEST);
    assert_eq!(unit.name, "com.example.tests.LoginTest");
    let test = unit.tests().next().expect("test");
    assert_eq!(test.name, "logsIn");

    let kinds: Vec<&ActionKind> = test.body.actions.iter().map(|a| &a.kind).collect();
    assert_eq!(kinds.len(), 10, "{kinds:#?}");
    assert!(matches!(kinds[0], ActionKind::Navigate { .. }));
    assert!(matches!(kinds[1], ActionKind::Locate { strategy: Strategy::Id, .. }));
    assert!(matches!(kinds[2], ActionKind::Interact { op: InteractOp::SendKeys, .. }));
    assert!(matches!(kinds[3], ActionKind::Locate { strategy: Strategy::Id, .. }));
    assert!(matches!(kinds[4], ActionKind::Interact { op: InteractOp::SendKeys, .. }));
    assert!(matches!(kinds[5], ActionKind::Locate { strategy: Strategy::Xpath, .. }));
    assert!(matches!(kinds[6], ActionKind::Interact { op: InteractOp::Click, .. }));
    // the waited-for element is located first
    assert!(matches!(kinds[7], ActionKind::Locate { strategy: Strategy::Id, .. }));
    assert!(matches!(
        kinds[8],
        ActionKind::Wait {
            condition: Condition::VisibilityOf,
            target: WaitTarget::Element(_),
            timeout_ms: Some(10_000),
        }
    ));
    assert!(matches!(kinds[9], ActionKind::Assert { kind: AssertKind::Contains, .. }));
}

#[test]
fn test_page_object_locators_are_data() {
    let unit = unit_from("LoginPage.java", LOGIN_PAGE);
    let page = unit.page_object().expect("page object");
    assert_eq!(page.class_name(), "LoginPage");
    let locators: Vec<_> = page
        .locators()
        .iter()
        .map(|(name, def)| (name.as_str(), def.strategy, def.value.as_str()))
        .collect();
    assert_eq!(
        locators,
        vec![
            ("username", Strategy::Id, "username"),
            ("password", Strategy::Id, "password"),
            ("submit", Strategy::CssSelector, "button[type=submit]"),
        ]
    );
    let login = page.methods().find(|m| m.name == "login").expect("login");
    assert_eq!(login.arity(), 2);
}

#[test]
fn test_setup_hooks_attach_to_tests() {
    let unit = unit_from("LoginSuiteTest.java", LOGIN_SUITE_TEST);
    let test = unit.tests().next().expect("test");
    assert_eq!(test.setup, vec!["open"]);
    assert!(test.teardown.is_empty());
    assert!(!test.skipped);
}

#[test]
fn test_supported_fixtures_have_no_warnings() {
    for (name, source) in [("LoginTest.java", LOGIN_TEST), ("LoginPage.java", LOGIN_PAGE)] {
        let (_, diagnostics) = unit_with_diagnostics(name, source);
        let problems: Vec<_> = diagnostics
            .iter()
            .filter(|d| matches!(d.severity, Severity::Error | Severity::Warning))
            .collect();
        assert!(problems.is_empty(), "{name}: {problems:#?}");
    }
}

#[test]
fn test_bound_presence_check_keeps_the_lookup() {
    let unit = unit_from("HomePage.java", HOME_PAGE);
    let method = unit.methods().find(|m| m.name == "hasBanner").expect("hasBanner");
    let [action] = method.body.actions.as_slice() else {
        panic!("expected one action, got {:#?}", method.body.actions);
    };
    let ActionKind::LocateWithFallback { attempt, fallback } = &action.kind else {
        panic!("expected fallback, got {action:#?}");
    };
    let ActionKind::Locate { element, multiple: false, .. } = &attempt[0].kind else {
        panic!("expected lookup, got {attempt:#?}");
    };
    assert_eq!(method.body.element(*element).and_then(|b| b.name.as_deref()), Some("banner"));
    assert!(matches!(attempt[1].kind, ActionKind::Return(Some(Expr::Bool(true)))));
    assert!(matches!(fallback[0].kind, ActionKind::Return(Some(Expr::Bool(false)))));
}

#[test]
fn test_edge_assertions_and_keys() {
    let unit = unit_from("SearchEdgeTest.java", SEARCH_EDGE_TEST);
    let test = unit.tests().next().expect("test");

    let interactions: Vec<(InteractOp, &[Expr])> = test
        .body
        .actions
        .iter()
        .filter_map(|a| match &a.kind {
            ActionKind::Interact { op, args, .. } => Some((*op, args.as_slice())),
            _ => None,
        })
        .collect();
    assert_eq!(
        interactions,
        vec![
            (InteractOp::SendKeys, &[Expr::Str("selenium".into())][..]),
            (InteractOp::PressKey, &[Expr::Key("ENTER".into())][..]),
        ]
    );

    let asserts: Vec<(AssertKind, &Expr)> = test
        .body
        .actions
        .iter()
        .filter_map(|a| match &a.kind {
            ActionKind::Assert { kind, actual, .. } => Some((*kind, actual)),
            _ => None,
        })
        .collect();
    assert_eq!(asserts.len(), 3);
    assert!(matches!(asserts[0], (AssertKind::NotNull, Expr::Element(_))));
    let (AssertKind::False, Expr::Paren(empty)) = asserts[1] else {
        panic!("expected an emptiness check, got {:?}", asserts[1]);
    };
    assert!(matches!(
        &**empty,
        Expr::Binary { op: BinaryOp::Eq, lhs, rhs } if matches!(**lhs, Expr::Count(_)) && **rhs == Expr::Int(0)
    ));
    assert_eq!(asserts[2].0, AssertKind::Contains);
}
