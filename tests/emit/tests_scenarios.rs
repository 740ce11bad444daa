//! End-to-end conversions of the fixture projects.

use pretty_assertions::assert_eq;
use rstest::rstest;
use testport::emit::{DelegateStrategy, PresenceStyle};
use testport::TargetProfile;

use crate::helpers::model_helpers::{assert_in_order, emit_with, emitted};
use crate::helpers::source_fixtures::{
    DASHBOARD_PAGE, HOME_PAGE, LOGIN_PAGE, LOGIN_SUITE_TEST, LOGIN_TEST, SEARCH_EDGE_TEST,
};

const SUITE_SOURCES: [(&str, &str); 3] = [
    ("LoginSuiteTest.java", LOGIN_SUITE_TEST),
    ("LoginPage.java", LOGIN_PAGE),
    ("DashboardPage.java", DASHBOARD_PAGE),
];

#[test]
fn test_login_scenario_for_playwright() {
    let output = emit_with(&[("LoginTest.java", LOGIN_TEST)], &TargetProfile::playwright());
    assert!(output.errors.is_empty(), "{:?}", output.errors);
    let text = emitted(&output, "com.example.tests.LoginTest");

    assert_eq!(text.matches("test('").count(), 1);
    assert_in_order(
        text,
        &[
            "test('logsIn', async ({ page }) => {",
            "await page.goto('https://example.com/login');",
            "const user = page.locator('#username');",
            "await user.pressSequentially('alice');",
            "const pass = page.locator('#password');",
            "await pass.pressSequentially('secret');",
            "await page.locator('xpath=//button[@type=\\'submit\\']').click();",
            "await page.locator('#dashboard').waitFor({ state: 'visible', timeout: 10000 });",
            "expect(page.url()).toContain('dashboard');",
        ],
    );
}

#[test]
fn test_login_scenario_for_webdriverio() {
    let output = emit_with(&[("LoginTest.java", LOGIN_TEST)], &TargetProfile::webdriverio());
    let text = emitted(&output, "com.example.tests.LoginTest");
    assert_in_order(
        text,
        &[
            "it('logsIn', async () => {",
            "const user = browser.$('#username');",
            "const pass = browser.$('#password');",
            "await browser.$('#dashboard').waitForDisplayed({ timeout: 10000 });",
            ".toContain('dashboard');",
        ],
    );
    assert!(!text.contains("page."));
}

#[test]
fn test_suite_delegates_to_page_methods() {
    let output = emit_with(&SUITE_SOURCES, &TargetProfile::playwright());
    assert_eq!(output.units.len(), 3);
    let suite = emitted(&output, "com.example.tests.LoginSuiteTest");
    assert_in_order(
        suite,
        &[
            "import { DashboardPage } from '../pages/DashboardPage';",
            "import { LoginPage } from '../pages/LoginPage';",
            "test.beforeEach(async ({ page }) => {",
            "await page.goto('https://example.com/login');",
            "const loginPage = new LoginPage(page);",
            "await loginPage.login('u', 'p');",
            "const dashboard = new DashboardPage(page);",
            "dashboard.greeting()",
            ".toBe('Welcome');",
        ],
    );

    let page = emitted(&output, "com.example.pages.LoginPage");
    assert_in_order(
        page,
        &[
            "export class LoginPage {",
            "this.username = this.page.locator('#username');",
            "this.submit = this.page.locator('button[type=submit]');",
            "async login(user: string, pass: string) {",
            "await this.username.pressSequentially(user);",
            "await this.password.pressSequentially(pass);",
            "await this.submit.click();",
        ],
    );
}

#[test]
fn test_suite_inlines_page_methods() {
    let profile = TargetProfile::playwright().with_delegate_strategy(DelegateStrategy::Inline);
    let output = emit_with(&SUITE_SOURCES, &profile);
    let suite = emitted(&output, "com.example.tests.LoginSuiteTest");
    assert_in_order(
        suite,
        &[
            "const loginPage = new LoginPage(page);",
            "// inlined from LoginPage.login",
            "const user = 'u';",
            "const pass = 'p';",
            "await loginPage.username.pressSequentially(user);",
            "await loginPage.password.pressSequentially(pass);",
            "await loginPage.submit.click();",
        ],
    );
    assert!(!suite.contains("await loginPage.login("));
}

#[rstest]
#[case::delegated(DelegateStrategy::Delegated, 0)]
#[case::inline(DelegateStrategy::Inline, 1)]
fn test_strategy_is_reported(#[case] strategy: DelegateStrategy, #[case] inlined: usize) {
    let profile = TargetProfile::playwright().with_delegate_strategy(strategy);
    let output = emit_with(&SUITE_SOURCES, &profile);
    let count = output
        .diagnostics
        .iter()
        .filter(|d| d.code.as_deref() == Some("I0003"))
        .count();
    assert_eq!(count, inlined);
}

#[test]
fn test_bound_presence_check_fails_inside_try() {
    let output = emit_with(&[("HomePage.java", HOME_PAGE)], &TargetProfile::playwright());
    let page = emitted(&output, "com.example.pages.HomePage");
    assert_in_order(
        page,
        &[
            "async hasBanner() {",
            "try {",
            "const banner = this.page.locator('#banner');",
            "if ((await banner.count()) === 0) throw new Error('element not found');",
            "return true;",
            "} catch {",
            "return false;",
        ],
    );
}

#[test]
fn test_bound_presence_check_as_boolean() {
    let profile = TargetProfile::playwright().with_presence_style(PresenceStyle::BooleanCheck);
    let output = emit_with(&[("HomePage.java", HOME_PAGE)], &profile);
    let page = emitted(&output, "com.example.pages.HomePage");
    assert_in_order(
        page,
        &[
            "const banner = this.page.locator('#banner');",
            "return (await banner.count()) > 0;",
        ],
    );
    assert!(!page.contains("try {"), "{page}");
}

#[test]
fn test_edge_checks_for_playwright() {
    let output = emit_with(&[("SearchEdgeTest.java", SEARCH_EDGE_TEST)], &TargetProfile::playwright());
    assert!(output.errors.is_empty(), "{:?}", output.errors);
    let text = emitted(&output, "com.example.tests.SearchEdgeTest");
    assert_in_order(
        text,
        &[
            "expect((await page.locator('#search').count()) > 0).toBe(true);",
            "await page.locator('[name=\"q\"]').pressSequentially('selenium');",
            "await page.locator('[name=\"q\"]').press('Enter');",
            "expect((await page.locator('.result').count() === 0)).toBe(false);",
            "expect(await page.title(), 'results shown').toContain('Results');",
        ],
    );
    assert!(!text.contains("toBeNull"), "{text}");
    assert!(!text.contains(".length === 0"), "{text}");
}

#[test]
fn test_edge_checks_for_webdriverio() {
    let output = emit_with(&[("SearchEdgeTest.java", SEARCH_EDGE_TEST)], &TargetProfile::webdriverio());
    let text = emitted(&output, "com.example.tests.SearchEdgeTest");
    assert_in_order(
        text,
        &[
            "expect(await browser.$('#search').isExisting()).toBe(true);",
            "await browser.$('[name=\"q\"]').addValue('selenium');",
            "await browser.$('[name=\"q\"]').addValue(Key.Enter);",
            "expect((await browser.$$('.result').length === 0)).toBe(false);",
            "expect(await browser.getTitle()).toContain('Results'); // 'results shown'",
        ],
    );
    assert!(!text.contains("toBeNull"), "{text}");
}
