//! Single-unit emission details.

use std::path::PathBuf;

use pretty_assertions::assert_eq;
use testport::emit::{ConversionKind, EmitError};
use testport::TargetProfile;

use crate::helpers::model_helpers::{emit_with, emitted};
use crate::helpers::source_fixtures::{LOGIN_TEST, SHOPPING_CART_TEST, TEST_UTILS};

const HOME_TEST: &str = r#"
public class HomeTest {
    WebDriver driver;

    @Test
    public void opens() {
        driver.get("https://example.com");
    }
}
"#;

#[test]
fn test_whole_file_layout() {
    let output = emit_with(&[("HomeTest.java", HOME_TEST)], &TargetProfile::playwright());
    let expected = "\
import { test, expect, Page } from '@playwright/test';

test.describe('HomeTest', () => {
  test('opens', async ({ page }) => {
    await page.goto('https://example.com');
  });
});
";
    assert_eq!(emitted(&output, "HomeTest"), expected);
    assert_eq!(output.units[0].path, PathBuf::from("tests/HomeTest.spec.ts"));
    assert_eq!(output.units[0].kind, ConversionKind::TestClass);
}

#[test]
fn test_utility_module_functions_take_the_page() {
    let output = emit_with(
        &[("ShoppingCartTest.java", SHOPPING_CART_TEST), ("TestUtils.java", TEST_UTILS)],
        &TargetProfile::playwright(),
    );
    let utils = emitted(&output, "com.example.support.TestUtils");
    assert!(utils.contains("export async function scrollToBottom(page: Page) {"), "{utils}");
    assert!(utils.contains("await page.evaluate((args) => { window.scrollTo(0, document.body.scrollHeight); }, []);"));

    let test = emitted(&output, "com.example.tests.ShoppingCartTest");
    assert!(test.contains("import * as TestUtils from '../support/TestUtils';"), "{test}");
    assert!(test.contains("await TestUtils.scrollToBottom(page);"));
    assert!(test.contains("await page.getByRole('link', { name: 'Checkout', exact: true }).click();"));

    let kinds: Vec<_> = output.units.iter().map(|u| u.kind).collect();
    assert!(kinds.contains(&ConversionKind::UtilityModule));
    assert!(kinds.contains(&ConversionKind::Suite));
}

#[test]
fn test_missing_assert_template_fails_only_that_unit() {
    let mut profile = TargetProfile::playwright();
    profile.asserts.shift_remove("contains");
    let output = emit_with(
        &[("LoginTest.java", LOGIN_TEST), ("HomeTest.java", HOME_TEST)],
        &profile,
    );
    assert_eq!(output.units.len(), 1);
    assert_eq!(output.units[0].name, "HomeTest");
    let [EmitError::MissingTemplate { section, key, unit, .. }] = output.errors.as_slice() else {
        panic!("expected one missing template, got {:?}", output.errors);
    };
    assert_eq!((*section, key.as_str(), &**unit), ("asserts", "contains", "LoginTest.java"));
    assert!(output.diagnostics.iter().any(|d| d.code.as_deref() == Some("X0003")));
}

#[test]
fn test_support_files_come_from_the_profile() {
    let output = emit_with(&[("HomeTest.java", HOME_TEST)], &TargetProfile::playwright());
    let paths: Vec<_> = output.support.iter().map(|f| f.path.clone()).collect();
    assert_eq!(
        paths,
        vec![
            PathBuf::from("playwright.config.ts"),
            PathBuf::from("package.json"),
            PathBuf::from("tsconfig.json"),
            PathBuf::from("README.md"),
        ]
    );
    assert!(output.support.iter().all(|f| f.kind == ConversionKind::Support));
}
