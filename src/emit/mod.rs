//! Emission: rendering the linked action model through a target profile.
//!
//! ## Key Types
//!
//! - [`TargetProfile`]: templates and options for one target framework
//! - [`ConversionUnit`]: one generated file
//! - [`EmitOutput`]: the converted units plus per-unit errors and diagnostics
//!
//! Emission walks units in model order and renders each independently. A unit
//! whose profile lacks a template fails on its own; units that depend on it are
//! skipped, since their output could not run.

mod body;
mod emitter;
mod expr;
mod paths;
mod profile;
mod template;

use std::path::PathBuf;
use std::sync::Arc;

use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use thiserror::Error;
use tracing::debug;

use crate::base::Span;
use crate::hir::{ActionModel, Condition, Diagnostic, Strategy, UnitKind, codes};

pub use paths::OutputPath;
#[cfg(feature = "config")]
pub use profile::ProfileError;
pub use profile::{
    DelegateStrategy, Harness, LocatorPlacement, PresenceStyle, ScaffoldFile, ScriptBridge,
    StructureTemplates, Suffixes, Synchronicity, TargetProfile, Templates,
};
pub use template::{Vars, indent, placeholders, render};

use emitter::UnitEmitter;

// ============================================================================
// OUTPUT TYPES
// ============================================================================

/// What a generated file holds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConversionKind {
    TestClass,
    PageObject,
    UtilityModule,
    Suite,
    /// Scaffold file shipped by the profile
    Support,
}

impl From<UnitKind> for ConversionKind {
    fn from(kind: UnitKind) -> Self {
        match kind {
            UnitKind::TestClass => ConversionKind::TestClass,
            UnitKind::PageObject => ConversionKind::PageObject,
            UnitKind::UtilityModule => ConversionKind::UtilityModule,
            UnitKind::Suite => ConversionKind::Suite,
        }
    }
}

/// One generated file
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversionUnit {
    /// Qualified name of the source unit, or the path of a scaffold file
    pub name: SmolStr,
    /// Relative to the output directory
    pub path: PathBuf,
    pub kind: ConversionKind,
    pub text: String,
}

/// A unit the profile cannot express.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EmitError {
    #[error("{unit}: profile `{profile}` has no locator template for `{}`", .strategy.as_str())]
    UnsupportedLocator {
        unit: Arc<str>,
        span: Option<Span>,
        profile: String,
        strategy: Strategy,
    },
    #[error("{unit}: profile `{profile}` has no wait template for `{}`", .condition.as_str())]
    UnsupportedCondition {
        unit: Arc<str>,
        span: Option<Span>,
        profile: String,
        condition: Condition,
    },
    #[error("{unit}: profile `{profile}` has no `{section}.{key}` template")]
    MissingTemplate {
        unit: Arc<str>,
        span: Option<Span>,
        profile: String,
        section: &'static str,
        key: String,
    },
}

impl EmitError {
    pub fn unit(&self) -> &Arc<str> {
        match self {
            EmitError::UnsupportedLocator { unit, .. }
            | EmitError::UnsupportedCondition { unit, .. }
            | EmitError::MissingTemplate { unit, .. } => unit,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            EmitError::UnsupportedLocator { span, .. }
            | EmitError::UnsupportedCondition { span, .. }
            | EmitError::MissingTemplate { span, .. } => *span,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            EmitError::UnsupportedLocator { .. } => codes::UNSUPPORTED_LOCATOR,
            EmitError::UnsupportedCondition { .. } => codes::UNSUPPORTED_CONDITION,
            EmitError::MissingTemplate { .. } => codes::MISSING_TEMPLATE,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        // The message repeats the unit, which Diagnostic already carries
        let full = self.to_string();
        let message = full
            .strip_prefix(&format!("{}: ", self.unit()))
            .unwrap_or(&full)
            .to_string();
        let diagnostic = Diagnostic::error(self.unit().clone(), message).with_code(self.code());
        match self.span() {
            Some(span) => diagnostic.with_span(span),
            None => diagnostic,
        }
    }
}

/// Result of emitting a whole model
#[derive(Clone, Debug, Default)]
pub struct EmitOutput {
    /// Converted units, in model order
    pub units: Vec<ConversionUnit>,
    /// Scaffold files of the profile
    pub support: Vec<ConversionUnit>,
    pub errors: Vec<EmitError>,
    /// Units not written because a unit they depend on failed
    pub skipped: Vec<Arc<str>>,
    pub diagnostics: Vec<Diagnostic>,
}

impl EmitOutput {
    /// Input names of every unit that produced no output
    pub fn failed_units(&self) -> Vec<Arc<str>> {
        self.errors
            .iter()
            .map(|e| e.unit().clone())
            .chain(self.skipped.iter().cloned())
            .collect()
    }
}

// ============================================================================
// EMIT
// ============================================================================

/// Render every unit of `model` through `profile`.
pub fn emit(model: &ActionModel, profile: &TargetProfile) -> EmitOutput {
    let mut output = EmitOutput::default();
    let mut failed = FxHashSet::default();
    let mut emitted = Vec::with_capacity(model.len());

    for (id, unit) in model.iter() {
        let (result, diagnostics) = UnitEmitter::new(model, profile, id, unit).emit();
        output.diagnostics.extend(diagnostics);
        match result {
            Ok(converted) => {
                debug!(unit = %unit.name, path = %converted.path.display(), "emitted unit");
                emitted.push((id, converted));
            }
            Err(error) => {
                debug!(unit = %unit.name, %error, "unit failed to emit");
                output.diagnostics.push(error.to_diagnostic());
                output.errors.push(error);
                failed.insert(id);
            }
        }
    }

    // Failure spreads to every unit that calls into a failed one
    let mut changed = true;
    while changed {
        changed = false;
        for (id, _) in model.iter() {
            if !failed.contains(&id) && model.dependencies(id).iter().any(|d| failed.contains(d)) {
                failed.insert(id);
                changed = true;
            }
        }
    }

    for (id, converted) in emitted {
        if !failed.contains(&id) {
            output.units.push(converted);
            continue;
        }
        let Some(unit) = model.unit(id) else { continue };
        output.diagnostics.push(
            Diagnostic::warning(
                unit.unit_name.clone(),
                format!("`{}` skipped because a unit it depends on failed", unit.name),
            )
            .with_code(codes::DEPENDENCY_FAILED),
        );
        output.skipped.push(unit.unit_name.clone());
    }

    let vars = Vars::new()
        .with("project", profile.project_name.as_str())
        .with("output_root", profile.output_root.as_str());
    output.support = profile
        .scaffold
        .iter()
        .map(|file| ConversionUnit {
            name: SmolStr::new(&file.path),
            path: PathBuf::from(&file.path),
            kind: ConversionKind::Support,
            text: render(&file.text, &vars),
        })
        .collect();
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hir::{DiagnosticCollector, extract, link};
    use crate::syntax::parse;

    fn model(sources: &[(&str, &str)]) -> ActionModel {
        let units = sources
            .iter()
            .map(|(name, text)| {
                let file = parse(text, name).expect("parse");
                extract(&file, &mut DiagnosticCollector::new())
            })
            .collect();
        link(units).expect("link")
    }

    fn text<'a>(output: &'a EmitOutput, name: &str) -> &'a str {
        output
            .units
            .iter()
            .find(|u| u.name == name)
            .map(|u| u.text.as_str())
            .expect("unit emitted")
    }

    const SEARCH_TEST: &str = r#"
package com.example.tests;
public class SearchTest {
    WebDriver driver;
    @Test public void searches() {
        driver.get("https://example.com");
        driver.findElement(By.cssSelector("form > input[name='q']")).sendKeys("rust");
        driver.findElement(By.xpath("//a[text()='Go']")).click();
    }
}
"#;

    const LOGIN_PAGE: &str = r#"
package com.example.pages;
public class LoginPage {
    private WebDriver driver;
    @FindBy(id = "user") private WebElement user;
    public LoginPage(WebDriver driver) { this.driver = driver; }
    public void login(String name) { user.sendKeys(name); }
    public boolean isLoggedIn() {
        try {
            driver.findElement(By.id("logout"));
            return true;
        } catch (NoSuchElementException e) {
            return false;
        }
    }
}
"#;

    const LOGIN_TEST: &str = r#"
package com.example.tests;
import com.example.pages.LoginPage;
public class LoginTest {
    WebDriver driver;
    @Test public void logs_in() {
        LoginPage loginPage = new LoginPage(driver);
        loginPage.login("bob");
    }
}
"#;

    #[test]
    fn test_locators_keep_strategy_and_value() {
        let output = emit(&model(&[("SearchTest.java", SEARCH_TEST)]), &TargetProfile::playwright());
        let text = text(&output, "com.example.tests.SearchTest");
        assert!(text.contains("await page.goto('https://example.com');"));
        assert!(text.contains("await page.locator('form > input[name=\\'q\\']').pressSequentially('rust');"));
        assert!(text.contains("await page.locator('xpath=//a[text()=\\'Go\\']').click();"));
        assert_eq!(
            output.units[0].path,
            PathBuf::from("tests/com/example/tests/SearchTest.spec.ts")
        );
    }

    #[test]
    fn test_no_wait_without_a_source_wait() {
        let output = emit(&model(&[("SearchTest.java", SEARCH_TEST)]), &TargetProfile::playwright());
        assert!(!text(&output, "com.example.tests.SearchTest").contains("waitFor"));
    }

    #[test]
    fn test_explicit_wait_keeps_its_timeout() {
        let source = r#"
public class WaitTest {
    WebDriver driver;
    @Test public void waits() {
        new WebDriverWait(driver, Duration.ofSeconds(5)).until(ExpectedConditions.visibilityOfElementLocated(By.id("msg")));
    }
}
"#;
        let output = emit(&model(&[("WaitTest.java", source)]), &TargetProfile::playwright());
        assert!(text(&output, "WaitTest").contains("waitFor({ state: 'visible', timeout: 5000 })"));
    }

    #[test]
    fn test_missing_locator_template_fails_the_unit() {
        let mut profile = TargetProfile::playwright();
        profile.locators.shift_remove("xpath");
        let output = emit(&model(&[("SearchTest.java", SEARCH_TEST)]), &profile);
        assert!(output.units.is_empty());
        assert!(matches!(
            output.errors.as_slice(),
            [EmitError::UnsupportedLocator { strategy: Strategy::Xpath, .. }]
        ));
        assert_eq!(output.failed_units(), vec![Arc::<str>::from("SearchTest.java")]);
        assert!(output.diagnostics.iter().any(|d| d.code.as_deref() == Some("X0001")));
        // scaffold does not depend on units
        assert_eq!(output.support.len(), 4);
    }

    #[test]
    fn test_dependents_of_a_failed_unit_are_skipped() {
        let mut profile = TargetProfile::playwright();
        profile.locators.shift_remove("id");
        let output = emit(
            &model(&[("LoginPage.java", LOGIN_PAGE), ("LoginTest.java", LOGIN_TEST)]),
            &profile,
        );
        assert!(output.units.is_empty());
        assert_eq!(output.skipped, vec![Arc::<str>::from("LoginTest.java")]);
        assert!(output.diagnostics.iter().any(|d| d.code.as_deref() == Some("W0003")));
    }

    #[test]
    fn test_page_object_becomes_a_class() {
        let output = emit(
            &model(&[("LoginPage.java", LOGIN_PAGE), ("LoginTest.java", LOGIN_TEST)]),
            &TargetProfile::playwright(),
        );
        let page = text(&output, "com.example.pages.LoginPage");
        assert!(page.contains("export class LoginPage {"));
        assert!(page.contains("constructor(page: Page) {"));
        assert!(page.contains("this.user = this.page.locator('#user');"));
        assert!(page.contains("async login(name: string) {"));
        assert!(page.contains("await this.user.pressSequentially(name);"));

        let test = text(&output, "com.example.tests.LoginTest");
        assert!(test.contains("import { LoginPage } from '../pages/LoginPage';"));
        assert!(test.contains("const loginPage = new LoginPage(page);"));
        assert!(test.contains("await loginPage.login('bob');"));
    }

    #[test]
    fn test_inline_strategy_copies_the_body() {
        let profile = TargetProfile::playwright().with_delegate_strategy(DelegateStrategy::Inline);
        let output = emit(
            &model(&[("LoginPage.java", LOGIN_PAGE), ("LoginTest.java", LOGIN_TEST)]),
            &profile,
        );
        let test = text(&output, "com.example.tests.LoginTest");
        assert!(test.contains("// inlined from LoginPage.login"));
        assert!(test.contains("const name = 'bob';"));
        assert!(test.contains("await loginPage.user.pressSequentially(name);"));
        assert!(!test.contains("await loginPage.login("));
        assert!(output.diagnostics.iter().any(|d| d.code.as_deref() == Some("I0003")));
    }

    #[test]
    fn test_presence_check_styles() {
        let units = model(&[("LoginPage.java", LOGIN_PAGE)]);
        let try_catch = emit(&units, &TargetProfile::playwright());
        let page = text(&try_catch, "com.example.pages.LoginPage");
        assert!(page.contains("try {"));
        assert!(page.contains("} catch {"));

        let profile = TargetProfile::playwright().with_presence_style(PresenceStyle::BooleanCheck);
        let boolean = emit(&units, &profile);
        let page = text(&boolean, "com.example.pages.LoginPage");
        assert!(page.contains("return (await this.page.locator('#logout').count()) > 0;"));
        assert!(!page.contains("try {"));
    }

    #[test]
    fn test_webdriverio_uses_the_global_browser() {
        let output = emit(
            &model(&[("LoginPage.java", LOGIN_PAGE), ("LoginTest.java", LOGIN_TEST)]),
            &TargetProfile::webdriverio(),
        );
        let page = text(&output, "com.example.pages.LoginPage");
        assert!(page.contains("get user() {"));
        assert!(page.contains("return browser.$('#user');"));
        let test = text(&output, "com.example.tests.LoginTest");
        assert!(test.contains("import { LoginPage } from '../pages/LoginPage.js';"));
        assert!(test.contains("const loginPage = new LoginPage();"));
        assert!(test.contains("it('logs_in', async () => {"));
    }
}
