//! Target profiles: the data that decides what the emitter writes.
//!
//! A [`TargetProfile`] maps every action-model vocabulary key (a locator
//! strategy, a wait condition, an assertion kind, ...) to a `{placeholder}`
//! template. Two profiles are bundled: [`TargetProfile::playwright`] (the
//! default) and [`TargetProfile::webdriverio`].
//!
//! Under the `config` feature a profile can also be read from JSON or YAML.
//! Keys a file leaves out keep their Playwright values.

use indexmap::IndexMap;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// Vocabulary key → template
pub type Templates = IndexMap<String, String>;

fn templates(entries: &[(&str, &str)]) -> Templates {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

// ============================================================================
// PROFILE OPTIONS
// ============================================================================

/// Whether the target bridge waits for a promise returned by a page script
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum Synchronicity {
    #[default]
    Awaited,
    Blocking,
}

/// How calls into page objects and utility modules are emitted
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum DelegateStrategy {
    /// Keep the call; the callee is emitted in its own module
    #[default]
    Delegated,
    /// Copy the callee's actions to the call site
    Inline,
}

/// Rendering of a try/catch presence check
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum PresenceStyle {
    #[default]
    TryCatch,
    BooleanCheck,
}

/// Where page-object locators live in the emitted class
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum LocatorPlacement {
    /// Assigned once in the constructor
    #[default]
    Constructor,
    /// Re-evaluated through a getter on every access
    Getter,
}

/// The browser handle of the target framework
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize), serde(default))]
pub struct Harness {
    /// `page` for Playwright, `browser` for WebdriverIO
    pub name: String,
    /// Whether the handle is passed down as a parameter or is a global
    pub passed: bool,
}

impl Default for Harness {
    fn default() -> Self {
        Self {
            name: "page".to_string(),
            passed: true,
        }
    }
}

/// Templates for `executeScript` bridges
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize), serde(default))]
pub struct ScriptBridge {
    /// Wraps the script source: `{code}`
    pub function: String,
    /// `{harness}`, `{function}`, `{args}` (comma separated), `{rest_args}` (each preceded by a comma)
    pub statement: String,
    pub expression: String,
    /// How an element is passed to a script: `{element}`
    pub element_arg: String,
    /// Replacement for `arguments` inside the script source
    pub arguments_alias: Option<String>,
    pub synchronicity: Synchronicity,
}

impl Default for ScriptBridge {
    fn default() -> Self {
        Self {
            function: "(args) => { {code} }".to_string(),
            statement: "await {harness}.evaluate({function}, [{args}]);".to_string(),
            expression: "await {harness}.evaluate({function}, [{args}])".to_string(),
            element_arg: "await {element}.elementHandle()".to_string(),
            arguments_alias: Some("args".to_string()),
            synchronicity: Synchronicity::Awaited,
        }
    }
}

/// File naming: `{Class}{suffix}.{extension}`
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize), serde(default))]
pub struct Suffixes {
    pub test: String,
    pub page_object: String,
    pub utility: String,
    pub extension: String,
    /// Appended to relative import specifiers
    pub import_extension: String,
}

impl Default for Suffixes {
    fn default() -> Self {
        Self {
            test: ".spec".to_string(),
            page_object: String::new(),
            utility: String::new(),
            extension: "ts".to_string(),
            import_extension: String::new(),
        }
    }
}

/// Templates for the files, blocks and declarations around the actions
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize), serde(default))]
pub struct StructureTemplates {
    pub test_header: String,
    pub describe: String,
    pub test: String,
    pub skipped_test: String,
    pub before_each: String,
    pub after_each: String,
    pub before_all: String,
    pub after_all: String,
    /// Local function in a test file
    pub helper: String,
    /// `let` in a describe block: `{name}`, `{type}`, `{init}`
    pub describe_field: String,

    pub page_object_header: String,
    /// `{name}`, `{extends}`, `{body}`
    pub class: String,
    pub field_declaration: String,
    pub constructor: String,
    pub harness_init: String,
    pub locator_field: String,
    pub locator_placement: LocatorPlacement,
    pub method: String,
    pub static_method: String,

    pub utility_header: String,
    pub function: String,
    /// `{binding}` is `const` or `let`
    pub module_field: String,

    pub import_class: String,
    pub import_module: String,
}

impl Default for StructureTemplates {
    fn default() -> Self {
        Self {
            test_header: "import { test, expect, Page } from '@playwright/test';".to_string(),
            describe: "test.describe('{name}', () => {\n{body}\n});".to_string(),
            test: "test('{name}', async ({ page }) => {\n{body}\n});".to_string(),
            skipped_test: "test.skip('{name}', async ({ page }) => {\n{body}\n});".to_string(),
            before_each: "test.beforeEach(async ({ page }) => {\n{body}\n});".to_string(),
            after_each: "test.afterEach(async ({ page }) => {\n{body}\n});".to_string(),
            before_all: "test.beforeAll(async ({ browser }) => {\n  const page = await browser.newPage();\n{body}\n});"
                .to_string(),
            after_all: "test.afterAll(async ({ browser }) => {\n  const page = await browser.newPage();\n{body}\n});"
                .to_string(),
            helper: "async function {name}({params}) {\n{body}\n}".to_string(),
            describe_field: "let {name}{type}{init};".to_string(),

            page_object_header: "import { Page, Locator, expect } from '@playwright/test';".to_string(),
            class: "export class {name}{extends} {\n{body}\n}".to_string(),
            field_declaration: "{name}{type};".to_string(),
            constructor: "constructor({params}) {\n{body}\n}".to_string(),
            harness_init: "this.{harness} = {harness};".to_string(),
            locator_field: "this.{name} = {locator};".to_string(),
            locator_placement: LocatorPlacement::Constructor,
            method: "async {name}({params}) {\n{body}\n}".to_string(),
            static_method: "static async {name}({params}) {\n{body}\n}".to_string(),

            utility_header: "import { Page, Locator, expect } from '@playwright/test';".to_string(),
            function: "export async function {name}({params}) {\n{body}\n}".to_string(),
            module_field: "export {binding} {name}{type}{init};".to_string(),

            import_class: "import { {name} } from '{path}';".to_string(),
            import_module: "import * as {name} from '{path}';".to_string(),
        }
    }
}

/// A fixed file shipped with the converted project
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub struct ScaffoldFile {
    /// Path relative to the output directory
    pub path: String,
    pub text: String,
}

impl ScaffoldFile {
    fn new(path: &str, text: &str) -> Self {
        Self {
            path: path.to_string(),
            text: text.to_string(),
        }
    }
}

// ============================================================================
// TARGET PROFILE
// ============================================================================

/// Everything the emitter needs to know about one target framework.
///
/// Templates are looked up by the vocabulary key of the action model
/// (`Strategy::as_str`, `Condition::as_str`, ...). A missing key makes the
/// affected unit fail. An empty template means "emit nothing".
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize), serde(default))]
pub struct TargetProfile {
    pub name: String,
    pub harness: Harness,

    /// Single-element lookups: `{scope}`, `{value}`
    pub locators: Templates,
    /// Multi-element lookups; strategies missing here fall back to `locators`
    pub locators_all: Templates,
    /// `{element}`, `{value}`, `{code}`, `{expected}`, `{timeout}`, `{harness}`
    pub waits: Templates,
    /// `{actual}`, `{expected}`, `{message}` (`, msg`), `{comment}` (` // msg`)
    pub asserts: Templates,
    /// `{element}`, `{arg0}`, `{args}`, `{text}`
    pub interactions: Templates,
    /// Element queries plus `count`: `{element}`, `{arg}`
    pub queries: Templates,
    pub page_queries: Templates,
    /// `{harness}`, `{timeout}`
    pub lifecycle: Templates,
    pub history: Templates,
    /// `navigate`, `sleep`, `nth`, `key`, `require`, `presence`
    pub statements: Templates,
    pub script: ScriptBridge,
    pub structure: StructureTemplates,

    pub delegate_strategy: DelegateStrategy,
    pub presence_style: PresenceStyle,

    /// Emit type annotations from `type_map`
    pub typed: bool,
    /// Java simple type name → target type
    pub type_map: Templates,
    /// Wait timeout when neither the wait nor the class context gives one
    pub default_wait_ms: u64,
    pub indent: String,
    pub suffixes: Suffixes,
    /// Directory (relative to the output root) holding converted units
    pub output_root: String,
    /// Package name written into the scaffold files
    pub project_name: String,
    /// Files shipped with every converted project: `{project}`, `{output_root}`
    pub scaffold: Vec<ScaffoldFile>,
}

impl Default for TargetProfile {
    fn default() -> Self {
        Self::playwright()
    }
}

impl TargetProfile {
    /// Playwright Test, TypeScript
    pub fn playwright() -> Self {
        Self {
            name: "playwright".to_string(),
            harness: Harness::default(),
            locators: templates(&[
                ("id", "{scope}.locator('#{value}')"),
                ("className", "{scope}.locator('.{value}')"),
                ("cssSelector", "{scope}.locator('{value}')"),
                ("xpath", "{scope}.locator('xpath={value}')"),
                ("name", "{scope}.locator('[name=\"{value}\"]')"),
                ("tagName", "{scope}.locator('{value}')"),
                ("linkText", "{scope}.getByRole('link', { name: '{value}', exact: true })"),
                ("partialLinkText", "{scope}.getByRole('link', { name: '{value}' })"),
            ]),
            locators_all: Templates::new(),
            waits: templates(&[
                ("visibilityOf", "await {element}.waitFor({ state: 'visible', timeout: {timeout} });"),
                ("presenceOf", "await {element}.waitFor({ state: 'attached', timeout: {timeout} });"),
                ("invisibilityOf", "await {element}.waitFor({ state: 'hidden', timeout: {timeout} });"),
                ("elementToBeClickable", "await expect({element}).toBeEnabled({ timeout: {timeout} });"),
                (
                    "urlContains",
                    "await {harness}.waitForURL((url) => url.toString().includes({value}), { timeout: {timeout} });",
                ),
                (
                    "scriptReturns",
                    "await {harness}.waitForFunction(() => (() => { {code} })() === {expected}, undefined, { timeout: {timeout} });",
                ),
            ]),
            asserts: templates(&[
                ("equals", "expect({actual}{message}).toBe({expected});"),
                ("notEquals", "expect({actual}{message}).not.toBe({expected});"),
                ("true", "expect({actual}{message}).toBe(true);"),
                ("false", "expect({actual}{message}).toBe(false);"),
                ("contains", "expect({actual}{message}).toContain({expected});"),
                ("null", "expect({actual}{message}).toBeNull();"),
                ("notNull", "expect({actual}{message}).not.toBeNull();"),
            ]),
            interactions: templates(&[
                ("clear", "await {element}.clear();"),
                ("sendKeys", "await {element}.pressSequentially({text});"),
                ("click", "await {element}.click();"),
                ("hover", "await {element}.hover();"),
                ("selectByVisibleText", "await {element}.selectOption({ label: {arg0} });"),
                ("selectByValue", "await {element}.selectOption({ value: {arg0} });"),
                ("selectByIndex", "await {element}.selectOption({ index: {arg0} });"),
                (
                    "submit",
                    "await {element}.evaluate((el: any) => (el.form ? el.form.submit() : el.submit()));",
                ),
                ("pressKey", "await {element}.press({arg0});"),
                ("doubleClick", "await {element}.dblclick();"),
                ("contextClick", "await {element}.click({ button: 'right' });"),
                ("dragTo", "await {element}.dragTo({arg0});"),
            ]),
            queries: templates(&[
                ("text", "await {element}.innerText()"),
                ("visible", "await {element}.isVisible()"),
                ("enabled", "await {element}.isEnabled()"),
                ("selected", "await {element}.isChecked()"),
                ("attribute", "await {element}.getAttribute({arg})"),
                ("value", "await {element}.inputValue()"),
                ("count", "await {element}.count()"),
            ]),
            page_queries: templates(&[
                ("url", "{harness}.url()"),
                ("title", "await {harness}.title()"),
                ("source", "await {harness}.content()"),
            ]),
            lifecycle: templates(&[
                ("openBrowser", ""),
                ("configureWait", ""),
                ("maximize", "await {harness}.setViewportSize({ width: 1920, height: 1080 });"),
                ("implicitWait", "{harness}.setDefaultTimeout({timeout});"),
                ("clearCookies", "await {harness}.context().clearCookies();"),
                ("closeWindow", "await {harness}.close();"),
                ("quit", ""),
            ]),
            history: templates(&[
                ("back", "await {harness}.goBack();"),
                ("forward", "await {harness}.goForward();"),
                ("refresh", "await {harness}.reload();"),
            ]),
            statements: templates(&[
                ("navigate", "await {harness}.goto({url});"),
                ("sleep", "await {harness}.waitForTimeout({millis});"),
                ("nth", "{list}.nth({index})"),
                ("key", "'{name}'"),
                ("require", "if ((await {element}.count()) === 0) throw new Error('element not found');"),
                ("presence", "(await {element}.count()) > 0"),
            ]),
            script: ScriptBridge::default(),
            structure: StructureTemplates::default(),
            delegate_strategy: DelegateStrategy::Delegated,
            presence_style: PresenceStyle::TryCatch,
            typed: true,
            type_map: templates(&[
                ("String", "string"),
                ("char", "string"),
                ("Character", "string"),
                ("int", "number"),
                ("Integer", "number"),
                ("long", "number"),
                ("Long", "number"),
                ("double", "number"),
                ("Double", "number"),
                ("float", "number"),
                ("Float", "number"),
                ("boolean", "boolean"),
                ("Boolean", "boolean"),
                ("WebDriver", "Page"),
                ("WebElement", "Locator"),
                ("Select", "Locator"),
            ]),
            default_wait_ms: 10_000,
            indent: "  ".to_string(),
            suffixes: Suffixes::default(),
            output_root: "tests".to_string(),
            project_name: "playwright-tests".to_string(),
            scaffold: vec![
                ScaffoldFile::new("playwright.config.ts", PLAYWRIGHT_CONFIG),
                ScaffoldFile::new("package.json", PLAYWRIGHT_PACKAGE),
                ScaffoldFile::new("tsconfig.json", PLAYWRIGHT_TSCONFIG),
                ScaffoldFile::new("README.md", PLAYWRIGHT_README),
            ],
        }
    }

    /// WebdriverIO with the Mocha runner, JavaScript modules
    pub fn webdriverio() -> Self {
        Self {
            name: "webdriverio".to_string(),
            harness: Harness {
                name: "browser".to_string(),
                passed: false,
            },
            locators: templates(&[
                ("id", "{scope}.$('#{value}')"),
                ("className", "{scope}.$('.{value}')"),
                ("cssSelector", "{scope}.$('{value}')"),
                ("xpath", "{scope}.$('{value}')"),
                ("name", "{scope}.$('[name=\"{value}\"]')"),
                ("tagName", "{scope}.$('<{value} />')"),
                ("linkText", "{scope}.$('={value}')"),
                ("partialLinkText", "{scope}.$('*={value}')"),
            ]),
            locators_all: templates(&[
                ("id", "{scope}.$$('#{value}')"),
                ("className", "{scope}.$$('.{value}')"),
                ("cssSelector", "{scope}.$$('{value}')"),
                ("xpath", "{scope}.$$('{value}')"),
                ("name", "{scope}.$$('[name=\"{value}\"]')"),
                ("tagName", "{scope}.$$('<{value} />')"),
                ("linkText", "{scope}.$$('={value}')"),
                ("partialLinkText", "{scope}.$$('*={value}')"),
            ]),
            waits: templates(&[
                ("visibilityOf", "await {element}.waitForDisplayed({ timeout: {timeout} });"),
                ("presenceOf", "await {element}.waitForExist({ timeout: {timeout} });"),
                ("invisibilityOf", "await {element}.waitForDisplayed({ timeout: {timeout}, reverse: true });"),
                ("elementToBeClickable", "await {element}.waitForClickable({ timeout: {timeout} });"),
                (
                    "urlContains",
                    "await {harness}.waitUntil(async () => (await {harness}.getUrl()).includes({value}), { timeout: {timeout} });",
                ),
                (
                    "scriptReturns",
                    "await {harness}.waitUntil(async () => (await {harness}.execute(function () { {code} })) === {expected}, { timeout: {timeout} });",
                ),
            ]),
            asserts: templates(&[
                ("equals", "expect({actual}).toBe({expected});{comment}"),
                ("notEquals", "expect({actual}).not.toBe({expected});{comment}"),
                ("true", "expect({actual}).toBe(true);{comment}"),
                ("false", "expect({actual}).toBe(false);{comment}"),
                ("contains", "expect({actual}).toContain({expected});{comment}"),
                ("null", "expect({actual}).toBeNull();{comment}"),
                ("notNull", "expect({actual}).not.toBeNull();{comment}"),
            ]),
            interactions: templates(&[
                ("clear", "await {element}.clearValue();"),
                ("sendKeys", "await {element}.addValue({text});"),
                ("click", "await {element}.click();"),
                ("hover", "await {element}.moveTo();"),
                ("selectByVisibleText", "await {element}.selectByVisibleText({arg0});"),
                ("selectByValue", "await {element}.selectByAttribute('value', {arg0});"),
                ("selectByIndex", "await {element}.selectByIndex({arg0});"),
                (
                    "submit",
                    "await browser.execute(function (el) { el.form ? el.form.submit() : el.submit(); }, await {element});",
                ),
                ("pressKey", "await {element}.addValue({arg0});"),
                ("doubleClick", "await {element}.doubleClick();"),
                ("contextClick", "await {element}.click({ button: 'right' });"),
                ("dragTo", "await {element}.dragAndDrop({arg0});"),
            ]),
            queries: templates(&[
                ("text", "await {element}.getText()"),
                ("visible", "await {element}.isDisplayed()"),
                ("enabled", "await {element}.isEnabled()"),
                ("selected", "await {element}.isSelected()"),
                ("attribute", "await {element}.getAttribute({arg})"),
                ("value", "await {element}.getValue()"),
                ("count", "await {element}.length"),
            ]),
            page_queries: templates(&[
                ("url", "await {harness}.getUrl()"),
                ("title", "await {harness}.getTitle()"),
                ("source", "await {harness}.getPageSource()"),
            ]),
            lifecycle: templates(&[
                ("openBrowser", ""),
                ("configureWait", ""),
                ("maximize", "await {harness}.maximizeWindow();"),
                ("implicitWait", "await {harness}.setTimeout({ implicit: {timeout} });"),
                ("clearCookies", "await {harness}.deleteAllCookies();"),
                ("closeWindow", "await {harness}.closeWindow();"),
                ("quit", ""),
            ]),
            history: templates(&[
                ("back", "await {harness}.back();"),
                ("forward", "await {harness}.forward();"),
                ("refresh", "await {harness}.refresh();"),
            ]),
            statements: templates(&[
                ("navigate", "await {harness}.url({url});"),
                ("sleep", "await {harness}.pause({millis});"),
                ("nth", "{list}[{index}]"),
                ("key", "Key.{name}"),
                ("require", "if (!(await {element}.isExisting())) throw new Error('element not found');"),
                ("presence", "await {element}.isExisting()"),
            ]),
            script: ScriptBridge {
                function: "function () { {code} }".to_string(),
                statement: "await {harness}.execute({function}{rest_args});".to_string(),
                expression: "await {harness}.execute({function}{rest_args})".to_string(),
                element_arg: "await {element}".to_string(),
                arguments_alias: None,
                synchronicity: Synchronicity::Blocking,
            },
            structure: StructureTemplates {
                test_header: "import { browser, expect } from '@wdio/globals';\nimport { Key } from 'webdriverio';"
                    .to_string(),
                describe: "describe('{name}', () => {\n{body}\n});".to_string(),
                test: "it('{name}', async () => {\n{body}\n});".to_string(),
                skipped_test: "it.skip('{name}', async () => {\n{body}\n});".to_string(),
                before_each: "beforeEach(async () => {\n{body}\n});".to_string(),
                after_each: "afterEach(async () => {\n{body}\n});".to_string(),
                before_all: "before(async () => {\n{body}\n});".to_string(),
                after_all: "after(async () => {\n{body}\n});".to_string(),
                page_object_header: "import { browser, expect } from '@wdio/globals';\nimport { Key } from 'webdriverio';"
                    .to_string(),
                field_declaration: String::new(),
                harness_init: String::new(),
                locator_field: "get {name}() {\n  return {locator};\n}".to_string(),
                locator_placement: LocatorPlacement::Getter,
                utility_header: "import { browser, expect } from '@wdio/globals';\nimport { Key } from 'webdriverio';"
                    .to_string(),
                ..StructureTemplates::default()
            },
            delegate_strategy: DelegateStrategy::Delegated,
            presence_style: PresenceStyle::TryCatch,
            typed: false,
            type_map: Templates::new(),
            default_wait_ms: 10_000,
            indent: "  ".to_string(),
            suffixes: Suffixes {
                test: ".spec".to_string(),
                page_object: String::new(),
                utility: String::new(),
                extension: "js".to_string(),
                import_extension: ".js".to_string(),
            },
            output_root: "test".to_string(),
            project_name: "webdriverio-tests".to_string(),
            scaffold: vec![
                ScaffoldFile::new("wdio.conf.js", WDIO_CONFIG),
                ScaffoldFile::new("package.json", WDIO_PACKAGE),
                ScaffoldFile::new("README.md", WDIO_README),
            ],
        }
    }

    /// Bundled profile by name
    pub fn named(name: &str) -> Option<Self> {
        match name {
            "playwright" => Some(Self::playwright()),
            "webdriverio" | "wdio" => Some(Self::webdriverio()),
            _ => None,
        }
    }

    pub fn with_delegate_strategy(mut self, strategy: DelegateStrategy) -> Self {
        self.delegate_strategy = strategy;
        self
    }

    pub fn with_presence_style(mut self, style: PresenceStyle) -> Self {
        self.presence_style = style;
        self
    }

    pub fn with_project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = name.into();
        self
    }

    /// Template for a multi-element lookup
    pub fn locator_all(&self, strategy: &str) -> Option<&str> {
        self.locators_all
            .get(strategy)
            .or_else(|| self.locators.get(strategy))
            .map(String::as_str)
    }

    /// Target type for a Java simple type name, if the profile maps it
    pub fn map_type(&self, java_type: &str) -> Option<&str> {
        self.type_map.get(java_type).map(String::as_str)
    }
}

// ============================================================================
// PROFILE LOADING
// ============================================================================

#[cfg(feature = "config")]
mod loading {
    use std::path::{Path, PathBuf};

    use thiserror::Error;

    use super::TargetProfile;

    /// Failure to read a profile file.
    #[derive(Debug, Error)]
    pub enum ProfileError {
        #[error("failed to read profile {path}: {source}")]
        Io {
            path: PathBuf,
            #[source]
            source: std::io::Error,
        },
        #[error("invalid JSON profile: {0}")]
        Json(#[from] serde_json::Error),
        #[error("invalid YAML profile: {0}")]
        Yaml(#[from] serde_yaml::Error),
        #[error("unknown profile format for {0} (expected .json, .yaml or .yml)")]
        UnknownFormat(PathBuf),
    }

    impl TargetProfile {
        pub fn from_json_str(text: &str) -> Result<Self, ProfileError> {
            Ok(serde_json::from_str(text)?)
        }

        pub fn from_yaml_str(text: &str) -> Result<Self, ProfileError> {
            Ok(serde_yaml::from_str(text)?)
        }

        /// Load a profile, choosing the format by file extension.
        pub fn load(path: impl AsRef<Path>) -> Result<Self, ProfileError> {
            let path = path.as_ref();
            let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            if !matches!(extension, "json" | "yaml" | "yml") {
                return Err(ProfileError::UnknownFormat(path.to_path_buf()));
            }
            let text = std::fs::read_to_string(path).map_err(|source| ProfileError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            match extension {
                "json" => Self::from_json_str(&text),
                _ => Self::from_yaml_str(&text),
            }
        }
    }
}

#[cfg(feature = "config")]
pub use loading::ProfileError;

// ============================================================================
// SCAFFOLD FILES
// ============================================================================

const PLAYWRIGHT_CONFIG: &str = r#"import { defineConfig, devices } from '@playwright/test';

export default defineConfig({
  testDir: './{output_root}',
  timeout: 30 * 1000,
  expect: {
    timeout: 5000,
  },
  fullyParallel: true,
  forbidOnly: !!process.env.CI,
  retries: process.env.CI ? 2 : 0,
  workers: process.env.CI ? 1 : undefined,
  reporter: 'html',
  use: {
    actionTimeout: 0,
    trace: 'on-first-retry',
  },
  projects: [
    { name: 'chromium', use: { ...devices['Desktop Chrome'] } },
    { name: 'firefox', use: { ...devices['Desktop Firefox'] } },
    { name: 'webkit', use: { ...devices['Desktop Safari'] } },
  ],
});
"#;

const PLAYWRIGHT_PACKAGE: &str = r#"{
  "name": "{project}",
  "version": "1.0.0",
  "description": "Playwright tests converted from Selenium",
  "scripts": {
    "test": "playwright test",
    "test:headed": "playwright test --headed",
    "report": "playwright show-report"
  },
  "devDependencies": {
    "@playwright/test": "^1.40.0",
    "@types/node": "^20.10.0",
    "typescript": "^5.3.2"
  }
}
"#;

const PLAYWRIGHT_TSCONFIG: &str = r#"{
  "compilerOptions": {
    "target": "ES2022",
    "module": "commonjs",
    "moduleResolution": "node",
    "sourceMap": true,
    "outDir": "./dist",
    "esModuleInterop": true,
    "forceConsistentCasingInFileNames": true,
    "strict": true,
    "skipLibCheck": true,
    "resolveJsonModule": true
  },
  "include": ["{output_root}/**/*", "playwright.config.ts"]
}
"#;

const WDIO_CONFIG: &str = r#"export const config = {
  runner: 'local',
  specs: ['./{output_root}/**/*.spec.js'],
  maxInstances: 5,
  capabilities: [{ browserName: 'chrome' }],
  logLevel: 'info',
  waitforTimeout: 10000,
  framework: 'mocha',
  reporters: ['spec'],
  mochaOpts: {
    ui: 'bdd',
    timeout: 60000,
  },
};
"#;

const WDIO_PACKAGE: &str = r#"{
  "name": "{project}",
  "version": "1.0.0",
  "description": "WebdriverIO tests converted from Selenium",
  "type": "module",
  "scripts": {
    "test": "wdio run ./wdio.conf.js"
  },
  "devDependencies": {
    "@wdio/cli": "^8.27.0",
    "@wdio/local-runner": "^8.27.0",
    "@wdio/mocha-framework": "^8.27.0",
    "@wdio/spec-reporter": "^8.27.0",
    "webdriverio": "^8.27.0"
  }
}
"#;

const PLAYWRIGHT_README: &str = r#"# {project}

Playwright Test suite converted from Selenium/JUnit sources.

## Layout

- `{output_root}/`: converted tests, page objects and utility modules
- `playwright.config.ts`: browsers, retries and reporter
- `package.json`: dependencies and scripts

## Running

```
npm install
npx playwright install
npm test
```

Run with a visible browser with `npm run test:headed`, and open the last HTML
report with `npm run report`.

## Conversion notes

Statements the converter could not translate are kept as
`// unconverted:` comments. Search for them before the first run.
"#;

const WDIO_README: &str = r#"# {project}

WebdriverIO suite (Mocha runner) converted from Selenium/JUnit sources.

## Layout

- `{output_root}/`: converted specs, page objects and utility modules
- `wdio.conf.js`: capabilities, timeouts and reporters
- `package.json`: dependencies and scripts

## Running

```
npm install
npm test
```

## Conversion notes

Statements the converter could not translate are kept as
`// unconverted:` comments. Search for them before the first run.
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::template::placeholders;
    use crate::hir::{Condition, Strategy};

    #[test]
    fn test_default_is_playwright() {
        assert_eq!(TargetProfile::default().name, "playwright");
    }

    #[test]
    fn test_bundled_profiles_cover_vocabulary() {
        for profile in [TargetProfile::playwright(), TargetProfile::webdriverio()] {
            for strategy in Strategy::ALL {
                assert!(profile.locators.contains_key(strategy.as_str()), "{}", profile.name);
                assert!(profile.locator_all(strategy.as_str()).is_some());
            }
            for condition in [
                Condition::VisibilityOf,
                Condition::PresenceOf,
                Condition::UrlContains,
                Condition::InvisibilityOf,
                Condition::ElementToBeClickable,
                Condition::ScriptReturns,
            ] {
                assert!(profile.waits.contains_key(condition.as_str()));
            }
        }
    }

    #[test]
    fn test_locator_templates_use_scope_and_value() {
        let profile = TargetProfile::playwright();
        for template in profile.locators.values() {
            assert_eq!(placeholders(template), vec!["scope", "value"]);
        }
    }

    #[test]
    fn test_locator_all_falls_back() {
        let profile = TargetProfile::playwright();
        assert_eq!(profile.locator_all("id"), profile.locators.get("id").map(String::as_str));
        let wdio = TargetProfile::webdriverio();
        assert_eq!(wdio.locator_all("id"), Some("{scope}.$$('#{value}')"));
    }

    #[test]
    fn test_scaffold_uses_project_placeholders() {
        for profile in [TargetProfile::playwright(), TargetProfile::webdriverio()] {
            let readme = profile.scaffold.iter().find(|f| f.path == "README.md").unwrap();
            assert_eq!(placeholders(&readme.text), vec!["project", "output_root"]);
            let package = profile.scaffold.iter().find(|f| f.path == "package.json").unwrap();
            assert_eq!(placeholders(&package.text), vec!["project"]);
        }
    }

    #[test]
    fn test_named() {
        assert_eq!(TargetProfile::named("wdio").map(|p| p.name), Some("webdriverio".into()));
        assert!(TargetProfile::named("cypress").is_none());
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_partial_json_keeps_defaults() {
        let profile = TargetProfile::from_json_str(
            r#"{ "name": "custom", "delegate_strategy": "inline", "locators": { "id": "$('#{value}')" } }"#,
        )
        .expect("profile");
        assert_eq!(profile.name, "custom");
        assert_eq!(profile.delegate_strategy, DelegateStrategy::Inline);
        assert_eq!(profile.locators.len(), 1);
        assert_eq!(profile.harness.name, "page");
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_yaml_profile() {
        let profile = TargetProfile::from_yaml_str("name: yaml\npresence_style: boolean_check\n")
            .expect("profile");
        assert_eq!(profile.presence_style, PresenceStyle::BooleanCheck);
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_load_rejects_unknown_extension() {
        let err = TargetProfile::load("profile.toml").unwrap_err();
        assert!(matches!(err, ProfileError::UnknownFormat(_)));
    }
}
