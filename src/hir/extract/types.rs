//! Declared-type classification.
//!
//! The extractor recognizes browser-automation values by their declared Java
//! type, and tells library types from project types by name and import.

use smol_str::SmolStr;

use crate::hir::model::Import;
use crate::parser::TypeRef;

/// Package prefixes whose types never belong to the project
const LIBRARY_PREFIXES: &[&str] = &[
    "java.",
    "javax.",
    "org.openqa.",
    "org.junit.",
    "org.testng.",
    "org.hamcrest.",
];

/// JDK, Selenium and test-framework names that need no import to be known
const LIBRARY_TYPES: &[&str] = &[
    // java.lang and friends
    "Object", "String", "StringBuilder", "StringBuffer", "Integer", "Long", "Short", "Byte",
    "Double", "Float", "Boolean", "Character", "Number", "Math", "System", "Thread", "Runtime",
    "Exception", "RuntimeException", "Error", "Throwable", "InterruptedException",
    "IllegalStateException", "IllegalArgumentException", "Iterable", "Class", "Enum",
    // java.util, java.time, java.io, java.nio
    "List", "ArrayList", "LinkedList", "Map", "HashMap", "LinkedHashMap", "TreeMap", "Set",
    "HashSet", "Collection", "Collections", "Arrays", "Optional", "Random", "UUID", "Iterator",
    "Duration", "LocalDate", "LocalDateTime", "Instant", "File", "Files", "Path", "Paths",
    "IOException", "Properties", "Objects", "Stream", "Collectors", "TimeUnit",
    // Selenium
    "WebDriver", "WebElement", "By", "Keys", "Select", "Actions", "Action", "WebDriverWait",
    "FluentWait", "Wait", "ExpectedConditions", "ExpectedCondition", "JavascriptExecutor",
    "PageFactory", "FindBy", "FindAll", "How", "ChromeDriver", "FirefoxDriver", "EdgeDriver",
    "SafariDriver", "InternetExplorerDriver", "RemoteWebDriver", "ChromeOptions",
    "FirefoxOptions", "TakesScreenshot", "OutputType", "Alert", "Cookie", "Dimension",
    "Point", "NoSuchElementException", "TimeoutException", "StaleElementReferenceException",
    "WebDriverException", "ElementNotInteractableException",
    // test frameworks
    "Assert", "Assertions", "Test", "Before", "After", "BeforeClass", "AfterClass",
    "BeforeEach", "AfterEach", "BeforeAll", "AfterAll", "BeforeMethod", "AfterMethod",
    "Ignore", "Disabled", "DisplayName", "MatcherAssert", "Matchers",
];

const PRIMITIVES: &[&str] = &[
    "boolean", "byte", "char", "short", "int", "long", "float", "double", "void", "var",
];

const DRIVER_TYPES: &[&str] = &[
    "WebDriver",
    "ChromeDriver",
    "FirefoxDriver",
    "EdgeDriver",
    "SafariDriver",
    "InternetExplorerDriver",
    "RemoteWebDriver",
];

/// What a declared type means to the extractor
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum TypeClass {
    Driver,
    Wait,
    Actions,
    ScriptExecutor,
    Element,
    ElementList,
    /// `Select` wraps an element transparently
    Select,
    By,
    Project(SmolStr),
    Value,
}

pub(crate) fn is_driver_type(name: &str) -> bool {
    DRIVER_TYPES.contains(&name)
}

/// Browser name of a concrete driver class: `ChromeDriver` is `chrome`
pub(crate) fn browser_of(driver_class: &str) -> Option<SmolStr> {
    let browser = match driver_class {
        "ChromeDriver" => "chrome",
        "FirefoxDriver" => "firefox",
        "EdgeDriver" => "edge",
        "SafariDriver" => "safari",
        "InternetExplorerDriver" => "ie",
        _ => return None,
    };
    Some(SmolStr::new(browser))
}

/// Decides which type names belong to the project being converted
#[derive(Clone, Debug)]
pub(crate) struct TypeOracle {
    imports: Vec<Import>,
}

impl TypeOracle {
    pub(crate) fn new(imports: &[Import]) -> Self {
        Self {
            imports: imports.to_vec(),
        }
    }

    pub(crate) fn is_library(&self, simple_name: &str) -> bool {
        if LIBRARY_TYPES.contains(&simple_name) || PRIMITIVES.contains(&simple_name) {
            return true;
        }
        self.imports.iter().any(|import| {
            !import.wildcard
                && import.simple_name() == simple_name
                && LIBRARY_PREFIXES.iter().any(|p| import.path.starts_with(p))
        })
    }

    /// A capitalized, non-library type name
    pub(crate) fn is_project(&self, simple_name: &str) -> bool {
        simple_name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_uppercase())
            && !self.is_library(simple_name)
    }

    pub(crate) fn classify(&self, ty: &TypeRef) -> TypeClass {
        let simple = ty.simple_name();
        if ty.is_array() {
            return if simple == "WebElement" {
                TypeClass::ElementList
            } else {
                TypeClass::Value
            };
        }
        match simple.as_str() {
            name if is_driver_type(name) => TypeClass::Driver,
            "WebDriverWait" | "FluentWait" | "Wait" => TypeClass::Wait,
            "Actions" => TypeClass::Actions,
            "JavascriptExecutor" => TypeClass::ScriptExecutor,
            "WebElement" => TypeClass::Element,
            "Select" => TypeClass::Select,
            "By" => TypeClass::By,
            "List" | "ArrayList" | "Collection" | "Iterable" => {
                let of_elements = ty
                    .type_args()
                    .first()
                    .is_some_and(|arg| arg.simple_name() == "WebElement");
                if of_elements {
                    TypeClass::ElementList
                } else {
                    TypeClass::Value
                }
            }
            name if self.is_project(name) => TypeClass::Project(simple.clone()),
            _ => TypeClass::Value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{AstNode, parse_java};
    use rstest::rstest;

    fn type_of(decl: &str) -> TypeRef {
        let parse = parse_java(&format!("class A {{ {decl} x; }}"));
        parse
            .syntax()
            .descendants()
            .find_map(TypeRef::cast)
            .expect("type")
    }

    fn oracle() -> TypeOracle {
        TypeOracle::new(&[
            Import {
                path: "org.openqa.selenium.support.ui.Sleeper".into(),
                wildcard: false,
                is_static: false,
            },
            Import {
                path: "com.example.pages.LoginPage".into(),
                wildcard: false,
                is_static: false,
            },
        ])
    }

    #[rstest]
    #[case("WebDriver", TypeClass::Driver)]
    #[case("ChromeDriver", TypeClass::Driver)]
    #[case("WebDriverWait", TypeClass::Wait)]
    #[case("WebElement", TypeClass::Element)]
    #[case("List<WebElement>", TypeClass::ElementList)]
    #[case("WebElement[]", TypeClass::ElementList)]
    #[case("List<String>", TypeClass::Value)]
    #[case("Select", TypeClass::Select)]
    #[case("By", TypeClass::By)]
    #[case("JavascriptExecutor", TypeClass::ScriptExecutor)]
    #[case("Sleeper", TypeClass::Value)]
    #[case("LoginPage", TypeClass::Project("LoginPage".into()))]
    #[case("int", TypeClass::Value)]
    fn test_classify(#[case] decl: &str, #[case] expected: TypeClass) {
        assert_eq!(oracle().classify(&type_of(decl)), expected);
    }

    #[test]
    fn test_browser_of() {
        assert_eq!(browser_of("FirefoxDriver").as_deref(), Some("firefox"));
        assert_eq!(browser_of("RemoteWebDriver"), None);
    }
}
