//! Semantic extraction: from a parsed unit to a [`SourceUnit`].
//!
//! Walks the declarations of the unit's primary class and pattern-matches
//! known call shapes into [`Action`]s, in source order. Anything that matches
//! no pattern is kept as opaque text with a warning.

mod calls;
mod exprs;
mod lower;
mod types;

use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use tracing::debug;

use crate::base::Span;
use crate::hir::action::{Action, ActionKind, CallSiteId, DelegateTarget, Expr, Provenance, Strategy};
use crate::hir::diagnostics::{Diagnostic, DiagnosticCollector, codes};
use crate::hir::model::{
    ContextValue, FieldDef, FieldKind, Import, LocatorDef, Member, MethodDef, MethodRole,
    ParamDef, SourceUnit, TestCase, TestContext, TestFramework, UnitKind,
};
use crate::parser::{
    AstNode, ClassDecl, ClassMember, FieldDecl, Literal, Modifiers, SourceFile, SyntaxKind,
    SyntaxNode,
};
use crate::parser::ast;
use crate::syntax::SyntaxFile;

pub(crate) use lower::BodyLowering;
pub(crate) use types::{TypeClass, TypeOracle, browser_of, is_driver_type};

const TEST_MARKERS: &[&str] = &["Test", "ParameterizedTest", "RepeatedTest"];
const SETUP_MARKERS: &[&str] = &["Before", "BeforeEach", "BeforeMethod"];
const TEARDOWN_MARKERS: &[&str] = &["After", "AfterEach", "AfterMethod"];
const SETUP_ALL_MARKERS: &[&str] = &["BeforeClass", "BeforeAll", "BeforeSuite", "BeforeTest"];
const TEARDOWN_ALL_MARKERS: &[&str] = &["AfterClass", "AfterAll", "AfterSuite", "AfterTest"];
const SKIP_MARKERS: &[&str] = &["Ignore", "Disabled"];

/// A field as the body lowering sees it
#[derive(Clone, Debug)]
pub(crate) struct FieldInfo {
    pub type_name: SmolStr,
    pub class: TypeClass,
    pub is_static: bool,
}

/// Unit-level state shared by every method body of the class.
pub(crate) struct ExtractionContext<'f> {
    pub file: &'f SyntaxFile,
    pub unit: Arc<str>,
    pub simple_name: SmolStr,
    pub framework: TestFramework,
    pub imports: Vec<Import>,
    pub superclass: Option<SmolStr>,
    pub types: TypeOracle,
    pub fields: IndexMap<SmolStr, FieldInfo>,
    pub own_methods: FxHashSet<SmolStr>,
    pub locators: IndexMap<SmolStr, LocatorDef>,
    pub context: TestContext,
    pub diagnostics: DiagnosticCollector,
    next_site: u32,
}

impl<'f> ExtractionContext<'f> {
    fn new(file: &'f SyntaxFile, simple_name: SmolStr, imports: Vec<Import>) -> Self {
        Self {
            file,
            unit: file.unit_name().clone(),
            simple_name,
            framework: detect_framework(&imports),
            types: TypeOracle::new(&imports),
            imports,
            superclass: None,
            fields: IndexMap::new(),
            own_methods: FxHashSet::default(),
            locators: IndexMap::new(),
            context: TestContext::default(),
            diagnostics: DiagnosticCollector::new(),
            next_site: 0,
        }
    }

    pub fn span(&self, node: &SyntaxNode) -> Span {
        self.file.span(node)
    }

    pub fn provenance(&self, node: &SyntaxNode) -> Provenance {
        Provenance::new(self.unit.clone(), self.span(node))
    }

    pub fn next_site(&mut self) -> CallSiteId {
        let site = CallSiteId(self.next_site);
        self.next_site += 1;
        site
    }

    /// Record an opaque fallback for `node`
    pub fn unrecognized(&mut self, node: &SyntaxNode) -> String {
        let text = node.text().to_string().trim().to_string();
        let span = self.span(node);
        self.diagnostics
            .unrecognized_construct(&self.unit, span, &text);
        text
    }

    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.get(name)
    }
}

fn detect_framework(imports: &[Import]) -> TestFramework {
    if imports.iter().any(|i| i.path.starts_with("org.testng")) {
        TestFramework::TestNG
    } else if imports.iter().any(|i| i.path.starts_with("org.junit.jupiter")) {
        TestFramework::JUnit5
    } else {
        TestFramework::JUnit4
    }
}

/// Extract the semantic model of one parsed unit.
///
/// Diagnostics for opaque fallbacks and recovered syntax errors go to
/// `diagnostics`.
pub fn extract(file: &SyntaxFile, diagnostics: &mut DiagnosticCollector) -> SourceUnit {
    let Some(source) = file.source_file() else {
        return empty_unit(file);
    };

    let package = source.package().and_then(|p| p.name());
    let imports: Vec<Import> = source
        .imports()
        .filter_map(|i| {
            Some(Import {
                path: i.path()?,
                wildcard: i.is_wildcard(),
                is_static: i.is_static(),
            })
        })
        .collect();

    let Some(class) = primary_class(&source) else {
        let mut unit = empty_unit(file);
        unit.package = package;
        unit.imports = imports;
        return unit;
    };
    let simple_name = class
        .name()
        .unwrap_or_else(|| SmolStr::new(unit_stem(file.unit_name())));

    let mut cx = ExtractionContext::new(file, simple_name.clone(), imports);
    cx.superclass = class.superclass().map(|t| t.simple_name());
    for error in file.errors() {
        let span = Span::new(file.position(error.range.start()), file.position(error.range.end()));
        cx.diagnostics.add(
            Diagnostic::warning(cx.unit.clone(), error.message.clone())
                .with_span(span)
                .with_code(codes::RECOVERED_SYNTAX),
        );
    }

    let body = class.body();
    let class_members: Vec<ClassMember> = body.iter().flat_map(|b| b.members()).collect();

    collect_fields(&mut cx, &class_members);
    for member in &class_members {
        if let ClassMember::Method(method) = member {
            cx.own_methods.extend(method.name());
        }
    }
    prescan_context(&mut cx, class.syntax(), &class_members);

    let roles = MemberRoles::detect(&simple_name, &class_members);
    let members = lower_members(&mut cx, &class_members, &roles);

    let uses_page_factory = class.syntax().descendants().filter_map(ast::CallExpr::cast).any(|c| {
        c.name().as_deref() == Some("initElements")
            && matches!(c.receiver(), Some(ast::Expr::Name(n)) if n.name() == "PageFactory")
    });
    let kind = classify(&cx, &simple_name, &members, roles.is_test_class, uses_page_factory);

    let name = match &package {
        Some(package) => SmolStr::new(format!("{package}.{simple_name}")),
        None => simple_name.clone(),
    };
    debug!(
        unit = %cx.unit,
        name = %name,
        kind = kind.as_str(),
        members = members.len(),
        "extracted unit"
    );

    diagnostics.extend(cx.diagnostics.take());
    SourceUnit {
        name,
        simple_name,
        package,
        imports: cx.imports,
        kind,
        framework: cx.framework,
        superclass: cx.superclass,
        members,
        locators: cx.locators,
        context: cx.context,
        unit_name: cx.unit,
    }
}

fn empty_unit(file: &SyntaxFile) -> SourceUnit {
    let stem = SmolStr::new(unit_stem(file.unit_name()));
    SourceUnit {
        name: stem.clone(),
        simple_name: stem,
        package: None,
        imports: Vec::new(),
        kind: UnitKind::UtilityModule,
        framework: TestFramework::default(),
        superclass: None,
        members: Vec::new(),
        locators: IndexMap::new(),
        context: TestContext::default(),
        unit_name: file.unit_name().clone(),
    }
}

/// `src/com/acme/LoginTest.java` is `LoginTest`
fn unit_stem(unit_name: &str) -> &str {
    let file = unit_name.rsplit(['/', '\\']).next().unwrap_or(unit_name);
    file.strip_suffix(".java").unwrap_or(file)
}

/// The public top-level class, or the first one
fn primary_class(source: &SourceFile) -> Option<ClassDecl> {
    let classes: Vec<_> = source.classes().collect();
    classes
        .iter()
        .find(|c| {
            c.modifiers()
                .is_some_and(|m| m.has(SyntaxKind::PUBLIC_KW))
        })
        .or(classes.first())
        .cloned()
}

// ============================================================================
// FIELDS AND CONTEXT
// ============================================================================

fn collect_fields(cx: &mut ExtractionContext<'_>, members: &[ClassMember]) {
    for member in members {
        let ClassMember::Field(field) = member else {
            continue;
        };
        let Some(ty) = field.ty() else { continue };
        let mut class = cx.types.classify(&ty);
        let is_static = field.modifiers().is_some_and(|m| m.is_static());
        let modifiers = field.modifiers();

        for declarator in field.declarators() {
            let Some(name) = declarator.name() else { continue };
            match class {
                TypeClass::Element | TypeClass::ElementList => {
                    let multiple = class == TypeClass::ElementList;
                    match modifiers.as_ref().and_then(|m| find_by_locator(m)) {
                        Some(Ok((strategy, value))) => {
                            cx.locators.insert(
                                name.clone(),
                                LocatorDef {
                                    strategy,
                                    value,
                                    multiple,
                                },
                            );
                        }
                        Some(Err(annotation)) => {
                            cx.unrecognized(&annotation);
                        }
                        None => {}
                    }
                }
                TypeClass::By => {
                    let by = declarator.init().and_then(|init| literal_by(&init));
                    if let Some((strategy, value)) = by {
                        cx.locators.insert(
                            name.clone(),
                            LocatorDef {
                                strategy,
                                value,
                                multiple: false,
                            },
                        );
                    } else {
                        class = TypeClass::Value;
                    }
                }
                _ => {}
            }
            cx.fields.insert(
                name,
                FieldInfo {
                    type_name: ty.simple_name(),
                    class: class.clone(),
                    is_static,
                },
            );
        }
    }
}

/// `@FindBy(id = "x")` or `@FindBy(how = How.ID, using = "x")`.
///
/// `Err` carries the annotation node when it is present but not understood.
fn find_by_locator(modifiers: &Modifiers) -> Option<Result<(Strategy, String), SyntaxNode>> {
    let annotation = modifiers.annotation("FindBy")?;
    let node = annotation.syntax().clone();

    let how = annotation.arg("how").and_then(|e| match e {
        ast::Expr::Field(f) => f.name().and_then(|n| Strategy::from_how(&n)),
        _ => None,
    });
    if let Some(strategy) = how {
        let using = annotation.arg("using").and_then(string_literal);
        return Some(using.map(|v| (strategy, v)).ok_or(node));
    }

    for arg in annotation.args() {
        let Some(key) = arg.key() else { continue };
        if let Some(strategy) = Strategy::from_find_by_key(&key) {
            return Some(arg.value().and_then(string_literal).map(|v| (strategy, v)).ok_or(node));
        }
    }
    Some(Err(node))
}

fn string_literal(expr: ast::Expr) -> Option<String> {
    match expr.unwrap_parens() {
        ast::Expr::Literal(lit) => lit.as_string(),
        _ => None,
    }
}

/// `By.id("x")` with a literal argument
pub(crate) fn literal_by(expr: &ast::Expr) -> Option<(Strategy, String)> {
    let ast::Expr::Call(call) = expr.clone().unwrap_parens() else {
        return None;
    };
    let Some(ast::Expr::Name(receiver)) = call.receiver() else {
        return None;
    };
    if receiver.name() != "By" {
        return None;
    }
    let strategy = Strategy::from_by_method(&call.name()?)?;
    let value = call.args().into_iter().next().and_then(string_literal)?;
    Some((strategy, value))
}

/// Name of the field an assignment target refers to: `x` or `this.x`
pub(crate) fn assigned_field(target: &ast::Expr) -> Option<SmolStr> {
    match target {
        ast::Expr::Name(n) => Some(n.name()),
        ast::Expr::Field(f) if matches!(f.receiver(), Some(ast::Expr::This(_))) => f.name(),
        _ => None,
    }
}

/// Record the context values that field initializers, constructors and
/// setup methods create.
fn prescan_context(cx: &mut ExtractionContext<'_>, class: &SyntaxNode, members: &[ClassMember]) {
    let fields: Vec<(SmolStr, FieldInfo)> = cx
        .fields
        .iter()
        .map(|(name, info)| (name.clone(), info.clone()))
        .collect();
    for (name, info) in &fields {
        match info.class {
            TypeClass::Driver => cx.context.set(name.clone(), ContextValue::Driver { browser: None }),
            TypeClass::Wait => cx.context.set(name.clone(), ContextValue::Wait { timeout_ms: None }),
            TypeClass::Actions => cx.context.set(name.clone(), ContextValue::Actions),
            TypeClass::ScriptExecutor => cx.context.set(name.clone(), ContextValue::ScriptExecutor),
            _ => {}
        }
    }

    let mut assignments: Vec<(SmolStr, ast::Expr)> = Vec::new();
    for member in members {
        let ClassMember::Field(field) = member else { continue };
        for declarator in field.declarators() {
            if let (Some(name), Some(init)) = (declarator.name(), declarator.init()) {
                assignments.push((name, init));
            }
        }
    }
    for assign in class.descendants().filter_map(ast::AssignExpr::cast) {
        if assign.op() != Some(SyntaxKind::EQ) {
            continue;
        }
        if let (Some(name), Some(value)) = (assign.target().as_ref().and_then(assigned_field), assign.value()) {
            assignments.push((name, value));
        }
    }

    for (name, value) in assignments {
        let Some(info) = cx.field(&name).cloned() else {
            continue;
        };
        let value = value.unwrap_parens();
        match (&info.class, &value) {
            (TypeClass::Driver, ast::Expr::New(new)) => {
                let browser = new.ty().and_then(|t| browser_of(&t.simple_name()));
                cx.context.set(name, ContextValue::Driver { browser });
            }
            (TypeClass::Wait, ast::Expr::New(new)) => {
                let timeout_ms = wait_timeout(&new.args());
                cx.context.set(name, ContextValue::Wait { timeout_ms });
            }
            (TypeClass::Project(type_name), ast::Expr::New(_)) => {
                cx.context.set(
                    name,
                    ContextValue::PageObject {
                        type_name: type_name.clone(),
                    },
                );
            }
            (TypeClass::Element | TypeClass::ElementList, ast::Expr::Call(call)) => {
                let finder = call.name();
                if !matches!(finder.as_deref(), Some("findElement" | "findElements")) {
                    continue;
                }
                if let Some((strategy, value)) = call.args().first().and_then(literal_by) {
                    cx.locators.entry(name).or_insert(LocatorDef {
                        strategy,
                        value,
                        multiple: finder.as_deref() == Some("findElements"),
                    });
                }
            }
            _ => {}
        }
    }

    // element fields nobody locates are plain values from here on
    for (name, info) in cx.fields.iter_mut() {
        let element = matches!(
            info.class,
            TypeClass::Element | TypeClass::ElementList | TypeClass::Select
        );
        if element && !cx.locators.contains_key(name) {
            info.class = TypeClass::Value;
        }
    }
}

/// Timeout of `new WebDriverWait(driver, <timeout>)`, in milliseconds
pub(crate) fn wait_timeout(args: &[ast::Expr]) -> Option<u64> {
    let timeout = args.get(1)?.clone().unwrap_parens();
    match timeout {
        ast::Expr::Literal(lit) => int_value(&lit).map(|secs| secs * 1000),
        ast::Expr::Call(call) => {
            let amount = call.args().first().and_then(|a| match a.clone().unwrap_parens() {
                ast::Expr::Literal(lit) => int_value(&lit),
                _ => None,
            })?;
            match call.name()?.as_str() {
                "ofSeconds" => Some(amount * 1000),
                "ofMillis" => Some(amount),
                "ofMinutes" => Some(amount * 60_000),
                _ => None,
            }
        }
        _ => None,
    }
}

fn int_value(lit: &Literal) -> Option<u64> {
    match lit.value()? {
        ast::LiteralValue::Int(n) => u64::try_from(n).ok(),
        _ => None,
    }
}

// ============================================================================
// MEMBERS
// ============================================================================

/// Test and lifecycle roles of the class's methods, decided before lowering
struct MemberRoles {
    is_test_class: bool,
    /// Name-based test class without `@Test` markers
    by_convention: bool,
    setup: Vec<SmolStr>,
    teardown: Vec<SmolStr>,
}

impl MemberRoles {
    fn detect(class_name: &str, members: &[ClassMember]) -> Self {
        let mut has_marker = false;
        let mut has_lifecycle = false;
        let mut setup = Vec::new();
        let mut teardown = Vec::new();
        for member in members {
            let ClassMember::Method(method) = member else { continue };
            let Some(modifiers) = method.modifiers() else { continue };
            has_marker |= TEST_MARKERS.iter().any(|m| modifiers.has_annotation(m));
            match lifecycle_role(&modifiers) {
                Some(MethodRole::Setup) => {
                    has_lifecycle = true;
                    setup.extend(method.name());
                }
                Some(MethodRole::Teardown) => {
                    has_lifecycle = true;
                    teardown.extend(method.name());
                }
                Some(_) => has_lifecycle = true,
                None => {}
            }
        }
        let named_like_test = ["Test", "Tests", "TestCase"]
            .iter()
            .any(|suffix| class_name.ends_with(suffix));
        let by_convention = !has_marker && named_like_test && has_lifecycle;
        Self {
            is_test_class: has_marker || by_convention,
            by_convention,
            setup,
            teardown,
        }
    }

    fn is_test(&self, method: &ast::MethodDecl) -> bool {
        let modifiers = method.modifiers();
        if modifiers
            .as_ref()
            .is_some_and(|m| TEST_MARKERS.iter().any(|t| m.has_annotation(t)))
        {
            return true;
        }
        self.by_convention
            && modifiers.as_ref().is_none_or(|m| lifecycle_role(m).is_none())
            && method.name().is_some_and(|n| n.starts_with("test"))
            && method.params().is_empty()
            && method.return_type().is_some_and(|t| t.is_void())
    }
}

fn lifecycle_role(modifiers: &Modifiers) -> Option<MethodRole> {
    let has = |names: &[&str]| names.iter().any(|n| modifiers.has_annotation(n));
    if has(SETUP_MARKERS) {
        Some(MethodRole::Setup)
    } else if has(TEARDOWN_MARKERS) {
        Some(MethodRole::Teardown)
    } else if has(SETUP_ALL_MARKERS) {
        Some(MethodRole::SetupAll)
    } else if has(TEARDOWN_ALL_MARKERS) {
        Some(MethodRole::TeardownAll)
    } else {
        None
    }
}

fn is_skipped(modifiers: &Modifiers) -> bool {
    if SKIP_MARKERS.iter().any(|m| modifiers.has_annotation(m)) {
        return true;
    }
    modifiers
        .annotation("Test")
        .and_then(|t| t.arg("enabled"))
        .is_some_and(|e| matches!(e, ast::Expr::Literal(l) if l.value() == Some(ast::LiteralValue::Bool(false))))
}

fn params_of(params: &[ast::Param]) -> Vec<ParamDef> {
    params
        .iter()
        .filter_map(|p| {
            Some(ParamDef {
                name: p.name()?,
                type_name: p.ty().map(|t| t.simple_name()).unwrap_or_default(),
            })
        })
        .collect()
}

fn lower_members(
    cx: &mut ExtractionContext<'_>,
    members: &[ClassMember],
    roles: &MemberRoles,
) -> Vec<Member> {
    let mut out = Vec::new();
    for member in members {
        match member {
            ClassMember::Field(field) => out.extend(lower_field(cx, field)),
            ClassMember::Method(method) => {
                let Some(name) = method.name() else { continue };
                let modifiers = method.modifiers();
                let params = method.params();
                let provenance = cx.provenance(method.syntax());
                let body = BodyLowering::lower_method(cx, &params, method.body());

                if roles.is_test(method) {
                    out.push(Member::Test(TestCase {
                        name,
                        body,
                        setup: roles.setup.clone(),
                        teardown: roles.teardown.clone(),
                        skipped: modifiers.as_ref().is_some_and(is_skipped),
                        provenance,
                    }));
                    continue;
                }

                let role = modifiers
                    .as_ref()
                    .and_then(lifecycle_role)
                    .unwrap_or(MethodRole::Helper);
                out.push(Member::Method(MethodDef {
                    name,
                    role,
                    params: params_of(&params),
                    returns: method
                        .return_type()
                        .filter(|t| !t.is_void())
                        .map(|t| t.simple_name()),
                    is_static: modifiers.as_ref().is_some_and(|m| m.is_static()),
                    body,
                    provenance,
                }));
            }
            ClassMember::Constructor(ctor) => {
                let params = ctor.params();
                let provenance = cx.provenance(ctor.syntax());
                let body = BodyLowering::lower_method(cx, &params, ctor.body());
                out.push(Member::Method(MethodDef {
                    name: cx.simple_name.clone(),
                    role: MethodRole::Constructor,
                    params: params_of(&params),
                    returns: None,
                    is_static: false,
                    body,
                    provenance,
                }));
            }
            ClassMember::Class(nested) => {
                cx.unrecognized(nested.syntax());
            }
            ClassMember::Initializer(init) => {
                cx.unrecognized(init.syntax());
            }
        }
    }
    out
}

fn lower_field(cx: &mut ExtractionContext<'_>, field: &FieldDecl) -> Vec<Member> {
    let is_final = field.modifiers().is_some_and(|m| m.is_final());
    let mut out = Vec::new();
    for declarator in field.declarators() {
        let Some(name) = declarator.name() else { continue };
        let Some(info) = cx.field(&name).cloned() else { continue };
        let kind = match &info.class {
            TypeClass::Driver => FieldKind::Driver,
            TypeClass::Wait => FieldKind::Wait,
            TypeClass::Actions => FieldKind::Actions,
            TypeClass::ScriptExecutor => FieldKind::ScriptExecutor,
            TypeClass::Element | TypeClass::Select if cx.locators.contains_key(&name) => FieldKind::Element,
            TypeClass::ElementList if cx.locators.contains_key(&name) => FieldKind::ElementList,
            TypeClass::By => FieldKind::Locator,
            TypeClass::Project(t) => FieldKind::Project(t.clone()),
            _ => FieldKind::Value,
        };
        let init = match (&kind, declarator.init()) {
            (FieldKind::Value, Some(init)) => Some(BodyLowering::lower_constant(cx, &init)),
            _ => None,
        };
        out.push(Member::Field(FieldDef {
            name,
            type_name: info.type_name.clone(),
            kind,
            is_static: info.is_static,
            is_final,
            init,
        }));
    }
    out
}

// ============================================================================
// CLASSIFICATION
// ============================================================================

fn classify(
    cx: &ExtractionContext<'_>,
    simple_name: &str,
    members: &[Member],
    is_test_class: bool,
    uses_page_factory: bool,
) -> UnitKind {
    if is_test_class {
        let delegates_out = members.iter().any(|m| {
            let body = match m {
                Member::Method(method) => &method.body,
                Member::Test(test) => &test.body,
                Member::Field(_) => return false,
            };
            body.walk().iter().any(|a| delegates_outward(a))
        });
        return if delegates_out {
            UnitKind::Suite
        } else {
            UnitKind::TestClass
        };
    }

    let page_like = simple_name.ends_with("Page")
        || simple_name.ends_with("PageObject")
        || uses_page_factory
        || !cx.locators.is_empty()
        || cx
            .fields
            .values()
            .any(|f| matches!(f.class, TypeClass::Element | TypeClass::ElementList | TypeClass::By));
    if page_like {
        UnitKind::PageObject
    } else {
        UnitKind::UtilityModule
    }
}

/// A delegate or instantiation that leaves the unit
fn delegates_outward(action: &Action) -> bool {
    match &action.kind {
        ActionKind::Instantiate { .. } => true,
        ActionKind::Delegate(call) if call.target != DelegateTarget::This => true,
        _ => action.exprs().iter().any(|e| {
            let mut found = false;
            e.visit(&mut |inner| {
                if let Expr::Call(call) = inner {
                    found |= call.target != DelegateTarget::This;
                }
            });
            found
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parse;

    fn extract_str(text: &str) -> (SourceUnit, DiagnosticCollector) {
        let file = parse(text, "Sample.java").expect("parse");
        let mut diagnostics = DiagnosticCollector::new();
        let unit = extract(&file, &mut diagnostics);
        (unit, diagnostics)
    }

    #[test]
    fn test_unit_stem() {
        assert_eq!(unit_stem("src/com/acme/LoginTest.java"), "LoginTest");
        assert_eq!(unit_stem("Plain"), "Plain");
    }

    #[test]
    fn test_framework_detection() {
        let (unit, _) = extract_str("import org.testng.annotations.Test;\nclass A { @Test void t() {} }");
        assert_eq!(unit.framework, TestFramework::TestNG);
        let (unit, _) = extract_str("import org.junit.jupiter.api.Test;\nclass A { @Test void t() {} }");
        assert_eq!(unit.framework, TestFramework::JUnit5);
    }

    #[test]
    fn test_find_by_how_using() {
        let (unit, _) = extract_str(
            "class SearchPanel { @FindBy(how = How.CSS, using = \"#q\") private WebElement query; }",
        );
        assert_eq!(unit.kind, UnitKind::PageObject);
        let locator = &unit.locators["query"];
        assert_eq!(locator.strategy, Strategy::CssSelector);
        assert_eq!(locator.value, "#q");
    }

    #[test]
    fn test_unknown_find_by_is_reported() {
        let (unit, diagnostics) = extract_str(
            "class SearchPage { @FindBy(id = SOME_CONSTANT) private WebElement query; }",
        );
        assert!(unit.locators.is_empty());
        assert_eq!(diagnostics.warning_count(), 1);
        assert_eq!(unit.field("query").map(|f| &f.kind), Some(&FieldKind::Value));
    }

    #[test]
    fn test_constructor_locators_and_context() {
        let (unit, _) = extract_str(
            r#"public class CheckoutPage {
                private WebDriver driver;
                private WebDriverWait wait;
                private WebElement payButton;
                public CheckoutPage(WebDriver driver) {
                    this.driver = driver;
                    this.wait = new WebDriverWait(driver, Duration.ofMillis(2500));
                    this.payButton = driver.findElement(By.id("pay"));
                }
            }"#,
        );
        assert_eq!(unit.locators["payButton"].strategy, Strategy::Id);
        assert_eq!(unit.context.wait_timeout("wait"), Some(2500));
        assert_eq!(unit.field("payButton").map(|f| &f.kind), Some(&FieldKind::Element));
        assert_eq!(unit.constructors().count(), 1);
    }

    #[test]
    fn test_classification_by_convention() {
        let (unit, _) = extract_str(
            r#"public class SmokeTests {
                @Before public void setUp() {}
                public void testHome() {}
                public void helper() {}
            }"#,
        );
        assert_eq!(unit.kind, UnitKind::TestClass);
        let tests: Vec<_> = unit.tests().map(|t| t.name.as_str()).collect();
        assert_eq!(tests, ["testHome"]);
        assert_eq!(unit.tests().next().map(|t| t.setup.clone()), Some(vec![SmolStr::new("setUp")]));
    }

    #[test]
    fn test_skipped_tests() {
        let (unit, _) = extract_str(
            r#"class A {
                @Test @Ignore public void one() {}
                @Test(enabled = false) public void two() {}
                @Test public void three() {}
            }"#,
        );
        let skipped: Vec<_> = unit.tests().map(|t| t.skipped).collect();
        assert_eq!(skipped, [true, true, false]);
    }

    #[test]
    fn test_utility_module() {
        let (unit, _) = extract_str("package a.b;\npublic class Strings { public static String up(String s) { return s.toUpperCase(); } }");
        assert_eq!(unit.kind, UnitKind::UtilityModule);
        assert_eq!(unit.name, "a.b.Strings");
        let method = unit.methods().next().expect("method");
        assert!(method.is_static);
        assert_eq!(method.returns.as_deref(), Some("String"));
    }
}
