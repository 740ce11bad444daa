//! Source units: the per-file semantic model.
//!
//! A [`SourceUnit`] is created once per input file by the extractor and never
//! mutated afterwards. Linking adds resolutions beside it, not inside it.

use std::sync::Arc;

use indexmap::IndexMap;
use smol_str::SmolStr;

use super::action::{Action, ActionKind, CallSiteId, DelegateCall, Expr, MethodBody, Provenance, Strategy};

/// What role a unit plays in the test project
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnitKind {
    TestClass,
    PageObject,
    UtilityModule,
    /// A test class that delegates to other project units
    Suite,
}

impl UnitKind {
    pub fn is_test(self) -> bool {
        matches!(self, UnitKind::TestClass | UnitKind::Suite)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UnitKind::TestClass => "test class",
            UnitKind::PageObject => "page object",
            UnitKind::UtilityModule => "utility module",
            UnitKind::Suite => "suite",
        }
    }
}

/// The assertion library a unit is written against
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum TestFramework {
    #[default]
    JUnit4,
    JUnit5,
    TestNG,
}

impl TestFramework {
    /// Whether `assertEquals` takes `(actual, expected)`
    pub fn actual_first(self) -> bool {
        matches!(self, TestFramework::TestNG)
    }

    /// Whether the optional assertion message comes first
    pub fn message_first(self) -> bool {
        matches!(self, TestFramework::JUnit4)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Import {
    /// Dotted path without a trailing `.*`
    pub path: SmolStr,
    pub wildcard: bool,
    pub is_static: bool,
}

impl Import {
    /// Last path segment: the imported type for single-type imports
    pub fn simple_name(&self) -> &str {
        self.path.rsplit('.').next().unwrap_or(&self.path)
    }
}

/// A field-backed locator of a page object
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocatorDef {
    pub strategy: Strategy,
    pub value: String,
    /// `List<WebElement>` fields locate every match
    pub multiple: bool,
}

/// How a field participates in the model
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Driver,
    Wait,
    Actions,
    ScriptExecutor,
    /// Element field with an entry in `SourceUnit::locators`
    Element,
    ElementList,
    /// A `By` field with an entry in `SourceUnit::locators`
    Locator,
    /// Instance of a project type (page object, utility)
    Project(SmolStr),
    Value,
}

impl FieldKind {
    /// Context fields are harness plumbing, not user state
    pub fn is_context(&self) -> bool {
        matches!(
            self,
            FieldKind::Driver | FieldKind::Wait | FieldKind::Actions | FieldKind::ScriptExecutor
        )
    }

    pub fn is_locator_backed(&self) -> bool {
        matches!(self, FieldKind::Element | FieldKind::ElementList | FieldKind::Locator)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldDef {
    pub name: SmolStr,
    pub type_name: SmolStr,
    pub kind: FieldKind,
    pub is_static: bool,
    pub is_final: bool,
    pub init: Option<Expr>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MethodRole {
    /// Runs before each test
    Setup,
    /// Runs after each test
    Teardown,
    SetupAll,
    TeardownAll,
    Constructor,
    Helper,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamDef {
    pub name: SmolStr,
    pub type_name: SmolStr,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MethodDef {
    pub name: SmolStr,
    pub role: MethodRole,
    pub params: Vec<ParamDef>,
    /// `None` for `void`
    pub returns: Option<SmolStr>,
    pub is_static: bool,
    pub body: MethodBody,
    pub provenance: Provenance,
}

impl MethodDef {
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// One test method
#[derive(Clone, Debug, PartialEq)]
pub struct TestCase {
    pub name: SmolStr,
    pub body: MethodBody,
    /// Before-each methods of the owning class
    pub setup: Vec<SmolStr>,
    /// After-each methods of the owning class
    pub teardown: Vec<SmolStr>,
    pub skipped: bool,
    pub provenance: Provenance,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Member {
    Field(FieldDef),
    Method(MethodDef),
    Test(TestCase),
}

/// A class-scoped value created by setup code or constructors
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContextValue {
    Driver { browser: Option<SmolStr> },
    Wait { timeout_ms: Option<u64> },
    Actions,
    ScriptExecutor,
    PageObject { type_name: SmolStr },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContextEntry {
    pub name: SmolStr,
    pub value: ContextValue,
}

/// Explicit record of the singletons a class sets up
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TestContext {
    pub entries: Vec<ContextEntry>,
}

impl TestContext {
    pub fn get(&self, name: &str) -> Option<&ContextValue> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| &e.value)
    }

    /// Insert or replace the entry for `name`, keeping first-seen order
    pub fn set(&mut self, name: SmolStr, value: ContextValue) {
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => entry.value = value,
            None => self.entries.push(ContextEntry { name, value }),
        }
    }

    /// Timeout of the wait stored under `name`
    pub fn wait_timeout(&self, name: &str) -> Option<u64> {
        match self.get(name)? {
            ContextValue::Wait { timeout_ms } => *timeout_ms,
            _ => None,
        }
    }

    /// Timeout of the first configured wait, used when no receiver is known
    pub fn default_wait_timeout(&self) -> Option<u64> {
        self.entries.iter().find_map(|e| match e.value {
            ContextValue::Wait { timeout_ms } => timeout_ms,
            _ => None,
        })
    }

    pub fn browser(&self) -> Option<&SmolStr> {
        self.entries.iter().find_map(|e| match &e.value {
            ContextValue::Driver { browser } => browser.as_ref(),
            _ => None,
        })
    }
}

/// A delegate or instantiation site, as seen by the linker
#[derive(Clone, Debug, PartialEq)]
pub enum CallSiteKind<'a> {
    Delegate(&'a DelegateCall),
    Instantiate { type_name: &'a SmolStr, arity: usize },
}

#[derive(Clone, Debug, PartialEq)]
pub struct CallSiteRef<'a> {
    /// Index into `SourceUnit::members` of the method or test containing the site
    pub member: usize,
    pub owner: &'a SmolStr,
    pub site: CallSiteId,
    pub kind: CallSiteKind<'a>,
    pub provenance: &'a Provenance,
}

/// One input file
#[derive(Clone, Debug, PartialEq)]
pub struct SourceUnit {
    /// Qualified name, `package.Class`
    pub name: SmolStr,
    pub simple_name: SmolStr,
    pub package: Option<SmolStr>,
    pub imports: Vec<Import>,
    pub kind: UnitKind,
    pub framework: TestFramework,
    pub superclass: Option<SmolStr>,
    pub members: Vec<Member>,
    pub locators: IndexMap<SmolStr, LocatorDef>,
    pub context: TestContext,
    /// Name of the input this unit was read from
    pub unit_name: Arc<str>,
}

impl SourceUnit {
    pub fn fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.members.iter().filter_map(|m| match m {
            Member::Field(f) => Some(f),
            _ => None,
        })
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields().find(|f| f.name == name)
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodDef> {
        self.members.iter().filter_map(|m| match m {
            Member::Method(method) => Some(method),
            _ => None,
        })
    }

    pub fn tests(&self) -> impl Iterator<Item = &TestCase> {
        self.members.iter().filter_map(|m| match m {
            Member::Test(t) => Some(t),
            _ => None,
        })
    }

    pub fn constructors(&self) -> impl Iterator<Item = &MethodDef> {
        self.methods().filter(|m| m.role == MethodRole::Constructor)
    }

    /// Non-test, non-constructor methods named `name` taking `arity` arguments
    pub fn methods_named(&self, name: &str, arity: usize) -> Vec<&MethodDef> {
        self.methods()
            .filter(|m| m.role != MethodRole::Constructor && m.name == name && m.arity() == arity)
            .collect()
    }

    pub fn page_object(&self) -> Option<PageObjectModel<'_>> {
        (self.kind == UnitKind::PageObject).then(|| PageObjectModel { unit: self })
    }

    /// Every delegate and instantiation site in declaration order
    pub fn call_sites(&self) -> Vec<CallSiteRef<'_>> {
        let mut sites = Vec::new();
        for (index, member) in self.members.iter().enumerate() {
            let (owner, body) = match member {
                Member::Method(m) => (&m.name, &m.body),
                Member::Test(t) => (&t.name, &t.body),
                Member::Field(_) => continue,
            };
            for action in body.walk() {
                collect_sites(index, owner, action, &mut sites);
            }
        }
        sites
    }

    /// Name of the method or test at `index` in `members`
    pub fn member_name(&self, index: usize) -> Option<&SmolStr> {
        match self.members.get(index)? {
            Member::Field(f) => Some(&f.name),
            Member::Method(m) => Some(&m.name),
            Member::Test(t) => Some(&t.name),
        }
    }

    pub fn method_at(&self, index: usize) -> Option<&MethodDef> {
        match self.members.get(index)? {
            Member::Method(m) => Some(m),
            _ => None,
        }
    }
}

fn collect_sites<'a>(
    member: usize,
    owner: &'a SmolStr,
    action: &'a Action,
    sites: &mut Vec<CallSiteRef<'a>>,
) {
    if let ActionKind::Instantiate {
        type_name,
        args,
        site,
        ..
    } = &action.kind
    {
        sites.push(CallSiteRef {
            member,
            owner,
            site: *site,
            kind: CallSiteKind::Instantiate {
                type_name,
                arity: args.len(),
            },
            provenance: &action.provenance,
        });
    }
    if let ActionKind::Delegate(call) = &action.kind {
        sites.push(CallSiteRef {
            member,
            owner,
            site: call.site,
            kind: CallSiteKind::Delegate(call),
            provenance: &action.provenance,
        });
    }
    for expr in action.exprs() {
        expr.visit(&mut |e| {
            if let Expr::Call(call) = e {
                sites.push(CallSiteRef {
                    member,
                    owner,
                    site: call.site,
                    kind: CallSiteKind::Delegate(call),
                    provenance: &action.provenance,
                });
            }
        });
    }
}

/// View of a page-object unit: its locators and exposed methods
#[derive(Clone, Copy, Debug)]
pub struct PageObjectModel<'a> {
    unit: &'a SourceUnit,
}

impl<'a> PageObjectModel<'a> {
    pub fn class_name(&self) -> &'a SmolStr {
        &self.unit.simple_name
    }

    pub fn locators(&self) -> &'a IndexMap<SmolStr, LocatorDef> {
        &self.unit.locators
    }

    pub fn methods(&self) -> impl Iterator<Item = &'a MethodDef> + 'a {
        self.unit
            .methods()
            .filter(|m| m.role != MethodRole::Constructor)
    }
}
