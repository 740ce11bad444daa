//! Actions: the target-agnostic vocabulary of a test step.
//!
//! An [`Action`] is one step of a method body in source order. Values flowing
//! through actions are [`Expr`] trees that name no target framework.

use std::sync::Arc;

use smol_str::SmolStr;

use crate::base::Span;

// ============================================================================
// PROVENANCE AND HANDLES
// ============================================================================

/// Where an action came from: the input unit and the source lines.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Provenance {
    pub unit: Arc<str>,
    pub span: Span,
}

impl Provenance {
    pub fn new(unit: Arc<str>, span: Span) -> Self {
        Self { unit, span }
    }
}

/// A logical element handle, local to one method body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementRef(pub u32);

impl ElementRef {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identifies a delegate or instantiation call site within its unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CallSiteId(pub u32);

/// How an element handle came into scope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ElementOrigin {
    /// Produced by a `Locate` action in this body
    Located,
    /// A page-object field backed by a locator
    Field(SmolStr),
    /// A method parameter typed as an element
    Param(SmolStr),
    /// Produced by an `Nth` action in this body
    Nth,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementBinding {
    /// Source-level variable name; `None` for inline lookups
    pub name: Option<SmolStr>,
    pub origin: ElementOrigin,
}

/// The ordered actions of one method plus its element table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MethodBody {
    pub actions: Vec<Action>,
    pub elements: Vec<ElementBinding>,
}

impl MethodBody {
    pub fn element(&self, element: ElementRef) -> Option<&ElementBinding> {
        self.elements.get(element.index())
    }

    /// Every action in the body, nested ones included, in source order
    pub fn walk(&self) -> Vec<&Action> {
        let mut out = Vec::new();
        for action in &self.actions {
            action.walk(&mut out);
        }
        out
    }

    pub fn contains_return(&self) -> bool {
        self.walk()
            .iter()
            .any(|a| matches!(a.kind, ActionKind::Return(_)))
    }
}

// ============================================================================
// VOCABULARY
// ============================================================================

/// Element lookup strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Strategy {
    Id,
    ClassName,
    LinkText,
    PartialLinkText,
    CssSelector,
    Xpath,
    Name,
    TagName,
}

impl Strategy {
    pub const ALL: [Strategy; 8] = [
        Strategy::Id,
        Strategy::ClassName,
        Strategy::LinkText,
        Strategy::PartialLinkText,
        Strategy::CssSelector,
        Strategy::Xpath,
        Strategy::Name,
        Strategy::TagName,
    ];

    /// Profile key of the strategy
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Id => "id",
            Strategy::ClassName => "className",
            Strategy::LinkText => "linkText",
            Strategy::PartialLinkText => "partialLinkText",
            Strategy::CssSelector => "cssSelector",
            Strategy::Xpath => "xpath",
            Strategy::Name => "name",
            Strategy::TagName => "tagName",
        }
    }

    /// `By.<method>(...)`
    pub fn from_by_method(method: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == method)
    }

    /// `@FindBy(<key> = "...")`, including the short `css` key
    pub fn from_find_by_key(key: &str) -> Option<Self> {
        match key {
            "css" => Some(Strategy::CssSelector),
            other => Self::from_by_method(other),
        }
    }

    /// `How.<CONSTANT>`
    pub fn from_how(constant: &str) -> Option<Self> {
        match constant {
            "ID" => Some(Strategy::Id),
            "CLASS_NAME" => Some(Strategy::ClassName),
            "LINK_TEXT" => Some(Strategy::LinkText),
            "PARTIAL_LINK_TEXT" => Some(Strategy::PartialLinkText),
            "CSS" => Some(Strategy::CssSelector),
            "XPATH" => Some(Strategy::Xpath),
            "NAME" => Some(Strategy::Name),
            "TAG_NAME" => Some(Strategy::TagName),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InteractOp {
    Clear,
    SendKeys,
    Click,
    Hover,
    SelectByVisibleText,
    Submit,
    PressKey,
    DoubleClick,
    ContextClick,
    SelectByValue,
    SelectByIndex,
    DragTo,
}

impl InteractOp {
    pub fn as_str(self) -> &'static str {
        match self {
            InteractOp::Clear => "clear",
            InteractOp::SendKeys => "sendKeys",
            InteractOp::Click => "click",
            InteractOp::Hover => "hover",
            InteractOp::SelectByVisibleText => "selectByVisibleText",
            InteractOp::Submit => "submit",
            InteractOp::PressKey => "pressKey",
            InteractOp::DoubleClick => "doubleClick",
            InteractOp::ContextClick => "contextClick",
            InteractOp::SelectByValue => "selectByValue",
            InteractOp::SelectByIndex => "selectByIndex",
            InteractOp::DragTo => "dragTo",
        }
    }

    /// Direct calls on an element (`el.click()`, `select.selectByValue(v)`)
    pub fn from_element_method(method: &str) -> Option<Self> {
        let op = match method {
            "clear" => InteractOp::Clear,
            "sendKeys" => InteractOp::SendKeys,
            "click" => InteractOp::Click,
            "submit" => InteractOp::Submit,
            "selectByVisibleText" => InteractOp::SelectByVisibleText,
            "selectByValue" => InteractOp::SelectByValue,
            "selectByIndex" => InteractOp::SelectByIndex,
            _ => return None,
        };
        Some(op)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Condition {
    VisibilityOf,
    PresenceOf,
    UrlContains,
    InvisibilityOf,
    ElementToBeClickable,
    ScriptReturns,
}

impl Condition {
    pub fn as_str(self) -> &'static str {
        match self {
            Condition::VisibilityOf => "visibilityOf",
            Condition::PresenceOf => "presenceOf",
            Condition::UrlContains => "urlContains",
            Condition::InvisibilityOf => "invisibilityOf",
            Condition::ElementToBeClickable => "elementToBeClickable",
            Condition::ScriptReturns => "scriptReturns",
        }
    }
}

/// What a wait observes
#[derive(Clone, Debug, PartialEq)]
pub enum WaitTarget {
    Element(ElementRef),
    /// URL fragment and similar plain values
    Value(Expr),
    /// Script polled until it returns `expected`
    Script { code: String, expected: Expr },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssertKind {
    Equals,
    True,
    Contains,
    False,
    NotEquals,
    Null,
    NotNull,
}

impl AssertKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AssertKind::Equals => "equals",
            AssertKind::True => "true",
            AssertKind::Contains => "contains",
            AssertKind::False => "false",
            AssertKind::NotEquals => "notEquals",
            AssertKind::Null => "null",
            AssertKind::NotNull => "notNull",
        }
    }

    /// Whether the assertion compares against an expected value
    pub fn takes_expected(self) -> bool {
        matches!(
            self,
            AssertKind::Equals | AssertKind::Contains | AssertKind::NotEquals
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HistoryOp {
    Back,
    Forward,
    Refresh,
}

impl HistoryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            HistoryOp::Back => "back",
            HistoryOp::Forward => "forward",
            HistoryOp::Refresh => "refresh",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleOp {
    OpenBrowser,
    ConfigureWait,
    Maximize,
    ImplicitWait,
    ClearCookies,
    CloseWindow,
    Quit,
}

impl LifecycleOp {
    pub fn as_str(self) -> &'static str {
        match self {
            LifecycleOp::OpenBrowser => "openBrowser",
            LifecycleOp::ConfigureWait => "configureWait",
            LifecycleOp::Maximize => "maximize",
            LifecycleOp::ImplicitWait => "implicitWait",
            LifecycleOp::ClearCookies => "clearCookies",
            LifecycleOp::CloseWindow => "closeWindow",
            LifecycleOp::Quit => "quit",
        }
    }
}

/// The receiver of a delegate call
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DelegateTarget {
    Field(SmolStr),
    Local(SmolStr),
    Param(SmolStr),
    /// `Type.method(...)`
    Static,
    /// Unqualified or `this.` call into the unit itself
    This,
}

/// A call into a page object, utility module or the unit itself
#[derive(Clone, Debug, PartialEq)]
pub struct DelegateCall {
    pub target: DelegateTarget,
    /// Declared type of the receiver, as written in the source
    pub type_name: SmolStr,
    pub method: SmolStr,
    pub args: Vec<Expr>,
    pub site: CallSiteId,
}

/// Where an `Instantiate` stores the new object
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Binding {
    Field(SmolStr),
    /// `declare` is set for `Type x = new Type(...)`
    Local { name: SmolStr, declare: bool },
}

impl Binding {
    pub fn name(&self) -> &SmolStr {
        match self {
            Binding::Field(name) | Binding::Local { name, .. } => name,
        }
    }
}

// ============================================================================
// ACTIONS
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct Action {
    pub kind: ActionKind,
    pub provenance: Provenance,
}

impl Action {
    pub fn new(kind: ActionKind, provenance: Provenance) -> Self {
        Self { kind, provenance }
    }

    fn walk<'a>(&'a self, out: &mut Vec<&'a Action>) {
        out.push(self);
        match &self.kind {
            ActionKind::LocateWithFallback { attempt, fallback } => {
                attempt.iter().chain(fallback).for_each(|a| a.walk(out));
            }
            ActionKind::Branch {
                then_actions,
                else_actions,
                ..
            } => {
                then_actions
                    .iter()
                    .chain(else_actions)
                    .for_each(|a| a.walk(out));
            }
            _ => {}
        }
    }

    /// Whether this action, or one nested in it, reads `element`
    pub fn references(&self, element: ElementRef) -> bool {
        let mut all = Vec::new();
        self.walk(&mut all);
        all.iter().any(|action| action.reads(element))
    }

    fn reads(&self, element: ElementRef) -> bool {
        let direct = match &self.kind {
            ActionKind::Locate { within, .. } => *within == Some(element),
            ActionKind::Nth { list, .. } => *list == element,
            ActionKind::Interact { element: target, .. } => *target == element,
            ActionKind::Wait {
                target: WaitTarget::Element(target),
                ..
            } => *target == element,
            _ => false,
        };
        direct
            || self.exprs().into_iter().any(|expr| {
                let mut found = false;
                expr.visit(&mut |e| {
                    found |= matches!(
                        e,
                        Expr::Element(r) | Expr::Count(r) | Expr::ElementQuery { element: r, .. }
                            if *r == element
                    );
                });
                found
            })
    }

    /// Expressions held directly by this action (nested actions excluded)
    pub fn exprs(&self) -> Vec<&Expr> {
        match &self.kind {
            ActionKind::Navigate { url } => vec![url],
            ActionKind::Locate { value, .. } => vec![value],
            ActionKind::Nth { index, .. } => vec![index],
            ActionKind::Interact { args, .. } => args.iter().collect(),
            ActionKind::Wait { target, .. } => match target {
                WaitTarget::Element(_) => vec![],
                WaitTarget::Value(value) => vec![value],
                WaitTarget::Script { expected, .. } => vec![expected],
            },
            ActionKind::Assert {
                actual,
                expected,
                message,
                ..
            } => std::iter::once(actual)
                .chain(expected.iter())
                .chain(message.iter())
                .collect(),
            ActionKind::ScriptExec { args, .. } => args.iter().collect(),
            ActionKind::Delegate(call) => call.args.iter().collect(),
            ActionKind::Bind { value, .. } => value.iter().collect(),
            ActionKind::Assign { target, value, .. } => vec![target, value],
            ActionKind::Evaluate(expr) => vec![expr],
            ActionKind::Return(value) => value.iter().collect(),
            ActionKind::Branch { condition, .. } => vec![condition],
            ActionKind::Instantiate { args, .. } => args.iter().collect(),
            ActionKind::Sleep { millis } => vec![millis],
            ActionKind::LocateWithFallback { .. }
            | ActionKind::History(_)
            | ActionKind::Lifecycle(_)
            | ActionKind::Opaque { .. } => vec![],
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ActionKind {
    Navigate {
        url: Expr,
    },
    Locate {
        element: ElementRef,
        strategy: Strategy,
        value: Expr,
        /// Scope element for `parent.findElement(...)`
        within: Option<ElementRef>,
        multiple: bool,
    },
    Nth {
        element: ElementRef,
        list: ElementRef,
        index: Expr,
    },
    Interact {
        element: ElementRef,
        op: InteractOp,
        args: Vec<Expr>,
    },
    Wait {
        condition: Condition,
        target: WaitTarget,
        /// `None` defers to the profile default
        timeout_ms: Option<u64>,
    },
    Assert {
        kind: AssertKind,
        actual: Expr,
        expected: Option<Expr>,
        message: Option<Expr>,
    },
    ScriptExec {
        code: String,
        args: Vec<Expr>,
    },
    Delegate(DelegateCall),
    /// Try `attempt`; on failure run `fallback`
    LocateWithFallback {
        attempt: Vec<Action>,
        fallback: Vec<Action>,
    },
    Bind {
        name: SmolStr,
        value: Option<Expr>,
        mutable: bool,
    },
    Assign {
        target: Expr,
        op: SmolStr,
        value: Expr,
    },
    Evaluate(Expr),
    Return(Option<Expr>),
    Branch {
        condition: Expr,
        then_actions: Vec<Action>,
        else_actions: Vec<Action>,
    },
    Instantiate {
        binding: Binding,
        type_name: SmolStr,
        args: Vec<Expr>,
        site: CallSiteId,
    },
    Sleep {
        millis: Expr,
    },
    History(HistoryOp),
    Lifecycle(LifecycleOp),
    Opaque {
        text: String,
    },
}

// ============================================================================
// EXPRESSIONS
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementQuery {
    Text,
    Visible,
    Enabled,
    Selected,
    Attribute,
    Value,
}

impl ElementQuery {
    pub fn as_str(self) -> &'static str {
        match self {
            ElementQuery::Text => "text",
            ElementQuery::Visible => "visible",
            ElementQuery::Enabled => "enabled",
            ElementQuery::Selected => "selected",
            ElementQuery::Attribute => "attribute",
            ElementQuery::Value => "value",
        }
    }

    pub fn from_element_method(method: &str) -> Option<Self> {
        let query = match method {
            "getText" => ElementQuery::Text,
            "isDisplayed" => ElementQuery::Visible,
            "isEnabled" => ElementQuery::Enabled,
            "isSelected" => ElementQuery::Selected,
            "getAttribute" => ElementQuery::Attribute,
            _ => return None,
        };
        Some(query)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PageQuery {
    Url,
    Title,
    Source,
}

impl PageQuery {
    pub fn as_str(self) -> &'static str {
        match self {
            PageQuery::Url => "url",
            PageQuery::Title => "title",
            PageQuery::Source => "source",
        }
    }

    pub fn from_driver_method(method: &str) -> Option<Self> {
        match method {
            "getCurrentUrl" => Some(PageQuery::Url),
            "getTitle" => Some(PageQuery::Title),
            "getPageSource" => Some(PageQuery::Source),
            _ => None,
        }
    }
}

/// Methods on plain values (strings, boxed numbers)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueMethod {
    Contains,
    Equals,
    EqualsIgnoreCase,
    StartsWith,
    EndsWith,
    Trim,
    Length,
    ToLowerCase,
    ToUpperCase,
    IsEmpty,
    IntValue,
    ToString,
}

impl ValueMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueMethod::Contains => "contains",
            ValueMethod::Equals => "equals",
            ValueMethod::EqualsIgnoreCase => "equalsIgnoreCase",
            ValueMethod::StartsWith => "startsWith",
            ValueMethod::EndsWith => "endsWith",
            ValueMethod::Trim => "trim",
            ValueMethod::Length => "length",
            ValueMethod::ToLowerCase => "toLowerCase",
            ValueMethod::ToUpperCase => "toUpperCase",
            ValueMethod::IsEmpty => "isEmpty",
            ValueMethod::IntValue => "intValue",
            ValueMethod::ToString => "toString",
        }
    }

    pub fn from_method(method: &str, arity: usize) -> Option<Self> {
        let found = match (method, arity) {
            ("contains", 1) => ValueMethod::Contains,
            ("equals", 1) => ValueMethod::Equals,
            ("equalsIgnoreCase", 1) => ValueMethod::EqualsIgnoreCase,
            ("startsWith", 1) => ValueMethod::StartsWith,
            ("endsWith", 1) => ValueMethod::EndsWith,
            ("trim", 0) => ValueMethod::Trim,
            ("length", 0) => ValueMethod::Length,
            ("toLowerCase", 0) => ValueMethod::ToLowerCase,
            ("toUpperCase", 0) => ValueMethod::ToUpperCase,
            ("isEmpty", 0) => ValueMethod::IsEmpty,
            ("intValue" | "longValue", 0) => ValueMethod::IntValue,
            ("toString", 0) => ValueMethod::ToString,
            _ => return None,
        };
        Some(found)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    And,
    Or,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Not,
    Neg,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
    Char(char),
    /// A local variable or parameter
    Var(SmolStr),
    /// A field of the declaring unit
    Field(SmolStr),
    /// The harness driver
    Driver,
    Element(ElementRef),
    ElementQuery {
        element: ElementRef,
        query: ElementQuery,
        /// Attribute name for `ElementQuery::Attribute`
        arg: Option<Box<Expr>>,
    },
    Count(ElementRef),
    PageQuery(PageQuery),
    Script {
        code: String,
        args: Vec<Expr>,
    },
    Call(DelegateCall),
    Method {
        receiver: Box<Expr>,
        method: ValueMethod,
        args: Vec<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Conditional {
        condition: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
    },
    Paren(Box<Expr>),
    /// `Keys.ENTER` and friends
    Key(SmolStr),
    Opaque(String),
}

impl Expr {
    /// Visit this expression and every sub-expression
    pub fn visit<'a>(&'a self, f: &mut impl FnMut(&'a Expr)) {
        f(self);
        match self {
            Expr::ElementQuery { arg: Some(arg), .. } => arg.visit(f),
            Expr::Script { args, .. } => args.iter().for_each(|a| a.visit(f)),
            Expr::Call(call) => call.args.iter().for_each(|a| a.visit(f)),
            Expr::Method { receiver, args, .. } => {
                receiver.visit(f);
                args.iter().for_each(|a| a.visit(f));
            }
            Expr::Binary { lhs, rhs, .. } => {
                lhs.visit(f);
                rhs.visit(f);
            }
            Expr::Unary { operand, .. } => operand.visit(f),
            Expr::Conditional {
                condition,
                then_expr,
                else_expr,
            } => {
                condition.visit(f);
                then_expr.visit(f);
                else_expr.visit(f);
            }
            Expr::Paren(inner) => inner.visit(f),
            _ => {}
        }
    }

    /// Whether evaluating the expression needs the browser
    pub fn is_async(&self) -> bool {
        let mut found = false;
        self.visit(&mut |e| {
            found |= matches!(
                e,
                Expr::ElementQuery { .. }
                    | Expr::Count(_)
                    | Expr::PageQuery(_)
                    | Expr::Script { .. }
                    | Expr::Call(_)
            );
        });
        found
    }
}
