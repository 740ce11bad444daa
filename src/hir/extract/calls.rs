//! Call patterns: driver commands, element interactions, waits, scripts,
//! assertions and delegate calls.

use smol_str::SmolStr;

use super::lower::{BodyLowering, Local, LocalVar, Resolved};
use super::{TypeClass, wait_timeout};
use crate::hir::action::{
    Action, ActionKind, AssertKind, Condition, DelegateCall, DelegateTarget, ElementOrigin,
    ElementQuery, ElementRef, Expr, HistoryOp, InteractOp, LifecycleOp, Strategy, ValueMethod,
    WaitTarget,
};
use crate::parser::ast::{self, CallExpr};

const ASSERT_RECEIVERS: &[&str] = &["Assert", "Assertions", "AssertJUnit"];
const CONDITION_RECEIVERS: &[&str] = &["ExpectedConditions"];

/// `driver.manage().window()` as its root and the calls after it, in order
fn call_chain(call: &CallExpr) -> (Option<ast::Expr>, Vec<CallExpr>) {
    let mut calls = vec![call.clone()];
    let mut root = None;
    let mut receiver = call.receiver();
    while let Some(expr) = receiver {
        match expr.unwrap_parens() {
            ast::Expr::Call(inner) => {
                receiver = inner.receiver();
                calls.push(inner);
            }
            other => {
                root = Some(other);
                receiver = None;
            }
        }
    }
    calls.reverse();
    (root, calls)
}

fn is_name(expr: Option<&ast::Expr>, names: &[&str]) -> bool {
    matches!(expr, Some(ast::Expr::Name(n)) if names.contains(&n.name().as_str()))
}

fn string_arg(args: &[ast::Expr], index: usize) -> Option<String> {
    match args.get(index)?.clone().unwrap_parens() {
        ast::Expr::Literal(lit) => lit.as_string(),
        _ => None,
    }
}

impl BodyLowering<'_, '_> {
    // ========================================================================
    // Receivers
    // ========================================================================

    /// What `expr` refers to when it is a bare name or `this.name`
    fn resolve_receiver(&self, expr: &ast::Expr) -> Option<(SmolStr, Resolved)> {
        match expr.clone().unwrap_parens() {
            ast::Expr::Name(n) => {
                let name = n.name();
                let resolved = self.lookup(&name);
                Some((name, resolved))
            }
            ast::Expr::Field(f) if matches!(f.receiver(), Some(ast::Expr::This(_))) => {
                let name = f.name()?;
                let field = self.cx.field(&name)?.clone();
                Some((name, Resolved::Field(field)))
            }
            _ => None,
        }
    }

    pub(super) fn is_driver(&self, expr: &ast::Expr) -> bool {
        matches!(
            self.resolve_receiver(expr),
            Some((_, Resolved::Local(local))) if matches!(local.kind, Local::Driver)
        ) || matches!(
            self.resolve_receiver(expr),
            Some((_, Resolved::Field(field))) if field.class == TypeClass::Driver
        )
    }

    fn is_script_executor(&self, expr: &ast::Expr) -> bool {
        if self.is_driver(expr) {
            return true;
        }
        match self.resolve_receiver(expr) {
            Some((_, Resolved::Local(local))) => matches!(local.kind, Local::ScriptExecutor),
            Some((_, Resolved::Field(field))) => field.class == TypeClass::ScriptExecutor,
            _ => false,
        }
    }

    fn is_actions(&self, expr: &ast::Expr) -> bool {
        if let ast::Expr::New(new) = expr.clone().unwrap_parens() {
            return new.ty().is_some_and(|t| t.simple_name() == "Actions");
        }
        match self.resolve_receiver(expr) {
            Some((_, Resolved::Local(local))) => matches!(local.kind, Local::Actions),
            Some((_, Resolved::Field(field))) => field.class == TypeClass::Actions,
            _ => false,
        }
    }

    /// Timeout of a wait receiver; `None` when `expr` is not a wait
    fn wait_receiver(&self, expr: &ast::Expr) -> Option<Option<u64>> {
        if let ast::Expr::New(new) = expr.clone().unwrap_parens() {
            let ty = new.ty()?.simple_name();
            return matches!(ty.as_str(), "WebDriverWait" | "FluentWait")
                .then(|| wait_timeout(&new.args()));
        }
        match self.resolve_receiver(expr)? {
            (
                _,
                Resolved::Local(LocalVar {
                    kind: Local::Wait { timeout_ms },
                    ..
                }),
            ) => Some(timeout_ms),
            (name, Resolved::Field(field)) if field.class == TypeClass::Wait => {
                Some(self.cx.context.wait_timeout(&name))
            }
            _ => None,
        }
    }

    // ========================================================================
    // Locators and elements
    // ========================================================================

    /// `By.id("x")`, a `By` local, or a `By` field
    pub(super) fn lower_by(&mut self, expr: &ast::Expr, out: &mut Vec<Action>) -> Option<(Strategy, Expr)> {
        match expr.clone().unwrap_parens() {
            ast::Expr::Call(call) if is_name(call.receiver().as_ref(), &["By"]) => {
                let strategy = Strategy::from_by_method(&call.name()?)?;
                let args = call.args();
                if args.len() != 1 {
                    return None;
                }
                let value = self.lower_expr(&args[0], out);
                Some((strategy, value))
            }
            other => match self.resolve_receiver(&other)? {
                (_, Resolved::Local(local)) => match local.kind {
                    Local::By { strategy, value } => Some((strategy, value)),
                    _ => None,
                },
                (name, Resolved::Field(field)) if field.class == TypeClass::By => {
                    let locator = self.cx.locators.get(&name)?;
                    Some((locator.strategy, Expr::Str(locator.value.clone())))
                }
                _ => None,
            },
        }
    }

    fn locate(
        &mut self,
        by: &ast::Expr,
        within: Option<ElementRef>,
        multiple: bool,
        out: &mut Vec<Action>,
    ) -> Option<ElementRef> {
        let (strategy, value) = self.lower_by(by, out)?;
        let element = self.new_element(ElementOrigin::Located, None);
        if multiple {
            self.lists.insert(element);
        }
        self.push(
            out,
            ActionKind::Locate {
                element,
                strategy,
                value,
                within,
                multiple,
            },
        );
        Some(element)
    }

    /// The element handle `expr` evaluates to, locating it when needed
    pub(super) fn lower_element(&mut self, expr: &ast::Expr, out: &mut Vec<Action>) -> Option<ElementRef> {
        match expr.clone().unwrap_parens() {
            ast::Expr::Call(call) => {
                let name = call.name()?;
                let args = call.args();
                match (name.as_str(), args.len()) {
                    ("findElement" | "findElements", 1) => {
                        let within = match call.receiver() {
                            Some(receiver) if !self.is_driver(&receiver) => {
                                Some(self.lower_element(&receiver, out)?)
                            }
                            _ => None,
                        };
                        self.locate(&args[0], within, name == "findElements", out)
                    }
                    ("get", 1) => {
                        let list = self.lower_element(&call.receiver()?, out)?;
                        if !self.lists.contains(&list) {
                            return None;
                        }
                        let index = self.lower_expr(&args[0], out);
                        let element = self.new_element(ElementOrigin::Nth, None);
                        self.push(out, ActionKind::Nth { element, list, index });
                        Some(element)
                    }
                    ("until", 1) => {
                        let (kind, element) = self.lower_wait(&call, out)?;
                        let element = element?;
                        self.push(out, kind);
                        Some(element)
                    }
                    _ => None,
                }
            }
            ast::Expr::New(new) => {
                let args = new.args();
                if new.ty()?.simple_name() != "Select" || args.len() != 1 {
                    return None;
                }
                self.lower_element(&args[0], out)
            }
            other => match self.resolve_receiver(&other)? {
                (_, Resolved::Local(local)) => match local.kind {
                    Local::Element(element) | Local::ElementList(element) => Some(element),
                    _ => None,
                },
                (name, Resolved::Field(_)) => self.field_element(&name),
                (_, Resolved::Unknown) => None,
            },
        }
    }

    /// Whether `expr` can be an element without locating anything
    fn looks_like_element(&self, expr: &ast::Expr) -> bool {
        match expr.clone().unwrap_parens() {
            ast::Expr::Call(call) => matches!(
                call.name().as_deref(),
                Some("findElement" | "findElements" | "get" | "until")
            ),
            ast::Expr::New(new) => new.ty().is_some_and(|t| t.simple_name() == "Select"),
            other => match self.resolve_receiver(&other) {
                Some((_, Resolved::Local(local))) => {
                    matches!(local.kind, Local::Element(_) | Local::ElementList(_))
                }
                Some((_, Resolved::Field(field))) => matches!(
                    field.class,
                    TypeClass::Element | TypeClass::ElementList | TypeClass::Select
                ),
                _ => false,
            },
        }
    }

    // ========================================================================
    // Statements made of a call
    // ========================================================================

    pub(super) fn lower_call_stmt(&mut self, call: &CallExpr, out: &mut Vec<Action>) -> Option<()> {
        let name = call.name()?;
        let receiver = call.receiver().map(ast::Expr::unwrap_parens);
        let args = call.args();

        if is_assertion(&name, receiver.as_ref()) {
            let kind = self.lower_assert(&name, &args, out)?;
            self.push(out, kind);
            return Some(());
        }
        if is_name(receiver.as_ref(), &["Thread"]) && name == "sleep" && args.len() == 1 {
            let millis = self.lower_expr(&args[0], out);
            self.push(out, ActionKind::Sleep { millis });
            return Some(());
        }
        if is_name(receiver.as_ref(), &["PageFactory"]) {
            return Some(());
        }
        if name == "perform" {
            return self.lower_actions_chain(call, out);
        }
        if name == "until" {
            let (kind, _) = self.lower_wait(call, out)?;
            self.push(out, kind);
            return Some(());
        }
        if matches!(name.as_str(), "executeScript" | "executeAsyncScript") {
            let (code, args) = self.lower_script(call, out)?;
            self.push(out, ActionKind::ScriptExec { code, args });
            return Some(());
        }
        // A bare lookup asserts presence
        if name == "findElement" {
            let element = self.lower_element(&ast::Expr::Call(call.clone()), out)?;
            self.push(out, ActionKind::Evaluate(Expr::Element(element)));
            return Some(());
        }

        if let Some(receiver) = &receiver {
            if self.looks_like_element(receiver) {
                return self.lower_interaction(&name, receiver, &args, out);
            }
            let (root, chain) = call_chain(call);
            if root.as_ref().is_some_and(|r| self.is_driver(r)) {
                let kind = self.lower_driver_command(&chain, out)?;
                self.push(out, kind);
                return Some(());
            }
        }

        let call = self.delegate_call(call, out)?;
        self.push(out, ActionKind::Delegate(call));
        Some(())
    }

    fn lower_interaction(
        &mut self,
        name: &str,
        receiver: &ast::Expr,
        args: &[ast::Expr],
        out: &mut Vec<Action>,
    ) -> Option<()> {
        let element = self.lower_element(receiver, out)?;
        if let Some(query) = ElementQuery::from_element_method(name) {
            let arg = match args.first() {
                Some(arg) => Some(Box::new(self.lower_expr(arg, out))),
                None => None,
            };
            self.push(
                out,
                ActionKind::Evaluate(Expr::ElementQuery {
                    element,
                    query,
                    arg,
                }),
            );
            return Some(());
        }

        let op = InteractOp::from_element_method(name)?;
        let args = self.lower_args(args, out);
        if op != InteractOp::SendKeys {
            self.push(out, ActionKind::Interact { element, op, args });
            return Some(());
        }
        // typed text and key presses in one call become separate steps
        for arg in args {
            let op = match arg {
                Expr::Key(_) => InteractOp::PressKey,
                _ => InteractOp::SendKeys,
            };
            self.push(
                out,
                ActionKind::Interact {
                    element,
                    op,
                    args: vec![arg],
                },
            );
        }
        Some(())
    }

    /// `driver.get(url)`, `driver.navigate().back()`, `driver.manage()...`
    fn lower_driver_command(&mut self, chain: &[CallExpr], out: &mut Vec<Action>) -> Option<ActionKind> {
        let names: Vec<SmolStr> = chain.iter().filter_map(|c| c.name()).collect();
        if names.len() != chain.len() {
            return None;
        }
        let names: Vec<&str> = names.iter().map(SmolStr::as_str).collect();
        let last_args = chain.last()?.args();

        let kind = match names.as_slice() {
            ["get"] | ["navigate", "to"] if last_args.len() == 1 => ActionKind::Navigate {
                url: self.lower_expr(&last_args[0], out),
            },
            ["navigate", "back"] => ActionKind::History(HistoryOp::Back),
            ["navigate", "forward"] => ActionKind::History(HistoryOp::Forward),
            ["navigate", "refresh"] => ActionKind::History(HistoryOp::Refresh),
            ["manage", "window", "maximize" | "fullscreen"] => {
                ActionKind::Lifecycle(LifecycleOp::Maximize)
            }
            ["manage", "timeouts", "implicitlyWait"] => {
                ActionKind::Lifecycle(LifecycleOp::ImplicitWait)
            }
            ["manage", "deleteAllCookies"] => ActionKind::Lifecycle(LifecycleOp::ClearCookies),
            ["quit"] => ActionKind::Lifecycle(LifecycleOp::Quit),
            ["close"] => ActionKind::Lifecycle(LifecycleOp::CloseWindow),
            _ => return None,
        };
        Some(kind)
    }

    /// `new Actions(driver).moveToElement(menu).click().perform()`
    fn lower_actions_chain(&mut self, call: &CallExpr, out: &mut Vec<Action>) -> Option<()> {
        let (root, chain) = call_chain(call);
        if !root.as_ref().is_some_and(|r| self.is_actions(r)) {
            return None;
        }
        let mut current: Option<ElementRef> = None;
        let mut steps = Vec::new();
        for step in &chain {
            let name = step.name()?;
            let args = step.args();
            let (element, op, rest) = match (name.as_str(), args.len()) {
                ("perform" | "build", 0) => continue,
                ("moveToElement", 1) => (self.lower_element(&args[0], out)?, InteractOp::Hover, vec![]),
                ("click", 0) => (current?, InteractOp::Click, vec![]),
                ("click", 1) => (self.lower_element(&args[0], out)?, InteractOp::Click, vec![]),
                ("doubleClick", 0) => (current?, InteractOp::DoubleClick, vec![]),
                ("doubleClick", 1) => (self.lower_element(&args[0], out)?, InteractOp::DoubleClick, vec![]),
                ("contextClick", 0) => (current?, InteractOp::ContextClick, vec![]),
                ("contextClick", 1) => (self.lower_element(&args[0], out)?, InteractOp::ContextClick, vec![]),
                ("dragAndDrop", 2) => {
                    let source = self.lower_element(&args[0], out)?;
                    let target = self.lower_element(&args[1], out)?;
                    (source, InteractOp::DragTo, vec![Expr::Element(target)])
                }
                ("sendKeys", 1) => (current?, InteractOp::SendKeys, vec![self.lower_expr(&args[0], out)]),
                ("sendKeys", 2) => {
                    let element = self.lower_element(&args[0], out)?;
                    (element, InteractOp::SendKeys, vec![self.lower_expr(&args[1], out)])
                }
                _ => return None,
            };
            current = Some(element);
            steps.push(ActionKind::Interact {
                element,
                op,
                args: rest,
            });
        }
        if steps.is_empty() {
            return None;
        }
        for step in steps {
            self.push(out, step);
        }
        Some(())
    }

    // ========================================================================
    // Waits and scripts
    // ========================================================================

    /// `wait.until(condition)`; also yields the awaited element, if any
    pub(super) fn lower_wait(
        &mut self,
        call: &CallExpr,
        out: &mut Vec<Action>,
    ) -> Option<(ActionKind, Option<ElementRef>)> {
        let timeout_ms = self.wait_receiver(&call.receiver()?)?;
        let args = call.args();
        let [condition] = args.as_slice() else {
            return None;
        };
        let (condition, target) = self.lower_condition(condition, out)?;
        let element = match target {
            WaitTarget::Element(element) => Some(element),
            _ => None,
        };
        Some((
            ActionKind::Wait {
                condition,
                target,
                timeout_ms,
            },
            element,
        ))
    }

    fn lower_condition(
        &mut self,
        condition: &ast::Expr,
        out: &mut Vec<Action>,
    ) -> Option<(Condition, WaitTarget)> {
        match condition.clone().unwrap_parens() {
            ast::Expr::Call(call) => {
                let receiver = call.receiver();
                if receiver.is_some() && !is_name(receiver.as_ref(), CONDITION_RECEIVERS) {
                    return None;
                }
                let args = call.args();
                let [arg] = args.as_slice() else {
                    return None;
                };
                let name = call.name()?;
                let (condition, by_locator) = match name.as_str() {
                    "visibilityOfElementLocated" => (Condition::VisibilityOf, true),
                    "visibilityOf" => (Condition::VisibilityOf, false),
                    "presenceOfElementLocated" => (Condition::PresenceOf, true),
                    "invisibilityOfElementLocated" => (Condition::InvisibilityOf, true),
                    "invisibilityOf" => (Condition::InvisibilityOf, false),
                    "elementToBeClickable" => (Condition::ElementToBeClickable, !self.looks_like_element(arg)),
                    "urlContains" => {
                        let fragment = self.lower_expr(arg, out);
                        return Some((Condition::UrlContains, WaitTarget::Value(fragment)));
                    }
                    _ => return None,
                };
                let element = if by_locator {
                    self.locate(arg, None, false, out)?
                } else {
                    self.lower_element(arg, out)?
                };
                Some((condition, WaitTarget::Element(element)))
            }
            ast::Expr::Lambda(lambda) => self.lower_script_condition(&lambda, out),
            _ => None,
        }
    }

    /// `d -> ((JavascriptExecutor) d).executeScript("...").equals(expected)`
    fn lower_script_condition(
        &mut self,
        lambda: &ast::LambdaExpr,
        out: &mut Vec<Action>,
    ) -> Option<(Condition, WaitTarget)> {
        let params = lambda.params();
        let [param] = params.as_slice() else {
            return None;
        };
        let body = match lambda.body_expr() {
            Some(expr) => expr,
            None => {
                let block = lambda.body_block()?;
                let stmts: Vec<_> = block.statements().collect();
                match stmts.as_slice() {
                    [ast::Stmt::Return(ret)] => ret.expr()?,
                    _ => return None,
                }
            }
        };
        let ast::Expr::Call(equals) = body.unwrap_parens() else {
            return None;
        };
        let expected_args = equals.args();
        if equals.name().as_deref() != Some("equals") || expected_args.len() != 1 {
            return None;
        }
        let ast::Expr::Call(script) = equals.receiver()?.unwrap_parens() else {
            return None;
        };
        if script.name().as_deref() != Some("executeScript") {
            return None;
        }
        let on_param = matches!(
            script.receiver().map(ast::Expr::unwrap_parens),
            Some(ast::Expr::Name(n)) if n.name() == *param
        );
        let script_args = script.args();
        if !on_param || script_args.len() != 1 {
            return None;
        }
        let code = string_arg(&script_args, 0)?;
        let expected = self.lower_expr(&expected_args[0], out);
        Some((Condition::ScriptReturns, WaitTarget::Script { code, expected }))
    }

    /// `js.executeScript("code", args...)` with literal code
    pub(super) fn lower_script(&mut self, call: &CallExpr, out: &mut Vec<Action>) -> Option<(String, Vec<Expr>)> {
        let receiver = call.receiver()?;
        if !self.is_script_executor(&receiver) {
            return None;
        }
        let args = call.args();
        let code = string_arg(&args, 0)?;
        let args = self.lower_args(&args[1..], out);
        Some((code, args))
    }

    // ========================================================================
    // Assertions
    // ========================================================================

    fn lower_assert(&mut self, name: &str, args: &[ast::Expr], out: &mut Vec<Action>) -> Option<ActionKind> {
        let (kind, arity) = match name {
            "assertEquals" => (AssertKind::Equals, 2),
            "assertNotEquals" => (AssertKind::NotEquals, 2),
            "assertTrue" => (AssertKind::True, 1),
            "assertFalse" => (AssertKind::False, 1),
            "assertNull" => (AssertKind::Null, 1),
            "assertNotNull" => (AssertKind::NotNull, 1),
            _ => return None,
        };
        let framework = self.cx.framework;
        let (message, operands) = if args.len() == arity {
            (None, args)
        } else if args.len() == arity + 1 {
            if framework.message_first() {
                (Some(&args[0]), &args[1..])
            } else {
                (Some(&args[arity]), &args[..arity])
            }
        } else {
            return None;
        };

        let mut operands: Vec<Expr> = self.lower_args(operands, out);
        let message = message.map(|m| self.lower_expr(m, out));

        if arity == 2 {
            let (actual, expected) = if framework.actual_first() {
                (operands.remove(0), operands.remove(0))
            } else {
                let expected = operands.remove(0);
                (operands.remove(0), expected)
            };
            return Some(ActionKind::Assert {
                kind,
                actual,
                expected: Some(expected),
                message,
            });
        }

        let operand = operands.remove(0);
        if kind == AssertKind::True {
            if let Expr::Method {
                receiver,
                method: ValueMethod::Contains,
                args,
            } = &operand
            {
                if let [needle] = args.as_slice() {
                    return Some(ActionKind::Assert {
                        kind: AssertKind::Contains,
                        actual: (**receiver).clone(),
                        expected: Some(needle.clone()),
                        message,
                    });
                }
            }
        }
        Some(ActionKind::Assert {
            kind,
            actual: operand,
            expected: None,
            message,
        })
    }

    // ========================================================================
    // Delegates
    // ========================================================================

    /// A call into a project unit or the unit itself
    pub(super) fn delegate_call(&mut self, call: &CallExpr, out: &mut Vec<Action>) -> Option<DelegateCall> {
        let method = call.name()?;
        if matches!(method.as_str(), "this" | "super") {
            return None;
        }
        let (target, type_name) = match call.receiver().map(ast::Expr::unwrap_parens) {
            None => self.unqualified_target(&method)?,
            Some(ast::Expr::This(_)) => (DelegateTarget::This, self.cx.simple_name.clone()),
            Some(receiver) => {
                let (name, resolved) = self.resolve_receiver(&receiver)?;
                match resolved {
                    Resolved::Local(LocalVar {
                        kind: Local::Project(type_name),
                        is_param,
                    }) => {
                        let target = if is_param {
                            DelegateTarget::Param(name)
                        } else {
                            DelegateTarget::Local(name)
                        };
                        (target, type_name)
                    }
                    Resolved::Field(field) => match field.class {
                        TypeClass::Project(type_name) => (DelegateTarget::Field(name), type_name),
                        _ => return None,
                    },
                    Resolved::Unknown if matches!(receiver, ast::Expr::Name(_)) && self.cx.types.is_project(&name) => {
                        (DelegateTarget::Static, name)
                    }
                    _ => return None,
                }
            }
        };
        let args = self.lower_args(&call.args(), out);
        let site = self.cx.next_site();
        Some(DelegateCall {
            target,
            type_name,
            method,
            args,
            site,
        })
    }

    /// Target of `helper()`: the unit itself, its superclass chain, or a
    /// statically imported project class. Library imports are not delegates.
    fn unqualified_target(&self, method: &str) -> Option<(DelegateTarget, SmolStr)> {
        let this = (DelegateTarget::This, self.cx.simple_name.clone());
        if self.cx.own_methods.contains(method) {
            return Some(this);
        }
        let statics = || self.cx.imports.iter().filter(|i| i.is_static);
        if let Some(import) = statics().find(|i| !i.wildcard && i.simple_name() == method) {
            let class = import.path.rsplit('.').nth(1)?;
            return self
                .cx
                .types
                .is_project(class)
                .then(|| (DelegateTarget::Static, SmolStr::new(class)));
        }
        if self.cx.superclass.is_some() {
            return Some(this);
        }
        let wildcard = statics().find(|i| i.wildcard);
        match wildcard {
            Some(import) if self.cx.types.is_project(import.simple_name()) => {
                Some((DelegateTarget::Static, SmolStr::new(import.simple_name())))
            }
            Some(_) => None,
            None => Some(this),
        }
    }
}

fn is_assertion(name: &str, receiver: Option<&ast::Expr>) -> bool {
    let assert_like = name.starts_with("assert");
    match receiver {
        None => assert_like,
        Some(receiver) => assert_like && is_name(Some(receiver), ASSERT_RECEIVERS),
    }
}
