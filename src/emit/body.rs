//! Action rendering: one action becomes zero or more target statements.

use smol_str::SmolStr;

use super::emitter::{Convention, Result, Scope, SelfRef, UnitEmitter};
use super::profile::{DelegateStrategy, PresenceStyle, Synchronicity};
use super::template::{Vars, render};
use crate::hir::{
    Action, ActionKind, AssertKind, Binding, DelegateCall, DelegateTarget, ElementQuery, ElementRef,
    Expr, Provenance, ResolvedTarget, UnitKind, WaitTarget, codes, is_driver_type,
};

impl UnitEmitter<'_> {
    pub(super) fn actions(&mut self, scope: &mut Scope<'_>, actions: &[Action]) -> Result<Vec<String>> {
        let mut lines = Vec::new();
        for action in actions {
            self.action(scope, action, &mut lines)?;
        }
        Ok(lines)
    }

    fn action(&mut self, scope: &mut Scope<'_>, action: &Action, lines: &mut Vec<String>) -> Result<()> {
        self.at(&action.provenance);
        let profile = self.profile;
        match &action.kind {
            ActionKind::Navigate { url } => {
                let template = self.lookup("statements", &profile.statements, "navigate")?;
                let url = self.expr(scope, url)?;
                lines.push(render(
                    template,
                    &Vars::new().with("harness", scope.harness.as_str()).with("url", url),
                ));
            }
            ActionKind::Locate {
                element,
                strategy,
                value,
                within,
                multiple,
            } => {
                let parent = match within {
                    Some(parent) => self.element(scope, *parent)?,
                    None => scope.harness.clone(),
                };
                let locator = self.locator(scope, &parent, *strategy, value, *multiple)?;
                self.bind_element(scope, *element, locator, lines);
            }
            ActionKind::Nth { element, list, index } => {
                let template = self.lookup("statements", &profile.statements, "nth")?;
                let list = self.element(scope, *list)?;
                let index = self.expr(scope, index)?;
                let nth = render(template, &Vars::new().with("list", list).with("index", index));
                self.bind_element(scope, *element, nth, lines);
            }
            ActionKind::Interact { element, op, args } => {
                let template = self.lookup("interactions", &profile.interactions, op.as_str())?;
                let element = self.element(scope, *element)?;
                let mut rendered = Vec::with_capacity(args.len());
                for arg in args {
                    rendered.push(self.expr(scope, arg)?);
                }
                let vars = Vars::new()
                    .with("harness", scope.harness.as_str())
                    .with("element", element)
                    .with("arg0", rendered.first().cloned().unwrap_or_default())
                    .with("text", rendered.join(" + "))
                    .with("args", rendered.join(", "));
                lines.push(render(template, &vars));
            }
            ActionKind::Wait {
                condition,
                target,
                timeout_ms,
            } => {
                let Some(template) = profile.waits.get(condition.as_str()) else {
                    return Err(self.unsupported_condition(*condition));
                };
                let mut vars = Vars::new()
                    .with("harness", scope.harness.as_str())
                    .with("timeout", self.timeout(scope, *timeout_ms).to_string());
                match target {
                    WaitTarget::Element(element) => vars.set("element", self.element(scope, *element)?),
                    WaitTarget::Value(value) => vars.set("value", self.expr(scope, value)?),
                    WaitTarget::Script { code, expected } => {
                        vars.set("code", code.trim().to_string());
                        vars.set("expected", self.expr(scope, expected)?);
                    }
                }
                lines.push(render(template, &vars));
            }
            ActionKind::Assert {
                kind,
                actual,
                expected,
                message,
            } => lines.push(self.assertion(scope, *kind, actual, expected.as_ref(), message.as_ref())?),
            ActionKind::ScriptExec { code, args } => {
                if profile.script.synchronicity == Synchronicity::Awaited {
                    self.note(
                        &action.provenance,
                        codes::AWAITED_SCRIPT,
                        "script executed through the page is awaited before the next step".to_string(),
                    );
                }
                lines.push(self.script(scope, &profile.script.statement, code, args)?);
            }
            ActionKind::Delegate(call) => match self.inline_call(scope, call, &action.provenance)? {
                Some(mut inlined) => lines.append(&mut inlined),
                None => lines.push(format!("await {};", self.call(scope, call)?)),
            },
            ActionKind::LocateWithFallback { attempt, fallback } => {
                self.fallback(scope, attempt, fallback, lines)?;
            }
            ActionKind::Bind { name, value, mutable } => {
                let value = match value {
                    Some(value) => Some(self.expr(scope, value)?),
                    None => None,
                };
                let local = self.var_name(scope, name);
                let line = match (scope.declare(name, *mutable), value) {
                    (Some(_), None) => format!("let {local};"),
                    (Some(keyword), Some(value)) => format!("{keyword} {local} = {value};"),
                    (None, Some(value)) => format!("{local} = {value};"),
                    (None, None) => return Ok(()),
                };
                lines.push(line);
            }
            ActionKind::Assign { target, op, value } => {
                let target = self.expr(scope, target)?;
                let value = self.expr(scope, value)?;
                lines.push(format!("{target} {op} {value};"));
            }
            ActionKind::Evaluate(Expr::Element(element)) => {
                let template = self.lookup("statements", &profile.statements, "require")?;
                let element = self.element(scope, *element)?;
                lines.push(render(template, &Vars::new().with("element", element)));
            }
            ActionKind::Evaluate(expr) => lines.push(format!("{};", self.expr(scope, expr)?)),
            ActionKind::Return(value) => match value {
                Some(value) => lines.push(format!("return {};", self.expr(scope, value)?)),
                None => lines.push("return;".to_string()),
            },
            ActionKind::Branch {
                condition,
                then_actions,
                else_actions,
            } => lines.push(self.branch(scope, condition, then_actions, else_actions)?),
            ActionKind::Instantiate {
                binding,
                type_name,
                args,
                site,
            } => {
                let value = self.instantiation(scope, type_name, args, *site)?;
                let line = match binding {
                    Binding::Field(name) => format!("{} = {value};", self.field_ref(scope, name)),
                    Binding::Local { name, declare } => {
                        let local = self.var_name(scope, name);
                        match declare.then(|| scope.declare(name, false)).flatten() {
                            Some(keyword) => format!("{keyword} {local} = {value};"),
                            None => format!("{local} = {value};"),
                        }
                    }
                };
                lines.push(line);
            }
            ActionKind::Sleep { millis } => {
                let template = self.lookup("statements", &profile.statements, "sleep")?;
                let millis = self.expr(scope, millis)?;
                lines.push(render(
                    template,
                    &Vars::new().with("harness", scope.harness.as_str()).with("millis", millis),
                ));
            }
            ActionKind::History(op) => {
                let template = self.lookup("history", &profile.history, op.as_str())?;
                lines.push(render(template, &Vars::new().with("harness", scope.harness.as_str())));
            }
            ActionKind::Lifecycle(op) => {
                let template = self.lookup("lifecycle", &profile.lifecycle, op.as_str())?;
                if !template.is_empty() {
                    let vars = Vars::new()
                        .with("harness", scope.harness.as_str())
                        .with("timeout", self.timeout(scope, None).to_string());
                    lines.push(render(template, &vars));
                }
            }
            ActionKind::Opaque { text } => {
                lines.extend(text.lines().map(|line| format!("// unconverted: {}", line.trim())));
            }
        }
        Ok(())
    }

    /// Anonymous handles stay inline; named ones become locals
    fn bind_element(&mut self, scope: &mut Scope<'_>, element: ElementRef, value: String, lines: &mut Vec<String>) {
        let name = scope.body.element(element).and_then(|b| b.name.clone());
        let Some(name) = name else {
            scope.elements.insert(element, value);
            return;
        };
        let local = self.var_name(scope, &name);
        match scope.declare(&name, false) {
            Some(keyword) => lines.push(format!("{keyword} {local} = {value};")),
            None => lines.push(format!("{local} = {value};")),
        }
    }

    /// Explicit timeout, then the unit's configured wait, then the profile default
    fn timeout(&self, scope: &Scope<'_>, explicit: Option<u64>) -> u64 {
        let model = self.model;
        explicit
            .or_else(|| model.unit(scope.owner).and_then(|u| u.context.default_wait_timeout()))
            .unwrap_or(self.profile.default_wait_ms)
    }

    fn assertion(
        &mut self,
        scope: &Scope<'_>,
        kind: AssertKind,
        actual: &Expr,
        expected: Option<&Expr>,
        message: Option<&Expr>,
    ) -> Result<String> {
        let profile = self.profile;
        // a located element is never null; the check is whether it exists
        let (kind, actual) = match (kind, actual) {
            (AssertKind::Null | AssertKind::NotNull, Expr::Element(element)) => {
                let template = self.lookup("statements", &profile.statements, "presence")?;
                let element = self.element(scope, *element)?;
                let exists = render(template, &Vars::new().with("element", element));
                match kind {
                    AssertKind::NotNull => (AssertKind::True, exists),
                    _ => (AssertKind::False, exists),
                }
            }
            _ => (kind, self.expr(scope, actual)?),
        };
        let template = self.lookup("asserts", &profile.asserts, kind.as_str())?;
        let mut vars = Vars::new().with("actual", actual);
        if let Some(expected) = expected {
            vars.set("expected", self.expr(scope, expected)?);
        }
        let (message, comment) = match message {
            Some(message) => {
                let text = self.expr(scope, message)?;
                (format!(", {text}"), format!(" // {text}"))
            }
            None => (String::new(), String::new()),
        };
        vars.set("message", message);
        vars.set("comment", comment);
        Ok(render(template, &vars))
    }

    fn branch(
        &mut self,
        scope: &mut Scope<'_>,
        condition: &Expr,
        then_actions: &[Action],
        else_actions: &[Action],
    ) -> Result<String> {
        let condition = self.expr(scope, condition)?;
        let then_text = self.block(scope, then_actions)?;
        let mut text = format!("if ({condition}) {{\n{then_text}\n}}");
        match else_actions {
            [] => {}
            [
                Action {
                    kind:
                        ActionKind::Branch {
                            condition,
                            then_actions,
                            else_actions,
                        },
                    provenance,
                },
            ] => {
                self.at(provenance);
                let nested = self.branch(scope, condition, then_actions, else_actions)?;
                text.push_str(" else ");
                text.push_str(&nested);
            }
            _ => {
                let else_text = self.block(scope, else_actions)?;
                text.push_str(&format!(" else {{\n{else_text}\n}}"));
            }
        }
        Ok(text)
    }

    /// Nested actions in their own block scope
    fn block(&mut self, scope: &mut Scope<'_>, actions: &[Action]) -> Result<String> {
        let declared = scope.declared.clone();
        let lines = self.actions(scope, actions);
        scope.declared = declared;
        Ok(self.indented(&lines?.join("\n")))
    }

    // ------------------------------------------------------------------------
    // Presence checks
    // ------------------------------------------------------------------------

    fn fallback(
        &mut self,
        scope: &mut Scope<'_>,
        attempt: &[Action],
        fallback: &[Action],
        lines: &mut Vec<String>,
    ) -> Result<()> {
        let attempt = &required_lookups(attempt);
        if self.profile.presence_style == PresenceStyle::BooleanCheck {
            if let Some((prelude, check)) = presence_check(attempt, fallback) {
                for action in prelude {
                    self.action(scope, action, lines)?;
                }
                let value = match check {
                    Presence::Exists(element) => {
                        let profile = self.profile;
                        let template = self.lookup("statements", &profile.statements, "presence")?;
                        let element = self.element(scope, element)?;
                        render(template, &Vars::new().with("element", element))
                    }
                    Presence::Visible(element) => self.expr(
                        scope,
                        &Expr::ElementQuery {
                            element,
                            query: ElementQuery::Visible,
                            arg: None,
                        },
                    )?,
                };
                lines.push(format!("return {value};"));
                return Ok(());
            }
        }
        let attempt = self.block(scope, attempt)?;
        let fallback = self.block(scope, fallback)?;
        lines.push(format!("try {{\n{attempt}\n}} catch {{\n{fallback}\n}}"));
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Delegation
    // ------------------------------------------------------------------------

    /// Copy the callee's body to the call site when the profile asks for it.
    ///
    /// Only statement-level calls from tests (or from bodies already inlined)
    /// into page objects and utilities qualify, and only when the callee
    /// returns nothing.
    fn inline_call(
        &mut self,
        scope: &Scope<'_>,
        call: &DelegateCall,
        provenance: &Provenance,
    ) -> Result<Option<Vec<String>>> {
        let qualifies = self.profile.delegate_strategy == DelegateStrategy::Inline
            && (scope.inlined || (self.unit.kind.is_test() && call.target != DelegateTarget::This));
        if !qualifies {
            return Ok(None);
        }
        let model = self.model;
        let Some(resolution) = model.resolution(scope.owner, call.site) else {
            return Ok(None);
        };
        let (Some(target), Some(method), ResolvedTarget::Method(_)) =
            (model.unit(resolution.unit), model.method(resolution), resolution.target)
        else {
            return Ok(None);
        };
        if !matches!(target.kind, UnitKind::PageObject | UnitKind::UtilityModule) || method.body.contains_return() {
            return Ok(None);
        }

        let self_ref = match Self::convention_of(target.kind, method.is_static) {
            Convention::Method => SelfRef::Receiver(self.receiver(scope, call)),
            _ => {
                self.type_ref(resolution.unit);
                SelfRef::Namespace(target.simple_name.clone())
            }
        };
        let mut inner = Scope::new(resolution.unit, &method.body, scope.harness.clone(), self_ref);
        inner.inlined = true;

        let mut block = Vec::new();
        for (param, arg) in method.params.iter().zip(&call.args) {
            if is_driver_type(&param.type_name) {
                continue;
            }
            let value = self.expr(scope, arg)?;
            if value == param.name {
                continue;
            }
            let local = if mentions(&value, &param.name) {
                let alias = format!("{}_", param.name);
                inner.renames.insert(param.name.clone(), alias.clone());
                alias
            } else {
                param.name.to_string()
            };
            inner.declared.insert(SmolStr::new(&local));
            block.push(format!("const {local} = {value};"));
        }
        block.extend(self.actions(&mut inner, &method.body.actions)?);

        self.note(
            provenance,
            codes::INLINED_DELEGATE,
            format!("inlined {}.{} at the call site", target.simple_name, method.name),
        );
        Ok(Some(vec![
            format!("// inlined from {}.{}", target.simple_name, method.name),
            "{".to_string(),
            self.indented(&block.join("\n")),
            "}".to_string(),
        ]))
    }

    /// Object a page-object method is called on
    fn receiver(&mut self, scope: &Scope<'_>, call: &DelegateCall) -> String {
        match &call.target {
            DelegateTarget::Field(name) => self.field_ref(scope, name),
            DelegateTarget::Local(name) | DelegateTarget::Param(name) => self.var_name(scope, name),
            DelegateTarget::This | DelegateTarget::Static => match &scope.self_ref {
                SelfRef::Receiver(receiver) => receiver.clone(),
                SelfRef::Namespace(namespace) => namespace.to_string(),
                SelfRef::Instance | SelfRef::Module => "this".to_string(),
            },
        }
    }
}

/// What a boolean presence check returns
enum Presence {
    Exists(ElementRef),
    Visible(ElementRef),
}

/// Target locators are lazy, so a single-element lookup nothing else reads
/// inside an attempt is followed by an explicit existence check.
fn required_lookups(attempt: &[Action]) -> Vec<Action> {
    let mut out = Vec::with_capacity(attempt.len());
    for (index, action) in attempt.iter().enumerate() {
        out.push(action.clone());
        let ActionKind::Locate {
            element,
            multiple: false,
            ..
        } = &action.kind
        else {
            continue;
        };
        if !attempt[index + 1..].iter().any(|later| later.references(*element)) {
            out.push(Action::new(
                ActionKind::Evaluate(Expr::Element(*element)),
                action.provenance.clone(),
            ));
        }
    }
    out
}

/// Recognize `try { find...; return true; } catch (...) { return false; }`
fn presence_check<'a>(attempt: &'a [Action], fallback: &[Action]) -> Option<(&'a [Action], Presence)> {
    let [
        Action {
            kind: ActionKind::Return(Some(Expr::Bool(false))),
            ..
        },
    ] = fallback
    else {
        return None;
    };
    let (last, rest) = attempt.split_last()?;
    let (prelude, presence) = match &last.kind {
        ActionKind::Return(Some(Expr::Bool(true))) => {
            let (check, prelude) = rest.split_last()?;
            match &check.kind {
                ActionKind::Evaluate(Expr::Element(element)) => (prelude, Presence::Exists(*element)),
                _ => return None,
            }
        }
        ActionKind::Return(Some(Expr::ElementQuery {
            element,
            query: ElementQuery::Visible,
            arg: None,
        })) => (rest, Presence::Visible(*element)),
        _ => return None,
    };
    prelude
        .iter()
        .all(|a| matches!(a.kind, ActionKind::Locate { .. } | ActionKind::Nth { .. }))
        .then_some((prelude, presence))
}

/// Whether `text` uses `ident` as a whole identifier
fn mentions(text: &str, ident: &str) -> bool {
    let is_ident = |c: char| c.is_alphanumeric() || c == '_' || c == '$';
    text.match_indices(ident).any(|(start, _)| {
        let before = text[..start].chars().next_back();
        let after = text[start + ident.len()..].chars().next();
        !before.is_some_and(is_ident) && !after.is_some_and(is_ident)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mentions_whole_identifier() {
        assert!(mentions("name + '!'", "name"));
        assert!(!mentions("username", "name"));
        assert!(!mentions("name_2", "name"));
    }
}
