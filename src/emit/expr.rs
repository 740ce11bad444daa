//! Expression rendering, element handles and calls into other units.

use smol_str::SmolStr;

use super::emitter::{Convention, Result, Scope, SelfRef, UnitEmitter};
use super::template::{Vars, render};
use crate::hir::{
    BinaryOp, CallSiteId, DelegateCall, DelegateTarget, ElementOrigin, ElementRef, Expr, ParamDef,
    Strategy, UnaryOp, UnitId, UnitKind, ValueMethod, is_driver_type,
};

impl UnitEmitter<'_> {
    pub(super) fn expr(&mut self, scope: &Scope<'_>, expr: &Expr) -> Result<String> {
        let profile = self.profile;
        let text = match expr {
            Expr::Str(s) => quote(s),
            Expr::Char(c) => quote(&c.to_string()),
            Expr::Int(n) => n.to_string(),
            Expr::Float(f) => f.to_string(),
            Expr::Bool(b) => b.to_string(),
            Expr::Null => "null".to_string(),
            Expr::Var(name) => self.var_name(scope, name),
            Expr::Field(name) => self.field_ref(scope, name),
            Expr::Driver => scope.harness.clone(),
            Expr::Element(element) => self.element(scope, *element)?,
            Expr::ElementQuery { element, query, arg } => {
                let template = self.lookup("queries", &profile.queries, query.as_str())?;
                let element = self.element(scope, *element)?;
                let arg = match arg {
                    Some(arg) => self.expr(scope, arg)?,
                    None => String::new(),
                };
                render(template, &Vars::new().with("element", element).with("arg", arg))
            }
            Expr::Count(element) => {
                let template = self.lookup("queries", &profile.queries, "count")?;
                let element = self.element(scope, *element)?;
                render(template, &Vars::new().with("element", element))
            }
            Expr::PageQuery(query) => {
                let template = self.lookup("page_queries", &profile.page_queries, query.as_str())?;
                render(template, &Vars::new().with("harness", scope.harness.as_str()))
            }
            Expr::Script { code, args } => self.script(scope, &profile.script.expression, code, args)?,
            Expr::Call(call) => format!("await {}", self.call(scope, call)?),
            Expr::Method { receiver, method, args } => self.value_method(scope, receiver, *method, args)?,
            Expr::Binary { op, lhs, rhs } => {
                format!("{} {} {}", self.expr(scope, lhs)?, binary_op(*op), self.expr(scope, rhs)?)
            }
            Expr::Unary { op, operand } => {
                let op = match op {
                    UnaryOp::Not => "!",
                    UnaryOp::Neg => "-",
                };
                format!("{op}{}", self.operand(scope, operand)?)
            }
            Expr::Conditional {
                condition,
                then_expr,
                else_expr,
            } => format!(
                "{} ? {} : {}",
                self.expr(scope, condition)?,
                self.expr(scope, then_expr)?,
                self.expr(scope, else_expr)?
            ),
            Expr::Paren(inner) => format!("({})", self.expr(scope, inner)?),
            Expr::Key(name) => {
                let template = self.lookup("statements", &profile.statements, "key")?;
                render(template, &Vars::new().with("name", key_name(name)))
            }
            Expr::Opaque(text) => format!(
                "undefined /* unconverted: {} */",
                text.replace("*/", "* /").replace('\n', " ")
            ),
        };
        Ok(text)
    }

    /// An expression used as a receiver or unary operand
    fn operand(&mut self, scope: &Scope<'_>, expr: &Expr) -> Result<String> {
        let text = self.expr(scope, expr)?;
        let compound = matches!(
            expr,
            Expr::Binary { .. } | Expr::Unary { .. } | Expr::Conditional { .. } | Expr::Opaque(_)
        );
        Ok(if compound || text.starts_with("await ") {
            format!("({text})")
        } else {
            text
        })
    }

    fn value_method(
        &mut self,
        scope: &Scope<'_>,
        receiver: &Expr,
        method: ValueMethod,
        args: &[Expr],
    ) -> Result<String> {
        let recv = self.operand(scope, receiver)?;
        let arg = match args.first() {
            Some(arg) => self.operand(scope, arg)?,
            None => String::new(),
        };
        let text = match method {
            ValueMethod::Contains => format!("{recv}.includes({arg})"),
            ValueMethod::Equals => format!("({recv} === {arg})"),
            ValueMethod::EqualsIgnoreCase => format!("({recv}.toLowerCase() === {arg}.toLowerCase())"),
            ValueMethod::StartsWith => format!("{recv}.startsWith({arg})"),
            ValueMethod::EndsWith => format!("{recv}.endsWith({arg})"),
            ValueMethod::Trim => format!("{recv}.trim()"),
            ValueMethod::Length => format!("{recv}.length"),
            ValueMethod::ToLowerCase => format!("{recv}.toLowerCase()"),
            ValueMethod::ToUpperCase => format!("{recv}.toUpperCase()"),
            ValueMethod::IsEmpty => format!("({recv}.length === 0)"),
            ValueMethod::IntValue => recv,
            ValueMethod::ToString => format!("String({})", self.expr(scope, receiver)?),
        };
        Ok(text)
    }

    // ------------------------------------------------------------------------
    // Names
    // ------------------------------------------------------------------------

    pub(super) fn var_name(&self, scope: &Scope<'_>, name: &SmolStr) -> String {
        scope
            .renames
            .get(name)
            .cloned()
            .unwrap_or_else(|| name.to_string())
    }

    pub(super) fn field_ref(&self, scope: &Scope<'_>, name: &SmolStr) -> String {
        match &scope.self_ref {
            SelfRef::Instance => format!("this.{name}"),
            SelfRef::Receiver(receiver) => format!("{receiver}.{name}"),
            SelfRef::Namespace(namespace) => format!("{namespace}.{name}"),
            SelfRef::Module => name.to_string(),
        }
    }

    // ------------------------------------------------------------------------
    // Elements
    // ------------------------------------------------------------------------

    pub(super) fn element(&mut self, scope: &Scope<'_>, element: ElementRef) -> Result<String> {
        if let Some(text) = scope.elements.get(&element) {
            return Ok(text.clone());
        }
        let binding = scope.body.element(element);
        match binding.map(|b| &b.origin) {
            Some(ElementOrigin::Field(name)) => self.field_element(scope, name),
            Some(ElementOrigin::Param(name)) => Ok(self.var_name(scope, name)),
            _ => Ok(match binding.and_then(|b| b.name.as_ref()) {
                Some(name) => self.var_name(scope, name),
                None => format!("element{}", element.0),
            }),
        }
    }

    /// A locator-backed field: a property of page objects, inline elsewhere
    fn field_element(&mut self, scope: &Scope<'_>, name: &SmolStr) -> Result<String> {
        match &scope.self_ref {
            SelfRef::Instance => Ok(format!("this.{name}")),
            SelfRef::Receiver(receiver) => Ok(format!("{receiver}.{name}")),
            SelfRef::Module | SelfRef::Namespace(_) => {
                let model = self.model;
                let def = model.unit(scope.owner).and_then(|u| u.locators.get(name));
                match def {
                    Some(def) => {
                        let value = Expr::Str(def.value.clone());
                        self.locator(scope, &scope.harness, def.strategy, &value, def.multiple)
                    }
                    None => Ok(self.field_ref(scope, name)),
                }
            }
        }
    }

    /// Locator expression under `within` with the exact strategy and value
    pub(super) fn locator(
        &mut self,
        scope: &Scope<'_>,
        within: &str,
        strategy: Strategy,
        value: &Expr,
        multiple: bool,
    ) -> Result<String> {
        let profile = self.profile;
        let template = if multiple {
            profile.locator_all(strategy.as_str())
        } else {
            profile.locators.get(strategy.as_str()).map(String::as_str)
        };
        let Some(template) = template else {
            return Err(self.unsupported_locator(strategy));
        };
        // templates quote the value themselves; computed values are spliced in
        let value = match value {
            Expr::Str(s) => escape(s),
            other => format!("' + {} + '", self.expr(scope, other)?),
        };
        let text = render(template, &Vars::new().with("scope", within).with("value", value));
        Ok(text.replace("'' + ", "").replace(" + ''", ""))
    }

    // ------------------------------------------------------------------------
    // Scripts
    // ------------------------------------------------------------------------

    pub(super) fn script(&mut self, scope: &Scope<'_>, template: &str, code: &str, args: &[Expr]) -> Result<String> {
        let profile = self.profile;
        let bridge = &profile.script;
        let code = match &bridge.arguments_alias {
            Some(alias) => code.replace("arguments", alias),
            None => code.to_string(),
        };
        let function = render(&bridge.function, &Vars::new().with("code", code.trim()));
        let mut rendered = Vec::with_capacity(args.len());
        for arg in args {
            rendered.push(match arg {
                Expr::Element(element) => {
                    let element = self.element(scope, *element)?;
                    render(&bridge.element_arg, &Vars::new().with("element", element))
                }
                other => self.expr(scope, other)?,
            });
        }
        let rest: String = rendered.iter().map(|a| format!(", {a}")).collect();
        let vars = Vars::new()
            .with("harness", scope.harness.as_str())
            .with("function", function)
            .with("args", rendered.join(", "))
            .with("rest_args", rest);
        Ok(render(template, &vars))
    }

    // ------------------------------------------------------------------------
    // Calls
    // ------------------------------------------------------------------------

    /// Page-object instance methods are methods; everything else is a function
    pub(super) fn convention_of(kind: UnitKind, is_static: bool) -> Convention {
        if kind == UnitKind::PageObject && !is_static {
            Convention::Method
        } else {
            Convention::Function
        }
    }

    /// `receiver.method(args)`, without the leading `await`
    pub(super) fn call(&mut self, scope: &Scope<'_>, call: &DelegateCall) -> Result<String> {
        let model = self.model;
        let resolution = model.resolution(scope.owner, call.site).copied();
        let target = resolution.and_then(|r| model.unit(r.unit).map(|u| (r.unit, u)));
        let method = resolution.as_ref().and_then(|r| model.method(r));
        let convention = match (target, method) {
            (Some((_, unit)), Some(method)) => Self::convention_of(unit.kind, method.is_static),
            _ => Convention::Function,
        };

        let receiver = match (&call.target, target) {
            (DelegateTarget::Field(name), _) => self.field_ref(scope, name),
            (DelegateTarget::Local(name) | DelegateTarget::Param(name), _) => self.var_name(scope, name),
            (DelegateTarget::Static, Some((id, _))) => self.type_ref(id),
            (DelegateTarget::This, Some((id, _))) => self.this_receiver(scope, id, convention),
            (DelegateTarget::Static | DelegateTarget::This, None) => call.type_name.to_string(),
        };
        let params = method.map(|m| m.params.as_slice());
        let args = self.call_args(scope, params, &call.args, convention)?;
        Ok(if receiver.is_empty() {
            format!("{}({args})", call.method)
        } else {
            format!("{receiver}.{}({args})", call.method)
        })
    }

    /// Receiver of an unqualified call, which may land in a superclass
    fn this_receiver(&mut self, scope: &Scope<'_>, target: UnitId, convention: Convention) -> String {
        match (&scope.self_ref, convention) {
            (SelfRef::Instance, Convention::Method) => "this".to_string(),
            (SelfRef::Receiver(receiver), Convention::Method) => receiver.clone(),
            (SelfRef::Module, _) if target == scope.owner => String::new(),
            (SelfRef::Namespace(namespace), _) if target == scope.owner => namespace.to_string(),
            _ => self.type_ref(target),
        }
    }

    /// Arguments with driver parameters dropped and the harness threaded in
    fn call_args(
        &mut self,
        scope: &Scope<'_>,
        params: Option<&[ParamDef]>,
        args: &[Expr],
        convention: Convention,
    ) -> Result<String> {
        let mut out = Vec::with_capacity(args.len() + 1);
        if convention != Convention::Method && self.profile.harness.passed {
            out.push(scope.harness.clone());
        }
        for (index, arg) in args.iter().enumerate() {
            let driver = params
                .and_then(|p| p.get(index))
                .is_some_and(|p| is_driver_type(&p.type_name));
            if !driver && *arg != Expr::Driver {
                out.push(self.expr(scope, arg)?);
            }
        }
        Ok(out.join(", "))
    }

    /// `new Page(page, ...)`, or the module itself for utility classes
    pub(super) fn instantiation(
        &mut self,
        scope: &Scope<'_>,
        type_name: &SmolStr,
        args: &[Expr],
        site: CallSiteId,
    ) -> Result<String> {
        let model = self.model;
        let Some(resolution) = model.resolution(scope.owner, site).copied() else {
            let mut rendered = Vec::with_capacity(args.len());
            for arg in args {
                rendered.push(self.expr(scope, arg)?);
            }
            return Ok(format!("new {type_name}({})", rendered.join(", ")));
        };
        let kind = model.unit(resolution.unit).map(|u| u.kind);
        let class = self.type_ref(resolution.unit);
        if kind == Some(UnitKind::UtilityModule) {
            return Ok(class);
        }
        let params = model.method(&resolution).map(|m| m.params.as_slice());
        let args = self.call_args(scope, params, args, Convention::Constructor)?;
        Ok(format!("new {class}({args})"))
    }
}

fn binary_op(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Eq => "===",
        BinaryOp::NotEq => "!==",
        BinaryOp::Lt => "<",
        BinaryOp::Gt => ">",
        BinaryOp::LtEq => "<=",
        BinaryOp::GtEq => ">=",
        BinaryOp::And => "&&",
        BinaryOp::Or => "||",
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        BinaryOp::Div => "/",
        BinaryOp::Rem => "%",
    }
}

/// Body of a single-quoted string literal
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}

fn quote(s: &str) -> String {
    format!("'{}'", escape(s))
}

/// W3C key name of a Selenium `Keys` constant
fn key_name(constant: &str) -> String {
    let named = match constant {
        "RETURN" => "Enter",
        "BACK_SPACE" => "Backspace",
        "ESCAPE" => "Escape",
        "UP" => "ArrowUp",
        "DOWN" => "ArrowDown",
        "LEFT" => "ArrowLeft",
        "RIGHT" => "ArrowRight",
        "CONTROL" => "Control",
        "COMMAND" => "Meta",
        _ => "",
    };
    if !named.is_empty() {
        return named.to_string();
    }
    constant
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase(),
                None => String::new(),
            }
        })
        .collect()
}
