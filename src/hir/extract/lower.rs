//! Statement lowering for one method body.

use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;

use super::{ExtractionContext, FieldInfo, TypeClass, assigned_field, browser_of, wait_timeout};
use crate::hir::action::{
    Action, ActionKind, Binding, ElementBinding, ElementOrigin, ElementRef, Expr, LifecycleOp,
    MethodBody, Provenance, Strategy,
};
use crate::hir::diagnostics::{Diagnostic, codes};
use crate::parser::ast::{self, AstNode, Block, Stmt};
use crate::parser::{SyntaxKind, SyntaxNode};

/// What a local name stands for
#[derive(Clone, Debug)]
pub(super) enum Local {
    Driver,
    Wait { timeout_ms: Option<u64> },
    Actions,
    ScriptExecutor,
    Element(ElementRef),
    ElementList(ElementRef),
    By { strategy: Strategy, value: Expr },
    Project(SmolStr),
    Value,
}

#[derive(Clone, Debug)]
pub(super) struct LocalVar {
    pub kind: Local,
    pub is_param: bool,
}

/// Result of looking up a bare name
#[derive(Clone, Debug)]
pub(super) enum Resolved {
    Local(LocalVar),
    Field(FieldInfo),
    Unknown,
}

/// Lowers the statements of one method into actions.
pub(crate) struct BodyLowering<'a, 'f> {
    pub(super) cx: &'a mut ExtractionContext<'f>,
    pub(super) elements: Vec<ElementBinding>,
    pub(super) lists: FxHashSet<ElementRef>,
    scopes: Vec<FxHashMap<SmolStr, LocalVar>>,
    field_elements: FxHashMap<SmolStr, ElementRef>,
    reassigned: FxHashSet<SmolStr>,
    /// Provenance of the statement being lowered
    pub(super) provenance: Provenance,
}

impl<'a, 'f> BodyLowering<'a, 'f> {
    fn new(cx: &'a mut ExtractionContext<'f>, provenance: Provenance) -> Self {
        Self {
            cx,
            elements: Vec::new(),
            lists: FxHashSet::default(),
            scopes: vec![FxHashMap::default()],
            field_elements: FxHashMap::default(),
            reassigned: FxHashSet::default(),
            provenance,
        }
    }

    /// Lower a method or constructor body
    pub(crate) fn lower_method(
        cx: &'a mut ExtractionContext<'f>,
        params: &[ast::Param],
        body: Option<Block>,
    ) -> MethodBody {
        let provenance = match &body {
            Some(block) => cx.provenance(block.syntax()),
            None => Provenance::new(cx.unit.clone(), Default::default()),
        };
        let mut lowering = Self::new(cx, provenance);
        for param in params {
            lowering.declare_param(param);
        }
        let mut actions = Vec::new();
        if let Some(block) = body {
            lowering.lower_block(&block, &mut actions);
        }
        lowering.finish(actions)
    }

    /// Lower a field initializer; anything needing actions stays opaque
    pub(crate) fn lower_constant(cx: &'a mut ExtractionContext<'f>, expr: &ast::Expr) -> Expr {
        let provenance = cx.provenance(expr.syntax());
        let mut lowering = Self::new(cx, provenance);
        let mut scratch = Vec::new();
        let value = lowering.lower_expr(expr, &mut scratch);
        if scratch.is_empty() {
            value
        } else {
            Expr::Opaque(expr.text())
        }
    }

    fn finish(self, mut actions: Vec<Action>) -> MethodBody {
        mark_mutable(&mut actions, &self.reassigned);
        MethodBody {
            actions,
            elements: self.elements,
        }
    }

    // ========================================================================
    // Scopes and elements
    // ========================================================================

    fn declare(&mut self, name: SmolStr, kind: Local) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name, LocalVar { kind, is_param: false });
        }
    }

    fn declare_param(&mut self, param: &ast::Param) {
        let (Some(name), Some(ty)) = (param.name(), param.ty()) else {
            return;
        };
        let kind = match self.cx.types.classify(&ty) {
            TypeClass::Driver => Local::Driver,
            TypeClass::Wait => Local::Wait { timeout_ms: None },
            TypeClass::Actions => Local::Actions,
            TypeClass::ScriptExecutor => Local::ScriptExecutor,
            TypeClass::Element | TypeClass::Select => {
                Local::Element(self.new_element(ElementOrigin::Param(name.clone()), Some(name.clone())))
            }
            TypeClass::ElementList => {
                let list = self.new_element(ElementOrigin::Param(name.clone()), Some(name.clone()));
                self.lists.insert(list);
                Local::ElementList(list)
            }
            TypeClass::Project(type_name) => Local::Project(type_name),
            TypeClass::By | TypeClass::Value => Local::Value,
        };
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name, LocalVar { kind, is_param: true });
        }
    }

    pub(super) fn lookup(&self, name: &str) -> Resolved {
        for scope in self.scopes.iter().rev() {
            if let Some(local) = scope.get(name) {
                return Resolved::Local(local.clone());
            }
        }
        match self.cx.field(name) {
            Some(field) => Resolved::Field(field.clone()),
            None => Resolved::Unknown,
        }
    }

    pub(super) fn new_element(&mut self, origin: ElementOrigin, name: Option<SmolStr>) -> ElementRef {
        let element = ElementRef(self.elements.len() as u32);
        self.elements.push(ElementBinding { name, origin });
        element
    }

    /// Handle for a locator-backed field, created on first use
    pub(super) fn field_element(&mut self, name: &SmolStr) -> Option<ElementRef> {
        if let Some(element) = self.field_elements.get(name) {
            return Some(*element);
        }
        let class = self.cx.field(name)?.class.clone();
        let list = match class {
            TypeClass::Element | TypeClass::Select => false,
            TypeClass::ElementList => true,
            _ => return None,
        };
        let element = self.new_element(ElementOrigin::Field(name.clone()), Some(name.clone()));
        if list {
            self.lists.insert(element);
        }
        self.field_elements.insert(name.clone(), element);
        Some(element)
    }

    /// Give an inline lookup the variable name it is stored under
    fn name_element(&mut self, element: ElementRef, name: &SmolStr) {
        if let Some(binding) = self.elements.get_mut(element.index()) {
            binding.name.get_or_insert_with(|| name.clone());
        }
    }

    pub(super) fn push(&self, out: &mut Vec<Action>, kind: ActionKind) {
        out.push(Action::new(kind, self.provenance.clone()));
    }

    pub(super) fn opaque(&mut self, node: &SyntaxNode, out: &mut Vec<Action>) {
        let text = self.cx.unrecognized(node);
        self.push(out, ActionKind::Opaque { text });
    }

    // ========================================================================
    // Statements
    // ========================================================================

    pub(super) fn lower_block(&mut self, block: &Block, out: &mut Vec<Action>) {
        self.scopes.push(FxHashMap::default());
        for stmt in block.statements() {
            self.lower_stmt(stmt, out);
        }
        self.scopes.pop();
    }

    fn lower_nested(&mut self, stmt: Option<Stmt>) -> Vec<Action> {
        let mut out = Vec::new();
        if let Some(stmt) = stmt {
            self.scopes.push(FxHashMap::default());
            self.lower_stmt(stmt, &mut out);
            self.scopes.pop();
        }
        out
    }

    fn lower_stmt(&mut self, stmt: Stmt, out: &mut Vec<Action>) {
        let node = stmt.syntax().clone();
        let outer = std::mem::replace(&mut self.provenance, self.cx.provenance(&node));

        if self.cx.file.has_error_in(node.text_range()) {
            self.opaque(&node, out);
        } else {
            match stmt {
                Stmt::Block(block) => self.lower_block(&block, out),
                Stmt::Empty(_) => {}
                Stmt::LocalVar(local) => self.lower_local_var(&local, out),
                Stmt::Expr(expr_stmt) => match expr_stmt.expr() {
                    Some(expr) => self.lower_expr_stmt(&expr, &node, out),
                    None => self.opaque(&node, out),
                },
                Stmt::If(if_stmt) => self.lower_if(&if_stmt, out),
                Stmt::Try(try_stmt) => self.lower_try(&try_stmt, out),
                Stmt::Return(ret) => {
                    let value = ret.expr().map(|e| self.lower_expr(&e, out));
                    self.push(out, ActionKind::Return(value));
                }
                Stmt::For(_)
                | Stmt::While(_)
                | Stmt::Do(_)
                | Stmt::Switch(_)
                | Stmt::Throw(_)
                | Stmt::Jump(_)
                | Stmt::Opaque(_)
                | Stmt::Error(_) => self.opaque(&node, out),
            }
        }

        self.provenance = outer;
    }

    fn lower_local_var(&mut self, stmt: &ast::LocalVarStmt, out: &mut Vec<Action>) {
        let Some(ty) = stmt.ty() else {
            self.opaque(stmt.syntax(), out);
            return;
        };
        let class = self.cx.types.classify(&ty);
        for declarator in stmt.declarators() {
            let Some(name) = declarator.name() else { continue };
            let init = declarator.init();
            let mut pending = Vec::new();
            let lowered = self.lower_declaration(&name, &class, init.as_ref(), &mut pending);
            match lowered {
                Some(kind) => {
                    out.append(&mut pending);
                    self.declare(name, kind);
                }
                None => {
                    self.opaque(stmt.syntax(), out);
                    self.declare(name, Local::Value);
                }
            }
        }
    }

    /// Lower `Type name = init`, returning what `name` stands for afterwards
    fn lower_declaration(
        &mut self,
        name: &SmolStr,
        class: &TypeClass,
        init: Option<&ast::Expr>,
        out: &mut Vec<Action>,
    ) -> Option<Local> {
        let Some(init) = init else {
            self.push(
                out,
                ActionKind::Bind {
                    name: name.clone(),
                    value: None,
                    mutable: false,
                },
            );
            return Some(Local::Value);
        };

        match class {
            TypeClass::Element | TypeClass::Select => {
                // an element that already has a name is aliased, not renamed
                let element = self.lower_element(init, out)?;
                self.name_element(element, name);
                Some(Local::Element(element))
            }
            TypeClass::ElementList => {
                let list = self.lower_element(init, out)?;
                self.name_element(list, name);
                Some(Local::ElementList(list))
            }
            TypeClass::Driver => {
                let opens = match init.clone().unwrap_parens() {
                    ast::Expr::New(new) => new.ty().is_some_and(|t| browser_of(&t.simple_name()).is_some()),
                    _ => false,
                };
                if opens {
                    self.push(out, ActionKind::Lifecycle(LifecycleOp::OpenBrowser));
                }
                Some(Local::Driver)
            }
            TypeClass::Wait => {
                let timeout_ms = match init.clone().unwrap_parens() {
                    ast::Expr::New(new) => wait_timeout(&new.args()),
                    _ => None,
                };
                self.push(out, ActionKind::Lifecycle(LifecycleOp::ConfigureWait));
                Some(Local::Wait { timeout_ms })
            }
            TypeClass::Actions => Some(Local::Actions),
            TypeClass::ScriptExecutor => Some(Local::ScriptExecutor),
            TypeClass::By => {
                let (strategy, value) = self.lower_by(init, out)?;
                Some(Local::By { strategy, value })
            }
            TypeClass::Project(type_name) => {
                if let ast::Expr::New(new) = init.clone().unwrap_parens() {
                    let args = self.lower_args(&new.args(), out);
                    let site = self.cx.next_site();
                    self.push(
                        out,
                        ActionKind::Instantiate {
                            binding: Binding::Local {
                                name: name.clone(),
                                declare: true,
                            },
                            type_name: type_name.clone(),
                            args,
                            site,
                        },
                    );
                } else {
                    let value = self.lower_expr(init, out);
                    self.push(
                        out,
                        ActionKind::Bind {
                            name: name.clone(),
                            value: Some(value),
                            mutable: false,
                        },
                    );
                }
                Some(Local::Project(type_name.clone()))
            }
            TypeClass::Value => {
                let value = self.lower_expr(init, out);
                self.push(
                    out,
                    ActionKind::Bind {
                        name: name.clone(),
                        value: Some(value),
                        mutable: false,
                    },
                );
                Some(Local::Value)
            }
        }
    }

    fn lower_expr_stmt(&mut self, expr: &ast::Expr, node: &SyntaxNode, out: &mut Vec<Action>) {
        let mut pending = Vec::new();
        let lowered = match expr.clone().unwrap_parens() {
            ast::Expr::Assign(assign) => self.lower_assign(&assign, &mut pending),
            ast::Expr::Call(call) => self.lower_call_stmt(&call, &mut pending),
            ast::Expr::Postfix(_) | ast::Expr::Prefix(_) => {
                let value = self.lower_expr(expr, &mut pending);
                if let Some(name) = increment_target(expr) {
                    self.reassigned.insert(name);
                }
                self.push(&mut pending, ActionKind::Evaluate(value));
                Some(())
            }
            _ => None,
        };
        match lowered {
            Some(()) => out.append(&mut pending),
            None => self.opaque(node, out),
        }
    }

    fn lower_assign(&mut self, assign: &ast::AssignExpr, out: &mut Vec<Action>) -> Option<()> {
        let target = assign.target()?;
        let value = assign.value()?;
        let op = assign.op()?;
        let name = assigned_field(&target.clone().unwrap_parens());

        if let (SyntaxKind::EQ, Some(name)) = (op, &name) {
            let resolved = match &target {
                ast::Expr::Field(_) => self.cx.field(name).cloned().map(Resolved::Field),
                _ => Some(self.lookup(name)),
            };
            if let Some(done) = self.lower_special_assign(name, resolved, &value, out) {
                return done;
            }
        }

        if let Some(name) = &name {
            self.reassigned.insert(name.clone());
        }
        let target = self.lower_expr(&target, out);
        let value = self.lower_expr(&value, out);
        self.push(
            out,
            ActionKind::Assign {
                target,
                op: SmolStr::new(assign_op_text(op)),
                value,
            },
        );
        Some(())
    }

    /// Assignments that set up context or page objects rather than state.
    ///
    /// Returns `None` when the assignment is an ordinary one.
    fn lower_special_assign(
        &mut self,
        name: &SmolStr,
        resolved: Option<Resolved>,
        value: &ast::Expr,
        out: &mut Vec<Action>,
    ) -> Option<Option<()>> {
        let value = value.clone().unwrap_parens();
        match resolved? {
            Resolved::Field(field) => match (&field.class, &value) {
                (TypeClass::Driver, ast::Expr::New(_)) => {
                    self.push(out, ActionKind::Lifecycle(LifecycleOp::OpenBrowser));
                    Some(Some(()))
                }
                // constructor plumbing: `this.driver = driver`
                (TypeClass::Driver | TypeClass::Actions | TypeClass::ScriptExecutor, _) => {
                    Some(Some(()))
                }
                (TypeClass::Wait, ast::Expr::New(_)) => {
                    self.push(out, ActionKind::Lifecycle(LifecycleOp::ConfigureWait));
                    Some(Some(()))
                }
                (TypeClass::Element | TypeClass::ElementList | TypeClass::Select, _)
                    if self.cx.locators.contains_key(name) =>
                {
                    Some(Some(()))
                }
                (TypeClass::Project(type_name), ast::Expr::New(new)) => {
                    let args = self.lower_args(&new.args(), out);
                    let site = self.cx.next_site();
                    self.push(
                        out,
                        ActionKind::Instantiate {
                            binding: Binding::Field(name.clone()),
                            type_name: type_name.clone(),
                            args,
                            site,
                        },
                    );
                    Some(Some(()))
                }
                _ => None,
            },
            Resolved::Local(local) => match (&local.kind, &value) {
                (Local::Project(type_name), ast::Expr::New(new)) => {
                    let args = self.lower_args(&new.args(), out);
                    let site = self.cx.next_site();
                    self.push(
                        out,
                        ActionKind::Instantiate {
                            binding: Binding::Local {
                                name: name.clone(),
                                declare: false,
                            },
                            type_name: type_name.clone(),
                            args,
                            site,
                        },
                    );
                    Some(Some(()))
                }
                (Local::Element(_), _) => {
                    // re-locating under the same name starts a new handle
                    let element = self.lower_element(&value, out);
                    let Some(element) = element else {
                        return Some(None);
                    };
                    self.name_element(element, name);
                    self.declare(name.clone(), Local::Element(element));
                    Some(Some(()))
                }
                _ => None,
            },
            Resolved::Unknown => None,
        }
    }

    fn lower_if(&mut self, stmt: &ast::IfStmt, out: &mut Vec<Action>) {
        let Some(condition) = stmt.condition() else {
            self.opaque(stmt.syntax(), out);
            return;
        };
        if stmt.else_branch().is_none() && self.is_driver_null_guard(&condition) {
            let then_actions = self.lower_nested(stmt.then_branch());
            out.extend(then_actions);
            return;
        }
        let condition = self.lower_expr(&condition, out);
        let then_actions = self.lower_nested(stmt.then_branch());
        let else_actions = self.lower_nested(stmt.else_branch());
        self.push(
            out,
            ActionKind::Branch {
                condition,
                then_actions,
                else_actions,
            },
        );
    }

    /// `driver != null`
    fn is_driver_null_guard(&self, condition: &ast::Expr) -> bool {
        let ast::Expr::Binary(binary) = condition.clone().unwrap_parens() else {
            return false;
        };
        if binary.op() != Some(SyntaxKind::BANG_EQ) {
            return false;
        }
        let is_null = |e: &Option<ast::Expr>| {
            matches!(e, Some(ast::Expr::Literal(l)) if l.value() == Some(ast::LiteralValue::Null))
        };
        let (lhs, rhs) = (binary.lhs(), binary.rhs());
        let other = if is_null(&rhs) {
            lhs
        } else if is_null(&lhs) {
            rhs
        } else {
            return false;
        };
        other.is_some_and(|e| self.is_driver(&e))
    }

    fn lower_try(&mut self, stmt: &ast::TryStmt, out: &mut Vec<Action>) {
        let catches: Vec<_> = stmt.catches().collect();
        let simple = !stmt.has_resources() && stmt.finally_block().is_none() && catches.len() == 1;
        let (Some(block), true) = (stmt.block(), simple) else {
            self.opaque(stmt.syntax(), out);
            return;
        };
        let catch = &catches[0];

        if catch.exception_types() == [SmolStr::new_static("InterruptedException")] {
            let span = self.cx.span(catch.syntax());
            self.cx.diagnostics.add(
                Diagnostic::info(
                    self.cx.unit.clone(),
                    "dropped `catch (InterruptedException)` around the try block",
                )
                .with_span(span)
                .with_code(codes::UNWRAPPED_INTERRUPTED),
            );
            self.lower_block(&block, out);
            return;
        }

        let mut attempt = Vec::new();
        self.lower_block(&block, &mut attempt);
        let mut fallback = Vec::new();
        if let Some(handler) = catch.block() {
            self.lower_block(&handler, &mut fallback);
        }
        self.push(out, ActionKind::LocateWithFallback { attempt, fallback });
    }

    pub(super) fn lower_args(&mut self, args: &[ast::Expr], out: &mut Vec<Action>) -> Vec<Expr> {
        args.iter().map(|arg| self.lower_expr(arg, out)).collect()
    }
}

/// `i++`, `--count`
fn increment_target(expr: &ast::Expr) -> Option<SmolStr> {
    let operand = match expr {
        ast::Expr::Postfix(p) => p.operand(),
        ast::Expr::Prefix(p) => p.operand(),
        _ => None,
    }?;
    match operand.unwrap_parens() {
        ast::Expr::Name(n) => Some(n.name()),
        _ => None,
    }
}

fn assign_op_text(op: SyntaxKind) -> &'static str {
    match op {
        SyntaxKind::PLUS_EQ => "+=",
        SyntaxKind::MINUS_EQ => "-=",
        SyntaxKind::STAR_EQ => "*=",
        SyntaxKind::SLASH_EQ => "/=",
        SyntaxKind::PERCENT_EQ => "%=",
        _ => "=",
    }
}

/// Flag `Bind`s of locals that are assigned again later
fn mark_mutable(actions: &mut [Action], reassigned: &FxHashSet<SmolStr>) {
    for action in actions {
        match &mut action.kind {
            ActionKind::Bind { name, mutable, .. } => *mutable = reassigned.contains(name),
            ActionKind::Branch {
                then_actions,
                else_actions,
                ..
            } => {
                mark_mutable(then_actions, reassigned);
                mark_mutable(else_actions, reassigned);
            }
            ActionKind::LocateWithFallback { attempt, fallback } => {
                mark_mutable(attempt, reassigned);
                mark_mutable(fallback, reassigned);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::hir::action::{ActionKind, Binding, ElementOrigin, Expr, InteractOp, LifecycleOp};
    use crate::hir::diagnostics::DiagnosticCollector;
    use crate::hir::extract::extract;
    use crate::hir::model::{MethodDef, SourceUnit};
    use crate::syntax::parse;

    fn unit(body: &str) -> (SourceUnit, DiagnosticCollector) {
        let text = format!(
            "public class SampleTest {{\n WebDriver driver;\n WebDriverWait wait;\n @Test public void run() {{\n{body}\n}}\n}}"
        );
        let file = parse(&text, "SampleTest.java").expect("parse");
        let mut diagnostics = DiagnosticCollector::new();
        (extract(&file, &mut diagnostics), diagnostics)
    }

    fn kinds(unit: &SourceUnit) -> Vec<ActionKind> {
        let test = unit.tests().next().expect("test");
        test.body.actions.iter().map(|a| a.kind.clone()).collect()
    }

    #[test]
    fn test_named_locate_and_bind() {
        let (unit, _) = unit(
            r#"WebElement button = driver.findElement(By.id("go"));
               String label = button.getText();
               label = label.trim();"#,
        );
        let test = unit.tests().next().expect("test");
        assert_eq!(test.body.elements[0].name.as_deref(), Some("button"));
        assert_eq!(test.body.elements[0].origin, ElementOrigin::Located);
        let actions = kinds(&unit);
        assert!(matches!(actions[0], ActionKind::Locate { multiple: false, .. }));
        assert!(matches!(actions[1], ActionKind::Bind { mutable: true, .. }));
        assert!(matches!(actions[2], ActionKind::Assign { .. }));
    }

    #[test]
    fn test_text_and_keys_are_separate_interactions() {
        let (unit, _) = unit(r#"driver.findElement(By.name("q")).sendKeys("selenium", Keys.ENTER);"#);
        let ops: Vec<_> = kinds(&unit)
            .into_iter()
            .filter_map(|kind| match kind {
                ActionKind::Interact { op, args, .. } => Some((op, args)),
                _ => None,
            })
            .collect();
        assert_eq!(
            ops,
            vec![
                (InteractOp::SendKeys, vec![Expr::Str("selenium".into())]),
                (InteractOp::PressKey, vec![Expr::Key("ENTER".into())]),
            ]
        );
    }

    #[test]
    fn test_driver_null_guard_is_unwrapped() {
        let (unit, _) = unit("if (driver != null) { driver.quit(); }");
        assert_eq!(
            kinds(&unit),
            vec![ActionKind::Lifecycle(LifecycleOp::Quit)]
        );
    }

    #[test]
    fn test_other_conditions_branch() {
        let (unit, _) = unit("if (driver.getTitle().isEmpty()) { driver.navigate().refresh(); } else { driver.quit(); }");
        let actions = kinds(&unit);
        let ActionKind::Branch {
            then_actions,
            else_actions,
            ..
        } = &actions[0]
        else {
            panic!("expected branch, got {actions:?}");
        };
        assert_eq!(then_actions.len(), 1);
        assert_eq!(else_actions.len(), 1);
    }

    #[test]
    fn test_interrupted_catch_is_unwrapped() {
        let (unit, diagnostics) = unit(
            "try { Thread.sleep(500); } catch (InterruptedException e) { e.printStackTrace(); }",
        );
        let actions = kinds(&unit);
        assert_eq!(actions.len(), 1);
        assert!(matches!(actions[0], ActionKind::Sleep { millis: Expr::Int(500) }));
        assert_eq!(diagnostics.diagnostics()[0].code.as_deref(), Some("I0001"));
    }

    #[test]
    fn test_single_catch_becomes_fallback() {
        let (unit, _) = unit(
            r#"try { driver.findElement(By.id("banner")).click(); } catch (NoSuchElementException e) { driver.navigate().back(); }"#,
        );
        let actions = kinds(&unit);
        let ActionKind::LocateWithFallback { attempt, fallback } = &actions[0] else {
            panic!("expected fallback, got {actions:?}");
        };
        assert_eq!(attempt.len(), 2);
        assert_eq!(fallback.len(), 1);
    }

    #[test]
    fn test_loops_are_opaque_with_warning() {
        let (unit, diagnostics) = unit("for (int i = 0; i < 3; i++) { driver.navigate().refresh(); }\ndriver.quit();");
        let actions = kinds(&unit);
        assert!(matches!(&actions[0], ActionKind::Opaque { text } if text.starts_with("for (int i")));
        assert_eq!(actions[1], ActionKind::Lifecycle(LifecycleOp::Quit));
        assert_eq!(diagnostics.warning_count(), 1);
    }

    #[test]
    fn test_local_page_object_instantiation() {
        let text = r#"public class FlowTest {
            WebDriver driver;
            @Test public void flow() {
                CartPage cart = new CartPage(driver);
                cart.open();
            }
        }"#;
        let file = parse(text, "FlowTest.java").expect("parse");
        let mut diagnostics = DiagnosticCollector::new();
        let unit = extract(&file, &mut diagnostics);
        let actions = kinds(&unit);
        let ActionKind::Instantiate {
            binding, type_name, ..
        } = &actions[0]
        else {
            panic!("expected instantiate, got {actions:?}");
        };
        assert_eq!(
            binding,
            &Binding::Local {
                name: "cart".into(),
                declare: true
            }
        );
        assert_eq!(type_name, "CartPage");
        assert!(matches!(&actions[1], ActionKind::Delegate(call) if call.method == "open"));
    }

    #[test]
    fn test_setup_opens_browser() {
        let text = r#"public class OpenTest {
            WebDriver driver;
            @Before public void setUp() {
                driver = new FirefoxDriver();
                driver.manage().window().maximize();
            }
            @Test public void t() {}
        }"#;
        let file = parse(text, "OpenTest.java").expect("parse");
        let mut diagnostics = DiagnosticCollector::new();
        let unit = extract(&file, &mut diagnostics);
        let setup: &MethodDef = unit.methods().next().expect("setup");
        let actions: Vec<_> = setup.body.actions.iter().map(|a| a.kind.clone()).collect();
        assert_eq!(
            actions,
            vec![
                ActionKind::Lifecycle(LifecycleOp::OpenBrowser),
                ActionKind::Lifecycle(LifecycleOp::Maximize)
            ]
        );
        assert_eq!(unit.context.browser().map(|b| b.as_str()), Some("firefox"));
    }
}
