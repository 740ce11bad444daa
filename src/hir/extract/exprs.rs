//! Expression lowering.

use smol_str::SmolStr;

use super::TypeClass;
use super::lower::{BodyLowering, Local, Resolved};
use crate::hir::action::{
    Action, BinaryOp, ElementQuery, ElementRef, Expr, PageQuery, UnaryOp, ValueMethod,
};
use crate::parser::SyntaxKind;
use crate::parser::ast::{self, AstNode, CallExpr, LiteralValue};

fn binary_op(kind: SyntaxKind) -> Option<BinaryOp> {
    let op = match kind {
        SyntaxKind::EQ_EQ => BinaryOp::Eq,
        SyntaxKind::BANG_EQ => BinaryOp::NotEq,
        SyntaxKind::LT => BinaryOp::Lt,
        SyntaxKind::GT => BinaryOp::Gt,
        SyntaxKind::LT_EQ => BinaryOp::LtEq,
        SyntaxKind::GT_EQ => BinaryOp::GtEq,
        SyntaxKind::AMP_AMP => BinaryOp::And,
        SyntaxKind::PIPE_PIPE => BinaryOp::Or,
        SyntaxKind::PLUS => BinaryOp::Add,
        SyntaxKind::MINUS => BinaryOp::Sub,
        SyntaxKind::STAR => BinaryOp::Mul,
        SyntaxKind::SLASH => BinaryOp::Div,
        SyntaxKind::PERCENT => BinaryOp::Rem,
        _ => return None,
    };
    Some(op)
}

impl BodyLowering<'_, '_> {
    /// Lower a value expression. Element lookups it needs are pushed to `out`.
    pub(super) fn lower_expr(&mut self, expr: &ast::Expr, out: &mut Vec<Action>) -> Expr {
        match self.try_lower_expr(expr, out) {
            Some(lowered) => lowered,
            None => Expr::Opaque(self.cx.unrecognized(expr.syntax())),
        }
    }

    fn try_lower_expr(&mut self, expr: &ast::Expr, out: &mut Vec<Action>) -> Option<Expr> {
        let lowered = match expr {
            ast::Expr::Literal(lit) => match lit.value()? {
                LiteralValue::String(s) => Expr::Str(s),
                LiteralValue::Char(c) => Expr::Char(c),
                LiteralValue::Int(n) => Expr::Int(n),
                LiteralValue::Float(f) => Expr::Float(f),
                LiteralValue::Bool(b) => Expr::Bool(b),
                LiteralValue::Null => Expr::Null,
            },
            ast::Expr::Name(name) => self.lower_name(name.name()),
            ast::Expr::This(this) if !this.is_super() => Expr::Var(SmolStr::new_static("this")),
            ast::Expr::Field(field) => match field.receiver()? {
                ast::Expr::This(_) => self.lower_field_name(field.name()?),
                ast::Expr::Name(owner) if owner.name() == "Keys" => Expr::Key(field.name()?),
                _ => return None,
            },
            ast::Expr::Call(call) => self.lower_call_expr(call, out)?,
            ast::Expr::Cast(cast) => self.try_lower_expr(&cast.expr()?, out)?,
            ast::Expr::Paren(paren) => Expr::Paren(Box::new(self.lower_expr(&paren.expr()?, out))),
            ast::Expr::Prefix(prefix) => {
                let op = match prefix.op()? {
                    SyntaxKind::BANG => UnaryOp::Not,
                    SyntaxKind::MINUS => UnaryOp::Neg,
                    _ => return None,
                };
                Expr::Unary {
                    op,
                    operand: Box::new(self.lower_expr(&prefix.operand()?, out)),
                }
            }
            ast::Expr::Binary(binary) => {
                let op = binary_op(binary.op()?)?;
                let lhs = self.lower_expr(&binary.lhs()?, out);
                let rhs = self.lower_expr(&binary.rhs()?, out);
                Expr::Binary {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                }
            }
            ast::Expr::Ternary(ternary) => Expr::Conditional {
                condition: Box::new(self.lower_expr(&ternary.condition()?, out)),
                then_expr: Box::new(self.lower_expr(&ternary.then_expr()?, out)),
                else_expr: Box::new(self.lower_expr(&ternary.else_expr()?, out)),
            },
            _ => return None,
        };
        Some(lowered)
    }

    fn lower_name(&mut self, name: SmolStr) -> Expr {
        match self.lookup(&name) {
            Resolved::Local(local) => match local.kind {
                Local::Driver => Expr::Driver,
                Local::Element(element) | Local::ElementList(element) => Expr::Element(element),
                _ => Expr::Var(name),
            },
            Resolved::Field(_) => self.lower_field_name(name),
            Resolved::Unknown => Expr::Var(name),
        }
    }

    fn lower_field_name(&mut self, name: SmolStr) -> Expr {
        let class = self.cx.field(&name).map(|f| f.class.clone());
        match class {
            Some(TypeClass::Driver) => Expr::Driver,
            Some(TypeClass::Element | TypeClass::ElementList | TypeClass::Select) => {
                match self.field_element(&name) {
                    Some(element) => Expr::Element(element),
                    None => Expr::Field(name),
                }
            }
            _ => Expr::Field(name),
        }
    }

    fn lower_call_expr(&mut self, call: &CallExpr, out: &mut Vec<Action>) -> Option<Expr> {
        let name = call.name()?;
        let args = call.args();
        let receiver = call.receiver();

        if let Some(receiver) = &receiver {
            if let Some(query) = ElementQuery::from_element_method(&name) {
                if let Some(element) = self.lower_element(receiver, out) {
                    return Some(self.element_query(element, query, &args, out));
                }
            }
            if matches!(name.as_str(), "size" | "isEmpty") && args.is_empty() {
                if let Some(list) = self.lower_element(receiver, out) {
                    if self.lists.contains(&list) {
                        return Some(match name.as_str() {
                            "size" => Expr::Count(list),
                            _ => Expr::Paren(Box::new(Expr::Binary {
                                op: BinaryOp::Eq,
                                lhs: Box::new(Expr::Count(list)),
                                rhs: Box::new(Expr::Int(0)),
                            })),
                        });
                    }
                }
            }
            if let Some(query) = PageQuery::from_driver_method(&name) {
                if self.is_driver(receiver) {
                    return Some(Expr::PageQuery(query));
                }
            }
        }
        if matches!(name.as_str(), "findElement" | "findElements" | "get" | "until") {
            if let Some(element) = self.lower_element(&ast::Expr::Call(call.clone()), out) {
                return Some(Expr::Element(element));
            }
        }
        if matches!(name.as_str(), "executeScript" | "executeAsyncScript") {
            let (code, args) = self.lower_script(call, out)?;
            return Some(Expr::Script { code, args });
        }
        if let Some(delegate) = self.delegate_call(call, out) {
            return Some(Expr::Call(delegate));
        }

        let method = ValueMethod::from_method(&name, args.len())?;
        let receiver = self.lower_expr(&receiver?, out);
        let args = self.lower_args(&args, out);
        Some(Expr::Method {
            receiver: Box::new(receiver),
            method,
            args,
        })
    }

    fn element_query(
        &mut self,
        element: ElementRef,
        query: ElementQuery,
        args: &[ast::Expr],
        out: &mut Vec<Action>,
    ) -> Expr {
        match (query, args) {
            (ElementQuery::Attribute, [attribute]) => {
                let attribute = self.lower_expr(attribute, out);
                if attribute == Expr::Str("value".to_string()) {
                    return Expr::ElementQuery {
                        element,
                        query: ElementQuery::Value,
                        arg: None,
                    };
                }
                Expr::ElementQuery {
                    element,
                    query,
                    arg: Some(Box::new(attribute)),
                }
            }
            _ => Expr::ElementQuery {
                element,
                query,
                arg: None,
            },
        }
    }
}
