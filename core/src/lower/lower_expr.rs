//! file: core/src/lower/lower_expr.rs
//! description: expression lowering rules.
//!
//! Every rule prints a fully parenthesized target expression so operator
//! precedence never depends on the context an expression is printed in.
//! The logical operators are printed in a non-short-circuiting form: both
//! operands are always evaluated, exactly once, left to right.
//!
use log::trace;

use super::lowering_context::LoweringContext;
use crate::ast::{BinaryOperator, Call, Expr, ExprKind, Function, RawCall, Stmt};
use crate::error::AnglResult;
use crate::location::Location;
use crate::scope::ScopeId;

/// Source name of the implicit leading parameter of every function.
const IMPLICIT_OTHER: &str = "other";

/// Target spelling of a numeric literal.
pub fn format_number(val: f64) -> String {
    if val.is_nan() {
        "NaN".to_string()
    } else if val.is_infinite() {
        if val > 0.0 { "Infinity".to_string() } else { "-Infinity".to_string() }
    } else {
        format!("{}", val)
    }
}

/// Double-quoted, escaped string literal.
pub fn quote_string(val: &str) -> String {
    serde_json::Value::String(val.to_string()).to_string()
}

impl LoweringContext<'_> {
    pub fn lower_expr(&mut self, expr: &Expr) -> AnglResult<()> {
        let location = expr.location.as_ref();
        match &expr.kind {
            ExprKind::Identifier { name, variable } => match variable {
                Some(reference) => {
                    let binding = self.tree.resolve_ref(reference)?;
                    let text = self.binding_text(binding)?;
                    self.sink.print(&text);
                }
                None => self.sink.print(name),
            },
            ExprKind::Binary { op, left, right } => self.lower_binary(*op, left, right)?,
            ExprKind::Unary { op, expr } => {
                self.sink.print("(");
                self.sink.print(op.symbol());
                self.lower_expr(expr)?;
                self.sink.print(")");
            }
            ExprKind::Number { val } => {
                self.sink.print("(");
                self.sink.print(&format_number(*val));
                self.sink.print(")");
            }
            ExprKind::Str { val } => self.sink.print(&quote_string(val)),
            ExprKind::Index { expr, indexes } => {
                self.sink.print("(");
                self.lower_expr(expr)?;
                self.sink.print(")");
                for index in indexes.iter() {
                    self.sink.print("[");
                    self.lower_expr(index)?;
                    self.sink.print("]");
                }
            }
            ExprKind::Call(call) => self.lower_call(call, location)?,
            ExprKind::Closure(function) => self.lower_closure(function)?,
            ExprKind::RawCall(raw) => self.lower_raw_call(raw)?,
            ExprKind::RawExpr { expr } => self.sink.print(expr),
        }
        Ok(())
    }

    fn lower_binary(&mut self, op: BinaryOperator, left: &Expr, right: &Expr) -> AnglResult<()> {
        // (prefix, infix, suffix)
        let (open, middle, close) = match op {
            BinaryOperator::Member => ("", ".", ""),
            BinaryOperator::IntDiv => ("((", " / ", ")|0)"),
            BinaryOperator::Mod => ("(", " % ", ")"),
            BinaryOperator::Or => ("(!!(!!( ", " )+!!( ", " ))|0)"),
            BinaryOperator::And => ("(!!( ", " )*!!( ", " ))"),
            BinaryOperator::Xor => ("(!((!( ", " )+!( ", " ))-1)|0)"),
            _ => {
                self.sink.print("(");
                self.lower_expr(left)?;
                self.sink.print(&format!(" {} ", op.symbol()));
                self.lower_expr(right)?;
                self.sink.print(")");
                return Ok(());
            }
        };
        self.sink.print(open);
        self.lower_expr(left)?;
        self.sink.print(middle);
        self.lower_expr(right)?;
        self.sink.print(close);
        Ok(())
    }

    /// Plain calls pass the caller's `self` and `other` through `.call`;
    /// method calls let the callee keep its receiver and pass only `other`.
    pub(crate) fn lower_call(&mut self, call: &Call, location: Option<&Location>) -> AnglResult<()> {
        self.sink.print("(");
        self.lower_expr(&call.callee)?;
        self.sink.print(")");
        let other = self.resolve_in_chain(call.scope, "other", location)?;
        if call.is_method_call {
            self.sink.print("(");
            let text = self.binding_text(other)?;
            self.sink.print(&text);
        } else {
            let this = self.resolve_in_chain(call.scope, "self", location)?;
            self.sink.print(".call(");
            let text = self.binding_text(this)?;
            self.sink.print(&text);
            self.sink.print(", ");
            let text = self.binding_text(other)?;
            self.sink.print(&text);
        }
        for arg in call.args.iter() {
            self.sink.print(", ");
            self.lower_expr(arg)?;
        }
        self.sink.print(")");
        Ok(())
    }

    /// Print a parameter list with the implicit `other` first. Each name is
    /// the target allocated to the scope's binding, so the header agrees
    /// with every reference in the body.
    fn lower_parameters(&mut self, args: &[String], scope: ScopeId) -> AnglResult<()> {
        let mut params = vec![self.local_target_or_name(scope, IMPLICIT_OTHER)?];
        for arg in args.iter() {
            params.push(self.local_target_or_name(scope, arg)?);
        }
        self.sink.print(&params.join(", "));
        Ok(())
    }

    /// Parameter list, locals and body, braces included. The opening brace
    /// ends the current line; the closing one is indented but not terminated.
    pub(crate) fn lower_function_body(&mut self, args: &[String], body: &Stmt, scope: ScopeId) -> AnglResult<()> {
        self.sink.print("(");
        self.lower_parameters(args, scope)?;
        self.sink.print(") {\n");
        self.sink.indent();
        self.lower_local_allocation(scope)?;
        self.lower_stmt(body, false, false)?;
        self.sink.outdent()?;
        self.sink.print_indent();
        self.sink.print("}");
        Ok(())
    }

    pub(crate) fn lower_closure(&mut self, function: &Function) -> AnglResult<()> {
        trace!("lowering closure over scope {}", function.scope.0);
        self.sink.print("function");
        self.lower_function_body(&function.args, &function.stmts, function.scope)
    }

    pub(crate) fn lower_raw_call(&mut self, raw: &RawCall) -> AnglResult<()> {
        self.sink.print("(");
        self.sink.print(&raw.code);
        self.sink.print(")(");
        for (i, arg) in raw.args.iter().enumerate() {
            if i > 0 {
                self.sink.print(", ");
            }
            self.lower_expr(arg)?;
        }
        self.sink.print(")");
        Ok(())
    }
}
