//! file: core/src/lower/lower_stmt.rs
//! description: statement and switch-clause lowering rules.
//!
//! A statement prints its own indentation and, unless asked not to, its
//! terminator (`;` and a newline). Blocks and no-ops print neither. The
//! two flags exist for the header of a `for` loop, where the init and step
//! statements are printed inline.
//!
use log::trace;

use super::lowering_context::LoweringContext;
use crate::ast::{CaseClause, Declarator, Expr, Stmt, StmtKind};
use crate::error::{AnglErrorExt, AnglResult};
use crate::scope::ScopeError;

impl LoweringContext<'_> {
    pub fn lower_stmt(&mut self, stmt: &Stmt, omit_terminator: bool, omit_indentation: bool) -> AnglResult<()> {
        trace!("lowering {} statement", stmt.kind_name());
        match &stmt.kind {
            StmtKind::Declare { list } => {
                self.indent_unless(omit_indentation);
                self.sink.print("var ");
                for (i, decl) in list.iter().enumerate() {
                    if i > 0 {
                        self.sink.print(", ");
                    }
                    self.lower_declarator(decl)?;
                }
            }
            StmtKind::Assign { lval, rval } => {
                self.indent_unless(omit_indentation);
                self.lower_expr(lval)?;
                self.sink.print(" = ");
                self.lower_expr(rval)?;
            }
            StmtKind::FunctionDeclare { name, args, stmts, scope } => {
                self.indent_unless(omit_indentation);
                let head = format!("{}.{} = function", self.runtime.globals_identifier, name);
                self.sink.print(&head);
                self.lower_function_body(args, stmts, *scope)?;
            }
            StmtKind::ConstantDeclare { name, expr } => {
                self.indent_unless(omit_indentation);
                let head = format!("{}.{} = ", self.runtime.globals_identifier, name);
                self.sink.print(&head);
                self.lower_expr(expr)?;
            }
            StmtKind::Switch { expr, cases } => {
                self.indent_unless(omit_indentation);
                self.sink.print("switch(");
                self.lower_expr(expr)?;
                self.sink.print(") {\n");
                self.sink.indent();
                for case in cases.iter() {
                    self.lower_case(case)?;
                }
                self.close_block(omit_indentation)?;
            }
            StmtKind::For { init, condition, step, body } => {
                self.indent_unless(omit_indentation);
                self.sink.print("for(");
                self.lower_stmt(init, true, true)?;
                self.sink.print("; ");
                self.lower_expr(condition)?;
                self.sink.print("; ");
                self.lower_stmt(step, true, true)?;
                self.sink.print(") {\n");
                self.sink.indent();
                self.lower_stmt(body, false, false)?;
                self.close_block(omit_indentation)?;
            }
            StmtKind::If { expr, stmt } => self.lower_if_else(expr, stmt, &Stmt::nop(), omit_indentation)?,
            StmtKind::IfElse { expr, stmt1, stmt2 } => self.lower_if_else(expr, stmt1, stmt2, omit_indentation)?,
            StmtKind::While { expr, stmt } => {
                self.indent_unless(omit_indentation);
                self.sink.print("while(");
                self.lower_expr(expr)?;
                self.sink.print(") {\n");
                self.sink.indent();
                self.lower_stmt(stmt, false, false)?;
                self.close_block(omit_indentation)?;
            }
            StmtKind::DoUntil { stmt, expr } => {
                self.indent_unless(omit_indentation);
                self.sink.print("do {\n");
                self.sink.indent();
                self.lower_stmt(stmt, false, false)?;
                self.close_block(omit_indentation)?;
                self.sink.print(" while(!(");
                self.lower_expr(expr)?;
                self.sink.print("))");
            }
            StmtKind::Break => {
                self.indent_unless(omit_indentation);
                self.sink.print("break");
            }
            StmtKind::Continue => {
                self.indent_unless(omit_indentation);
                self.sink.print("continue");
            }
            StmtKind::Block { list } => {
                for inner in list.iter() {
                    self.lower_stmt(inner, false, false)?;
                }
            }
            StmtKind::With(with) => self.lower_with(with, stmt, omit_indentation)?,
            StmtKind::Return { expr } => {
                self.indent_unless(omit_indentation);
                self.sink.print("return (");
                self.lower_expr(expr)?;
                self.sink.print(")");
            }
            StmtKind::Exit => {
                self.indent_unless(omit_indentation);
                self.sink.print("return");
            }
            StmtKind::ObjectDeclare(object) => self.lower_object(object, omit_indentation)?,
            StmtKind::Nop => {}
            StmtKind::Call(call) => {
                self.indent_unless(omit_indentation);
                self.lower_call(call, stmt.location.as_ref())?;
            }
            StmtKind::RawCall(raw) => {
                self.indent_unless(omit_indentation);
                self.lower_raw_call(raw)?;
            }
        }

        let terminated = !matches!(stmt.kind, StmtKind::Nop | StmtKind::Block { .. });
        if terminated && !omit_terminator {
            self.sink.print(";\n");
        }
        Ok(())
    }

    pub(crate) fn indent_unless(&mut self, omit_indentation: bool) {
        if !omit_indentation {
            self.sink.print_indent();
        }
    }

    /// Outdent and print the closing brace of a block opened with `{\n`.
    pub(crate) fn close_block(&mut self, omit_indentation: bool) -> AnglResult<()> {
        self.sink.outdent()?;
        self.indent_unless(omit_indentation);
        self.sink.print("}");
        Ok(())
    }

    fn lower_declarator(&mut self, decl: &Declarator) -> AnglResult<()> {
        match &decl.variable {
            Some(reference) => {
                let binding = self.tree.resolve_ref(reference)?;
                let target = self.tree.target_identifier(binding)?.to_string();
                self.sink.print(&target);
            }
            None => self.sink.print(&decl.name),
        }
        if let Some(expr) = &decl.expr {
            self.sink.print(" = ");
            self.lower_expr(expr)?;
        }
        Ok(())
    }

    /// `if` without `else` prints an empty `else` block.
    fn lower_if_else(&mut self, expr: &Expr, then: &Stmt, otherwise: &Stmt, omit_indentation: bool) -> AnglResult<()> {
        self.indent_unless(omit_indentation);
        self.sink.print("if(");
        self.lower_expr(expr)?;
        self.sink.print(") {\n");
        self.sink.indent();
        self.lower_stmt(then, false, false)?;
        self.close_block(omit_indentation)?;
        self.sink.print(" else {\n");
        self.sink.indent();
        self.lower_stmt(otherwise, false, false)?;
        self.close_block(omit_indentation)
    }

    fn lower_case(&mut self, case: &CaseClause) -> AnglResult<()> {
        match case {
            CaseClause::Case { expr, stmts } => {
                self.sink.print_indent();
                self.sink.print("case (");
                self.lower_expr(expr)?;
                self.sink.print("):\n");
                self.sink.indent();
                self.lower_stmt(stmts, false, false)?;
                self.sink.outdent()
            }
            CaseClause::Default { stmts } => {
                self.sink.print_indent();
                self.sink.print("default:\n");
                self.sink.indent();
                self.lower_stmt(stmts, false, false)?;
                self.sink.outdent()
            }
        }
    }

    /// Inner `self` of a `with` body, declared in the construct's own scope.
    pub(crate) fn inner_self_text(&self, with_scope: crate::scope::ScopeId, stmt: &Stmt) -> AnglResult<String> {
        match self.tree.lookup_local(with_scope, "self") {
            Some(binding) => self.binding_text(binding),
            None => Err(Box::new(
                ScopeError::unresolved("self", "angl.lower.lower_stmt.inner_self_text").at(stmt.location.clone()),
            ) as Box<dyn AnglErrorExt>),
        }
    }
}
