//! file: core/src/ast/input.rs
//! description: loading and validating the annotated tree document.
//!
//! This is the one place where the front end's output is checked. The
//! document is deserialized into the closed node enums (an unknown tag fails
//! here), its scopes are attached below the global scope, and every scope id
//! and binding reference in the tree is checked to exist. Past this point
//! lowering can trust the tree's shape.
//!
use log::debug;
use serde::{Deserialize, Serialize};

use super::err::InputError;
use super::node::{CaseClause, Expr, ExprKind, Function, RootNode, Stmt, StmtKind};
use crate::error::{AnglResult, ErrorKind};
use crate::location::Location;
use crate::scope::{BindingRef, LinkedVariable, ScopeId, ScopeKind, ScopeTree, Variable};

/// The front end's output: scopes (ids `1..=n`, `0` being the global
/// scope) and the root node that references them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeDocument {
    #[serde(default)]
    pub scopes: Vec<ScopeDecl>,
    pub root: RootNode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopeDecl {
    pub parent: ScopeId,
    #[serde(default)]
    pub kind: ScopeDeclKind,
    #[serde(default)]
    pub bindings: Vec<BindingDecl>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeDeclKind {
    #[default]
    Function,
    Block,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BindingDecl {
    Linked {
        identifier: String,
        link: BindingRef,
    },
    Variable {
        #[serde(default)]
        identifier: Option<String>,
        #[serde(default = "default_storage")]
        storage: String,
        #[serde(default = "default_access")]
        access: String,
        #[serde(default)]
        target: Option<String>,
        #[serde(default)]
        desired: Option<String>,
        #[serde(default)]
        container: Option<String>,
    },
}

fn default_storage() -> String {
    "LOCAL".to_string()
}

fn default_access() -> String {
    "BARE".to_string()
}

impl TreeDocument {
    /// Parse a document. `file` names the source in diagnostics.
    pub fn from_json_str(raw: &str, file: &str) -> AnglResult<TreeDocument> {
        serde_json::from_str(raw)
            .map_err(|e| Box::new(InputError::from_serde(&e, file)) as Box<dyn crate::error::AnglErrorExt>)
    }

    pub fn file(&self) -> &super::node::FileNode {
        match &self.root {
            RootNode::File(file) => file,
        }
    }
}

fn malformed(message: String, issuer: &str, location: Option<Location>) -> Box<dyn crate::error::AnglErrorExt> {
    Box::new(InputError::new(ErrorKind::MalformedInput, message, issuer, location))
}

/// Append the document's scopes and bindings to `tree`, which must hold only
/// the global scope.
pub fn attach_document_scopes(tree: &mut ScopeTree, scopes: &[ScopeDecl]) -> AnglResult<()> {
    let issuer = "angl.ast.input.attach_document_scopes";
    if tree.scope_count() != 1 {
        return Err(malformed(
            "Document scopes must be attached directly below a fresh global scope".to_string(),
            issuer,
            None,
        ));
    }

    for (i, decl) in scopes.iter().enumerate() {
        let expected = ScopeId(i + 1);
        if decl.parent >= expected {
            return Err(malformed(
                format!("Scope {} names parent {}, which is not declared before it", expected.0, decl.parent.0),
                issuer,
                None,
            ));
        }
        let kind = match decl.kind {
            ScopeDeclKind::Function => ScopeKind::Function,
            ScopeDeclKind::Block => ScopeKind::Block,
        };
        let id = tree.push_scope(decl.parent, kind)?;

        for binding in decl.bindings.iter() {
            match binding {
                BindingDecl::Linked { identifier, link } => {
                    let target = tree.resolve_ref(link)?;
                    tree.add(id, LinkedVariable::new(identifier, target))?;
                }
                BindingDecl::Variable { identifier, storage, access, target, desired, container } => {
                    let mut var = Variable::parse(identifier.clone(), storage, access)?;
                    let member = var.access() == crate::scope::AccessClass::Member;
                    match (member, container) {
                        (true, Some(c)) => var = var.with_container(c),
                        (false, None) => {}
                        (true, None) => {
                            return Err(malformed(
                                format!(
                                    "Member binding \"{}\" in scope {} has no container",
                                    identifier.as_deref().unwrap_or("<anonymous>"),
                                    id.0
                                ),
                                issuer,
                                None,
                            ));
                        }
                        (false, Some(_)) => {
                            return Err(malformed(
                                format!(
                                    "Direct binding \"{}\" in scope {} must not name a container",
                                    identifier.as_deref().unwrap_or("<anonymous>"),
                                    id.0
                                ),
                                issuer,
                                None,
                            ));
                        }
                    }
                    if let Some(t) = target {
                        var = var.with_target(t);
                    } else if let Some(d) = desired {
                        var = var.with_desired_target(d);
                    }
                    tree.add(id, var)?;
                }
            }
        }
    }

    debug!("attached {} document scopes", scopes.len());
    Ok(())
}

/// Check that every scope id and binding reference in the tree exists.
pub fn validate_tree(root: &RootNode, tree: &ScopeTree) -> AnglResult<()> {
    let RootNode::File(file) = root;
    check_scope(tree, file.scope, None)?;
    for stmt in file.stmts.iter() {
        validate_stmt(stmt, tree)?;
    }
    Ok(())
}

fn check_scope(tree: &ScopeTree, scope: ScopeId, location: Option<&Location>) -> AnglResult<()> {
    if tree.contains_scope(scope) {
        Ok(())
    } else {
        Err(malformed(
            format!("Node references scope {}, which does not exist", scope.0),
            "angl.ast.input.check_scope",
            location.cloned(),
        ))
    }
}

fn check_ref(tree: &ScopeTree, reference: &BindingRef, location: Option<&Location>) -> AnglResult<()> {
    tree.resolve_ref(reference).map(|_| ()).map_err(|_| {
        malformed(
            format!("Node references binding {}, which does not exist", reference),
            "angl.ast.input.check_ref",
            location.cloned(),
        )
    })
}

fn validate_function(function: &Function, tree: &ScopeTree, location: Option<&Location>) -> AnglResult<()> {
    check_scope(tree, function.scope, location)?;
    validate_stmt(&function.stmts, tree)
}

fn validate_expr(expr: &Expr, tree: &ScopeTree) -> AnglResult<()> {
    let loc = expr.location.as_ref();
    match &expr.kind {
        ExprKind::Identifier { variable, .. } => {
            if let Some(reference) = variable {
                check_ref(tree, reference, loc)?;
            }
        }
        ExprKind::Binary { left, right, .. } => {
            validate_expr(left, tree)?;
            validate_expr(right, tree)?;
        }
        ExprKind::Unary { expr, .. } => validate_expr(expr, tree)?,
        ExprKind::Number { .. } | ExprKind::Str { .. } | ExprKind::RawExpr { .. } => {}
        ExprKind::Index { expr, indexes } => {
            validate_expr(expr, tree)?;
            for index in indexes.iter() {
                validate_expr(index, tree)?;
            }
        }
        ExprKind::Call(call) => {
            check_scope(tree, call.scope, loc)?;
            validate_expr(&call.callee, tree)?;
            for arg in call.args.iter() {
                validate_expr(arg, tree)?;
            }
        }
        ExprKind::Closure(function) => validate_function(function, tree, loc)?,
        ExprKind::RawCall(raw) => {
            for arg in raw.args.iter() {
                validate_expr(arg, tree)?;
            }
        }
    }
    Ok(())
}

fn validate_stmt(stmt: &Stmt, tree: &ScopeTree) -> AnglResult<()> {
    let loc = stmt.location.as_ref();
    match &stmt.kind {
        StmtKind::Declare { list } => {
            for decl in list.iter() {
                if let Some(reference) = &decl.variable {
                    check_ref(tree, reference, loc)?;
                }
                if let Some(expr) = &decl.expr {
                    validate_expr(expr, tree)?;
                }
            }
        }
        StmtKind::Assign { lval, rval } => {
            validate_expr(lval, tree)?;
            validate_expr(rval, tree)?;
        }
        StmtKind::FunctionDeclare { stmts, scope, .. } => {
            check_scope(tree, *scope, loc)?;
            validate_stmt(stmts, tree)?;
        }
        StmtKind::ConstantDeclare { expr, .. } | StmtKind::Return { expr } => validate_expr(expr, tree)?,
        StmtKind::Switch { expr, cases } => {
            validate_expr(expr, tree)?;
            for case in cases.iter() {
                match case {
                    CaseClause::Case { expr, stmts } => {
                        validate_expr(expr, tree)?;
                        validate_stmt(stmts, tree)?;
                    }
                    CaseClause::Default { stmts } => validate_stmt(stmts, tree)?,
                }
            }
        }
        StmtKind::For { init, condition, step, body } => {
            validate_stmt(init, tree)?;
            validate_expr(condition, tree)?;
            validate_stmt(step, tree)?;
            validate_stmt(body, tree)?;
        }
        StmtKind::If { expr, stmt } | StmtKind::While { expr, stmt } | StmtKind::DoUntil { stmt, expr } => {
            validate_expr(expr, tree)?;
            validate_stmt(stmt, tree)?;
        }
        StmtKind::IfElse { expr, stmt1, stmt2 } => {
            validate_expr(expr, tree)?;
            validate_stmt(stmt1, tree)?;
            validate_stmt(stmt2, tree)?;
        }
        StmtKind::Break | StmtKind::Continue | StmtKind::Exit | StmtKind::Nop => {}
        StmtKind::Block { list } => {
            for s in list.iter() {
                validate_stmt(s, tree)?;
            }
        }
        StmtKind::With(with) => {
            check_scope(tree, with.scope, loc)?;
            check_ref(tree, &with.index_variable, loc)?;
            check_ref(tree, &with.all_objects_variable, loc)?;
            validate_expr(&with.expr, tree)?;
            validate_stmt(&with.stmt, tree)?;
        }
        StmtKind::ObjectDeclare(object) => {
            validate_function(&object.property_init, tree, loc)?;
            if let Some(create) = &object.create {
                validate_function(create, tree, loc)?;
            }
            if let Some(destroy) = &object.destroy {
                validate_function(destroy, tree, loc)?;
            }
            for method in object.methods.iter() {
                validate_function(&method.function, tree, loc)?;
            }
        }
        StmtKind::Call(call) => {
            check_scope(tree, call.scope, loc)?;
            validate_expr(&call.callee, tree)?;
            for arg in call.args.iter() {
                validate_expr(arg, tree)?;
            }
        }
        StmtKind::RawCall(raw) => {
            for arg in raw.args.iter() {
                validate_expr(arg, tree)?;
            }
        }
    }
    Ok(())
}
