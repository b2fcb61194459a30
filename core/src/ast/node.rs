//! file: core/src/ast/node.rs
//! description: node types of the scope-annotated tree.
//!
//! Expressions, statements and switch clauses are closed sum types, one
//! variant per node kind. Nodes that need scope information carry the
//! `ScopeId` or `BindingRef` the semantic pass attached; they are read-only
//! here. Serde field names follow the front end's document format.
//!
use serde::{Deserialize, Serialize};

use super::kind::{BinaryOperator, UnaryOperator};
use crate::location::Location;
use crate::scope::{BindingRef, ScopeId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    #[serde(flatten)]
    pub kind: ExprKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ExprKind {
    #[serde(rename = "identifier")]
    Identifier {
        name: String,
        /// Absent for pass-through names the semantic pass left unbound.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        variable: Option<BindingRef>,
    },
    #[serde(rename = "binop")]
    Binary {
        op: BinaryOperator,
        #[serde(rename = "expr1")]
        left: Box<Expr>,
        #[serde(rename = "expr2")]
        right: Box<Expr>,
    },
    #[serde(rename = "unop")]
    Unary { op: UnaryOperator, expr: Box<Expr> },
    #[serde(rename = "number")]
    Number { val: f64 },
    #[serde(rename = "string")]
    Str { val: String },
    #[serde(rename = "index")]
    Index { expr: Box<Expr>, indexes: Vec<Expr> },
    #[serde(rename = "funccall")]
    Call(Call),
    #[serde(rename = "script")]
    Closure(Function),
    #[serde(rename = "jsfunccall")]
    RawCall(RawCall),
    #[serde(rename = "jsexpr")]
    RawExpr { expr: String },
}

/// A call. Plain calls thread the caller's `self` and `other` explicitly;
/// method calls pass only `other` and let the target bind the receiver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    #[serde(rename = "expr")]
    pub callee: Box<Expr>,
    #[serde(default)]
    pub args: Vec<Expr>,
    #[serde(rename = "isMethodCall", default)]
    pub is_method_call: bool,
    /// Scope the caller's `self`/`other` are resolved from.
    pub scope: ScopeId,
}

/// Hand-written target code invoked with lowered arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCall {
    #[serde(rename = "expr")]
    pub code: String,
    #[serde(default)]
    pub args: Vec<Expr>,
}

/// Function body shared by closures, script definitions and object hooks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    #[serde(default)]
    pub args: Vec<String>,
    pub stmts: Box<Stmt>,
    pub scope: ScopeId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stmt {
    #[serde(flatten)]
    pub kind: StmtKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StmtKind {
    #[serde(rename = "var")]
    Declare { list: Vec<Declarator> },
    #[serde(rename = "assign")]
    Assign { lval: Expr, rval: Expr },
    #[serde(rename = "scriptdef")]
    FunctionDeclare {
        name: String,
        #[serde(default)]
        args: Vec<String>,
        stmts: Box<Stmt>,
        scope: ScopeId,
    },
    #[serde(rename = "const")]
    ConstantDeclare { name: String, expr: Expr },
    #[serde(rename = "switch")]
    Switch { expr: Expr, cases: Vec<CaseClause> },
    #[serde(rename = "for")]
    For {
        #[serde(rename = "initstmt")]
        init: Box<Stmt>,
        #[serde(rename = "contexpr")]
        condition: Expr,
        #[serde(rename = "stepstmt")]
        step: Box<Stmt>,
        #[serde(rename = "stmt")]
        body: Box<Stmt>,
    },
    #[serde(rename = "if")]
    If { expr: Expr, stmt: Box<Stmt> },
    #[serde(rename = "ifelse")]
    IfElse { expr: Expr, stmt1: Box<Stmt>, stmt2: Box<Stmt> },
    #[serde(rename = "while")]
    While { expr: Expr, stmt: Box<Stmt> },
    #[serde(rename = "dountil")]
    DoUntil { stmt: Box<Stmt>, expr: Expr },
    #[serde(rename = "break")]
    Break,
    #[serde(rename = "continue")]
    Continue,
    #[serde(rename = "statements")]
    Block { list: Vec<Stmt> },
    #[serde(rename = "with")]
    With(With),
    #[serde(rename = "return")]
    Return { expr: Expr },
    #[serde(rename = "exit")]
    Exit,
    #[serde(rename = "object")]
    ObjectDeclare(ObjectDecl),
    #[serde(rename = "nop")]
    Nop,
    #[serde(rename = "funccall")]
    Call(Call),
    #[serde(rename = "jsfunccall")]
    RawCall(RawCall),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Declarator {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expr: Option<Expr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable: Option<BindingRef>,
}

/// Iterate every live instance of an object kind with `self` rebound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct With {
    /// The object kind. Collecting its instances is the runtime's job; the
    /// emitted loop reads the pre-resolved collection instead.
    pub expr: Expr,
    pub stmt: Box<Stmt>,
    /// Inner scope holding the rebound `self`.
    pub scope: ScopeId,
    #[serde(rename = "indexVariable")]
    pub index_variable: BindingRef,
    #[serde(rename = "allObjectsVariable")]
    pub all_objects_variable: BindingRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectDecl {
    pub name: String,
    pub parent: String,
    #[serde(rename = "propertyinitscript")]
    pub property_init: Function,
    #[serde(rename = "createscript", default, skip_serializing_if = "Option::is_none")]
    pub create: Option<Function>,
    #[serde(rename = "destroyscript", default, skip_serializing_if = "Option::is_none")]
    pub destroy: Option<Function>,
    #[serde(default)]
    pub methods: Vec<Method>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Method {
    #[serde(rename = "methodname")]
    pub name: String,
    #[serde(flatten)]
    pub function: Function,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CaseClause {
    #[serde(rename = "case")]
    Case { expr: Expr, stmts: Stmt },
    #[serde(rename = "defaultcase")]
    Default { stmts: Stmt },
}

/// Root of a compilation unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RootNode {
    #[serde(rename = "file")]
    File(FileNode),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileNode {
    pub stmts: Vec<Stmt>,
    pub scope: ScopeId,
}

impl From<ExprKind> for Expr {
    fn from(kind: ExprKind) -> Self {
        Expr { kind, location: None }
    }
}

impl From<StmtKind> for Stmt {
    fn from(kind: StmtKind) -> Self {
        Stmt { kind, location: None }
    }
}

impl Expr {
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn ident(name: &str, variable: Option<BindingRef>) -> Self {
        ExprKind::Identifier { name: name.to_string(), variable }.into()
    }

    pub fn number(val: f64) -> Self {
        ExprKind::Number { val }.into()
    }

    pub fn string(val: &str) -> Self {
        ExprKind::Str { val: val.to_string() }.into()
    }

    pub fn binary(op: BinaryOperator, left: Expr, right: Expr) -> Self {
        ExprKind::Binary { op, left: Box::new(left), right: Box::new(right) }.into()
    }

    pub fn unary(op: UnaryOperator, expr: Expr) -> Self {
        ExprKind::Unary { op, expr: Box::new(expr) }.into()
    }

    pub fn index(expr: Expr, indexes: Vec<Expr>) -> Self {
        ExprKind::Index { expr: Box::new(expr), indexes }.into()
    }

    pub fn call(callee: Expr, args: Vec<Expr>, scope: ScopeId) -> Self {
        ExprKind::Call(Call { callee: Box::new(callee), args, is_method_call: false, scope }).into()
    }

    pub fn method_call(callee: Expr, args: Vec<Expr>, scope: ScopeId) -> Self {
        ExprKind::Call(Call { callee: Box::new(callee), args, is_method_call: true, scope }).into()
    }

    pub fn closure(function: Function) -> Self {
        ExprKind::Closure(function).into()
    }

    pub fn raw_call(code: &str, args: Vec<Expr>) -> Self {
        ExprKind::RawCall(RawCall { code: code.to_string(), args }).into()
    }

    pub fn raw(code: &str) -> Self {
        ExprKind::RawExpr { expr: code.to_string() }.into()
    }
}

impl Stmt {
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn block(list: Vec<Stmt>) -> Self {
        StmtKind::Block { list }.into()
    }

    pub fn assign(lval: Expr, rval: Expr) -> Self {
        StmtKind::Assign { lval, rval }.into()
    }

    pub fn nop() -> Self {
        StmtKind::Nop.into()
    }

    /// Short name of the node kind, as used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            StmtKind::Declare { .. } => "var",
            StmtKind::Assign { .. } => "assign",
            StmtKind::FunctionDeclare { .. } => "scriptdef",
            StmtKind::ConstantDeclare { .. } => "const",
            StmtKind::Switch { .. } => "switch",
            StmtKind::For { .. } => "for",
            StmtKind::If { .. } => "if",
            StmtKind::IfElse { .. } => "ifelse",
            StmtKind::While { .. } => "while",
            StmtKind::DoUntil { .. } => "dountil",
            StmtKind::Break => "break",
            StmtKind::Continue => "continue",
            StmtKind::Block { .. } => "statements",
            StmtKind::With(_) => "with",
            StmtKind::Return { .. } => "return",
            StmtKind::Exit => "exit",
            StmtKind::ObjectDeclare(_) => "object",
            StmtKind::Nop => "nop",
            StmtKind::Call(_) => "funccall",
            StmtKind::RawCall(_) => "jsfunccall",
        }
    }
}

impl Function {
    pub fn new(args: &[&str], body: Stmt, scope: ScopeId) -> Self {
        Function {
            args: args.iter().map(|a| a.to_string()).collect(),
            stmts: Box::new(body),
            scope,
        }
    }
}
