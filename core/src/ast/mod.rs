//! The scope-annotated tree consumed by the lowering engine, and the
//! boundary that loads it from the front end's JSON document.

pub mod err;
pub mod input;
pub mod kind;
pub mod node;

pub use err::InputError;
pub use input::{BindingDecl, ScopeDecl, ScopeDeclKind, TreeDocument, attach_document_scopes, validate_tree};
pub use kind::{BinaryOperator, UnaryOperator};
pub use node::{
    Call, CaseClause, Declarator, Expr, ExprKind, FileNode, Function, Method, ObjectDecl, RawCall, RootNode, Stmt,
    StmtKind, With,
};
