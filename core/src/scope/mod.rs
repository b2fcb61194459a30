//! Scope and variable model: bindings, scope chains, the global scope and
//! target identifier allocation.

mod err;
mod global;
mod naming;
mod table;
mod variable;

pub use err::ScopeError;
pub use global::{GlobalRegistry, create_global_scope};
pub use naming::{RESERVED_WORDS, allocate_target_identifiers};
pub use table::{BindingId, BindingRef, Scope, ScopeId, ScopeKind, ScopeTree};
pub use variable::{AccessClass, Binding, LinkedVariable, StorageClass, TargetIdent, Variable};
