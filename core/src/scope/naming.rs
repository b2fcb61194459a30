//! Target identifier allocation.
//!
//! Every LOCAL or ARGUMENT binding receives a target identifier that is
//! unique among the slots of its enclosing function and is never a reserved
//! word of the target language. Allocation walks scopes and bindings in a
//! fixed order, so the same tree always yields the same names.

use std::collections::HashSet;

use lazy_static::lazy_static;
use log::{debug, trace};

use super::err::ScopeError;
use super::table::{BindingId, ScopeId, ScopeTree};
use super::variable::Binding;
use crate::error::{AnglResult, ErrorKind, Level};

lazy_static! {
    /// Words the target language reserves, plus names the module envelope
    /// and runtime rely on.
    pub static ref RESERVED_WORDS: HashSet<&'static str> = [
        "break", "case", "catch", "class", "const", "continue", "debugger", "default",
        "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for",
        "function", "if", "implements", "import", "in", "instanceof", "interface", "let",
        "new", "null", "package", "private", "protected", "public", "return", "static",
        "super", "switch", "this", "throw", "true", "try", "typeof", "var", "void",
        "while", "with", "yield", "await",
        "arguments", "eval", "undefined", "NaN", "Infinity", "require", "define",
    ]
    .into_iter()
    .collect();
}

/// Fallback spelling for anonymous slots without a preferred name.
const ANONYMOUS_CANDIDATE: &str = "$tmp";

/// `candidate` if free, else the first free `candidate$N` for N = 1, 2, ...
fn unique_identifier(candidate: &str, used: &HashSet<String>) -> String {
    if !used.contains(candidate) && !RESERVED_WORDS.contains(candidate) {
        return candidate.to_string();
    }
    let mut n = 1usize;
    loop {
        let attempt = format!("{}${}", candidate, n);
        if !used.contains(&attempt) {
            return attempt;
        }
        n += 1;
    }
}

impl ScopeTree {
    /// Fix the target identifier of `binding`, starting from `candidate`.
    ///
    /// LOCAL and ARGUMENT bindings are made unique within their function
    /// scope; other storage classes take `candidate` as is. Returns the
    /// identifier that was assigned.
    pub fn assign_target_identifier(&mut self, binding: BindingId, candidate: &str) -> AnglResult<String> {
        let issuer = "angl.scope.naming.assign_target_identifier";
        let (storage, label) = match self.binding(binding) {
            Binding::Linked(linked) => {
                return Err(Box::new(ScopeError::with(
                    Level::Critical,
                    ErrorKind::IdentifierAlreadyAssigned,
                    Some(linked.identifier().to_string()),
                    format!(
                        "Linked variable \"{}\" shares its target identifier and cannot be assigned one",
                        linked.identifier()
                    ),
                    issuer.to_string(),
                    None,
                )));
            }
            Binding::Variable(var) => {
                if let Some(existing) = var.target().assigned() {
                    let label = var.identifier().unwrap_or("<anonymous>");
                    return Err(Box::new(ScopeError::with(
                        Level::Critical,
                        ErrorKind::IdentifierAlreadyAssigned,
                        var.identifier().map(str::to_string),
                        format!("Binding \"{}\" already has target identifier \"{}\"", label, existing),
                        issuer.to_string(),
                        None,
                    )));
                }
                (var.storage(), var.identifier().unwrap_or("<anonymous>").to_string())
            }
        };

        let target = if storage.is_function_slot() {
            let function_scope = self.function_scope_of(self.owner(binding));
            let chosen = unique_identifier(candidate, self.scope(function_scope).used_targets());
            self.scope_mut(function_scope).used_targets_mut().insert(chosen.clone());
            chosen
        } else {
            candidate.to_string()
        };

        trace!("assigned target identifier {} -> {}", label, target);
        if let Binding::Variable(var) = self.binding_mut(binding) {
            var.fix_target(target.clone());
        }
        Ok(target)
    }
}

/// Bindings a function scope is responsible for naming, in allocation order.
fn allocation_order(tree: &ScopeTree, function_scope: ScopeId) -> Vec<BindingId> {
    let mut ids: Vec<BindingId> = tree.scope(function_scope).bindings().to_vec();
    for block in tree.owned_block_scopes(function_scope) {
        ids.extend_from_slice(tree.scope(block).bindings());
    }
    ids
}

/// Assign target identifiers to every pending variable in the tree.
pub fn allocate_target_identifiers(tree: &mut ScopeTree) -> AnglResult<()> {
    let function_scopes: Vec<ScopeId> = tree.scopes().filter(|s| s.is_function()).map(|s| s.id()).collect();

    let mut assigned = 0usize;
    for function_scope in function_scopes {
        for id in allocation_order(tree, function_scope) {
            let candidate = match tree.binding(id) {
                Binding::Linked(_) => continue,
                Binding::Variable(var) => {
                    if !var.target().is_pending() {
                        continue;
                    }
                    if var.storage().is_function_slot() {
                        var.desired_target()
                            .or(var.identifier())
                            .unwrap_or(ANONYMOUS_CANDIDATE)
                            .to_string()
                    } else {
                        match var.identifier() {
                            Some(name) => name.to_string(),
                            None => {
                                return Err(Box::new(ScopeError::with(
                                    Level::Critical,
                                    ErrorKind::UnassignedIdentifier,
                                    None,
                                    format!(
                                        "Anonymous {} binding has no target identifier",
                                        var.storage()
                                    ),
                                    "angl.scope.naming.allocate_target_identifiers".to_string(),
                                    None,
                                )));
                            }
                        }
                    }
                }
            };
            tree.assign_target_identifier(id, &candidate)?;
            assigned += 1;
        }
    }

    debug!("allocated {} target identifiers", assigned);
    Ok(())
}
