use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::err::ScopeError;
use super::variable::{AccessClass, Binding, StorageClass, Variable};
use crate::error::{AnglResult, ErrorKind, Level};

/// Index of a scope inside a `ScopeTree`. `ScopeId(0)` is the global scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeId(pub usize);

/// Reference to a binding as written by the front end: by name for named
/// bindings, by insertion position for anonymous ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BindingRef {
    Named { scope: ScopeId, name: String },
    Slot { scope: ScopeId, index: usize },
}

impl BindingRef {
    pub fn named(scope: ScopeId, name: &str) -> Self {
        BindingRef::Named { scope, name: name.to_string() }
    }

    pub fn slot(scope: ScopeId, index: usize) -> Self {
        BindingRef::Slot { scope, index }
    }

    pub fn scope(&self) -> ScopeId {
        match self {
            BindingRef::Named { scope, .. } | BindingRef::Slot { scope, .. } => *scope,
        }
    }
}

impl std::fmt::Display for BindingRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BindingRef::Named { scope, name } => write!(f, "{}@{}", name, scope.0),
            BindingRef::Slot { scope, index } => write!(f, "#{}@{}", index, scope.0),
        }
    }
}

/// Index of a binding inside a `ScopeTree`. Stable for the tree's lifetime,
/// even if the binding is later removed from its scope's lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Global,
    Function,
    Block,
}

#[derive(Debug, Clone)]
pub struct Scope {
    id: ScopeId,
    kind: ScopeKind,
    parent: Option<ScopeId>,
    names: HashMap<String, BindingId>,
    order: Vec<BindingId>,
    /// Target identifiers handed out in this function's namespace. Only
    /// populated on function scopes.
    used_targets: HashSet<String>,
}

impl Scope {
    pub fn id(&self) -> ScopeId {
        self.id
    }

    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    /// Bindings still visible in this scope, in insertion order.
    pub fn bindings(&self) -> &[BindingId] {
        &self.order
    }

    pub fn is_function(&self) -> bool {
        matches!(self.kind, ScopeKind::Function | ScopeKind::Global)
    }

    pub(crate) fn used_targets(&self) -> &HashSet<String> {
        &self.used_targets
    }

    pub(crate) fn used_targets_mut(&mut self) -> &mut HashSet<String> {
        &mut self.used_targets
    }
}

#[derive(Debug, Clone)]
struct Slot {
    owner: ScopeId,
    binding: Binding,
}

/// Arena of scopes and bindings for one compilation unit.
///
/// Scopes form parent chains rooted at the global scope. Bindings are owned
/// by the arena; linked aliases refer to their target by `BindingId`.
#[derive(Debug, Clone)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
    slots: Vec<Slot>,
}

impl ScopeTree {
    pub const GLOBAL: ScopeId = ScopeId(0);

    /// Create a tree holding only an empty global scope.
    pub fn new() -> Self {
        ScopeTree {
            scopes: vec![Scope {
                id: Self::GLOBAL,
                kind: ScopeKind::Global,
                parent: None,
                names: HashMap::new(),
                order: Vec::new(),
                used_targets: HashSet::new(),
            }],
            slots: Vec::new(),
        }
    }

    /// ------- Scope Helpers -------

    pub fn push_scope(&mut self, parent: ScopeId, kind: ScopeKind) -> AnglResult<ScopeId> {
        if kind == ScopeKind::Global {
            return Err(Box::new(ScopeError::with(
                Level::Critical,
                ErrorKind::MalformedInput,
                None,
                "Only the root scope may be global".to_string(),
                "angl.scope.table.push_scope".to_string(),
                None,
            )));
        }
        if !self.contains_scope(parent) {
            return Err(Box::new(ScopeError::with(
                Level::Critical,
                ErrorKind::MalformedInput,
                None,
                format!("Parent scope {} does not exist", parent.0),
                "angl.scope.table.push_scope".to_string(),
                None,
            )));
        }
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope {
            id,
            kind,
            parent: Some(parent),
            names: HashMap::new(),
            order: Vec::new(),
            used_targets: HashSet::new(),
        });
        Ok(id)
    }

    pub fn contains_scope(&self, id: ScopeId) -> bool {
        id.0 < self.scopes.len()
    }

    pub fn contains_binding(&self, id: BindingId) -> bool {
        id.0 < self.slots.len()
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    pub(crate) fn scope_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.0]
    }

    pub fn scopes(&self) -> impl Iterator<Item = &Scope> {
        self.scopes.iter()
    }

    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    /// Nearest function (or global) scope enclosing `scope`, itself included.
    pub fn function_scope_of(&self, scope: ScopeId) -> ScopeId {
        let mut current = scope;
        loop {
            let s = self.scope(current);
            if s.is_function() {
                return current;
            }
            match s.parent {
                Some(parent) => current = parent,
                None => return current,
            }
        }
    }

    /// ------- Binding Helpers -------

    /// Insert a binding into `scope`. Shadowing an outer scope is fine; a
    /// second binding with the same identifier in the same scope is not.
    pub fn add(&mut self, scope: ScopeId, binding: impl Into<Binding>) -> AnglResult<BindingId> {
        let binding = binding.into();
        if let Binding::Linked(linked) = &binding {
            if !self.contains_binding(linked.link()) {
                return Err(Box::new(ScopeError::with(
                    Level::Critical,
                    ErrorKind::MalformedInput,
                    Some(linked.identifier().to_string()),
                    format!("Linked variable \"{}\" points at a missing binding", linked.identifier()),
                    "angl.scope.table.add".to_string(),
                    None,
                )));
            }
        }
        if let Some(name) = binding.identifier() {
            if self.scope(scope).names.contains_key(name) {
                return Err(Box::new(ScopeError::redeclared(name, "angl.scope.table.add")));
            }
        }

        let id = BindingId(self.slots.len());
        if let Binding::Variable(var) = &binding {
            if var.storage().is_function_slot() {
                if let Some(target) = var.target().assigned() {
                    let function_scope = self.function_scope_of(scope);
                    self.scope_mut(function_scope).used_targets.insert(target.to_string());
                }
            }
        }
        let s = self.scope_mut(scope);
        if let Some(name) = binding.identifier() {
            s.names.insert(name.to_string(), id);
        }
        s.order.push(id);
        self.slots.push(Slot { owner: scope, binding });
        Ok(id)
    }

    /// Binding named `identifier` in this scope only.
    pub fn lookup_local(&self, scope: ScopeId, identifier: &str) -> Option<BindingId> {
        self.scope(scope).names.get(identifier).copied()
    }

    /// Walk outward from `scope`; the first scope defining `identifier` wins.
    pub fn lookup_chain(&self, scope: ScopeId, identifier: &str) -> AnglResult<BindingId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let s = self.scope(id);
            if let Some(binding) = s.names.get(identifier) {
                return Ok(*binding);
            }
            current = s.parent;
        }
        Err(Box::new(ScopeError::unresolved(identifier, "angl.scope.table.lookup_chain")))
    }

    /// Retract a named binding from `scope`. The binding itself stays in the
    /// arena so existing references and links keep working.
    pub fn remove(&mut self, scope: ScopeId, identifier: &str) -> Option<BindingId> {
        let s = self.scope_mut(scope);
        let removed = s.names.remove(identifier)?;
        s.order.retain(|id| *id != removed);
        Some(removed)
    }

    /// Every LOCAL binding of this scope, in insertion order.
    pub fn local_bindings(&self, scope: ScopeId) -> Vec<BindingId> {
        self.scope(scope)
            .order
            .iter()
            .copied()
            .filter(|id| self.binding(*id).storage() == StorageClass::Local)
            .collect()
    }

    /// Block scopes whose nearest enclosing function scope is `function_scope`.
    pub fn owned_block_scopes(&self, function_scope: ScopeId) -> Vec<ScopeId> {
        self.scopes
            .iter()
            .filter(|s| !s.is_function() && self.function_scope_of(s.id) == function_scope)
            .map(|s| s.id)
            .collect()
    }

    /// Local bindings of a function scope followed by those of the block
    /// scopes it owns. The target `var` is function-wide, so block locals are
    /// declared together with the function's own.
    pub fn hoisted_local_bindings(&self, function_scope: ScopeId) -> Vec<BindingId> {
        let mut locals = self.local_bindings(function_scope);
        for block in self.owned_block_scopes(function_scope) {
            locals.extend(self.local_bindings(block));
        }
        locals
    }

    /// Find the binding a front-end reference points at, in its own scope.
    pub fn resolve_ref(&self, reference: &BindingRef) -> AnglResult<BindingId> {
        let issuer = "angl.scope.table.resolve_ref";
        if !self.contains_scope(reference.scope()) {
            return Err(Box::new(ScopeError::with(
                Level::Critical,
                ErrorKind::MalformedInput,
                None,
                format!("Binding reference {} names a missing scope", reference),
                issuer.to_string(),
                None,
            )));
        }
        let found = match reference {
            BindingRef::Named { scope, name } => self.lookup_local(*scope, name),
            BindingRef::Slot { scope, index } => self.scope(*scope).order.get(*index).copied(),
        };
        found.ok_or_else(|| {
            let label = reference.to_string();
            Box::new(ScopeError::unresolved(&label, issuer)) as Box<dyn crate::error::AnglErrorExt>
        })
    }

    pub fn binding(&self, id: BindingId) -> &Binding {
        &self.slots[id.0].binding
    }

    pub(crate) fn binding_mut(&mut self, id: BindingId) -> &mut Binding {
        &mut self.slots[id.0].binding
    }

    /// Scope the binding was added to.
    pub fn owner(&self, id: BindingId) -> ScopeId {
        self.slots[id.0].owner
    }

    pub fn binding_count(&self) -> usize {
        self.slots.len()
    }

    /// Follow links until the binding that owns the storage slot.
    pub fn resolve(&self, id: BindingId) -> BindingId {
        let mut current = id;
        while let Binding::Linked(linked) = self.binding(current) {
            current = linked.link();
        }
        current
    }

    pub fn variable(&self, id: BindingId) -> &Variable {
        match self.binding(self.resolve(id)) {
            Binding::Variable(var) => var,
            // `resolve` only stops on variables
            Binding::Linked(_) => unreachable!("link chain ended on a link"),
        }
    }

    /// Source identifier of the entry itself (an alias keeps its own name).
    pub fn identifier(&self, id: BindingId) -> Option<&str> {
        self.binding(id).identifier()
    }

    pub fn storage_class(&self, id: BindingId) -> StorageClass {
        self.binding(id).storage()
    }

    pub fn access_class(&self, id: BindingId) -> AccessClass {
        self.variable(id).access()
    }

    pub fn container(&self, id: BindingId) -> Option<&str> {
        self.variable(id).container()
    }

    /// Target identifier of the binding, read through any link.
    pub fn target_identifier(&self, id: BindingId) -> AnglResult<&str> {
        self.variable(id).target().assigned().ok_or_else(|| {
            let name = self.identifier(id).unwrap_or("<anonymous>").to_string();
            Box::new(ScopeError::with(
                Level::Critical,
                ErrorKind::UnassignedIdentifier,
                Some(name.clone()),
                format!("Binding \"{}\" was read before its target identifier was assigned", name),
                "angl.scope.table.target_identifier".to_string(),
                None,
            )) as Box<dyn crate::error::AnglErrorExt>
        })
    }
}

impl Default for ScopeTree {
    fn default() -> Self {
        ScopeTree::new()
    }
}
