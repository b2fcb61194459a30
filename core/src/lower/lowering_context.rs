//! file: core/src/lower/lowering_context.rs
//! description: shared state threaded through every lowering rule.
//!
//! `LoweringContext` borrows the finished scope tree and the runtime
//! contract and owns the text sink the rules print into. The rules
//! themselves live in `lower_expr`, `lower_stmt`, `lower_objects` and
//! `locals` as further `impl` blocks on this type.
//!
use super::text_sink::TextSink;
use crate::config::RuntimeContract;
use crate::error::{AnglErrorExt, AnglResult};
use crate::location::Location;
use crate::scope::{AccessClass, BindingId, ScopeError, ScopeId, ScopeTree};

pub struct LoweringContext<'a> {
    pub tree: &'a ScopeTree,
    pub runtime: &'a RuntimeContract,
    pub sink: TextSink,
}

impl<'a> LoweringContext<'a> {
    pub fn new(tree: &'a ScopeTree, runtime: &'a RuntimeContract, indent_unit: &str) -> Self {
        LoweringContext { tree, runtime, sink: TextSink::new(indent_unit) }
    }

    pub fn finish(self) -> String {
        self.sink.finish()
    }

    /// Target text for a read or write of `binding`: `container.target` for
    /// member access, the bare target otherwise.
    pub fn binding_text(&self, binding: BindingId) -> AnglResult<String> {
        let target = self.tree.target_identifier(binding)?;
        match (self.tree.access_class(binding), self.tree.container(binding)) {
            (AccessClass::Member, Some(container)) => Ok(format!("{}.{}", container, target)),
            _ => Ok(target.to_string()),
        }
    }

    /// Resolve `name` outward from `scope`, tagging a miss with `location`.
    pub fn resolve_in_chain(&self, scope: ScopeId, name: &str, location: Option<&Location>) -> AnglResult<BindingId> {
        self.tree.lookup_chain(scope, name).map_err(|_| {
            Box::new(ScopeError::unresolved(name, "angl.lower.lowering_context.resolve_in_chain").at(location.cloned()))
                as Box<dyn AnglErrorExt>
        })
    }

    /// Target identifier of the binding `name` declares in `scope`, or the
    /// source name when the scope has no such binding.
    pub fn local_target_or_name(&self, scope: ScopeId, name: &str) -> AnglResult<String> {
        match self.tree.lookup_local(scope, name) {
            Some(binding) => Ok(self.tree.target_identifier(binding)?.to_string()),
            None => Ok(name.to_string()),
        }
    }

    /// Print indentation, `text`, and a newline.
    pub fn line(&mut self, text: &str) {
        self.sink.print_indent();
        self.sink.print(text);
        self.sink.print("\n");
    }
}
