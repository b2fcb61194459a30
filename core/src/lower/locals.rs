use log::trace;

use super::lowering_context::LoweringContext;
use crate::error::AnglResult;
use crate::scope::ScopeId;

impl LoweringContext<'_> {
    /// Declare every LOCAL binding of a function scope (block scopes it owns
    /// included) in one `var` line. Prints nothing when there are none.
    pub fn lower_local_allocation(&mut self, scope: ScopeId) -> AnglResult<()> {
        let function_scope = self.tree.function_scope_of(scope);
        let locals = self.tree.hoisted_local_bindings(function_scope);
        if locals.is_empty() {
            return Ok(());
        }
        let mut targets = Vec::with_capacity(locals.len());
        for binding in locals {
            targets.push(self.tree.target_identifier(binding)?.to_string());
        }
        trace!("declaring {} locals for scope {}", targets.len(), function_scope.0);
        self.sink.print_indent();
        self.sink.print(&format!("var {};\n", targets.join(", ")));
        Ok(())
    }
}
