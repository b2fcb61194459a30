//! file: core/src/lower/lower_objects.rs
//! description: object declarations and the `with` construct.
//!
//! An object declaration becomes a single call into the runtime that
//! receives a setup closure; the runtime runs setups parent-first. The
//! setup prints, in order: constructor, inheritance link, property
//! initializer, the optional create and destroy hooks, then each method.
//!
use log::debug;

use super::lowering_context::LoweringContext;
use crate::ast::{Function, ObjectDecl, Stmt, With};
use crate::error::AnglResult;

impl LoweringContext<'_> {
    pub(crate) fn lower_object(&mut self, object: &ObjectDecl, omit_indentation: bool) -> AnglResult<()> {
        debug!("lowering object {} (parent {})", object.name, object.parent);
        let globals = self.runtime.globals_identifier.clone();
        let runtime = self.runtime.runtime_identifier.clone();
        let object_expr = format!("{}.{}", globals, object.name);
        let proto_expr = format!("{}.prototype", object_expr);
        let parent_expr = format!("{}.{}", globals, object.parent);

        self.indent_unless(omit_indentation);
        self.sink.print(&format!(
            "{}.{}({}, {}, function() {{\n",
            runtime,
            self.runtime.create_object,
            super::lower_expr::quote_string(&object.name),
            super::lower_expr::quote_string(&object.parent),
        ));
        self.sink.indent();

        self.indent_unless(omit_indentation);
        self.sink.print(&format!(
            "{} = function() {{ {}.apply(this, arguments); }};\n",
            object_expr, parent_expr
        ));
        self.indent_unless(omit_indentation);
        self.sink.print(&format!("{}.{}({}, {});\n", runtime, self.runtime.inherit, object_expr, parent_expr));

        let init = self.runtime.init_properties_method.clone();
        self.lower_member_function(&proto_expr, &init, &object.property_init, omit_indentation)?;
        if let Some(create) = &object.create {
            let name = self.runtime.create_method.clone();
            self.lower_member_function(&proto_expr, &name, create, omit_indentation)?;
        }
        if let Some(destroy) = &object.destroy {
            let name = self.runtime.destroy_method.clone();
            self.lower_member_function(&proto_expr, &name, destroy, omit_indentation)?;
        }
        for method in object.methods.iter() {
            self.lower_member_function(&proto_expr, &method.name, &method.function, omit_indentation)?;
        }

        self.sink.outdent()?;
        self.indent_unless(omit_indentation);
        self.sink.print("})");
        Ok(())
    }

    fn lower_member_function(
        &mut self,
        proto_expr: &str,
        name: &str,
        function: &Function,
        omit_indentation: bool,
    ) -> AnglResult<()> {
        self.indent_unless(omit_indentation);
        self.sink.print(&format!("{}.{} = ", proto_expr, name));
        self.lower_closure(function)?;
        self.sink.print(";\n");
        Ok(())
    }

    /// Counted loop over the pre-resolved instance collection, rebinding the
    /// inner `self` each iteration. `break` leaves the whole loop and
    /// `continue` moves on to the next instance.
    pub(crate) fn lower_with(&mut self, with: &With, stmt: &Stmt, omit_indentation: bool) -> AnglResult<()> {
        let index = self.tree.resolve_ref(&with.index_variable)?;
        let index = self.binding_text(index)?;
        let all = self.tree.resolve_ref(&with.all_objects_variable)?;
        let all = self.binding_text(all)?;
        let inner_self = self.inner_self_text(with.scope, stmt)?;

        self.indent_unless(omit_indentation);
        self.sink.print(&format!("for({i} = 0; {i} < {all}.length; {i}++) {{\n", i = index, all = all));
        self.sink.indent();
        self.indent_unless(omit_indentation);
        self.sink.print(&format!("{} = {}[{}];\n", inner_self, all, index));
        self.lower_stmt(&with.stmt, false, false)?;
        self.close_block(omit_indentation)
    }
}
