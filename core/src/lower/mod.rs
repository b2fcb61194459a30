//! file: core/src/lower/mod.rs
//! description: tree -> target text lowering.
//!
//! Entry point is `lower_file`, which wraps a compilation unit in the
//! module-loader envelope and delegates to the per-node rules. Lowering
//! only reads the scope tree; every target identifier must have been
//! assigned before it starts.
//!
pub mod err;
pub mod locals;
pub mod lower_expr;
pub mod lower_objects;
pub mod lower_stmt;
pub mod lowering_context;
pub mod text_sink;

pub use err::LowerError;
pub use lower_expr::{format_number, quote_string};
pub use lowering_context::LoweringContext;
pub use text_sink::TextSink;

use log::debug;

use crate::ast::FileNode;
use crate::config::CompileOptions;
use crate::error::AnglResult;
use crate::scope::ScopeTree;

/// Print a whole file: `define(function(require) { ... });` around the
/// strict-mode directive, the two runtime imports, the file's locals and
/// its statements.
pub fn lower_file(file: &FileNode, tree: &ScopeTree, options: &CompileOptions) -> AnglResult<String> {
    let runtime = &options.runtime;
    let mut ctx = LoweringContext::new(tree, runtime, &options.indent);

    ctx.sink.print("define(function(require) {\n");
    ctx.sink.indent();
    ctx.line("\"use strict\";");
    ctx.line(&format!(
        "var {} = require({});",
        runtime.globals_identifier,
        quote_string(&runtime.globals_module)
    ));
    ctx.line(&format!(
        "var {} = require({});",
        runtime.runtime_identifier,
        quote_string(&runtime.runtime_module)
    ));
    ctx.lower_local_allocation(file.scope)?;
    for stmt in file.stmts.iter() {
        ctx.lower_stmt(stmt, false, false)?;
    }
    ctx.sink.outdent()?;
    ctx.sink.print("});");

    let out = ctx.finish();
    debug!("lowered {} statements into {} bytes", file.stmts.len(), out.len());
    Ok(out)
}
