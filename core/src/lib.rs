pub mod ast;
pub mod config;
pub mod error;
pub mod location;
pub mod lower;
pub mod scope;
pub mod script;

use log::debug;

pub use ast::TreeDocument;
pub use config::{CompileOptions, RuntimeContract};
pub use error::{AnglErrorExt, AnglResult, ErrorKind, Level};
pub use location::{Location, Span};
pub use lower::lower_file;
pub use scope::{GlobalRegistry, ScopeTree, allocate_target_identifiers, create_global_scope};
pub use script::Script;

pub fn generate_error_report(error: &dyn AnglErrorExt) -> String {
    let location = match error.location() {
        Some(loc) => loc.to_string(),
        None => "unknown location".to_string(),
    };
    format!("ANGL | {} | {} | {} | {}", error.level(), error.kind(), location, error.message())
}

/// Build the finished scope tree for a document: global scope from the
/// registry and extras, the document's scopes below it, every reference
/// checked, every target identifier assigned.
pub fn build_scope_tree(
    doc: &TreeDocument,
    registry: &GlobalRegistry,
    options: &CompileOptions,
) -> AnglResult<ScopeTree> {
    let mut tree = create_global_scope(registry, &options.extra_globals, &options.runtime.globals_identifier)?;
    debug!("global scope holds {} bindings", tree.scope(ScopeTree::GLOBAL).bindings().len());
    ast::attach_document_scopes(&mut tree, &doc.scopes)?;
    ast::validate_tree(&doc.root, &tree)?;
    allocate_target_identifiers(&mut tree)?;
    Ok(tree)
}

pub fn compile_document(doc: &TreeDocument, registry: &GlobalRegistry, options: &CompileOptions) -> AnglResult<String> {
    let tree = build_scope_tree(doc, registry, options)?;
    lower_file(doc.file(), &tree, options)
}

pub fn compile_source(raw: &str, registry: &GlobalRegistry, options: &CompileOptions) -> AnglResult<String> {
    let doc = TreeDocument::from_json_str(raw, "<input>")?;
    compile_document(&doc, registry, options)
}

pub fn compile_script(script: &Script, registry: &GlobalRegistry, options: &CompileOptions) -> AnglResult<String> {
    debug!("compiling {}", script);
    let doc = script.parse_document()?;
    compile_document(&doc, registry, options)
}
