/// cli/src/output.rs
/// Output utilities for the CLI
/// description: styled status lines, the build progress bar and the scope
/// table printed by `--dump scopes`.

use angl_core::scope::{Binding, ScopeTree};
use angl_core::{AnglErrorExt, generate_error_report};
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

/// ====================================================================
/// Styles

pub struct FormatStyle {
    pub error: Style,
    pub success: Style,
}

impl Default for FormatStyle {
    fn default() -> Self {
        FormatStyle {
            error: Style::new().red().bold(),
            success: Style::new().green().bold(),
        }
    }
}

/// Status reporter. Everything goes to stderr; stdout carries generated
/// code and dumps only.
#[derive(Default)]
pub struct Reporter {
    formatting: FormatStyle,
}

impl Reporter {
    pub fn new() -> Self {
        Reporter::default()
    }

    pub fn success(&self, text: &str) {
        eprintln!("{}", self.formatting.success.apply_to(text));
    }

    /// One failed compilation unit.
    pub fn failure(&self, unit: &str, error: &dyn AnglErrorExt) {
        eprintln!("{} {}", self.formatting.error.apply_to(format!("error[{}]:", unit)), generate_error_report(error));
    }

    pub fn error(&self, text: &str) {
        eprintln!("{} {}", self.formatting.error.apply_to("error:"), text);
    }
}

/// ====================================================================
/// Progress bar

/// Bar for a multi-unit build. Hidden automatically when stderr is not a
/// terminal.
pub fn build_progress(total: usize) -> ProgressBar {
    let bar = ProgressBar::new(total as u64);
    let style = ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
    bar.set_style(style);
    bar
}

/// ====================================================================
/// Scope table

/// Every non-global scope and its bindings after identifier allocation.
/// The global scope is summarized in one row.
pub fn scope_table(tree: &ScopeTree) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Scope", "Kind", "Parent", "Identifier", "Storage", "Access", "Target"]);

    let global = tree.scope(ScopeTree::GLOBAL);
    table.add_row(vec![
        "0".to_string(),
        "Global".to_string(),
        "-".to_string(),
        format!("({} names)", global.bindings().len()),
        "NAMESPACED".to_string(),
        "MEMBER".to_string(),
        "-".to_string(),
    ]);

    for scope in tree.scopes().skip(1) {
        let parent = scope.parent().map(|p| p.0.to_string()).unwrap_or_else(|| "-".to_string());
        if scope.bindings().is_empty() {
            table.add_row(vec![
                scope.id().0.to_string(),
                format!("{:?}", scope.kind()),
                parent,
                String::new(),
                String::new(),
                String::new(),
                String::new(),
            ]);
            continue;
        }
        for binding in scope.bindings().iter().copied() {
            let identifier = tree.identifier(binding).unwrap_or("<anonymous>").to_string();
            let target = tree.variable(binding).target().assigned().unwrap_or("?").to_string();
            let target = match tree.binding(binding) {
                Binding::Linked(_) => format!("-> {}", target),
                Binding::Variable(_) => target,
            };
            table.add_row(vec![
                scope.id().0.to_string(),
                format!("{:?}", scope.kind()),
                parent.clone(),
                identifier,
                tree.storage_class(binding).to_string(),
                tree.access_class(binding).to_string(),
                target,
            ]);
        }
    }
    table
}
