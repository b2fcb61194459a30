//! file: core/src/scope/global.rs
//! description: global name registry and the root scope built from it.
//!
//! The registry is a read-only value handed to each compilation. The
//! built-in one is parsed once from the runtime's name list embedded in the
//! crate.

use std::collections::BTreeMap;
use std::path::Path;

use lazy_static::lazy_static;
use log::debug;

use super::table::ScopeTree;
use super::variable::Variable;
use crate::config::ConfigError;
use crate::error::{AnglResult, ErrorKind};

const BUILTIN_GLOBALS: &str = include_str!("../../runtime/globals.json");

lazy_static! {
    static ref BUILTIN_REGISTRY: GlobalRegistry =
        // embedded at build time; a parse failure is a packaging bug
        GlobalRegistry::from_json_str(BUILTIN_GLOBALS).expect("runtime/globals.json must be a JSON object");
}

/// Global name -> opaque descriptor supplied by the runtime. Names iterate
/// in sorted order so every compilation sees them the same way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlobalRegistry {
    entries: BTreeMap<String, serde_json::Value>,
}

impl GlobalRegistry {
    pub fn new() -> Self {
        GlobalRegistry::default()
    }

    /// The registry shipped with the runtime support library.
    pub fn builtin() -> &'static GlobalRegistry {
        &BUILTIN_REGISTRY
    }

    /// Parse a JSON object of `name: descriptor` pairs.
    pub fn from_json_str(raw: &str) -> AnglResult<Self> {
        let entries: BTreeMap<String, serde_json::Value> = serde_json::from_str(raw).map_err(|e| {
            ConfigError::boxed(
                ErrorKind::Config,
                format!("parse global registry: {}", e),
                "angl.scope.global.from_json_str",
            )
        })?;
        Ok(GlobalRegistry { entries })
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> AnglResult<Self> {
        let raw = std::fs::read_to_string(&path).map_err(|e| {
            ConfigError::boxed(
                ErrorKind::Io,
                format!("read global registry {}: {}", path.as_ref().display(), e),
                "angl.scope.global.load_from_file",
            )
        })?;
        Self::from_json_str(&raw)
    }

    pub fn insert(&mut self, name: &str, descriptor: serde_json::Value) {
        self.entries.insert(name.to_string(), descriptor);
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Build the root scope: every registry name plus `extra` becomes a
/// NAMESPACED/MEMBER binding under `container`. A name listed twice fails
/// with a duplicate-binding error.
pub fn create_global_scope(registry: &GlobalRegistry, extra: &[String], container: &str) -> AnglResult<ScopeTree> {
    let mut tree = ScopeTree::new();
    for name in registry.names().chain(extra.iter().map(String::as_str)) {
        tree.add(ScopeTree::GLOBAL, Variable::namespaced(name, container))?;
    }
    debug!(
        "global scope built with {} registry names and {} extra names",
        registry.len(),
        extra.len()
    );
    Ok(tree)
}
