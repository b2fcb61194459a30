//! file: core/src/config.rs
//! description: compiler options and the runtime contract.
//!
//! `RuntimeContract` names everything emitted code expects the runtime
//! support library to provide. `CompileOptions` bundles it with the
//! caller-supplied globals and formatting choices. Both load from JSON and
//! default every field, so a config file only lists what it overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{AnglErrorExt, AnglResult, ErrorKind, Level};
use crate::location::{Location, Span};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RuntimeContract {
    /// Local name of the globals container inside the module envelope.
    pub globals_identifier: String,
    /// Local name of the runtime-helpers container.
    pub runtime_identifier: String,
    pub globals_module: String,
    pub runtime_module: String,
    /// `(name, parentName, initializer)` registration primitive on the helpers container.
    pub create_object: String,
    /// `(child, parent)` prototype-linking primitive on the helpers container.
    pub inherit: String,
    pub init_properties_method: String,
    pub create_method: String,
    pub destroy_method: String,
}

impl Default for RuntimeContract {
    fn default() -> Self {
        RuntimeContract {
            globals_identifier: "$G".to_string(),
            runtime_identifier: "$R".to_string(),
            globals_module: "angl/globals".to_string(),
            runtime_module: "angl/runtime".to_string(),
            create_object: "createAnglObject".to_string(),
            inherit: "inherit".to_string(),
            init_properties_method: "$initProperties".to_string(),
            create_method: "$create".to_string(),
            destroy_method: "$destroy".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompileOptions {
    pub runtime: RuntimeContract,
    /// Global identifiers added on top of the registry.
    pub extra_globals: Vec<String>,
    /// One level of indentation in the emitted text.
    pub indent: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            runtime: RuntimeContract::default(),
            extra_globals: Vec::new(),
            indent: "    ".to_string(),
        }
    }
}

impl CompileOptions {
    /// Load options from a JSON file path.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> AnglResult<CompileOptions> {
        let raw = std::fs::read_to_string(&path).map_err(|e| {
            ConfigError::boxed(
                ErrorKind::Io,
                format!("read config {}: {}", path.as_ref().display(), e),
                "angl.config.load_from_file",
            )
        })?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> AnglResult<CompileOptions> {
        serde_json::from_str(raw).map_err(|e| {
            ConfigError::boxed(ErrorKind::Config, format!("parse config: {}", e), "angl.config.from_json_str")
        })
    }
}

/// Failure while loading configuration or a global registry.
#[derive(Debug, Clone)]
pub struct ConfigError {
    kind: ErrorKind,
    message: String,
    issuer: String,
}

impl ConfigError {
    pub fn new(kind: ErrorKind, message: String, issuer: &str) -> Self {
        ConfigError { kind, message, issuer: issuer.to_string() }
    }

    pub fn boxed(kind: ErrorKind, message: String, issuer: &str) -> Box<dyn AnglErrorExt> {
        Box::new(ConfigError::new(kind, message, issuer))
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ConfigError {}

impl AnglErrorExt for ConfigError {
    fn level(&self) -> Level {
        Level::Error
    }

    fn kind(&self) -> ErrorKind {
        self.kind
    }

    fn message(&self) -> String {
        self.message.clone()
    }

    fn issuer(&self) -> String {
        self.issuer.clone()
    }

    fn span(&self) -> Option<Span> {
        None
    }

    fn location(&self) -> Option<Location> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let opts = CompileOptions::from_json_str(r#"{ "runtime": { "globalsIdentifier": "G" }, "indent": "\t" }"#)
            .expect("config should parse");
        assert_eq!(opts.runtime.globals_identifier, "G");
        assert_eq!(opts.runtime.runtime_identifier, "$R");
        assert_eq!(opts.indent, "\t");
        assert!(opts.extra_globals.is_empty());
    }

    #[test]
    fn malformed_config_is_a_config_error() {
        let err = CompileOptions::from_json_str("{ indent: ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }
}
