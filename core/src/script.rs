use std::path::PathBuf;

use crate::ast::TreeDocument;
use crate::error::{AnglErrorExt, AnglResult, ErrorKind, Level};
use crate::location::{Location, Span};

/// One annotated tree document on disk, read eagerly.
#[derive(Debug, Clone)]
pub struct Script {
    pub name: String,
    pub path: PathBuf,
    pub content: String,
}

impl Script {
    pub fn new(path: PathBuf) -> AnglResult<Self> {
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            Box::new(MissingScriptError { path: path.clone(), reason: e.to_string() }) as Box<dyn AnglErrorExt>
        })?;
        Ok(Script { name, path, content })
    }

    pub fn from_content(name: &str, content: &str) -> Self {
        Script { name: name.to_string(), path: PathBuf::from(name), content: content.to_string() }
    }

    pub fn parse_document(&self) -> AnglResult<TreeDocument> {
        TreeDocument::from_json_str(&self.content, &self.name)
    }

    /// Output name: the input's stem with a `.js` extension.
    pub fn output_name(&self) -> String {
        let stem = self.path.file_stem().unwrap_or_default().to_string_lossy();
        let stem = stem.strip_suffix(".tree").unwrap_or(&stem).to_string();
        format!("{}.js", stem)
    }
}

impl std::fmt::Display for Script {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Script: {} at {:?}", self.name, self.path)
    }
}

#[derive(Debug, Clone)]
pub struct MissingScriptError {
    pub path: PathBuf,
    pub reason: String,
}

impl std::fmt::Display for MissingScriptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Cannot read script at {:?}: {}", self.path, self.reason)
    }
}

impl std::error::Error for MissingScriptError {}

impl AnglErrorExt for MissingScriptError {
    fn level(&self) -> Level {
        Level::Error
    }

    fn kind(&self) -> ErrorKind {
        ErrorKind::Io
    }

    fn message(&self) -> String {
        self.to_string()
    }

    fn issuer(&self) -> String {
        "angl.script".to_string()
    }

    fn span(&self) -> Option<Span> {
        None
    }

    fn location(&self) -> Option<Location> {
        None
    }
}
