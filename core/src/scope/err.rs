use crate::error::{AnglErrorExt, ErrorKind, Level};
use crate::location::{Location, Span};

/// Failure raised by the scope and variable model.
#[derive(Debug, Clone)]
pub struct ScopeError {
    level: Level,
    kind: ErrorKind,
    identifier: Option<String>,
    message: String,
    issuer: String,
    location: Option<Location>,
}

impl ScopeError {
    pub fn with(
        level: Level,
        kind: ErrorKind,
        identifier: Option<String>,
        message: String,
        issuer: String,
        location: Option<Location>,
    ) -> Self {
        ScopeError {
            level,
            kind,
            identifier,
            message,
            issuer,
            location,
        }
    }

    pub fn redeclared(identifier: &str, issuer: &str) -> Self {
        ScopeError::with(
            Level::Error,
            ErrorKind::DuplicateBinding,
            Some(identifier.to_string()),
            format!("Identifier \"{}\" is already declared in this scope", identifier),
            issuer.to_string(),
            None,
        )
    }

    pub fn unresolved(identifier: &str, issuer: &str) -> Self {
        ScopeError::with(
            Level::Error,
            ErrorKind::UnresolvedIdentifier,
            Some(identifier.to_string()),
            format!("Identifier \"{}\" is not defined in any enclosing scope", identifier),
            issuer.to_string(),
            None,
        )
    }

    /// Attach a source position, keeping one that is already present.
    pub fn at(mut self, location: Option<Location>) -> Self {
        if self.location.is_none() {
            self.location = location;
        }
        self
    }

    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }
}

impl std::fmt::Display for ScopeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(loc) = &self.location {
            write!(f, "{} at {}", self.message, loc)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for ScopeError {}

impl AnglErrorExt for ScopeError {
    fn level(&self) -> Level {
        self.level
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
        self.location.clone()
    }
}
