use crate::error::{AnglErrorExt, ErrorKind, Level};
use crate::location::{Location, Span};

/// The annotated tree document did not match the expected shape.
#[derive(Debug, Clone)]
pub struct InputError {
    level: Level,
    kind: ErrorKind,
    message: String,
    issuer: String,
    location: Option<Location>,
}

impl InputError {
    pub fn new(kind: ErrorKind, message: String, issuer: &str, location: Option<Location>) -> Self {
        InputError {
            level: Level::Critical,
            kind,
            message,
            issuer: issuer.to_string(),
            location,
        }
    }

    /// Classify a serde failure. Unknown tags are unknown node kinds; every
    /// other mismatch is malformed input.
    pub fn from_serde(err: &serde_json::Error, file: &str) -> Self {
        let message = err.to_string();
        let kind = if message.contains("unknown variant") {
            ErrorKind::UnknownNodeKind
        } else {
            ErrorKind::MalformedInput
        };
        let location = if err.line() > 0 {
            Some(Location::new(file.to_string(), err.line(), err.column()))
        } else {
            None
        };
        InputError::new(kind, message, "angl.ast.input.from_serde", location)
    }
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(loc) = &self.location {
            write!(f, "{} (at {}:{}:{})", self.message, loc.file, loc.line, loc.column)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for InputError {}

impl AnglErrorExt for InputError {
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
