use crate::error::{AnglErrorExt, ErrorKind, Level};
use crate::location::{Location, Span};

/// Failure raised while printing target code. These are internal faults: the
/// tree was validated on load, so reaching one means a lowering rule is wrong.
#[derive(Debug, Clone)]
pub struct LowerError {
    level: Level,
    kind: ErrorKind,
    message: String,
    issuer: String,
    location: Option<Location>,
}

impl LowerError {
    pub fn with(level: Level, kind: ErrorKind, message: String, issuer: &str, location: Option<Location>) -> Self {
        LowerError {
            level,
            kind,
            message,
            issuer: issuer.to_string(),
            location,
        }
    }

    pub fn indent_underflow(issuer: &str) -> Self {
        LowerError::with(
            Level::Critical,
            ErrorKind::IndentUnderflow,
            "Indentation level dropped below zero".to_string(),
            issuer,
            None,
        )
    }
}

impl std::fmt::Display for LowerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for LowerError {}

impl AnglErrorExt for LowerError {
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
