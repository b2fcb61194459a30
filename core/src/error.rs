use std::fmt;


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Info,
    Warning,
    Error,
    Critical,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level_str = match self {
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
        };
        write!(f, "{}", level_str)
    }
}

/// Closed classification of every failure the compiler can report.
///
/// Resolution errors (`DuplicateBinding`, `UnresolvedIdentifier`) are
/// surfaced to the user; the rest signal a broken contract with the producer
/// of the annotated tree and abort the compilation unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    DuplicateBinding,
    UnresolvedIdentifier,
    UnknownNodeKind,
    IndentUnderflow,
    InvalidStorageClass,
    UnassignedIdentifier,
    IdentifierAlreadyAssigned,
    MalformedInput,
    Config,
    Io,
}

impl ErrorKind {
    /// Internal errors mean the input violated its contract, not that the
    /// source program is wrong.
    pub fn is_internal(&self) -> bool {
        !matches!(
            self,
            ErrorKind::DuplicateBinding
                | ErrorKind::UnresolvedIdentifier
                | ErrorKind::Config
                | ErrorKind::Io
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::DuplicateBinding => "duplicate-binding",
            ErrorKind::UnresolvedIdentifier => "unresolved-identifier",
            ErrorKind::UnknownNodeKind => "unknown-node-kind",
            ErrorKind::IndentUnderflow => "indent-underflow",
            ErrorKind::InvalidStorageClass => "invalid-storage-class",
            ErrorKind::UnassignedIdentifier => "unassigned-identifier",
            ErrorKind::IdentifierAlreadyAssigned => "identifier-already-assigned",
            ErrorKind::MalformedInput => "malformed-input",
            ErrorKind::Config => "config",
            ErrorKind::Io => "io",
        };
        write!(f, "{}", s)
    }
}

pub trait AnglErrorExt {
    fn level(&self) -> Level;
    fn kind(&self) -> ErrorKind;
    fn message(&self) -> String;
    fn issuer(&self) -> String;
    fn span(&self) -> Option<crate::location::Span>;
    fn location(&self) -> Option<crate::location::Location>;
}

pub type AnglResult<T> = Result<T, Box<dyn AnglErrorExt>>;

impl fmt::Debug for dyn AnglErrorExt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let loc_str = match self.location() {
            Some(loc) => loc.to_string(),
            None => "unknown".to_string(),
        };

        let span_str = match self.span() {
            Some(span) => span.to_string(),
            None => "span:none".to_string(),
        };

        write!(
            f,
            "ANGL | {} | {} | {} | {} | {} | {}",
            self.level(),
            self.kind(),
            loc_str,
            self.issuer(),
            span_str,
            self.message()
        )
    }
}

impl fmt::Display for dyn AnglErrorExt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
