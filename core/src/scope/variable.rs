use std::fmt;

use super::err::ScopeError;
use super::table::BindingId;
use crate::error::{AnglResult, ErrorKind, Level};

/// Where a binding lives at run time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageClass {
    /// Declared with the function's local allocation statement.
    Local,
    /// Passed in as a function parameter.
    Argument,
    /// Stored as a property of a container object.
    Namespaced,
    /// Never materialized; maps onto something that already exists.
    Unmaterialized,
}

impl StorageClass {
    /// Parse a storage class, accepting both the descriptive spelling and the
    /// one used by the front end (`PROP_ASSIGNMENT`, `NONE`).
    pub fn parse(spelling: &str) -> AnglResult<Self> {
        match spelling {
            "LOCAL" => Ok(StorageClass::Local),
            "ARGUMENT" => Ok(StorageClass::Argument),
            "NAMESPACED" | "PROP_ASSIGNMENT" => Ok(StorageClass::Namespaced),
            "UNMATERIALIZED" | "NONE" => Ok(StorageClass::Unmaterialized),
            other => Err(Box::new(ScopeError::with(
                Level::Critical,
                ErrorKind::InvalidStorageClass,
                None,
                format!("Invalid variable storage class \"{}\"", other),
                "angl.scope.variable.StorageClass::parse".to_string(),
                None,
            ))),
        }
    }

    /// Whether the binding owns a slot in its function's target namespace.
    pub fn is_function_slot(&self) -> bool {
        matches!(self, StorageClass::Local | StorageClass::Argument)
    }
}

impl fmt::Display for StorageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StorageClass::Local => "LOCAL",
            StorageClass::Argument => "ARGUMENT",
            StorageClass::Namespaced => "NAMESPACED",
            StorageClass::Unmaterialized => "UNMATERIALIZED",
        };
        write!(f, "{}", s)
    }
}

/// How a binding is referenced from emitted code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessClass {
    /// `target`
    Direct,
    /// `container.target`
    Member,
}

impl AccessClass {
    pub fn parse(spelling: &str) -> AnglResult<Self> {
        match spelling {
            "DIRECT" | "BARE" => Ok(AccessClass::Direct),
            "MEMBER" | "PROP_ACCESS" => Ok(AccessClass::Member),
            other => Err(Box::new(ScopeError::with(
                Level::Critical,
                ErrorKind::InvalidStorageClass,
                None,
                format!("Invalid variable access class \"{}\"", other),
                "angl.scope.variable.AccessClass::parse".to_string(),
                None,
            ))),
        }
    }
}

impl fmt::Display for AccessClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessClass::Direct => write!(f, "DIRECT"),
            AccessClass::Member => write!(f, "MEMBER"),
        }
    }
}

/// Two-phase target identifier. A binding starts out pending (optionally
/// with a preferred spelling) and is fixed exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetIdent {
    Pending { desired: Option<String> },
    Assigned(String),
}

impl TargetIdent {
    pub fn assigned(&self) -> Option<&str> {
        match self {
            TargetIdent::Assigned(name) => Some(name.as_str()),
            TargetIdent::Pending { .. } => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, TargetIdent::Pending { .. })
    }
}

#[derive(Debug, Clone)]
pub struct Variable {
    identifier: Option<String>,
    storage: StorageClass,
    access: AccessClass,
    target: TargetIdent,
    container: Option<String>,
}

impl Variable {
    pub fn new(identifier: Option<String>, storage: StorageClass, access: AccessClass) -> Self {
        Variable {
            identifier,
            storage,
            access,
            target: TargetIdent::Pending { desired: None },
            container: None,
        }
    }

    /// Build a variable from the front end's string spellings; fails if
    /// either class is outside its enumeration.
    pub fn parse(identifier: Option<String>, storage: &str, access: &str) -> AnglResult<Self> {
        Ok(Variable::new(identifier, StorageClass::parse(storage)?, AccessClass::parse(access)?))
    }

    pub fn local(identifier: &str) -> Self {
        Variable::new(Some(identifier.to_string()), StorageClass::Local, AccessClass::Direct)
    }

    pub fn argument(identifier: &str) -> Self {
        Variable::new(Some(identifier.to_string()), StorageClass::Argument, AccessClass::Direct)
    }

    /// A property of `container`, addressed by its own name.
    pub fn namespaced(identifier: &str, container: &str) -> Self {
        Variable::new(Some(identifier.to_string()), StorageClass::Namespaced, AccessClass::Member)
            .with_container(container)
            .with_target(identifier)
    }

    pub fn with_target(mut self, target: &str) -> Self {
        self.target = TargetIdent::Assigned(target.to_string());
        self
    }

    pub fn with_desired_target(mut self, desired: &str) -> Self {
        if self.target.is_pending() {
            self.target = TargetIdent::Pending { desired: Some(desired.to_string()) };
        }
        self
    }

    pub fn with_container(mut self, container: &str) -> Self {
        self.container = Some(container.to_string());
        self
    }

    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    pub fn storage(&self) -> StorageClass {
        self.storage
    }

    pub fn access(&self) -> AccessClass {
        self.access
    }

    pub fn target(&self) -> &TargetIdent {
        &self.target
    }

    pub fn desired_target(&self) -> Option<&str> {
        match &self.target {
            TargetIdent::Pending { desired } => desired.as_deref(),
            TargetIdent::Assigned(_) => None,
        }
    }

    pub fn container(&self) -> Option<&str> {
        self.container.as_deref()
    }

    pub(crate) fn fix_target(&mut self, target: String) {
        self.target = TargetIdent::Assigned(target);
    }
}

/// A second source name for another binding's storage slot. Everything but
/// the identifier is read through the link.
#[derive(Debug, Clone)]
pub struct LinkedVariable {
    identifier: String,
    link: BindingId,
}

impl LinkedVariable {
    pub fn new(identifier: &str, link: BindingId) -> Self {
        LinkedVariable { identifier: identifier.to_string(), link }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn link(&self) -> BindingId {
        self.link
    }
}

#[derive(Debug, Clone)]
pub enum Binding {
    Variable(Variable),
    Linked(LinkedVariable),
}

impl Binding {
    pub fn identifier(&self) -> Option<&str> {
        match self {
            Binding::Variable(v) => v.identifier(),
            Binding::Linked(l) => Some(l.identifier()),
        }
    }

    /// Storage class of this entry itself; aliases are never allocated.
    pub fn storage(&self) -> StorageClass {
        match self {
            Binding::Variable(v) => v.storage(),
            Binding::Linked(_) => StorageClass::Unmaterialized,
        }
    }
}

impl From<Variable> for Binding {
    fn from(v: Variable) -> Self {
        Binding::Variable(v)
    }
}

impl From<LinkedVariable> for Binding {
    fn from(l: LinkedVariable) -> Self {
        Binding::Linked(l)
    }
}
