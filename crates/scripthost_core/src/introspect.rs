//! Native introspection collaborator seam.
//!
//! # Responsibility
//! - Define the contract for resolving textual native type and member names
//!   into opaque handles.
//! - Provide `TableResolver`, an explicit registration-table implementation
//!   built at startup.
//!
//! # Invariants
//! - The core never inspects a handle's internals; handles are stored and
//!   forwarded to callers unchanged.
//! - Resolution is lazy: declared names are only resolved when a caller
//!   asks, never during registry build.

use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Kind of native member a declared feature maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MemberKind {
    PropertyGetter,
    PropertySetter,
    Function,
    Constant,
}

impl MemberKind {
    /// Stable string id for diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PropertyGetter => "property_getter",
            Self::PropertySetter => "property_setter",
            Self::Function => "function",
            Self::Constant => "constant",
        }
    }
}

/// Opaque handle for a resolved native type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeType {
    name: String,
}

impl NativeType {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Declared type name this handle was resolved from.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Opaque handle for a resolved native member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeMember {
    type_name: String,
    kind: MemberKind,
    name: String,
}

impl NativeMember {
    pub fn new(type_name: impl Into<String>, kind: MemberKind, name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            kind,
            name: name.into(),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Native name resolution errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    UnknownType(String),
}

impl Display for ResolveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownType(name) => write!(f, "native type is not registered: {name}"),
        }
    }
}

impl Error for ResolveError {}

/// Contract for the introspection collaborator.
pub trait NativeResolver: Send + Sync {
    /// Resolves a textual type name into an opaque type handle.
    fn resolve_type(&self, type_name: &str) -> Result<NativeType, ResolveError>;

    /// Resolves one member of a resolved type, or `None` when the type does
    /// not implement it.
    fn resolve_member(
        &self,
        native_type: &NativeType,
        kind: MemberKind,
        member_name: &str,
    ) -> Option<NativeMember>;
}

/// Registration-table resolver.
///
/// Hosts register every native type and member once at startup; lookups are
/// plain table reads with no dynamic introspection.
#[derive(Debug, Default)]
pub struct TableResolver {
    types: BTreeMap<String, BTreeSet<(MemberKind, String)>>,
}

impl TableResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a native type with no members.
    pub fn register_type(&mut self, type_name: impl Into<String>) -> &mut Self {
        self.types.entry(type_name.into()).or_default();
        self
    }

    /// Registers one member, registering its type as a side effect.
    pub fn register_member(
        &mut self,
        type_name: impl Into<String>,
        kind: MemberKind,
        member_name: impl Into<String>,
    ) -> &mut Self {
        self.types
            .entry(type_name.into())
            .or_default()
            .insert((kind, member_name.into()));
        self
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl NativeResolver for TableResolver {
    fn resolve_type(&self, type_name: &str) -> Result<NativeType, ResolveError> {
        if self.types.contains_key(type_name) {
            Ok(NativeType::new(type_name))
        } else {
            Err(ResolveError::UnknownType(type_name.to_string()))
        }
    }

    fn resolve_member(
        &self,
        native_type: &NativeType,
        kind: MemberKind,
        member_name: &str,
    ) -> Option<NativeMember> {
        let members = self.types.get(native_type.name())?;
        if members.contains(&(kind, member_name.to_string())) {
            Some(NativeMember::new(native_type.name(), kind, member_name))
        } else {
            None
        }
    }
}
