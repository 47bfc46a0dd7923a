//! Structural configuration errors.

use crate::introspect::ResolveError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ConfigResult<T> = Result<T, ConfigurationError>;

/// Fatal structural errors in the declarative configuration.
///
/// These indicate a broken configuration, are cached with the failed build
/// and are never retried. Ordinary lookup misses are `Ok(None)`, not errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    UnrecognizedNode { parent: String, kind: String },
    InvalidAttribute {
        node: String,
        attribute: String,
        value: String,
    },
    DuplicateClass(String),
    AmbiguousNativeClass {
        native: String,
        first: String,
        second: String,
    },
    UnknownSuperclass { class: String, superclass: String },
    SuperclassCycle(String),
    UnknownClass(String),
    UnknownNativeClass(String),
    ElementKindUnresolved {
        kind: String,
        class: String,
        error: ResolveError,
    },
    NoHostAncestor { class: String },
}

impl Display for ConfigurationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnrecognizedNode { parent, kind } => {
                write!(f, "unrecognized node kind `{kind}` under `{parent}`")
            }
            Self::InvalidAttribute {
                node,
                attribute,
                value,
            } => write!(
                f,
                "invalid value `{value}` for attribute `{attribute}` on `{node}`"
            ),
            Self::DuplicateClass(name) => {
                write!(f, "class is declared more than once: {name}")
            }
            Self::AmbiguousNativeClass {
                native,
                first,
                second,
            } => write!(
                f,
                "native type `{native}` is claimed by both `{first}` and `{second}`"
            ),
            Self::UnknownSuperclass { class, superclass } => write!(
                f,
                "class `{class}` extends `{superclass}` which is absent from the registry"
            ),
            Self::SuperclassCycle(name) => {
                write!(f, "superclass chain starting at `{name}` forms a cycle")
            }
            Self::UnknownClass(name) => write!(f, "class is not declared: {name}"),
            Self::UnknownNativeClass(name) => {
                write!(f, "native type is not mapped to a script class: {name}")
            }
            Self::ElementKindUnresolved { kind, class, error } => write!(
                f,
                "element kind `{kind}` declared by `{class}` cannot be resolved: {error}"
            ),
            Self::NoHostAncestor { class } => write!(
                f,
                "class `{class}` has no host-object ancestor in its chain"
            ),
        }
    }
}

impl Error for ConfigurationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ElementKindUnresolved { error, .. } => Some(error),
            _ => None,
        }
    }
}
