//! Attributed configuration node tree.
//!
//! # Responsibility
//! - Define the ordered, typed node tree the registry builder walks.
//! - Provide attribute readers with the documented absence semantics.
//!
//! # Invariants
//! - An absent attribute reads as the empty string, never an error.
//! - Children are kept in document order.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::num::ParseFloatError;

/// Root node kind of a configuration document.
pub const NODE_CONFIGURATION: &str = "configuration";
/// One host class declaration.
pub const NODE_CLASS: &str = "class";
/// One property declaration on a class.
pub const NODE_PROPERTY: &str = "property";
/// One function declaration on a class.
pub const NODE_FUNCTION: &str = "function";
/// One constant declaration on a class.
pub const NODE_CONSTANT: &str = "constant";
/// Identity constraint child on a class or feature.
pub const NODE_BROWSER: &str = "browser";
/// Engine-version constraint child on a class or feature.
pub const NODE_ENGINE: &str = "engine";
/// Informational node, ignored by the builder.
pub const NODE_DOC: &str = "doc";

/// Declared name of a class, feature or identity constraint.
pub const ATTR_NAME: &str = "name";
/// Native implementation type name linked to a class.
pub const ATTR_NATIVE: &str = "native";
/// Optional constructor member name on a class.
pub const ATTR_CONSTRUCTOR: &str = "constructor";
/// Superclass name; absent or empty terminates chain walks.
pub const ATTR_EXTENDS: &str = "extends";
/// Structural element kind a class represents, resolvable through the
/// introspection collaborator.
pub const ATTR_ELEMENT: &str = "element";
/// Marks a class as a genuine host object rather than a shadow class.
pub const ATTR_HOST_OBJECT: &str = "host_object";
/// Unconditional opt-out flag on classes and features.
pub const ATTR_NOT_IMPLEMENTED: &str = "not_implemented";
/// Property readability flag.
pub const ATTR_READABLE: &str = "readable";
/// Property writability flag.
pub const ATTR_WRITABLE: &str = "writable";
/// Inclusive lower version bound on a constraint.
pub const ATTR_MIN_VERSION: &str = "min_version";
/// Inclusive upper version bound on a constraint.
pub const ATTR_MAX_VERSION: &str = "max_version";

/// One node of the parsed configuration tree.
///
/// Derives `Deserialize` so hosts can materialize trees from any serde
/// format front end; the core itself never reads files.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConfigNode {
    /// Node kind name, e.g. `class` or `property`.
    pub kind: String,
    /// String-valued attributes.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    /// Child nodes in document order.
    #[serde(default)]
    pub children: Vec<ConfigNode>,
}

impl ConfigNode {
    /// Creates a node with no attributes or children.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Sets one attribute.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Appends one child node.
    pub fn with_child(mut self, child: ConfigNode) -> Self {
        self.children.push(child);
        self
    }

    /// Returns an attribute value, or the empty string when absent.
    pub fn attr(&self, name: &str) -> &str {
        self.attributes.get(name).map(String::as_str).unwrap_or("")
    }

    /// Returns whether an attribute is the literal `true`, case-insensitive.
    pub fn flag(&self, name: &str) -> bool {
        self.attr(name).eq_ignore_ascii_case("true")
    }

    /// Parses an optional numeric version attribute.
    ///
    /// Absent or empty reads as `None` (unbounded); a present value must be
    /// a valid float, `0` included.
    pub fn version_attr(&self, name: &str) -> Result<Option<f64>, ParseFloatError> {
        let raw = self.attr(name);
        if raw.is_empty() {
            return Ok(None);
        }
        raw.parse::<f64>().map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigNode, ATTR_MIN_VERSION, ATTR_NOT_IMPLEMENTED};

    #[test]
    fn absent_attribute_reads_as_empty_string() {
        let node = ConfigNode::new("class");
        assert_eq!(node.attr("name"), "");
        assert!(!node.flag(ATTR_NOT_IMPLEMENTED));
    }

    #[test]
    fn flag_is_case_insensitive() {
        let node = ConfigNode::new("property").with_attr(ATTR_NOT_IMPLEMENTED, "TRUE");
        assert!(node.flag(ATTR_NOT_IMPLEMENTED));
        let node = ConfigNode::new("property").with_attr(ATTR_NOT_IMPLEMENTED, "yes");
        assert!(!node.flag(ATTR_NOT_IMPLEMENTED));
    }

    #[test]
    fn version_attr_distinguishes_absent_from_zero() {
        let absent = ConfigNode::new("browser");
        assert_eq!(absent.version_attr(ATTR_MIN_VERSION).expect("parse"), None);

        let zero = ConfigNode::new("browser").with_attr(ATTR_MIN_VERSION, "0");
        assert_eq!(
            zero.version_attr(ATTR_MIN_VERSION).expect("parse"),
            Some(0.0)
        );

        let bad = ConfigNode::new("browser").with_attr(ATTR_MIN_VERSION, "two");
        assert!(bad.version_attr(ATTR_MIN_VERSION).is_err());
    }

    #[test]
    fn deserializes_from_serde_value() {
        let node: ConfigNode = serde_json::from_value(serde_json::json!({
            "kind": "class",
            "attributes": { "name": "Node" },
            "children": [ { "kind": "doc" } ]
        }))
        .expect("tree deserialization");
        assert_eq!(node.attr("name"), "Node");
        assert_eq!(node.children.len(), 1);
    }
}
