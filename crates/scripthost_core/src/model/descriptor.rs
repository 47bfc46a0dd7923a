//! Capability descriptors for host classes and their features.
//!
//! # Responsibility
//! - Represent one declared property/function/constant with its constraints.
//! - Represent one host class's declared surface.
//!
//! # Invariants
//! - Feature names are unique within their kind in one class.
//! - Descriptors are immutable once a registry is published; mutation is
//!   confined to build time within this crate.

use crate::model::constraint::Constraint;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kind of a declared scriptable feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    Property,
    Function,
    Constant,
}

impl FeatureKind {
    /// Stable string id matching configuration node kinds.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Property => "property",
            Self::Function => "function",
            Self::Constant => "constant",
        }
    }
}

/// One declared property, function or constant plus its constraint set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureDescriptor {
    /// Declared name, unique within its kind in the owning class.
    pub name: String,
    pub kind: FeatureKind,
    /// Meaningful only for `FeatureKind::Property`.
    pub readable: bool,
    /// Meaningful only for `FeatureKind::Property`.
    pub writable: bool,
    /// Explicit opt-out: an excluded feature is absent from every registry,
    /// including the unconstrained catalogue.
    pub excluded: bool,
    pub constraints: Vec<Constraint>,
}

impl FeatureDescriptor {
    /// Creates a property declaration.
    pub fn property(name: impl Into<String>, readable: bool, writable: bool) -> Self {
        Self {
            name: name.into(),
            kind: FeatureKind::Property,
            readable,
            writable,
            excluded: false,
            constraints: Vec::new(),
        }
    }

    /// Creates a function declaration.
    pub fn function(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FeatureKind::Function,
            readable: false,
            writable: false,
            excluded: false,
            constraints: Vec::new(),
        }
    }

    /// Creates a constant declaration.
    pub fn constant(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FeatureKind::Constant,
            readable: false,
            writable: false,
            excluded: false,
            constraints: Vec::new(),
        }
    }
}

/// One host class's declared surface after profile filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDescriptor {
    /// Script-facing class name, unique within a registry.
    pub script_name: String,
    /// Linked native implementation type name, resolved lazily by the
    /// introspection collaborator.
    pub native_name: String,
    /// Optional constructor member name.
    pub constructor_name: Option<String>,
    /// Declared superclass name; the empty string terminates chain walks.
    pub superclass_name: String,
    /// Structural element kind this class represents, when linked.
    pub element_kind: Option<String>,
    /// Distinguishes genuine host classes from shadow classes that exist
    /// only to share declared behavior.
    pub host_object: bool,
    properties: BTreeMap<String, FeatureDescriptor>,
    functions: BTreeMap<String, FeatureDescriptor>,
    constants: BTreeMap<String, FeatureDescriptor>,
}

impl ClassDescriptor {
    /// Creates a class descriptor with an empty feature surface.
    pub fn new(script_name: impl Into<String>, native_name: impl Into<String>) -> Self {
        Self {
            script_name: script_name.into(),
            native_name: native_name.into(),
            constructor_name: None,
            superclass_name: String::new(),
            element_kind: None,
            host_object: false,
            properties: BTreeMap::new(),
            functions: BTreeMap::new(),
            constants: BTreeMap::new(),
        }
    }

    /// Returns whether this class terminates chain walks.
    pub fn is_root(&self) -> bool {
        self.superclass_name.is_empty()
    }

    /// Returns one feature of the given kind by name.
    pub fn feature(&self, kind: FeatureKind, name: &str) -> Option<&FeatureDescriptor> {
        self.features_of(kind).get(name)
    }

    /// Returns one declared property by name.
    pub fn property(&self, name: &str) -> Option<&FeatureDescriptor> {
        self.properties.get(name)
    }

    /// Returns one declared function by name.
    pub fn function(&self, name: &str) -> Option<&FeatureDescriptor> {
        self.functions.get(name)
    }

    /// Returns one declared constant by name.
    pub fn constant(&self, name: &str) -> Option<&FeatureDescriptor> {
        self.constants.get(name)
    }

    /// Returns declared feature names of one kind.
    pub fn feature_names(&self, kind: FeatureKind) -> Vec<&str> {
        self.features_of(kind).keys().map(String::as_str).collect()
    }

    pub(crate) fn insert_feature(&mut self, feature: FeatureDescriptor) {
        let map = match feature.kind {
            FeatureKind::Property => &mut self.properties,
            FeatureKind::Function => &mut self.functions,
            FeatureKind::Constant => &mut self.constants,
        };
        map.insert(feature.name.clone(), feature);
    }

    fn features_of(&self, kind: FeatureKind) -> &BTreeMap<String, FeatureDescriptor> {
        match kind {
            FeatureKind::Property => &self.properties,
            FeatureKind::Function => &self.functions,
            FeatureKind::Constant => &self.constants,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ClassDescriptor, FeatureDescriptor, FeatureKind};

    #[test]
    fn features_are_partitioned_by_kind() {
        let mut class = ClassDescriptor::new("HTMLDocument", "HtmlDocument");
        class.insert_feature(FeatureDescriptor::property("title", true, true));
        class.insert_feature(FeatureDescriptor::function("title"));

        let property = class.property("title").expect("declared property");
        assert_eq!(property.kind, FeatureKind::Property);
        assert!(property.readable);

        let function = class.function("title").expect("declared function");
        assert_eq!(function.kind, FeatureKind::Function);
        assert!(class.constant("title").is_none());
    }

    #[test]
    fn empty_superclass_marks_root() {
        let mut class = ClassDescriptor::new("Node", "DomNode");
        assert!(class.is_root());
        class.superclass_name = "EventTarget".to_string();
        assert!(!class.is_root());
    }

    #[test]
    fn feature_names_are_sorted_per_kind() {
        let mut class = ClassDescriptor::new("Window", "WebWindow");
        class.insert_feature(FeatureDescriptor::function("open"));
        class.insert_feature(FeatureDescriptor::function("alert"));
        assert_eq!(class.feature_names(FeatureKind::Function), ["alert", "open"]);
        assert!(class.feature_names(FeatureKind::Constant).is_empty());
    }
}
