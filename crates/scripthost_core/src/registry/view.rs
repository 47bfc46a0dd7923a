//! Immutable per-profile registry view and inheritance-chain lookups.
//!
//! # Responsibility
//! - Hold the filtered class descriptors for one profile.
//! - Walk superclass chains for property/function/constant lookups.
//! - Forward member resolution to the introspection collaborator.
//!
//! # Invariants
//! - Chain walks are index hops over precomputed parent links; a walk
//!   never loops and never silently skips a dangling superclass.
//! - Lookup misses are ordinary control flow (`Ok(None)`), including an
//!   unknown starting class name.

use crate::introspect::{MemberKind, NativeMember, NativeResolver};
use crate::model::descriptor::{ClassDescriptor, FeatureDescriptor, FeatureKind};
use crate::model::profile::ClientProfile;
use crate::registry::error::{ConfigResult, ConfigurationError};
use std::collections::BTreeMap;

/// Resolved parent link of one class in the arena.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ParentLink {
    /// Empty superclass name; terminates the chain.
    Root,
    /// Superclass present in this registry.
    Linked(usize),
    /// Superclass declared but absent from this registry (e.g. filtered out
    /// for this profile). Walking through it is a structural error.
    Unresolved(String),
}

/// One chain lookup hit: the matched feature and the class declaring it.
#[derive(Debug, Clone, Copy)]
pub struct ChainHit<'a> {
    pub class: &'a ClassDescriptor,
    pub feature: &'a FeatureDescriptor,
}

/// Immutable mapping from script-facing class name to class descriptor,
/// tagged with the profile it was built for.
#[derive(Debug)]
pub struct Registry {
    profile: ClientProfile,
    classes: Vec<ClassDescriptor>,
    by_name: BTreeMap<String, usize>,
    by_native: BTreeMap<String, String>,
    parents: Vec<ParentLink>,
}

impl Registry {
    pub(crate) fn new(
        profile: ClientProfile,
        classes: Vec<ClassDescriptor>,
        by_name: BTreeMap<String, usize>,
        by_native: BTreeMap<String, String>,
        parents: Vec<ParentLink>,
    ) -> Self {
        Self {
            profile,
            classes,
            by_name,
            by_native,
            parents,
        }
    }

    /// Profile this registry was built for.
    pub fn profile(&self) -> &ClientProfile {
        &self.profile
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Script-facing class names in document order.
    pub fn class_names(&self) -> Vec<&str> {
        self.classes
            .iter()
            .map(|class| class.script_name.as_str())
            .collect()
    }

    /// Returns one class descriptor by script-facing name.
    pub fn class_descriptor(&self, script_name: &str) -> Option<&ClassDescriptor> {
        self.by_name
            .get(script_name)
            .map(|&index| &self.classes[index])
    }

    /// Returns the script-facing class name backing one native type.
    pub fn script_class_for_native(&self, native_name: &str) -> Option<&str> {
        self.by_native.get(native_name).map(String::as_str)
    }

    /// Finds the nearest declared property walking from `script_name`
    /// toward the root.
    pub fn find_property(
        &self,
        script_name: &str,
        property_name: &str,
    ) -> ConfigResult<Option<ChainHit<'_>>> {
        self.find_feature(FeatureKind::Property, script_name, property_name)
    }

    /// Finds the nearest declared function walking toward the root.
    pub fn find_function(
        &self,
        script_name: &str,
        function_name: &str,
    ) -> ConfigResult<Option<ChainHit<'_>>> {
        self.find_feature(FeatureKind::Function, script_name, function_name)
    }

    /// Finds the nearest declared constant walking toward the root.
    pub fn find_constant(
        &self,
        script_name: &str,
        constant_name: &str,
    ) -> ConfigResult<Option<ChainHit<'_>>> {
        self.find_feature(FeatureKind::Constant, script_name, constant_name)
    }

    /// Returns whether a property is declared anywhere on the chain.
    pub fn property_exists(&self, script_name: &str, property_name: &str) -> ConfigResult<bool> {
        Ok(self.find_property(script_name, property_name)?.is_some())
    }

    /// Resolves the native getter behind a readable property, or `None`
    /// when the property is undeclared, unreadable or unresolved.
    pub fn resolve_property_getter(
        &self,
        resolver: &dyn NativeResolver,
        script_name: &str,
        property_name: &str,
    ) -> ConfigResult<Option<NativeMember>> {
        let Some(hit) = self.find_property(script_name, property_name)? else {
            return Ok(None);
        };
        if !hit.feature.readable {
            return Ok(None);
        }
        Ok(self.resolve_member(resolver, hit.class, MemberKind::PropertyGetter, property_name))
    }

    /// Resolves the native setter behind a writable property.
    pub fn resolve_property_setter(
        &self,
        resolver: &dyn NativeResolver,
        script_name: &str,
        property_name: &str,
    ) -> ConfigResult<Option<NativeMember>> {
        let Some(hit) = self.find_property(script_name, property_name)? else {
            return Ok(None);
        };
        if !hit.feature.writable {
            return Ok(None);
        }
        Ok(self.resolve_member(resolver, hit.class, MemberKind::PropertySetter, property_name))
    }

    /// Resolves the native member implementing a declared function.
    pub fn resolve_function_member(
        &self,
        resolver: &dyn NativeResolver,
        script_name: &str,
        function_name: &str,
    ) -> ConfigResult<Option<NativeMember>> {
        let Some(hit) = self.find_function(script_name, function_name)? else {
            return Ok(None);
        };
        Ok(self.resolve_member(resolver, hit.class, MemberKind::Function, function_name))
    }

    /// Resolves the native member backing a declared constant.
    pub fn resolve_constant_member(
        &self,
        resolver: &dyn NativeResolver,
        script_name: &str,
        constant_name: &str,
    ) -> ConfigResult<Option<NativeMember>> {
        let Some(hit) = self.find_constant(script_name, constant_name)? else {
            return Ok(None);
        };
        Ok(self.resolve_member(resolver, hit.class, MemberKind::Constant, constant_name))
    }

    /// Walks upward from `script_name` to the nearest class flagged as a
    /// genuine host object, skipping shadow classes.
    pub(crate) fn host_ancestor(&self, script_name: &str) -> ConfigResult<&ClassDescriptor> {
        let Some(&start) = self.by_name.get(script_name) else {
            return Err(ConfigurationError::UnknownClass(script_name.to_string()));
        };
        let mut index = start;
        loop {
            let class = &self.classes[index];
            if class.host_object {
                return Ok(class);
            }
            match &self.parents[index] {
                ParentLink::Root => {
                    return Err(ConfigurationError::NoHostAncestor {
                        class: script_name.to_string(),
                    })
                }
                ParentLink::Linked(parent) => index = *parent,
                ParentLink::Unresolved(superclass) => {
                    return Err(ConfigurationError::UnknownSuperclass {
                        class: class.script_name.clone(),
                        superclass: superclass.clone(),
                    })
                }
            }
        }
    }

    fn find_feature(
        &self,
        kind: FeatureKind,
        script_name: &str,
        feature_name: &str,
    ) -> ConfigResult<Option<ChainHit<'_>>> {
        let Some(&start) = self.by_name.get(script_name) else {
            // Callers probe defensively; an unknown class is a miss.
            return Ok(None);
        };
        let mut index = start;
        loop {
            let class = &self.classes[index];
            if let Some(feature) = class.feature(kind, feature_name) {
                return Ok(Some(ChainHit { class, feature }));
            }
            match &self.parents[index] {
                ParentLink::Root => return Ok(None),
                ParentLink::Linked(parent) => index = *parent,
                ParentLink::Unresolved(superclass) => {
                    return Err(ConfigurationError::UnknownSuperclass {
                        class: class.script_name.clone(),
                        superclass: superclass.clone(),
                    })
                }
            }
        }
    }

    fn resolve_member(
        &self,
        resolver: &dyn NativeResolver,
        class: &ClassDescriptor,
        kind: MemberKind,
        member_name: &str,
    ) -> Option<NativeMember> {
        // Resolution failures during capability queries are misses, not
        // fatal: scripts routinely probe for optional capabilities.
        let native_type = resolver.resolve_type(&class.native_name).ok()?;
        resolver.resolve_member(&native_type, kind, member_name)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::tree::ConfigNode;
    use crate::introspect::{MemberKind, TableResolver};
    use crate::model::profile::ClientProfile;
    use crate::registry::builder::build_registry;
    use crate::registry::error::ConfigurationError;
    use crate::registry::view::Registry;

    fn sample_registry() -> Registry {
        let tree: ConfigNode = serde_json::from_value(serde_json::json!({
            "kind": "configuration",
            "children": [
                {
                    "kind": "class",
                    "attributes": { "name": "A", "native": "NativeA" },
                    "children": [
                        {
                            "kind": "property",
                            "attributes": { "name": "x", "readable": "true", "writable": "false" }
                        },
                        { "kind": "constant", "attributes": { "name": "MAX" } }
                    ]
                },
                {
                    "kind": "class",
                    "attributes": { "name": "B", "native": "NativeB", "extends": "A" },
                    "children": [
                        { "kind": "function", "attributes": { "name": "probe" } }
                    ]
                },
                {
                    "kind": "class",
                    "attributes": { "name": "Orphan", "native": "NativeOrphan", "extends": "Ghost" }
                }
            ]
        }))
        .expect("sample tree");
        build_registry(&tree, &ClientProfile::Any).expect("sample registry")
    }

    #[test]
    fn finds_inherited_property_with_declared_flags() {
        let registry = sample_registry();
        let hit = registry
            .find_property("B", "x")
            .expect("walk")
            .expect("inherited property");
        assert_eq!(hit.class.script_name, "A");
        assert!(hit.feature.readable);
        assert!(!hit.feature.writable);
    }

    #[test]
    fn lookup_is_restricted_to_its_feature_kind() {
        let registry = sample_registry();
        assert!(registry.find_function("B", "x").expect("walk").is_none());
        assert!(registry
            .find_constant("B", "MAX")
            .expect("walk")
            .is_some());
        assert!(registry
            .find_property("A", "probe")
            .expect("walk")
            .is_none());
    }

    #[test]
    fn unknown_starting_class_is_a_miss_not_an_error() {
        let registry = sample_registry();
        assert!(registry
            .find_property("Missing", "x")
            .expect("walk")
            .is_none());
        assert!(!registry.property_exists("Missing", "x").expect("walk"));
    }

    #[test]
    fn dangling_superclass_is_a_structural_error() {
        let registry = sample_registry();
        let err = registry
            .find_property("Orphan", "x")
            .expect_err("dangling link must fail");
        assert_eq!(
            err,
            ConfigurationError::UnknownSuperclass {
                class: "Orphan".to_string(),
                superclass: "Ghost".to_string(),
            }
        );
    }

    #[test]
    fn reverse_native_lookup() {
        let registry = sample_registry();
        assert_eq!(registry.script_class_for_native("NativeB"), Some("B"));
        assert_eq!(registry.script_class_for_native("Nope"), None);
    }

    #[test]
    fn member_resolution_respects_access_flags() {
        let registry = sample_registry();
        let mut resolver = TableResolver::new();
        resolver.register_member("NativeA", MemberKind::PropertyGetter, "x");
        resolver.register_member("NativeA", MemberKind::PropertySetter, "x");

        let getter = registry
            .resolve_property_getter(&resolver, "B", "x")
            .expect("walk")
            .expect("resolved getter");
        assert_eq!(getter.type_name(), "NativeA");

        // Declared read-only: the setter stays hidden even though the
        // native table carries one.
        assert!(registry
            .resolve_property_setter(&resolver, "B", "x")
            .expect("walk")
            .is_none());
    }

    #[test]
    fn unresolved_member_is_a_miss_during_queries() {
        let registry = sample_registry();
        let resolver = TableResolver::new();
        assert!(registry
            .resolve_function_member(&resolver, "B", "probe")
            .expect("walk")
            .is_none());
    }
}
