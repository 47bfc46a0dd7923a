//! Registry construction from the configuration tree.
//!
//! # Responsibility
//! - Walk `class` nodes in document order and assemble filtered
//!   `ClassDescriptor`s for one profile.
//! - Resolve superclass links into arena parent indexes.
//!
//! # Invariants
//! - Filtering happens at feature granularity at build time, never at
//!   query time.
//! - Any structural error aborts the whole build; no partial registry is
//!   ever returned.

use crate::config::tree::{
    ConfigNode, ATTR_CONSTRUCTOR, ATTR_ELEMENT, ATTR_EXTENDS, ATTR_HOST_OBJECT, ATTR_MAX_VERSION,
    ATTR_MIN_VERSION, ATTR_NAME, ATTR_NATIVE, ATTR_NOT_IMPLEMENTED, ATTR_READABLE, ATTR_WRITABLE,
    NODE_BROWSER, NODE_CLASS, NODE_CONFIGURATION, NODE_CONSTANT, NODE_DOC, NODE_ENGINE,
    NODE_FUNCTION, NODE_PROPERTY,
};
use crate::model::constraint::Constraint;
use crate::model::descriptor::{ClassDescriptor, FeatureDescriptor, FeatureKind};
use crate::model::profile::ClientProfile;
use crate::registry::error::{ConfigResult, ConfigurationError};
use crate::registry::evaluator::{constraints_admit, feature_included};
use crate::registry::view::{ParentLink, Registry};
use log::{debug, info};
use std::collections::BTreeMap;

/// Builds one immutable registry for one profile.
///
/// The tree root must be a `configuration` node whose children are `class`
/// declarations (plus ignorable `doc` nodes).
pub fn build_registry(tree: &ConfigNode, profile: &ClientProfile) -> ConfigResult<Registry> {
    if tree.kind != NODE_CONFIGURATION {
        return Err(ConfigurationError::UnrecognizedNode {
            parent: String::new(),
            kind: tree.kind.clone(),
        });
    }

    let mut classes: Vec<ClassDescriptor> = Vec::new();
    let mut by_name: BTreeMap<String, usize> = BTreeMap::new();
    let mut by_native: BTreeMap<String, String> = BTreeMap::new();

    for node in &tree.children {
        match node.kind.as_str() {
            NODE_CLASS => {
                let Some(class) = parse_class(node, profile)? else {
                    continue;
                };
                if by_name.contains_key(&class.script_name) {
                    return Err(ConfigurationError::DuplicateClass(class.script_name));
                }
                if let Some(first) = by_native.get(&class.native_name) {
                    return Err(ConfigurationError::AmbiguousNativeClass {
                        native: class.native_name.clone(),
                        first: first.clone(),
                        second: class.script_name,
                    });
                }
                by_native.insert(class.native_name.clone(), class.script_name.clone());
                by_name.insert(class.script_name.clone(), classes.len());
                classes.push(class);
            }
            NODE_DOC => {}
            other => {
                return Err(ConfigurationError::UnrecognizedNode {
                    parent: NODE_CONFIGURATION.to_string(),
                    kind: other.to_string(),
                })
            }
        }
    }

    let parents = link_parents(&classes, &by_name)?;

    info!(
        "event=registry_build status=ok profile={} classes={}",
        profile.cache_key(),
        classes.len()
    );

    Ok(Registry::new(
        profile.clone(),
        classes,
        by_name,
        by_native,
        parents,
    ))
}

/// Parses one class node. Returns `None` when the class is opted out or
/// excluded by its own constraints for this profile.
fn parse_class(node: &ConfigNode, profile: &ClientProfile) -> ConfigResult<Option<ClassDescriptor>> {
    if node.flag(ATTR_NOT_IMPLEMENTED) {
        return Ok(None);
    }

    let script_name = require_attr(node, ATTR_NAME)?;
    let native_name = require_attr(node, ATTR_NATIVE)?;

    let mut class = ClassDescriptor::new(script_name, native_name);
    class.superclass_name = node.attr(ATTR_EXTENDS).to_string();
    class.host_object = node.flag(ATTR_HOST_OBJECT);
    class.constructor_name = optional_attr(node, ATTR_CONSTRUCTOR);
    class.element_kind = optional_attr(node, ATTR_ELEMENT);

    let mut class_constraints: Vec<Constraint> = Vec::new();

    for child in &node.children {
        match child.kind.as_str() {
            NODE_PROPERTY => {
                if let Some(feature) = parse_feature(child, FeatureKind::Property, profile)? {
                    class.insert_feature(feature);
                }
            }
            NODE_FUNCTION => {
                if let Some(feature) = parse_feature(child, FeatureKind::Function, profile)? {
                    class.insert_feature(feature);
                }
            }
            NODE_CONSTANT => {
                if let Some(feature) = parse_feature(child, FeatureKind::Constant, profile)? {
                    class.insert_feature(feature);
                }
            }
            NODE_BROWSER | NODE_ENGINE => {
                class_constraints.push(parse_constraint(child)?);
            }
            NODE_DOC => {}
            other => {
                return Err(ConfigurationError::UnrecognizedNode {
                    parent: class.script_name.clone(),
                    kind: other.to_string(),
                })
            }
        }
    }

    if !constraints_admit(&class_constraints, profile) {
        debug!(
            "event=class_excluded profile={} class={}",
            profile.cache_key(),
            class.script_name
        );
        return Ok(None);
    }

    Ok(Some(class))
}

/// Parses one feature node. Returns `None` when the feature is excluded for
/// this profile.
fn parse_feature(
    node: &ConfigNode,
    kind: FeatureKind,
    profile: &ClientProfile,
) -> ConfigResult<Option<FeatureDescriptor>> {
    let name = require_attr(node, ATTR_NAME)?;

    let mut feature = match kind {
        FeatureKind::Property => FeatureDescriptor::property(
            name,
            node.flag(ATTR_READABLE),
            node.flag(ATTR_WRITABLE),
        ),
        FeatureKind::Function => FeatureDescriptor::function(name),
        FeatureKind::Constant => FeatureDescriptor::constant(name),
    };
    feature.excluded = node.flag(ATTR_NOT_IMPLEMENTED);

    for child in &node.children {
        match child.kind.as_str() {
            NODE_BROWSER | NODE_ENGINE => feature.constraints.push(parse_constraint(child)?),
            NODE_DOC => {}
            other => {
                return Err(ConfigurationError::UnrecognizedNode {
                    parent: format!("{}/{}", kind.as_str(), feature.name),
                    kind: other.to_string(),
                })
            }
        }
    }

    if feature_included(&feature, profile) {
        Ok(Some(feature))
    } else {
        Ok(None)
    }
}

fn parse_constraint(node: &ConfigNode) -> ConfigResult<Constraint> {
    let min_version = version_attr(node, ATTR_MIN_VERSION)?;
    let max_version = version_attr(node, ATTR_MAX_VERSION)?;
    if node.kind == NODE_BROWSER {
        Ok(Constraint::Identity {
            name: require_attr(node, ATTR_NAME)?,
            min_version,
            max_version,
        })
    } else {
        Ok(Constraint::Engine {
            min_version,
            max_version,
        })
    }
}

fn link_parents(
    classes: &[ClassDescriptor],
    by_name: &BTreeMap<String, usize>,
) -> ConfigResult<Vec<ParentLink>> {
    let parents: Vec<ParentLink> = classes
        .iter()
        .map(|class| {
            if class.is_root() {
                ParentLink::Root
            } else {
                match by_name.get(&class.superclass_name) {
                    Some(&index) => ParentLink::Linked(index),
                    // Declared but filtered out for this profile; chain walks
                    // through this link surface a structural error.
                    None => ParentLink::Unresolved(class.superclass_name.clone()),
                }
            }
        })
        .collect();

    for (start, class) in classes.iter().enumerate() {
        let mut index = start;
        let mut steps = 0usize;
        while let ParentLink::Linked(parent) = parents[index] {
            index = parent;
            steps += 1;
            if steps > classes.len() {
                return Err(ConfigurationError::SuperclassCycle(
                    class.script_name.clone(),
                ));
            }
        }
    }

    Ok(parents)
}

fn require_attr(node: &ConfigNode, attribute: &str) -> ConfigResult<String> {
    let value = node.attr(attribute);
    if value.is_empty() {
        return Err(ConfigurationError::InvalidAttribute {
            node: node.kind.clone(),
            attribute: attribute.to_string(),
            value: String::new(),
        });
    }
    Ok(value.to_string())
}

fn optional_attr(node: &ConfigNode, attribute: &str) -> Option<String> {
    let value = node.attr(attribute);
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn version_attr(node: &ConfigNode, attribute: &str) -> ConfigResult<Option<f64>> {
    node.version_attr(attribute)
        .map_err(|_| ConfigurationError::InvalidAttribute {
            node: node.kind.clone(),
            attribute: attribute.to_string(),
            value: node.attr(attribute).to_string(),
        })
}
