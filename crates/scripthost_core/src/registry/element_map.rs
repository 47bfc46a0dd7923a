//! Structural element kind to host class mapping.
//!
//! # Responsibility
//! - Derive, from the unconstrained catalogue, which host class backs each
//!   declared structural element kind.
//! - Apply the documented override table that collapses related kinds onto
//!   one shared host class.
//!
//! # Invariants
//! - Every declared element kind must resolve through the introspection
//!   collaborator; an inconsistent configuration fails the build instead of
//!   silently degrading.
//! - Shadow classes are never the recorded answer; the walk always lands on
//!   a host-object class.

use crate::registry::cache::RegistryCache;
use crate::registry::error::{ConfigResult, ConfigurationError};
use log::{debug, info};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Default override table: related element kinds share one host class.
///
/// Mirrors the host classes scripts observe: every heading level presents as
/// the heading element class, inline and block quotations share the quote
/// class, and the three table sections share the table-section class.
const DEFAULT_ELEMENT_OVERRIDES: &[(&str, &str)] = &[
    ("h1", "HTMLHeadingElement"),
    ("h2", "HTMLHeadingElement"),
    ("h3", "HTMLHeadingElement"),
    ("h4", "HTMLHeadingElement"),
    ("h5", "HTMLHeadingElement"),
    ("h6", "HTMLHeadingElement"),
    ("q", "HTMLQuoteElement"),
    ("blockquote", "HTMLQuoteElement"),
    ("thead", "HTMLTableSectionElement"),
    ("tbody", "HTMLTableSectionElement"),
    ("tfoot", "HTMLTableSectionElement"),
];

/// Returns the default element override table as owned pairs.
pub fn default_element_overrides() -> Vec<(String, String)> {
    DEFAULT_ELEMENT_OVERRIDES
        .iter()
        .map(|(kind, class)| (kind.to_string(), class.to_string()))
        .collect()
}

/// Immutable mapping from structural element kind to host class name.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuralElementMap {
    entries: BTreeMap<String, String>,
}

impl StructuralElementMap {
    /// Returns the host class backing one element kind.
    pub fn host_class(&self, element_kind: &str) -> Option<&str> {
        self.entries.get(element_kind).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates (element kind, host class) pairs in kind order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(kind, class)| (kind.as_str(), class.as_str()))
    }
}

pub(crate) fn build_element_map(
    cache: &RegistryCache,
) -> ConfigResult<Arc<StructuralElementMap>> {
    let catalogue = cache.catalogue()?;
    let mut entries: BTreeMap<String, String> = BTreeMap::new();

    for script_name in catalogue.class_names() {
        let class = catalogue
            .class_descriptor(script_name)
            .ok_or_else(|| ConfigurationError::UnknownClass(script_name.to_string()))?;
        let Some(element_kind) = &class.element_kind else {
            continue;
        };

        // Validate the declared link before recording it.
        cache
            .resolver()
            .resolve_type(element_kind)
            .map_err(|error| ConfigurationError::ElementKindUnresolved {
                kind: element_kind.clone(),
                class: class.script_name.clone(),
                error,
            })?;

        let host = catalogue.host_ancestor(script_name)?;
        debug!(
            "event=element_map_entry kind={} class={}",
            element_kind, host.script_name
        );
        entries.insert(element_kind.clone(), host.script_name.clone());
    }

    for (element_kind, script_name) in cache.element_overrides() {
        if catalogue.class_descriptor(script_name).is_none() {
            return Err(ConfigurationError::UnknownClass(script_name.clone()));
        }
        entries.insert(element_kind.clone(), script_name.clone());
    }

    info!(
        "event=element_map_build status=ok entries={}",
        entries.len()
    );
    Ok(Arc::new(StructuralElementMap { entries }))
}
