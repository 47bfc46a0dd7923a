//! Profile-keyed registry cache with a single-build-per-profile guarantee.
//!
//! # Responsibility
//! - Own the parsed tree, the introspection resolver and the element
//!   override table.
//! - Serve one immutable registry per profile, building at most once even
//!   under concurrent first callers.
//!
//! # Invariants
//! - A failed build is cached; every later query for that profile surfaces
//!   the same structural error without rebuilding.
//! - `reset` requires exclusive access; published registries are otherwise
//!   never discarded.

use crate::config::tree::ConfigNode;
use crate::introspect::NativeResolver;
use crate::model::profile::{ClientProfile, ProfileIdentity};
use crate::registry::builder::build_registry;
use crate::registry::element_map::{
    build_element_map, default_element_overrides, StructuralElementMap,
};
use crate::registry::error::{ConfigResult, ConfigurationError};
use crate::registry::view::Registry;
use log::{error, info};
use once_cell::sync::OnceCell;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

type BuildSlot = Arc<OnceCell<ConfigResult<Arc<Registry>>>>;

/// Explicitly owned registry cache.
///
/// Hosts construct one cache per configuration tree and share it behind an
/// `Arc`; there is no process-global state.
pub struct RegistryCache {
    tree: ConfigNode,
    resolver: Arc<dyn NativeResolver>,
    element_overrides: Vec<(String, String)>,
    slots: Mutex<BTreeMap<String, BuildSlot>>,
    element_map: OnceCell<ConfigResult<Arc<StructuralElementMap>>>,
}

impl RegistryCache {
    /// Creates a cache with the documented default element overrides.
    pub fn new(tree: ConfigNode, resolver: Arc<dyn NativeResolver>) -> Self {
        Self::with_element_overrides(tree, resolver, default_element_overrides())
    }

    /// Creates a cache with a caller-supplied element override table.
    pub fn with_element_overrides(
        tree: ConfigNode,
        resolver: Arc<dyn NativeResolver>,
        element_overrides: Vec<(String, String)>,
    ) -> Self {
        Self {
            tree,
            resolver,
            element_overrides,
            slots: Mutex::new(BTreeMap::new()),
            element_map: OnceCell::new(),
        }
    }

    /// Returns the registry for one concrete profile, building it on first
    /// access. Losers of a first-access race block on the winner's build and
    /// receive the identical instance.
    pub fn registry_for(&self, identity: &ProfileIdentity) -> ConfigResult<Arc<Registry>> {
        self.registry_for_profile(&ClientProfile::Concrete(identity.clone()))
    }

    /// Returns the unconstrained registry: the complete capability
    /// catalogue, ignoring every constraint except explicit exclusion.
    pub fn catalogue(&self) -> ConfigResult<Arc<Registry>> {
        self.registry_for_profile(&ClientProfile::Any)
    }

    /// Returns the structural element map, built at most once per cache.
    pub fn structural_element_map(&self) -> ConfigResult<Arc<StructuralElementMap>> {
        self.element_map
            .get_or_init(|| build_element_map(self))
            .clone()
    }

    /// Returns the script-facing class name backing one native type,
    /// answered against the complete catalogue.
    pub fn script_class_for_native(&self, native_name: &str) -> ConfigResult<String> {
        let catalogue = self.catalogue()?;
        catalogue
            .script_class_for_native(native_name)
            .map(str::to_string)
            .ok_or_else(|| ConfigurationError::UnknownNativeClass(native_name.to_string()))
    }

    /// Discards every cached registry and the element map.
    ///
    /// Exclusive access makes concurrent use during a reset a compile-time
    /// error rather than a race.
    pub fn reset(&mut self) {
        let slots = self
            .slots
            .get_mut()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        slots.clear();
        self.element_map = OnceCell::new();
        info!("event=cache_reset status=ok");
    }

    pub(crate) fn resolver(&self) -> &dyn NativeResolver {
        self.resolver.as_ref()
    }

    pub(crate) fn element_overrides(&self) -> &[(String, String)] {
        &self.element_overrides
    }

    fn registry_for_profile(&self, profile: &ClientProfile) -> ConfigResult<Arc<Registry>> {
        let slot = {
            let mut slots = self
                .slots
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            slots
                .entry(profile.cache_key())
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .clone()
        };

        slot.get_or_init(|| match build_registry(&self.tree, profile) {
            Ok(registry) => Ok(Arc::new(registry)),
            Err(err) => {
                error!(
                    "event=registry_build status=error profile={} error={err}",
                    profile.cache_key()
                );
                Err(err)
            }
        })
        .clone()
    }
}
