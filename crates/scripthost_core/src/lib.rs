//! Client-profile capability registry for an emulated script host.
//! This crate decides which scriptable capabilities each host class exposes
//! for a given client profile, and how they map onto native members.

pub mod config;
pub mod introspect;
pub mod logging;
pub mod model;
pub mod registry;

pub use config::tree::ConfigNode;
pub use introspect::{
    MemberKind, NativeMember, NativeResolver, NativeType, ResolveError, TableResolver,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::constraint::Constraint;
pub use model::descriptor::{ClassDescriptor, FeatureDescriptor, FeatureKind};
pub use model::profile::{ClientProfile, ProfileIdentity};
pub use registry::builder::build_registry;
pub use registry::cache::RegistryCache;
pub use registry::element_map::{default_element_overrides, StructuralElementMap};
pub use registry::error::{ConfigResult, ConfigurationError};
pub use registry::view::{ChainHit, Registry};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
