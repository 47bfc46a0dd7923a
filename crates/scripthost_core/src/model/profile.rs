//! Client profile identity.
//!
//! # Responsibility
//! - Identify the (application, client version, engine version) tuple a
//!   capability query is resolved against.
//! - Carry the declared alias names that let one profile match constraints
//!   written for a family name.
//!
//! # Invariants
//! - A profile is immutable once constructed.
//! - `ClientProfile::Any` matches every declared capability and is only used
//!   to build the complete catalogue; capability queries take a
//!   `ProfileIdentity` and can never observe it.

use serde::{Deserialize, Serialize};

/// Application name reported by Firefox-family profiles.
pub const FIREFOX_APPLICATION_NAME: &str = "Netscape";

/// Alias name matched by Firefox-family profiles in identity constraints.
///
/// This is a deliberate, fixed alias table with a single entry: constraints
/// declared for `"Firefox"` also admit profiles whose application name is
/// `"Netscape"` when the profile declares the alias. No other family
/// inference is performed.
pub const FIREFOX_FAMILY_ALIAS: &str = "Firefox";

/// Application name reported by Internet Explorer profiles.
pub const INTERNET_EXPLORER_APPLICATION_NAME: &str = "Microsoft Internet Explorer";

/// Profile a registry is built for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientProfile {
    /// Unconstrained profile: includes every non-excluded declaration.
    Any,
    /// A concrete client identity.
    Concrete(ProfileIdentity),
}

impl ClientProfile {
    /// Returns whether this is the unconstrained profile.
    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    /// Returns the concrete identity, if any.
    pub fn identity(&self) -> Option<&ProfileIdentity> {
        match self {
            Self::Any => None,
            Self::Concrete(identity) => Some(identity),
        }
    }

    /// Stable key for profile-keyed caches.
    ///
    /// Distinct identities must produce distinct keys; the unconstrained
    /// profile reserves `"*"`.
    pub(crate) fn cache_key(&self) -> String {
        match self {
            Self::Any => "*".to_string(),
            Self::Concrete(identity) => identity.cache_key(),
        }
    }
}

/// Concrete client identity: application name, declared alias names, client
/// version and scripting-engine version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileIdentity {
    /// Application name as the client reports it.
    pub application_name: String,
    /// Additional declared names this profile matches in identity
    /// constraints. Populated by preset constructors, never inferred.
    pub alias_names: Vec<String>,
    /// Numeric client version.
    pub version: f64,
    /// Numeric scripting-engine version.
    pub engine_version: f64,
}

impl ProfileIdentity {
    /// Creates an identity with no alias names.
    pub fn new(application_name: impl Into<String>, version: f64, engine_version: f64) -> Self {
        Self {
            application_name: application_name.into(),
            alias_names: Vec::new(),
            version,
            engine_version,
        }
    }

    /// Adds one declared alias name.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias_names.push(alias.into());
        self
    }

    /// Firefox-family preset: application name `"Netscape"` with the
    /// documented `"Firefox"` alias declared.
    pub fn firefox(version: f64, engine_version: f64) -> Self {
        Self::new(FIREFOX_APPLICATION_NAME, version, engine_version)
            .with_alias(FIREFOX_FAMILY_ALIAS)
    }

    /// Internet Explorer preset.
    pub fn internet_explorer(version: f64, engine_version: f64) -> Self {
        Self::new(INTERNET_EXPLORER_APPLICATION_NAME, version, engine_version)
    }

    /// Returns whether a declared constraint name matches this identity,
    /// either exactly or through a declared alias.
    pub fn matches_name(&self, declared_name: &str) -> bool {
        self.application_name == declared_name
            || self.alias_names.iter().any(|alias| alias == declared_name)
    }

    fn cache_key(&self) -> String {
        format!(
            "{}|{}|{}|{}",
            self.application_name,
            self.version,
            self.engine_version,
            self.alias_names.join(",")
        )
    }
}
