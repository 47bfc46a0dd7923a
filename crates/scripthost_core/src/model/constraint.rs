//! Profile constraints declared on capability descriptors.
//!
//! # Responsibility
//! - Represent identity and engine-version constraints with optional
//!   inclusive version bounds.
//! - Decide whether one constraint admits one concrete profile identity.
//!
//! # Invariants
//! - An absent bound means unbounded on that side; a declared bound of `0.0`
//!   is a real bound, never shorthand for "unset".
//! - Bounds are inclusive at both ends.

use crate::model::profile::ProfileIdentity;
use serde::{Deserialize, Serialize};

/// One declared constraint over a client profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Constraint {
    /// Admits profiles matching a declared name (exactly or via a declared
    /// alias) whose client version falls within the range.
    Identity {
        name: String,
        min_version: Option<f64>,
        max_version: Option<f64>,
    },
    /// Admits profiles whose scripting-engine version falls within the range.
    Engine {
        min_version: Option<f64>,
        max_version: Option<f64>,
    },
}

impl Constraint {
    /// Returns whether this is an identity (named) constraint.
    pub fn is_identity(&self) -> bool {
        matches!(self, Self::Identity { .. })
    }

    /// Returns whether this constraint admits the given identity.
    pub fn admits(&self, identity: &ProfileIdentity) -> bool {
        match self {
            Self::Identity {
                name,
                min_version,
                max_version,
            } => {
                identity.matches_name(name)
                    && version_in_range(identity.version, *min_version, *max_version)
            }
            Self::Engine {
                min_version,
                max_version,
            } => version_in_range(identity.engine_version, *min_version, *max_version),
        }
    }
}

fn version_in_range(value: f64, min: Option<f64>, max: Option<f64>) -> bool {
    if let Some(min) = min {
        if value < min {
            return false;
        }
    }
    if let Some(max) = max {
        if value > max {
            return false;
        }
    }
    true
}
