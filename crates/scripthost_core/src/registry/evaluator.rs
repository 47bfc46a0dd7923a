//! Constraint evaluation: decides descriptor inclusion per profile.
//!
//! # Responsibility
//! - Apply the exclusion flag, the unconstrained-profile rule, and the
//!   AND-across-kinds / OR-within-kind constraint combination.
//!
//! # Invariants
//! - An excluded descriptor is never included, not even for the
//!   unconstrained profile.
//! - An empty constraint-kind group imposes no restriction.

use crate::model::constraint::Constraint;
use crate::model::descriptor::FeatureDescriptor;
use crate::model::profile::ClientProfile;

/// Returns whether a feature declaration is included for one profile.
pub fn feature_included(feature: &FeatureDescriptor, profile: &ClientProfile) -> bool {
    if feature.excluded {
        return false;
    }
    constraints_admit(&feature.constraints, profile)
}

/// Returns whether a constraint set admits one profile.
///
/// Within each constraint kind at least one constraint must match; kinds
/// with no declared constraints are vacuously satisfied. The unconstrained
/// profile is admitted by every constraint set.
pub fn constraints_admit(constraints: &[Constraint], profile: &ClientProfile) -> bool {
    let identity = match profile {
        ClientProfile::Any => return true,
        ClientProfile::Concrete(identity) => identity,
    };

    let mut identity_declared = false;
    let mut identity_admitted = false;
    let mut engine_declared = false;
    let mut engine_admitted = false;

    for constraint in constraints {
        if constraint.is_identity() {
            identity_declared = true;
            if constraint.admits(identity) {
                identity_admitted = true;
            }
        } else {
            engine_declared = true;
            if constraint.admits(identity) {
                engine_admitted = true;
            }
        }
    }

    (!identity_declared || identity_admitted) && (!engine_declared || engine_admitted)
}
