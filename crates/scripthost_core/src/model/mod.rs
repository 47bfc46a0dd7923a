//! Declarative data model for the capability registry.
//!
//! # Responsibility
//! - Define client profile identity used to resolve capability queries.
//! - Define constraint and descriptor records parsed from configuration.
//!
//! # Invariants
//! - Every descriptor is identified by a declared name, never generated.
//! - Descriptors are plain records prior to profile filtering; the filtered
//!   view lives in the registry module.

pub mod constraint;
pub mod descriptor;
pub mod profile;
