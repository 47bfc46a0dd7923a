//! Profile-filtered capability registry.
//!
//! # Responsibility
//! - Build immutable per-profile registries from the configuration tree.
//! - Serve inheritance-chain lookups and the structural element map.
//!
//! # Invariants
//! - A published registry is never mutated; rebuilds only follow an
//!   explicit cache reset.
//! - Structural configuration errors fail the whole build, never a partial
//!   registry.

pub mod builder;
pub mod cache;
pub mod element_map;
pub mod error;
pub mod evaluator;
pub mod view;
