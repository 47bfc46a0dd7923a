//! Parsed configuration tree consumed by the registry builder.
//!
//! The serialization of the configuration source is an external concern;
//! this module only defines the attributed node tree shape the core reads.

pub mod tree;
