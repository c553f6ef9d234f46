//! Partition index for state-keyed method dispatch.
//!
//! A partition classifies the values of one axis (for example the name of the
//! action currently being handled) into a two-level hierarchy:
//!
//! ```text
//! all                 ← wildcard, always the last resort
//!  └── group          ← coarse bucket seeded by `declare_groups`
//!       └── alias     ← named member set created by `extend`
//!            └── value
//! ```
//!
//! Handlers are registered per `(method, key)` where `key` is an alias, a group
//! or [`WILDCARD`]. Resolution walks the chain of the current value from the most
//! specific key to the wildcard, consulting every inherited layer for each key
//! before moving on to the next one.
//!
//! This crate provides:
//! - [`PartitionIndex`]: the per-axis, per-class table and its resolution logic
//! - [`GroupSpec`], [`AliasMap`], [`Extension`]: declaration inputs
//! - [`PartitionConfig`]: TOML-backed declarative layout
//! - [`PartitionError`]: definition-time failures

mod config;
mod decl;
mod error;
mod index;

pub use config::{ConfigError, OneOrMany, PartitionConfig};
pub use decl::{AliasMap, Extension, GroupSpec, ValueSet};
pub use error::PartitionError;
pub use index::{Chain, Collision, CollisionKind, PartitionIndex, Resolution};

/// Key under which wildcard handlers are registered.
pub const WILDCARD: &str = "all";
