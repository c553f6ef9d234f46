//! Declarative state methods.
//!
//! A [`Class`] declares partitions (one per axis), state methods bound to an
//! axis, and handlers for the keys of each partition. Once built, the class is
//! frozen; instances implementing [`Instance`] are dispatched on through the
//! single entry point [`Class::dispatch`].
//!
//! ```rust,ignore
//! let base = Class::builder("Base")
//!     .define_partition("action_name", &groups)?
//!     .extend_partition("action_name", Extension::UseDefaults)?
//!     .state_method("test", "action_name")?
//!     .on("test", WILDCARD, Arity::exact(0), |_, _| Ok(json!(0)))?
//!     .build();
//!
//! let value = base.dispatch(&controller, "test", &[])?;
//! ```

mod class;
mod error;
mod handler;
mod instance;

pub use class::{Bound, Class, ClassBuilder};
pub use error::{DefineError, DispatchError};
pub use handler::{Arity, Handler, HandlerError, handler};
pub use instance::Instance;
pub use serde_json::Value;
pub use stately_partition::{
	AliasMap, Collision, CollisionKind, Extension, GroupSpec, PartitionConfig, PartitionError, PartitionIndex,
	Resolution, WILDCARD,
};
