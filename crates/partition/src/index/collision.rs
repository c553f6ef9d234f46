//! Diagnostics for redeclarations that did not fail.
//!
//! Alias identity conflicts are fatal and surface as
//! [`PartitionError::CannotOverride`](crate::PartitionError::CannotOverride).
//! Everything recorded here was accepted: an idempotent alias redeclaration,
//! a value moving to a new owner, or a handler being replaced.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
	/// Axis of the partition where this happened.
	pub axis: Box<str>,
	/// The alias, value or handler key involved.
	pub key: Box<str>,
	pub kind: CollisionKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollisionKind {
	/// An alias was redeclared with an identical value set.
	AliasRedeclared,
	/// A value changed owner because an alias named after a group listed it.
	ValueReassigned { from: Box<str>, to: Box<str> },
	/// A handler for `(method, key)` replaced an earlier one on the same layer.
	HandlerReplaced { method: Box<str> },
}

impl std::fmt::Display for CollisionKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::AliasRedeclared => write!(f, "alias_redeclared"),
			Self::ValueReassigned { from, to } => write!(f, "value_reassigned({from} -> {to})"),
			Self::HandlerReplaced { method } => write!(f, "handler_replaced({method})"),
		}
	}
}
