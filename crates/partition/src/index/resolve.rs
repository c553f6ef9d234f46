//! Handler resolution through the key chain and the inherited layers.
//!
//! # Precedence
//!
//! 1. Key specificity: the value itself, its owner, each alias the owner falls
//!    back to up to its group, then [`WILDCARD`].
//! 2. Layer: for each key, this class's registrations, then each ancestor's in turn.
//!
//! A more specific key always wins, even when the handler for it was registered
//! on an ancestor and a less specific key is handled by a subclass.

use smallvec::SmallVec;
use tracing::trace;

use super::{PartitionIndex, View};
use crate::WILDCARD;

/// The keys consulted for one state value, most specific first.
///
/// Always ends with [`WILDCARD`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain<'a>(SmallVec<[&'a str; 4]>);

impl<'a> Chain<'a> {
	pub(super) fn build<H>(view: &View<'a, H>, value: &'a str) -> Self {
		let mut keys: SmallVec<[&'a str; 4]> = SmallVec::new();
		keys.push(value);
		let owner = view.owner_of(value).unwrap_or(value);
		if owner != value {
			keys.push(owner);
		}
		let mut key = owner;
		while let Some(parent) = view.parent_of(key) {
			if keys.contains(&parent) {
				break;
			}
			keys.push(parent);
			key = parent;
		}
		if value != WILDCARD {
			keys.push(WILDCARD);
		}
		Self(keys)
	}

	pub fn iter(&self) -> impl Iterator<Item = &'a str> + '_ {
		self.0.iter().copied()
	}

	pub fn as_slice(&self) -> &[&'a str] {
		&self.0
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl std::fmt::Display for Chain<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		for (i, key) in self.0.iter().enumerate() {
			if i > 0 {
				f.write_str(" -> ")?;
			}
			f.write_str(key)?;
		}
		Ok(())
	}
}

/// A resolved handler and where it was found.
#[derive(Debug)]
pub struct Resolution<'a, H> {
	pub handler: &'a H,
	/// The chain key the handler is registered under.
	pub key: &'a str,
	/// Number of layers above the resolving class: 0 for its own registrations.
	pub depth: usize,
}

impl<H> Clone for Resolution<'_, H> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<H> Copy for Resolution<'_, H> {}

impl<H> PartitionIndex<H> {
	/// Resolves `method` for `value`, consulting inherited layers.
	pub fn resolve<'a>(&'a self, method: &str, value: &'a str) -> Option<Resolution<'a, H>> {
		self.resolve_in(method, value, usize::MAX)
	}

	/// Resolves `method` for `value` using this layer's registrations only.
	///
	/// The layout (owners, aliases, groups) is still read through the ancestors.
	pub fn resolve_local<'a>(&'a self, method: &str, value: &'a str) -> Option<Resolution<'a, H>> {
		self.resolve_in(method, value, 1)
	}

	fn resolve_in<'a>(&'a self, method: &str, value: &'a str, max_layers: usize) -> Option<Resolution<'a, H>> {
		let chain = self.chain(value);
		for key in chain.iter() {
			for (depth, layer) in self.layers().take(max_layers).enumerate() {
				if let Some(handler) = layer.handler(method, key) {
					trace!(axis = &*self.axis, method, value, key, depth, "resolved");
					return Some(Resolution { handler, key, depth });
				}
			}
		}
		trace!(axis = &*self.axis, method, value, %chain, "unresolved");
		None
	}

	/// Returns the keys consulted for `value`, most specific first.
	pub fn chain<'a>(&'a self, value: &'a str) -> Chain<'a> {
		Chain::build(&self.view(), value)
	}

	/// Iterates this layer followed by its ancestors.
	pub fn layers(&self) -> impl Iterator<Item = &Self> + '_ {
		std::iter::successors(Some(self), |layer| layer.parent.as_deref())
	}
}
