//! Per-axis partition index.
//!
//! # Mental Model
//!
//! A [`PartitionIndex`] is one layer: the registrations made by a single class for
//! a single axis. A subclass gets a derived layer that points at its parent's
//! frozen index. Layout lookups (who owns a value, which key an alias falls back to)
//! read the local layer first, then the ancestors.
//!
//! # Invariants
//!
//! - Every value has at most one owner in the effective layout.
//!   - Enforced in: `insert::insert_alias` (ownership is overwritten, never duplicated).
//! - An alias only claims unowned values, unless it is named after a group.
//!   - Enforced in: `insert::insert_alias`.
//!   - Failure symptom: [`PartitionError::CannotOverride`] naming the claimed value.
//! - Alias parents point at keys that existed before the alias, so parent paths
//!   are finite.
//!   - Enforced in: `insert::insert_alias`.
//! - [`WILDCARD`] is never a group, alias or value.
//!   - Enforced in: [`PartitionIndex::declare_groups`], `insert::insert_alias`.
//! - An alias keeps the value set of its first declaration.
//!   - Enforced in: `insert::insert_alias`.
//!   - Failure symptom: [`PartitionError::CannotOverride`].
//! - An `extend` call applies completely or not at all.
//!   - Enforced in: [`PartitionIndex::extend`] (staged layout swap).

mod collision;
mod insert;
mod resolve;

use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use tracing::debug;

pub use collision::{Collision, CollisionKind};
pub use resolve::{Chain, Resolution};

use crate::decl::{Extension, GroupSpec, ValueSet};
use crate::{PartitionError, WILDCARD};


type Map<K, V> = FxHashMap<K, V>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AliasEntry {
	pub(crate) values: ValueSet,
	/// Key the alias falls back to: the previous owner of its name. `None` for a
	/// singleton or group-named alias.
	pub(crate) parent: Option<Box<str>>,
}

/// Structural part of one layer. Cloned to stage an `extend` call.
#[derive(Debug, Clone, Default)]
pub(crate) struct Layout {
	pub(crate) groups: IndexMap<Box<str>, Vec<Box<str>>>,
	pub(crate) aliases: IndexMap<Box<str>, AliasEntry>,
	pub(crate) owners: Map<Box<str>, Box<str>>,
}

impl Layout {
	fn is_empty(&self) -> bool {
		self.groups.is_empty() && self.aliases.is_empty()
	}
}

/// Layered read access: a (possibly staged) local layout over the ancestors.
pub(crate) struct View<'a, H> {
	local: &'a Layout,
	parent: Option<&'a PartitionIndex<H>>,
}

impl<'a, H> View<'a, H> {
	pub(crate) fn new(local: &'a Layout, parent: Option<&'a PartitionIndex<H>>) -> Self {
		Self { local, parent }
	}

	fn parent_view(&self) -> Option<View<'a, H>> {
		self.parent.map(PartitionIndex::view)
	}

	pub(crate) fn alias(&self, name: &str) -> Option<&'a AliasEntry> {
		self.alias_entry(name).map(|(_, entry)| entry)
	}

	fn alias_entry(&self, name: &str) -> Option<(&'a str, &'a AliasEntry)> {
		self.local
			.aliases
			.get_key_value(name)
			.map(|(key, entry)| (&**key, entry))
			.or_else(|| self.parent_view()?.alias_entry(name))
	}

	pub(crate) fn is_group(&self, name: &str) -> bool {
		self.local.groups.contains_key(name) || self.parent_view().is_some_and(|p| p.is_group(name))
	}

	pub(crate) fn owner_of(&self, value: &str) -> Option<&'a str> {
		self.local
			.owners
			.get(value)
			.map(|owner| &**owner)
			.or_else(|| self.parent_view()?.owner_of(value))
	}

	/// Returns the key an alias falls back to.
	pub(crate) fn parent_of(&self, key: &str) -> Option<&'a str> {
		self.alias(key)?.parent.as_deref()
	}

	/// Returns the root of an alias's parent path: a group, or the topmost alias.
	pub(crate) fn group_of(&self, key: &str) -> Option<&'a str> {
		let (mut root, _) = self.alias_entry(key)?;
		while let Some(parent) = self.parent_of(root) {
			root = parent;
		}
		Some(root)
	}

	fn has_layout(&self) -> bool {
		!self.local.is_empty() || self.parent_view().is_some_and(|p| p.has_layout())
	}

	/// Values seeded by groups, ancestors first, each value once.
	fn seeded_values(&self) -> Vec<&'a str> {
		let mut values = self.parent_view().map(|p| p.seeded_values()).unwrap_or_default();
		for seeds in self.local.groups.values() {
			for value in seeds {
				if !values.contains(&&**value) {
					values.push(value);
				}
			}
		}
		values
	}
}

/// Group, alias and handler bindings for one axis of one class.
///
/// `H` is the handler type; the index never calls handlers, it only finds them.
pub struct PartitionIndex<H> {
	axis: Box<str>,
	parent: Option<Arc<PartitionIndex<H>>>,
	layout: Layout,
	handlers: Map<Box<str>, Map<Box<str>, H>>,
	collisions: Vec<Collision>,
}

impl<H> PartitionIndex<H> {
	/// Creates an empty root index for `axis`.
	pub fn new(axis: impl Into<Box<str>>) -> Self {
		Self {
			axis: axis.into(),
			parent: None,
			layout: Layout::default(),
			handlers: Map::default(),
			collisions: Vec::new(),
		}
	}

	/// Creates an empty layer on top of a frozen ancestor index.
	pub fn derive(parent: Arc<PartitionIndex<H>>) -> Self {
		Self {
			axis: parent.axis.clone(),
			parent: Some(parent),
			layout: Layout::default(),
			handlers: Map::default(),
			collisions: Vec::new(),
		}
	}

	pub fn axis(&self) -> &str {
		&self.axis
	}

	pub fn parent(&self) -> Option<&Arc<PartitionIndex<H>>> {
		self.parent.as_ref()
	}

	pub(crate) fn view(&self) -> View<'_, H> {
		View::new(&self.layout, self.parent.as_deref())
	}

	/// Seeds the initial groups of the partition.
	///
	/// Allowed once per axis across the class hierarchy, before any extension.
	pub fn declare_groups(&mut self, spec: &GroupSpec) -> Result<(), PartitionError> {
		if self.view().has_layout() {
			return Err(PartitionError::GroupsAlreadyDeclared {
				axis: self.axis.clone(),
			});
		}

		let mut staged = Layout::default();
		for (group, seeds) in spec.iter() {
			if group == WILDCARD {
				return Err(PartitionError::ReservedName { name: group.into() });
			}
			for value in seeds {
				if &**value == WILDCARD {
					return Err(PartitionError::ReservedName { name: value.clone() });
				}
				match staged.owners.get(value) {
					Some(first) if &**first != group => {
						return Err(PartitionError::DuplicateSeed {
							value: value.clone(),
							first: first.clone(),
							second: group.into(),
						});
					}
					_ => {
						staged.owners.insert(value.clone(), group.into());
					}
				}
			}
			staged.groups.insert(group.into(), seeds.to_vec());
		}

		debug!(axis = &*self.axis, groups = spec.len(), "groups declared");
		self.layout = staged;
		Ok(())
	}

	/// Extends the partition with aliases.
	///
	/// Fails with [`PartitionError::CannotOverride`] if an alias already exists
	/// with a different value set or claims a value owned elsewhere. On failure nothing of this call is applied.
	pub fn extend(&mut self, extension: &Extension) -> Result<(), PartitionError> {
		let entries: Vec<(Box<str>, ValueSet)> = match extension {
			Extension::UseDefaults => self
				.view()
				.seeded_values()
				.into_iter()
				.map(|value| (Box::from(value), ValueSet::from([Box::from(value)])))
				.collect(),
			Extension::Aliases(map) => map
				.iter()
				.map(|(name, values)| (Box::from(name), values.clone()))
				.collect(),
		};

		let mut staged = self.layout.clone();
		let mut collisions = Vec::new();
		for (name, values) in entries {
			insert::insert_alias(
				&mut staged,
				self.parent.as_deref(),
				&self.axis,
				name,
				values,
				&mut collisions,
			)?;
		}

		self.layout = staged;
		self.collisions.extend(collisions);
		Ok(())
	}

	/// Binds `handler` to `method` for `key` on this layer.
	///
	/// Returns the handler it replaced, if any. Handlers are not subject to alias
	/// identity checks; the last registration wins.
	pub fn register_handler(
		&mut self,
		method: impl Into<Box<str>>,
		key: impl Into<Box<str>>,
		handler: H,
	) -> Option<H> {
		let method = method.into();
		let key = key.into();
		let previous = self
			.handlers
			.entry(method.clone())
			.or_default()
			.insert(key.clone(), handler);
		if previous.is_some() {
			debug!(axis = &*self.axis, method = &*method, key = &*key, "handler replaced");
			self.collisions.push(Collision {
				axis: self.axis.clone(),
				key,
				kind: CollisionKind::HandlerReplaced { method },
			});
		}
		previous
	}

	/// Returns the handler registered on this layer for `(method, key)`.
	pub fn handler(&self, method: &str, key: &str) -> Option<&H> {
		self.handlers.get(method)?.get(key)
	}

	/// Returns whether this layer registers any handler for `method`.
	pub fn handles(&self, method: &str) -> bool {
		self.handlers.get(method).is_some_and(|keys| !keys.is_empty())
	}

	/// Returns the alias or group currently owning `value`.
	pub fn owner_of(&self, value: &str) -> Option<&str> {
		self.view().owner_of(value)
	}

	/// Returns the key an alias falls back to, if it has one.
	pub fn parent_of(&self, alias: &str) -> Option<&str> {
		self.view().parent_of(alias)
	}

	/// Returns the group at the top of an alias's parent path.
	///
	/// A singleton or group-named alias is its own group.
	pub fn group_of(&self, alias: &str) -> Option<&str> {
		self.view().group_of(alias)
	}

	/// Returns the value set an alias was declared with.
	pub fn alias_values(&self, alias: &str) -> Option<&ValueSet> {
		self.view().alias(alias).map(|entry| &entry.values)
	}

	pub fn is_group(&self, name: &str) -> bool {
		self.view().is_group(name)
	}

	pub fn is_alias(&self, name: &str) -> bool {
		self.view().alias(name).is_some()
	}

	/// Returns whether groups or aliases exist on this layer or an ancestor.
	pub fn has_layout(&self) -> bool {
		self.view().has_layout()
	}

	/// Returns group names of the effective layout, ancestors first.
	pub fn groups(&self) -> Vec<&str> {
		let mut names: Vec<&str> = self.parent.as_deref().map(|p| p.groups()).unwrap_or_default();
		names.extend(self.layout.groups.keys().map(|name| &**name));
		names
	}

	/// Returns alias names of the effective layout, ancestors first.
	pub fn aliases(&self) -> Vec<&str> {
		let mut names: Vec<&str> = self.parent.as_deref().map(|p| p.aliases()).unwrap_or_default();
		for name in self.layout.aliases.keys() {
			if !names.contains(&&**name) {
				names.push(name);
			}
		}
		names
	}

	/// Returns diagnostics recorded on this layer.
	pub fn collisions(&self) -> &[Collision] {
		&self.collisions
	}
}

impl<H> std::fmt::Debug for PartitionIndex<H> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let mut methods: Vec<_> = self.handlers.keys().collect();
		methods.sort();
		f.debug_struct("PartitionIndex")
			.field("axis", &self.axis)
			.field("groups", &self.layout.groups)
			.field("aliases", &self.layout.aliases)
			.field("methods", &methods)
			.field("parent", &self.parent)
			.finish()
	}
}

/// Dumps the effective layout, one line per group, alias and owned value.
impl<H> std::fmt::Display for PartitionIndex<H> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		writeln!(f, "partition {}", self.axis)?;
		for group in self.groups() {
			writeln!(f, "  group {group}")?;
		}
		let view = self.view();
		for alias in self.aliases() {
			if let Some(entry) = view.alias(alias) {
				let values: Vec<&str> = entry.values.iter().map(|v| &**v).collect();
				match &entry.parent {
					Some(parent) => writeln!(f, "  alias {alias} -> {parent}: {}", values.join(", "))?,
					None => writeln!(f, "  alias {alias}: {}", values.join(", "))?,
				}
			}
		}
		let mut values: Vec<&str> = self
			.layers()
			.flat_map(|layer| layer.layout.owners.keys())
			.map(|value| &**value)
			.collect();
		values.sort_unstable();
		values.dedup();
		for value in values {
			writeln!(f, "  value {}", self.chain(value))?;
		}
		Ok(())
	}
}
