//! Declaration inputs for a partition layout.

use std::collections::BTreeSet;

use indexmap::IndexMap;

/// Concrete state values claimed by one alias.
///
/// Ordered so that two declarations compare equal regardless of listing order.
pub type ValueSet = BTreeSet<Box<str>>;

/// Initial groups of a partition and the values each one seeds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupSpec {
	groups: IndexMap<Box<str>, Vec<Box<str>>>,
}

impl GroupSpec {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a group seeded with `values`.
	///
	/// Naming the same group twice appends to its seed list.
	pub fn group<I, V>(mut self, name: impl Into<Box<str>>, values: I) -> Self
	where
		I: IntoIterator<Item = V>,
		V: Into<Box<str>>,
	{
		self.groups
			.entry(name.into())
			.or_default()
			.extend(values.into_iter().map(Into::into));
		self
	}

	/// Iterates groups in declaration order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &[Box<str>])> + '_ {
		self.groups.iter().map(|(name, values)| (&**name, values.as_slice()))
	}

	pub fn len(&self) -> usize {
		self.groups.len()
	}

	pub fn is_empty(&self) -> bool {
		self.groups.is_empty()
	}
}

impl<K, I, V> FromIterator<(K, I)> for GroupSpec
where
	K: Into<Box<str>>,
	I: IntoIterator<Item = V>,
	V: Into<Box<str>>,
{
	fn from_iter<T: IntoIterator<Item = (K, I)>>(iter: T) -> Self {
		iter.into_iter()
			.fold(Self::new(), |spec, (name, values)| spec.group(name, values))
	}
}

/// Explicit alias declarations: alias name to one or many state values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasMap {
	entries: IndexMap<Box<str>, ValueSet>,
}

impl AliasMap {
	pub fn new() -> Self {
		Self::default()
	}

	/// Declares `name` as an alias for `values`, replacing an earlier entry of the same map.
	pub fn alias<I, V>(mut self, name: impl Into<Box<str>>, values: I) -> Self
	where
		I: IntoIterator<Item = V>,
		V: Into<Box<str>>,
	{
		self.entries
			.insert(name.into(), values.into_iter().map(Into::into).collect());
		self
	}

	pub fn get(&self, name: &str) -> Option<&ValueSet> {
		self.entries.get(name)
	}

	/// Iterates entries in declaration order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &ValueSet)> + '_ {
		self.entries.iter().map(|(name, values)| (&**name, values))
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl<K, I, V> FromIterator<(K, I)> for AliasMap
where
	K: Into<Box<str>>,
	I: IntoIterator<Item = V>,
	V: Into<Box<str>>,
{
	fn from_iter<T: IntoIterator<Item = (K, I)>>(iter: T) -> Self {
		iter.into_iter()
			.fold(Self::new(), |map, (name, values)| map.alias(name, values))
	}
}

/// A request to extend a partition with aliases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extension {
	/// One same-named alias for every value seeded by the partition's groups.
	UseDefaults,
	/// The given alias declarations, applied in order.
	Aliases(AliasMap),
}

impl From<AliasMap> for Extension {
	fn from(map: AliasMap) -> Self {
		Self::Aliases(map)
	}
}
