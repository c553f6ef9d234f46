//! Declarative partition layout loaded from TOML.
//!
//! ```toml
//! defaults = true
//!
//! [groups]
//! C = ["new", "create"]
//! R = ["show", "index"]
//!
//! [aliases]
//! R = "list"
//! feed = ["rss", "atom"]
//! ```
//!
//! Layers are applied in a fixed order: groups, then the default aliases, then
//! the explicit aliases.

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;

use crate::{AliasMap, Extension, GroupSpec, PartitionError, PartitionIndex};

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("invalid partition config: {0}")]
	Parse(#[from] toml::de::Error),
	#[error(transparent)]
	Partition(#[from] PartitionError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartitionConfig {
	/// Apply one same-named alias per seeded value before `aliases`.
	#[serde(default)]
	pub defaults: bool,
	#[serde(default)]
	pub groups: IndexMap<String, Vec<String>>,
	#[serde(default)]
	pub aliases: IndexMap<String, OneOrMany>,
}

/// An alias target written either as a single value or a list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
	One(String),
	Many(Vec<String>),
}

impl OneOrMany {
	fn values(&self) -> &[String] {
		match self {
			Self::One(value) => std::slice::from_ref(value),
			Self::Many(values) => values,
		}
	}
}

impl PartitionConfig {
	pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(content)?)
	}

	pub fn group_spec(&self) -> GroupSpec {
		self.groups
			.iter()
			.map(|(name, values)| (name.as_str(), values.iter().map(String::as_str)))
			.collect()
	}

	pub fn alias_map(&self) -> AliasMap {
		self.aliases
			.iter()
			.map(|(name, target)| (name.as_str(), target.values().iter().map(String::as_str)))
			.collect()
	}

	/// Extensions this config applies, in order.
	pub fn extensions(&self) -> Vec<Extension> {
		let mut extensions = Vec::with_capacity(2);
		if self.defaults {
			extensions.push(Extension::UseDefaults);
		}
		if !self.aliases.is_empty() {
			extensions.push(Extension::Aliases(self.alias_map()));
		}
		extensions
	}

	/// Applies the layout to `index`.
	///
	/// Groups are only declared when the config lists any, so a config holding
	/// just aliases can extend a derived index.
	pub fn apply<H>(&self, index: &mut PartitionIndex<H>) -> Result<(), PartitionError> {
		if !self.groups.is_empty() {
			index.declare_groups(&self.group_spec())?;
		}
		for extension in self.extensions() {
			index.extend(&extension)?;
		}
		Ok(())
	}
}
