use thiserror::Error;

/// Errors raised while declaring a partition layout.
///
/// All of these surface at definition time. Nothing in this enum is ever
/// produced by resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PartitionError {
	/// An alias was redeclared with a different value set than its first declaration,
	/// or a new alias claimed a value that already has an owner.
	///
	/// For a claimed value, `alias` is the value, `existing` its owner and
	/// `incoming` the claiming alias.
	#[error("cannot override {alias}: declared as {existing:?}, redeclared as {incoming:?}")]
	CannotOverride {
		alias: Box<str>,
		existing: Vec<Box<str>>,
		incoming: Vec<Box<str>>,
	},
	/// Groups may only be declared once per axis, before any extension.
	#[error("partition {axis:?} already has a layout; groups must be declared first and only once")]
	GroupsAlreadyDeclared { axis: Box<str> },
	/// The same value was seeded into two groups.
	#[error("value {value:?} seeded into both {first:?} and {second:?}")]
	DuplicateSeed {
		value: Box<str>,
		first: Box<str>,
		second: Box<str>,
	},
	/// An alias must name at least one value.
	#[error("alias {alias:?} lists no state values")]
	EmptyAlias { alias: Box<str> },
	/// The wildcard key cannot be declared as a group, alias or value.
	#[error("{name:?} is reserved for the wildcard")]
	ReservedName { name: Box<str> },
}

impl PartitionError {
	/// Returns the alias or value named by a [`PartitionError::CannotOverride`].
	pub fn conflicting_alias(&self) -> Option<&str> {
		match self {
			Self::CannotOverride { alias, .. } => Some(alias),
			_ => None,
		}
	}
}
