//! Controller-style action partition.
//!
//! Every class built with [`crud_controller`] dispatches on [`AXIS`], the name of
//! the action being handled. Actions are classified into four groups:
//!
//! | group | actions              |
//! |-------|----------------------|
//! | `C`   | `create!`, `new!`    |
//! | `U`   | `edit!`, `update!`   |
//! | `D`   | `destroy!`           |
//! | `R`   | `show!`, `index!`    |
//!
//! The bang-suffixed names are action types. [`CrudActions::Defaults`] maps each
//! of the [`DEFAULT_ACTIONS`] onto its type (`show` to `show!`), so a handler
//! for `show!` covers the `show` action and a handler for `R` covers both
//! reading actions.

use stately_dispatch::{AliasMap, Class, ClassBuilder, DefineError, Extension, GroupSpec};
use tracing::debug;

/// Axis all CRUD state methods dispatch on.
pub const AXIS: &str = "action_name";

/// Groups and the action types each one seeds.
pub const ACTIONS: &[(&str, &[&str])] = &[
	("C", &["create!", "new!"]),
	("U", &["edit!", "update!"]),
	("D", &["destroy!"]),
	("R", &["show!", "index!"]),
];

/// Actions covered by [`CrudActions::Defaults`].
pub const DEFAULT_ACTIONS: &[&str] = &["new", "create", "edit", "update", "show", "index", "destroy"];

/// Returns the CRUD groups as a declaration.
pub fn groups() -> GroupSpec {
	ACTIONS
		.iter()
		.map(|(group, types)| (*group, types.iter().copied()))
		.collect()
}

/// Returns `<action>! -> <action>` for every default action.
pub fn default_extension() -> AliasMap {
	DEFAULT_ACTIONS
		.iter()
		.map(|action| (format!("{action}!"), [*action]))
		.collect()
}

/// One argument of [`CrudBuilder::crud_actions`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrudActions {
	/// The [`default_extension`].
	Defaults,
	/// Explicit aliases, forwarded as given.
	Aliases(AliasMap),
}

impl CrudActions {
	pub fn into_extension(self) -> Extension {
		match self {
			Self::Defaults => Extension::Aliases(default_extension()),
			Self::Aliases(map) => Extension::Aliases(map),
		}
	}
}

impl From<AliasMap> for CrudActions {
	fn from(map: AliasMap) -> Self {
		Self::Aliases(map)
	}
}

/// Starts a root class with the CRUD partition declared on [`AXIS`].
pub fn crud_controller<S: 'static>(name: &str) -> Result<ClassBuilder<S>, DefineError> {
	Class::builder(name).define_partition(AXIS, &groups())
}

/// CRUD declarations on a class builder.
pub trait CrudBuilder: Sized {
	/// Extends the action partition, one extension per item, in order.
	fn crud_actions<I>(self, actions: I) -> Result<Self, DefineError>
	where
		I: IntoIterator,
		I::Item: Into<CrudActions>;

	/// Declares `name` as a state method dispatched on the current action.
	fn crud_method(self, name: &str) -> Result<Self, DefineError>;
}

impl<S: 'static> CrudBuilder for ClassBuilder<S> {
	fn crud_actions<I>(self, actions: I) -> Result<Self, DefineError>
	where
		I: IntoIterator,
		I::Item: Into<CrudActions>,
	{
		let builder = actions.into_iter().try_fold(self, |builder, item| {
			let item: CrudActions = item.into();
			builder.extend_partition(AXIS, item.into_extension())
		})?;
		if let Some(index) = builder.partition(AXIS) {
			debug!(class = builder.name(), partition = %index, "crud actions applied");
		}
		Ok(builder)
	}

	fn crud_method(self, name: &str) -> Result<Self, DefineError> {
		self.state_method(name, AXIS)
	}
}
