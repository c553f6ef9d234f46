use tracing::debug;

use super::collision::{Collision, CollisionKind};
use super::{AliasEntry, Layout, PartitionIndex, View};
use crate::decl::ValueSet;
use crate::{PartitionError, WILDCARD};

/// Result of a successful alias insertion.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(super) enum InsertAction {
	/// Alias was new.
	InsertedNew,
	/// Alias existed with the same value set; nothing changed.
	KeptExisting,
}

/// Inserts one alias into a staged layout, enforcing alias identity.
///
/// Listed values must be unowned, unless the alias is named after a group, in
/// which case they are reassigned to it. A value equal to the alias name is
/// the alias itself and never counts as a claim.
///
/// The caller applies `staged` only if every alias of the request was accepted.
pub(super) fn insert_alias<H>(
	staged: &mut Layout,
	parent: Option<&PartitionIndex<H>>,
	axis: &str,
	name: Box<str>,
	values: ValueSet,
	collisions: &mut Vec<Collision>,
) -> Result<InsertAction, PartitionError> {
	if &*name == WILDCARD || values.contains(WILDCARD) {
		return Err(PartitionError::ReservedName { name: WILDCARD.into() });
	}
	if values.is_empty() {
		return Err(PartitionError::EmptyAlias { alias: name });
	}

	let view = View::new(staged, parent);
	if let Some(existing) = view.alias(&name) {
		if existing.values == values {
			debug!(axis, alias = &*name, "alias redeclared with identical values");
			collisions.push(Collision {
				axis: axis.into(),
				key: name,
				kind: CollisionKind::AliasRedeclared,
			});
			return Ok(InsertAction::KeptExisting);
		}
		return Err(PartitionError::CannotOverride {
			existing: existing.values.iter().cloned().collect(),
			incoming: values.into_iter().collect(),
			alias: name,
		});
	}

	let names_group = view.is_group(&name);
	let mut reassigned: Vec<(Box<str>, Box<str>)> = Vec::new();
	for value in values.iter().filter(|value| **value != name) {
		let Some(owner) = view.owner_of(value).filter(|owner| *owner != &*name) else {
			continue;
		};
		if !names_group {
			return Err(PartitionError::CannotOverride {
				alias: value.clone(),
				existing: vec![owner.into()],
				incoming: vec![name],
			});
		}
		reassigned.push((value.clone(), owner.into()));
	}

	// A group-named alias is the group; any other alias hangs under whatever
	// owned its name, taking that value's place.
	let fallback: Option<Box<str>> = if names_group {
		None
	} else {
		view.owner_of(&name).map(Box::from)
	};

	if fallback.is_some() {
		staged.owners.insert(name.clone(), name.clone());
	}
	for value in &values {
		staged.owners.insert(value.clone(), name.clone());
	}
	debug!(
		axis,
		alias = &*name,
		parent = fallback.as_deref(),
		count = values.len(),
		"alias declared"
	);
	staged.aliases.insert(
		name.clone(),
		AliasEntry {
			values,
			parent: fallback,
		},
	);

	for (value, from) in reassigned {
		debug!(axis, value = &*value, from = &*from, to = &*name, "value reassigned");
		collisions.push(Collision {
			axis: axis.into(),
			key: value,
			kind: CollisionKind::ValueReassigned {
				from,
				to: name.clone(),
			},
		});
	}

	Ok(InsertAction::InsertedNew)
}
