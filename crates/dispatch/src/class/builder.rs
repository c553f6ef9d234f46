use std::collections::hash_map::Entry;
use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde_json::Value;
use stately_partition::{Extension, GroupSpec, PartitionConfig, PartitionIndex};
use tracing::debug;

use super::Class;
use crate::{Arity, DefineError, Handler, HandlerError, handler};

/// Collects the declarations of one class, then freezes them with [`build`](Self::build).
///
/// Declarations apply in call order. A partition layer is created the first time
/// the class references its axis; for an inherited axis the layer is derived
/// from the parent's frozen index.
pub struct ClassBuilder<S> {
	name: Box<str>,
	parent: Option<Arc<Class<S>>>,
	partitions: FxHashMap<Box<str>, PartitionIndex<Handler<S>>>,
	methods: IndexMap<Box<str>, Box<str>>,
}

impl<S: 'static> ClassBuilder<S> {
	pub fn new(name: impl Into<Box<str>>) -> Self {
		Self {
			name: name.into(),
			parent: None,
			partitions: FxHashMap::default(),
			methods: IndexMap::new(),
		}
	}

	pub(crate) fn inheriting(name: impl Into<Box<str>>, parent: Arc<Class<S>>) -> Self {
		Self {
			parent: Some(parent),
			..Self::new(name)
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Declares the partition for `axis` with its initial groups.
	pub fn define_partition(mut self, axis: &str, groups: &GroupSpec) -> Result<Self, DefineError> {
		self.layer(axis, true)?.declare_groups(groups)?;
		Ok(self)
	}

	/// Extends the partition for `axis`. May be called repeatedly; aliases accumulate.
	pub fn extend_partition(mut self, axis: &str, extension: impl Into<Extension>) -> Result<Self, DefineError> {
		self.layer(axis, false)?.extend(&extension.into())?;
		Ok(self)
	}

	/// Declares or extends the partition for `axis` from a config layout.
	///
	/// A config with groups may create the partition; one without must extend an
	/// existing or inherited partition.
	pub fn configure_partition(mut self, axis: &str, config: &PartitionConfig) -> Result<Self, DefineError> {
		let create = !config.groups.is_empty();
		config.apply(self.layer(axis, create)?)?;
		Ok(self)
	}

	/// Declares `name` as a state method dispatched on `axis`.
	///
	/// Redeclaring a method on the same axis is a no-op.
	pub fn state_method(mut self, name: &str, axis: &str) -> Result<Self, DefineError> {
		if self.partition(axis).is_none() {
			return Err(self.unknown_axis(axis));
		}
		match self.axis_of(name) {
			Some(existing) if existing == axis => {}
			Some(existing) => {
				return Err(DefineError::AxisMismatch {
					method: name.into(),
					existing: existing.into(),
					incoming: axis.into(),
				});
			}
			None => {
				debug!(class = &*self.name, method = name, axis, "state method declared");
				self.methods.insert(name.into(), axis.into());
			}
		}
		Ok(self)
	}

	/// Registers `body` for `method` under `key`, checking calls against `arity`.
	///
	/// `key` is an alias, a group or [`WILDCARD`](stately_partition::WILDCARD).
	pub fn on<F>(self, method: &str, key: &str, arity: Arity, body: F) -> Result<Self, DefineError>
	where
		F: Fn(&S, &[Value]) -> Result<Value, HandlerError> + Send + Sync + 'static,
	{
		self.on_handler(method, key, handler(arity, body))
	}

	/// Registers a prebuilt handler for `method` under `key`.
	pub fn on_handler(mut self, method: &str, key: &str, handler: Handler<S>) -> Result<Self, DefineError> {
		let axis: Box<str> = self
			.axis_of(method)
			.ok_or_else(|| DefineError::UnknownMethod {
				class: self.name.clone(),
				method: method.into(),
			})?
			.into();
		self.layer(&axis, false)?.register_handler(method, key, handler);
		Ok(self)
	}

	/// Returns the partition for `axis` as declared so far, own layer first.
	pub fn partition(&self, axis: &str) -> Option<&PartitionIndex<Handler<S>>> {
		self.partitions
			.get(axis)
			.or_else(|| self.parent.as_deref()?.partition(axis))
	}

	fn axis_of(&self, method: &str) -> Option<&str> {
		self.methods
			.get(method)
			.map(|axis| &**axis)
			.or_else(|| self.parent.as_deref()?.axis_of(method))
	}

	/// Returns this class's own layer for `axis`, creating it on first use.
	fn layer(&mut self, axis: &str, create: bool) -> Result<&mut PartitionIndex<Handler<S>>, DefineError> {
		match self.partitions.entry(axis.into()) {
			Entry::Occupied(entry) => Ok(entry.into_mut()),
			Entry::Vacant(entry) => {
				let inherited = self
					.parent
					.as_deref()
					.and_then(|parent| parent.partition_arc(axis))
					.cloned();
				let index = match inherited {
					Some(parent) => PartitionIndex::derive(parent),
					None if create => PartitionIndex::new(axis),
					None => {
						return Err(DefineError::UnknownAxis {
							class: self.name.clone(),
							axis: axis.into(),
						});
					}
				};
				debug!(
					class = &*self.name,
					axis,
					derived = index.parent().is_some(),
					"partition layer created"
				);
				Ok(entry.insert(index))
			}
		}
	}

	fn unknown_axis(&self, axis: &str) -> DefineError {
		DefineError::UnknownAxis {
			class: self.name.clone(),
			axis: axis.into(),
		}
	}

	/// Freezes the class.
	pub fn build(self) -> Arc<Class<S>> {
		debug!(
			class = &*self.name,
			parent = self.parent.as_ref().map(|p| p.name()),
			axes = self.partitions.len(),
			methods = self.methods.len(),
			"class built"
		);
		Arc::new(Class {
			name: self.name,
			parent: self.parent,
			partitions: self
				.partitions
				.into_iter()
				.map(|(axis, index)| (axis, Arc::new(index)))
				.collect(),
			methods: self.methods,
		})
	}
}

impl<S> std::fmt::Debug for ClassBuilder<S> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ClassBuilder")
			.field("name", &self.name)
			.field("methods", &self.methods)
			.field("axes", &self.partitions.keys().collect::<Vec<_>>())
			.field("parent", &self.parent.as_ref().map(|p| &p.name))
			.finish()
	}
}
