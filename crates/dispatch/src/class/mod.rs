//! Frozen classes and the dispatch entry point.

mod builder;

use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde_json::Value;
use stately_partition::{PartitionIndex, Resolution};
use tracing::trace;

pub use builder::ClassBuilder;

use crate::{DispatchError, Handler, Instance};


/// A built class: partitions, state methods and handlers, read-only.
///
/// Cheap to share across threads; dispatch only reads.
pub struct Class<S> {
	name: Box<str>,
	parent: Option<Arc<Class<S>>>,
	/// Layers this class registered into; other axes are read from the parent.
	partitions: FxHashMap<Box<str>, Arc<PartitionIndex<Handler<S>>>>,
	/// State method name to axis, declared on this class.
	methods: IndexMap<Box<str>, Box<str>>,
}

impl<S: 'static> Class<S> {
	/// Starts a root class.
	pub fn builder(name: impl Into<Box<str>>) -> ClassBuilder<S> {
		ClassBuilder::new(name)
	}

	/// Starts a subclass inheriting partitions, state methods and handlers.
	pub fn subclass(self: &Arc<Self>, name: impl Into<Box<str>>) -> ClassBuilder<S> {
		ClassBuilder::inheriting(name, self.clone())
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn parent(&self) -> Option<&Arc<Class<S>>> {
		self.parent.as_ref()
	}

	/// Iterates this class followed by its ancestors.
	pub fn ancestors(&self) -> impl Iterator<Item = &Self> + '_ {
		std::iter::successors(Some(self), |class| class.parent.as_deref())
	}

	/// Returns whether this class is `name` or inherits from it.
	pub fn is_a(&self, name: &str) -> bool {
		self.ancestors().any(|class| &*class.name == name)
	}

	/// Returns the effective partition for `axis`.
	pub fn partition(&self, axis: &str) -> Option<&PartitionIndex<Handler<S>>> {
		self.partition_arc(axis).map(Arc::as_ref)
	}

	pub(crate) fn partition_arc(&self, axis: &str) -> Option<&Arc<PartitionIndex<Handler<S>>>> {
		self.ancestors().find_map(|class| class.partitions.get(axis))
	}

	/// Returns the axis a state method is bound to.
	pub fn axis_of(&self, method: &str) -> Option<&str> {
		self.ancestors()
			.find_map(|class| class.methods.get(method))
			.map(|axis| &**axis)
	}

	/// Returns the names of all state methods, ancestors first.
	pub fn state_methods(&self) -> Vec<&str> {
		let mut names: Vec<&str> = self.parent.as_deref().map(Class::state_methods).unwrap_or_default();
		for name in self.methods.keys() {
			if !names.contains(&&**name) {
				names.push(name);
			}
		}
		names
	}

	/// Resolves the handler `method` would run when its axis equals `state`.
	pub fn resolve<'a>(&'a self, method: &str, state: &'a str) -> Result<Resolution<'a, Handler<S>>, DispatchError> {
		let axis = self.axis_of(method).ok_or_else(|| DispatchError::UnknownMethod {
			method: method.into(),
		})?;
		self.partition(axis)
			.and_then(|index| index.resolve(method, state))
			.ok_or_else(|| DispatchError::Unresolved {
				method: method.into(),
				axis: axis.into(),
				state: state.into(),
			})
	}

	/// Calls state method `method` on `instance` with `args`.
	///
	/// Reads the current value of the method's axis from the instance, resolves
	/// the most specific handler across the class hierarchy and runs it with the
	/// arguments untouched. A failing handler's error is returned as
	/// [`DispatchError::Handler`] without translation.
	pub fn dispatch(&self, instance: &S, method: &str, args: &[Value]) -> Result<Value, DispatchError>
	where
		S: Instance,
	{
		let axis = self.axis_of(method).ok_or_else(|| DispatchError::UnknownMethod {
			method: method.into(),
		})?;
		let state = instance
			.state(axis)
			.ok_or_else(|| DispatchError::MissingState { axis: axis.into() })?;

		let resolution = self.resolve(method, state)?;
		trace!(
			class = &*self.name,
			method,
			axis,
			state,
			key = resolution.key,
			depth = resolution.depth,
			args = args.len(),
			"dispatch"
		);
		(resolution.handler)(instance, args).map_err(DispatchError::Handler)
	}

	/// Like [`dispatch`](Self::dispatch), but treats "no handler" as `Ok(None)`.
	pub fn try_dispatch(&self, instance: &S, method: &str, args: &[Value]) -> Result<Option<Value>, DispatchError>
	where
		S: Instance,
	{
		match self.dispatch(instance, method, args) {
			Ok(value) => Ok(Some(value)),
			Err(err) if err.is_unresolved() => Ok(None),
			Err(err) => Err(err),
		}
	}

	/// Pairs this class with an instance for repeated calls.
	pub fn bind<'a>(&'a self, instance: &'a S) -> Bound<'a, S> {
		Bound { class: self, instance }
	}
}

impl<S> std::fmt::Debug for Class<S> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Class")
			.field("name", &self.name)
			.field("methods", &self.methods)
			.field("axes", &self.partitions.keys().collect::<Vec<_>>())
			.field("parent", &self.parent.as_ref().map(|p| &p.name))
			.finish()
	}
}

/// A class paired with one instance.
pub struct Bound<'a, S> {
	class: &'a Class<S>,
	instance: &'a S,
}

impl<S: Instance + 'static> Bound<'_, S> {
	pub fn call(&self, method: &str, args: &[Value]) -> Result<Value, DispatchError> {
		self.class.dispatch(self.instance, method, args)
	}

	pub fn try_call(&self, method: &str, args: &[Value]) -> Result<Option<Value>, DispatchError> {
		self.class.try_dispatch(self.instance, method, args)
	}
}
