use stately_partition::PartitionError;
use thiserror::Error;

use crate::HandlerError;

/// Errors raised while defining a class.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefineError {
	#[error(transparent)]
	Partition(#[from] PartitionError),
	#[error("class {class:?} has no partition for axis {axis:?}")]
	UnknownAxis { class: Box<str>, axis: Box<str> },
	#[error("{method:?} is not a state method of class {class:?}")]
	UnknownMethod { class: Box<str>, method: Box<str> },
	#[error("state method {method:?} is bound to axis {existing:?}, not {incoming:?}")]
	AxisMismatch {
		method: Box<str>,
		existing: Box<str>,
		incoming: Box<str>,
	},
}

/// Errors returned by a dispatch call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DispatchError {
	/// Neither the owner chain nor the wildcard has a handler, on any layer.
	#[error("no handler for {method:?} when {axis} = {state:?}")]
	Unresolved {
		method: Box<str>,
		axis: Box<str>,
		state: Box<str>,
	},
	#[error("{method:?} is not a state method")]
	UnknownMethod { method: Box<str> },
	#[error("instance has no current value for axis {axis:?}")]
	MissingState { axis: Box<str> },
	/// The resolved handler failed; carried unchanged.
	#[error(transparent)]
	Handler(HandlerError),
}

impl DispatchError {
	/// Returns whether this is the recoverable "no handler for this state" case.
	pub fn is_unresolved(&self) -> bool {
		matches!(self, Self::Unresolved { .. })
	}

	/// Returns the handler's own error, if the handler ran and failed.
	pub fn handler_error(&self) -> Option<&HandlerError> {
		match self {
			Self::Handler(err) => Some(err),
			_ => None,
		}
	}
}
