//! Handler callables and their argument contract.
//!
//! The facade forwards arguments untouched. A handler declares its own parameter
//! shape with [`Arity`] and rejects mismatching calls itself, the same way a
//! strict closure would.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

/// A handler bound to a state key.
///
/// Called with the instance that is being dispatched on and the exact arguments
/// of the dispatch call.
pub type Handler<S> = Arc<dyn Fn(&S, &[Value]) -> Result<Value, HandlerError> + Send + Sync>;

/// Errors raised from inside a handler body.
///
/// These are never produced by resolution and are never translated on the way
/// back to the dispatch caller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HandlerError {
	#[error("wrong number of arguments (given {given}, expected {expected})")]
	Arity { given: usize, expected: Arity },
	#[error("undefined local variable or method `{name}`")]
	UndefinedName { name: Box<str> },
	#[error("{0}")]
	Failed(String),
}

impl HandlerError {
	pub fn failed(message: impl Into<String>) -> Self {
		Self::Failed(message.into())
	}

	pub fn undefined(name: impl Into<Box<str>>) -> Self {
		Self::UndefinedName { name: name.into() }
	}
}

/// Declared parameter shape of a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Arity {
	required: usize,
	optional: usize,
	rest: bool,
}

impl Arity {
	/// Exactly `n` arguments.
	pub const fn exact(n: usize) -> Self {
		Self {
			required: n,
			optional: 0,
			rest: false,
		}
	}

	/// `n` required arguments followed by any number of extra ones.
	pub const fn at_least(n: usize) -> Self {
		Self {
			required: n,
			optional: 0,
			rest: true,
		}
	}

	/// Between `min` and `max` arguments, inclusive.
	pub const fn range(min: usize, max: usize) -> Self {
		Self {
			required: min,
			optional: max.saturating_sub(min),
			rest: false,
		}
	}

	pub const fn accepts(self, given: usize) -> bool {
		given >= self.required && (self.rest || given <= self.required + self.optional)
	}

	pub fn check(self, given: usize) -> Result<(), HandlerError> {
		if self.accepts(given) {
			Ok(())
		} else {
			Err(HandlerError::Arity {
				given,
				expected: self,
			})
		}
	}
}

impl std::fmt::Display for Arity {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		if self.rest {
			write!(f, "{}+", self.required)
		} else if self.optional > 0 {
			write!(f, "{}..{}", self.required, self.required + self.optional)
		} else {
			write!(f, "{}", self.required)
		}
	}
}

/// Wraps `body` into a [`Handler`] that checks `arity` before running.
pub fn handler<S, F>(arity: Arity, body: F) -> Handler<S>
where
	S: 'static,
	F: Fn(&S, &[Value]) -> Result<Value, HandlerError> + Send + Sync + 'static,
{
	Arc::new(move |this: &S, args: &[Value]| {
		arity.check(args.len())?;
		body(this, args)
	})
}
