//! The contract between the dispatcher and the object being dispatched on.

use serde_json::Value;

use crate::HandlerError;

/// An object that carries the current value of each axis.
///
/// The state provider sets the value (for example the name of the action being
/// handled) before calling a state method. Handlers run with `&Self`, so names
/// a handler body looks up resolve against the instance, not against the class
/// that declared the handler.
pub trait Instance {
	/// Current value of `axis`, if the provider has set one.
	fn state(&self, axis: &str) -> Option<&str>;

	/// Resolves `name` from inside a handler body.
	///
	/// Instances that expose no names keep the default, which reports every name
	/// as undefined.
	fn send(&self, name: &str, args: &[Value]) -> Result<Value, HandlerError> {
		let _ = args;
		Err(HandlerError::undefined(name))
	}
}
