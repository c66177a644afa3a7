//! Event Registry - named callbacks of one instance.
//!
//! Render functions register callbacks by name; markup refers to them with
//! `event=#name` markers. Listeners bound to live elements resolve the name at
//! dispatch time, so a callback registered after the listener was attached is
//! still found, and re-registering a name replaces the previous callback.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::host::Event;

/// A callback invoked when a bound event fires.
pub type Callback = Rc<dyn Fn(&Event)>;

/// Mapping from callback name to callback.
///
/// Clones share the same mapping.
#[derive(Clone, Default)]
pub struct EventRegistry {
	callbacks: Rc<RefCell<HashMap<String, Callback>>>,
}

impl EventRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `callback` under `name`, replacing any previous callback.
	pub fn register<F>(&self, name: impl Into<String>, callback: F)
	where
		F: Fn(&Event) + 'static,
	{
		self.callbacks
			.borrow_mut()
			.insert(name.into(), Rc::new(callback));
	}

	/// Returns the callback registered under `name`.
	pub fn get(&self, name: &str) -> Option<Callback> {
		self.callbacks.borrow().get(name).cloned()
	}

	/// Returns `true` if a callback is registered under `name`.
	pub fn contains(&self, name: &str) -> bool {
		self.callbacks.borrow().contains_key(name)
	}

	/// Invokes the callback registered under `name`.
	///
	/// Returns `false` without doing anything when no such callback exists.
	/// The registry is not borrowed while the callback runs, so callbacks may
	/// register further callbacks.
	pub fn dispatch(&self, name: &str, event: &Event) -> bool {
		let Some(callback) = self.get(name) else {
			return false;
		};
		callback(event);
		true
	}

	/// Returns the number of registered callbacks.
	pub fn len(&self) -> usize {
		self.callbacks.borrow().len()
	}

	/// Returns `true` if no callback is registered.
	pub fn is_empty(&self) -> bool {
		self.callbacks.borrow().is_empty()
	}

	/// Returns the registered names, sorted.
	pub fn names(&self) -> Vec<String> {
		let mut names: Vec<String> = self.callbacks.borrow().keys().cloned().collect();
		names.sort();
		names
	}
}

impl fmt::Debug for EventRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("EventRegistry")
			.field("names", &self.names())
			.finish()
	}
}
