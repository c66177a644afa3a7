//! Observed Store - a key/value mapping with a change hook.
//!
//! The same type backs both stores an instance owns:
//!
//! - **state**: the hook schedules a re-render of the owning instance.
//! - **solid data**: the hook does nothing, so writes never trigger a render.
//!
//! ## Change detection
//!
//! [`ObservedStore::set`] compares the new value with the stored one. Writing
//! an equal value is a no-op and never calls the hook.
//!
//! ## Sharing
//!
//! `ObservedStore` is a cheap handle: clones share the same entries and hook,
//! so a render function and the event callbacks it registers see the same data.
//!
//! ## Example
//!
//! ```ignore
//! let state = ctx.state([("count", 0)]);
//! state.update("count", |count| json!(count.and_then(Value::as_i64).unwrap_or(0) + 1));
//! ```

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use serde::de::DeserializeOwned;

/// Dynamic value held by a store.
pub type Value = serde_json::Value;

/// Hook called with the key of every entry whose value actually changed.
pub type ChangeHook = Rc<dyn Fn(&str)>;

/// A mapping from string keys to values that reports real changes.
#[derive(Clone)]
pub struct ObservedStore {
	entries: Rc<RefCell<BTreeMap<String, Value>>>,
	on_change: ChangeHook,
}

impl ObservedStore {
	/// Creates a store seeded with `defaults` that calls `on_change` after each real change.
	pub fn new<I, K, V>(defaults: I, on_change: ChangeHook) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<Value>,
	{
		let entries = defaults
			.into_iter()
			.map(|(key, value)| (key.into(), value.into()))
			.collect();
		Self {
			entries: Rc::new(RefCell::new(entries)),
			on_change,
		}
	}

	/// Creates a store whose writes are never observed.
	pub fn solid<I, K, V>(defaults: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<Value>,
	{
		Self::new(defaults, Rc::new(|_| {}))
	}

	/// Returns a copy of the value stored under `key`.
	pub fn get(&self, key: &str) -> Option<Value> {
		self.entries.borrow().get(key).cloned()
	}

	/// Returns the value under `key` converted to `T`.
	///
	/// Returns `None` when the key is absent or the value does not convert.
	pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
		let value = self.get(key)?;
		serde_json::from_value(value).ok()
	}

	/// Stores `value` under `key` if it differs from the current value.
	///
	/// The change hook runs after the entry is written, so it may read the store.
	/// Writes are never rejected.
	pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
		let key = key.into();
		let value = value.into();
		let changed = {
			let mut entries = self.entries.borrow_mut();
			if entries.get(&key) == Some(&value) {
				false
			} else {
				entries.insert(key.clone(), value);
				true
			}
		};
		if changed {
			(self.on_change)(&key);
		}
	}

	/// Computes a new value from the current one and stores it through [`set`](Self::set).
	pub fn update<F>(&self, key: impl Into<String>, f: F)
	where
		F: FnOnce(Option<&Value>) -> Value,
	{
		let key = key.into();
		let next = {
			let entries = self.entries.borrow();
			f(entries.get(&key))
		};
		self.set(key, next);
	}

	/// Returns `true` if `key` holds a value.
	pub fn contains(&self, key: &str) -> bool {
		self.entries.borrow().contains_key(key)
	}

	/// Returns the number of entries.
	pub fn len(&self) -> usize {
		self.entries.borrow().len()
	}

	/// Returns `true` if the store has no entries.
	pub fn is_empty(&self) -> bool {
		self.entries.borrow().is_empty()
	}

	/// Returns an owned copy of every entry.
	pub fn snapshot(&self) -> BTreeMap<String, Value> {
		self.entries.borrow().clone()
	}

	/// Returns `true` if both handles share the same entries.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.entries, &other.entries)
	}
}

impl fmt::Debug for ObservedStore {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ObservedStore")
			.field("entries", &self.entries.borrow())
			.finish()
	}
}
