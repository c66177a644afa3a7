//! # Tessera
//!
//! A minimal reactive component runtime.
//!
//! A component is a render function that returns markup. Tessera mounts that
//! markup into a live tree, re-renders it when the component's state or input
//! attributes change, and patches the live tree in place so unchanged nodes
//! keep their identity.
//!
//! ## Core Principles
//!
//! - **Markup in, live tree out**: render functions return plain strings
//! - **Debounced updates**: a burst of state changes produces one render
//! - **Late-bound events**: `click=#handler` markers resolve callbacks by name when they fire
//! - **Host-agnostic**: the live tree sits behind the [`Host`] trait
//!
//! ## Feature Flags
//!
//! - `dom` (default) - In-memory host adapter with an arena document and a virtual timer
//! - `tokio` - Real timer for single-threaded tokio hosts (`LocalSet`)
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use tessera::prelude::*;
//!
//! let mut registry = ComponentRegistry::new();
//! registry.register_fn("click-counter", |ctx, _props| {
//!     let state = ctx.state([("count", 0)]);
//!     let handle = state.clone();
//!     ctx.create_event("buttonClick", move |_| {
//!         handle.update("count", |count| {
//!             Value::from(count.and_then(Value::as_i64).unwrap_or(0) + 1)
//!         });
//!     });
//!     let count = state.get_as::<i64>("count").unwrap_or(0);
//!     Ok(format!("<button click=#buttonClick>Clicked ({count}) times</button>"))
//! })?;
//!
//! let document = Rc::new(RefCell::new(Document::new()));
//! let body = document.borrow().body();
//! let element = document.borrow_mut().insert_markup(body, "<click-counter></click-counter>")?[0];
//! let timer = Rc::new(VirtualTimer::new());
//!
//! let counter = registry.instantiate("click-counter", document.clone(), timer.clone(), element)?;
//! counter.connect();
//! timer.advance(Duration::from_millis(60))?;
//! ```

pub mod core;
#[cfg(feature = "dom")]
pub mod dom;

pub use tessera_core::{
	ComponentContext, ComponentRegistry, ConfigError, Event, Host, HostError, Instance,
	InstanceBuilder, ObservedStore, PatchSummary, Phase, Props, RenderError, RenderFn, Result,
	Settings, SettingsError, TesseraError, Timer, TreeNode, Value, reconcile, render_fn,
};

#[cfg(feature = "dom")]
pub use tessera_dom::{Document, NodeId, VirtualTimer};

#[cfg(feature = "tokio")]
pub use tessera_dom::LocalTimer;

/// Commonly used types.
pub mod prelude {
	pub use crate::{
		ComponentContext, ComponentRegistry, Event, Host, Instance, ObservedStore, Phase, Props,
		RenderError, Settings, TesseraError, Timer, Value,
	};

	#[cfg(feature = "dom")]
	pub use crate::{Document, NodeId, VirtualTimer};

	#[cfg(feature = "tokio")]
	pub use crate::LocalTimer;

	pub use std::cell::RefCell;
	pub use std::rc::Rc;
	pub use std::time::Duration;
}
