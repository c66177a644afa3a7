//! Per-instance render context.

use std::cell::{OnceCell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::error::RenderError;
use crate::events::EventRegistry;
use crate::host::Event;
use crate::scheduler::UpdateScheduler;
use crate::store::{ObservedStore, Value};
use crate::styles::StyleRegistry;

/// Input attributes of a component's host element.
pub type Props = BTreeMap<String, String>;

/// A component's render function.
///
/// Receives the instance context and the current props; returns markup.
pub type RenderFn = Rc<dyn Fn(&ComponentContext, &Props) -> Result<String, RenderError>>;

/// Wraps a closure as a [`RenderFn`].
pub fn render_fn<F>(f: F) -> RenderFn
where
	F: Fn(&ComponentContext, &Props) -> Result<String, RenderError> + 'static,
{
	Rc::new(f)
}

/// Everything a render function may touch besides its props.
///
/// The context is independent of the host platform: it owns the stores and
/// registries of one instance and a handle to its scheduler.
pub struct ComponentContext {
	kind: String,
	children: String,
	state: OnceCell<ObservedStore>,
	data: OnceCell<ObservedStore>,
	events: EventRegistry,
	styles: RefCell<StyleRegistry>,
	scheduler: Rc<UpdateScheduler>,
}

impl ComponentContext {
	pub(crate) fn new(kind: String, children: String, scheduler: Rc<UpdateScheduler>) -> Self {
		Self {
			kind,
			children,
			state: OnceCell::new(),
			data: OnceCell::new(),
			events: EventRegistry::new(),
			styles: RefCell::new(StyleRegistry::new()),
			scheduler,
		}
	}

	/// Component kind this instance was created from.
	pub fn kind(&self) -> &str {
		&self.kind
	}

	/// Markup of the host element's children, captured once at construction.
	pub fn children(&self) -> &str {
		&self.children
	}

	/// Returns the reactive state store, creating it from `defaults` on first call.
	///
	/// Later calls return the same store and ignore their defaults. Every real
	/// change schedules a re-render.
	pub fn state<I, K, V>(&self, defaults: I) -> ObservedStore
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<Value>,
	{
		self.state
			.get_or_init(|| {
				let scheduler = Rc::downgrade(&self.scheduler);
				ObservedStore::new(
					defaults,
					Rc::new(move |key: &str| {
						if let Some(scheduler) = scheduler.upgrade() {
							tracing::trace!(key, "state changed, scheduling update");
							scheduler.schedule();
						}
					}),
				)
			})
			.clone()
	}

	/// Returns the solid data store, creating it from `defaults` on first call.
	///
	/// Writes to this store never schedule a render.
	pub fn data<I, K, V>(&self, defaults: I) -> ObservedStore
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<Value>,
	{
		self.data
			.get_or_init(|| ObservedStore::solid(defaults))
			.clone()
	}

	/// Registers `callback` under `name`, replacing any previous one.
	pub fn create_event<F>(&self, name: impl Into<String>, callback: F)
	where
		F: Fn(&Event) + 'static,
	{
		self.events.register(name, callback);
	}

	/// Returns the instance's event registry.
	pub fn events(&self) -> &EventRegistry {
		&self.events
	}

	/// Registers one stylesheet URL.
	pub fn add_style(&self, url: impl Into<String>) {
		self.styles.borrow_mut().add_style(url);
	}

	/// Registers several stylesheet URLs in order.
	pub fn add_styles<I, S>(&self, urls: I)
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.styles.borrow_mut().add_styles(urls);
	}

	/// Returns the registered stylesheet URLs.
	pub fn styles(&self) -> Vec<String> {
		self.styles.borrow().urls().to_vec()
	}

	pub(crate) fn stylesheet_markup(&self, rel: &str) -> String {
		self.styles.borrow().to_markup(rel)
	}

	/// Schedules a re-render of this instance.
	pub fn update(&self) {
		self.scheduler.schedule();
	}

	pub(crate) fn scheduler(&self) -> &Rc<UpdateScheduler> {
		&self.scheduler
	}
}

impl fmt::Debug for ComponentContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ComponentContext")
			.field("kind", &self.kind)
			.field("children", &self.children)
			.field("state", &self.state.get())
			.field("data", &self.data.get())
			.field("events", &self.events)
			.field("styles", &self.styles.borrow())
			.finish()
	}
}
