//! Component instance and its render pipeline.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::{ConfigError, RenderError, TesseraError};
use crate::host::Host;
use crate::markers::{MarkerBinder, extract_markers};
use crate::reconcile::reconcile;
use crate::registry::ComponentRegistry;
use crate::scheduler::{RenderJob, UpdateScheduler};
use crate::settings::Settings;
use crate::timer::Timer;

use super::context::{ComponentContext, Props, RenderFn, render_fn};

/// Lifecycle phase of an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
	/// Built but not connected yet.
	Unmounted,
	/// Connected. `first_render` stays `true` until the first pass has mounted the tree.
	Mounted {
		/// Whether the next pass mounts wholesale instead of reconciling.
		first_render: bool,
	},
}

/// A live component bound to one host element.
///
/// Clones share the same instance.
pub struct Instance<H: Host> {
	inner: Rc<InstanceInner<H>>,
}

impl<H: Host> Clone for Instance<H> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

struct InstanceInner<H: Host> {
	host: Rc<RefCell<H>>,
	timer: Rc<dyn Timer>,
	element: H::Node,
	root: H::Node,
	render: RenderFn,
	context: ComponentContext,
	settings: Settings,
	first_render: Cell<bool>,
	connected: Cell<bool>,
	binder: RefCell<MarkerBinder<H::Node>>,
	registry: Option<ComponentRegistry>,
	nested: RefCell<Vec<Instance<H>>>,
}

impl<H: Host + 'static> Instance<H> {
	/// Starts building an instance.
	pub fn builder() -> InstanceBuilder<H> {
		InstanceBuilder::new()
	}

	/// Connects the instance and schedules its first render.
	///
	/// Connecting twice is a no-op.
	pub fn connect(&self) {
		if self.inner.connected.replace(true) {
			return;
		}
		tracing::debug!(kind = %self.inner.context.kind(), "component connected");
		self.inner.context.scheduler().schedule();
	}

	/// Schedules a re-render.
	pub fn update(&self) {
		self.inner.context.update();
	}

	/// Cancels the pending update, if any, and renders immediately.
	///
	/// Flushing an unconnected instance connects it.
	pub fn flush(&self) -> Result<(), TesseraError> {
		self.inner.connected.set(true);
		self.inner.context.scheduler().flush()
	}

	/// Returns `true` while an update is waiting to fire.
	pub fn has_pending_update(&self) -> bool {
		self.inner.context.scheduler().has_pending()
	}

	/// Returns the lifecycle phase.
	pub fn phase(&self) -> Phase {
		if self.inner.connected.get() {
			Phase::Mounted {
				first_render: self.inner.first_render.get(),
			}
		} else {
			Phase::Unmounted
		}
	}

	/// Returns the render context.
	pub fn context(&self) -> &ComponentContext {
		&self.inner.context
	}

	/// Returns the container the component renders into.
	pub fn root(&self) -> &H::Node {
		&self.inner.root
	}

	/// Returns the host element.
	pub fn element(&self) -> &H::Node {
		&self.inner.element
	}

	/// Returns the number of completed render passes.
	pub fn render_count(&self) -> u64 {
		self.inner.context.scheduler().render_count()
	}

	/// Returns the instances upgraded inside this instance's root, in document order.
	pub fn nested(&self) -> Vec<Instance<H>> {
		self.inner.nested.borrow().clone()
	}
}

impl<H: Host> fmt::Debug for Instance<H> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Instance")
			.field("element", &self.inner.element)
			.field("root", &self.inner.root)
			.field("context", &self.inner.context)
			.field("connected", &self.inner.connected.get())
			.field("first_render", &self.inner.first_render.get())
			.field("nested", &self.inner.nested.borrow().len())
			.finish()
	}
}

impl<H: Host + 'static> InstanceInner<H> {
	fn props(&self) -> Props {
		self.host
			.borrow()
			.attributes(&self.element)
			.into_iter()
			.collect()
	}

	/// Upgrades registered kinds found under the root and drops nested
	/// instances whose element left the tree.
	fn upgrade_nested(&self, registry: &ComponentRegistry) -> Result<(), TesseraError> {
		let upgraded = registry.upgrade(&self.host, &self.timer, &self.root)?;

		let mut nested = self.nested.borrow_mut();
		let live = self.host.borrow().descendants_of(&self.root);
		nested.retain(|child| live.contains(child.element()));
		nested.extend(upgraded);
		Ok(())
	}
}

impl<H: Host + 'static> RenderJob for InstanceInner<H> {
	fn run(&self) -> Result<(), TesseraError> {
		let kind = self.context.kind();
		tracing::debug!(%kind, "render started");

		// The host stays unborrowed while user code runs.
		let props = self.props();
		let markup = (self.render)(&self.context, &props)?;

		let extraction = extract_markers(&markup, &self.settings.token_prefix);
		let mut markup = self.context.stylesheet_markup(&self.settings.stylesheet_rel);
		markup.push_str(&extraction.markup);

		let outcome = {
			let mut host = self.host.borrow_mut();
			let candidate = host.parse_markup(&markup)?;

			if self.first_render.replace(false) {
				for node in &candidate {
					let live = host.materialize(node);
					host.append_child(&self.root, live);
				}
			} else {
				reconcile(&mut *host, &self.root, &candidate);
			}

			let mut binder = self.binder.borrow_mut();
			binder.bind(
				&mut *host,
				&self.root,
				&extraction.markers,
				self.context.events(),
			)
		};

		if let Some(registry) = &self.registry {
			self.upgrade_nested(registry)?;
		}

		tracing::debug!(
			%kind,
			markers = extraction.markers.len(),
			attached = outcome.attached,
			missing = outcome.missing,
			"render finished"
		);
		Ok(())
	}
}

/// Builder for [`Instance`].
///
/// `render`, `host`, `timer` and `element` are required.
pub struct InstanceBuilder<H: Host> {
	kind: String,
	host: Option<Rc<RefCell<H>>>,
	timer: Option<Rc<dyn Timer>>,
	element: Option<H::Node>,
	render: Option<RenderFn>,
	settings: Settings,
	registry: Option<ComponentRegistry>,
}

impl<H: Host + 'static> InstanceBuilder<H> {
	fn new() -> Self {
		Self {
			kind: String::new(),
			host: None,
			timer: None,
			element: None,
			render: None,
			settings: Settings::default(),
			registry: None,
		}
	}

	/// Sets the component kind reported in logs and by [`ComponentContext::kind`].
	pub fn kind(mut self, kind: impl Into<String>) -> Self {
		self.kind = kind.into();
		self
	}

	/// Sets the host adapter.
	pub fn host(mut self, host: Rc<RefCell<H>>) -> Self {
		self.host = Some(host);
		self
	}

	/// Sets the timer driving scheduled renders.
	pub fn timer(mut self, timer: Rc<dyn Timer>) -> Self {
		self.timer = Some(timer);
		self
	}

	/// Sets the host element.
	pub fn element(mut self, element: H::Node) -> Self {
		self.element = Some(element);
		self
	}

	/// Sets the render function from a closure.
	pub fn render<F>(self, render: F) -> Self
	where
		F: Fn(&ComponentContext, &Props) -> Result<String, RenderError> + 'static,
	{
		self.render_fn(render_fn(render))
	}

	/// Sets a shared render function.
	pub fn render_fn(mut self, render: RenderFn) -> Self {
		self.render = Some(render);
		self
	}

	/// Sets the runtime settings.
	pub fn settings(mut self, settings: Settings) -> Self {
		self.settings = settings;
		self
	}

	/// Upgrades kinds registered in `registry` whenever they appear in the
	/// rendered tree.
	pub fn registry(mut self, registry: ComponentRegistry) -> Self {
		self.registry = Some(registry);
		self
	}

	/// Builds the instance.
	///
	/// Captures the host element's children, creates the render root and
	/// subscribes to attribute changes. Nothing is rendered until
	/// [`Instance::connect`] or [`Instance::flush`].
	///
	/// # Errors
	///
	/// Returns a [`ConfigError`] if a required part is missing, the settings
	/// are invalid, or the element already hosts another instance.
	pub fn build(self) -> Result<Instance<H>, ConfigError> {
		let render = self.render.ok_or(ConfigError::MissingRenderer)?;
		let host = self.host.ok_or(ConfigError::MissingHost)?;
		let timer = self.timer.ok_or(ConfigError::MissingTimer)?;
		let element = self.element.ok_or(ConfigError::MissingElement)?;
		self.settings.validate()?;

		let (children, root) = {
			let mut host = host.borrow_mut();
			if host.attached_root(&element).is_some() {
				return Err(ConfigError::AlreadyMounted(format!("{element:?}")));
			}
			let children = host.inner_markup(&element);
			let root = host.create_root(&element);
			(children, root)
		};

		let scheduler = UpdateScheduler::new(Rc::clone(&timer), self.settings.debounce());
		let inner = Rc::new(InstanceInner {
			host: Rc::clone(&host),
			timer,
			element: element.clone(),
			root,
			render,
			context: ComponentContext::new(self.kind, children, Rc::clone(&scheduler)),
			settings: self.settings,
			first_render: Cell::new(true),
			connected: Cell::new(false),
			binder: RefCell::new(MarkerBinder::new()),
			registry: self.registry,
			nested: RefCell::new(Vec::new()),
		});

		let job: Weak<InstanceInner<H>> = Rc::downgrade(&inner);
		scheduler.attach(job);

		let observer = Rc::downgrade(&scheduler);
		host.borrow_mut().observe_attributes(
			&element,
			Rc::new(move |name: &str| {
				if let Some(scheduler) = observer.upgrade() {
					tracing::trace!(attribute = name, "attribute changed, scheduling update");
					scheduler.schedule();
				}
			}),
		);

		Ok(Instance { inner })
	}
}

impl<H: Host> fmt::Debug for InstanceBuilder<H> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("InstanceBuilder")
			.field("kind", &self.kind)
			.field("element", &self.element)
			.field("has_render", &self.render.is_some())
			.field("settings", &self.settings)
			.field("registry", &self.registry)
			.finish_non_exhaustive()
	}
}
