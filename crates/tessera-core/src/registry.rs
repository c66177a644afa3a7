//! Component registry - kind identifiers mapped to render functions.
//!
//! The application owns a [`ComponentRegistry`], registers each component kind
//! once and instantiates kinds on demand against a host element. Every instance
//! created by a registry shares the registry's [`Settings`].
//!
//! [`ComponentRegistry::upgrade`] instantiates every registered kind found in a
//! live subtree. Instances created by a registry run it over their own root
//! after each render pass, so components nested in rendered markup come alive
//! without further wiring. The registry is snapshotted at that point: kinds
//! registered afterwards are not seen by existing instances.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::component::{ComponentContext, Instance, Props, RenderFn, render_fn};
use crate::error::{ConfigError, RenderError};
use crate::host::Host;
use crate::settings::Settings;
use crate::timer::Timer;
use crate::tree::NodeKind;

/// Registered component kinds.
#[derive(Clone, Default)]
pub struct ComponentRegistry {
	renderers: BTreeMap<String, RenderFn>,
	settings: Settings,
}

impl ComponentRegistry {
	/// Creates an empty registry with default settings.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates an empty registry whose instances use `settings`.
	///
	/// # Errors
	///
	/// Returns [`ConfigError::InvalidSettings`] if `settings` fail validation.
	pub fn with_settings(settings: Settings) -> Result<Self, ConfigError> {
		settings.validate()?;
		Ok(Self {
			renderers: BTreeMap::new(),
			settings,
		})
	}

	/// Returns the settings handed to new instances.
	pub fn settings(&self) -> &Settings {
		&self.settings
	}

	/// Registers a render function under `kind`.
	///
	/// # Errors
	///
	/// Returns [`ConfigError::DuplicateComponent`] if `kind` is already registered.
	pub fn register(&mut self, kind: impl Into<String>, render: RenderFn) -> Result<(), ConfigError> {
		let kind = kind.into();
		if self.renderers.contains_key(&kind) {
			return Err(ConfigError::DuplicateComponent(kind));
		}
		tracing::debug!(%kind, "component registered");
		self.renderers.insert(kind, render);
		Ok(())
	}

	/// Registers a closure under `kind`.
	pub fn register_fn<F>(&mut self, kind: impl Into<String>, render: F) -> Result<(), ConfigError>
	where
		F: Fn(&ComponentContext, &Props) -> Result<String, RenderError> + 'static,
	{
		self.register(kind, render_fn(render))
	}

	/// Registers several kinds in order, stopping at the first duplicate.
	///
	/// Kinds registered before the duplicate stay registered.
	pub fn register_all<I, K>(&mut self, components: I) -> Result<(), ConfigError>
	where
		I: IntoIterator<Item = (K, RenderFn)>,
		K: Into<String>,
	{
		components
			.into_iter()
			.try_for_each(|(kind, render)| self.register(kind, render))
	}

	/// Returns `true` if `kind` is registered.
	pub fn contains(&self, kind: &str) -> bool {
		self.renderers.contains_key(kind)
	}

	/// Returns the registered kinds, sorted.
	pub fn kinds(&self) -> Vec<&str> {
		self.renderers.keys().map(String::as_str).collect()
	}

	/// Returns the number of registered kinds.
	pub fn len(&self) -> usize {
		self.renderers.len()
	}

	/// Returns `true` if nothing is registered.
	pub fn is_empty(&self) -> bool {
		self.renderers.is_empty()
	}

	/// Creates an unconnected instance of `kind` bound to `element`.
	///
	/// # Errors
	///
	/// Returns [`ConfigError::UnknownComponent`] if `kind` is not registered,
	/// or [`ConfigError::AlreadyMounted`] if `element` already hosts an instance.
	pub fn instantiate<H: Host + 'static>(
		&self,
		kind: &str,
		host: Rc<RefCell<H>>,
		timer: Rc<dyn Timer>,
		element: H::Node,
	) -> Result<Instance<H>, ConfigError> {
		let render = self
			.renderers
			.get(kind)
			.ok_or_else(|| ConfigError::UnknownComponent(kind.to_string()))?;

		Instance::builder()
			.kind(kind)
			.host(host)
			.timer(timer)
			.element(element)
			.render_fn(Rc::clone(render))
			.settings(self.settings.clone())
			.registry(self.clone())
			.build()
	}

	/// Instantiates and connects every registered element under `root` that
	/// does not host an instance yet.
	///
	/// Returns the new instances in document order. The caller keeps them
	/// alive; a dropped instance never renders. Upgraded elements are not
	/// descended into, since their content belongs to their own render pass.
	///
	/// # Errors
	///
	/// Returns the first [`ConfigError`] raised while building an instance.
	pub fn upgrade<H: Host + 'static>(
		&self,
		host: &Rc<RefCell<H>>,
		timer: &Rc<dyn Timer>,
		root: &H::Node,
	) -> Result<Vec<Instance<H>>, ConfigError> {
		let pending = self.pending_upgrades(&*host.borrow(), root);

		let mut upgraded = Vec::with_capacity(pending.len());
		for (kind, element) in pending {
			tracing::debug!(%kind, ?element, "upgrading nested component");
			let instance = self.instantiate(&kind, Rc::clone(host), Rc::clone(timer), element)?;
			instance.connect();
			upgraded.push(instance);
		}
		Ok(upgraded)
	}

	fn pending_upgrades<H: Host>(&self, host: &H, root: &H::Node) -> Vec<(String, H::Node)> {
		let mut pending = Vec::new();
		let mut stack: Vec<H::Node> = host.children(root).into_iter().rev().collect();
		while let Some(node) = stack.pop() {
			if let NodeKind::Element(tag) = host.node_kind(&node) {
				if self.contains(&tag) {
					if host.attached_root(&node).is_none() {
						pending.push((tag, node));
					}
					continue;
				}
			}
			stack.extend(host.children(&node).into_iter().rev());
		}
		pending
	}
}

impl fmt::Debug for ComponentRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ComponentRegistry")
			.field("kinds", &self.kinds())
			.field("settings", &self.settings)
			.finish()
	}
}
