//! Tessera Core - reactive component runtime.
//!
//! Components are render functions that return markup. The runtime turns that
//! markup into a live tree through an injected [`Host`], keeps the tree in sync
//! with the component's state, and routes events to named callbacks.
//!
//! ## Architecture
//!
//! - [`store`]: observed key/value stores (reactive state and solid data)
//! - [`scheduler`]: debounced, single-slot render scheduling
//! - [`markers`]: `event=#callback` marker extraction and listener binding
//! - [`events`]: per-instance callback registry with late-bound dispatch
//! - [`styles`]: ordered unique stylesheet registry
//! - [`reconcile`]: positional diff/patch of a live tree
//! - [`component`]: component instances and the render pipeline
//! - [`registry`]: component kinds mapped to render functions
//! - [`host`] and [`timer`]: collaborator traits implemented by adapters
//!
//! The runtime is single-threaded. Instances share their parts through `Rc`,
//! and scheduled tasks and change hooks hold only weak references, so dropping
//! an instance cancels all of its future renders.
//!
//! ## Example
//!
//! ```ignore
//! use tessera_core::{ComponentRegistry, Settings};
//!
//! let mut registry = ComponentRegistry::with_settings(Settings::default())?;
//! registry.register_fn("hello-name", |_, props| {
//!     Ok(format!("<p>Hello {}</p>", props.get("name").map_or("", String::as_str)))
//! })?;
//!
//! let instance = registry.instantiate("hello-name", document, timer, element)?;
//! instance.connect();
//! ```

pub mod component;
pub mod error;
pub mod events;
pub mod host;
pub mod markers;
pub mod reconcile;
pub mod registry;
pub mod scheduler;
pub mod settings;
pub mod store;
pub mod styles;
pub mod timer;
pub mod tree;

pub use component::{ComponentContext, Instance, InstanceBuilder, Phase, Props, RenderFn, render_fn};
pub use error::{ConfigError, HostError, RenderError, Result, SettingsError, TesseraError};
pub use events::{Callback, EventRegistry};
pub use host::{AttributeObserver, Event, Host, Listener};
pub use markers::{BindOutcome, DEFAULT_TOKEN_PREFIX, Marker, MarkerBinder, MarkerExtraction, extract_markers};
pub use reconcile::{PatchSummary, reconcile};
pub use registry::ComponentRegistry;
pub use scheduler::{RenderJob, UpdateScheduler};
pub use settings::{DEFAULT_DEBOUNCE_MS, DEFAULT_STYLESHEET_REL, Settings};
pub use store::{ChangeHook, ObservedStore, Value};
pub use styles::StyleRegistry;
pub use timer::{ScheduledTask, TaskId, Timer};
pub use tree::{ElementNode, NodeKind, TreeNode};
