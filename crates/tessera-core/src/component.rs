//! Component instances.
//!
//! An [`Instance`] binds a render function to one host element. It owns the
//! instance's stores and registries (exposed to the render function through
//! [`ComponentContext`]) and an update scheduler that debounces re-renders.
//!
//! ## Render pipeline
//!
//! Every time a scheduled update fires:
//!
//! 1. the host element's attributes are gathered into [`Props`];
//! 2. the render function produces markup;
//! 3. event markers are replaced by placeholder attributes;
//! 4. registered stylesheets are prepended and the host parses the markup;
//! 5. the first pass mounts the parsed tree, later passes reconcile it;
//! 6. placeholders are bound to listeners.
//!
//! A render or parse failure aborts the pass before the live tree is touched.
//!
//! ## Example
//!
//! ```ignore
//! let counter = Instance::builder()
//!     .kind("click-counter")
//!     .host(Rc::clone(&document))
//!     .timer(timer.clone())
//!     .element(element)
//!     .render(|ctx, _props| {
//!         let state = ctx.state([("count", 0)]);
//!         let events = state.clone();
//!         ctx.create_event("buttonClick", move |_| {
//!             events.update("count", |count| json!(count.and_then(Value::as_i64).unwrap_or(0) + 1));
//!         });
//!         Ok(format!("<button click=#buttonClick>Clicked ({}) times</button>", state.get("count").unwrap_or_default()))
//!     })
//!     .build()?;
//! counter.connect();
//! ```

mod context;
mod instance;

pub use context::{ComponentContext, Props, RenderFn, render_fn};
pub use instance::{Instance, InstanceBuilder, Phase};
