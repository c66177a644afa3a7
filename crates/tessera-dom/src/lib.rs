//! Tessera DOM - in-memory host adapter.
//!
//! Provides everything needed to run Tessera components outside a browser:
//!
//! - [`Document`]: an arena-backed live tree implementing [`Host`](tessera_core::Host)
//! - [`parse_fragment`]: HTML fragment parsing built on `scraper`
//! - [`to_markup`]: serialization of candidate trees
//! - [`VirtualTimer`]: a deterministic timer for tests and simulations
//! - `LocalTimer` (feature `tokio`): a real timer for tokio `LocalSet` hosts
//!
//! ## Example
//!
//! ```ignore
//! use std::{cell::RefCell, rc::Rc, time::Duration};
//! use tessera_core::ComponentRegistry;
//! use tessera_dom::{Document, VirtualTimer};
//!
//! let document = Rc::new(RefCell::new(Document::new()));
//! let body = document.borrow().body();
//! let element = document.borrow_mut().insert_markup(body, "<hello-name name=\"Ada\"></hello-name>")?[0];
//!
//! let timer = Rc::new(VirtualTimer::new());
//! let instance = registry.instantiate("hello-name", document.clone(), timer.clone(), element)?;
//! instance.connect();
//! timer.advance(Duration::from_millis(60))?;
//! ```

pub mod document;
pub mod parser;
pub mod serializer;
pub mod timer;
#[cfg(feature = "tokio")]
pub mod tokio_timer;

pub use document::{Document, NodeId};
pub use parser::parse_fragment;
pub use serializer::{html_escape, is_void, to_markup};
pub use timer::VirtualTimer;
#[cfg(feature = "tokio")]
pub use tokio_timer::LocalTimer;
