//! In-memory host adapter module.
//!
//! This module provides access to the arena [`Document`](tessera_dom::Document),
//! markup parsing and serialization, and the timers that drive scheduled
//! renders outside a browser.
//!
//! # Examples
//!
//! ```rust,ignore
//! use tessera::dom::{Document, VirtualTimer};
//! ```

pub use tessera_dom::*;
