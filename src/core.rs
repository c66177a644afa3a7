//! Component runtime module.
//!
//! This module provides access to observed stores, the update scheduler,
//! event markers, the tree reconciler, component instances and the registry.
//!
//! # Examples
//!
//! ```rust,ignore
//! use tessera::core::store::ObservedStore;
//! use tessera::core::markers::extract_markers;
//! ```

pub use tessera_core::*;
