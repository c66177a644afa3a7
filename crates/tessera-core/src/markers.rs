//! Event markers embedded in rendered markup.
//!
//! A render function wires an element to a named callback by writing
//! `event=#callbackName` inside the element's start tag:
//!
//! ```text
//! <button click=#buttonClick>Count</button>
//! ```
//!
//! Before parsing, every marker is replaced by a presence-only placeholder
//! attribute (`bindEvt0`, `bindEvt1`, ... in order of appearance). After the
//! parsed tree is live, [`MarkerBinder`] finds each placeholder, removes it and
//! attaches a listener that resolves the callback name when the event fires.
//!
//! Extraction is purely textual: any `word=#word` sequence is treated as a
//! marker, including one that appears in text content. A placeholder that does
//! not survive parsing is skipped without error.

use std::collections::HashSet;
use std::hash::Hash;
use std::rc::Rc;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::events::EventRegistry;
use crate::host::{Event, Host};

/// Default prefix of placeholder attributes.
pub const DEFAULT_TOKEN_PREFIX: &str = "bindEvt";

static MARKER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"([A-Za-z0-9_]+)=#([A-Za-z0-9_]+)").expect("marker pattern is a valid regex")
});

/// One marker found in rendered markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
	/// Event type to listen for (the marker's attribute name).
	pub attribute: String,
	/// Name of the callback in the instance's [`EventRegistry`].
	pub callback: String,
	/// Placeholder attribute written in place of the marker.
	pub token: String,
}

/// Markup with its markers replaced, plus the markers in order of appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkerExtraction {
	/// Markup ready for the host parser.
	pub markup: String,
	/// Markers found, one per placeholder.
	pub markers: Vec<Marker>,
}

/// Replaces every `attribute=#callback` marker with a numbered placeholder.
///
/// Tokens are `{token_prefix}{index}` with `index` counting from zero, so they
/// are unique within one call even when callbacks repeat.
pub fn extract_markers(markup: &str, token_prefix: &str) -> MarkerExtraction {
	let mut markers = Vec::new();
	let rewritten = MARKER_PATTERN.replace_all(markup, |caps: &Captures<'_>| {
		let token = format!("{}{}", token_prefix, markers.len());
		markers.push(Marker {
			attribute: caps[1].to_string(),
			callback: caps[2].to_string(),
			token: token.clone(),
		});
		token
	});

	MarkerExtraction {
		markup: rewritten.into_owned(),
		markers,
	}
}

/// Outcome of one binding pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BindOutcome {
	/// Listeners attached in this pass.
	pub attached: usize,
	/// Placeholders found on elements that already had a listener for the callback.
	pub already_bound: usize,
	/// Placeholders that were not found in the live tree.
	pub missing: usize,
}

/// Binds placeholders in a live tree to callbacks.
///
/// The binder remembers every (callback name, element) pair it has attached a
/// listener for, so repeated renders of the same element never stack listeners.
/// Pairs whose element has left the tree under `root` are forgotten after each
/// pass.
#[derive(Debug)]
pub struct MarkerBinder<N> {
	bound: HashSet<(String, N)>,
}

impl<N> Default for MarkerBinder<N> {
	fn default() -> Self {
		Self {
			bound: HashSet::new(),
		}
	}
}

impl<N: Clone + Eq + Hash> MarkerBinder<N> {
	/// Creates a binder with no recorded bindings.
	pub fn new() -> Self {
		Self::default()
	}

	/// Resolves each marker's placeholder under `root` and attaches listeners.
	pub fn bind<H>(
		&mut self,
		host: &mut H,
		root: &N,
		markers: &[Marker],
		events: &EventRegistry,
	) -> BindOutcome
	where
		H: Host<Node = N>,
	{
		let mut outcome = BindOutcome::default();

		for marker in markers {
			let Some(element) = host.find_by_attribute(root, &marker.token) else {
				tracing::debug!(
					token = %marker.token,
					callback = %marker.callback,
					"event marker not found in live tree, skipping"
				);
				outcome.missing += 1;
				continue;
			};

			host.remove_attribute(&element, &marker.token);

			if !self.bound.insert((marker.callback.clone(), element.clone())) {
				outcome.already_bound += 1;
				continue;
			}

			let events = events.clone();
			let callback = marker.callback.clone();
			host.attach_listener(
				&element,
				&marker.attribute,
				Rc::new(move |event: &Event| {
					events.dispatch(&callback, event);
				}),
			);
			outcome.attached += 1;
		}

		let live: HashSet<N> = host.descendants_of(root).into_iter().collect();
		self.bound.retain(|(_, element)| live.contains(element));

		outcome
	}

	/// Returns `true` if a listener for `callback` is attached to `element`.
	pub fn is_bound(&self, callback: &str, element: &N) -> bool {
		self.bound.contains(&(callback.to_string(), element.clone()))
	}

	/// Returns the number of recorded bindings.
	pub fn len(&self) -> usize {
		self.bound.len()
	}

	/// Returns `true` if nothing has been bound yet.
	pub fn is_empty(&self) -> bool {
		self.bound.is_empty()
	}
}
