//! Host platform interface.
//!
//! The runtime never touches a concrete document. Everything it needs from the
//! environment (markup parsing, live-tree mutation, listener attachment and
//! attribute observation) goes through [`Host`]. Adapters for different
//! environments implement the trait separately.
//!
//! Live nodes are identified by the adapter's [`Host::Node`] handle. Handles are
//! compared for identity: two handles are equal exactly when they refer to the
//! same live node.

use std::fmt::Debug;
use std::hash::Hash;
use std::rc::Rc;

use crate::error::HostError;
use crate::tree::{NodeKind, TreeNode};

/// An event dispatched to a listener.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Event {
	/// Event type, e.g. `click` or `input`.
	pub event_type: String,
	/// Current value of the target, for form controls.
	pub value: Option<String>,
}

impl Event {
	/// Creates an event of the given type.
	pub fn new(event_type: impl Into<String>) -> Self {
		Self {
			event_type: event_type.into(),
			value: None,
		}
	}

	/// Attaches the target's current value.
	pub fn with_value(mut self, value: impl Into<String>) -> Self {
		self.value = Some(value.into());
		self
	}
}

/// A native listener attached to a live element.
pub type Listener = Rc<dyn Fn(&Event)>;

/// Callback invoked with the attribute name when an observed element's attribute changes.
pub type AttributeObserver = Rc<dyn Fn(&str)>;

/// Environment collaborator providing parsing and live-tree primitives.
pub trait Host {
	/// Handle to a live node.
	type Node: Clone + Eq + Hash + Debug + 'static;

	/// Parses markup into candidate nodes.
	fn parse_markup(&mut self, markup: &str) -> Result<Vec<TreeNode>, HostError>;

	/// Creates the container the component renders into, attached to its host element.
	fn create_root(&mut self, host_element: &Self::Node) -> Self::Node;

	/// Returns the render root previously created for `host_element`, if any.
	fn attached_root(&self, host_element: &Self::Node) -> Option<Self::Node>;

	/// Serializes the children of an element back to markup.
	fn inner_markup(&self, element: &Self::Node) -> String;

	/// Builds a detached live copy of a candidate subtree.
	fn materialize(&mut self, node: &TreeNode) -> Self::Node;

	/// Returns the children of a live node, in order.
	fn children(&self, parent: &Self::Node) -> Vec<Self::Node>;

	/// Appends a detached node as the last child of `parent`.
	fn append_child(&mut self, parent: &Self::Node, child: Self::Node);

	/// Detaches `child` from `parent`.
	fn remove_child(&mut self, parent: &Self::Node, child: &Self::Node);

	/// Puts `new_child` at the position of `old_child` and detaches `old_child`.
	fn replace_child(&mut self, parent: &Self::Node, new_child: Self::Node, old_child: &Self::Node);

	/// Returns the category of a live node.
	fn node_kind(&self, node: &Self::Node) -> NodeKind;

	/// Returns every attribute of an element, in order.
	fn attributes(&self, element: &Self::Node) -> Vec<(String, String)>;

	/// Returns one attribute value.
	fn get_attribute(&self, element: &Self::Node, name: &str) -> Option<String>;

	/// Sets one attribute value.
	fn set_attribute(&mut self, element: &Self::Node, name: &str, value: &str);

	/// Removes one attribute.
	fn remove_attribute(&mut self, element: &Self::Node, name: &str);

	/// Returns the content of a text node.
	fn text_content(&self, node: &Self::Node) -> Option<String>;

	/// Overwrites the content of a text node in place.
	fn set_text_content(&mut self, node: &Self::Node, content: &str);

	/// Finds the first descendant of `root` carrying the attribute `name`.
	fn find_by_attribute(&self, root: &Self::Node, name: &str) -> Option<Self::Node>;

	/// Attaches a native listener for `event_type`.
	fn attach_listener(&mut self, element: &Self::Node, event_type: &str, listener: Listener);

	/// Subscribes to attribute changes of an element.
	fn observe_attributes(&mut self, element: &Self::Node, observer: AttributeObserver);

	/// Returns the descendants of `root` in document order, excluding `root`.
	///
	/// Render roots attached to descendants are not entered.
	fn descendants_of(&self, root: &Self::Node) -> Vec<Self::Node> {
		let mut found = Vec::new();
		let mut stack: Vec<Self::Node> = self.children(root).into_iter().rev().collect();
		while let Some(node) = stack.pop() {
			stack.extend(self.children(&node).into_iter().rev());
			found.push(node);
		}
		found
	}
}
