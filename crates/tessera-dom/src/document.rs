//! In-memory document implementing [`Host`].
//!
//! Nodes live in an arena and are addressed by [`NodeId`]. Removing a node
//! detaches it but keeps its slot, so stale handles stay valid and compare
//! unequal to every other node.
//!
//! The document behaves like a browser DOM in the ways the runtime relies on:
//!
//! - attribute names are ASCII case-insensitive and stored lower case;
//! - each element may own one shadow root, which is not part of its children;
//! - attribute observers fire synchronously on every attribute write;
//! - listeners are invoked by [`Document::dispatch`].
//!
//! Every live-tree write increments [`Document::mutation_count`]. Building
//! detached nodes does not.

use std::cell::RefCell;
use std::fmt;

use tessera_core::{
	AttributeObserver, ElementNode, Event, Host, HostError, Listener, NodeKind, TreeNode,
};

use crate::parser::parse_fragment;
use crate::serializer::to_markup;

/// Handle of a node in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "node-{}", self.0)
	}
}

#[derive(Debug, Clone)]
enum NodeData {
	Root,
	Element {
		tag: String,
		attributes: Vec<(String, String)>,
	},
	Text(String),
}

struct NodeSlot {
	data: NodeData,
	parent: Option<NodeId>,
	children: Vec<NodeId>,
	shadow_root: Option<NodeId>,
	listeners: Vec<(String, Listener)>,
	observers: Vec<AttributeObserver>,
}

impl NodeSlot {
	fn new(data: NodeData) -> Self {
		Self {
			data,
			parent: None,
			children: Vec::new(),
			shadow_root: None,
			listeners: Vec::new(),
			observers: Vec::new(),
		}
	}
}

/// An arena-backed live tree.
pub struct Document {
	nodes: Vec<NodeSlot>,
	body: NodeId,
	mutations: u64,
	strict: bool,
}

impl Default for Document {
	fn default() -> Self {
		Self::new()
	}
}

impl Document {
	/// Creates an empty document with a single root container.
	pub fn new() -> Self {
		Self {
			nodes: vec![NodeSlot::new(NodeData::Root)],
			body: NodeId(0),
			mutations: 0,
			strict: false,
		}
	}

	/// Makes [`Host::parse_markup`] reject markup the parser had to repair.
	pub fn with_strict_parsing(mut self, strict: bool) -> Self {
		self.strict = strict;
		self
	}

	/// Returns the document's root container.
	pub fn body(&self) -> NodeId {
		self.body
	}

	/// Returns the number of live-tree writes performed so far.
	pub fn mutation_count(&self) -> u64 {
		self.mutations
	}

	/// Creates a detached element.
	pub fn create_element(&mut self, tag: &str) -> NodeId {
		self.alloc(NodeData::Element {
			tag: tag.to_ascii_lowercase(),
			attributes: Vec::new(),
		})
	}

	/// Creates a detached text node.
	pub fn create_text(&mut self, content: &str) -> NodeId {
		self.alloc(NodeData::Text(content.to_string()))
	}

	/// Parses `markup` and appends the resulting nodes to `parent`.
	///
	/// # Errors
	///
	/// Returns [`HostError::InvalidNode`] if `parent` cannot hold children, or
	/// the parser's error in strict mode.
	pub fn insert_markup(&mut self, parent: NodeId, markup: &str) -> Result<Vec<NodeId>, HostError> {
		match self.slot(parent).map(|slot| &slot.data) {
			Some(NodeData::Root | NodeData::Element { .. }) => {}
			_ => return Err(HostError::InvalidNode(format!("{parent} cannot hold children"))),
		}

		let candidate = parse_fragment(markup, self.strict)?;
		let mut inserted = Vec::with_capacity(candidate.len());
		for node in &candidate {
			let live = self.materialize(node);
			self.append_child(&parent, live);
			inserted.push(live);
		}
		Ok(inserted)
	}

	/// Returns the parent of a node.
	pub fn parent(&self, node: NodeId) -> Option<NodeId> {
		self.slot(node).and_then(|slot| slot.parent)
	}

	/// Returns the tag name of an element.
	pub fn tag_name(&self, node: NodeId) -> Option<&str> {
		match &self.slot(node)?.data {
			NodeData::Element { tag, .. } => Some(tag),
			_ => None,
		}
	}

	/// Returns the shadow root attached to an element.
	pub fn shadow_root(&self, element: NodeId) -> Option<NodeId> {
		self.slot(element).and_then(|slot| slot.shadow_root)
	}

	/// Finds the first descendant element of `root` with the given tag, in document order.
	///
	/// Shadow roots are not entered.
	pub fn find_element(&self, root: NodeId, tag: &str) -> Option<NodeId> {
		let tag = tag.to_ascii_lowercase();
		self.descendants(root)
			.into_iter()
			.find(|node| self.tag_name(*node) == Some(tag.as_str()))
	}

	/// Returns the number of listeners attached to a node.
	pub fn listener_count(&self, node: NodeId) -> usize {
		self.slot(node).map_or(0, |slot| slot.listeners.len())
	}

	/// Converts a live subtree into a candidate tree.
	///
	/// Returns `None` for a root container or an unknown handle.
	pub fn to_tree(&self, node: NodeId) -> Option<TreeNode> {
		let slot = self.slot(node)?;
		match &slot.data {
			NodeData::Root => None,
			NodeData::Text(text) => Some(TreeNode::text(text.as_str())),
			NodeData::Element { tag, attributes } => {
				let mut element = ElementNode::new(tag.as_str());
				element.attributes = attributes.clone();
				element.children = self.child_trees(node);
				Some(element.into())
			}
		}
	}

	/// Converts the children of a live node into candidate trees.
	pub fn child_trees(&self, parent: NodeId) -> Vec<TreeNode> {
		self.slot(parent)
			.map(|slot| {
				slot.children
					.iter()
					.filter_map(|child| self.to_tree(*child))
					.collect()
			})
			.unwrap_or_default()
	}

	/// Serializes a node including its own tag.
	///
	/// For a root container this is the markup of its children.
	pub fn outer_markup(&self, node: NodeId) -> String {
		match self.to_tree(node) {
			Some(tree) => to_markup(std::slice::from_ref(&tree)),
			None => self.inner_markup(&node),
		}
	}

	/// Invokes every listener for `event.event_type` attached to `target`.
	///
	/// The document is not borrowed while listeners run, so they may freely
	/// borrow it. Returns the number of listeners invoked.
	pub fn dispatch(document: &RefCell<Self>, target: NodeId, event: &Event) -> usize {
		let listeners: Vec<Listener> = {
			let document = document.borrow();
			document
				.slot(target)
				.map(|slot| {
					slot.listeners
						.iter()
						.filter(|(event_type, _)| *event_type == event.event_type)
						.map(|(_, listener)| Listener::clone(listener))
						.collect()
				})
				.unwrap_or_default()
		};

		for listener in &listeners {
			listener(event);
		}
		listeners.len()
	}

	fn alloc(&mut self, data: NodeData) -> NodeId {
		let id = NodeId(self.nodes.len());
		self.nodes.push(NodeSlot::new(data));
		id
	}

	fn slot(&self, node: NodeId) -> Option<&NodeSlot> {
		self.nodes.get(node.0)
	}

	fn slot_mut(&mut self, node: NodeId) -> Option<&mut NodeSlot> {
		self.nodes.get_mut(node.0)
	}

	/// Descendants of `root` in document order, excluding `root`.
	fn descendants(&self, root: NodeId) -> Vec<NodeId> {
		let mut found = Vec::new();
		let mut stack: Vec<NodeId> = self
			.slot(root)
			.map(|slot| slot.children.iter().rev().copied().collect())
			.unwrap_or_default();
		while let Some(node) = stack.pop() {
			found.push(node);
			if let Some(slot) = self.slot(node) {
				stack.extend(slot.children.iter().rev().copied());
			}
		}
		found
	}

	fn detach(&mut self, child: NodeId) {
		let Some(parent) = self.parent(child) else {
			return;
		};
		if let Some(slot) = self.slot_mut(parent) {
			slot.children.retain(|node| *node != child);
		}
		if let Some(slot) = self.slot_mut(child) {
			slot.parent = None;
		}
	}

	fn notify_observers(&self, element: NodeId, name: &str) {
		let observers: Vec<AttributeObserver> = self
			.slot(element)
			.map(|slot| slot.observers.clone())
			.unwrap_or_default();
		for observer in observers {
			observer(name);
		}
	}
}

impl Host for Document {
	type Node = NodeId;

	fn parse_markup(&mut self, markup: &str) -> Result<Vec<TreeNode>, HostError> {
		parse_fragment(markup, self.strict)
	}

	fn create_root(&mut self, host_element: &NodeId) -> NodeId {
		if let Some(existing) = self.shadow_root(*host_element) {
			return existing;
		}
		let root = self.alloc(NodeData::Root);
		if let Some(slot) = self.slot_mut(*host_element) {
			slot.shadow_root = Some(root);
		}
		root
	}

	fn attached_root(&self, host_element: &NodeId) -> Option<NodeId> {
		self.shadow_root(*host_element)
	}

	fn inner_markup(&self, element: &NodeId) -> String {
		to_markup(&self.child_trees(*element))
	}

	fn materialize(&mut self, node: &TreeNode) -> NodeId {
		match node {
			TreeNode::Text(text) => self.create_text(text),
			TreeNode::Element(element) => {
				let attributes = element
					.attributes
					.iter()
					.map(|(name, value)| (name.to_ascii_lowercase(), value.clone()))
					.collect();
				let id = self.alloc(NodeData::Element {
					tag: element.tag.to_ascii_lowercase(),
					attributes,
				});
				for child in &element.children {
					let child = self.materialize(child);
					if let Some(slot) = self.slot_mut(child) {
						slot.parent = Some(id);
					}
					if let Some(slot) = self.slot_mut(id) {
						slot.children.push(child);
					}
				}
				id
			}
		}
	}

	fn children(&self, parent: &NodeId) -> Vec<NodeId> {
		self.slot(*parent)
			.map(|slot| slot.children.clone())
			.unwrap_or_default()
	}

	fn append_child(&mut self, parent: &NodeId, child: NodeId) {
		if self.slot(*parent).is_none() || self.slot(child).is_none() {
			tracing::debug!(%parent, %child, "append_child on unknown node ignored");
			return;
		}
		self.detach(child);
		if let Some(slot) = self.slot_mut(child) {
			slot.parent = Some(*parent);
		}
		if let Some(slot) = self.slot_mut(*parent) {
			slot.children.push(child);
		}
		self.mutations += 1;
	}

	fn remove_child(&mut self, parent: &NodeId, child: &NodeId) {
		if self.parent(*child) != Some(*parent) {
			tracing::debug!(%parent, %child, "remove_child on a non-child ignored");
			return;
		}
		self.detach(*child);
		self.mutations += 1;
	}

	fn replace_child(&mut self, parent: &NodeId, new_child: NodeId, old_child: &NodeId) {
		let position = self
			.slot(*parent)
			.and_then(|slot| slot.children.iter().position(|node| node == old_child));
		let Some(position) = position else {
			tracing::debug!(%parent, child = %old_child, "replace_child on a non-child ignored");
			return;
		};

		self.detach(new_child);
		if let Some(slot) = self.slot_mut(*parent) {
			slot.children[position] = new_child;
		}
		if let Some(slot) = self.slot_mut(*old_child) {
			slot.parent = None;
		}
		if let Some(slot) = self.slot_mut(new_child) {
			slot.parent = Some(*parent);
		}
		self.mutations += 1;
	}

	fn node_kind(&self, node: &NodeId) -> NodeKind {
		match self.slot(*node).map(|slot| &slot.data) {
			Some(NodeData::Element { tag, .. }) => NodeKind::Element(tag.clone()),
			Some(NodeData::Text(_)) => NodeKind::Text,
			Some(NodeData::Root) | None => NodeKind::Root,
		}
	}

	fn attributes(&self, element: &NodeId) -> Vec<(String, String)> {
		match self.slot(*element).map(|slot| &slot.data) {
			Some(NodeData::Element { attributes, .. }) => attributes.clone(),
			_ => Vec::new(),
		}
	}

	fn get_attribute(&self, element: &NodeId, name: &str) -> Option<String> {
		let name = name.to_ascii_lowercase();
		match &self.slot(*element)?.data {
			NodeData::Element { attributes, .. } => attributes
				.iter()
				.find(|(key, _)| *key == name)
				.map(|(_, value)| value.clone()),
			_ => None,
		}
	}

	fn set_attribute(&mut self, element: &NodeId, name: &str, value: &str) {
		let name = name.to_ascii_lowercase();
		let Some(NodeData::Element { attributes, .. }) =
			self.slot_mut(*element).map(|slot| &mut slot.data)
		else {
			return;
		};
		match attributes.iter_mut().find(|(key, _)| *key == name) {
			Some(entry) => entry.1 = value.to_string(),
			None => attributes.push((name.clone(), value.to_string())),
		}
		self.mutations += 1;
		self.notify_observers(*element, &name);
	}

	fn remove_attribute(&mut self, element: &NodeId, name: &str) {
		let name = name.to_ascii_lowercase();
		let Some(NodeData::Element { attributes, .. }) =
			self.slot_mut(*element).map(|slot| &mut slot.data)
		else {
			return;
		};
		let before = attributes.len();
		attributes.retain(|(key, _)| *key != name);
		if attributes.len() == before {
			return;
		}
		self.mutations += 1;
		self.notify_observers(*element, &name);
	}

	fn text_content(&self, node: &NodeId) -> Option<String> {
		match &self.slot(*node)?.data {
			NodeData::Text(text) => Some(text.clone()),
			_ => None,
		}
	}

	fn set_text_content(&mut self, node: &NodeId, content: &str) {
		if let Some(NodeData::Text(text)) = self.slot_mut(*node).map(|slot| &mut slot.data) {
			*text = content.to_string();
			self.mutations += 1;
		}
	}

	fn find_by_attribute(&self, root: &NodeId, name: &str) -> Option<NodeId> {
		let name = name.to_ascii_lowercase();
		self.descendants(*root).into_iter().find(|node| {
			matches!(
				self.slot(*node).map(|slot| &slot.data),
				Some(NodeData::Element { attributes, .. })
					if attributes.iter().any(|(key, _)| *key == name)
			)
		})
	}

	fn attach_listener(&mut self, element: &NodeId, event_type: &str, listener: Listener) {
		if let Some(slot) = self.slot_mut(*element) {
			slot.listeners.push((event_type.to_string(), listener));
		}
	}

	fn observe_attributes(&mut self, element: &NodeId, observer: AttributeObserver) {
		if let Some(slot) = self.slot_mut(*element) {
			slot.observers.push(observer);
		}
	}
}

impl fmt::Debug for Document {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Document")
			.field("nodes", &self.nodes.len())
			.field("mutations", &self.mutations)
			.field("strict", &self.strict)
			.field("body", &self.outer_markup(self.body))
			.finish()
	}
}
