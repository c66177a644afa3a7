//! Candidate tree model.
//!
//! A [`TreeNode`] is the host-independent result of parsing rendered markup. It
//! is short-lived: the render pipeline builds one per pass, mounts or reconciles
//! it into the live tree, and drops it.

/// Category of a live node, as reported by a [`Host`](crate::host::Host).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
	/// A container with children but no tag (document or shadow-root equivalent).
	Root,
	/// An element with the given tag name.
	Element(String),
	/// A text node.
	Text,
}

/// A node of a candidate tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
	/// An element with attributes and children.
	Element(ElementNode),
	/// A text node.
	Text(String),
}

impl TreeNode {
	/// Creates a text node.
	pub fn text(content: impl Into<String>) -> Self {
		Self::Text(content.into())
	}

	/// Returns the node category.
	pub fn kind(&self) -> NodeKind {
		match self {
			Self::Element(element) => NodeKind::Element(element.tag.clone()),
			Self::Text(_) => NodeKind::Text,
		}
	}

	/// Returns the element payload, if this is an element.
	pub fn as_element(&self) -> Option<&ElementNode> {
		match self {
			Self::Element(element) => Some(element),
			Self::Text(_) => None,
		}
	}

	/// Returns the text content, if this is a text node.
	pub fn as_text(&self) -> Option<&str> {
		match self {
			Self::Text(text) => Some(text),
			Self::Element(_) => None,
		}
	}
}

impl From<ElementNode> for TreeNode {
	fn from(element: ElementNode) -> Self {
		Self::Element(element)
	}
}

/// An element of a candidate tree.
///
/// Attributes keep their source order; names are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementNode {
	/// Tag name.
	pub tag: String,
	/// Attributes in source order.
	pub attributes: Vec<(String, String)>,
	/// Child nodes in order.
	pub children: Vec<TreeNode>,
}

impl ElementNode {
	/// Creates an element with no attributes or children.
	pub fn new(tag: impl Into<String>) -> Self {
		Self {
			tag: tag.into(),
			attributes: Vec::new(),
			children: Vec::new(),
		}
	}

	/// Sets an attribute, replacing any previous value under the same name.
	pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.set_attribute(name, value);
		self
	}

	/// Appends a child node.
	pub fn child(mut self, child: impl Into<TreeNode>) -> Self {
		self.children.push(child.into());
		self
	}

	/// Appends a text child.
	pub fn text(self, content: impl Into<String>) -> Self {
		self.child(TreeNode::Text(content.into()))
	}

	/// Returns the value of an attribute.
	pub fn attribute(&self, name: &str) -> Option<&str> {
		self.attributes
			.iter()
			.find(|(key, _)| key == name)
			.map(|(_, value)| value.as_str())
	}

	/// Sets an attribute in place.
	pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
		let name = name.into();
		let value = value.into();
		match self.attributes.iter_mut().find(|(key, _)| *key == name) {
			Some(entry) => entry.1 = value,
			None => self.attributes.push((name, value)),
		}
	}
}
