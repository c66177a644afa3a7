//! Markup serialization of candidate trees.

use std::borrow::Cow;

use tessera_core::TreeNode;

/// Elements that never have children or an end tag.
pub const VOID_ELEMENTS: &[&str] = &[
	"area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
	"wbr",
];

/// Returns `true` if `tag` is a void element.
pub fn is_void(tag: &str) -> bool {
	VOID_ELEMENTS.contains(&tag)
}

/// Serializes a sequence of nodes to markup.
pub fn to_markup(nodes: &[TreeNode]) -> String {
	let mut output = String::new();
	for node in nodes {
		write_node(node, &mut output);
	}
	output
}

fn write_node(node: &TreeNode, output: &mut String) {
	match node {
		TreeNode::Element(element) => {
			output.push('<');
			output.push_str(&element.tag);

			for (name, value) in &element.attributes {
				output.push(' ');
				output.push_str(name);
				output.push_str("=\"");
				output.push_str(&html_escape(value));
				output.push('"');
			}

			output.push('>');
			if is_void(&element.tag) {
				return;
			}
			for child in &element.children {
				write_node(child, output);
			}
			output.push_str("</");
			output.push_str(&element.tag);
			output.push('>');
		}
		TreeNode::Text(text) => output.push_str(&html_escape(text)),
	}
}

/// Escapes text for element content and quoted attribute values.
pub fn html_escape(s: &str) -> Cow<'_, str> {
	if s.contains(['&', '<', '>', '"', '\'']) {
		let mut escaped = String::with_capacity(s.len() + 8);
		for c in s.chars() {
			match c {
				'&' => escaped.push_str("&amp;"),
				'<' => escaped.push_str("&lt;"),
				'>' => escaped.push_str("&gt;"),
				'"' => escaped.push_str("&quot;"),
				'\'' => escaped.push_str("&#x27;"),
				_ => escaped.push(c),
			}
		}
		Cow::Owned(escaped)
	} else {
		Cow::Borrowed(s)
	}
}
