//! Markup parsing built on `scraper`.
//!
//! Markup is parsed as an HTML body fragment, the way a `<template>` element
//! parses its `innerHTML`. Tag and attribute names come out lower case and
//! comments are dropped.

use scraper::{ElementRef, Html, Node};
use tessera_core::{ElementNode, HostError, TreeNode};

/// Parses `markup` into candidate nodes.
///
/// HTML parsing recovers from malformed input, so this only fails in strict
/// mode, where any recovery is reported as [`HostError::Parse`].
pub fn parse_fragment(markup: &str, strict: bool) -> Result<Vec<TreeNode>, HostError> {
	let fragment = Html::parse_fragment(markup);

	if !fragment.errors.is_empty() {
		tracing::trace!(errors = ?fragment.errors, "markup parsed with recoverable errors");
		if strict {
			return Err(HostError::Parse(fragment.errors.join("; ")));
		}
	}

	let mut nodes = Vec::new();
	convert_children(fragment.root_element(), &mut nodes);
	Ok(nodes)
}

fn convert_children(parent: ElementRef<'_>, out: &mut Vec<TreeNode>) {
	for child in parent.children() {
		match child.value() {
			Node::Text(text) => out.push(TreeNode::text(&**text)),
			Node::Element(_) => {
				if let Some(element) = ElementRef::wrap(child) {
					out.push(convert_element(element));
				}
			}
			_ => {}
		}
	}
}

fn convert_element(element: ElementRef<'_>) -> TreeNode {
	let value = element.value();
	let mut node = ElementNode::new(value.name());
	for (name, attribute) in value.attrs() {
		node.set_attribute(name, attribute);
	}
	convert_children(element, &mut node.children);
	node.into()
}
