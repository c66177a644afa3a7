//! Tree Reconciler - positional diff/patch of a live tree.
//!
//! [`reconcile`] makes the children of a live node match a sequence of candidate
//! nodes, writing to the host only where something actually differs. Children
//! are paired by index:
//!
//! | live        | candidate   | action                                         |
//! |-------------|-------------|------------------------------------------------|
//! | missing     | present     | append a copy of the candidate                 |
//! | present     | missing     | remove the live node                           |
//! | text        | text        | overwrite the content if it differs            |
//! | element `t` | element `t` | patch attributes, then recurse into children   |
//! | otherwise   |             | replace the live node with a copy, no recursion |
//!
//! Matched nodes keep their identity, so listeners and host-side state attached
//! to them survive the patch. Sibling moves are not detected: reordering a list
//! shows up as per-index content changes.

use crate::host::Host;
use crate::tree::{ElementNode, NodeKind, TreeNode};

/// Mutations performed by one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatchSummary {
	/// Candidate nodes appended to the live tree.
	pub appended: usize,
	/// Live nodes removed.
	pub removed: usize,
	/// Live nodes replaced wholesale.
	pub replaced: usize,
	/// Text nodes whose content was overwritten.
	pub text_updates: usize,
	/// Attributes written.
	pub attributes_set: usize,
	/// Attributes removed.
	pub attributes_removed: usize,
}

impl PatchSummary {
	/// Total number of host mutations.
	pub fn mutations(&self) -> usize {
		self.appended
			+ self.removed
			+ self.replaced
			+ self.text_updates
			+ self.attributes_set
			+ self.attributes_removed
	}

	/// Returns `true` if the live tree was left untouched.
	pub fn is_noop(&self) -> bool {
		self.mutations() == 0
	}
}

/// Patches the children of `live_parent` to match `candidate`.
pub fn reconcile<H: Host>(host: &mut H, live_parent: &H::Node, candidate: &[TreeNode]) -> PatchSummary {
	let mut summary = PatchSummary::default();
	patch_children(host, live_parent, candidate, &mut summary);
	tracing::trace!(
		appended = summary.appended,
		removed = summary.removed,
		replaced = summary.replaced,
		text_updates = summary.text_updates,
		attributes_set = summary.attributes_set,
		attributes_removed = summary.attributes_removed,
		"reconciled live tree"
	);
	summary
}

fn patch_children<H: Host>(
	host: &mut H,
	parent: &H::Node,
	candidate: &[TreeNode],
	summary: &mut PatchSummary,
) {
	// Snapshot the live children: removals below must not shift later indices.
	let live = host.children(parent);
	let len = live.len().max(candidate.len());

	for index in 0..len {
		match (live.get(index), candidate.get(index)) {
			(None, Some(next)) => {
				let node = host.materialize(next);
				host.append_child(parent, node);
				summary.appended += 1;
			}
			(Some(current), None) => {
				host.remove_child(parent, current);
				summary.removed += 1;
			}
			(Some(current), Some(next)) => patch_node(host, parent, current, next, summary),
			(None, None) => break,
		}
	}
}

fn patch_node<H: Host>(
	host: &mut H,
	parent: &H::Node,
	current: &H::Node,
	next: &TreeNode,
	summary: &mut PatchSummary,
) {
	match (host.node_kind(current), next) {
		(NodeKind::Text, TreeNode::Text(content)) => {
			if host.text_content(current).as_deref() != Some(content.as_str()) {
				host.set_text_content(current, content);
				summary.text_updates += 1;
			}
		}
		(NodeKind::Element(tag), TreeNode::Element(element)) if tag == element.tag => {
			patch_attributes(host, current, element, summary);
			patch_children(host, current, &element.children, summary);
		}
		_ => {
			let replacement = host.materialize(next);
			host.replace_child(parent, replacement, current);
			summary.replaced += 1;
		}
	}
}

fn patch_attributes<H: Host>(
	host: &mut H,
	current: &H::Node,
	element: &ElementNode,
	summary: &mut PatchSummary,
) {
	for (name, _) in host.attributes(current) {
		if element.attribute(&name).is_none() {
			host.remove_attribute(current, &name);
			summary.attributes_removed += 1;
		}
	}

	for (name, value) in &element.attributes {
		if host.get_attribute(current, name).as_deref() != Some(value.as_str()) {
			host.set_attribute(current, name, value);
			summary.attributes_set += 1;
		}
	}
}
