//! Checkbox tree search
//!
//! Category pickers show a tree of checkable nodes with a search box. A
//! search term of at least [`DEFAULT_MIN_SEARCH_LENGTH`] characters filters
//! the tree down to the matching nodes and their ancestors, marks them
//! `found` and reports which nodes to expand so every match is visible.
//! Shorter terms restore the full tree with only the root expanded.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MIN_SEARCH_LENGTH: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
	pub key: String,
	pub label: String,
	/// Set by a search on matches and their ancestors
	#[serde(default)]
	pub found: bool,
	#[serde(default)]
	pub children: Vec<TreeNode>,
}

impl TreeNode {
	pub fn leaf(key: impl Into<String>, label: impl Into<String>) -> Self {
		Self {
			key: key.into(),
			label: label.into(),
			found: false,
			children: Vec::new(),
		}
	}

	pub fn branch(key: impl Into<String>, label: impl Into<String>, children: Vec<TreeNode>) -> Self {
		Self {
			children,
			..Self::leaf(key, label)
		}
	}

	/// Keys of this node and all descendants, depth first
	pub fn keys(&self) -> Vec<&str> {
		let mut keys = vec![self.key.as_str()];
		for child in &self.children {
			keys.extend(child.keys());
		}
		keys
	}

	fn cleared(&self) -> TreeNode {
		TreeNode {
			key: self.key.clone(),
			label: self.label.clone(),
			found: false,
			children: self.children.iter().map(TreeNode::cleared).collect(),
		}
	}
}

/// Outcome of [`CheckboxTree::search`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeSearch {
	/// Tree to display; `None` when nothing matched
	pub root: Option<TreeNode>,
	/// Nodes to expand, root first
	pub expanded: IndexSet<String>,
	/// Whether the term was long enough to filter
	pub filtered: bool,
}

#[derive(Debug, Clone)]
pub struct CheckboxTree {
	root: TreeNode,
	min_length: usize,
}

impl CheckboxTree {
	pub fn new(root: TreeNode) -> Self {
		Self {
			root,
			min_length: DEFAULT_MIN_SEARCH_LENGTH,
		}
	}

	pub fn with_min_length(mut self, min_length: usize) -> Self {
		self.min_length = min_length.max(1);
		self
	}

	pub fn root(&self) -> &TreeNode {
		&self.root
	}

	/// Filters the tree by a case-insensitive label match.
	///
	/// A matching node keeps its whole subtree; only nodes that match
	/// themselves, and their ancestors, are marked `found`.
	pub fn search(&self, term: &str) -> TreeSearch {
		let term = term.trim();
		if term.chars().count() < self.min_length {
			let mut expanded = IndexSet::new();
			expanded.insert(self.root.key.clone());
			return TreeSearch {
				root: Some(self.root.cleared()),
				expanded,
				filtered: false,
			};
		}

		let needle = term.to_lowercase();
		let mut expanded = IndexSet::new();
		let root = filter(&self.root, &needle, &mut expanded);
		TreeSearch {
			root,
			expanded,
			filtered: true,
		}
	}
}

// Ancestors of a match are expanded before their descendants are visited,
// so `expanded` lists keys root first.
fn filter(node: &TreeNode, needle: &str, expanded: &mut IndexSet<String>) -> Option<TreeNode> {
	let matches = node.label.to_lowercase().contains(needle);
	let slot = expanded.len();
	let filtered: Vec<(&TreeNode, Option<TreeNode>)> = node
		.children
		.iter()
		.map(|child| (child, filter(child, needle, expanded)))
		.collect();
	let descendant_found = filtered.iter().any(|(_, kept)| kept.is_some());

	if descendant_found {
		expanded.shift_insert(slot, node.key.clone());
	}
	if !matches && !descendant_found {
		return None;
	}

	let children = filtered
		.into_iter()
		.filter_map(|(child, kept)| match kept {
			Some(kept) => Some(kept),
			None if matches => Some(child.cleared()),
			None => None,
		})
		.collect();
	Some(TreeNode {
		key: node.key.clone(),
		label: node.label.clone(),
		found: true,
		children,
	})
}
