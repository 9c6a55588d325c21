//! The node tree: the intermediate representation shared by every source.
//!
//! A [`Node`] is a named entry that either carries a scalar (as text, plus an
//! optional native value supplied by file adapters) or an ordered list of
//! children. Trees are built fresh by an adapter, handed to the codec, and
//! dropped.
//!
//! Builders live in [`build`]:
//! - [`from_paths`] for flat `dotted.path = value` pairs (env, flags)
//! - [`from_document`] for nested documents (files)

mod build;

#[cfg(test)]
mod node_tests;

pub use build::{from_document, from_paths, from_value};

use crate::value::RawValue;

/// One node of a configuration tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    /// Name as written in the source, original case preserved.
    pub name: String,
    /// Scalar text, if this node is a leaf.
    pub value: Option<String>,
    /// Native typed value attached by adapters that know it.
    pub native: Option<RawValue>,
    /// Children in source order.
    pub children: Vec<Self>,
    /// Children came from a native sequence.
    pub sequence: bool,
    /// Children came from a native mapping, so digit names are keys.
    pub mapping: bool,
}

impl Node {
    /// Creates an empty node.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Creates a leaf node holding `value`.
    #[must_use]
    pub fn leaf(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// Attaches a native value.
    #[must_use]
    pub fn with_native(mut self, native: RawValue) -> Self {
        self.native = Some(native);
        self
    }

    /// Replaces the children.
    #[must_use]
    pub fn with_children(mut self, children: Vec<Self>) -> Self {
        self.children = children;
        self
    }

    /// Marks the children as positional sequence items.
    #[must_use]
    pub const fn into_sequence(mut self) -> Self {
        self.sequence = true;
        self
    }

    /// Marks the children as keyed entries, even when named by digits.
    #[must_use]
    pub const fn into_mapping(mut self) -> Self {
        self.mapping = true;
        self
    }

    /// Appends a child.
    pub fn push(&mut self, child: Self) {
        self.children.push(child);
    }

    /// Finds a child by name.
    ///
    /// An exact-case match wins over a case-insensitive one.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Self> {
        self.children
            .iter()
            .find(|c| c.name == name)
            .or_else(|| self.children.iter().find(|c| c.name.eq_ignore_ascii_case(name)))
    }

    /// Returns `true` if the node carries nothing: no value, no children
    /// and no native value (an explicit empty list or map is not empty).
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.value.is_none() && self.children.is_empty() && self.native.is_none()
    }

    /// Returns `true` if the node has children.
    #[must_use]
    pub const fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Returns `true` if the children are positional items.
    ///
    /// Trees built from flat paths carry no shape marker, so there children
    /// that are all named by decimal indices count as a sequence too. Nodes
    /// marked as mappings never do.
    #[must_use]
    pub fn is_sequence(&self) -> bool {
        self.sequence
            || (!self.mapping
                && self.has_children()
                && self.children.iter().all(|c| c.index().is_some()))
    }

    /// Parses the node name as a sequence index.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        if self.name.is_empty() || !self.name.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        self.name.parse().ok()
    }

    /// Describes the node shape for error messages.
    #[must_use]
    pub const fn shape(&self) -> &'static str {
        if self.has_children() {
            "subtree"
        } else if self.value.is_some() {
            "scalar"
        } else {
            "empty node"
        }
    }

    /// Flattens the tree into `(dotted.path, value)` pairs.
    ///
    /// Paths are relative to `self` (its own name is not included). Only
    /// nodes carrying a value produce a pair.
    #[must_use]
    pub fn flatten(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        for child in &self.children {
            flatten_into(child, &child.name, &mut out);
        }
        out
    }
}

fn flatten_into(node: &Node, path: &str, out: &mut Vec<(String, String)>) {
    if let Some(value) = &node.value {
        out.push((path.to_string(), value.clone()));
    }
    for child in &node.children {
        let child_path = format!("{path}{}{}", crate::defaults::PATH_SEPARATOR, child.name);
        flatten_into(child, &child_path, out);
    }
}
