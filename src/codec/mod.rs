//! Tree↔struct codec.
//!
//! Decoding walks a [`Node`] tree and writes into a target in place, guided
//! by the target's [`TypeDescriptor`](crate::reflect::TypeDescriptor).
//! Parts of the target without a matching node keep their current value, so
//! a target pre-seeded with defaults is only overridden where the source
//! says something.
//!
//! Encoding is the structural mirror: a value becomes a tree that decodes
//! back into an equal value.
//!
//! The per-shape functions in [`decode`] and [`encode`] are public because
//! the [`configurable!`](crate::configurable) and
//! [`custom_scalar!`](crate::custom_scalar) macros expand to calls to them.

mod decode;
mod encode;


pub use decode::{
    decode_bool, decode_custom, decode_from_str, decode_map, decode_pointer, decode_raw_map,
    decode_slice, decode_struct, raw_from_node,
};
pub use encode::{encode_entries, encode_items, encode_pointer, encode_struct};

use crate::defaults::{PATH_SEPARATOR, ROOT_NAME};
use crate::error::{ConfigError, ROOT_PATH};
use crate::node::Node;
use crate::reflect::Configurable;

/// Options controlling a decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Name of the implicit root wrapper segment
    pub root_name: String,
    /// Reject nodes that match no field
    pub strict: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            root_name: ROOT_NAME.to_string(),
            strict: false,
        }
    }
}

impl DecodeOptions {
    /// Sets the root wrapper name.
    #[must_use]
    pub fn with_root_name(mut self, root_name: impl Into<String>) -> Self {
        self.root_name = root_name.into();
        self
    }

    /// Enables or disables strict mode.
    #[must_use]
    pub const fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

/// State threaded through a decode: the options and the current path.
#[derive(Debug)]
pub struct DecodeContext<'a> {
    options: &'a DecodeOptions,
    path: Vec<String>,
}

impl<'a> DecodeContext<'a> {
    /// Creates a context positioned at the root.
    #[must_use]
    pub const fn new(options: &'a DecodeOptions) -> Self {
        Self {
            options,
            path: Vec::new(),
        }
    }

    /// Descends into a child.
    pub fn push(&mut self, name: &str) {
        self.path.push(name.to_string());
    }

    /// Returns to the parent.
    pub fn pop(&mut self) {
        self.path.pop();
    }

    /// Dotted path of the current node.
    #[must_use]
    pub fn path(&self) -> String {
        if self.path.is_empty() {
            ROOT_PATH.to_string()
        } else {
            self.path.join(&PATH_SEPARATOR.to_string())
        }
    }

    /// Dotted path of a child of the current node.
    #[must_use]
    pub fn child_path(&self, name: &str) -> String {
        if self.path.is_empty() {
            name.to_string()
        } else {
            format!("{}{PATH_SEPARATOR}{name}", self.path())
        }
    }

    /// Returns `true` if unknown nodes are errors.
    #[must_use]
    pub const fn is_strict(&self) -> bool {
        self.options.strict
    }
}

/// Options controlling an encode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Name given to the root node
    pub root_name: String,
    /// Omit fields holding their zero value
    pub sparse: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            root_name: ROOT_NAME.to_string(),
            sparse: false,
        }
    }
}

impl EncodeOptions {
    /// Enables or disables sparse output.
    #[must_use]
    pub const fn with_sparse(mut self, sparse: bool) -> Self {
        self.sparse = sparse;
        self
    }
}

/// State threaded through an encode.
#[derive(Debug, Clone, Copy, Default)]
pub struct EncodeContext {
    /// Omit zero-valued fields
    pub sparse: bool,
}

/// Decodes `root` into `target`.
///
/// `root` is the wrapper node (its own name is ignored); its children are
/// matched against the target's fields.
///
/// # Errors
///
/// Returns the first error met, annotated with the path of the offending
/// node. The target may be partially written when an error is returned.
pub fn decode<T: Configurable>(
    root: &Node,
    target: &mut T,
    options: &DecodeOptions,
) -> Result<(), ConfigError> {
    tracing::trace!(root = %options.root_name, children = root.children.len(), "Decoding node tree");
    let mut cx = DecodeContext::new(options);
    target.decode(root, &mut cx)
}

/// Encodes `value` into a tree rooted at `options.root_name`.
#[must_use]
pub fn encode<T: Configurable>(value: &T, options: &EncodeOptions) -> Node {
    let cx = EncodeContext {
        sparse: options.sparse,
    };
    value
        .encode(&options.root_name, &cx)
        .unwrap_or_else(|| Node::new(options.root_name.clone()))
}
