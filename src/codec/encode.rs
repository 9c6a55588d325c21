//! Value → node encoding.

use crate::defaults::ENABLE_MARKER;
use crate::node::Node;
use crate::reflect::{ConfigStruct, Configurable, StructDescriptor};
use crate::value::{RawMap, RawValue};

use super::EncodeContext;

/// Encodes a struct as a node with one child per field.
///
/// Promoted fields of flattened members are inlined. In sparse mode fields
/// holding their zero value are left out.
#[must_use]
pub fn encode_struct(value: &dyn ConfigStruct, name: &str, cx: &EncodeContext) -> Node {
    let mut node = Node::new(name);
    append_fields(value, &value.struct_descriptor(), cx, &mut node);
    node
}

fn append_fields(
    value: &dyn ConfigStruct,
    descriptor: &StructDescriptor,
    cx: &EncodeContext,
    node: &mut Node,
) {
    for field in &descriptor.fields {
        let Some(member) = value.field(field.key) else {
            continue;
        };
        if cx.sparse && member.is_zero() {
            continue;
        }
        if field.is_promoted() {
            if let Some(inner) = member.as_struct() {
                append_fields(inner, &inner.struct_descriptor(), cx, node);
                continue;
            }
        }
        if let Some(child) = member.encode(field.name, cx) {
            node.push(child);
        }
    }
}

/// Encodes an optional value; `None` is absent.
///
/// A present value that encodes to nothing (a struct whose fields were all
/// omitted) becomes the enable marker so that decoding allocates it again.
#[must_use]
pub fn encode_pointer<T: Configurable>(
    value: Option<&T>,
    name: &str,
    cx: &EncodeContext,
) -> Option<Node> {
    let mut node = value?.encode(name, cx)?;
    if node.is_empty() {
        node.value = Some(ENABLE_MARKER.to_string());
        node.native = Some(RawValue::Mapping(RawMap::new()));
    }
    Some(node)
}

/// Encodes list items as children named by their index.
#[must_use]
pub fn encode_items<'a, T, I>(name: &str, items: I, cx: &EncodeContext) -> Node
where
    T: Configurable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut node = Node::new(name).into_sequence();
    for (index, item) in items.into_iter().enumerate() {
        if let Some(child) = item.encode(&index.to_string(), cx) {
            node.push(child);
        }
    }
    if !node.has_children() {
        node.native = Some(RawValue::Sequence(Vec::new()));
    }
    node
}

/// Encodes map entries as children named by their key, in iteration order.
#[must_use]
pub fn encode_entries<'a, V, I>(name: &str, entries: I, cx: &EncodeContext) -> Node
where
    V: Configurable + 'a,
    I: IntoIterator<Item = (&'a String, &'a V)>,
{
    let mut node = Node::new(name).into_mapping();
    for (key, value) in entries {
        if let Some(child) = value.encode(key, cx) {
            node.push(child);
        }
    }
    if !node.has_children() {
        node.native = Some(RawValue::Mapping(RawMap::new()));
    }
    node
}
