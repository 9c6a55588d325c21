//! Node → value decoding, one function per target shape.

use std::fmt::Display;
use std::str::FromStr;

use crate::defaults::{DISABLE_MARKER, ENABLE_MARKER, LIST_SEPARATOR};
use crate::error::ConfigError;
use crate::node::Node;
use crate::reflect::{ConfigStruct, Configurable, FieldRoute, ScalarCodec, TypeDescriptor};
use crate::value::{RawMap, RawValue};

use super::DecodeContext;

/// Returns the text of a leaf node, `None` if the node holds nothing.
fn scalar_text<'n>(node: &'n Node, cx: &DecodeContext<'_>) -> Result<Option<&'n str>, ConfigError> {
    if node.has_children() {
        return Err(ConfigError::mismatch(cx.path(), "scalar", "subtree"));
    }
    if let Some(native) = node.native.as_ref().filter(|n| !n.is_scalar()) {
        return Err(ConfigError::mismatch(cx.path(), "scalar", native.kind_name()));
    }
    Ok(node.value.as_deref())
}

/// Parses a leaf with `FromStr`.
///
/// # Errors
///
/// `StructuralMismatch` for subtrees, `ScalarParse` if the text is invalid.
pub fn decode_from_str<T>(node: &Node, cx: &DecodeContext<'_>) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    let Some(text) = scalar_text(node, cx)? else {
        return Ok(None);
    };
    text.parse::<T>()
        .map(Some)
        .map_err(|e| ConfigError::parse(cx.path(), text, e))
}

/// Parses a boolean leaf.
///
/// Accepts `1`, `t`, `T`, `true`, `TRUE`, `True` and their false
/// counterparts `0`, `f`, `F`, `false`, `FALSE`, `False`.
///
/// # Errors
///
/// `StructuralMismatch` for subtrees, `ScalarParse` for any other text.
pub fn decode_bool(node: &Node, cx: &DecodeContext<'_>) -> Result<Option<bool>, ConfigError> {
    let Some(text) = scalar_text(node, cx)? else {
        return Ok(None);
    };
    match text {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(Some(true)),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(Some(false)),
        _ => Err(ConfigError::parse(cx.path(), text, "invalid boolean")),
    }
}

/// Parses a leaf with the type's own [`ScalarCodec`].
///
/// # Errors
///
/// `StructuralMismatch` for subtrees, `ScalarParse` if the codec rejects
/// the text.
pub fn decode_custom<T: ScalarCodec>(
    node: &Node,
    cx: &DecodeContext<'_>,
) -> Result<Option<T>, ConfigError> {
    let Some(text) = scalar_text(node, cx)? else {
        return Ok(None);
    };
    T::parse_from_str(text)
        .map(Some)
        .map_err(|reason| ConfigError::parse(cx.path(), text, reason))
}

/// Decodes an optional value, allocating it only for a non-empty node.
///
/// For struct pointees a bare `"true"` enables the section with its
/// defaults and `"false"` clears it.
///
/// # Errors
///
/// Propagates errors from decoding the pointee.
pub fn decode_pointer<T: Configurable + Default>(
    slot: &mut Option<T>,
    node: &Node,
    cx: &mut DecodeContext<'_>,
) -> Result<(), ConfigError> {
    if node.is_empty() {
        return Ok(());
    }

    if matches!(T::descriptor(), TypeDescriptor::Struct(_)) && !node.has_children() {
        match node.value.as_deref() {
            Some(DISABLE_MARKER) => {
                *slot = None;
                return Ok(());
            }
            Some(ENABLE_MARKER) => {
                slot.get_or_insert_with(T::default);
                return Ok(());
            }
            _ => {}
        }
    }

    slot.get_or_insert_with(T::default).decode(node, cx)
}

/// Returns `true` for the leaf a document leaves behind for an empty
/// mapping (`tls: {}`), the only scalar-looking node a section accepts.
fn is_empty_section(node: &Node) -> bool {
    node.value.as_deref() == Some(ENABLE_MARKER)
        && matches!(&node.native, Some(RawValue::Mapping(map)) if map.is_empty())
}

/// Decodes a struct node field by field.
///
/// # Errors
///
/// - `StructuralMismatch` if the node is a scalar or a sequence
/// - `UnknownField` for unmatched children in strict mode
/// - `MissingField` if a required field is neither provided nor set
/// - any error from decoding a field
pub fn decode_struct(
    target: &mut dyn ConfigStruct,
    node: &Node,
    cx: &mut DecodeContext<'_>,
) -> Result<(), ConfigError> {
    if node.sequence {
        return Err(ConfigError::mismatch(cx.path(), "struct", "sequence"));
    }
    if !node.has_children() && node.value.is_some() && !is_empty_section(node) {
        return Err(ConfigError::mismatch(cx.path(), "struct", "scalar"));
    }

    let descriptor = target.struct_descriptor();
    let mut matched: Vec<(&Node, FieldRoute)> = Vec::with_capacity(node.children.len());
    for child in &node.children {
        if let Some(route) = descriptor.resolve(&child.name) {
            matched.push((child, route));
            continue;
        }
        let path = cx.child_path(&child.name);
        if cx.is_strict() {
            return Err(ConfigError::UnknownField { path });
        }
        tracing::debug!(path = %path, "Ignoring unknown configuration field");
    }

    for (child, route) in &matched {
        let shadowed = !route.exact
            && matched
                .iter()
                .any(|(_, other)| other.exact && other.keys == route.keys);
        if shadowed {
            continue;
        }
        cx.push(&child.name);
        decode_routed(target, &route.keys, child, cx)?;
        cx.pop();
    }

    for field in descriptor.visible_fields().iter().filter(|f| f.required) {
        let Some(route) = descriptor.resolve(field.name) else {
            continue;
        };
        if matched.iter().any(|(_, r)| r.keys == route.keys) {
            continue;
        }
        if field_at(target, &route.keys).is_none_or(|value| value.is_zero()) {
            return Err(ConfigError::MissingField {
                path: cx.child_path(field.name),
            });
        }
    }

    Ok(())
}

fn decode_routed(
    target: &mut dyn ConfigStruct,
    keys: &[&str],
    node: &Node,
    cx: &mut DecodeContext<'_>,
) -> Result<(), ConfigError> {
    let Some((first, rest)) = keys.split_first() else {
        return Err(unknown_field(cx));
    };
    let Some(field) = target.field_mut(first) else {
        return Err(unknown_field(cx));
    };
    if rest.is_empty() {
        return field.decode(node, cx);
    }
    match field.as_struct_mut() {
        Some(inner) => decode_routed(inner, rest, node, cx),
        None => Err(unknown_field(cx)),
    }
}

fn unknown_field(cx: &DecodeContext<'_>) -> ConfigError {
    ConfigError::UnknownField { path: cx.path() }
}

fn field_at<'t>(target: &'t dyn ConfigStruct, keys: &[&str]) -> Option<&'t dyn Configurable> {
    let (first, rest) = keys.split_first()?;
    let field = target.field(first)?;
    if rest.is_empty() {
        Some(field)
    } else {
        field_at(field.as_struct()?, rest)
    }
}

/// Decodes a list, replacing the current contents.
///
/// Children are read in index order. A value-only node is split on `,`.
///
/// # Errors
///
/// `StructuralMismatch` for mappings, or errors from decoding an item.
pub fn decode_slice<T: Configurable + Default>(
    slot: &mut Vec<T>,
    node: &Node,
    cx: &mut DecodeContext<'_>,
) -> Result<(), ConfigError> {
    if node.is_empty() {
        return Ok(());
    }

    if !node.has_children() {
        match (&node.native, node.value.as_deref()) {
            (Some(RawValue::Sequence(_)), _) => slot.clear(),
            (Some(RawValue::Mapping(_)), _) => {
                return Err(ConfigError::mismatch(cx.path(), "list", "mapping"));
            }
            (_, Some(text)) => {
                slot.clear();
                let parts = text
                    .split(LIST_SEPARATOR)
                    .map(str::trim)
                    .filter(|part| !part.is_empty());
                for (index, part) in parts.enumerate() {
                    let name = index.to_string();
                    slot.push(decode_item(&Node::leaf(name, part), cx)?);
                }
            }
            (_, None) => {}
        }
        return Ok(());
    }

    if !node.is_sequence() {
        return Err(ConfigError::mismatch(cx.path(), "list", "mapping"));
    }

    let mut items: Vec<&Node> = node.children.iter().collect();
    items.sort_by_key(|child| child.index());
    slot.clear();
    for item in items {
        slot.push(decode_item(item, cx)?);
    }
    Ok(())
}

fn decode_item<T: Configurable + Default>(
    node: &Node,
    cx: &mut DecodeContext<'_>,
) -> Result<T, ConfigError> {
    let mut item = T::default();
    cx.push(&node.name);
    item.decode(node, cx)?;
    cx.pop();
    Ok(item)
}

/// Decodes the entries of a map node through `insert`.
///
/// Entries are added to (or merged into) the existing map.
///
/// # Errors
///
/// `StructuralMismatch` for scalars and sequences, or whatever `insert`
/// returns.
pub fn decode_map<F>(node: &Node, cx: &mut DecodeContext<'_>, mut insert: F) -> Result<(), ConfigError>
where
    F: FnMut(String, &Node, &mut DecodeContext<'_>) -> Result<(), ConfigError>,
{
    if node.sequence || matches!(node.native, Some(RawValue::Sequence(_))) {
        return Err(ConfigError::mismatch(cx.path(), "map", "sequence"));
    }
    if !node.has_children() {
        return if node.value.is_none() || is_empty_section(node) {
            Ok(())
        } else {
            Err(ConfigError::mismatch(cx.path(), "map", "scalar"))
        };
    }

    for child in &node.children {
        cx.push(&child.name);
        insert(child.name.clone(), child, cx)?;
        cx.pop();
    }
    Ok(())
}

/// Copies a subtree into a generic value, preferring native scalars.
///
/// Childless nodes without any value become an empty mapping.
#[must_use]
pub fn raw_from_node(node: &Node) -> RawValue {
    if node.has_children() {
        if node.is_sequence() {
            let mut items: Vec<&Node> = node.children.iter().collect();
            items.sort_by_key(|child| child.index());
            return RawValue::Sequence(items.into_iter().map(raw_from_node).collect());
        }
        return RawValue::Mapping(
            node.children
                .iter()
                .map(|child| (child.name.clone(), raw_from_node(child)))
                .collect(),
        );
    }

    match (&node.native, &node.value) {
        (Some(native), _) => native.clone(),
        (None, Some(text)) => RawValue::String(text.clone()),
        (None, None) => RawValue::Mapping(RawMap::new()),
    }
}

/// Merges a subtree into a raw map.
///
/// # Errors
///
/// `StructuralMismatch` if the node is a sequence or a plain scalar.
pub fn decode_raw_map(
    slot: &mut RawMap,
    node: &Node,
    cx: &DecodeContext<'_>,
) -> Result<(), ConfigError> {
    if node.is_sequence() || matches!(node.native, Some(RawValue::Sequence(_))) {
        return Err(ConfigError::mismatch(cx.path(), "mapping", "sequence"));
    }

    if node.has_children() {
        for child in &node.children {
            slot.insert(child.name.clone(), raw_from_node(child));
        }
        return Ok(());
    }

    match (&node.native, node.value.as_deref()) {
        (Some(RawValue::Mapping(map)), _) => {
            for (key, value) in map.iter() {
                slot.insert(key, value.clone());
            }
            Ok(())
        }
        (_, None) => Ok(()),
        _ => Err(ConfigError::mismatch(cx.path(), "mapping", "scalar")),
    }
}
