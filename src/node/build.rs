//! Node tree construction from flat paths and nested documents.

use crate::defaults::{ENABLE_MARKER, PATH_SEPARATOR};
use crate::error::{ConfigError, ROOT_PATH};
use crate::value::RawValue;

use super::Node;

/// Builds a tree from flat `(dotted.path, value)` pairs.
///
/// Intermediate nodes are created on first sight and keep that order. A
/// leading segment equal to `root_name` (any case) is dropped, and
/// `name[3]` is read as `name.3`. Repeating a leaf path overwrites its value.
///
/// # Errors
///
/// Returns `StructuralMismatch` if a path descends through an existing
/// scalar node or assigns a value to a node that already has children.
pub fn from_paths<I, K, V>(root_name: &str, pairs: I) -> Result<Node, ConfigError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let mut root = Node::new(root_name);
    for (path, value) in pairs {
        let segments = split_path(path.as_ref(), root_name);
        if segments.is_empty() {
            continue;
        }
        insert(&mut root, &segments, value.into())?;
    }
    Ok(root)
}

/// Splits a dotted path into segments, dropping the root wrapper.
pub(crate) fn split_path(path: &str, root_name: &str) -> Vec<String> {
    let normalized = path.replace('[', ".").replace(']', "");
    let mut segments: Vec<String> = normalized
        .split(PATH_SEPARATOR)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect();

    if segments
        .first()
        .is_some_and(|first| first.eq_ignore_ascii_case(root_name))
    {
        segments.remove(0);
    }
    segments
}

fn insert(root: &mut Node, segments: &[String], value: String) -> Result<(), ConfigError> {
    let mut node = root;
    for (depth, segment) in segments.iter().enumerate() {
        if depth > 0 && node.value.is_some() {
            // `--tls --tls.cert=x`: the marker is implied by the children.
            if node.value.as_deref() == Some(ENABLE_MARKER) {
                node.value = None;
            } else {
                return Err(ConfigError::mismatch(
                    segments[..depth].join("."),
                    "subtree",
                    "scalar",
                ));
            }
        }

        let index = match node.children.iter().position(|c| &c.name == segment) {
            Some(index) => index,
            None => {
                node.children.push(Node::new(segment.clone()));
                node.children.len() - 1
            }
        };
        node = &mut node.children[index];
    }

    if node.has_children() {
        if value == ENABLE_MARKER {
            return Ok(());
        }
        return Err(ConfigError::mismatch(segments.join("."), "scalar", "subtree"));
    }

    node.value = Some(value);
    Ok(())
}

/// Builds a tree from a nested document.
///
/// Mappings become named subtrees, sequences become children named `0..n`
/// and marked as sequences, scalars become leaves that keep both their text
/// and their native value. A present-but-empty mapping becomes a leaf
/// holding the enable marker so optional sections it names get allocated.
///
/// # Errors
///
/// Returns `StructuralMismatch` if the document root is not a mapping.
pub fn from_document(root_name: &str, document: RawValue) -> Result<Node, ConfigError> {
    match document {
        RawValue::Mapping(map) => {
            let children = map
                .iter()
                .map(|(key, value)| from_value(key, value))
                .collect();
            Ok(Node::new(root_name).with_children(children).into_mapping())
        }
        other => Err(ConfigError::mismatch(ROOT_PATH, "mapping", other.kind_name())),
    }
}

/// Builds the subtree for one document value.
///
/// Used for file documents and for raw values being encoded.
#[must_use]
pub fn from_value(name: &str, value: &RawValue) -> Node {
    match value {
        RawValue::Mapping(map) if map.is_empty() => {
            Node::leaf(name, ENABLE_MARKER).with_native(value.clone())
        }
        RawValue::Mapping(map) => Node::new(name)
            .with_children(
                map.iter()
                    .map(|(key, value)| from_value(key, value))
                    .collect(),
            )
            .into_mapping(),
        RawValue::Sequence(items) if items.is_empty() => {
            Node::new(name).into_sequence().with_native(value.clone())
        }
        RawValue::Sequence(items) => Node::new(name)
            .with_children(
                items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| from_value(&index.to_string(), item))
                    .collect(),
            )
            .into_sequence(),
        scalar => {
            let text = scalar.to_text().unwrap_or_default();
            Node::leaf(name, text).with_native(scalar.clone())
        }
    }
}
