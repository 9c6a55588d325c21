//! File adapter: TOML, YAML and JSON documents ⇄ node trees.
//!
//! This module provides:
//! - Format detection and parsing ([`FileFormat`])
//! - Decoding a file or an in-memory document into a target ([`decode_file`], [`decode_content`])
//! - Discovery of configuration files ([`Finder`])
//!
//! Key order is preserved and scalars keep their native type (integers,
//! floats, booleans), which raw sections receive unchanged.

mod finder;
mod formats;

#[cfg(test)]
mod file_tests;

pub use finder::Finder;
pub use formats::FileFormat;

use std::path::Path;

use crate::codec::{DecodeOptions, decode};
use crate::error::ConfigError;
use crate::node::{Node, from_document};
use crate::reflect::Configurable;

/// Reads a file into a node tree rooted at `root_name`.
///
/// # Errors
///
/// - `UnsupportedFormat` for an unknown extension
/// - `SourceIo` if the file cannot be read
/// - `MalformedSource` on syntax errors
/// - `StructuralMismatch` if the document root is not a mapping
pub fn read_tree(path: &Path, root_name: &str) -> Result<Node, ConfigError> {
    let format = FileFormat::from_path(path)?;
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::SourceIo {
        path: path.to_path_buf(),
        source,
    })?;
    let source_name = format!("file '{}'", path.display());
    parse_tree(&content, format, &source_name, root_name)
}

/// Parses a document into a node tree rooted at `root_name`.
///
/// # Errors
///
/// `MalformedSource` on syntax errors, `StructuralMismatch` if the document
/// root is not a mapping.
pub fn parse_tree(
    content: &str,
    format: FileFormat,
    source_name: &str,
    root_name: &str,
) -> Result<Node, ConfigError> {
    let document = format.parse(content, source_name)?;
    from_document(root_name, document)
}

/// Decodes a configuration file into `target`.
///
/// Returns `false` without touching `target` when the document is empty.
///
/// # Errors
///
/// Any error from [`read_tree`] or from decoding.
pub fn decode_file<T: Configurable>(
    path: &Path,
    target: &mut T,
    options: &DecodeOptions,
) -> Result<bool, ConfigError> {
    let tree = read_tree(path, &options.root_name)?;
    decode_tree(&tree, target, options)
}

/// Decodes an in-memory document into `target`.
///
/// Returns `false` without touching `target` when the document is empty.
///
/// # Errors
///
/// `MalformedSource` on syntax errors, or any decode error.
pub fn decode_content<T: Configurable>(
    content: &str,
    format: FileFormat,
    target: &mut T,
    options: &DecodeOptions,
) -> Result<bool, ConfigError> {
    let tree = parse_tree(content, format, "content", &options.root_name)?;
    decode_tree(&tree, target, options)
}

fn decode_tree<T: Configurable>(
    tree: &Node,
    target: &mut T,
    options: &DecodeOptions,
) -> Result<bool, ConfigError> {
    if tree.is_empty() {
        return Ok(false);
    }
    decode(tree, target, options)?;
    Ok(true)
}
