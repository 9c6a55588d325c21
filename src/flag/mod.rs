//! Flag adapter: command-line arguments ⇄ node trees.
//!
//! Accepted forms:
//! - `--server.port=8080` and `--server.port 8080`
//! - `--debug` for booleans and `--tls` to enable an optional section
//! - `--names=a --names=b` (a repeated list flag adds items)
//! - `--servers[0].host=x` (bracket indices)
//! - `--read-timeout` (dashes stand for underscores)
//! - `--` ends flag parsing
//!
//! Single-dash long names (`-debug`) are accepted too.


use std::collections::HashMap;

use crate::codec::{DecodeOptions, decode};
use crate::defaults::{ENABLE_MARKER, LIST_SEPARATOR, PATH_SEPARATOR};
use crate::error::ConfigError;
use crate::node::{Node, from_paths};
use crate::reflect::{Configurable, SegmentMode, TypeDescriptor, resolve_path};

const TERMINATOR: &str = "--";

/// Returns `true` if `-h` or `--help` appears before the terminator.
#[must_use]
pub fn is_help_requested(args: &[String]) -> bool {
    args.iter()
        .take_while(|arg| *arg != TERMINATOR)
        .any(|arg| arg == "-h" || arg == "--help")
}

struct Parsed {
    path: String,
    value: String,
    list: bool,
}

/// Parses flags into `(dotted.path, value)` pairs with canonical field
/// names, in argument order.
///
/// # Errors
///
/// Returns a `Flag` error for positional arguments, unknown flags and
/// flags missing their value.
pub fn parse(args: &[String], descriptor: &TypeDescriptor) -> Result<Vec<(String, String)>, ConfigError> {
    let mut parsed = Vec::new();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        if arg == TERMINATOR {
            break;
        }
        let Some(flag) = arg.strip_prefix("--").or_else(|| arg.strip_prefix('-')) else {
            return Err(ConfigError::flag(format!("unexpected argument '{arg}'")));
        };
        let (name, inline) = match flag.split_once('=') {
            Some((name, value)) => (name, Some(value.to_string())),
            None => (flag, None),
        };

        let segments = segments(name);
        let resolved = (!segments.is_empty())
            .then(|| resolve_path(descriptor, &segments, SegmentMode::Exact))
            .flatten()
            .ok_or_else(|| ConfigError::flag(format!("unknown flag '--{name}'")))?;

        let value = match inline {
            Some(value) => value,
            None if resolved.target.accepts_bare_flag() => ENABLE_MARKER.to_string(),
            None => iter
                .next()
                .cloned()
                .ok_or_else(|| ConfigError::flag(format!("missing value for flag '--{name}'")))?,
        };

        let list = matches!(resolved.target.pointee(), TypeDescriptor::Slice(element) if element.is_leaf());
        parsed.push(Parsed {
            path: resolved.segments.join(&PATH_SEPARATOR.to_string()),
            value,
            list,
        });
    }

    Ok(index_repeated_lists(parsed))
}

/// Rewrites `name` (`read-timeout`, `servers[0].host`) into path segments.
fn segments(name: &str) -> Vec<String> {
    name.replace('-', "_")
        .replace('[', ".")
        .replace(']', "")
        .split(PATH_SEPARATOR)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Gives each item of a list flag given more than once its own index.
///
/// Every occurrence is split on `,` first, so `--names=a,b --names=c`
/// yields three items.
fn index_repeated_lists(parsed: Vec<Parsed>) -> Vec<(String, String)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for flag in parsed.iter().filter(|f| f.list) {
        *counts.entry(flag.path.to_ascii_lowercase()).or_default() += 1;
    }

    let mut next_index: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::with_capacity(parsed.len());
    for flag in parsed {
        let key = flag.path.to_ascii_lowercase();
        if !flag.list || counts.get(&key).copied().unwrap_or(0) < 2 {
            out.push((flag.path, flag.value));
            continue;
        }
        let index = next_index.entry(key).or_default();
        let items = flag
            .value
            .split(LIST_SEPARATOR)
            .map(str::trim)
            .filter(|item| !item.is_empty());
        for item in items {
            out.push((format!("{}{PATH_SEPARATOR}{index}", flag.path), item.to_string()));
            *index += 1;
        }
    }
    out
}

/// Builds the node tree for `args`.
///
/// # Errors
///
/// Any error from [`parse`], or `StructuralMismatch` if two flags disagree
/// on the shape of a path.
pub fn read_tree<T: Configurable>(args: &[String], root_name: &str) -> Result<Node, ConfigError> {
    let pairs = parse(args, &T::descriptor())?;
    from_paths(
        root_name,
        pairs
            .into_iter()
            .map(|(path, value)| (format!("{root_name}{PATH_SEPARATOR}{path}"), value)),
    )
}

/// Decodes `args` into `target`.
///
/// Returns `false` without touching `target` when no flag was given.
///
/// # Errors
///
/// Any error from [`read_tree`] or from decoding.
pub fn decode_flags<T: Configurable>(
    args: &[String],
    target: &mut T,
    options: &DecodeOptions,
) -> Result<bool, ConfigError> {
    let tree = read_tree::<T>(args, &options.root_name)?;
    if tree.is_empty() {
        return Ok(false);
    }
    decode(&tree, target, options)?;
    Ok(true)
}

/// Renders a tree as `--path=value` arguments.
#[must_use]
pub fn to_flags(node: &Node) -> Vec<String> {
    node.flatten()
        .into_iter()
        .map(|(path, value)| format!("--{path}={value}"))
        .collect()
}
