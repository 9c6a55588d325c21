//! Help text derived from a configuration type.

use std::collections::HashMap;

use crate::codec::{EncodeOptions, encode};
use crate::defaults::{LIST_SEPARATOR, PATH_SEPARATOR};
use crate::reflect::{Configurable, ScalarKind, TypeDescriptor};

/// Nesting depth after which the walk stops (recursive types).
const MAX_DEPTH: usize = 8;

/// One documented flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagHelp {
    /// Dotted flag path, without dashes
    pub path: String,
    /// Value type label
    pub type_label: String,
    /// Field description
    pub description: String,
    /// Value in the pre-seeded configuration, if any
    pub default: Option<String>,
    /// Field marked required
    pub required: bool,
}

/// Lists the flags accepted for `config`'s type with their current values.
#[must_use]
pub fn flag_help<T: Configurable>(config: &T) -> Vec<FlagHelp> {
    let defaults: HashMap<String, String> = encode(config, &EncodeOptions::default())
        .flatten()
        .into_iter()
        .map(|(path, value)| (path.to_ascii_lowercase(), value))
        .collect();

    let mut out = Vec::new();
    walk(&T::descriptor(), "", "", false, 0, &defaults, &mut out);
    out
}

fn walk(
    desc: &TypeDescriptor,
    path: &str,
    description: &str,
    required: bool,
    depth: usize,
    defaults: &HashMap<String, String>,
    out: &mut Vec<FlagHelp>,
) {
    if depth > MAX_DEPTH {
        return;
    }
    let entry = |type_label: String| FlagHelp {
        path: path.to_string(),
        type_label,
        description: description.to_string(),
        default: default_for(desc, path, defaults),
        required,
    };

    match desc {
        TypeDescriptor::Struct(inner) => {
            for field in inner.visible_fields() {
                walk(
                    &field.descriptor(),
                    &join(path, field.name),
                    field.description,
                    field.required,
                    depth + 1,
                    defaults,
                    out,
                );
            }
        }
        TypeDescriptor::Pointer(inner) if matches!(**inner, TypeDescriptor::Struct(_)) => {
            if !path.is_empty() {
                out.push(entry("optional".to_string()));
            }
            walk(inner, path, "", false, depth + 1, defaults, out);
        }
        TypeDescriptor::Slice(element) if !element.is_leaf() => {
            walk(element, &format!("{path}[n]"), description, false, depth + 1, defaults, out);
        }
        TypeDescriptor::Map(value) if !value.is_leaf() => {
            walk(value, &join(path, "<key>"), description, false, depth + 1, defaults, out);
        }
        TypeDescriptor::Map(value) => {
            let path = join(path, "<key>");
            out.push(FlagHelp {
                path,
                type_label: type_label(value),
                description: description.to_string(),
                default: None,
                required,
            });
        }
        other => out.push(entry(type_label(other))),
    }
}

fn join(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}{PATH_SEPARATOR}{name}")
    }
}

fn default_for(desc: &TypeDescriptor, path: &str, defaults: &HashMap<String, String>) -> Option<String> {
    let key = path.to_ascii_lowercase();
    if let TypeDescriptor::Slice(_) = desc.pointee() {
        let prefix = format!("{key}{PATH_SEPARATOR}");
        let mut items: Vec<(usize, &String)> = defaults
            .iter()
            .filter_map(|(k, v)| Some((k.strip_prefix(&prefix)?.parse().ok()?, v)))
            .collect();
        items.sort_unstable_by_key(|(index, _)| *index);
        let joined = items
            .into_iter()
            .map(|(_, v)| v.as_str())
            .collect::<Vec<_>>()
            .join(&LIST_SEPARATOR.to_string());
        return (!joined.is_empty()).then_some(joined);
    }
    defaults.get(&key).filter(|v| !v.is_empty()).cloned()
}

fn type_label(desc: &TypeDescriptor) -> String {
    match desc {
        TypeDescriptor::Scalar(kind) => match kind {
            ScalarKind::Bool => "bool",
            ScalarKind::Int => "int",
            ScalarKind::Uint => "uint",
            ScalarKind::Float => "float",
            ScalarKind::Char => "char",
            ScalarKind::String => "string",
            ScalarKind::Path => "path",
        }
        .to_string(),
        TypeDescriptor::Slice(element) => format!("[]{}", type_label(element)),
        TypeDescriptor::Map(value) => format!("map[string]{}", type_label(value)),
        TypeDescriptor::Pointer(inner) => type_label(inner),
        other => other.kind_name().to_string(),
    }
}

/// Renders the full help page.
#[must_use]
pub fn render<T: Configurable>(
    name: &str,
    description: &str,
    commands: &[(&str, &str)],
    config: &T,
) -> String {
    let mut lines: Vec<String> = Vec::new();
    if !description.is_empty() {
        lines.push(description.to_string());
        lines.push(String::new());
    }

    if commands.is_empty() {
        lines.push(format!("Usage: {name} [flags]"));
    } else {
        lines.push(format!("Usage: {name} [flags] [command] [flags]"));
        lines.push(String::new());
        lines.push("Commands:".to_string());
        let width = commands.iter().map(|(n, _)| n.len()).max().unwrap_or(0);
        lines.extend(
            commands
                .iter()
                .map(|(command, about)| format!("  {command:<width$}  {about}")),
        );
    }

    let flags = flag_help(config);
    let rows: Vec<(String, String)> = flags
        .iter()
        .map(|flag| (format!("--{} {}", flag.path, flag.type_label), annotation(flag)))
        .chain(std::iter::once(("-h, --help".to_string(), "Show this help".to_string())))
        .collect();
    let width = rows.iter().map(|(left, _)| left.len()).max().unwrap_or(0);

    lines.push(String::new());
    lines.push("Flags:".to_string());
    lines.extend(
        rows.iter()
            .map(|(left, right)| format!("  {left:<width$}  {right}").trim_end().to_string()),
    );

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// Description, required mark and default of one flag.
fn annotation(flag: &FlagHelp) -> String {
    let mut parts: Vec<String> = Vec::new();
    if !flag.description.is_empty() {
        parts.push(flag.description.clone());
    }
    if flag.required {
        parts.push("(required)".to_string());
    }
    if let Some(default) = &flag.default {
        parts.push(format!("(default {default})"));
    }
    parts.join(" ")
}
