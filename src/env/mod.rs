//! Environment adapter: `PREFIX_SEGMENT_SEGMENT=value` variables ⇄ node trees.
//!
//! Variable names are matched case-insensitively. Segments are joined by
//! `_`, and since field names may contain `_` themselves, each name is
//! resolved against the target type to find where one field ends and the
//! next begins (`APP_SERVER_READ_TIMEOUT` → `server.read_timeout`).


use crate::codec::{DecodeOptions, decode};
use crate::defaults::{ENV_SEPARATOR, PATH_SEPARATOR};
use crate::error::ConfigError;
use crate::node::{Node, from_paths};
use crate::reflect::{Configurable, SegmentMode, TypeDescriptor, resolve_path};

/// Provides environment variables.
pub trait EnvSource {
    /// Returns all `(name, value)` pairs.
    fn vars(&self) -> Vec<(String, String)>;
}

/// The process environment. Variables that are not valid UTF-8 are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn vars(&self) -> Vec<(String, String)> {
        std::env::vars_os()
            .filter_map(|(name, value)| Some((name.into_string().ok()?, value.into_string().ok()?)))
            .collect()
    }
}

impl EnvSource for Vec<(String, String)> {
    fn vars(&self) -> Vec<(String, String)> {
        self.clone()
    }
}

/// Selects the variables carrying `prefix` that address something in the
/// type described by `descriptor`.
///
/// Returns `(dotted.path, value)` pairs with canonical field names, sorted
/// by variable name.
///
/// # Errors
///
/// In strict mode, returns `UnknownField` for a prefixed variable that
/// addresses nothing.
pub fn find_prefixed_vars(
    vars: &[(String, String)],
    prefix: &str,
    descriptor: &TypeDescriptor,
    strict: bool,
) -> Result<Vec<(String, String)>, ConfigError> {
    let mut selected: Vec<(&str, String, &str)> = Vec::new();

    for (name, value) in vars {
        let Some(rest) = strip_prefix_ignore_case(name, prefix) else {
            continue;
        };
        let segments: Vec<String> = rest
            .split(ENV_SEPARATOR)
            .map(str::to_ascii_lowercase)
            .collect();

        let resolved = if segments.iter().any(String::is_empty) {
            None
        } else {
            resolve_path(descriptor, &segments, SegmentMode::Joined(ENV_SEPARATOR))
        };

        match resolved {
            Some(path) => {
                let dotted = path.segments.join(&PATH_SEPARATOR.to_string());
                selected.push((name, dotted, value));
            }
            None if strict => {
                return Err(ConfigError::UnknownField { path: name.clone() });
            }
            None => tracing::debug!(name = %name, "Ignoring environment variable matching no field"),
        }
    }

    selected.sort_by(|a, b| a.0.cmp(b.0));
    Ok(selected
        .into_iter()
        .map(|(_, path, value)| (path, value.to_string()))
        .collect())
}

fn strip_prefix_ignore_case<'a>(name: &'a str, prefix: &str) -> Option<&'a str> {
    let head = name.get(..prefix.len())?;
    let rest = name.get(prefix.len()..)?;
    (head.eq_ignore_ascii_case(prefix) && !rest.is_empty()).then_some(rest)
}

/// Builds the node tree for the prefixed variables of `source`.
///
/// # Errors
///
/// `UnknownField` in strict mode, `StructuralMismatch` if two variables
/// disagree on the shape of a path.
pub fn read_tree<T: Configurable>(
    source: &dyn EnvSource,
    prefix: &str,
    options: &DecodeOptions,
) -> Result<Node, ConfigError> {
    let pairs = find_prefixed_vars(&source.vars(), prefix, &T::descriptor(), options.strict)?;
    let root = &options.root_name;
    from_paths(
        root,
        pairs
            .into_iter()
            .map(|(path, value)| (format!("{root}{PATH_SEPARATOR}{path}"), value)),
    )
}

/// Decodes the prefixed variables of `source` into `target`.
///
/// Returns `false` without touching `target` when no variable matched.
///
/// # Errors
///
/// Any error from [`read_tree`] or from decoding.
pub fn decode_env<T: Configurable>(
    source: &dyn EnvSource,
    prefix: &str,
    target: &mut T,
    options: &DecodeOptions,
) -> Result<bool, ConfigError> {
    let tree = read_tree::<T>(source, prefix, options)?;
    if tree.is_empty() {
        return Ok(false);
    }
    decode(&tree, target, options)?;
    Ok(true)
}

/// Renders a tree as environment variables (`PREFIX_PATH_TO_FIELD`).
#[must_use]
pub fn to_env_vars(node: &Node, prefix: &str) -> Vec<(String, String)> {
    node.flatten()
        .into_iter()
        .map(|(path, value)| {
            let name = path.replace(PATH_SEPARATOR, &ENV_SEPARATOR.to_string());
            (format!("{prefix}{}", name.to_ascii_uppercase()), value)
        })
        .collect()
}
