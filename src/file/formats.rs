//! Format detection, parsing into raw values and rendering.

use std::fmt;
use std::path::Path;

use crate::codec::raw_from_node;
use crate::error::ConfigError;
use crate::node::Node;
use crate::value::{RawMap, RawValue};

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// `.toml`
    Toml,
    /// `.yaml` / `.yml`
    Yaml,
    /// `.json`
    Json,
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Toml => "TOML",
            Self::Yaml => "YAML",
            Self::Json => "JSON",
        };
        f.write_str(name)
    }
}

impl FileFormat {
    /// Detects the format from an extension, with or without the leading
    /// dot, ignoring case.
    #[must_use]
    pub fn from_extension(extension: &str) -> Option<Self> {
        let extension = extension.trim_start_matches('.');
        if extension.eq_ignore_ascii_case("toml") {
            Some(Self::Toml)
        } else if extension.eq_ignore_ascii_case("yaml") || extension.eq_ignore_ascii_case("yml") {
            Some(Self::Yaml)
        } else if extension.eq_ignore_ascii_case("json") {
            Some(Self::Json)
        } else {
            None
        }
    }

    /// Detects the format from a file path.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedFormat` if the extension is missing or unknown.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| ConfigError::UnsupportedFormat {
                path: path.to_path_buf(),
            })
    }

    /// Parses `content` into a document.
    ///
    /// Blank content is an empty mapping. Null values and null keys are
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns `MalformedSource` (labelled with `source_name`) on syntax
    /// errors.
    pub fn parse(self, content: &str, source_name: &str) -> Result<RawValue, ConfigError> {
        if content.trim().is_empty() {
            return Ok(RawValue::Mapping(RawMap::new()));
        }

        let malformed = |reason: String| ConfigError::MalformedSource {
            source_name: format!("{self} {source_name}"),
            reason,
        };

        let document = match self {
            Self::Toml => toml::from_str::<toml::Table>(content)
                .map(|table| from_toml(toml::Value::Table(table)))
                .map_err(|e| malformed(e.to_string()))?,
            Self::Yaml => serde_yaml::from_str::<serde_yaml::Value>(content)
                .map(from_yaml)
                .map_err(|e| malformed(e.to_string()))?,
            Self::Json => serde_json::from_str::<serde_json::Value>(content)
                .map(from_json)
                .map_err(|e| malformed(e.to_string()))?,
        };

        Ok(document.unwrap_or_else(|| RawValue::Mapping(RawMap::new())))
    }

    /// Renders a node tree as a document of this format.
    ///
    /// The root node's own name is not written.
    ///
    /// # Errors
    ///
    /// Returns `MalformedSource` if the serializer rejects the document.
    pub fn render(self, node: &Node) -> Result<String, ConfigError> {
        let document = match raw_from_node(node) {
            RawValue::Mapping(map) => RawValue::Mapping(map),
            _ => RawValue::Mapping(RawMap::new()),
        };
        let malformed = |reason: String| ConfigError::MalformedSource {
            source_name: format!("{self} output"),
            reason,
        };

        match self {
            Self::Toml => toml::to_string(&document).map_err(|e| malformed(e.to_string())),
            Self::Yaml => serde_yaml::to_string(&document).map_err(|e| malformed(e.to_string())),
            Self::Json => serde_json::to_string_pretty(&document)
                .map(|mut json| {
                    json.push('\n');
                    json
                })
                .map_err(|e| malformed(e.to_string())),
        }
    }
}

fn from_toml(value: toml::Value) -> Option<RawValue> {
    Some(match value {
        toml::Value::String(s) => RawValue::String(s),
        toml::Value::Integer(i) => RawValue::Int(i),
        toml::Value::Float(f) => RawValue::Float(f),
        toml::Value::Boolean(b) => RawValue::Bool(b),
        toml::Value::Datetime(dt) => RawValue::String(dt.to_string()),
        toml::Value::Array(items) => {
            RawValue::Sequence(items.into_iter().filter_map(from_toml).collect())
        }
        toml::Value::Table(table) => RawValue::Mapping(
            table
                .into_iter()
                .filter_map(|(key, value)| Some((key, from_toml(value)?)))
                .collect(),
        ),
    })
}

fn from_json(value: serde_json::Value) -> Option<RawValue> {
    Some(match value {
        serde_json::Value::Null => return None,
        serde_json::Value::Bool(b) => RawValue::Bool(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                RawValue::Int(i)
            } else if let Some(f) = n.as_f64().filter(|_| n.is_f64()) {
                RawValue::Float(f)
            } else {
                RawValue::String(n.to_string())
            }
        }
        serde_json::Value::String(s) => RawValue::String(s),
        serde_json::Value::Array(items) => {
            RawValue::Sequence(items.into_iter().filter_map(from_json).collect())
        }
        serde_json::Value::Object(object) => RawValue::Mapping(
            object
                .into_iter()
                .filter_map(|(key, value)| Some((key, from_json(value)?)))
                .collect(),
        ),
    })
}

fn from_yaml(value: serde_yaml::Value) -> Option<RawValue> {
    Some(match value {
        serde_yaml::Value::Null => return None,
        serde_yaml::Value::Bool(b) => RawValue::Bool(b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                RawValue::Int(i)
            } else if let Some(f) = n.as_f64().filter(|_| n.is_f64()) {
                RawValue::Float(f)
            } else {
                RawValue::String(n.to_string())
            }
        }
        serde_yaml::Value::String(s) => RawValue::String(s),
        serde_yaml::Value::Sequence(items) => {
            RawValue::Sequence(items.into_iter().filter_map(from_yaml).collect())
        }
        serde_yaml::Value::Mapping(mapping) => RawValue::Mapping(
            mapping
                .into_iter()
                .filter_map(|(key, value)| Some((yaml_key(key)?, from_yaml(value)?)))
                .collect(),
        ),
        serde_yaml::Value::Tagged(tagged) => return from_yaml(tagged.value),
    })
}

fn yaml_key(key: serde_yaml::Value) -> Option<String> {
    match key {
        serde_yaml::Value::String(s) => Some(s),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Tagged(tagged) => yaml_key(tagged.value),
        serde_yaml::Value::Null | serde_yaml::Value::Sequence(_) | serde_yaml::Value::Mapping(_) => {
            None
        }
    }
}
