//! Untyped configuration values.
//!
//! [`RawValue`] is the closed set of shapes a configuration document can
//! hold once its format-specific syntax is gone. File adapters unmarshal into
//! it, the node tree keeps its scalar variants as "native" values, and raw
//! configuration fields are filled with it.

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// A generic configuration value.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// Text value.
    String(String),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit float.
    Float(f64),
    /// Boolean.
    Bool(bool),
    /// Ordered list of values.
    Sequence(Vec<RawValue>),
    /// Insertion-ordered mapping.
    Mapping(RawMap),
}

impl RawValue {
    /// Returns the textual form of a scalar, or `None` for containers.
    #[must_use]
    pub fn to_text(&self) -> Option<String> {
        match self {
            Self::String(s) => Some(s.clone()),
            Self::Int(i) => Some(i.to_string()),
            Self::Float(f) => Some(f.to_string()),
            Self::Bool(b) => Some(b.to_string()),
            Self::Sequence(_) | Self::Mapping(_) => None,
        }
    }

    /// Returns the string slice if this is a `String` value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the mapping if this is a `Mapping` value.
    #[must_use]
    pub const fn as_mapping(&self) -> Option<&RawMap> {
        match self {
            Self::Mapping(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the items if this is a `Sequence` value.
    #[must_use]
    pub fn as_sequence(&self) -> Option<&[Self]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Returns `true` for string, number and boolean values.
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        !matches!(self, Self::Sequence(_) | Self::Mapping(_))
    }

    /// Short name of the variant, used in error messages.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Bool(_) => "boolean",
            Self::Sequence(_) => "sequence",
            Self::Mapping(_) => "mapping",
        }
    }
}

impl Default for RawValue {
    fn default() -> Self {
        Self::Mapping(RawMap::new())
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Vec<Self>> for RawValue {
    fn from(value: Vec<Self>) -> Self {
        Self::Sequence(value)
    }
}

impl From<RawMap> for RawValue {
    fn from(value: RawMap) -> Self {
        Self::Mapping(value)
    }
}

/// Insertion-ordered string-keyed map of [`RawValue`]s.
///
/// Keys are unique; inserting an existing key replaces its value in place
/// without moving it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawMap {
    entries: Vec<(String, RawValue)>,
}

impl RawMap {
    /// Creates an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Inserts a value, returning the previous value for the key if any.
    pub fn insert(&mut self, key: impl Into<String>, value: RawValue) -> Option<RawValue> {
        let key = key.into();
        if let Some(slot) = self.get_mut(&key) {
            return Some(std::mem::replace(slot, value));
        }
        self.entries.push((key, value));
        None
    }

    /// Looks up a value by exact key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Looks up a mutable value by exact key.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut RawValue> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Number of entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the map has no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<K: Into<String>> FromIterator<(K, RawValue)> for RawMap {
    fn from_iter<I: IntoIterator<Item = (K, RawValue)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl Serialize for RawValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::String(s) => serializer.serialize_str(s),
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::Float(f) => serializer.serialize_f64(*f),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Mapping(map) => map.serialize(serializer),
        }
    }
}

impl Serialize for RawMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
