//! Error types for decoding, encoding and loading configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for configuration operations.
///
/// Decode errors carry the dotted path (relative to the root node) at which
/// they occurred. The root itself is reported as [`ROOT_PATH`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The shape of a node disagrees with the shape of the target type,
    /// e.g. a subtree mapped onto a plain string field.
    #[error("Structural mismatch at '{path}': expected {expected}, found {found}")]
    StructuralMismatch {
        /// Dotted path of the offending node
        path: String,
        /// Shape the target type requires
        expected: &'static str,
        /// Shape the node actually has
        found: &'static str,
    },

    /// A node has no matching field in the target type (strict mode only).
    #[error("Unknown field '{path}'")]
    UnknownField {
        /// Dotted path of the unmatched node
        path: String,
    },

    /// A scalar text could not be converted to the field's type.
    #[error("Invalid value '{value}' at '{path}': {reason}")]
    ScalarParse {
        /// Dotted path of the offending node
        path: String,
        /// The text that failed to parse
        value: String,
        /// Conversion failure reason
        reason: String,
    },

    /// A required field was neither provided nor pre-populated.
    #[error("Missing required field '{path}'")]
    MissingField {
        /// Dotted path of the missing field
        path: String,
    },

    /// No configuration source produced any data and one was required.
    #[error("No configuration found (tried: {tried})")]
    MissingRequiredSource {
        /// Comma-separated names of the sources that were tried
        tried: String,
    },

    /// Failed to read a configuration source.
    #[error("Failed to read '{}': {source}", path.display())]
    SourceIo {
        /// Path of the source
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A source was present but its syntax is invalid.
    #[error("Malformed {source_name}: {reason}")]
    MalformedSource {
        /// Human-readable source description (e.g. "TOML file 'a.toml'")
        source_name: String,
        /// Parser message
        reason: String,
    },

    /// File extension does not map to a supported format.
    #[error("Unsupported configuration format for '{}'", path.display())]
    UnsupportedFormat {
        /// Path with the unsupported extension
        path: PathBuf,
    },

    /// Command-line flags could not be tokenized.
    #[error("Invalid flags: {reason}")]
    Flag {
        /// What went wrong
        reason: String,
    },
}

/// Path reported for errors located at the root node.
pub const ROOT_PATH: &str = "<root>";

impl ConfigError {
    /// Creates a `StructuralMismatch` error.
    #[must_use]
    pub fn mismatch(path: impl Into<String>, expected: &'static str, found: &'static str) -> Self {
        Self::StructuralMismatch {
            path: path.into(),
            expected,
            found,
        }
    }

    /// Creates a `ScalarParse` error.
    #[must_use]
    pub fn parse(
        path: impl Into<String>,
        value: impl Into<String>,
        reason: impl ToString,
    ) -> Self {
        Self::ScalarParse {
            path: path.into(),
            value: value.into(),
            reason: reason.to_string(),
        }
    }

    /// Creates a `Flag` error.
    #[must_use]
    pub fn flag(reason: impl Into<String>) -> Self {
        Self::Flag {
            reason: reason.into(),
        }
    }

    /// Returns the dotted path the error points at, if it is a decode error.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::StructuralMismatch { path, .. }
            | Self::UnknownField { path }
            | Self::ScalarParse { path, .. }
            | Self::MissingField { path } => Some(path),
            _ => None,
        }
    }

    /// Returns `true` for errors caused by command-line flag input.
    #[must_use]
    pub const fn is_flag_error(&self) -> bool {
        matches!(self, Self::Flag { .. })
    }
}
