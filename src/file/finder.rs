//! Configuration file discovery.

use std::io;
use std::path::PathBuf;

use crate::defaults::file_extensions;
use crate::error::ConfigError;

/// Locates a configuration file.
///
/// An explicit path is used as given. Otherwise each base path (a file path
/// without extension, e.g. `/etc/app/config`) is tried with each extension
/// in order, and the first existing file wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finder {
    /// Candidate paths without extension
    pub base_paths: Vec<String>,
    /// Extensions to try, without the leading dot
    pub extensions: Vec<String>,
}

impl Default for Finder {
    fn default() -> Self {
        Self {
            base_paths: Vec::new(),
            extensions: file_extensions(),
        }
    }
}

impl Finder {
    /// Creates a finder over `base_paths` with the default extensions.
    #[must_use]
    pub fn new(base_paths: Vec<String>) -> Self {
        Self {
            base_paths,
            ..Self::default()
        }
    }

    /// Replaces the extensions to try.
    #[must_use]
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    /// Returns the file to load, or `None` when no candidate exists.
    ///
    /// # Errors
    ///
    /// Returns `SourceIo` if an explicit path does not exist or a candidate
    /// cannot be inspected.
    pub fn find(&self, explicit: Option<&str>) -> Result<Option<PathBuf>, ConfigError> {
        if let Some(explicit) = explicit.map(str::trim).filter(|p| !p.is_empty()) {
            let path = expand_home(explicit);
            return match path.try_exists() {
                Ok(true) => Ok(Some(path)),
                Ok(false) => Err(ConfigError::SourceIo {
                    path,
                    source: io::Error::new(io::ErrorKind::NotFound, "configuration file not found"),
                }),
                Err(source) => Err(ConfigError::SourceIo { path, source }),
            };
        }

        for candidate in self.candidates() {
            match candidate.try_exists() {
                Ok(true) => {
                    tracing::debug!(path = %candidate.display(), "Found configuration file");
                    return Ok(Some(candidate));
                }
                Ok(false) => {}
                Err(source) => {
                    return Err(ConfigError::SourceIo {
                        path: candidate,
                        source,
                    });
                }
            }
        }
        Ok(None)
    }

    /// Candidate paths in lookup order.
    #[must_use]
    pub fn candidates(&self) -> Vec<PathBuf> {
        self.base_paths
            .iter()
            .flat_map(|base| {
                self.extensions
                    .iter()
                    .map(move |ext| expand_home(&format!("{base}.{}", ext.trim_start_matches('.'))))
            })
            .collect()
    }
}

/// Expands a leading `~` to the home directory.
fn expand_home(path: &str) -> PathBuf {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') || rest.starts_with('\\') => rest,
        _ => return PathBuf::from(path),
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest.trim_start_matches(['/', '\\'])),
        None => PathBuf::from(path),
    }
}

