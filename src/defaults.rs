//! Default values shared by the codec and the source adapters.
//!
//! Centralized constants to avoid magic strings scattered across the codebase.

/// Name of the implicit wrapper node every tree is nested under.
pub const ROOT_NAME: &str = "cfgtree";

/// Environment variable prefix used when none is configured.
pub const ENV_PREFIX: &str = "CFGTREE_";

/// Separator between segments of a flat key path.
pub const PATH_SEPARATOR: char = '.';

/// Separator between segments of an environment variable name.
pub const ENV_SEPARATOR: char = '_';

/// Separator for list values written inline (`--names=a,b`).
pub const LIST_SEPARATOR: char = ',';

/// Value that enables a pointer section with its defaults (`--tls`).
pub const ENABLE_MARKER: &str = "true";

/// Value that disables a pointer section (`--tls=false`).
pub const DISABLE_MARKER: &str = "false";

/// File extensions tried during configuration file discovery.
pub const FILE_EXTENSIONS: &[&str] = &["toml", "yaml", "yml"];

/// Default extensions as owned strings.
#[must_use]
pub fn file_extensions() -> Vec<String> {
    FILE_EXTENSIONS.iter().map(ToString::to_string).collect()
}

/// Flag naming an explicit configuration file.
pub const CONFIG_FILE_FLAG: &str = "config-file";

/// Locations (without extension) searched for a configuration file.
pub const BASE_PATHS: &[&str] = &["/etc/cfgtree/cfgtree", "~/.config/cfgtree/cfgtree", "./cfgtree"];

/// Default base paths as owned strings.
#[must_use]
pub fn base_paths() -> Vec<String> {
    BASE_PATHS.iter().map(ToString::to_string).collect()
}
