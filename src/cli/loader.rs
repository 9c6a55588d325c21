//! Configuration loaders and the chain that tries them in order.

use std::path::{Path, PathBuf};

use crate::codec::DecodeOptions;
use crate::defaults::{CONFIG_FILE_FLAG, ENV_PREFIX, base_paths, file_extensions};
use crate::env::{EnvSource, ProcessEnv, decode_env};
use crate::error::ConfigError;
use crate::file::{Finder, decode_file};
use crate::flag::decode_flags;
use crate::reflect::Configurable;

/// One configuration source.
pub trait Loader<T> {
    /// Short source name for logs and errors.
    fn name(&self) -> &str;

    /// Decodes the source into `config`.
    ///
    /// Returns `Ok(false)` when the source has nothing to offer, in which
    /// case `config` is left untouched.
    ///
    /// # Errors
    ///
    /// Returns the source's read, syntax or decode error.
    fn load(
        &mut self,
        args: &[String],
        config: &mut T,
        options: &DecodeOptions,
    ) -> Result<bool, ConfigError>;

    /// The file the last successful load read, if the source is a file.
    fn source_file(&self) -> Option<&Path> {
        None
    }
}

/// Splits the config-file flag out of `args`.
///
/// Returns its value (if given) and the remaining arguments. Names are
/// compared ignoring case, dashes and underscores.
///
/// # Errors
///
/// Returns a `Flag` error if the flag is last and has no value.
pub fn take_config_file_flag(
    args: &[String],
    flag_name: &str,
) -> Result<(Option<String>, Vec<String>), ConfigError> {
    let wanted = normalize(flag_name);
    let mut value = None;
    let mut rest = Vec::with_capacity(args.len());
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        if arg == "--" {
            rest.push(arg.clone());
            rest.extend(iter.by_ref().cloned());
            break;
        }
        let name = arg.strip_prefix("--").or_else(|| arg.strip_prefix('-'));
        let Some((name, inline)) = name.map(|n| match n.split_once('=') {
            Some((name, inline)) => (name, Some(inline)),
            None => (n, None),
        }) else {
            rest.push(arg.clone());
            continue;
        };
        if normalize(name) != wanted {
            rest.push(arg.clone());
            continue;
        }
        value = match inline {
            Some(inline) => Some(inline.to_string()),
            None => Some(iter.next().cloned().ok_or_else(|| {
                ConfigError::flag(format!("missing value for flag '--{flag_name}'"))
            })?),
        };
    }

    Ok((value, rest))
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '-' && *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Loads configuration from command-line flags.
///
/// Reports "absent" when no flags are given, or when the only flag is the
/// config-file flag (which the file loader consumes).
#[derive(Debug, Clone)]
pub struct FlagLoader {
    /// Name of the config-file flag to skip
    pub config_file_flag: Option<String>,
}

impl Default for FlagLoader {
    fn default() -> Self {
        Self {
            config_file_flag: Some(CONFIG_FILE_FLAG.to_string()),
        }
    }
}

impl<T: Configurable> Loader<T> for FlagLoader {
    fn name(&self) -> &str {
        "flags"
    }

    fn load(
        &mut self,
        args: &[String],
        config: &mut T,
        options: &DecodeOptions,
    ) -> Result<bool, ConfigError> {
        let args = match &self.config_file_flag {
            Some(flag) => take_config_file_flag(args, flag)?.1,
            None => args.to_vec(),
        };
        if args.is_empty() {
            return Ok(false);
        }
        decode_flags(&args, config, options)
    }
}

/// Loads configuration from prefixed environment variables.
pub struct EnvLoader {
    /// Variable name prefix, e.g. `CFGTREE_`
    pub prefix: String,
    source: Box<dyn EnvSource>,
}

impl Default for EnvLoader {
    fn default() -> Self {
        Self::new(ENV_PREFIX)
    }
}

impl std::fmt::Debug for EnvLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvLoader")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

impl EnvLoader {
    /// Creates a loader reading the process environment.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            source: Box::new(ProcessEnv),
        }
    }

    /// Replaces the variable source.
    #[must_use]
    pub fn with_source(mut self, source: impl EnvSource + 'static) -> Self {
        self.source = Box::new(source);
        self
    }
}

impl<T: Configurable> Loader<T> for EnvLoader {
    fn name(&self) -> &str {
        "environment"
    }

    fn load(
        &mut self,
        _args: &[String],
        config: &mut T,
        options: &DecodeOptions,
    ) -> Result<bool, ConfigError> {
        decode_env(self.source.as_ref(), &self.prefix, config, options)
    }
}

/// Loads configuration from a file named by the config-file flag or found
/// in the default locations.
#[derive(Debug, Clone)]
pub struct FileLoader {
    /// Flag naming an explicit file
    pub config_file_flag: String,
    /// Candidate paths without extension
    pub base_paths: Vec<String>,
    /// Extensions to try
    pub extensions: Vec<String>,
    filename: Option<PathBuf>,
}

impl Default for FileLoader {
    fn default() -> Self {
        Self::new(base_paths())
    }
}

impl FileLoader {
    /// Creates a loader searching `base_paths`.
    #[must_use]
    pub fn new(base_paths: Vec<String>) -> Self {
        Self {
            config_file_flag: CONFIG_FILE_FLAG.to_string(),
            base_paths,
            extensions: file_extensions(),
            filename: None,
        }
    }

    /// Sets the config-file flag name.
    #[must_use]
    pub fn with_config_file_flag(mut self, flag: impl Into<String>) -> Self {
        self.config_file_flag = flag.into();
        self
    }

    /// Replaces the extensions to try.
    #[must_use]
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    /// The file decoded by the last load, if any.
    #[must_use]
    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }
}

impl<T: Configurable> Loader<T> for FileLoader {
    fn name(&self) -> &str {
        "file"
    }

    fn load(
        &mut self,
        args: &[String],
        config: &mut T,
        options: &DecodeOptions,
    ) -> Result<bool, ConfigError> {
        self.filename = None;
        let (explicit, _) = take_config_file_flag(args, &self.config_file_flag)?;

        let finder = Finder::new(self.base_paths.clone()).with_extensions(self.extensions.clone());
        let Some(path) = finder.find(explicit.as_deref())? else {
            tracing::debug!("No configuration file found");
            return Ok(false);
        };

        let found = decode_file(&path, config, options)?;
        if found {
            self.filename = Some(path);
        } else {
            tracing::debug!(path = %path.display(), "Configuration file is empty");
        }
        Ok(found)
    }

    fn source_file(&self) -> Option<&Path> {
        self.filename()
    }
}

/// Sources tried in order; the first that finds configuration is decoded
/// and the rest are skipped.
pub struct LoaderChain<T> {
    loaders: Vec<Box<dyn Loader<T>>>,
    options: DecodeOptions,
    required: bool,
    used: Option<usize>,
}

impl<T> Default for LoaderChain<T> {
    fn default() -> Self {
        Self {
            loaders: Vec::new(),
            options: DecodeOptions::default(),
            required: false,
            used: None,
        }
    }
}

impl<T: Configurable> LoaderChain<T> {
    /// Flags, then environment (`CFGTREE_` prefix), then file.
    #[must_use]
    pub fn standard() -> Self {
        Self::default()
            .with(FlagLoader::default())
            .with(EnvLoader::default())
            .with(FileLoader::default())
    }
}

impl<T> LoaderChain<T> {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a loader.
    #[must_use]
    pub fn with(mut self, loader: impl Loader<T> + 'static) -> Self {
        self.loaders.push(Box::new(loader));
        self
    }

    /// Makes "no source found" an error.
    #[must_use]
    pub const fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Replaces the decode options.
    #[must_use]
    pub fn with_options(mut self, options: DecodeOptions) -> Self {
        self.options = options;
        self
    }

    /// Decode options handed to every loader.
    #[must_use]
    pub const fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Names of the loaders in order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.loaders.iter().map(|loader| loader.name()).collect()
    }

    /// Runs the loaders until one finds configuration.
    ///
    /// Returns the name of the source used, or `None` if none had anything
    /// and the chain is optional.
    ///
    /// # Errors
    ///
    /// The first loader error, or `MissingRequiredSource` when nothing was
    /// found and the chain is required.
    pub fn load(&mut self, args: &[String], config: &mut T) -> Result<Option<&str>, ConfigError> {
        self.used = None;
        for index in 0..self.loaders.len() {
            let loader = &mut self.loaders[index];
            if loader.load(args, config, &self.options)? {
                tracing::debug!(source = loader.name(), "Configuration loaded");
                self.used = Some(index);
                return Ok(Some(self.loaders[index].name()));
            }
            tracing::debug!(source = loader.name(), "No configuration in source");
        }

        if self.required {
            return Err(ConfigError::MissingRequiredSource {
                tried: self.names().join(", "),
            });
        }
        Ok(None)
    }

    /// The file read by the last load, if it came from a file.
    #[must_use]
    pub fn config_file(&self) -> Option<&Path> {
        self.used
            .and_then(|index| self.loaders.get(index))
            .and_then(|loader| loader.source_file())
    }
}
