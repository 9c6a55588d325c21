//! Application startup and utilities.
//!
//! This module contains the demo configuration, the command tree, exit
//! codes, tracing setup and error hints that support the main entry point.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;

use cfgtree::cli::{Command, FlagLoader, LoaderChain, RunError};
use cfgtree::env::to_env_vars;
use cfgtree::file::FileFormat;
use cfgtree::flag::to_flags;
use cfgtree::{ConfigError, Duration, EncodeOptions, Node, RawMap, configurable, encode};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Application exit codes.
pub mod exit_code {
    use std::process::ExitCode;

    /// Success (exit code 0).
    pub const SUCCESS: ExitCode = ExitCode::SUCCESS;

    /// Configuration error (exit code 1) - bad flags, unreadable files, invalid values.
    pub const CONFIG_ERROR: ExitCode = ExitCode::FAILURE;

    /// Runtime error (exit code 2) - rendering or output failure.
    ///
    /// Note: This is a function rather than a constant because `ExitCode::from()` is not `const fn`.
    pub fn runtime_error() -> ExitCode {
        ExitCode::from(2)
    }
}

#[derive(Debug, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub read_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            read_timeout: Duration::from_secs(30),
        }
    }
}

configurable!(ServerConfig {
    host: "Address to bind",
    port: "Port to listen on",
    read_timeout: "Maximum time to read a request",
});

#[derive(Debug, Default, PartialEq)]
pub struct TlsConfig {
    pub cert: PathBuf,
    pub key: PathBuf,
}

configurable!(TlsConfig {
    #[required]
    cert: "Certificate file",
    #[required]
    key: "Private key file",
});

#[derive(Debug, PartialEq)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

configurable!(LogConfig { level: "Log level" });

/// Configuration of the demo application.
#[derive(Debug, Default, PartialEq)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub log: LogConfig,
    pub tls: Option<TlsConfig>,
    pub labels: BTreeMap<String, String>,
    pub meta: RawMap,
    pub verbose: bool,
}

configurable!(AppConfig {
    server,
    log,
    tls: "Serve over TLS",
    labels: "Free-form labels",
    meta: "Free-form settings passed through untouched",
    verbose: "Enable debug logging",
});

/// Options of the `defaults` subcommand.
#[derive(Debug, PartialEq)]
pub struct DefaultsOptions {
    pub format: String,
    pub sparse: bool,
}

impl Default for DefaultsOptions {
    fn default() -> Self {
        Self {
            format: "toml".to_string(),
            sparse: false,
        }
    }
}

configurable!(DefaultsOptions {
    format: "Output format: toml, yaml, json, env or flags",
    sparse: "Omit zero values",
});

/// Renders `node` in one of the supported output formats.
///
/// # Errors
///
/// Returns `UnsupportedFormat` for an unknown format name.
pub fn render(node: &Node, format: &str) -> Result<String, ConfigError> {
    match format.to_ascii_lowercase().as_str() {
        "env" => Ok(to_env_vars(node, cfgtree::defaults::ENV_PREFIX)
            .into_iter()
            .map(|(name, value)| format!("{name}={value}\n"))
            .collect()),
        "flags" => Ok(to_flags(node).into_iter().map(|flag| flag + "\n").collect()),
        other => FileFormat::from_extension(other)
            .ok_or_else(|| ConfigError::UnsupportedFormat {
                path: PathBuf::from(format),
            })?
            .render(node),
    }
}

fn print_resolved(config: &AppConfig, out: &mut dyn Write) -> Result<(), RunError> {
    tracing::debug!(?config, "Resolved configuration");
    let node = encode(config, &EncodeOptions::default());
    out.write_all(render(&node, "toml")?.as_bytes())?;
    Ok(())
}

fn print_defaults(options: &DefaultsOptions, out: &mut dyn Write) -> Result<(), RunError> {
    let node = encode(
        &AppConfig::default(),
        &EncodeOptions::default().with_sparse(options.sparse),
    );
    out.write_all(render(&node, &options.format)?.as_bytes())?;
    Ok(())
}

/// Builds the command tree.
pub fn command() -> Command<AppConfig> {
    let defaults = Command::new(
        "defaults",
        "Print the default configuration as a template",
        DefaultsOptions::default(),
    )
    .with_chain(LoaderChain::new().with(FlagLoader { config_file_flag: None }))
    .with_run(print_defaults);

    Command::new(
        "cfgtree",
        "Resolves configuration from flags, CFGTREE_* environment variables or a file and prints it.",
        AppConfig::default(),
    )
    .with_run(print_resolved)
    .with_subcommand(defaults)
}

/// Returns `true` if debug logging was asked for on the command line.
pub fn verbose_requested(args: &[String]) -> bool {
    args.iter()
        .take_while(|arg| *arg != "--")
        .any(|arg| arg == "--verbose" || arg == "--verbose=true")
}

/// Prints helpful hints for common configuration errors.
pub fn print_config_hint(error: &ConfigError) {
    match error {
        ConfigError::MissingRequiredSource { .. } | ConfigError::SourceIo { .. } => {
            eprintln!("\nRun 'cfgtree defaults > cfgtree.toml' to generate a configuration template.");
        }
        ConfigError::Flag { .. } | ConfigError::UnknownField { .. } => {
            eprintln!("\nRun 'cfgtree --help' to list the accepted flags.");
        }
        _ => {}
    }
}

/// Sets up the tracing subscriber for logging.
pub fn setup_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;
