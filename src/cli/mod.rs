//! Command-line entry points built on the loader chain.
//!
//! A [`Command`] owns a pre-seeded configuration and a [`LoaderChain`].
//! Executing it:
//! 1. Dispatches to a subcommand when the first argument names one
//! 2. Prints help for `-h`/`--help`
//! 3. Loads the configuration from the first source that has one
//! 4. Runs the command's callback with the result
//!
//! Flag errors print the help page before the error is returned.

pub mod help;
mod loader;


pub use loader::{EnvLoader, FileLoader, FlagLoader, Loader, LoaderChain, take_config_file_flag};

use std::error::Error as StdError;
use std::io::{self, Write};

use thiserror::Error;

use crate::error::ConfigError;
use crate::flag::is_help_requested;
use crate::reflect::Configurable;

/// Error returned by the run callback.
pub type RunError = Box<dyn StdError + Send + Sync>;

type RunFn<T> = Box<dyn FnMut(&T, &mut dyn Write) -> Result<(), RunError>>;

/// Error type for command execution.
#[derive(Debug, Error)]
pub enum CliError {
    /// Loading the configuration failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The run callback failed.
    #[error("{0}")]
    Run(#[source] RunError),

    /// The first argument names no subcommand.
    #[error("Unknown command '{name}'")]
    UnknownCommand {
        /// The argument given
        name: String,
    },

    /// Writing output failed.
    #[error("Failed to write output: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    /// The configuration error, if that is what failed.
    #[must_use]
    pub const fn as_config(&self) -> Option<&ConfigError> {
        match self {
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

/// A command that can be executed, independent of its configuration type.
pub trait Runnable {
    /// Name used to select the command.
    fn name(&self) -> &str;

    /// One-line description for help output.
    fn description(&self) -> &str;

    /// Runs the command with `args` (the command name excluded).
    ///
    /// # Errors
    ///
    /// Returns configuration, callback or output errors.
    fn execute(&mut self, args: &[String], out: &mut dyn Write) -> Result<(), CliError>;

    /// Writes the help page.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn print_help(&self, out: &mut dyn Write) -> Result<(), CliError>;
}

/// A command whose configuration is materialized from flags, environment
/// or a file.
pub struct Command<T> {
    name: String,
    description: String,
    configuration: T,
    chain: LoaderChain<T>,
    run: Option<RunFn<T>>,
    subcommands: Vec<Box<dyn Runnable>>,
}

impl<T: Configurable + 'static> Command<T> {
    /// Creates a command with the standard flags → env → file chain.
    ///
    /// `configuration` holds the defaults that sources override.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>, configuration: T) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            configuration,
            chain: LoaderChain::standard(),
            run: None,
            subcommands: Vec::new(),
        }
    }

    /// Replaces the loader chain.
    #[must_use]
    pub fn with_chain(mut self, chain: LoaderChain<T>) -> Self {
        self.chain = chain;
        self
    }

    /// Sets the callback run with the loaded configuration.
    #[must_use]
    pub fn with_run<F>(mut self, run: F) -> Self
    where
        F: FnMut(&T, &mut dyn Write) -> Result<(), RunError> + 'static,
    {
        self.run = Some(Box::new(run));
        self
    }

    /// Adds a subcommand.
    #[must_use]
    pub fn with_subcommand(mut self, command: impl Runnable + 'static) -> Self {
        self.subcommands.push(Box::new(command));
        self
    }

    /// The configuration, as loaded by the last execution.
    #[must_use]
    pub const fn configuration(&self) -> &T {
        &self.configuration
    }

    /// The loader chain.
    #[must_use]
    pub const fn chain(&self) -> &LoaderChain<T> {
        &self.chain
    }

    /// Renders the help page.
    #[must_use]
    pub fn help(&self) -> String {
        let commands: Vec<(&str, &str)> = self
            .subcommands
            .iter()
            .map(|command| (command.name(), command.description()))
            .collect();
        help::render(&self.name, &self.description, &commands, &self.configuration)
    }

    fn subcommand(&self, args: &[String]) -> Result<Option<usize>, CliError> {
        let Some(first) = args.first() else {
            return Ok(None);
        };
        if self.subcommands.is_empty() || first.starts_with('-') {
            return Ok(None);
        }
        self.subcommands
            .iter()
            .position(|command| command.name() == first)
            .map(Some)
            .ok_or_else(|| CliError::UnknownCommand { name: first.clone() })
    }
}

impl<T: Configurable + 'static> Runnable for Command<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn execute(&mut self, args: &[String], out: &mut dyn Write) -> Result<(), CliError> {
        if let Some(index) = self.subcommand(args)? {
            tracing::debug!(command = %args[0], "Dispatching to subcommand");
            return self.subcommands[index].execute(&args[1..], out);
        }

        if is_help_requested(args) {
            return self.print_help(out);
        }

        match self.chain.load(args, &mut self.configuration) {
            Ok(Some(source)) => tracing::debug!(command = %self.name, source, "Configuration resolved"),
            Ok(None) => tracing::debug!(command = %self.name, "No configuration source found, using defaults"),
            Err(e) if e.is_flag_error() => {
                self.print_help(out)?;
                return Err(e.into());
            }
            Err(e) => return Err(e.into()),
        }

        match self.run.as_mut() {
            Some(run) => run(&self.configuration, out).map_err(CliError::Run),
            None => self.print_help(out),
        }
    }

    fn print_help(&self, out: &mut dyn Write) -> Result<(), CliError> {
        out.write_all(self.help().as_bytes())?;
        Ok(())
    }
}
