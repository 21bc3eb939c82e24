//! Error handling for stencil.
//! Defines the error taxonomy shared by template loading, materialization,
//! version resolution and installation.

use std::path::PathBuf;
use thiserror::Error;

/// Custom error types for stencil operations.
///
/// This enum represents all possible errors that can occur while loading templates
/// and creating projects from them. It implements the standard Error trait through
/// thiserror's derive macro.
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] std::io::Error),

    /// No root configuration was found in the working directory or any ancestor.
    #[error("Could not find '{config_file}' in '{start_dir}' or any parent directory.")]
    ConfigNotFoundError { config_file: String, start_dir: String },

    /// The root configuration exists but is not valid YAML for the expected shape.
    #[error("Failed to parse configuration '{path}': {reason}.")]
    ConfigParseError { path: String, reason: String },

    /// A pattern listed under `templateDirs` is not a valid glob.
    #[error("Invalid template directory pattern '{pattern}': {reason}.")]
    GlobPatternError { pattern: String, reason: String },

    /// A template directory has a missing or malformed manifest.
    /// Absorbed by the loader, the directory is simply skipped.
    #[error("Invalid template manifest '{path}': {reason}.")]
    TemplateManifestError { path: String, reason: String },

    /// An explicitly requested template name matches nothing.
    #[error("Template '{name}' was not found.")]
    TemplateNotFoundError { name: String },

    /// The configuration lists no usable template.
    #[error("No templates found in configuration '{config_dir}'.")]
    NoTemplatesError { config_dir: String },

    #[error("Directory already exists: '{output_dir}'. Template not created.")]
    DestinationConflictError { output_dir: String },

    /// A template file could not be walked or read.
    #[error("Failed to read '{}': {source}.", path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Any failure while producing a single output file. Files written
    /// before the failure are left in place.
    #[error("Failed to write '{}': {source}", path.display())]
    WriteError {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    /// A substituted path tries to leave the output directory.
    #[error("Invalid output path '{path}'.")]
    InvalidPathError { path: String },

    /// A dependency manifest could not be parsed or serialized.
    #[error("Failed to update package.json versions: {0}.")]
    PackageManifestError(String),

    /// The package registry failed for a reason other than "not found".
    #[error("Failed while reading info for '{package}' from the registry: {reason}.")]
    VersionLookupError { package: String, reason: String },

    /// The dependency install step did not succeed.
    #[error("Install failed: {0}.")]
    InstallError(String),

    /// Represents errors raised by the interactive prompts
    #[error("Prompt error: {0}.")]
    PromptError(String),
}

impl Error {
    /// Wraps an error as the cause of a failed write to `path`.
    pub fn write<P: Into<PathBuf>>(path: P, source: Error) -> Self {
        Error::WriteError { path: path.into(), source: Box::new(source) }
    }

    /// Wraps an io error raised while reading `path`.
    pub fn read<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Error::ReadError { path: path.into(), source }
    }

    /// Whether the error means "no configuration to work with".
    ///
    /// A malformed root configuration is treated like a missing one for
    /// control flow, though it is reported differently.
    pub fn is_config_missing(&self) -> bool {
        matches!(self, Error::ConfigNotFoundError { .. } | Error::ConfigParseError { .. })
    }
}

/// Convenience type alias for Results with stencil's Error as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(1);
}
