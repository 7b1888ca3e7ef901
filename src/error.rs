//! Error handling for confsync.
//! Defines the error taxonomy of the build-and-publish pipeline and the result alias
//! used throughout the crate.

use std::io;
use thiserror::Error;

use crate::hooks::HookStage;

/// Errors that can abort a confsync run.
///
/// Every variant is fatal: the pipeline never retries and stops on the first error.
/// Each variant names the file, directory or script that triggered it.
#[derive(Error, Debug)]
pub enum Error {
    /// The template root cannot be walked.
    #[error("Cannot discover templates under '{root}': {reason}.")]
    DiscoveryError { root: String, reason: String },

    /// The configuration source is unreadable or unparseable.
    #[error("Failed to load configuration from '{path}': {reason}.")]
    ConfigLoadError { path: String, reason: String },

    /// The template source is not valid template syntax.
    #[error("Failed to parse template '{template}': {reason}.")]
    TemplateParseError { template: String, reason: String },

    /// The template failed while executing against the context.
    #[error("Failed to render template '{template}': {reason}.")]
    RenderError { template: String, reason: String },

    /// A dotted path does not resolve inside the configuration context.
    #[error("Undefined value in configuration context: '{path}'.")]
    UndefinedValueError { path: String },

    /// A required directory could not be created.
    #[error("Failed to create directory '{path}': {source}.")]
    DirectoryCreateError {
        path: String,
        #[source]
        source: io::Error,
    },

    /// A path that must be a regular file is something else.
    #[error("Path is not a regular file: '{path}'.")]
    NotRegularFileError { path: String },

    /// Creating, opening, copying or syncing a publish path failed.
    #[error("Failed to publish '{destination}': {source}.")]
    PublishError {
        destination: String,
        #[source]
        source: io::Error,
    },

    /// A before/after hook could not be launched or exited unsuccessfully.
    #[error("The {stage} hook '{script}' failed: {reason}.")]
    HookError {
        stage: HookStage,
        script: String,
        reason: String,
    },

    /// Creating or writing a staged file failed.
    #[error("File operation failed on '{path}': {source}.")]
    FileError {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Convenience type alias for Results with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that logs the error and exits the program.
///
/// # Behavior
/// Logs the error message at error level and exits with status code 1
pub fn default_error_handler(err: Error) -> ! {
    log::error!("{}", err);
    std::process::exit(1);
}
