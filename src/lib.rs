//! confsync renders configuration templates against a YAML context and publishes the
//! result onto the live configuration files of a host, with optional hook scripts
//! around the run.

/// Command-line interface module for the confsync application
pub mod cli;

/// Common constants: template suffix, reserved keys and default paths
pub mod constants;

/// Configuration context loaded from YAML
pub mod context;

/// Template discovery under the template root
pub mod discovery;

/// Error types and handling for the confsync application
pub mod error;

/// Directory and regular-file helpers
pub mod fsutil;

/// Before and after hook scripts
pub mod hooks;

/// Logger initialisation
pub mod logger;

/// Core build-and-publish orchestration
pub mod processor;

/// Replacement of live configuration files
pub mod publisher;

/// Template parsing and rendering functionality
pub mod renderer;

/// The `update` command
pub mod update;
