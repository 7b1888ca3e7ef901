//! Command-line interface implementation for confsync.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, Args as ClapArgs, CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

use crate::constants::{
    DEFAULT_CONFIG_FILE, DEFAULT_LIVE_ROOT, DEFAULT_STAGING_DIR, DEFAULT_TEMPLATES_DIR,
};

/// Command-line arguments structure for confsync.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "confsync: keeps configuration files in sync with templates",
    long_about = None
)]
pub struct Args {
    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Renders the templates and updates the live configuration files
    #[command(visible_alias = "u")]
    Update(UpdateArgs),
}

#[derive(ClapArgs, Debug, Clone, PartialEq, Eq)]
pub struct UpdateArgs {
    /// Directory scanned for *.tmpl templates
    #[arg(long, value_name = "DIR", default_value = DEFAULT_TEMPLATES_DIR)]
    pub templates: PathBuf,

    /// Staging directory for rendered configuration files
    #[arg(long, value_name = "DIR", default_value = DEFAULT_STAGING_DIR)]
    pub temp: PathBuf,

    /// YAML file providing the template variables
    #[arg(long, value_name = "FILE", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Root directory the live configuration files are published under
    #[arg(long, value_name = "DIR", default_value = DEFAULT_LIVE_ROOT)]
    pub root: PathBuf,

    /// Only build the configuration files, do not publish them
    #[arg(long)]
    pub test: bool,

    /// Expose the process environment to templates under `Env`
    #[arg(long)]
    pub env: bool,

    /// Script to run before the configuration is built
    #[arg(long, value_name = "SCRIPT")]
    pub before: Option<PathBuf>,

    /// Script to run after the configuration is published
    #[arg(long, value_name = "SCRIPT")]
    pub after: Option<PathBuf>,
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With status code 1 and the help text if no subcommand is given
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if matches!(
                e.kind(),
                ErrorKind::MissingSubcommand
                    | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ) {
                let _ = Args::command().print_help();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}
