//! confsync's main application entry point.
//! Parses the command line, initialises logging and dispatches the subcommand.

use confsync::{
    cli::{get_args, Command},
    error::default_error_handler,
    logger::init_logger,
    update,
};

/// Main application entry point.
fn main() {
    let args = get_args();
    init_logger(args.verbose);

    match args.command {
        Command::Update(update_args) => match update::run(&update_args) {
            Ok(summary) if summary.dry_run => log::info!(
                "Success! Built {} config files (test mode, nothing published)",
                summary.rendered
            ),
            Ok(summary) => log::info!("Success! Built {} config files", summary.rendered),
            Err(err) => default_error_handler(err),
        },
    }
}
