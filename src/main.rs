use cloudpart::logging;

mod cli;

use crate::cli::CliCommand;

fn main() {
    // Initialize logging as early as possible; during boot the state dir may
    // not be writable yet, so fall back to stderr instead of failing.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    // Parse CLI and dispatch.
    if let Err(err) = CliCommand::run_from_args() {
        eprintln!("cloudpart error: {:#}", err);
        std::process::exit(1);
    }
}
