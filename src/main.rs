//! Provides the main entry point to the program.
use human_panic::{metadata, setup_panic};
use siteprox::cli::run_cli;

fn main() {
    setup_panic!(metadata!().support("Open an issue on the project repository"));

    if let Err(err) = run_cli() {
        if siteprox::log::is_logger_initialised() {
            ::log::error!("{err:?}");
        } else {
            eprintln!("Error: {err:?}");
        }

        std::process::exit(1);
    }
}
