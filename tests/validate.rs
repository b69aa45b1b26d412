//! Integration tests for the `validate` command.
use siteprox::cli::handle_validate_command;
use siteprox::log::is_logger_initialised;
use siteprox::settings::Settings;
use std::path::PathBuf;

/// Get the path to the demo input folder.
fn get_input_dir() -> PathBuf {
    PathBuf::from("demos/simple")
}

/// An integration test for the `validate` command.
///
/// We also check that the logger is initialised after it is run.
#[test]
fn test_handle_validate_command() {
    unsafe { std::env::set_var("SITEPROX_LOG_LEVEL", "off") };

    assert!(!is_logger_initialised());

    handle_validate_command(&get_input_dir(), Some(Settings::default())).unwrap();

    assert!(is_logger_initialised());
}
