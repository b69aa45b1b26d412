//! Common functionality for siteprox.
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod cli;
pub mod distance;
pub mod id;
pub mod input;
pub mod interference;
pub mod log;
pub mod metro;
pub mod output;
pub mod parameters;
pub mod settings;
pub mod site;
pub mod summary;
pub mod units;

#[cfg(test)]
mod fixture;

/// Get the path to the siteprox configuration directory
///
/// Falls back to the current directory if the platform has no notion of a config directory.
pub fn get_siteprox_config_dir() -> PathBuf {
    let Some(mut dir) = dirs::config_dir() else {
        return PathBuf::new();
    };
    dir.push("siteprox");

    dir
}
