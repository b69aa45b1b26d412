//! Common routines for handling input data.
use crate::metro::MetroTable;
use crate::parameters::AnalysisParameters;
use crate::site::CompanySitesMap;
use anyhow::{Context, Result, ensure};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

mod metro;
use metro::read_metros;
mod site;
use site::read_company_sites;

/// Read a series of type Ts from a CSV file.
///
/// Will raise an error if the file is empty.
///
/// # Arguments
///
/// * `file_path` - Path to the CSV file
pub fn read_csv<T: DeserializeOwned>(file_path: &Path) -> Result<impl Iterator<Item = T>> {
    let vec = csv::Reader::from_path(file_path)
        .with_context(|| input_err_msg(file_path))?
        .into_deserialize()
        .collect::<Result<Vec<T>, _>>()
        .with_context(|| input_err_msg(file_path))?;
    ensure!(!vec.is_empty(), "CSV file {} cannot be empty", file_path.display());

    Ok(vec.into_iter())
}

/// Parse a TOML file at the specified path.
///
/// # Arguments
///
/// * `file_path` - Path to the TOML file
///
/// # Returns
///
/// * The deserialised TOML data or an error if the file could not be read or parsed.
pub fn read_toml<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let toml_str = fs::read_to_string(file_path).with_context(|| input_err_msg(file_path))?;
    let toml_data = toml::from_str(&toml_str).with_context(|| input_err_msg(file_path))?;
    Ok(toml_data)
}

/// Format an error message to include the file path. To be used with `anyhow::Context`.
pub fn input_err_msg<P: AsRef<Path>>(file_path: P) -> String {
    format!("Error reading {}", file_path.as_ref().display())
}

/// All the data needed to run an analysis
#[derive(Debug, PartialEq)]
pub struct AnalysisInput {
    /// Thresholds for the analysis
    pub parameters: AnalysisParameters,
    /// Metro areas to attribute interferences to
    pub metros: MetroTable,
    /// Sites for each company
    pub companies: CompanySitesMap,
}

/// Read all input data from the specified directory.
///
/// # Arguments
///
/// * `input_dir` - Folder containing input files
pub fn load_input(input_dir: &Path) -> Result<AnalysisInput> {
    let parameters = AnalysisParameters::from_path(input_dir)?;
    let metros = read_metros(input_dir)?;
    let companies = read_company_sites(input_dir)?;

    Ok(AnalysisInput {
        parameters,
        metros,
        companies,
    })
}
