//! The module responsible for writing output data to disk.
use crate::input::AnalysisInput;
use crate::interference::{AnalysisResults, CompanyAnalysis};
use crate::metro::CityID;
use crate::site::CompanyID;
use crate::summary::summarize;
use crate::units::Miles;
use anyhow::{Context, Result, ensure};
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub mod map;
pub mod metadata;

/// The root folder in which input-specific output folders will be created
const OUTPUT_DIRECTORY_ROOT: &str = "siteprox_results";

/// The output file name for the summary report
const SUMMARY_FILE_NAME: &str = "analysis_summary.txt";

/// The output folder for per-company results
const COMPANIES_DIR_NAME: &str = "companies";

/// The output file name for the list of all interferences
const INTERFERENCES_FILE_NAME: &str = "interferences.csv";

/// Get the default output folder for the specified input directory
pub fn get_output_dir(input_dir: &Path) -> Result<PathBuf> {
    // Canonicalise in case the user has specified "."
    let input_dir = input_dir
        .canonicalize()
        .context("Could not resolve path to input folder")?;

    let input_name = input_dir
        .file_name()
        .context("Input folder cannot be the root folder")?
        .to_str()
        .context("Invalid chars in input folder name")?;

    Ok([OUTPUT_DIRECTORY_ROOT, input_name].iter().collect())
}

/// Create a new output directory, with parents.
///
/// An existing, non-empty folder is only reused if `allow_overwrite` is true, in which case its
/// contents are deleted.
///
/// # Returns
///
/// Whether an existing folder was overwritten.
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    if output_dir.is_dir() {
        if fs::read_dir(output_dir)?.next().is_none() {
            // Already exists and is empty
            return Ok(false);
        }

        ensure!(
            allow_overwrite,
            "Output folder already exists and is not empty. Use --overwrite to replace its \
            contents."
        );
        fs::remove_dir_all(output_dir)?;
        fs::create_dir_all(output_dir)?;
        return Ok(true);
    }

    fs::create_dir_all(output_dir)?;

    Ok(false)
}

/// Represents a row in the interferences CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct InterferenceRow {
    company_id: CompanyID,
    city_id: CityID,
    construction_lat: f64,
    construction_lon: f64,
    units: u32,
    existing_lat: f64,
    existing_lon: f64,
    distance: Miles,
}

/// Write the summary report lines to a text file
pub fn write_summary(output_path: &Path, lines: &[String]) -> Result<()> {
    let file_path = output_path.join(SUMMARY_FILE_NAME);
    fs::write(&file_path, lines.join("\n"))
        .with_context(|| format!("Failed to write {}", file_path.display()))?;

    Ok(())
}

/// Write one company's results to a JSON file named after the company
fn write_company_json(
    companies_dir: &Path,
    company_id: &CompanyID,
    analysis: &CompanyAnalysis,
) -> Result<()> {
    let file_path = companies_dir.join(format!("{company_id}_analysis_results.json"));
    let file = File::create(&file_path)
        .with_context(|| format!("Failed to create {}", file_path.display()))?;
    let mut writer = BufWriter::new(file);
    let mut serialiser =
        serde_json::Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"    "));
    analysis.serialize(&mut serialiser)?;
    writer.flush()?;

    Ok(())
}

/// Write each company's results to its own JSON file in the `companies` subfolder
pub fn write_company_results(output_path: &Path, results: &AnalysisResults) -> Result<()> {
    let companies_dir = output_path.join(COMPANIES_DIR_NAME);
    fs::create_dir_all(&companies_dir)?;
    for (company_id, analysis) in &results.companies {
        write_company_json(&companies_dir, company_id, analysis)?;
    }

    Ok(())
}

/// Write every interference to a CSV file, one row per interference
pub fn write_interferences(output_path: &Path, results: &AnalysisResults) -> Result<()> {
    let mut writer = csv::Writer::from_path(output_path.join(INTERFERENCES_FILE_NAME))?;
    for (company_id, analysis) in &results.companies {
        for (city_id, sites) in &analysis.interferences_by_city {
            for site in sites.values() {
                for record in &site.records {
                    writer.serialize(InterferenceRow {
                        company_id: company_id.clone(),
                        city_id: city_id.clone(),
                        construction_lat: site.construction.lat,
                        construction_lon: site.construction.lon,
                        units: record.units,
                        existing_lat: record.existing.lat,
                        existing_lon: record.existing.lon,
                        distance: record.distance,
                    })?;
                }
            }
        }
    }
    writer.flush()?;

    Ok(())
}

/// Write all output files for an analysis run
///
/// # Arguments
///
/// * `output_path` - Folder where files will be saved
/// * `input` - The input data which was analysed
/// * `results` - The results of the analysis
pub fn write_results(
    output_path: &Path,
    input: &AnalysisInput,
    results: &AnalysisResults,
) -> Result<()> {
    write_summary(output_path, &summarize(results))?;
    write_company_results(output_path, results)?;
    write_interferences(output_path, results)?;
    map::write_map(output_path, input)?;
    info!("Results written to {}", output_path.display());

    Ok(())
}
