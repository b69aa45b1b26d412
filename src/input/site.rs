//! Code for reading each company's construction and existing sites from CSV files.
use super::{input_err_msg, read_csv};
use crate::distance::Coordinate;
use crate::site::{CompanyID, CompanySites, CompanySitesMap};
use anyhow::{Context, Result, ensure};
use itertools::Itertools;
use log::{debug, warn};
use serde::{Deserialize, Deserializer};
use std::fs;
use std::path::{Path, PathBuf};

const COMPANIES_DIR_NAME: &str = "companies";

/// Read a field whose column must be present, though individual cells may be empty
fn deserialise_required_column<'de, D>(deserialiser: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<f64> = Deserialize::deserialize(deserialiser)?;
    Ok(value.filter(|v| !v.is_nan()))
}

/// A row of a company's site file.
///
/// Each row may describe a construction site, an existing building or both.
#[derive(PartialEq, Debug, Deserialize)]
struct SiteRow {
    #[serde(rename = "CLat", deserialize_with = "deserialise_required_column")]
    construction_lat: Option<f64>,
    #[serde(rename = "CLon", deserialize_with = "deserialise_required_column")]
    construction_lon: Option<f64>,
    #[serde(rename = "num units", deserialize_with = "deserialise_required_column")]
    num_units: Option<f64>,
    #[serde(rename = "ELat", deserialize_with = "deserialise_required_column")]
    existing_lat: Option<f64>,
    #[serde(rename = "ELon", deserialize_with = "deserialise_required_column")]
    existing_lon: Option<f64>,
}

/// Convert a unit count read as a float (as exported from spreadsheets) to an integer
fn parse_unit_count(value: f64) -> Result<u32> {
    ensure!(
        value >= 0.0 && value.fract() == 0.0 && value <= f64::from(u32::MAX),
        "Invalid unit count {value}: must be a non-negative integer"
    );

    // Checked above that the value is integral and in range
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let units = value as u32;

    Ok(units)
}

/// Make a [`Coordinate`] from values read from a site file
fn to_coordinate(lat: f64, lon: f64) -> Result<Coordinate> {
    ensure!(
        lat.is_finite() && lon.is_finite(),
        "Invalid coordinate {lat},{lon}: latitude and longitude must be finite"
    );

    Ok(Coordinate::new(lat, lon))
}

/// Build a company's sites from the rows of its site file.
///
/// Rows with missing construction fields don't contribute a construction site and rows with
/// missing existing fields don't contribute an existing site.
fn read_company_sites_from_iter<I>(iter: I) -> Result<CompanySites>
where
    I: Iterator<Item = SiteRow>,
{
    let mut construction = Vec::new();
    let mut existing = Vec::new();
    for row in iter {
        if let (Some(lat), Some(lon), Some(units)) =
            (row.construction_lat, row.construction_lon, row.num_units)
        {
            construction.push((to_coordinate(lat, lon)?, parse_unit_count(units)?));
        }

        if let (Some(lat), Some(lon)) = (row.existing_lat, row.existing_lon) {
            existing.push(to_coordinate(lat, lon)?);
        }
    }

    Ok(CompanySites::new(construction, existing))
}

/// Get the paths of the CSV files in the companies folder, sorted by file name
fn get_company_file_paths(companies_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(companies_dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "csv") {
            paths.push(path);
        }
    }
    paths.sort();

    Ok(paths)
}

/// Read the sites for every company.
///
/// There is one CSV file per company in the `companies` folder, named after the company.
///
/// # Arguments
///
/// * `input_dir` - Folder containing input files
///
/// # Returns
///
/// A map of [`CompanySites`], in file name order, keyed by company ID.
pub fn read_company_sites(input_dir: &Path) -> Result<CompanySitesMap> {
    let companies_dir = input_dir.join(COMPANIES_DIR_NAME);
    let file_paths =
        get_company_file_paths(&companies_dir).with_context(|| input_err_msg(&companies_dir))?;
    ensure!(
        !file_paths.is_empty(),
        "No company CSV files found in {}",
        companies_dir.display()
    );

    file_paths
        .into_iter()
        .map(|file_path| -> Result<(CompanyID, CompanySites)> {
            let company_id: CompanyID = file_path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .with_context(|| format!("Invalid company file name: {}", file_path.display()))?
                .into();

            let rows = read_csv(&file_path)?;
            let sites =
                read_company_sites_from_iter(rows).with_context(|| input_err_msg(&file_path))?;
            debug!(
                "Read {} construction and {} existing sites for {company_id}",
                sites.construction.len(),
                sites.existing.len()
            );
            if sites.construction.is_empty() || sites.existing.is_empty() {
                warn!("Company {company_id} has no construction or no existing sites");
            }

            Ok((company_id, sites))
        })
        .process_results(|iter| iter.collect())
}
