//! Detection of construction sites which interfere with existing buildings.
//!
//! Every construction site is compared with every existing building owned by the same company.
//! A pair is only considered if the midpoint of the two sites lies within the city threshold of
//! the nearest metro. It then counts as an interference if the sites are within the build
//! threshold of each other.
use crate::distance::{Coordinate, distance_miles};
use crate::input::AnalysisInput;
use crate::metro::{CityID, MetroTable, nearest_metro};
use crate::parameters::AnalysisParameters;
use crate::site::{CompanyID, CompanySites, ConstructionSite, ExistingSite, SiteID};
use crate::units::Miles;
use anyhow::{Context, Result};
use indexmap::IndexMap;
use log::{debug, info, trace};
use serde::Serialize;

/// A single interference between a construction site and an existing building
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterferenceRecord {
    /// Location of the existing building
    pub existing: Coordinate,
    /// Number of units under construction at the construction site
    pub units: u32,
    /// Distance between the construction site and the existing building
    pub distance: Miles,
}

/// The interferences found for one construction site within one city
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteInterferences {
    /// Location of the construction site
    pub construction: Coordinate,
    /// Interferences in the order they were found
    pub records: Vec<InterferenceRecord>,
}

/// The results of analysing a single company's sites
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyAnalysis {
    /// Number of interferences found
    pub total_interferences: u32,
    /// Number of units under construction at sites with at least one interference
    pub total_units_in_progress: u64,
    /// Number of interferences for each city
    pub interference_count_by_city: IndexMap<CityID, u32>,
    /// Units under construction at interfering sites, credited to a single city per site
    pub units_in_progress_by_city: IndexMap<CityID, u64>,
    /// Interferences for each city, grouped by construction site
    pub interferences_by_city: IndexMap<CityID, IndexMap<SiteID, SiteInterferences>>,
    /// The distance for every interference
    pub distances: Vec<Miles>,
    /// Whether each construction site has been found to interfere with a building
    pub sites_counted: IndexMap<SiteID, bool>,
}

impl CompanyAnalysis {
    /// Create an empty analysis with zeroed counters for every metro
    fn new(metros: &MetroTable, sites: &CompanySites) -> Self {
        Self {
            total_interferences: 0,
            total_units_in_progress: 0,
            interference_count_by_city: metros.keys().map(|id| (id.clone(), 0)).collect(),
            units_in_progress_by_city: metros.keys().map(|id| (id.clone(), 0)).collect(),
            interferences_by_city: metros
                .keys()
                .map(|id| (id.clone(), IndexMap::new()))
                .collect(),
            distances: Vec::new(),
            sites_counted: sites.iter_site_ids().map(|id| (id, false)).collect(),
        }
    }

    /// Whether the given construction site has already been counted as interfering
    fn is_counted(&self, site_id: SiteID) -> bool {
        self.sites_counted.get(&site_id).copied().unwrap_or(false)
    }

    /// Record an interference between `site` and `existing` in the given city.
    ///
    /// The site's units are only added to the totals if `credit_units` is true.
    fn record_interference(
        &mut self,
        city_id: &CityID,
        site: &ConstructionSite,
        existing: &ExistingSite,
        distance: Miles,
        credit_units: bool,
    ) {
        self.sites_counted.insert(site.id, true);
        self.interferences_by_city[city_id]
            .entry(site.id)
            .or_insert_with(|| SiteInterferences {
                construction: site.coord,
                records: Vec::new(),
            })
            .records
            .push(InterferenceRecord {
                existing: existing.coord,
                units: site.units,
                distance,
            });

        self.total_interferences += 1;
        self.distances.push(distance);
        self.interference_count_by_city[city_id] += 1;

        if credit_units {
            let units = u64::from(site.units);
            self.total_units_in_progress += units;
            self.units_in_progress_by_city[city_id] += units;
        }
    }
}

/// Look for interferences between one company's construction sites and existing buildings.
///
/// A construction site's units are credited at most once, to the city of its first interference.
/// Once a site has been counted, later entries for the same site are skipped.
///
/// # Arguments
///
/// * `sites` - The company's construction and existing sites
/// * `metros` - Metros to attribute interferences to
/// * `parameters` - Build and city thresholds
pub fn detect(
    sites: &CompanySites,
    metros: &MetroTable,
    parameters: &AnalysisParameters,
) -> Result<CompanyAnalysis> {
    let mut analysis = CompanyAnalysis::new(metros, sites);

    for site in &sites.construction {
        if analysis.is_counted(site.id) {
            debug!(
                "Skipping construction site ({}) since it was already counted",
                site.coord
            );
            continue;
        }

        let mut units_credited = false;
        for existing in &sites.existing {
            let midpoint = site.coord.midpoint(&existing.coord);
            let (city_id, city_distance) = nearest_metro(metros, &midpoint)?;
            if city_distance > parameters.city_threshold {
                trace!(
                    "Skipping existing site ({}): {city_distance} mi from {city_id}",
                    existing.coord
                );
                continue;
            }

            let distance = distance_miles(&site.coord, &existing.coord);
            if distance > parameters.build_threshold {
                trace!(
                    "Construction site ({}) is in {city_id} but {distance} mi from ({})",
                    site.coord,
                    existing.coord
                );
                continue;
            }

            debug!(
                "Interference in {city_id}: construction site ({}) is {distance} mi from ({})",
                site.coord, existing.coord
            );
            analysis.record_interference(&city_id, site, existing, distance, !units_credited);
            units_credited = true;
        }
    }

    Ok(analysis)
}

/// The results of analysing all companies
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResults {
    /// Per-company results, in input order
    pub companies: IndexMap<CompanyID, CompanyAnalysis>,
    /// Number of interferences across all companies
    pub total_interferences: u32,
}

/// Analyse every company's sites.
///
/// Companies are processed in input order. An error for any company aborts the whole run.
pub fn run_analysis(input: &AnalysisInput) -> Result<AnalysisResults> {
    let mut companies = IndexMap::new();
    let mut total_interferences = 0;
    for (company_id, sites) in &input.companies {
        info!("Analysing {company_id}");
        let analysis = detect(sites, &input.metros, &input.parameters)
            .with_context(|| format!("Failed to analyse company {company_id}"))?;
        info!(
            "Found {} interferences for {company_id}",
            analysis.total_interferences
        );
        total_interferences += analysis.total_interferences;
        companies.insert(company_id.clone(), analysis);
    }

    info!("Analysis complete: {total_interferences} interferences in total");

    Ok(AnalysisResults {
        companies,
        total_interferences,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assert_error, metros, parameters};
    use float_cmp::assert_approx_eq;
    use indexmap::indexmap;
    use rstest::rstest;

    /// One construction site at (0.001, 0.001) with 5 units, plus the given existing sites
    fn single_site(existing: &[(f64, f64)]) -> CompanySites {
        CompanySites::new(
            [(Coordinate::new(0.001, 0.001), 5)],
            existing.iter().map(|&(lat, lon)| Coordinate::new(lat, lon)),
        )
    }

    #[rstest]
    fn test_detect_interference(metros: MetroTable, parameters: AnalysisParameters) {
        let sites = single_site(&[(0.002, 0.002)]);
        let analysis = detect(&sites, &metros, &parameters).unwrap();

        assert_eq!(analysis.total_interferences, 1);
        assert_eq!(analysis.total_units_in_progress, 5);
        assert_eq!(
            analysis.interference_count_by_city,
            indexmap! {"A".into() => 1, "B".into() => 0}
        );
        assert_eq!(
            analysis.units_in_progress_by_city,
            indexmap! {"A".into() => 5, "B".into() => 0}
        );
        assert_eq!(analysis.sites_counted, indexmap! {SiteID(0) => true});
        assert_eq!(analysis.distances.len(), 1);
        assert_approx_eq!(Miles, analysis.distances[0], Miles(0.0975), epsilon = 1e-3);

        let site_interferences = &analysis.interferences_by_city["A"][&SiteID(0)];
        assert_eq!(site_interferences.construction, Coordinate::new(0.001, 0.001));
        assert_eq!(
            site_interferences.records,
            [InterferenceRecord {
                existing: Coordinate::new(0.002, 0.002),
                units: 5,
                distance: analysis.distances[0],
            }]
        );
        assert!(analysis.interferences_by_city["B"].is_empty());
    }

    #[rstest]
    fn test_detect_outside_build_threshold(metros: MetroTable) {
        let parameters = AnalysisParameters {
            build_threshold: Miles(0.01),
            city_threshold: Miles(50.0),
        };
        let sites = single_site(&[(0.002, 0.002)]);
        let analysis = detect(&sites, &metros, &parameters).unwrap();

        assert_eq!(analysis.total_interferences, 0);
        assert_eq!(analysis.total_units_in_progress, 0);
        assert!(analysis.distances.is_empty());
        assert!(analysis.units_in_progress_by_city.values().all(|&units| units == 0));
        assert_eq!(analysis.sites_counted, indexmap! {SiteID(0) => false});
    }

    #[rstest]
    fn test_detect_outside_city_threshold(metros: MetroTable, parameters: AnalysisParameters) {
        // Both sites are close to each other but a long way from either metro
        let sites = CompanySites::new(
            [(Coordinate::new(5.0, -5.0), 5)],
            [Coordinate::new(5.001, -5.001)],
        );
        let analysis = detect(&sites, &metros, &parameters).unwrap();
        assert_eq!(analysis.total_interferences, 0);
    }

    #[rstest]
    fn test_detect_units_credited_once(metros: MetroTable, parameters: AnalysisParameters) {
        let sites = single_site(&[(0.002, 0.002), (0.0, 0.0)]);
        let analysis = detect(&sites, &metros, &parameters).unwrap();

        assert_eq!(analysis.total_interferences, 2);
        assert_eq!(analysis.interference_count_by_city["A"], 2);
        assert_eq!(analysis.total_units_in_progress, 5);
        assert_eq!(analysis.units_in_progress_by_city["A"], 5);

        let records = &analysis.interferences_by_city["A"][&SiteID(0)].records;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].existing, Coordinate::new(0.002, 0.002));
        assert_eq!(records[1].existing, Coordinate::new(0.0, 0.0));
    }

    #[rstest]
    fn test_detect_counted_site_skipped(metros: MetroTable, parameters: AnalysisParameters) {
        // The second entry has the same location so is the same site and should be skipped
        let sites = CompanySites::new(
            [
                (Coordinate::new(0.001, 0.001), 5),
                (Coordinate::new(0.001, 0.001), 7),
            ],
            [Coordinate::new(0.002, 0.002)],
        );
        let analysis = detect(&sites, &metros, &parameters).unwrap();

        assert_eq!(analysis.total_interferences, 1);
        assert_eq!(analysis.total_units_in_progress, 5);
        assert_eq!(analysis.sites_counted.len(), 1);
    }

    #[rstest]
    fn test_detect_uncounted_duplicate_is_rechecked(
        metros: MetroTable,
        parameters: AnalysisParameters,
    ) {
        // Neither entry interferes, so both are checked and neither is counted
        let sites = CompanySites::new(
            [
                (Coordinate::new(0.001, 0.001), 5),
                (Coordinate::new(0.001, 0.001), 7),
            ],
            [Coordinate::new(0.5, 0.5)],
        );
        let analysis = detect(&sites, &metros, &parameters).unwrap();
        assert_eq!(analysis.total_interferences, 0);
        assert_eq!(analysis.sites_counted, indexmap! {SiteID(0) => false});
    }

    #[test]
    fn test_detect_units_credited_to_first_city() {
        let metros = indexmap! {
            "West".into() => Coordinate::new(0.0, 0.0),
            "East".into() => Coordinate::new(0.0, 1.0),
        };
        let parameters = AnalysisParameters {
            build_threshold: Miles(15.0),
            city_threshold: Miles(50.0),
        };

        // The midpoint with the first building is nearest West and with the second nearest East
        let sites = CompanySites::new(
            [(Coordinate::new(0.0, 0.45), 5)],
            [Coordinate::new(0.0, 0.4), Coordinate::new(0.0, 0.6)],
        );
        let analysis = detect(&sites, &metros, &parameters).unwrap();

        assert_eq!(
            analysis.interference_count_by_city,
            indexmap! {"West".into() => 1, "East".into() => 1}
        );
        assert_eq!(
            analysis.units_in_progress_by_city,
            indexmap! {"West".into() => 5, "East".into() => 0}
        );
        assert_eq!(analysis.total_units_in_progress, 5);
    }

    #[test]
    fn test_detect_empty_metros() {
        let sites = single_site(&[(0.002, 0.002)]);
        assert_error!(
            detect(&sites, &MetroTable::new(), &AnalysisParameters::default()),
            "Cannot find nearest metro: metro table is empty"
        );
    }

    #[rstest]
    fn test_detect_no_sites(metros: MetroTable, parameters: AnalysisParameters) {
        let analysis = detect(&CompanySites::default(), &metros, &parameters).unwrap();
        assert_eq!(analysis.total_interferences, 0);
        assert!(analysis.sites_counted.is_empty());
        assert_eq!(analysis.interference_count_by_city.len(), metros.len());
    }

    #[rstest]
    fn test_run_analysis(metros: MetroTable, parameters: AnalysisParameters) {
        let input = AnalysisInput {
            parameters,
            metros,
            companies: indexmap! {
                "Acme".into() => single_site(&[(0.002, 0.002)]),
                "Zenith".into() => single_site(&[(0.002, 0.002), (0.0, 0.0)]),
            },
        };
        let results = run_analysis(&input).unwrap();

        assert_eq!(results.total_interferences, 3);
        let names: Vec<_> = results.companies.keys().map(ToString::to_string).collect();
        assert_eq!(names, ["Acme", "Zenith"]);
        assert_eq!(results.companies["Acme"].total_interferences, 1);
        assert_eq!(results.companies["Zenith"].total_interferences, 2);
    }
}
