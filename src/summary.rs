//! Reduces per-company results to summary statistics and report lines.
use crate::interference::{AnalysisResults, CompanyAnalysis};
use crate::metro::CityID;
use crate::units::Miles;
use indexmap::IndexMap;
use std::cmp::Ordering;

/// Printed in place of distance statistics when a company has no interferences
pub const NO_INTERFERENCES_SENTINEL: &str = "no interferences recorded";

/// Printed in place of a city name when there are no cities to choose from
const NO_CITY: &str = "none";

/// Mean and population standard deviation of a set of distances
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceStats {
    /// Arithmetic mean
    pub mean: Miles,
    /// Population standard deviation
    pub std_dev: Miles,
}

impl DistanceStats {
    /// Calculate statistics for the given distances.
    ///
    /// Returns `None` if `distances` is empty.
    pub fn from_distances(distances: &[Miles]) -> Option<Self> {
        if distances.is_empty() {
            return None;
        }

        let count = distances.len() as f64;
        let mean = distances.iter().map(|d| d.value()).sum::<f64>() / count;
        let variance = distances
            .iter()
            .map(|d| (d.value() - mean).powi(2))
            .sum::<f64>()
            / count;

        Some(Self {
            mean: Miles(mean),
            std_dev: Miles(variance.sqrt()),
        })
    }
}

/// Find the city whose value compares as `wanted` against all others.
///
/// Ties go to the first city in iteration order.
fn select_city<V: Ord>(values: &IndexMap<CityID, V>, wanted: Ordering) -> Option<&CityID> {
    let mut iter = values.iter();
    let (mut best_id, mut best_value) = iter.next()?;
    for (id, value) in iter {
        if value.cmp(best_value) == wanted {
            best_id = id;
            best_value = value;
        }
    }

    Some(best_id)
}

/// The city with the largest value, or the first such city if there is a tie
pub fn city_with_most<V: Ord>(values: &IndexMap<CityID, V>) -> Option<&CityID> {
    select_city(values, Ordering::Greater)
}

/// The city with the smallest value, or the first such city if there is a tie
pub fn city_with_least<V: Ord>(values: &IndexMap<CityID, V>) -> Option<&CityID> {
    select_city(values, Ordering::Less)
}

fn city_name(city_id: Option<&CityID>) -> &str {
    match city_id {
        Some(id) => &id.0,
        None => NO_CITY,
    }
}

/// Summary lines for a single company
fn summarize_company(company: &str, analysis: &CompanyAnalysis) -> Vec<String> {
    let mut lines = vec![
        format!("======== results for company: {company} ========"),
        format!("total interferences: {}", analysis.total_interferences),
    ];

    match DistanceStats::from_distances(&analysis.distances) {
        Some(stats) => {
            lines.push(format!(
                "average distance between existing and construction sites: {} miles",
                stats.mean
            ));
            lines.push(format!(
                "standard deviation of distance between existing and construction sites: {} miles",
                stats.std_dev
            ));
        }
        None => lines.push(NO_INTERFERENCES_SENTINEL.to_string()),
    }

    let counts = &analysis.interference_count_by_city;
    let units = &analysis.units_in_progress_by_city;
    lines.extend([
        format!(
            "city with most interferences: {}",
            city_name(city_with_most(counts))
        ),
        format!(
            "city with least interferences: {}",
            city_name(city_with_least(counts))
        ),
        format!(
            "city with most units in progress: {}",
            city_name(city_with_most(units))
        ),
        format!(
            "city with least units in progress: {}",
            city_name(city_with_least(units))
        ),
        String::new(),
    ]);

    lines
}

/// Produce the report lines for every company, in input order.
///
/// Each company's block ends with a blank line.
pub fn summarize(results: &AnalysisResults) -> Vec<String> {
    results
        .companies
        .iter()
        .flat_map(|(company_id, analysis)| summarize_company(&company_id.0, analysis))
        .collect()
}
