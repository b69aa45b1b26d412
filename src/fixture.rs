//! Fixtures for tests

use crate::distance::Coordinate;
use crate::input::AnalysisInput;
use crate::interference::{AnalysisResults, run_analysis};
use crate::metro::MetroTable;
use crate::parameters::AnalysisParameters;
use crate::site::CompanySites;
use crate::units::Miles;
use indexmap::indexmap;
use rstest::fixture;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

#[fixture]
pub fn metros() -> MetroTable {
    indexmap! {
        "A".into() => Coordinate::new(0.0, 0.0),
        "B".into() => Coordinate::new(10.0, 10.0),
    }
}

#[fixture]
pub fn parameters() -> AnalysisParameters {
    AnalysisParameters {
        build_threshold: Miles(1.0),
        city_threshold: Miles(50.0),
    }
}

/// One construction site near metro A which interferes with two buildings, plus one which
/// interferes with nothing
#[fixture]
pub fn company_sites() -> CompanySites {
    CompanySites::new(
        [
            (Coordinate::new(0.001, 0.001), 5),
            (Coordinate::new(10.5, 10.5), 8),
        ],
        [Coordinate::new(0.002, 0.002), Coordinate::new(0.0, 0.0)],
    )
}

#[fixture]
pub fn analysis_input(
    parameters: AnalysisParameters,
    metros: MetroTable,
    company_sites: CompanySites,
) -> AnalysisInput {
    AnalysisInput {
        parameters,
        metros,
        companies: indexmap! {
            "Acme".into() => company_sites,
            "Idle".into() => CompanySites::default(),
        },
    }
}

#[fixture]
pub fn analysis_results(analysis_input: AnalysisInput) -> AnalysisResults {
    run_analysis(&analysis_input).unwrap()
}
