//! Code for writing a map of metros and sites as `GeoJSON`.
//!
//! Each feature has a `kind` property (`metro`, `construction` or `existing`) and a `popup`
//! property with a short description. Metros and existing buildings also have a `radius_m`
//! property, giving the radius in metres of the circle to draw around them.
use crate::distance::Coordinate;
use crate::input::AnalysisInput;
use crate::units::{Metres, Miles};
use anyhow::{Context, Result};
use geojson::{Feature, FeatureCollection, Geometry, Value};
use std::fs;
use std::path::Path;

/// The output file name for the map
pub const MAP_FILE_NAME: &str = "map.geojson";

/// Round a value to three decimal places
fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Create a point feature at the given location
fn point_feature(coord: Coordinate, kind: &str, popup: String) -> Feature {
    let geometry = Geometry::new(Value::from(&coord.to_point()));
    let mut feature = Feature::from(geometry);
    feature.set_property("kind", kind);
    feature.set_property("popup", popup);

    feature
}

/// Create a feature to be drawn as a circle of the given radius
fn circle_feature(coord: Coordinate, kind: &str, radius: Miles) -> Feature {
    let mut feature = point_feature(coord, kind, format!("{radius} mi radius"));
    feature.set_property("radius_m", Metres::from(radius).value());

    feature
}

/// Build the map features for the input data.
///
/// Metros are drawn with the city threshold as their radius and existing buildings with the
/// build threshold. Construction sites are plain markers, with their location rounded to three
/// decimal places.
pub fn build_map(input: &AnalysisInput) -> FeatureCollection {
    let mut features = Vec::new();
    for (city_id, coord) in &input.metros {
        let mut feature = circle_feature(*coord, "metro", input.parameters.city_threshold);
        feature.set_property("name", city_id.to_string());
        features.push(feature);
    }

    for (company_id, sites) in &input.companies {
        for site in &sites.construction {
            let marker = Coordinate::new(round3(site.coord.lat), round3(site.coord.lon));
            let mut feature = point_feature(
                marker,
                "construction",
                format!("construction location ({})", site.coord),
            );
            feature.set_property("company", company_id.to_string());
            feature.set_property("units", site.units);
            features.push(feature);
        }

        for site in &sites.existing {
            let mut feature =
                circle_feature(site.coord, "existing", input.parameters.build_threshold);
            feature.set_property("company", company_id.to_string());
            features.push(feature);
        }
    }

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Write the map for the input data to a `GeoJSON` file
pub fn write_map(output_path: &Path, input: &AnalysisInput) -> Result<()> {
    let file_path = output_path.join(MAP_FILE_NAME);
    fs::write(&file_path, build_map(input).to_string())
        .with_context(|| format!("Failed to write {}", file_path.display()))?;

    Ok(())
}
