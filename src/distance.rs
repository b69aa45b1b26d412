//! Geodesic distances between coordinates on the Earth's surface.
use crate::units::{DistanceUnit, Metres, Miles};
use geo::{Distance, Geodesic, Point};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A location given as latitude and longitude in degrees.
///
/// No range checks are performed on the values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (positive north)
    pub lat: f64,
    /// Longitude in degrees (positive east)
    pub lon: f64,
}

impl Coordinate {
    /// Create a new [`Coordinate`]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// The arithmetic mean of the latitudes and longitudes of two coordinates.
    ///
    /// This is not the geodesic midpoint. It is what is used to decide which metro a pair of sites
    /// belongs to.
    pub fn midpoint(&self, other: &Coordinate) -> Coordinate {
        Coordinate {
            lat: (self.lat + other.lat) / 2.0,
            lon: (self.lon + other.lon) / 2.0,
        }
    }

    /// The exact bit pattern of the coordinate, for identifying duplicate locations
    pub fn to_bits(self) -> (u64, u64) {
        (self.lat.to_bits(), self.lon.to_bits())
    }

    pub(crate) fn to_point(self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

/// Geodesic distance in metres between two coordinates on the WGS-84 ellipsoid
pub fn geodesic_metres(a: &Coordinate, b: &Coordinate) -> Metres {
    if a == b {
        return Metres(0.0);
    }

    Metres(Geodesic.distance(a.to_point(), b.to_point()))
}

/// Geodesic distance between two coordinates in the requested unit
pub fn distance(a: &Coordinate, b: &Coordinate, unit: DistanceUnit) -> f64 {
    unit.from_metres(geodesic_metres(a, b))
}

/// Geodesic distance between two coordinates in miles
pub fn distance_miles(a: &Coordinate, b: &Coordinate) -> Miles {
    Miles::from(geodesic_metres(a, b))
}
