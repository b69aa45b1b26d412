//! Metro areas to which interferences are attributed.
use crate::distance::{Coordinate, distance_miles};
use crate::id::define_id_type;
use crate::units::Miles;
use anyhow::{Result, bail};
use indexmap::IndexMap;
use log::trace;

define_id_type! {CityID}

/// Metro coordinates keyed by city name.
///
/// Iteration order is the order in which metros were read and decides ties when finding the
/// nearest metro.
pub type MetroTable = IndexMap<CityID, Coordinate>;

/// Find the metro closest to `point`.
///
/// Distances are measured in miles. If several metros are equally close, the first one in the
/// table wins.
///
/// # Returns
///
/// The ID of the closest metro and its distance from `point`, or an error if `metros` is empty.
pub fn nearest_metro(metros: &MetroTable, point: &Coordinate) -> Result<(CityID, Miles)> {
    let mut iter = metros.iter();
    let Some((first_id, first_coord)) = iter.next() else {
        bail!("Cannot find nearest metro: metro table is empty");
    };

    let mut city_id = first_id;
    let mut dist = distance_miles(point, first_coord);
    for (id, coord) in iter {
        let candidate = distance_miles(point, coord);
        if candidate < dist {
            city_id = id;
            dist = candidate;
        }
    }
    trace!("Closest metro to ({point}) is {city_id} with distance {dist} mi");

    Ok((city_id.clone(), dist))
}
