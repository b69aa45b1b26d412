//! Construction and existing building sites, grouped by the company which owns them.
use crate::distance::Coordinate;
use crate::id::define_id_type;
use derive_more::Display;
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use std::collections::HashMap;

define_id_type! {CompanyID}

/// A map of [`CompanySites`], keyed by company ID
pub type CompanySitesMap = IndexMap<CompanyID, CompanySites>;

/// Identifies a construction site within a single company's data.
///
/// Sites with exactly the same coordinates share an ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize)]
pub struct SiteID(pub usize);

/// A site where units are under construction
#[derive(Debug, Clone, PartialEq)]
pub struct ConstructionSite {
    /// Identity used to avoid counting a site's units more than once
    pub id: SiteID,
    /// Location of the site
    pub coord: Coordinate,
    /// Number of units under construction
    pub units: u32,
}

/// An existing building
#[derive(Debug, Clone, PartialEq)]
pub struct ExistingSite {
    /// Location of the building
    pub coord: Coordinate,
}

/// The construction and existing sites owned by one company
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompanySites {
    /// Construction sites, in input order
    pub construction: Vec<ConstructionSite>,
    /// Existing sites, in input order
    pub existing: Vec<ExistingSite>,
}

impl CompanySites {
    /// Create a new [`CompanySites`], assigning a [`SiteID`] to each construction site.
    ///
    /// # Arguments
    ///
    /// * `construction` - Location and unit count for each construction site
    /// * `existing` - Location of each existing building
    pub fn new<I, J>(construction: I, existing: J) -> Self
    where
        I: IntoIterator<Item = (Coordinate, u32)>,
        J: IntoIterator<Item = Coordinate>,
    {
        let mut ids = HashMap::new();
        let construction = construction
            .into_iter()
            .map(|(coord, units)| {
                let next_id = SiteID(ids.len());
                let id = *ids.entry(coord.to_bits()).or_insert(next_id);
                ConstructionSite { id, coord, units }
            })
            .collect();
        let existing = existing
            .into_iter()
            .map(|coord| ExistingSite { coord })
            .collect();

        Self {
            construction,
            existing,
        }
    }

    /// Iterate over the distinct construction site IDs, in order of first appearance
    pub fn iter_site_ids(&self) -> impl Iterator<Item = SiteID> + '_ {
        let mut seen = IndexSet::new();
        self.construction
            .iter()
            .filter_map(move |site| seen.insert(site.id).then_some(site.id))
    }
}
