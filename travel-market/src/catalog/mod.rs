//! Journey catalogs.
//!
//! A `Catalog` is the multiset of journeys one seller offers, or the merged
//! view a buyer builds from several sellers. Seeding a catalog from a CSV
//! file lives in [`seed`].

pub mod seed;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Journey, Location, Minute};

pub use seed::{RecordError, SeedError, SeedReport, load_catalog, parse_catalog};

/// A collection of journeys with an index by origin.
///
/// Journeys keep their insertion order; every query yields them in that
/// order, which makes search results reproducible for a given catalog.
/// Duplicates are allowed: two sellers may offer the same leg.
///
/// On the wire a catalog is a plain list of journeys; the index is rebuilt
/// on decode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Journey>", into = "Vec<Journey>")]
pub struct Catalog {
    journeys: Vec<Journey>,

    /// Map from origin -> positions in `journeys`, ascending.
    by_origin: HashMap<Location, Vec<usize>>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a journey.
    pub fn add(&mut self, journey: Journey) {
        let idx = self.journeys.len();
        self.by_origin
            .entry(journey.origin().clone())
            .or_default()
            .push(idx);
        self.journeys.push(journey);
    }

    /// Append every journey of `other`, after the existing ones.
    pub fn merge(&mut self, other: Catalog) {
        self.journeys.reserve(other.journeys.len());
        for journey in other.journeys {
            self.add(journey);
        }
    }

    /// All journeys departing from `origin` no earlier than `not_before`.
    pub fn departures_from<'a>(
        &'a self,
        origin: &Location,
        not_before: Minute,
    ) -> impl Iterator<Item = &'a Journey> + use<'a> {
        self.by_origin
            .get(origin)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
            .iter()
            .map(|&idx| &self.journeys[idx])
            .filter(move |j| j.departure() >= not_before)
    }

    /// All journeys in insertion order.
    pub fn journeys(&self) -> &[Journey] {
        &self.journeys
    }

    /// Number of distinct locations appearing as origin or destination.
    pub fn location_count(&self) -> usize {
        let mut locations: Vec<&Location> = self
            .journeys
            .iter()
            .flat_map(|j| [j.origin(), j.destination()])
            .collect();
        locations.sort();
        locations.dedup();
        locations.len()
    }

    pub fn len(&self) -> usize {
        self.journeys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.journeys.is_empty()
    }
}

impl From<Vec<Journey>> for Catalog {
    fn from(journeys: Vec<Journey>) -> Self {
        journeys.into_iter().collect()
    }
}

impl From<Catalog> for Vec<Journey> {
    fn from(catalog: Catalog) -> Self {
        catalog.journeys
    }
}

impl FromIterator<Journey> for Catalog {
    fn from_iter<I: IntoIterator<Item = Journey>>(iter: I) -> Self {
        let mut catalog = Catalog::new();
        for journey in iter {
            catalog.add(journey);
        }
        catalog
    }
}

impl Extend<Journey> for Catalog {
    fn extend<I: IntoIterator<Item = Journey>>(&mut self, iter: I) {
        for journey in iter {
            self.add(journey);
        }
    }
}
