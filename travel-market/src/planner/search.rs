//! Depth-first journey search.
//!
//! Enumerates every simple, time-feasible path through a catalog from an
//! origin to a destination.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::catalog::Catalog;
use crate::domain::{ComposedJourney, Journey, Location, Minute};

use super::cancel::CancelToken;
use super::config::SearchConfig;

/// Error from journey search.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// Invalid search request
    #[error("invalid search request: {0}")]
    InvalidRequest(String),

    /// Search was cancelled before completing
    #[error("search cancelled")]
    Cancelled,
}

/// Request for journey search.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// Where the trip starts.
    pub origin: Location,

    /// Where the trip must end.
    pub destination: Location,

    /// The first leg may not leave before this time.
    pub earliest_departure: Minute,

    /// Minimum minutes between one leg's arrival and the next departure.
    pub connection_buffer_mins: u32,
}

impl SearchRequest {
    /// Create a new search request.
    pub fn new(
        origin: Location,
        destination: Location,
        earliest_departure: Minute,
        connection_buffer_mins: u32,
    ) -> Self {
        Self {
            origin,
            destination,
            earliest_departure,
            connection_buffer_mins,
        }
    }

    /// Validate the request against the search limits.
    pub fn validate(&self, config: &SearchConfig) -> Result<(), SearchError> {
        if config.max_legs == Some(0) {
            return Err(SearchError::InvalidRequest(
                "max_legs must allow at least one leg".to_string(),
            ));
        }
        Ok(())
    }
}

/// Result of journey search.
#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    /// Found journeys, in enumeration order.
    pub journeys: Vec<ComposedJourney>,

    /// Number of path extensions tried during search.
    pub routes_explored: usize,
}

/// Multi-hop journey search over a catalog.
///
/// The catalog is only read; one engine may serve any number of searches.
pub struct JourneySearchEngine<'a> {
    catalog: &'a Catalog,
    config: &'a SearchConfig,
}

impl<'a> JourneySearchEngine<'a> {
    /// Create a new search engine.
    pub fn new(catalog: &'a Catalog, config: &'a SearchConfig) -> Self {
        Self { catalog, config }
    }

    /// Find every feasible itinerary for `request`.
    ///
    /// Results come out in depth-first order: candidates at each location
    /// are tried in catalog insertion order. No result is not an error.
    pub fn search(
        &self,
        request: &SearchRequest,
        cancel: &CancelToken,
    ) -> Result<SearchResult, SearchError> {
        request.validate(self.config)?;
        if cancel.is_cancelled() {
            return Err(SearchError::Cancelled);
        }

        debug!(
            origin = %request.origin,
            destination = %request.destination,
            earliest_departure = %request.earliest_departure,
            buffer_mins = request.connection_buffer_mins,
            catalog = self.catalog.len(),
            "Starting journey search"
        );

        let mut dfs = Dfs {
            catalog: self.catalog,
            config: self.config,
            request,
            cancel,
            check_every: self.config.cancel_check_interval.max(1),
            path: Vec::new(),
            visited: HashSet::from([&request.origin]),
            found: Vec::new(),
            explored: 0,
        };
        dfs.explore(&request.origin, request.earliest_departure)?;

        debug!(
            found = dfs.found.len(),
            explored = dfs.explored,
            "Journey search finished"
        );

        Ok(SearchResult {
            journeys: dfs.found,
            routes_explored: dfs.explored,
        })
    }
}

/// Search state shared across the recursion.
///
/// `path` and `visited` always describe the current branch: every push is
/// undone before trying the next candidate.
struct Dfs<'a> {
    catalog: &'a Catalog,
    config: &'a SearchConfig,
    request: &'a SearchRequest,
    cancel: &'a CancelToken,
    check_every: usize,
    path: Vec<&'a Journey>,
    visited: HashSet<&'a Location>,
    found: Vec<ComposedJourney>,
    explored: usize,
}

impl<'a> Dfs<'a> {
    fn explore(&mut self, at: &'a Location, ready: Minute) -> Result<(), SearchError> {
        let catalog = self.catalog;

        for leg in catalog.departures_from(at, ready) {
            let next = leg.destination();
            if self.visited.contains(next) {
                continue;
            }

            self.explored += 1;
            if self.explored % self.check_every == 0 && self.cancel.is_cancelled() {
                debug!(explored = self.explored, "Journey search cancelled");
                return Err(SearchError::Cancelled);
            }

            self.path.push(leg);
            self.visited.insert(next);

            if *next == self.request.destination {
                self.record();
            } else if self.config.allows_more_legs(self.path.len()) {
                let ready = leg.arrival() + self.request.connection_buffer_mins;
                self.explore(next, ready)?;
            }

            self.visited.remove(next);
            self.path.pop();
        }

        Ok(())
    }

    fn record(&mut self) {
        let legs: Vec<Journey> = self.path.iter().map(|&leg| leg.clone()).collect();
        match ComposedJourney::new(legs, self.request.connection_buffer_mins) {
            Ok(journey) => {
                trace!(
                    legs = journey.leg_count(),
                    cost = journey.total_cost(),
                    arrival = %journey.arrival(),
                    "Found journey"
                );
                self.found.push(journey);
            }
            Err(e) => {
                // Unreachable while the search upholds the path invariants
                debug!(error = %e, "Discarding invalid path");
            }
        }
    }
}
