//! Composed journey type.
//!
//! A `ComposedJourney` is a multi-leg itinerary built from catalog journeys,
//! possibly sold by different sellers.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use super::{DomainError, Journey, Location, Minute};

/// An itinerary from origin to destination made of one or more legs.
///
/// # Invariants
///
/// - At least one leg
/// - Consecutive legs connect (destination of one = origin of next)
/// - Each leg departs no earlier than the previous arrival plus the
///   connection buffer the itinerary was built with
/// - No location appears twice along the path
///
/// Comfort of the whole itinerary is the minimum comfort over its legs: a
/// trip is only as comfortable as its worst leg.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComposedJourney {
    legs: Vec<Journey>,
    connection_buffer_mins: u32,
}

impl ComposedJourney {
    /// Constructs a composed journey, validating the path.
    ///
    /// # Errors
    ///
    /// Returns `Err` if:
    /// - `legs` is empty
    /// - Consecutive legs don't share a location
    /// - A connection is tighter than `connection_buffer_mins`
    /// - A location is visited twice
    pub fn new(legs: Vec<Journey>, connection_buffer_mins: u32) -> Result<Self, DomainError> {
        let first = legs.first().ok_or(DomainError::EmptyJourney)?;

        let mut seen: HashSet<&Location> = HashSet::with_capacity(legs.len() + 1);
        seen.insert(first.origin());

        for window in legs.windows(2) {
            let (prev, next) = (&window[0], &window[1]);

            if prev.destination() != next.origin() {
                return Err(DomainError::LegsNotConnected(
                    prev.destination().clone(),
                    next.origin().clone(),
                ));
            }

            let ready = prev.arrival() + connection_buffer_mins;
            if next.departure() < ready {
                return Err(DomainError::ConnectionTooTight {
                    at: next.origin().clone(),
                    ready,
                    departs: next.departure(),
                });
            }
        }

        for leg in &legs {
            if !seen.insert(leg.destination()) {
                return Err(DomainError::RepeatedLocation(leg.destination().clone()));
            }
        }

        Ok(ComposedJourney {
            legs,
            connection_buffer_mins,
        })
    }

    /// Returns all legs in order.
    pub fn legs(&self) -> &[Journey] {
        &self.legs
    }

    /// Returns the number of legs.
    pub fn leg_count(&self) -> usize {
        self.legs.len()
    }

    /// Returns the number of changes (legs - 1).
    pub fn change_count(&self) -> usize {
        self.legs.len().saturating_sub(1)
    }

    /// Returns the connection buffer this itinerary was validated against.
    pub fn connection_buffer_mins(&self) -> u32 {
        self.connection_buffer_mins
    }

    fn first(&self) -> &Journey {
        // Safe: validated non-empty at construction
        &self.legs[0]
    }

    fn last(&self) -> &Journey {
        // Safe: validated non-empty at construction
        &self.legs[self.legs.len() - 1]
    }

    /// Returns the origin location.
    pub fn origin(&self) -> &Location {
        self.first().origin()
    }

    /// Returns the final destination.
    pub fn destination(&self) -> &Location {
        self.last().destination()
    }

    /// Returns the departure time of the first leg.
    pub fn departure(&self) -> Minute {
        self.first().departure()
    }

    /// Returns the arrival time of the last leg.
    pub fn arrival(&self) -> Minute {
        self.last().arrival()
    }

    /// Total cost over all legs.
    pub fn total_cost(&self) -> f64 {
        self.legs.iter().map(Journey::cost).sum()
    }

    /// Total CO2 over all legs.
    pub fn total_co2(&self) -> f64 {
        self.legs.iter().map(Journey::co2).sum()
    }

    /// Door-to-door duration: last arrival minus first departure.
    pub fn total_duration_mins(&self) -> u32 {
        self.arrival().minutes_since(self.departure())
    }

    /// Comfort of the least comfortable leg.
    pub fn comfort(&self) -> u32 {
        self.legs.iter().map(Journey::comfort).min().unwrap_or(0)
    }

    /// Returns true if this is a single-leg itinerary.
    pub fn is_direct(&self) -> bool {
        self.legs.len() == 1
    }
}

impl fmt::Display for ComposedJourney {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} ({} - {}, {} min, cost {}, co2 {}, comfort {})",
            self.origin(),
            self.destination(),
            self.departure(),
            self.arrival(),
            self.total_duration_mins(),
            self.total_cost(),
            self.total_co2(),
            self.comfort()
        )?;
        for leg in &self.legs {
            write!(f, "\n  {leg}")?;
        }
        Ok(())
    }
}
