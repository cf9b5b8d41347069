//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{ComposedJourney, Journey, Minute, TimeError};
use crate::session::SearchOutcome;

/// Departure time as sent by clients: a raw minute count or "HH:MM".
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DepartureTime {
    Minutes(u32),
    Clock(String),
}

impl DepartureTime {
    /// Convert to a [`Minute`].
    pub fn to_minute(&self) -> Result<Minute, TimeError> {
        match self {
            DepartureTime::Minutes(m) => Ok(Minute::new(*m)),
            DepartureTime::Clock(s) => Minute::parse_hhmm(s),
        }
    }
}

/// Request to plan a journey.
#[derive(Debug, Deserialize)]
pub struct PlanJourneyRequest {
    /// Origin location
    pub origin: String,

    /// Destination location
    pub destination: String,

    /// Earliest departure (defaults to midnight)
    #[serde(default)]
    pub departure: Option<DepartureTime>,

    /// Sort mode name (defaults to the server's configured mode)
    #[serde(default)]
    pub preference: Option<String>,
}

/// A journey option.
#[derive(Debug, Serialize)]
pub struct JourneyResult {
    /// Legs in travel order
    pub legs: Vec<LegResult>,

    /// Departure time from origin
    pub departure_time: String,

    /// Arrival time at destination
    pub arrival_time: String,

    /// Total duration in minutes
    pub duration_mins: u32,

    /// Number of changes
    pub changes: usize,

    pub total_cost: f64,
    pub total_co2: f64,

    /// Comfort of the least comfortable leg
    pub comfort: u32,
}

/// One leg of a journey.
#[derive(Debug, Serialize)]
pub struct LegResult {
    pub origin: String,
    pub destination: String,
    pub mode: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub duration_mins: u32,
    pub cost: f64,
    pub co2: f64,
    pub comfort: u32,
}

/// Response to a journey plan request.
#[derive(Debug, Serialize)]
pub struct PlanJourneyResponse {
    /// Whether any journey was found
    pub found: bool,

    /// Human readable summary
    pub message: String,

    /// Found journey options, best first
    pub journeys: Vec<JourneyResult>,

    /// Sellers whose catalogs were searched
    pub responders: Vec<String>,

    /// Ordering applied to `journeys`
    pub sort_mode: String,

    /// Number of routes explored
    pub routes_explored: usize,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Conversion implementations

impl JourneyResult {
    /// Create from a domain ComposedJourney.
    pub fn from_journey(journey: &ComposedJourney) -> Self {
        Self {
            legs: journey.legs().iter().map(LegResult::from_leg).collect(),
            departure_time: journey.departure().to_string(),
            arrival_time: journey.arrival().to_string(),
            duration_mins: journey.total_duration_mins(),
            changes: journey.change_count(),
            total_cost: journey.total_cost(),
            total_co2: journey.total_co2(),
            comfort: journey.comfort(),
        }
    }
}

impl LegResult {
    /// Create from a domain Journey.
    pub fn from_leg(leg: &Journey) -> Self {
        Self {
            origin: leg.origin().to_string(),
            destination: leg.destination().to_string(),
            mode: leg.mode().to_string(),
            departure_time: leg.departure().to_string(),
            arrival_time: leg.arrival().to_string(),
            duration_mins: leg.duration_mins(),
            cost: leg.cost(),
            co2: leg.co2(),
            comfort: leg.comfort(),
        }
    }
}

impl PlanJourneyResponse {
    /// Create from a session outcome.
    pub fn from_outcome(outcome: &SearchOutcome) -> Self {
        let message = match outcome.journeys.len() {
            0 => "no journey found".to_string(),
            1 => "1 journey found".to_string(),
            n => format!("{n} journeys found"),
        };

        Self {
            found: outcome.found(),
            message,
            journeys: outcome.journeys.iter().map(JourneyResult::from_journey).collect(),
            responders: outcome.responders.clone(),
            sort_mode: outcome.sort_mode.to_string(),
            routes_explored: outcome.routes_explored,
        }
    }
}
