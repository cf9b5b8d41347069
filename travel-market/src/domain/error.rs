//! Domain error types.
//!
//! These errors represent validation failures in the domain layer. They are
//! distinct from transport and ingestion errors.

use super::{Location, Minute};

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// A numeric attribute is negative, NaN or infinite
    #[error("invalid {field}: {value} (must be finite and non-negative)")]
    InvalidAmount { field: &'static str, value: f64 },

    /// The transport mode label is blank
    #[error("transport mode must not be empty")]
    EmptyMode,

    /// Composed journey has no legs
    #[error("composed journey must have at least one leg")]
    EmptyJourney,

    /// Consecutive legs don't share a location
    #[error("legs do not connect: arrives at {0}, next leaves from {1}")]
    LegsNotConnected(Location, Location),

    /// Next leg leaves before the previous one arrived plus the buffer
    #[error("connection too tight at {at}: ready at {ready}, departs at {departs}")]
    ConnectionTooTight {
        at: Location,
        ready: Minute,
        departs: Minute,
    },

    /// The path passes through the same location twice
    #[error("location {0} is visited more than once")]
    RepeatedLocation(Location),
}
