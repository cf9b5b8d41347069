//! Domain types for the travel marketplace.
//!
//! This module contains the value types journeys are built from. All types
//! enforce their invariants at construction time, so code that receives
//! these types can trust their validity.

mod composed;
mod error;
mod journey;
mod location;
mod time;

pub use composed::ComposedJourney;
pub use error::DomainError;
pub use journey::{Journey, Metrics};
pub use location::{InvalidLocation, Location};
pub use time::{MINUTES_PER_DAY, Minute, TimeError};
