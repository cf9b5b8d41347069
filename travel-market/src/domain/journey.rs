//! Atomic journey type.
//!
//! A `Journey` is a single leg offered by one seller: one origin, one
//! destination, one transport mode and fixed timing, cost, emission and
//! comfort attributes.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{DomainError, Location, Minute};

/// Cost, emission and comfort attributes of a journey.
///
/// Comfort is an integer score where higher is better.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Financial cost
    pub cost: f64,
    /// CO2 emission
    pub co2: f64,
    /// Comfort score (higher is better)
    pub comfort: u32,
}

impl Metrics {
    /// Create a metrics triple.
    pub fn new(cost: f64, co2: f64, comfort: u32) -> Self {
        Self { cost, co2, comfort }
    }

    fn validate(&self) -> Result<(), DomainError> {
        check_amount("cost", self.cost)?;
        check_amount("co2", self.co2)
    }
}

fn check_amount(field: &'static str, value: f64) -> Result<(), DomainError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(DomainError::InvalidAmount { field, value })
    }
}

/// A single leg between two locations.
///
/// Immutable once constructed. Values decoded from a seller's wire payload
/// go through the same validation as [`Journey::new`].
///
/// # Invariants
///
/// - `arrival() == departure() + duration`
/// - cost and co2 are finite and non-negative
/// - mode is non-empty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "JourneyWire")]
pub struct Journey {
    origin: Location,
    destination: Location,
    mode: String,
    departure: Minute,
    duration_mins: u32,
    #[serde(flatten)]
    metrics: Metrics,
}

impl Journey {
    /// Construct a journey, validating its attributes.
    ///
    /// # Examples
    ///
    /// ```
    /// use travel_market::domain::{Journey, Location, Metrics, Minute};
    ///
    /// let journey = Journey::new(
    ///     Location::parse("paris").unwrap(),
    ///     Location::parse("lyon").unwrap(),
    ///     "train",
    ///     Minute::new(480),
    ///     120,
    ///     Metrics::new(50.0, 10.0, 3),
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(journey.arrival(), Minute::new(600));
    /// ```
    pub fn new(
        origin: Location,
        destination: Location,
        mode: impl Into<String>,
        departure: Minute,
        duration_mins: u32,
        metrics: Metrics,
    ) -> Result<Self, DomainError> {
        let mode = mode.into().trim().to_string();
        if mode.is_empty() {
            return Err(DomainError::EmptyMode);
        }
        metrics.validate()?;

        Ok(Journey {
            origin,
            destination,
            mode,
            departure,
            duration_mins,
            metrics,
        })
    }

    /// Returns a copy of this journey leaving at another time.
    ///
    /// Used to expand recurring schedules; everything except the departure
    /// is unchanged.
    pub fn with_departure(&self, departure: Minute) -> Self {
        Journey {
            departure,
            ..self.clone()
        }
    }

    /// Returns the origin location.
    pub fn origin(&self) -> &Location {
        &self.origin
    }

    /// Returns the destination location.
    pub fn destination(&self) -> &Location {
        &self.destination
    }

    /// Returns the transport mode label.
    pub fn mode(&self) -> &str {
        &self.mode
    }

    /// Returns the departure time.
    pub fn departure(&self) -> Minute {
        self.departure
    }

    /// Returns the duration in minutes.
    pub fn duration_mins(&self) -> u32 {
        self.duration_mins
    }

    /// Returns the arrival time.
    pub fn arrival(&self) -> Minute {
        self.departure + self.duration_mins
    }

    /// Returns cost, co2 and comfort.
    pub fn metrics(&self) -> Metrics {
        self.metrics
    }

    pub fn cost(&self) -> f64 {
        self.metrics.cost
    }

    pub fn co2(&self) -> f64 {
        self.metrics.co2
    }

    pub fn comfort(&self) -> u32 {
        self.metrics.comfort
    }
}

impl fmt::Display for Journey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} by {} ({} - {}, cost {}, co2 {}, comfort {})",
            self.origin,
            self.destination,
            self.mode,
            self.departure,
            self.arrival(),
            self.metrics.cost,
            self.metrics.co2,
            self.metrics.comfort
        )
    }
}

/// Unvalidated wire shape of a [`Journey`].
#[derive(Deserialize)]
struct JourneyWire {
    origin: Location,
    destination: Location,
    mode: String,
    departure: Minute,
    duration_mins: u32,
    #[serde(flatten)]
    metrics: Metrics,
}

impl TryFrom<JourneyWire> for Journey {
    type Error = DomainError;

    fn try_from(wire: JourneyWire) -> Result<Self, Self::Error> {
        Journey::new(
            wire.origin,
            wire.destination,
            wire.mode,
            wire.departure,
            wire.duration_mins,
            wire.metrics,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(s: &str) -> Location {
        Location::parse(s).unwrap()
    }

    fn paris_lyon() -> Journey {
        Journey::new(
            loc("PARIS"),
            loc("LYON"),
            "train",
            Minute::new(480),
            120,
            Metrics::new(50.0, 10.0, 3),
        )
        .unwrap()
    }

    #[test]
    fn accessors() {
        let j = paris_lyon();
        assert_eq!(j.origin(), &loc("PARIS"));
        assert_eq!(j.destination(), &loc("LYON"));
        assert_eq!(j.mode(), "train");
        assert_eq!(j.departure(), Minute::new(480));
        assert_eq!(j.duration_mins(), 120);
        assert_eq!(j.arrival(), Minute::new(600));
        assert_eq!(j.cost(), 50.0);
        assert_eq!(j.co2(), 10.0);
        assert_eq!(j.comfort(), 3);
    }

    #[test]
    fn zero_duration_arrives_at_departure() {
        let j = Journey::new(
            loc("A"),
            loc("B"),
            "walk",
            Minute::new(10),
            0,
            Metrics::new(0.0, 0.0, 0),
        )
        .unwrap();
        assert_eq!(j.arrival(), j.departure());
    }

    #[test]
    fn rejects_negative_cost() {
        let result = Journey::new(
            loc("A"),
            loc("B"),
            "bus",
            Minute::new(0),
            10,
            Metrics::new(-1.0, 0.0, 1),
        );
        assert!(matches!(
            result,
            Err(DomainError::InvalidAmount { field: "cost", .. })
        ));
    }

    #[test]
    fn rejects_nan_co2() {
        let result = Journey::new(
            loc("A"),
            loc("B"),
            "bus",
            Minute::new(0),
            10,
            Metrics::new(1.0, f64::NAN, 1),
        );
        assert!(matches!(
            result,
            Err(DomainError::InvalidAmount { field: "co2", .. })
        ));
    }

    #[test]
    fn rejects_blank_mode() {
        let result = Journey::new(
            loc("A"),
            loc("B"),
            "  ",
            Minute::new(0),
            10,
            Metrics::new(1.0, 1.0, 1),
        );
        assert!(matches!(result, Err(DomainError::EmptyMode)));
    }

    #[test]
    fn with_departure_shifts_only_departure() {
        let j = paris_lyon();
        let later = j.with_departure(Minute::new(720));

        assert_eq!(later.departure(), Minute::new(720));
        assert_eq!(later.arrival(), Minute::new(840));
        assert_eq!(later.origin(), j.origin());
        assert_eq!(later.metrics(), j.metrics());
        // Original untouched
        assert_eq!(j.departure(), Minute::new(480));
    }

    #[test]
    fn json_roundtrip_preserves_journey() {
        let j = paris_lyon();
        let json = serde_json::to_string(&j).unwrap();
        let back: Journey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, j);
    }

    #[test]
    fn json_decoding_validates() {
        let json = r#"{
            "origin": "paris", "destination": "lyon", "mode": "train",
            "departure": 480, "duration_mins": 120,
            "cost": -5.0, "co2": 10.0, "comfort": 3
        }"#;
        assert!(serde_json::from_str::<Journey>(json).is_err());

        let json = r#"{
            "origin": "paris", "destination": "lyon", "mode": "train",
            "departure": 480, "duration_mins": 120,
            "cost": 5.0, "co2": 10.0, "comfort": 3
        }"#;
        let j: Journey = serde_json::from_str(json).unwrap();
        assert_eq!(j.origin().as_str(), "PARIS");
    }

    #[test]
    fn display() {
        assert_eq!(
            paris_lyon().to_string(),
            "PARIS -> LYON by train (08:00 - 10:00, cost 50, co2 10, comfort 3)"
        );
    }
}
