//! Minute-based time handling for catalog schedules.
//!
//! Sellers publish departures as integer minutes. Within a single day this is
//! minute-of-day (0..1440); catalogs spanning several days simply keep
//! counting, so an arrival at 1500 is 01:00 on the following day.

use std::fmt;
use std::ops::Add;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// Number of minutes in a day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A point in time, counted in minutes.
///
/// # Examples
///
/// ```
/// use travel_market::domain::Minute;
///
/// let t = Minute::parse_hhmm("14:30").unwrap();
/// assert_eq!(t.value(), 870);
/// assert_eq!(t.to_string(), "14:30");
///
/// // Past midnight the day offset is shown
/// assert_eq!(Minute::new(1500).to_string(), "01:00+1d");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Minute(u32);

impl Minute {
    /// Create a time from a raw minute count.
    pub const fn new(minutes: u32) -> Self {
        Self(minutes)
    }

    /// Parse a time from "HH:MM" format.
    ///
    /// # Examples
    ///
    /// ```
    /// use travel_market::domain::Minute;
    ///
    /// assert!(Minute::parse_hhmm("00:00").is_ok());
    /// assert!(Minute::parse_hhmm("23:59").is_ok());
    ///
    /// assert!(Minute::parse_hhmm("1430").is_err());
    /// assert!(Minute::parse_hhmm("25:00").is_err());
    /// ```
    pub fn parse_hhmm(s: &str) -> Result<Self, TimeError> {
        let s = s.trim();
        if s.len() != 5 {
            return Err(TimeError::new("expected HH:MM format"));
        }

        let time = NaiveTime::parse_from_str(s, "%H:%M")
            .map_err(|_| TimeError::new("expected HH:MM format"))?;

        Ok(Self::from_naive_time(time))
    }

    /// Build a minute-of-day from a clock time (seconds are dropped).
    pub fn from_naive_time(time: NaiveTime) -> Self {
        Self(time.hour() * 60 + time.minute())
    }

    /// Returns the raw minute count.
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Returns the number of whole days before this time.
    pub const fn day(self) -> u32 {
        self.0 / MINUTES_PER_DAY
    }

    /// Returns the minute within its day (0..1440).
    pub const fn minute_of_day(self) -> u32 {
        self.0 % MINUTES_PER_DAY
    }

    /// Add minutes on a 24-hour clock, rolling over midnight.
    ///
    /// Used when expanding recurring schedules: a service every 120 minutes
    /// starting at 23:00 next leaves at 01:00, i.e. minute 60.
    ///
    /// ```
    /// use travel_market::domain::Minute;
    ///
    /// let late = Minute::parse_hhmm("23:00").unwrap();
    /// assert_eq!(late.add_wrapping_day(120), Minute::new(60));
    /// ```
    pub fn add_wrapping_day(self, minutes: u32) -> Self {
        let sum = u64::from(self.0) + u64::from(minutes);
        Self((sum % u64::from(MINUTES_PER_DAY)) as u32)
    }

    /// Add minutes without wrapping, saturating at the representable maximum.
    pub const fn saturating_add(self, minutes: u32) -> Self {
        Self(self.0.saturating_add(minutes))
    }

    /// Minutes elapsed since `earlier`, or zero if `earlier` is later.
    pub const fn minutes_since(self, earlier: Minute) -> u32 {
        self.0.saturating_sub(earlier.0)
    }
}

impl Add<u32> for Minute {
    type Output = Self;

    fn add(self, rhs: u32) -> Self::Output {
        self.saturating_add(rhs)
    }
}

impl From<u32> for Minute {
    fn from(minutes: u32) -> Self {
        Self(minutes)
    }
}

impl fmt::Debug for Minute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Minute({} = {})", self.0, self)
    }
}

impl fmt::Display for Minute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let of_day = self.minute_of_day();
        write!(f, "{:02}:{:02}", of_day / 60, of_day % 60)?;
        if self.day() > 0 {
            write!(f, "+{}d", self.day())?;
        }
        Ok(())
    }
}
