//! Location identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid location identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid location: {reason}")]
pub struct InvalidLocation {
    reason: &'static str,
}

/// A case-normalized location identifier (e.g. `PARIS`).
///
/// Sellers write locations however they like in their catalogs; the
/// identifier is trimmed and upper-cased on construction so that `paris`,
/// ` Paris ` and `PARIS` all name the same place.
///
/// # Examples
///
/// ```
/// use travel_market::domain::Location;
///
/// let paris = Location::parse(" paris ").unwrap();
/// assert_eq!(paris.as_str(), "PARIS");
///
/// // Blank identifiers are rejected
/// assert!(Location::parse("   ").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Location(String);

impl Location {
    /// Parse and normalize a location identifier.
    pub fn parse(s: &str) -> Result<Self, InvalidLocation> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(InvalidLocation {
                reason: "must not be empty",
            });
        }

        if trimmed.chars().any(|c| c.is_control()) {
            return Err(InvalidLocation {
                reason: "must not contain control characters",
            });
        }

        Ok(Location(trimmed.to_uppercase()))
    }

    /// Returns the normalized identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Location {
    type Error = InvalidLocation;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Location::parse(&value)
    }
}

impl From<Location> for String {
    fn from(location: Location) -> Self {
        location.0
    }
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Location({})", self.0)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(Location::parse("lyon").unwrap().as_str(), "LYON");
        assert_eq!(Location::parse("  Nice\t").unwrap().as_str(), "NICE");
        assert_eq!(
            Location::parse("saint-etienne").unwrap().as_str(),
            "SAINT-ETIENNE"
        );
    }

    #[test]
    fn rejects_blank() {
        assert!(Location::parse("").is_err());
        assert!(Location::parse("   ").is_err());
    }

    #[test]
    fn rejects_control_characters() {
        assert!(Location::parse("PA\u{0}RIS").is_err());
    }

    #[test]
    fn equal_after_normalization() {
        assert_eq!(
            Location::parse("Paris").unwrap(),
            Location::parse("PARIS").unwrap()
        );
    }

    #[test]
    fn display_and_debug() {
        let lyon = Location::parse("lyon").unwrap();
        assert_eq!(format!("{}", lyon), "LYON");
        assert_eq!(format!("{:?}", lyon), "Location(LYON)");
    }

    #[test]
    fn serde_normalizes_and_validates() {
        let lyon: Location = serde_json::from_str("\"lyon\"").unwrap();
        assert_eq!(lyon.as_str(), "LYON");
        assert_eq!(serde_json::to_string(&lyon).unwrap(), "\"LYON\"");

        assert!(serde_json::from_str::<Location>("\"  \"").is_err());
    }
}
