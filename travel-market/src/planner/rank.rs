//! Journey ranking for search results.
//!
//! Orders itineraries by a single criterion or by a balanced trade-off
//! between price and comfort.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::domain::ComposedJourney;

/// How to order search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Cheapest first
    #[default]
    Cost,
    /// Lowest emissions first
    Co2,
    /// Shortest door-to-door time first
    Duration,
    /// Most comfortable first
    Comfort,
    /// Trade-off between normalised cost and comfort
    Balanced,
}

/// Error returned when a sort mode name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort mode {0:?} (expected cost, co2, duration, comfort or balanced)")]
pub struct UnknownSortMode(pub String);

impl FromStr for SortMode {
    type Err = UnknownSortMode;

    /// Parse a mode name, ignoring case. `-` and the empty string select
    /// [`SortMode::Cost`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "-" | "cost" => Ok(SortMode::Cost),
            "co2" => Ok(SortMode::Co2),
            "duration" => Ok(SortMode::Duration),
            "comfort" => Ok(SortMode::Comfort),
            "balanced" => Ok(SortMode::Balanced),
            _ => Err(UnknownSortMode(s.to_string())),
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SortMode::Cost => "cost",
            SortMode::Co2 => "co2",
            SortMode::Duration => "duration",
            SortMode::Comfort => "comfort",
            SortMode::Balanced => "balanced",
        };
        f.write_str(s)
    }
}

/// Rank journeys by preference.
///
/// Single-criterion modes sort ascending by their key (comfort is negated so
/// the most comfortable comes first). [`SortMode::Balanced`] scores each
/// journey as `cost / max_cost - comfort / max_comfort`, the maxima taken
/// over all candidates, and sorts ascending by that score. A journey that is
/// no dearer and no less comfortable than another, and strictly better on
/// one of the two, always ranks ahead of it.
///
/// Sorting is stable: journeys that compare equal keep their input order.
pub fn rank_journeys(mut journeys: Vec<ComposedJourney>, mode: SortMode) -> Vec<ComposedJourney> {
    match mode {
        SortMode::Balanced => {
            let scale = BalancedScale::over(&journeys);
            journeys.sort_by(|a, b| scale.score(a).total_cmp(&scale.score(b)));
        }
        _ => journeys.sort_by(|a, b| sort_key(a, mode).total_cmp(&sort_key(b, mode))),
    }
    journeys
}

/// Ascending sort key of a journey under a single-criterion mode.
fn sort_key(journey: &ComposedJourney, mode: SortMode) -> f64 {
    match mode {
        SortMode::Cost | SortMode::Balanced => journey.total_cost(),
        SortMode::Co2 => journey.total_co2(),
        SortMode::Duration => f64::from(journey.total_duration_mins()),
        SortMode::Comfort => -f64::from(journey.comfort()),
    }
}

/// Compare two journeys by normalised cost and comfort differences.
///
/// The cost delta is `(a - b) / max(a, b)` and the comfort delta
/// `(b - a) / max(a, b)`; each is zero when its max is zero. `a` sorts first
/// when the sum is negative.
///
/// This relation is antisymmetric but not transitive, so it must not be
/// handed to `sort_by`. [`rank_journeys`] normalises against the whole
/// candidate set instead.
///
/// ```
/// use std::cmp::Ordering;
/// use travel_market::domain::{ComposedJourney, Journey, Location, Metrics, Minute};
/// use travel_market::planner::compare_balanced;
///
/// let trip = |cost, comfort| {
///     let leg = Journey::new(
///         Location::parse("PARIS").unwrap(),
///         Location::parse("LYON").unwrap(),
///         "train",
///         Minute::new(480),
///         120,
///         Metrics::new(cost, 0.0, comfort),
///     )
///     .unwrap();
///     ComposedJourney::new(vec![leg], 0).unwrap()
/// };
///
/// // Cheaper and more comfortable wins
/// assert_eq!(compare_balanced(&trip(50.0, 4), &trip(100.0, 2)), Ordering::Less);
/// // Half the price for half the comfort is a wash
/// assert_eq!(compare_balanced(&trip(50.0, 1), &trip(100.0, 2)), Ordering::Equal);
/// ```
pub fn compare_balanced(a: &ComposedJourney, b: &ComposedJourney) -> Ordering {
    let cost = normalized_delta(a.total_cost(), b.total_cost());
    let comfort = normalized_delta(f64::from(b.comfort()), f64::from(a.comfort()));
    let score = cost + comfort;

    if score < 0.0 {
        Ordering::Less
    } else if score > 0.0 {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

fn normalized_delta(x: f64, y: f64) -> f64 {
    let max = x.max(y);
    if max == 0.0 { 0.0 } else { (x - y) / max }
}

/// Cost and comfort maxima of a candidate set.
struct BalancedScale {
    max_cost: f64,
    max_comfort: f64,
}

impl BalancedScale {
    fn over(journeys: &[ComposedJourney]) -> Self {
        journeys.iter().fold(
            Self {
                max_cost: 0.0,
                max_comfort: 0.0,
            },
            |scale, j| Self {
                max_cost: scale.max_cost.max(j.total_cost()),
                max_comfort: scale.max_comfort.max(f64::from(j.comfort())),
            },
        )
    }

    /// Lower is better. A zero maximum contributes nothing.
    fn score(&self, journey: &ComposedJourney) -> f64 {
        ratio(journey.total_cost(), self.max_cost)
            - ratio(f64::from(journey.comfort()), self.max_comfort)
    }
}

fn ratio(value: f64, max: f64) -> f64 {
    if max == 0.0 { 0.0 } else { value / max }
}
