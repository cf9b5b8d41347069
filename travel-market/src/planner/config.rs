//! Search configuration for the journey planner.

use super::rank::{SortMode, UnknownSortMode};

/// Configuration parameters for journey search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Minimum time between arriving on one leg and leaving on the next
    /// (minutes).
    pub connection_buffer_mins: u32,

    /// Maximum number of legs per itinerary. `None` means unlimited: path
    /// length is then only bounded by the number of distinct locations.
    pub max_legs: Option<usize>,

    /// Maximum number of journeys to return after ranking.
    pub max_results: usize,

    /// How results are ordered when the request does not say.
    pub sort_mode: SortMode,

    /// Number of path expansions between two cancellation checks.
    pub cancel_check_interval: usize,
}

impl SearchConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        connection_buffer_mins: u32,
        max_legs: Option<usize>,
        max_results: usize,
        sort_mode: SortMode,
    ) -> Self {
        Self {
            connection_buffer_mins,
            max_legs,
            max_results,
            sort_mode,
            ..Self::default()
        }
    }

    /// Set the connection buffer.
    pub fn with_connection_buffer_mins(mut self, mins: u32) -> Self {
        self.connection_buffer_mins = mins;
        self
    }

    /// Set the default sort mode.
    pub fn with_sort_mode(mut self, mode: SortMode) -> Self {
        self.sort_mode = mode;
        self
    }

    /// Set the default sort mode from its configuration name.
    ///
    /// Names are parsed as by [`SortMode`]'s `FromStr` implementation.
    pub fn with_sort_mode_name(self, name: &str) -> Result<Self, UnknownSortMode> {
        Ok(self.with_sort_mode(name.parse()?))
    }

    /// Whether a path of `legs` legs may still be extended.
    pub fn allows_more_legs(&self, legs: usize) -> bool {
        self.max_legs.is_none_or(|max| legs < max)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            connection_buffer_mins: 120, // 2 hours
            max_legs: None,
            max_results: 10,
            sort_mode: SortMode::Cost,
            cancel_check_interval: 256,
        }
    }
}
