//! Journey planner using depth-first search.
//!
//! This module implements the core planning algorithm that answers:
//! "Given every journey on offer, how can I get from here to there?"
//!
//! The search enumerates every simple path through the catalog that keeps
//! to the connection buffer; ranking then orders the itineraries by the
//! traveller's preference.

mod cancel;
mod config;
mod rank;
mod search;

pub use cancel::{CancelGuard, CancelToken};
pub use config::SearchConfig;
pub use rank::{SortMode, UnknownSortMode, compare_balanced, rank_journeys};
pub use search::{JourneySearchEngine, SearchError, SearchRequest, SearchResult};
