//! Buyer side of the marketplace.
//!
//! Each call to [`Buyer::look_for_journey`] is an independent session:
//! discover sellers, gather their catalogs, search, rank. The catalog and
//! the ranking mode belong to that call alone, so concurrent sessions never
//! share mutable state.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::{ComposedJourney, Location, Minute};
use crate::market::{AggregatorConfig, CatalogAggregator, SellerDirectory, TRAVEL_AGENCY};
use crate::planner::{
    CancelToken, JourneySearchEngine, SearchConfig, SearchError, SearchRequest, SortMode,
    rank_journeys,
};

/// Error from a buyer session.
#[derive(Debug, thiserror::Error)]
pub enum BuyerError {
    /// The search itself failed
    #[error(transparent)]
    Search(#[from] SearchError),

    /// The blocking search task could not complete
    #[error("search task failed: {0}")]
    Task(String),
}

/// What the traveller is looking for.
#[derive(Debug, Clone)]
pub struct JourneyQuery {
    pub origin: Location,
    pub destination: Location,

    /// Earliest acceptable departure.
    pub departure: Minute,

    /// Result ordering; the buyer's configured mode when `None`.
    pub preference: Option<SortMode>,
}

impl JourneyQuery {
    /// Create a query using the default ordering.
    pub fn new(origin: Location, destination: Location, departure: Minute) -> Self {
        Self {
            origin,
            destination,
            departure,
            preference: None,
        }
    }

    /// Set the result ordering.
    pub fn with_preference(mut self, mode: SortMode) -> Self {
        self.preference = Some(mode);
        self
    }
}

/// Ranked outcome of a session.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Best journeys first, at most `max_results` of them.
    pub journeys: Vec<ComposedJourney>,

    /// Sellers whose catalogs were searched.
    pub responders: Vec<String>,

    /// Ordering applied to `journeys`.
    pub sort_mode: SortMode,

    /// Number of path extensions tried during search.
    pub routes_explored: usize,
}

impl SearchOutcome {
    /// Whether any journey was found.
    pub fn found(&self) -> bool {
        !self.journeys.is_empty()
    }
}

/// A buyer agent.
pub struct Buyer {
    directory: Arc<dyn SellerDirectory>,
    aggregator: CatalogAggregator,
    config: Arc<SearchConfig>,
}

impl Buyer {
    /// Create a buyer that finds sellers through `directory`.
    pub fn new(
        directory: Arc<dyn SellerDirectory>,
        aggregator_config: AggregatorConfig,
        search_config: SearchConfig,
    ) -> Self {
        Self {
            directory,
            aggregator: CatalogAggregator::new(aggregator_config),
            config: Arc::new(search_config),
        }
    }

    /// Find and rank journeys for `query`.
    ///
    /// Sellers that do not answer within the aggregation window are simply
    /// left out; finding nothing is a successful, empty outcome. The search
    /// runs on a blocking thread and stops early once `cancel` fires.
    pub async fn look_for_journey(
        &self,
        query: JourneyQuery,
        cancel: CancelToken,
    ) -> Result<SearchOutcome, BuyerError> {
        let sellers = self.directory.search(TRAVEL_AGENCY);
        debug!(sellers = sellers.len(), "Discovered sellers");

        let aggregation = self.aggregator.aggregate(&sellers).await;
        let catalog = aggregation.catalog;

        let sort_mode = query.preference.unwrap_or(self.config.sort_mode);
        let request = SearchRequest::new(
            query.origin,
            query.destination,
            query.departure,
            self.config.connection_buffer_mins,
        );

        let config = Arc::clone(&self.config);
        let result = tokio::task::spawn_blocking(move || {
            JourneySearchEngine::new(&catalog, &config).search(&request, &cancel)
        })
        .await
        .map_err(|e| BuyerError::Task(e.to_string()))??;

        let mut journeys = rank_journeys(result.journeys, sort_mode);
        let total = journeys.len();
        journeys.truncate(self.config.max_results);

        info!(
            responders = aggregation.responders.len(),
            found = total,
            returned = journeys.len(),
            sort = %sort_mode,
            "Journey search complete"
        );

        Ok(SearchOutcome {
            journeys,
            responders: aggregation.responders,
            sort_mode,
            routes_explored: result.routes_explored,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::catalog::Catalog;
    use crate::domain::{Journey, Metrics};
    use crate::market::{LocalSeller, SellerAgent, StaticDirectory};

    fn loc(s: &str) -> Location {
        Location::parse(s).unwrap()
    }

    fn leg(from: &str, to: &str, dep: u32, dur: u32, cost: f64, comfort: u32) -> Journey {
        Journey::new(
            loc(from),
            loc(to),
            "train",
            Minute::new(dep),
            dur,
            Metrics::new(cost, cost / 5.0, comfort),
        )
        .unwrap()
    }

    fn register(directory: &StaticDirectory, seller: LocalSeller) {
        directory.register(TRAVEL_AGENCY, Arc::new(seller));
    }

    fn seller(id: &str, journeys: Vec<Journey>) -> LocalSeller {
        LocalSeller::new(SellerAgent::new(id, Catalog::from(journeys)))
    }

    fn buyer(directory: StaticDirectory, config: SearchConfig) -> Buyer {
        Buyer::new(
            Arc::new(directory),
            AggregatorConfig::new(100, "traveller"),
            config,
        )
    }

    fn query(from: &str, to: &str) -> JourneyQuery {
        JourneyQuery::new(loc(from), loc(to), Minute::new(0))
    }

    #[tokio::test(start_paused = true)]
    async fn combines_legs_from_different_sellers() {
        let directory = StaticDirectory::new();
        register(
            &directory,
            seller("north", vec![leg("PARIS", "LYON", 480, 120, 50.0, 3)])
                .with_latency(Duration::from_millis(10)),
        );
        register(
            &directory,
            seller("south", vec![leg("LYON", "NICE", 680, 150, 40.0, 4)])
                .with_latency(Duration::from_millis(50)),
        );
        register(
            &directory,
            seller("silent", vec![leg("PARIS", "NICE", 500, 60, 1.0, 5)]).unresponsive(),
        );

        let config = SearchConfig::default().with_connection_buffer_mins(60);
        let outcome = buyer(directory, config)
            .look_for_journey(query("PARIS", "NICE"), CancelToken::new())
            .await
            .unwrap();

        assert!(outcome.found());
        assert_eq!(outcome.responders, vec!["north", "south"]);
        assert_eq!(outcome.journeys.len(), 1);

        let journey = &outcome.journeys[0];
        assert_eq!(journey.total_cost(), 90.0);
        assert_eq!(journey.total_duration_mins(), 350);
        assert_eq!(journey.comfort(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_found_is_not_an_error() {
        let outcome = buyer(StaticDirectory::new(), SearchConfig::default())
            .look_for_journey(query("PARIS", "NICE"), CancelToken::new())
            .await
            .unwrap();

        assert!(!outcome.found());
        assert!(outcome.responders.is_empty());
    }

    fn two_options() -> StaticDirectory {
        let directory = StaticDirectory::new();
        register(
            &directory,
            seller(
                "agency",
                vec![
                    leg("PARIS", "NICE", 480, 400, 30.0, 1),
                    leg("PARIS", "NICE", 600, 300, 120.0, 5),
                ],
            ),
        );
        directory
    }

    #[tokio::test(start_paused = true)]
    async fn preference_overrides_default_order() {
        let buyer = buyer(two_options(), SearchConfig::default());

        let by_cost = buyer
            .look_for_journey(query("PARIS", "NICE"), CancelToken::new())
            .await
            .unwrap();
        assert_eq!(by_cost.sort_mode, SortMode::Cost);
        assert_eq!(by_cost.journeys[0].total_cost(), 30.0);

        let by_comfort = buyer
            .look_for_journey(
                query("PARIS", "NICE").with_preference(SortMode::Comfort),
                CancelToken::new(),
            )
            .await
            .unwrap();
        assert_eq!(by_comfort.journeys[0].comfort(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_sessions_are_isolated() {
        let buyer = buyer(two_options(), SearchConfig::default());

        let (cheap, fast) = tokio::join!(
            buyer.look_for_journey(
                query("PARIS", "NICE").with_preference(SortMode::Cost),
                CancelToken::new()
            ),
            buyer.look_for_journey(
                query("PARIS", "NICE").with_preference(SortMode::Duration),
                CancelToken::new()
            ),
        );

        assert_eq!(cheap.unwrap().journeys[0].total_cost(), 30.0);
        assert_eq!(fast.unwrap().journeys[0].total_duration_mins(), 300);
    }

    #[tokio::test(start_paused = true)]
    async fn results_are_truncated() {
        let config = SearchConfig {
            max_results: 1,
            ..SearchConfig::default()
        };
        let outcome = buyer(two_options(), config)
            .look_for_journey(query("PARIS", "NICE"), CancelToken::new())
            .await
            .unwrap();

        assert_eq!(outcome.journeys.len(), 1);
        assert_eq!(outcome.journeys[0].total_cost(), 30.0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_session_fails() {
        let cancel = CancelToken::new();
        cancel.cancel();

        let result = buyer(two_options(), SearchConfig::default())
            .look_for_journey(query("PARIS", "NICE"), cancel)
            .await;

        assert!(matches!(
            result,
            Err(BuyerError::Search(SearchError::Cancelled))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_limits_are_rejected() {
        let config = SearchConfig {
            max_legs: Some(0),
            ..SearchConfig::default()
        };
        let result = buyer(two_options(), config)
            .look_for_journey(query("PARIS", "NICE"), CancelToken::new())
            .await;

        assert!(matches!(
            result,
            Err(BuyerError::Search(SearchError::InvalidRequest(_)))
        ));
    }
}
