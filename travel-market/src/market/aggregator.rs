//! Bounded-time catalog aggregation.
//!
//! The buyer asks every known seller for its catalog at once and listens
//! for a fixed window. Whatever arrived by the deadline is merged; sellers
//! that stayed silent or failed are left out of this search.

use std::time::Duration;

use futures::StreamExt;
use futures::stream::FuturesUnordered;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::catalog::Catalog;

use super::directory::Endpoint;
use super::protocol::CatalogRequest;

/// Configuration for catalog aggregation.
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// How long to wait for replies (milliseconds).
    pub window_ms: u64,

    /// Name the buyer signs its requests with.
    pub buyer: String,
}

impl AggregatorConfig {
    /// Create a configuration with the given window and buyer name.
    pub fn new(window_ms: u64, buyer: impl Into<String>) -> Self {
        Self {
            window_ms,
            buyer: buyer.into(),
        }
    }

    /// Returns the wait window as a Duration.
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            window_ms: 100,
            buyer: "traveller".to_string(),
        }
    }
}

/// Result of one aggregation round.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    /// Merged catalogs of every responder, in reply order.
    pub catalog: Catalog,

    /// Ids of the sellers that answered in time, in reply order.
    pub responders: Vec<String>,

    /// Ids of the sellers that were asked but left out.
    pub missing: Vec<String>,
}

/// Collects catalogs from sellers within a fixed window.
#[derive(Debug, Clone, Default)]
pub struct CatalogAggregator {
    config: AggregatorConfig,
}

impl CatalogAggregator {
    /// Create an aggregator.
    pub fn new(config: AggregatorConfig) -> Self {
        Self { config }
    }

    /// Ask every seller for its catalog and merge the replies received in time.
    ///
    /// Returns as soon as every seller answered, or when the window elapses.
    /// Replies still in flight at the deadline are dropped. This never fails:
    /// with no usable reply the catalog is simply empty.
    pub async fn aggregate(&self, sellers: &[Endpoint]) -> Aggregation {
        let deadline = Instant::now() + self.config.window();
        let request = CatalogRequest::new(self.config.buyer.clone());

        let mut pending: FuturesUnordered<_> = sellers
            .iter()
            .map(|seller| {
                let request = request.clone();
                async move { (seller.id(), seller.ask_catalog(request).await) }
            })
            .collect();

        let mut aggregation = Aggregation::default();

        loop {
            match tokio::time::timeout_at(deadline, pending.next()).await {
                Ok(Some((seller, Ok(reply)))) => match reply.into_catalog() {
                    Ok(catalog) => {
                        debug!(seller, journeys = catalog.len(), "Catalog received");
                        aggregation.catalog.merge(catalog);
                        aggregation.responders.push(seller.to_string());
                    }
                    Err(e) => {
                        debug!(seller, error = %e, "Ignoring unusable reply");
                    }
                },
                Ok(Some((seller, Err(e)))) => {
                    debug!(seller, error = %e, "Seller request failed");
                }
                Ok(None) => break,
                Err(_) => {
                    debug!(
                        waiting = pending.len(),
                        window_ms = self.config.window_ms,
                        "Aggregation window elapsed"
                    );
                    break;
                }
            }
        }

        aggregation.missing = sellers
            .iter()
            .map(|s| s.id())
            .filter(|id| !aggregation.responders.iter().any(|r| r == id))
            .map(str::to_string)
            .collect();

        info!(
            asked = sellers.len(),
            responders = aggregation.responders.len(),
            journeys = aggregation.catalog.len(),
            "Catalogs aggregated"
        );

        aggregation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::domain::{Journey, Location, Metrics, Minute};
    use crate::market::{
        CatalogReply, LocalSeller, MarketError, Performative, SellerAgent, SellerEndpoint,
    };
    use futures::FutureExt;
    use futures::future::BoxFuture;

    fn catalog(from: &str, to: &str) -> Catalog {
        vec![
            Journey::new(
                Location::parse(from).unwrap(),
                Location::parse(to).unwrap(),
                "train",
                Minute::new(480),
                60,
                Metrics::new(10.0, 1.0, 2),
            )
            .unwrap(),
        ]
        .into()
    }

    fn seller(id: &str, from: &str, to: &str) -> LocalSeller {
        LocalSeller::new(SellerAgent::new(id, catalog(from, to)))
    }

    /// Endpoint that always answers with a fixed performative.
    struct Refusing;

    impl SellerEndpoint for Refusing {
        fn id(&self) -> &str {
            "refusing"
        }

        fn ask_catalog(
            &self,
            request: CatalogRequest,
        ) -> BoxFuture<'_, Result<CatalogReply, MarketError>> {
            async move {
                Ok(CatalogReply::without_catalog(
                    &request,
                    "refusing",
                    Performative::Refuse,
                ))
            }
            .boxed()
        }
    }

    /// Endpoint whose transport always fails.
    struct Broken;

    impl SellerEndpoint for Broken {
        fn id(&self) -> &str {
            "broken"
        }

        fn ask_catalog(
            &self,
            _request: CatalogRequest,
        ) -> BoxFuture<'_, Result<CatalogReply, MarketError>> {
            async move {
                Err(MarketError::Status {
                    status: 500,
                    message: "boom".into(),
                })
            }
            .boxed()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn silent_seller_is_excluded() {
        let sellers: Vec<Endpoint> = vec![
            Arc::new(seller("fast", "PARIS", "LYON").with_latency(Duration::from_millis(10))),
            Arc::new(seller("slow", "LYON", "NICE").with_latency(Duration::from_millis(50))),
            Arc::new(seller("mute", "NICE", "ROME").unresponsive()),
        ];

        let aggregator = CatalogAggregator::new(AggregatorConfig::new(100, "traveller"));
        let start = Instant::now();
        let result = aggregator.aggregate(&sellers).await;

        assert_eq!(result.responders, vec!["fast", "slow"]);
        assert_eq!(result.missing, vec!["mute"]);
        assert_eq!(result.catalog.len(), 2);
        assert!(
            result
                .catalog
                .journeys()
                .iter()
                .all(|j| j.origin().as_str() != "NICE")
        );
        // Waited for the full window because one seller never answered
        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn late_reply_is_ignored() {
        let sellers: Vec<Endpoint> = vec![
            Arc::new(seller("on-time", "PARIS", "LYON").with_latency(Duration::from_millis(20))),
            Arc::new(seller("late", "LYON", "NICE").with_latency(Duration::from_millis(150))),
        ];

        let aggregator = CatalogAggregator::new(AggregatorConfig::new(100, "traveller"));
        let result = aggregator.aggregate(&sellers).await;

        assert_eq!(result.responders, vec!["on-time"]);
        assert_eq!(result.missing, vec!["late"]);
        assert_eq!(result.catalog.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn returns_early_when_everyone_answered() {
        let sellers: Vec<Endpoint> = vec![
            Arc::new(seller("a", "PARIS", "LYON").with_latency(Duration::from_millis(5))),
            Arc::new(seller("b", "LYON", "NICE").with_latency(Duration::from_millis(15))),
        ];

        let aggregator = CatalogAggregator::new(AggregatorConfig::new(100, "traveller"));
        let start = Instant::now();
        let result = aggregator.aggregate(&sellers).await;

        assert_eq!(result.responders.len(), 2);
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn no_sellers_yields_empty_catalog() {
        let aggregator = CatalogAggregator::default();
        let result = aggregator.aggregate(&[]).await;

        assert!(result.catalog.is_empty());
        assert!(result.responders.is_empty());
        assert!(result.missing.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn no_replies_yields_empty_catalog() {
        let sellers: Vec<Endpoint> = vec![
            Arc::new(seller("mute-1", "PARIS", "LYON").unresponsive()),
            Arc::new(seller("mute-2", "LYON", "NICE").unresponsive()),
        ];

        let result = CatalogAggregator::default().aggregate(&sellers).await;

        assert!(result.catalog.is_empty());
        assert!(result.responders.is_empty());
        assert_eq!(result.missing.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn refusals_and_failures_are_excluded() {
        let sellers: Vec<Endpoint> = vec![
            Arc::new(Refusing),
            Arc::new(Broken),
            Arc::new(seller("good", "PARIS", "LYON")),
        ];

        let result = CatalogAggregator::default().aggregate(&sellers).await;

        assert_eq!(result.responders, vec!["good"]);
        assert_eq!(result.catalog.len(), 1);
        assert_eq!(result.missing.len(), 2);
    }

    #[test]
    fn default_config() {
        let config = AggregatorConfig::default();
        assert_eq!(config.window_ms, 100);
        assert_eq!(config.window(), Duration::from_millis(100));
        assert_eq!(config.buyer, "traveller");
    }
}
