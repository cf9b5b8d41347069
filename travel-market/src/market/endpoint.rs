//! Addressable seller endpoints.
//!
//! The aggregator only needs "send a request, maybe get a reply". Anything
//! satisfying [`SellerEndpoint`] can take part in a search: an in-process
//! [`LocalSeller`] or a remote seller reached over HTTP.

use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;

use super::agent::SellerAgent;
use super::error::MarketError;
use super::protocol::{CatalogReply, CatalogRequest};

/// A seller the buyer can ask for a catalog.
///
/// The returned future may never resolve; callers bound the wait.
pub trait SellerEndpoint: Send + Sync {
    /// Identifier of the seller behind this endpoint.
    fn id(&self) -> &str;

    /// Send a request and wait for the reply.
    fn ask_catalog(&self, request: CatalogRequest)
    -> BoxFuture<'_, Result<CatalogReply, MarketError>>;
}

/// In-process seller.
///
/// Answers through a [`SellerAgent`] directly, optionally after a simulated
/// network latency. An unresponsive seller never answers at all, which is
/// useful for exercising the aggregation window.
#[derive(Debug, Clone)]
pub struct LocalSeller {
    agent: SellerAgent,
    latency: Option<Duration>,
    responsive: bool,
}

impl LocalSeller {
    /// Wrap an agent as an endpoint that answers immediately.
    pub fn new(agent: SellerAgent) -> Self {
        Self {
            agent,
            latency: None,
            responsive: true,
        }
    }

    /// Delay every reply by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Never reply.
    pub fn unresponsive(mut self) -> Self {
        self.responsive = false;
        self
    }
}

impl SellerEndpoint for LocalSeller {
    fn id(&self) -> &str {
        self.agent.id()
    }

    fn ask_catalog(
        &self,
        request: CatalogRequest,
    ) -> BoxFuture<'_, Result<CatalogReply, MarketError>> {
        async move {
            if !self.responsive {
                futures::future::pending::<()>().await;
            }
            if let Some(latency) = self.latency {
                tokio::time::sleep(latency).await;
            }
            Ok(self.agent.handle_request(&request))
        }
        .boxed()
    }
}
