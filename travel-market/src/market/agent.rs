//! Seller agent: owns a catalog and answers catalog requests.

use std::sync::Arc;

use tracing::{debug, info};

use crate::catalog::Catalog;

use super::protocol::{CatalogReply, CatalogRequest, Performative};

/// A seller of journeys.
///
/// The catalog is fixed once the agent is built, so answering never mutates
/// seller state and the agent can be shared freely between request handlers.
#[derive(Debug, Clone)]
pub struct SellerAgent {
    id: String,
    catalog: Arc<Catalog>,
}

impl SellerAgent {
    /// Create a seller offering `catalog`.
    pub fn new(id: impl Into<String>, catalog: Catalog) -> Self {
        Self {
            id: id.into(),
            catalog: Arc::new(catalog),
        }
    }

    /// Returns the seller identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the offered catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Answer a request.
    ///
    /// Catalog requests get an `agree` with a copy of the catalog; anything
    /// else is `not-understood`.
    pub fn handle_request(&self, request: &CatalogRequest) -> CatalogReply {
        if !request.is_catalog_ask() {
            debug!(
                seller = %self.id,
                conversation = %request.conversation_id,
                "Ignoring unknown conversation"
            );
            return CatalogReply::without_catalog(request, &self.id, Performative::NotUnderstood);
        }

        info!(
            seller = %self.id,
            buyer = %request.buyer,
            journeys = self.catalog.len(),
            "Sending catalog"
        );
        CatalogReply::agree(request, &self.id, (*self.catalog).clone())
    }
}
