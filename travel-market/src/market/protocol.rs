//! Catalog request/response messages.
//!
//! A buyer asks every seller for its catalog with a request tagged
//! [`CATALOG_ASK`]; a seller answers `agree` with its catalog as payload.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;

use super::error::MarketError;

/// Conversation identifier of catalog requests.
pub const CATALOG_ASK: &str = "CATALOG_ASK";

/// Kind of a reply, named after the agent communication acts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Performative {
    /// The seller accepts and attaches its catalog
    Agree,
    /// The seller declines to answer
    Refuse,
    /// The seller did not recognise the request
    NotUnderstood,
}

impl fmt::Display for Performative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Performative::Agree => "agree",
            Performative::Refuse => "refuse",
            Performative::NotUnderstood => "not-understood",
        };
        f.write_str(s)
    }
}

/// Request sent from buyer to seller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRequest {
    /// Conversation tag, [`CATALOG_ASK`] for catalog requests
    pub conversation_id: String,
    /// Name of the asking buyer (for seller-side logs)
    pub buyer: String,
}

impl CatalogRequest {
    /// Create a catalog request on behalf of `buyer`.
    pub fn new(buyer: impl Into<String>) -> Self {
        Self {
            conversation_id: CATALOG_ASK.to_string(),
            buyer: buyer.into(),
        }
    }

    /// Returns true if this is a catalog request.
    pub fn is_catalog_ask(&self) -> bool {
        self.conversation_id == CATALOG_ASK
    }
}

/// Reply sent from seller to buyer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogReply {
    /// Echo of the request's conversation tag
    pub conversation_id: String,
    pub performative: Performative,
    /// Identifier of the answering seller
    pub seller: String,
    /// Offered journeys; empty unless `performative` is `agree`
    #[serde(default)]
    pub catalog: Catalog,
}

impl CatalogReply {
    /// An agreement carrying `catalog`.
    pub fn agree(request: &CatalogRequest, seller: impl Into<String>, catalog: Catalog) -> Self {
        Self {
            conversation_id: request.conversation_id.clone(),
            performative: Performative::Agree,
            seller: seller.into(),
            catalog,
        }
    }

    /// A reply without payload.
    pub fn without_catalog(
        request: &CatalogRequest,
        seller: impl Into<String>,
        performative: Performative,
    ) -> Self {
        Self {
            conversation_id: request.conversation_id.clone(),
            performative,
            seller: seller.into(),
            catalog: Catalog::new(),
        }
    }

    /// Extract the catalog if this is an agreement to a catalog request.
    pub fn into_catalog(self) -> Result<Catalog, MarketError> {
        if self.conversation_id != CATALOG_ASK {
            return Err(MarketError::WrongConversation(self.conversation_id));
        }
        match self.performative {
            Performative::Agree => Ok(self.catalog),
            performative => Err(MarketError::NotAgreed {
                seller: self.seller,
                performative,
            }),
        }
    }
}
