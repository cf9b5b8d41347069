//! Application state for the web layer.

use std::sync::Arc;

use crate::market::SellerAgent;
use crate::session::Buyer;

/// Shared state of the buyer service.
#[derive(Clone)]
pub struct BuyerState {
    /// Buyer running journey searches
    pub buyer: Arc<Buyer>,
}

impl BuyerState {
    /// Create a new buyer state.
    pub fn new(buyer: Buyer) -> Self {
        Self {
            buyer: Arc::new(buyer),
        }
    }
}

/// Shared state of a seller service.
#[derive(Clone)]
pub struct SellerState {
    /// Agent answering catalog requests
    pub agent: Arc<SellerAgent>,
}

impl SellerState {
    /// Create a new seller state.
    pub fn new(agent: SellerAgent) -> Self {
        Self {
            agent: Arc::new(agent),
        }
    }
}
