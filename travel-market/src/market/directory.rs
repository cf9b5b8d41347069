//! Seller directory.
//!
//! Sellers register under a role label; buyers look up every endpoint
//! currently registered for a role.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use tracing::{debug, info};

use super::endpoint::SellerEndpoint;

/// Role label sellers of journeys register under.
pub const TRAVEL_AGENCY: &str = "travel agency";

/// Shared handle to a seller endpoint.
pub type Endpoint = Arc<dyn SellerEndpoint>;

/// Lookup of seller endpoints by role.
pub trait SellerDirectory: Send + Sync {
    /// Every endpoint currently registered for `role`.
    fn search(&self, role: &str) -> Vec<Endpoint>;
}

/// In-memory directory.
///
/// Clones share the same registrations. Results are ordered by seller id so
/// repeated lookups return the same sequence.
#[derive(Clone, Default)]
pub struct StaticDirectory {
    inner: Arc<RwLock<BTreeMap<String, BTreeMap<String, Endpoint>>>>,
}

impl StaticDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `endpoint` under `role`, replacing any endpoint with the same id.
    pub fn register(&self, role: &str, endpoint: Endpoint) {
        let id = endpoint.id().to_string();
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        guard.entry(role.to_string()).or_default().insert(id.clone(), endpoint);
        info!(role, seller = %id, "Registered seller");
    }

    /// Remove the seller `id` from every role. Returns true if it was known.
    pub fn deregister(&self, id: &str) -> bool {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        let mut removed = false;
        for sellers in guard.values_mut() {
            removed |= sellers.remove(id).is_some();
        }
        if removed {
            debug!(seller = id, "Deregistered seller");
        }
        removed
    }

    /// Number of endpoints registered for `role`.
    pub fn len(&self, role: &str) -> usize {
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        guard.get(role).map_or(0, BTreeMap::len)
    }
}

impl SellerDirectory for StaticDirectory {
    fn search(&self, role: &str) -> Vec<Endpoint> {
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        guard
            .get(role)
            .map(|sellers| sellers.values().cloned().collect())
            .unwrap_or_default()
    }
}
