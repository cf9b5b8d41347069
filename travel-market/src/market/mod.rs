//! Catalog marketplace.
//!
//! Sellers own catalogs of atomic journeys and answer catalog requests;
//! the buyer discovers sellers through a directory and gathers their
//! catalogs within a bounded window before searching.

mod agent;
mod aggregator;
mod client;
mod directory;
mod endpoint;
mod error;
mod protocol;

pub use agent::SellerAgent;
pub use aggregator::{Aggregation, AggregatorConfig, CatalogAggregator};
pub use client::{HttpSeller, HttpSellerConfig};
pub use directory::{Endpoint, SellerDirectory, StaticDirectory, TRAVEL_AGENCY};
pub use endpoint::{LocalSeller, SellerEndpoint};
pub use error::MarketError;
pub use protocol::{CATALOG_ASK, CatalogReply, CatalogRequest, Performative};
