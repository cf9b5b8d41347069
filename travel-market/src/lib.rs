//! Decentralized travel marketplace.
//!
//! Independent sellers each offer a catalog of atomic journeys. A buyer
//! gathers the catalogs of every seller that answers within a short window,
//! searches the merged catalog for multi-hop itineraries that keep to a
//! connection buffer, and ranks them by the traveller's preference.

pub mod catalog;
pub mod domain;
pub mod market;
pub mod planner;
pub mod session;
pub mod web;
