//! Web layer for the travel marketplace.
//!
//! A seller process exposes its catalog over HTTP; a buyer process exposes
//! journey planning on top of every seller it knows.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, buyer_router, seller_router};
pub use state::{BuyerState, SellerState};
