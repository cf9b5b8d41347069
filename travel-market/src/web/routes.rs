//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tracing::{error, warn};

use crate::domain::Location;
use crate::market::CatalogRequest;
use crate::planner::{CancelToken, SearchError, SortMode};
use crate::session::{BuyerError, JourneyQuery};

use super::dto::*;
use super::state::{BuyerState, SellerState};

/// Create the router of a buyer service.
pub fn buyer_router(state: BuyerState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/journey/plan", post(plan_journey))
        .with_state(state)
}

/// Create the router of a seller service.
pub fn seller_router(state: SellerState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/catalog", post(catalog))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Answer a catalog request.
async fn catalog(State(state): State<SellerState>, body: Bytes) -> Result<Response, AppError> {
    let request: CatalogRequest = parse_json(&body)?;
    Ok(Json(state.agent.handle_request(&request)).into_response())
}

/// Plan a journey across every known seller.
async fn plan_journey(State(state): State<BuyerState>, body: Bytes) -> Result<Response, AppError> {
    let req: PlanJourneyRequest = parse_json(&body)?;

    let origin = Location::parse(&req.origin).map_err(|e| AppError::BadRequest {
        message: format!("Invalid origin: {e}"),
    })?;
    let destination = Location::parse(&req.destination).map_err(|e| AppError::BadRequest {
        message: format!("Invalid destination: {e}"),
    })?;
    let departure = req
        .departure
        .as_ref()
        .map(DepartureTime::to_minute)
        .transpose()
        .map_err(|e| AppError::BadRequest {
            message: format!("Invalid departure: {e}"),
        })?
        .unwrap_or_default();
    let preference = req
        .preference
        .as_deref()
        .map(str::parse::<SortMode>)
        .transpose()
        .map_err(|e| AppError::BadRequest {
            message: e.to_string(),
        })?;

    let query = JourneyQuery {
        origin,
        destination,
        departure,
        preference,
    };

    // Dropping this handler (client gone) stops the search
    let cancel = CancelToken::new();
    let guard = cancel.drop_guard();
    let outcome = state.buyer.look_for_journey(query, cancel).await?;
    guard.disarm();

    Ok(Json(PlanJourneyResponse::from_outcome(&outcome)).into_response())
}

/// Decode a JSON body, logging it on failure.
fn parse_json<T: serde::de::DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, body = %String::from_utf8_lossy(body), "Invalid JSON body");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Unavailable { message: String },
    Internal { message: String },
}

impl From<SearchError> for AppError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::InvalidRequest(msg) => AppError::BadRequest { message: msg },
            SearchError::Cancelled => AppError::Unavailable {
                message: e.to_string(),
            },
        }
    }
}

impl From<BuyerError> for AppError {
    fn from(e: BuyerError) -> Self {
        match e {
            BuyerError::Search(e) => e.into(),
            BuyerError::Task(_) => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Unavailable { message } => (StatusCode::SERVICE_UNAVAILABLE, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "Request failed");
        } else {
            warn!(%status, %message, "Request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
