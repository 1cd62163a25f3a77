//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::cache::TableSnapshot;
use crate::config::AddressDefaults;
use crate::domain::{BikeMode, InvalidBikeMode, SystemSummary};
use crate::finder::{FinderError, SearchOutcome, Stage, bounded};
use crate::geocode::AddressQuery;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/stations", get(list_stations))
        .route("/summary", get(summary))
        .route("/search/bike", get(search_bike))
        .route("/search/dock", get(search_dock))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Every station with its current availability.
async fn list_stations(State(state): State<AppState>) -> Result<Json<StationsResponse>, AppError> {
    let snapshot = current_table(&state).await?;
    Ok(Json(StationsResponse::from_snapshot(&snapshot)))
}

/// System-wide totals.
async fn summary(State(state): State<AppState>) -> Result<Json<SummaryResponse>, AppError> {
    let snapshot = current_table(&state).await?;
    Ok(Json(SummaryResponse {
        fetched_at: snapshot.fetched_at,
        stale: snapshot.stale,
        summary: SystemSummary::from_table(&snapshot.table),
    }))
}

/// Find the nearest station to rent a bike from.
async fn search_bike(
    State(state): State<AppState>,
    Query(req): Query<BikeSearchRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    let address = address_from(&req.street, req.city, req.country, &state.defaults)?;
    let modes = req
        .modes
        .as_deref()
        .map(BikeMode::parse_list)
        .transpose()
        .map_err(|e: InvalidBikeMode| AppError::BadRequest {
            message: e.to_string(),
        })?
        .unwrap_or_default();

    let snapshot = current_table(&state).await?;
    let outcome = state
        .finder
        .find_bike(&snapshot.table, &address, &modes)
        .await?;

    respond(outcome, &snapshot)
}

/// Find the nearest station with a free dock.
async fn search_dock(
    State(state): State<AppState>,
    Query(req): Query<DockSearchRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    let address = address_from(&req.street, req.city, req.country, &state.defaults)?;

    let snapshot = current_table(&state).await?;
    let outcome = state.finder.find_dock(&snapshot.table, &address).await?;

    respond(outcome, &snapshot)
}

/// Load the station table under the same per-call bound as a search.
async fn current_table(state: &AppState) -> Result<TableSnapshot, AppError> {
    let limit = state.finder.config().call_timeout;
    let snapshot = bounded(limit, Stage::Feed, state.feed.get())
        .await?
        .map_err(FinderError::from)?;
    Ok(snapshot)
}

/// Fill in defaults and reject a missing street.
fn address_from(
    street: &str,
    city: Option<String>,
    country: Option<String>,
    defaults: &AddressDefaults,
) -> Result<AddressQuery, AppError> {
    let or_default = |value: Option<String>, default: &str| {
        value
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| default.to_string())
    };

    let address = AddressQuery::new(
        street,
        or_default(city, &defaults.city),
        or_default(country, &defaults.country),
    );
    if address.is_blank() {
        return Err(AppError::BadRequest {
            message: "please input your location".to_string(),
        });
    }
    Ok(address)
}

fn respond(outcome: SearchOutcome, snapshot: &TableSnapshot) -> Result<Json<SearchResponse>, AppError> {
    match outcome {
        SearchOutcome::AddressNotFound => Ok(Json(SearchResponse::AddressNotFound)),
        SearchOutcome::Found(trip) => SearchResponse::found(&trip, snapshot)
            .map(Json)
            .ok_or_else(|| AppError::Internal {
                message: format!("station {} missing from snapshot", trip.station.station_id),
            }),
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    BadGateway { message: String },
    ServiceUnavailable { message: String },
    GatewayTimeout { message: String },
    Internal { message: String },
}

impl From<FinderError> for AppError {
    fn from(e: FinderError) -> Self {
        let message = e.to_string();
        match e {
            FinderError::NoStationAvailable => AppError::NotFound { message },
            FinderError::FeedUnavailable(_) => AppError::ServiceUnavailable { message },
            FinderError::GeocodeUnavailable(_) | FinderError::RouteUnavailable(_) => {
                AppError::BadGateway { message }
            }
            FinderError::Timeout { .. } => AppError::GatewayTimeout { message },
        }
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::BadGateway { .. } => StatusCode::BAD_GATEWAY,
            AppError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::GatewayTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(self) -> String {
        match self {
            AppError::BadRequest { message }
            | AppError::NotFound { message }
            | AppError::BadGateway { message }
            | AppError::ServiceUnavailable { message }
            | AppError::GatewayTimeout { message }
            | AppError::Internal { message } => message,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
