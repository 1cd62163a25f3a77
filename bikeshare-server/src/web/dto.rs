//! Data transfer objects for web requests and responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cache::TableSnapshot;
use crate::domain::{AvailabilityLevel, Coord, Route, Station, SystemSummary, Trip};

/// Query for a rent search.
#[derive(Debug, Deserialize)]
pub struct BikeSearchRequest {
    /// Street address, e.g. "1200 S Halsted St". Missing is treated as blank.
    #[serde(default)]
    pub street: String,

    /// City (defaults to the configured city)
    pub city: Option<String>,

    /// Country (defaults to the configured country)
    pub country: Option<String>,

    /// Comma-separated bike modes: "mechanical", "ebike"
    pub modes: Option<String>,
}

/// Query for a return search.
#[derive(Debug, Deserialize)]
pub struct DockSearchRequest {
    #[serde(default)]
    pub street: String,
    pub city: Option<String>,
    pub country: Option<String>,
}

/// A station as shown to clients.
#[derive(Debug, Serialize)]
pub struct StationResult {
    pub station_id: String,
    pub name: Option<String>,
    pub lat: f64,
    pub lon: f64,
    pub capacity: Option<u32>,
    pub mechanical: u32,
    pub ebike: u32,
    pub total_bikes_available: u32,
    pub num_docks_available: u32,

    /// Coarse availability used for map colouring
    pub availability: AvailabilityLevel,

    pub is_installed: bool,
    pub is_renting: bool,
    pub is_returning: bool,

    /// Unix timestamp of the station's last status report
    pub last_reported: Option<i64>,
}

impl StationResult {
    pub fn from_station(station: &Station) -> Self {
        Self {
            station_id: station.station_id.to_string(),
            name: station.name.clone(),
            lat: station.lat(),
            lon: station.lon(),
            capacity: station.capacity,
            mechanical: station.mechanical,
            ebike: station.ebike,
            total_bikes_available: station.total_num_bikes_available(),
            num_docks_available: station.num_docks_available,
            availability: station.availability(),
            is_installed: station.is_installed,
            is_renting: station.is_renting,
            is_returning: station.is_returning,
            last_reported: station.last_reported,
        }
    }
}

/// Response for the station list.
#[derive(Debug, Serialize)]
pub struct StationsResponse {
    pub fetched_at: DateTime<Utc>,

    /// True when the feeds could not be refreshed and older data is served
    pub stale: bool,

    pub stations: Vec<StationResult>,
}

impl StationsResponse {
    pub fn from_snapshot(snapshot: &TableSnapshot) -> Self {
        Self {
            fetched_at: snapshot.fetched_at,
            stale: snapshot.stale,
            stations: snapshot
                .table
                .iter()
                .map(StationResult::from_station)
                .collect(),
        }
    }
}

/// Response for the system summary.
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub fetched_at: DateTime<Utc>,
    pub stale: bool,

    #[serde(flatten)]
    pub summary: SystemSummary,
}

/// The station a search chose.
#[derive(Debug, Serialize)]
pub struct ChosenStationResult {
    #[serde(flatten)]
    pub station: StationResult,

    /// Great-circle distance from the user
    pub distance_km: f64,
}

/// A route as `[lat, lon]` pairs.
#[derive(Debug, Serialize)]
pub struct RouteResult {
    pub waypoints: Vec<[f64; 2]>,
    pub duration_mins: f64,
}

impl From<&Route> for RouteResult {
    fn from(route: &Route) -> Self {
        Self {
            waypoints: route.waypoints.iter().map(|c| [c.lat(), c.lon()]).collect(),
            duration_mins: route.duration_mins,
        }
    }
}

/// Response for either search.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SearchResponse {
    Found {
        user: Coord,
        station: ChosenStationResult,
        route: RouteResult,
        /// Whether the station data behind this answer is stale
        stale: bool,
    },
    AddressNotFound,
}

impl SearchResponse {
    /// Build a found response, looking the chosen station up in `snapshot`.
    pub fn found(trip: &Trip, snapshot: &TableSnapshot) -> Option<Self> {
        let station = snapshot.table.get(&trip.station.station_id)?;
        Some(SearchResponse::Found {
            user: trip.user,
            station: ChosenStationResult {
                station: StationResult::from_station(station),
                distance_km: trip.station.distance_km,
            },
            route: RouteResult::from(&trip.route),
            stale: snapshot.stale,
        })
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
