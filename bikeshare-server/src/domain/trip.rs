//! Search results: the chosen station and the route to it.

use serde::Serialize;

use super::{Coord, StationId};

/// The station picked by a nearest-station search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChosenStation {
    pub station_id: StationId,
    pub location: Coord,
    /// Geodesic distance from the search origin, in kilometres.
    pub distance_km: f64,
}

/// A driving route from the user to a station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    /// Polyline vertices, latitude first.
    pub waypoints: Vec<Coord>,
    /// Travel time in minutes, rounded to one decimal place.
    pub duration_mins: f64,
}

/// Everything a completed rent or return search produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trip {
    pub user: Coord,
    pub station: ChosenStation,
    pub route: Route,
}

/// Convert seconds to minutes, rounded to one decimal place.
pub fn seconds_to_minutes(secs: f64) -> f64 {
    (secs / 60.0 * 10.0).round() / 10.0
}
