//! OSRM route service DTOs and their conversion into a [`Route`].

use serde::Deserialize;

use crate::domain::{Coord, Route, seconds_to_minutes};

use super::error::RouteError;

/// Response from `/route/v1/{profile}/{coordinates}`.
#[derive(Debug, Clone, Deserialize)]
pub struct OsrmRouteResponse {
    /// `"Ok"` on success, otherwise an OSRM error code such as `"NoRoute"`.
    pub code: String,

    #[serde(default)]
    pub routes: Vec<OsrmRoute>,

    pub message: Option<String>,
}

/// One route alternative.
#[derive(Debug, Clone, Deserialize)]
pub struct OsrmRoute {
    /// Present when the request asked for `geometries=geojson`.
    pub geometry: OsrmGeometry,

    /// Travel time in seconds.
    pub duration: f64,

    /// Travel distance in metres.
    pub distance: Option<f64>,
}

/// GeoJSON LineString geometry. Positions are `[lon, lat]`.
#[derive(Debug, Clone, Deserialize)]
pub struct OsrmGeometry {
    pub coordinates: Vec<Vec<f64>>,
}

impl OsrmRouteResponse {
    /// Convert the first route; alternates are ignored.
    pub fn into_route(self) -> Result<Route, RouteError> {
        let first = match self.routes.into_iter().next() {
            Some(route) => route,
            None => return Err(RouteError::NoRoute { code: self.code }),
        };

        let waypoints = first
            .geometry
            .coordinates
            .iter()
            .map(|position| match position.as_slice() {
                [lon, lat, ..] => Coord::from_lon_lat(*lon, *lat).map_err(|e| RouteError::Json {
                    message: e.to_string(),
                }),
                _ => Err(RouteError::Json {
                    message: format!("position needs two numbers, got {position:?}"),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Route {
            waypoints,
            duration_mins: seconds_to_minutes(first.duration),
        })
    }
}
