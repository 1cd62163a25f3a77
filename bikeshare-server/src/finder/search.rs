//! Rent and return searches.
//!
//! One search is a strictly sequential chain: geocode the address, pick the
//! nearest qualifying station from a table snapshot, then route to it.
//! Each external call runs under its own timeout.

use std::future::Future;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, info};

use crate::domain::{BikeMode, Coord, Route, StationFilter, StationTable, Trip};
use crate::geocode::{AddressQuery, Geocoder};
use crate::ranker::find_nearest;
use crate::routing::RouteProvider;

use super::error::{FinderError, Stage};

/// Configuration for searches.
#[derive(Debug, Clone)]
pub struct FinderConfig {
    /// Upper bound on any single external call.
    pub call_timeout: Duration,
}

impl FinderConfig {
    pub fn new(call_timeout: Duration) -> Self {
        Self { call_timeout }
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(15),
        }
    }
}

/// A search from an already-resolved position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UserQuery {
    pub user: Coord,
    pub filter: StationFilter,
}

impl UserQuery {
    /// Renting, with the selected bike modes (none selected means any).
    pub fn rent(user: Coord, modes: &[BikeMode]) -> Self {
        Self {
            user,
            filter: StationFilter::from_modes(modes),
        }
    }

    /// Returning a bike.
    pub fn dock(user: Coord) -> Self {
        Self {
            user,
            filter: StationFilter::Dock,
        }
    }
}

/// How a search ended, short of an error.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// The geocoder had no match; the user should fix the address.
    AddressNotFound,
    Found(Trip),
}

/// Runs searches against a geocoder and a router.
pub struct Finder<G, R> {
    pub(super) geocoder: G,
    pub(super) router: R,
    config: FinderConfig,
}

impl<G: Geocoder, R: RouteProvider> Finder<G, R> {
    /// Create a new finder.
    pub fn new(geocoder: G, router: R, config: FinderConfig) -> Self {
        Self {
            geocoder,
            router,
            config,
        }
    }

    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Find the nearest station with a bike of one of `modes`.
    pub async fn find_bike(
        &self,
        table: &StationTable,
        address: &AddressQuery,
        modes: &[BikeMode],
    ) -> Result<SearchOutcome, FinderError> {
        self.search(table, address, StationFilter::from_modes(modes))
            .await
    }

    /// Find the nearest station with a free dock.
    pub async fn find_dock(
        &self,
        table: &StationTable,
        address: &AddressQuery,
    ) -> Result<SearchOutcome, FinderError> {
        self.search(table, address, StationFilter::Dock).await
    }

    /// Geocode `address`, then search from there.
    pub async fn search(
        &self,
        table: &StationTable,
        address: &AddressQuery,
        filter: StationFilter,
    ) -> Result<SearchOutcome, FinderError> {
        let query = address.to_query();
        let user = match self.geocode(&query).await? {
            Some(user) => user,
            None => {
                info!(address = %query, "address not found");
                return Ok(SearchOutcome::AddressNotFound);
            }
        };

        let trip = self
            .search_from(table, UserQuery { user, filter })
            .await?;
        Ok(SearchOutcome::Found(trip))
    }

    /// Rank and route from a known position.
    pub async fn search_from(
        &self,
        table: &StationTable,
        query: UserQuery,
    ) -> Result<Trip, FinderError> {
        let station = find_nearest(query.user, table, |s| query.filter.matches(s))?;
        debug!(
            station = %station.station_id,
            distance_km = station.distance_km,
            filter = ?query.filter,
            "chose station"
        );

        let route = self.route(query.user, station.location).await?;
        info!(
            station = %station.station_id,
            duration_mins = route.duration_mins,
            "search complete"
        );

        Ok(Trip {
            user: query.user,
            station,
            route,
        })
    }

    async fn geocode(&self, address: &str) -> Result<Option<Coord>, FinderError> {
        Ok(bounded(self.config.call_timeout, Stage::Geocode, self.geocoder.geocode(address)).await??)
    }

    async fn route(&self, from: Coord, to: Coord) -> Result<Route, FinderError> {
        Ok(bounded(self.config.call_timeout, Stage::Route, self.router.route(from, to)).await??)
    }
}

/// Await `fut`, failing with a timeout for `stage` if it takes too long.
pub(crate) async fn bounded<F: Future>(
    limit: Duration,
    stage: Stage,
    fut: F,
) -> Result<F::Output, FinderError> {
    timeout(limit, fut)
        .await
        .map_err(|_| FinderError::Timeout { stage })
}
