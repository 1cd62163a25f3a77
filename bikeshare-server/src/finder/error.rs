//! Finder error types.

use std::fmt;
use std::sync::Arc;

use crate::gbfs::FeedError;
use crate::geocode::GeocodeError;
use crate::ranker::NoStationAvailable;
use crate::routing::RouteError;

/// Which external call a timeout came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Feed,
    Geocode,
    Route,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Feed => "station feed",
            Stage::Geocode => "geocoder",
            Stage::Route => "router",
        })
    }
}

/// Everything that can stop a rent or return search.
///
/// An unknown address is not here: it is a normal
/// [`SearchOutcome`](super::SearchOutcome).
#[derive(Debug, thiserror::Error)]
pub enum FinderError {
    /// Station feeds could not be loaded
    #[error("station feed unavailable: {0}")]
    FeedUnavailable(#[source] Arc<FeedError>),

    /// Geocoding provider unreachable or refusing requests
    #[error("geocoder unavailable: {0}")]
    GeocodeUnavailable(#[source] GeocodeError),

    /// No station matches the requested availability
    #[error("no station with the requested availability")]
    NoStationAvailable,

    /// Routing provider failed or found no route
    #[error("route unavailable: {0}")]
    RouteUnavailable(#[source] RouteError),

    /// An external call did not answer in time
    #[error("{stage} timed out")]
    Timeout { stage: Stage },
}

impl From<FeedError> for FinderError {
    fn from(e: FeedError) -> Self {
        Arc::new(e).into()
    }
}

/// Errors shared out of the feed cache.
impl From<Arc<FeedError>> for FinderError {
    fn from(e: Arc<FeedError>) -> Self {
        if e.is_timeout() {
            FinderError::Timeout { stage: Stage::Feed }
        } else {
            FinderError::FeedUnavailable(e)
        }
    }
}

impl From<GeocodeError> for FinderError {
    fn from(e: GeocodeError) -> Self {
        if e.is_timeout() {
            FinderError::Timeout {
                stage: Stage::Geocode,
            }
        } else {
            FinderError::GeocodeUnavailable(e)
        }
    }
}

impl From<RouteError> for FinderError {
    fn from(e: RouteError) -> Self {
        if e.is_timeout() {
            FinderError::Timeout {
                stage: Stage::Route,
            }
        } else {
            FinderError::RouteUnavailable(e)
        }
    }
}

impl From<NoStationAvailable> for FinderError {
    fn from(_: NoStationAvailable) -> Self {
        FinderError::NoStationAvailable
    }
}
