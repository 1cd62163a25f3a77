//! Distance ranking of stations.
//!
//! Answers "which station is closest to me and has what I need?" The
//! distance metric and the search strategy are separate traits so a
//! spatial index can replace the linear scan without touching callers.

mod distance;
mod nearest;

pub use distance::{DistanceMetric, Geodesic};
pub use nearest::{
    LinearIndex, NearestIndex, NoStationAvailable, RankedStation, find_nearest, find_nearest_in,
    rank_by_distance,
};
