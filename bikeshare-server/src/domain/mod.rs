//! Domain types for the bike-share finder.
//!
//! All types enforce their invariants at construction time: coordinates
//! are in range, station ids are non-empty, counts are unsigned, and a
//! station table never holds two stations with the same id.

mod coord;
mod mode;
mod station;
mod summary;
mod trip;

pub use coord::{Coord, InvalidCoord};
pub use mode::{BikeMode, InvalidBikeMode, StationFilter};
pub use station::{AvailabilityLevel, InvalidStationId, Station, StationId, StationTable};
pub use summary::SystemSummary;
pub use trip::{ChosenStation, Route, Trip, seconds_to_minutes};

#[cfg(test)]
pub(crate) use station::fixtures;
