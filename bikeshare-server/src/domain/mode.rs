//! Bike modes and the station filters built from them.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::Station;

/// Error returned when parsing an unknown bike mode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown bike mode: {0:?} (expected \"mechanical\" or \"ebike\")")]
pub struct InvalidBikeMode(pub String);

/// Kind of bike a rider wants to rent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BikeMode {
    Mechanical,
    Ebike,
}

impl BikeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BikeMode::Mechanical => "mechanical",
            BikeMode::Ebike => "ebike",
        }
    }

    /// Parse a comma-separated list such as `"ebike,mechanical"`.
    ///
    /// Blank entries are skipped, so an empty string yields no modes.
    pub fn parse_list(s: &str) -> Result<Vec<Self>, InvalidBikeMode> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::parse)
            .collect()
    }
}

impl FromStr for BikeMode {
    type Err = InvalidBikeMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mechanical" => Ok(BikeMode::Mechanical),
            "ebike" => Ok(BikeMode::Ebike),
            _ => Err(InvalidBikeMode(s.to_string())),
        }
    }
}

impl fmt::Display for BikeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which stations qualify for a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "mode")]
pub enum StationFilter {
    /// Renting, any bike will do.
    AnyBike,
    /// Renting a specific kind of bike.
    Mode(BikeMode),
    /// Returning a bike: needs a free dock.
    Dock,
}

impl StationFilter {
    /// Filter for a rent search over the selected modes.
    ///
    /// Selecting nothing is treated the same as selecting both kinds.
    pub fn from_modes(modes: &[BikeMode]) -> Self {
        let mechanical = modes.contains(&BikeMode::Mechanical);
        let ebike = modes.contains(&BikeMode::Ebike);
        match (mechanical, ebike) {
            (true, false) => StationFilter::Mode(BikeMode::Mechanical),
            (false, true) => StationFilter::Mode(BikeMode::Ebike),
            _ => StationFilter::AnyBike,
        }
    }

    /// Whether `station` satisfies this filter.
    pub fn matches(&self, station: &Station) -> bool {
        match self {
            StationFilter::AnyBike => station.ebike > 0 || station.mechanical > 0,
            StationFilter::Mode(BikeMode::Mechanical) => station.mechanical > 0,
            StationFilter::Mode(BikeMode::Ebike) => station.ebike > 0,
            StationFilter::Dock => station.num_docks_available > 0,
        }
    }
}
