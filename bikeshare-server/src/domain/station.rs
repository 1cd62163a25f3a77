//! Station and station table types.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use super::Coord;

/// Error returned when parsing an empty station id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station id: must not be empty")]
pub struct InvalidStationId;

/// A GBFS station identifier.
///
/// GBFS ids are opaque strings; some feeds send them as JSON numbers, which
/// are normalized to their decimal string form before reaching this type.
///
/// # Examples
///
/// ```
/// use bikeshare_server::domain::StationId;
///
/// let id = StationId::parse("a3a3f6ad").unwrap();
/// assert_eq!(id.as_str(), "a3a3f6ad");
///
/// assert!(StationId::parse("").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct StationId(String);

impl StationId {
    /// Parse a station id, trimming surrounding whitespace.
    pub fn parse(s: &str) -> Result<Self, InvalidStationId> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(InvalidStationId);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Marker colour bucket for a station, based on bikes on hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityLevel {
    /// More than three bikes.
    Plenty,
    /// One to three bikes.
    Low,
    /// No bikes.
    Empty,
}

impl AvailabilityLevel {
    /// Bucket a bike count.
    pub fn from_count(bikes: u32) -> Self {
        match bikes {
            0 => AvailabilityLevel::Empty,
            1..=3 => AvailabilityLevel::Low,
            _ => AvailabilityLevel::Plenty,
        }
    }
}

/// A bike-share station joined from its information and status records.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub station_id: StationId,
    pub name: Option<String>,
    pub location: Coord,
    pub capacity: Option<u32>,

    pub num_bikes_available: u32,
    pub num_ebikes_available: u32,
    pub num_docks_available: u32,

    /// Classic (non-electric) bikes on hand.
    pub mechanical: u32,
    /// Electric bikes on hand.
    pub ebike: u32,

    pub is_installed: bool,
    pub is_renting: bool,
    pub is_returning: bool,

    /// Unix timestamp of the station's last status report.
    pub last_reported: Option<i64>,
}

impl Station {
    /// Bikes of either kind, as the dashboard totals them.
    pub fn total_num_bikes_available(&self) -> u32 {
        self.num_bikes_available
            .saturating_add(self.num_ebikes_available)
    }

    pub fn lat(&self) -> f64 {
        self.location.lat()
    }

    pub fn lon(&self) -> f64 {
        self.location.lon()
    }

    pub fn availability(&self) -> AvailabilityLevel {
        AvailabilityLevel::from_count(self.total_num_bikes_available())
    }
}

/// Ordered, immutable collection of stations with unique ids.
///
/// Order is significant: ranking breaks distance ties in favour of the
/// station that appears first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StationTable {
    stations: Vec<Station>,
}

impl StationTable {
    /// Build a table, keeping the first station for any repeated id.
    pub fn new(stations: Vec<Station>) -> Self {
        let mut seen = HashSet::new();
        let stations = stations
            .into_iter()
            .filter(|s| seen.insert(s.station_id.clone()))
            .collect();
        Self { stations }
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Station> {
        self.stations.iter()
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// Look up a station by id.
    pub fn get(&self, id: &StationId) -> Option<&Station> {
        self.stations.iter().find(|s| &s.station_id == id)
    }
}

impl<'a> IntoIterator for &'a StationTable {
    type Item = &'a Station;
    type IntoIter = std::slice::Iter<'a, Station>;

    fn into_iter(self) -> Self::IntoIter {
        self.stations.iter()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::station;
    use super::*;

    #[test]
    fn station_id_trims_and_rejects_empty() {
        assert_eq!(StationId::parse("  42 ").unwrap().as_str(), "42");
        assert!(StationId::parse("").is_err());
        assert!(StationId::parse("   ").is_err());
    }

    #[test]
    fn station_id_display_and_debug() {
        let id = StationId::parse("abc").unwrap();
        assert_eq!(id.to_string(), "abc");
        assert_eq!(format!("{:?}", id), "StationId(abc)");
    }

    #[test]
    fn total_bikes_is_sum() {
        let s = station("1", 41.0, -87.0, 4, 2, 10);
        assert_eq!(s.total_num_bikes_available(), 6);
    }

    #[test]
    fn availability_buckets() {
        assert_eq!(AvailabilityLevel::from_count(0), AvailabilityLevel::Empty);
        assert_eq!(AvailabilityLevel::from_count(1), AvailabilityLevel::Low);
        assert_eq!(AvailabilityLevel::from_count(3), AvailabilityLevel::Low);
        assert_eq!(AvailabilityLevel::from_count(4), AvailabilityLevel::Plenty);
    }

    #[test]
    fn table_keeps_first_duplicate() {
        let table = StationTable::new(vec![
            station("a", 41.0, -87.0, 1, 0, 1),
            station("b", 41.1, -87.1, 2, 0, 1),
            station("a", 42.0, -88.0, 9, 9, 9),
        ]);
        assert_eq!(table.len(), 2);
        let a = table.get(&StationId::parse("a").unwrap()).unwrap();
        assert_eq!(a.mechanical, 1);
        let ids: Vec<_> = table.iter().map(|s| s.station_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn empty_table() {
        let table = StationTable::default();
        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
    }
}
