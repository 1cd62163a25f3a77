//! Nearest-station selection.
//!
//! Distances are computed per query into fresh values; the station table
//! is only ever borrowed, so any number of queries can share one snapshot.

use crate::domain::{ChosenStation, Coord, Station, StationTable};

use super::distance::{DistanceMetric, Geodesic};

/// No station in the table satisfied the search predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no station matches the requested availability")]
pub struct NoStationAvailable;

/// A station paired with its distance from a search origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedStation<'a> {
    pub station: &'a Station,
    pub distance_km: f64,
}

impl RankedStation<'_> {
    pub fn to_chosen(&self) -> ChosenStation {
        ChosenStation {
            station_id: self.station.station_id.clone(),
            location: self.station.location,
            distance_km: self.distance_km,
        }
    }
}

/// Strategy for finding the closest station that satisfies a predicate.
///
/// Tie-break rule: when several matching stations are equally close, the
/// one appearing first in the underlying table wins. Implementations must
/// honour this so results are reproducible across strategies.
pub trait NearestIndex {
    fn nearest(
        &self,
        origin: Coord,
        predicate: &dyn Fn(&Station) -> bool,
    ) -> Option<RankedStation<'_>>;
}

/// Brute-force index: measures every station, O(n) per query.
///
/// Adequate for a city's few hundred to few thousand stations.
#[derive(Debug, Clone, Copy)]
pub struct LinearIndex<'a, M = Geodesic> {
    table: &'a StationTable,
    metric: M,
}

impl<'a> LinearIndex<'a, Geodesic> {
    /// Index a table with geodesic distances.
    pub fn new(table: &'a StationTable) -> Self {
        Self {
            table,
            metric: Geodesic,
        }
    }
}

impl<'a, M: DistanceMetric> LinearIndex<'a, M> {
    pub fn with_metric(table: &'a StationTable, metric: M) -> Self {
        Self { table, metric }
    }
}

impl<M: DistanceMetric> NearestIndex for LinearIndex<'_, M> {
    fn nearest(
        &self,
        origin: Coord,
        predicate: &dyn Fn(&Station) -> bool,
    ) -> Option<RankedStation<'_>> {
        let mut best: Option<RankedStation<'_>> = None;
        for station in self.table.iter().filter(|&s| predicate(s)) {
            let distance_km = self.metric.distance_km(origin, station.location);
            // Strict comparison keeps the earlier station on ties.
            if best.is_none_or(|b| distance_km < b.distance_km) {
                best = Some(RankedStation {
                    station,
                    distance_km,
                });
            }
        }
        best
    }
}

/// Find the closest station to `user` that satisfies `predicate`.
///
/// Uses geodesic distance and a linear scan. Ties go to the station listed
/// first in `table`.
pub fn find_nearest(
    user: Coord,
    table: &StationTable,
    predicate: impl Fn(&Station) -> bool,
) -> Result<ChosenStation, NoStationAvailable> {
    find_nearest_in(&LinearIndex::new(table), user, &predicate)
}

/// [`find_nearest`] against any index.
pub fn find_nearest_in<I: NearestIndex + ?Sized>(
    index: &I,
    user: Coord,
    predicate: &dyn Fn(&Station) -> bool,
) -> Result<ChosenStation, NoStationAvailable> {
    index
        .nearest(user, predicate)
        .map(|ranked| ranked.to_chosen())
        .ok_or(NoStationAvailable)
}

/// Every station with its distance from `origin`, closest first.
///
/// Returns a new vector; the table is untouched. The sort is stable, so
/// equidistant stations keep their table order.
pub fn rank_by_distance<'a, M: DistanceMetric>(
    origin: Coord,
    table: &'a StationTable,
    metric: M,
) -> Vec<RankedStation<'a>> {
    let mut ranked: Vec<RankedStation<'a>> = table
        .iter()
        .map(|station| RankedStation {
            station,
            distance_km: metric.distance_km(origin, station.location),
        })
        .collect();
    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::station;
    use crate::domain::{BikeMode, StationFilter};
    use proptest::prelude::*;

    fn coord(lat: f64, lon: f64) -> Coord {
        Coord::new(lat, lon).unwrap()
    }

    /// Three stations north of the user at increasing distance.
    fn three_station_table() -> StationTable {
        StationTable::new(vec![
            // ~1.1 km, classic bikes only
            station("near", 41.860, -87.650, 4, 0, 0),
            // ~2.2 km, one e-bike
            station("mid", 41.870, -87.650, 0, 1, 6),
            // ~3.3 km, both kinds
            station("far", 41.880, -87.650, 2, 5, 3),
        ])
    }

    fn user() -> Coord {
        coord(41.850, -87.650)
    }

    #[test]
    fn always_true_picks_closest() {
        let table = three_station_table();
        let chosen = find_nearest(user(), &table, |_| true).unwrap();
        assert_eq!(chosen.station_id.as_str(), "near");
        assert!((chosen.distance_km - 1.11).abs() < 0.01, "got {}", chosen.distance_km);
    }

    #[test]
    fn ebike_filter_skips_classic_only_station() {
        let table = three_station_table();
        let filter = StationFilter::Mode(BikeMode::Ebike);
        for _ in 0..5 {
            let chosen = find_nearest(user(), &table, |s| filter.matches(s)).unwrap();
            assert_eq!(chosen.station_id.as_str(), "mid");
            assert_eq!(chosen.location, coord(41.870, -87.650));
        }
    }

    #[test]
    fn dock_filter() {
        let table = three_station_table();
        let chosen = find_nearest(user(), &table, |s| StationFilter::Dock.matches(s)).unwrap();
        assert_eq!(chosen.station_id.as_str(), "mid");
    }

    #[test]
    fn no_match_is_an_error() {
        let table = three_station_table();
        assert_eq!(find_nearest(user(), &table, |_| false), Err(NoStationAvailable));
        assert_eq!(
            find_nearest(user(), &StationTable::default(), |_| true),
            Err(NoStationAvailable)
        );
    }

    #[test]
    fn ties_go_to_first_in_table() {
        // Two stations sharing a location, behind a farther one.
        let table = StationTable::new(vec![
            station("far", 41.90, -87.65, 1, 0, 1),
            station("first", 41.86, -87.65, 1, 0, 1),
            station("second", 41.86, -87.65, 1, 0, 1),
        ]);
        let chosen = find_nearest(user(), &table, |_| true).unwrap();
        assert_eq!(chosen.station_id.as_str(), "first");

        let reversed = StationTable::new(table.stations().iter().rev().cloned().collect());
        let chosen = find_nearest(user(), &reversed, |_| true).unwrap();
        assert_eq!(chosen.station_id.as_str(), "second");
    }

    #[test]
    fn ranking_leaves_table_untouched() {
        let table = three_station_table();
        let before = table.clone();
        let ranked = rank_by_distance(coord(41.881, -87.650), &table, Geodesic);
        let ids: Vec<_> = ranked.iter().map(|r| r.station.station_id.as_str()).collect();
        assert_eq!(ids, vec!["far", "mid", "near"]);
        assert_eq!(table, before);
    }

    /// Pretends every station is at the same distance.
    struct Flat;

    impl DistanceMetric for Flat {
        fn distance_km(&self, _a: Coord, _b: Coord) -> f64 {
            1.0
        }
    }

    #[test]
    fn custom_metric_ties_follow_table_order() {
        let table = three_station_table();
        let index = LinearIndex::with_metric(&table, Flat);
        let chosen = find_nearest_in(&index, user(), &|s| s.ebike > 0).unwrap();
        assert_eq!(chosen.station_id.as_str(), "mid");

        let ranked = rank_by_distance(user(), &table, Flat);
        let ids: Vec<_> = ranked.iter().map(|r| r.station.station_id.as_str()).collect();
        assert_eq!(ids, vec!["near", "mid", "far"]);
    }

    fn arb_table() -> impl Strategy<Value = StationTable> {
        proptest::collection::vec((41.6f64..42.1, -87.9f64..-87.5, 0u32..3, 0u32..3, 0u32..3), 0..30)
            .prop_map(|rows| {
                StationTable::new(
                    rows.into_iter()
                        .enumerate()
                        .map(|(i, (lat, lon, m, e, d))| station(&i.to_string(), lat, lon, m, e, d))
                        .collect(),
                )
            })
    }

    proptest! {
        /// The chosen station is the first one at the global minimum distance.
        #[test]
        fn matches_brute_force(table in arb_table(), lat in 41.6f64..42.1, lon in -87.9f64..-87.5) {
            let origin = coord(lat, lon);
            let result = find_nearest(origin, &table, |_| true);

            let distances: Vec<f64> = table.iter().map(|s| Geodesic.distance_km(origin, s.location)).collect();
            match distances.iter().copied().reduce(f64::min) {
                None => prop_assert_eq!(result, Err(NoStationAvailable)),
                Some(min) => {
                    let first = distances.iter().position(|d| *d == min).unwrap();
                    let chosen = result.unwrap();
                    prop_assert_eq!(&chosen.station_id, &table.stations()[first].station_id);
                    prop_assert_eq!(chosen.distance_km, min);
                }
            }
        }

        /// Whatever is chosen satisfies the filter, and nothing closer does.
        #[test]
        fn chosen_satisfies_filter(table in arb_table(), lat in 41.6f64..42.1, lon in -87.9f64..-87.5) {
            let origin = coord(lat, lon);
            let filter = StationFilter::Mode(BikeMode::Ebike);
            match find_nearest(origin, &table, |s| filter.matches(s)) {
                Ok(chosen) => {
                    let station = table.get(&chosen.station_id).unwrap();
                    prop_assert!(filter.matches(station));
                    for s in table.iter().filter(|s| filter.matches(s)) {
                        prop_assert!(Geodesic.distance_km(origin, s.location) >= chosen.distance_km);
                    }
                }
                Err(NoStationAvailable) => {
                    prop_assert!(table.iter().all(|s| !filter.matches(s)));
                }
            }
        }
    }
}
