//! System-wide availability totals.

use serde::Serialize;

use super::StationTable;

/// Headline counts across every station in a table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SystemSummary {
    pub station_count: usize,
    pub bikes_available: u64,
    pub ebikes_available: u64,
    pub stations_with_bikes: usize,
    pub stations_with_ebikes: usize,
    pub stations_with_docks: usize,
}

impl SystemSummary {
    /// Tally a station table.
    pub fn from_table(table: &StationTable) -> Self {
        table.iter().fold(
            SystemSummary {
                station_count: table.len(),
                ..SystemSummary::default()
            },
            |mut acc, s| {
                acc.bikes_available += u64::from(s.num_bikes_available);
                acc.ebikes_available += u64::from(s.num_ebikes_available);
                acc.stations_with_bikes += usize::from(s.num_bikes_available > 0);
                acc.stations_with_ebikes += usize::from(s.num_ebikes_available > 0);
                acc.stations_with_docks += usize::from(s.num_docks_available > 0);
                acc
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::station::fixtures::station;

    #[test]
    fn summary_of_empty_table() {
        let summary = SystemSummary::from_table(&StationTable::default());
        assert_eq!(summary, SystemSummary::default());
    }

    #[test]
    fn summary_counts() {
        let table = StationTable::new(vec![
            station("a", 41.0, -87.0, 3, 0, 0),
            station("b", 41.0, -87.0, 0, 2, 4),
            station("c", 41.0, -87.0, 1, 1, 1),
        ]);
        let summary = SystemSummary::from_table(&table);

        assert_eq!(summary.station_count, 3);
        assert_eq!(summary.bikes_available, 4);
        assert_eq!(summary.ebikes_available, 3);
        assert_eq!(summary.stations_with_bikes, 2);
        assert_eq!(summary.stations_with_ebikes, 2);
        assert_eq!(summary.stations_with_docks, 2);
    }
}
