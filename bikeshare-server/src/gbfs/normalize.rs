//! Flatten and join the two station feeds.
//!
//! The join is an inner join on `station_id`, ordered by the information
//! feed. Records present in only one feed are dropped, as are records that
//! cannot form a valid station (blank id, out-of-range coordinates).

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::domain::{Coord, Station, StationId, StationTable};

use super::types::{StationInformation, StationStatus};

/// Join information and status records into a station table.
pub fn join_stations(info: &[StationInformation], status: &[StationStatus]) -> StationTable {
    // First record wins when an id repeats.
    let mut status_by_id: HashMap<&str, &StationStatus> = HashMap::with_capacity(status.len());
    for record in status {
        status_by_id
            .entry(record.station_id.trim())
            .or_insert(record);
    }

    let mut skipped = 0usize;
    let stations: Vec<Station> = info
        .iter()
        .filter_map(|meta| {
            let status = status_by_id.get(meta.station_id.trim())?;
            let station = build_station(meta, status);
            if station.is_none() {
                skipped += 1;
            }
            station
        })
        .collect();

    if skipped > 0 {
        warn!(skipped, "dropped station records with invalid id or coordinates");
    }

    let table = StationTable::new(stations);
    debug!(
        info = info.len(),
        status = status.len(),
        joined = table.len(),
        "joined station feeds"
    );
    table
}

/// Build one station from a matched pair of records.
fn build_station(meta: &StationInformation, status: &StationStatus) -> Option<Station> {
    let station_id = StationId::parse(&meta.station_id).ok()?;
    let location = Coord::new(meta.lat, meta.lon).ok()?;

    let num_bikes_available = count(status.num_bikes_available);
    let num_ebikes_available = status.num_ebikes_available.map(count).unwrap_or(0);

    let (mechanical, ebike) = match &status.num_bikes_available_types {
        Some(types) => (
            types.mechanical.map(count).unwrap_or(num_bikes_available),
            types.ebike.map(count).unwrap_or(num_ebikes_available),
        ),
        None => (num_bikes_available, num_ebikes_available),
    };

    Some(Station {
        station_id,
        name: meta.name.clone(),
        location,
        capacity: meta.capacity.map(count),
        num_bikes_available,
        num_ebikes_available,
        num_docks_available: count(status.num_docks_available),
        mechanical,
        ebike,
        is_installed: status.is_installed.unwrap_or(true),
        is_renting: status.is_renting.unwrap_or(true),
        is_returning: status.is_returning.unwrap_or(true),
        last_reported: status.last_reported,
    })
}

/// Clamp a feed count into `u32`; negative values become zero.
fn count(value: i64) -> u32 {
    value.clamp(0, i64::from(u32::MAX)) as u32
}
