//! GBFS feed DTOs.
//!
//! These types map directly to GBFS v1/v2 JSON documents. Optional fields
//! use `Option` because operators omit them freely. Identifiers and flags
//! are decoded leniently: ids may arrive as strings or numbers, booleans as
//! `true`/`false` or `1`/`0`.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer};

/// Common GBFS envelope around every feed's `data`.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    /// Unix timestamp of the last feed update.
    pub last_updated: Option<i64>,

    /// Seconds before the feed should be refetched.
    pub ttl: Option<i64>,

    pub data: T,
}

/// Discovery document `data`: feeds grouped by language code.
pub type DiscoveryData = HashMap<String, FeedList>;

/// The feeds published for one language.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedList {
    pub feeds: Vec<FeedEntry>,
}

/// A named sub-feed URL.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedEntry {
    pub name: String,
    pub url: String,
}

/// `data` of `station_information` and `station_status`.
#[derive(Debug, Clone, Deserialize)]
pub struct StationList<T> {
    pub stations: Vec<T>,
}

/// One record from `station_information`.
#[derive(Debug, Clone, Deserialize)]
pub struct StationInformation {
    #[serde(deserialize_with = "lenient_id")]
    pub station_id: String,

    pub name: Option<String>,

    pub lat: f64,

    pub lon: f64,

    /// Total docks at the station.
    pub capacity: Option<i64>,
}

/// One record from `station_status`.
#[derive(Debug, Clone, Deserialize)]
pub struct StationStatus {
    #[serde(deserialize_with = "lenient_id")]
    pub station_id: String,

    pub num_bikes_available: i64,

    /// Not part of core GBFS; Lyft-operated systems publish it.
    pub num_ebikes_available: Option<i64>,

    pub num_docks_available: i64,

    /// Per-vehicle-type breakdown (Lyft extension).
    pub num_bikes_available_types: Option<BikeTypeCounts>,

    #[serde(default, deserialize_with = "lenient_flag")]
    pub is_installed: Option<bool>,

    #[serde(default, deserialize_with = "lenient_flag")]
    pub is_renting: Option<bool>,

    #[serde(default, deserialize_with = "lenient_flag")]
    pub is_returning: Option<bool>,

    pub last_reported: Option<i64>,
}

/// Counts under `num_bikes_available_types`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BikeTypeCounts {
    pub mechanical: Option<i64>,
    pub ebike: Option<i64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Text(String),
    Int(i64),
    Float(f64),
}

fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match IdRepr::deserialize(deserializer)? {
        IdRepr::Text(s) => s,
        IdRepr::Int(n) => n.to_string(),
        IdRepr::Float(f) => f.to_string(),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FlagRepr {
    Bool(bool),
    Int(i64),
}

fn lenient_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    Ok(
        Option::<FlagRepr>::deserialize(deserializer)?.map(|flag| match flag {
            FlagRepr::Bool(b) => b,
            FlagRepr::Int(n) => n != 0,
        }),
    )
}
