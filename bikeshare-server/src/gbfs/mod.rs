//! GBFS (General Bikeshare Feed Specification) feed normalizer.
//!
//! A GBFS system publishes a discovery document listing its sub-feeds by
//! name. We need two of them:
//! - `station_information`: where each station is (rarely changes)
//! - `station_status`: live bike and dock counts (changes every few seconds)
//!
//! Both are keyed by `station_id` and joined into one row per station.

mod client;
mod error;
mod normalize;
mod types;

pub use client::{
    DEFAULT_DISCOVERY_URL, FeedUrls, GbfsClient, GbfsConfig, STATION_INFORMATION, STATION_STATUS,
};
pub use error::FeedError;
pub use normalize::join_stations;
pub use types::{
    BikeTypeCounts, DiscoveryData, Envelope, FeedEntry, FeedList, StationInformation, StationList,
    StationStatus,
};
