//! Address geocoding.
//!
//! Turns what the user typed into a coordinate via a Nominatim-compatible
//! provider. A miss is a normal outcome (`Ok(None)`); only an unreachable
//! or misbehaving provider is an error.

mod address;
mod client;
mod error;

pub use address::AddressQuery;
pub use client::{DEFAULT_BASE_URL, Geocoder, NominatimClient, NominatimConfig, NominatimPlace};
pub use error::GeocodeError;
