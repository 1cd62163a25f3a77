//! Route lookup against an OSRM server.
//!
//! OSRM speaks longitude-first; everything leaving this module is
//! latitude-first like the rest of the crate.

mod client;
mod error;
mod types;

pub use client::{DEFAULT_BASE_URL, OsrmClient, OsrmConfig, RouteProfile, RouteProvider};
pub use error::RouteError;
pub use types::{OsrmGeometry, OsrmRoute, OsrmRouteResponse};
