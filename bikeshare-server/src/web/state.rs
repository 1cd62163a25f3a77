//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::CachedFeed;
use crate::config::AddressDefaults;
use crate::finder::Finder;
use crate::geocode::NominatimClient;
use crate::routing::OsrmClient;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Cached station feeds
    pub feed: Arc<CachedFeed>,

    /// Geocode, rank and route pipeline
    pub finder: Arc<Finder<NominatimClient, OsrmClient>>,

    /// City and country used when a request omits them
    pub defaults: Arc<AddressDefaults>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        feed: CachedFeed,
        finder: Finder<NominatimClient, OsrmClient>,
        defaults: AddressDefaults,
    ) -> Self {
        Self {
            feed: Arc::new(feed),
            finder: Arc::new(finder),
            defaults: Arc::new(defaults),
        }
    }
}
