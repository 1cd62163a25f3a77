//! Process configuration.
//!
//! Every setting has a default that targets Chicago's Divvy system and the
//! public OpenStreetMap services; environment variables override them.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::CacheConfig;
use crate::finder::FinderConfig;
use crate::gbfs::{DEFAULT_DISCOVERY_URL, GbfsConfig};
use crate::geocode::{self, NominatimConfig};
use crate::routing::{self, OsrmConfig, RouteProfile};

/// Error reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value for {var}: {message}")]
pub struct ConfigError {
    pub var: &'static str,
    pub message: String,
}

/// Address parts filled in when a request leaves them out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressDefaults {
    pub city: String,
    pub country: String,
}

impl Default for AddressDefaults {
    fn default() -> Self {
        Self {
            city: "Chicago".to_string(),
            country: "United States".to_string(),
        }
    }
}

/// Everything needed to start the server.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// GBFS discovery document URL
    pub discovery_url: String,
    pub gbfs: GbfsConfig,
    pub geocoder: NominatimConfig,
    pub router: OsrmConfig,
    pub cache: CacheConfig,
    pub finder: FinderConfig,
    /// How often the background task refetches the feeds
    pub refresh_interval: Duration,
    pub address_defaults: AddressDefaults,
    /// Address the HTTP server binds to
    pub bind: SocketAddr,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let text = |var: &str, default: &str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let user_agent = text(
            "BIKESHARE_USER_AGENT",
            concat!("bikeshare-server/", env!("CARGO_PKG_VERSION")),
        );
        let timeout_secs: u64 = parse(&lookup, "BIKESHARE_TIMEOUT_SECS", 10)?;
        let cache_ttl_secs: u64 = parse(&lookup, "BIKESHARE_CACHE_TTL_SECS", 60)?;
        let profile: RouteProfile = parse(&lookup, "BIKESHARE_ROUTE_PROFILE", RouteProfile::Driving)?;
        let bind: SocketAddr = parse(
            &lookup,
            "BIKESHARE_BIND",
            SocketAddr::from(([127, 0, 0, 1], 3000)),
        )?;

        if timeout_secs == 0 {
            return Err(ConfigError {
                var: "BIKESHARE_TIMEOUT_SECS",
                message: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            discovery_url: text("BIKESHARE_GBFS_URL", DEFAULT_DISCOVERY_URL),
            gbfs: GbfsConfig::new(&user_agent)
                .with_language(text("BIKESHARE_GBFS_LANGUAGE", "en"))
                .with_timeout(timeout_secs),
            geocoder: NominatimConfig::new(&user_agent)
                .with_base_url(text("BIKESHARE_GEOCODER_URL", geocode::DEFAULT_BASE_URL))
                .with_timeout(timeout_secs),
            router: OsrmConfig::new(&user_agent)
                .with_base_url(text("BIKESHARE_ROUTER_URL", routing::DEFAULT_BASE_URL))
                .with_profile(profile)
                .with_timeout(timeout_secs),
            cache: CacheConfig {
                ttl: Duration::from_secs(cache_ttl_secs),
                ..CacheConfig::default()
            },
            // Outer bound a little above the HTTP client timeout
            finder: FinderConfig::new(Duration::from_secs(timeout_secs + 5)),
            refresh_interval: Duration::from_secs(cache_ttl_secs.max(1)),
            address_defaults: AddressDefaults {
                city: text("BIKESHARE_DEFAULT_CITY", "Chicago"),
                country: text("BIKESHARE_DEFAULT_COUNTRY", "United States"),
            },
            bind,
        })
    }
}

/// Parse an optional variable, falling back to `default` when unset.
fn parse<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var).map(|v| v.trim().to_string()) {
        None => Ok(default),
        Some(v) if v.is_empty() => Ok(default),
        Some(v) => v.parse().map_err(|e: T::Err| ConfigError {
            var,
            message: format!("{v:?}: {e}"),
        }),
    }
}
