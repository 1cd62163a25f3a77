//! OSRM route client.

use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use tracing::debug;

use crate::domain::{Coord, Route};

use super::error::RouteError;
use super::types::OsrmRouteResponse;

/// OSRM's public demo server.
pub const DEFAULT_BASE_URL: &str = "http://router.project-osrm.org";

/// Fetches a route between two points.
pub trait RouteProvider {
    fn route(
        &self,
        from: Coord,
        to: Coord,
    ) -> impl Future<Output = Result<Route, RouteError>> + Send;
}

/// OSRM travel profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RouteProfile {
    #[default]
    Driving,
    Cycling,
    Walking,
}

impl RouteProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteProfile::Driving => "driving",
            RouteProfile::Cycling => "cycling",
            RouteProfile::Walking => "walking",
        }
    }
}

impl FromStr for RouteProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "driving" | "car" => Ok(RouteProfile::Driving),
            "cycling" | "bike" => Ok(RouteProfile::Cycling),
            "walking" | "foot" => Ok(RouteProfile::Walking),
            other => Err(format!("unknown route profile {other:?}")),
        }
    }
}

impl fmt::Display for RouteProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for the OSRM client.
#[derive(Debug, Clone)]
pub struct OsrmConfig {
    /// Base URL of the OSRM server
    pub base_url: String,
    /// Travel profile path segment
    pub profile: RouteProfile,
    /// User-Agent header sent with every request
    pub user_agent: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl OsrmConfig {
    /// Create a new config with the given User-Agent.
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            profile: RouteProfile::default(),
            user_agent: user_agent.into(),
            timeout_secs: 10,
        }
    }

    /// Set a custom base URL (for testing or a self-hosted server).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the travel profile.
    pub fn with_profile(mut self, profile: RouteProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Client for the OSRM route service.
#[derive(Debug, Clone)]
pub struct OsrmClient {
    http: reqwest::Client,
    base_url: String,
    profile: RouteProfile,
}

impl OsrmClient {
    /// Create a new OSRM client.
    pub fn new(config: OsrmConfig) -> Result<Self, RouteError> {
        let mut headers = HeaderMap::new();
        let agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|_| RouteError::Config("invalid User-Agent header value".to_string()))?;
        headers.insert(USER_AGENT, agent);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RouteError::Config(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            profile: config.profile,
        })
    }

    /// URL for a route request. OSRM takes positions longitude first.
    fn route_url(&self, from: Coord, to: Coord) -> String {
        format!(
            "{}/route/v1/{}/{},{};{},{}",
            self.base_url,
            self.profile,
            from.lon(),
            from.lat(),
            to.lon(),
            to.lat()
        )
    }
}

impl RouteProvider for OsrmClient {
    async fn route(&self, from: Coord, to: Coord) -> Result<Route, RouteError> {
        let url = self.route_url(from, to);

        let response = self
            .http
            .get(&url)
            .query(&[("geometries", "geojson"), ("overview", "full")])
            .send()
            .await?;

        let status = response.status();
        debug!(%url, status = status.as_u16(), "routing response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RouteError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let parsed: OsrmRouteResponse =
            serde_json::from_str(&body).map_err(|e| RouteError::Json {
                message: e.to_string(),
            })?;

        parsed.into_route()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = OsrmConfig::new("test-agent");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.profile, RouteProfile::Driving);
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn profile_parsing() {
        assert_eq!("driving".parse::<RouteProfile>().unwrap(), RouteProfile::Driving);
        assert_eq!("Bike".parse::<RouteProfile>().unwrap(), RouteProfile::Cycling);
        assert_eq!("foot".parse::<RouteProfile>().unwrap(), RouteProfile::Walking);
        assert!("hovercraft".parse::<RouteProfile>().is_err());
    }

    #[test]
    fn route_url_is_lon_first() {
        let client = OsrmClient::new(
            OsrmConfig::new("a")
                .with_base_url("http://localhost:5000/")
                .with_profile(RouteProfile::Cycling),
        )
        .unwrap();
        let from = Coord::new(41.85, -87.65).unwrap();
        let to = Coord::new(41.9, -87.6).unwrap();
        assert_eq!(
            client.route_url(from, to),
            "http://localhost:5000/route/v1/cycling/-87.65,41.85;-87.6,41.9"
        );
    }
}
