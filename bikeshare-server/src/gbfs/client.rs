//! GBFS HTTP client.
//!
//! Resolves the station sub-feeds from a discovery document, downloads
//! both, and joins them into a [`StationTable`].

use std::collections::HashMap;
use std::time::Duration;

use futures::future::try_join;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::StationTable;

use super::error::FeedError;
use super::normalize::join_stations;
use super::types::{DiscoveryData, Envelope, StationInformation, StationList, StationStatus};

/// Divvy (Chicago) discovery document.
pub const DEFAULT_DISCOVERY_URL: &str = "https://gbfs.divvybikes.com/gbfs/gbfs.json";

/// Feed name for station locations and metadata.
pub const STATION_INFORMATION: &str = "station_information";

/// Feed name for live station counts.
pub const STATION_STATUS: &str = "station_status";

/// Configuration for the GBFS client.
#[derive(Debug, Clone)]
pub struct GbfsConfig {
    /// Language block to read from the discovery document
    pub language: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl GbfsConfig {
    /// Create a config with the given User-Agent and defaults otherwise.
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            language: "en".to_string(),
            timeout_secs: 10,
            user_agent: user_agent.into(),
        }
    }

    /// Read a different language block.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Sub-feed URLs resolved from a discovery document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedUrls {
    pub station_information: String,
    pub station_status: String,
}

impl FeedUrls {
    /// Pick the station feeds out of a discovery document.
    pub fn resolve(discovery: &DiscoveryData, language: &str) -> Result<Self, FeedError> {
        let feeds = discovery
            .get(language)
            .ok_or_else(|| FeedError::MissingLanguage(language.to_string()))?;

        let by_name: HashMap<&str, &str> = feeds
            .feeds
            .iter()
            .map(|f| (f.name.as_str(), f.url.as_str()))
            .collect();

        let lookup = |name: &'static str| {
            by_name
                .get(name)
                .map(|url| url.to_string())
                .ok_or(FeedError::MissingFeed(name))
        };

        Ok(Self {
            station_information: lookup(STATION_INFORMATION)?,
            station_status: lookup(STATION_STATUS)?,
        })
    }
}

/// Client for GBFS feeds.
#[derive(Debug, Clone)]
pub struct GbfsClient {
    http: reqwest::Client,
    language: String,
}

impl GbfsClient {
    /// Create a new GBFS client.
    pub fn new(config: GbfsConfig) -> Result<Self, FeedError> {
        let mut headers = HeaderMap::new();
        let agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|_| FeedError::Config("invalid User-Agent header value".to_string()))?;
        headers.insert(USER_AGENT, agent);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FeedError::Config(e.to_string()))?;

        Ok(Self {
            http,
            language: config.language,
        })
    }

    /// Fetch both station feeds and join them.
    ///
    /// Any failure fails the whole fetch; no partial table is returned.
    pub async fn fetch_station_table(&self, discovery_url: &str) -> Result<StationTable, FeedError> {
        let urls = self.discover(discovery_url).await?;
        debug!(
            information = %urls.station_information,
            status = %urls.station_status,
            "resolved station feeds"
        );

        let (info, status) = try_join(
            self.get_json::<Envelope<StationList<StationInformation>>>(&urls.station_information),
            self.get_json::<Envelope<StationList<StationStatus>>>(&urls.station_status),
        )
        .await?;

        Ok(join_stations(&info.data.stations, &status.data.stations))
    }

    /// Fetch the discovery document and resolve the station feed URLs.
    pub async fn discover(&self, discovery_url: &str) -> Result<FeedUrls, FeedError> {
        let doc: Envelope<DiscoveryData> = self.get_json(discovery_url).await?;
        FeedUrls::resolve(&doc.data, &self.language)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FeedError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| FeedError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Api {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FeedError::from_reqwest(url, e))?;

        serde_json::from_str(&body).map_err(|e| FeedError::Json {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}
