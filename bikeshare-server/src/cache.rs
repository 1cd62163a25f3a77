//! Caching layer for the station table.
//!
//! Station counts change every few seconds, but every request in one
//! render cycle should see the same table and the upstream feed should
//! not be hit once per request. We keep the joined table for a short TTL,
//! and concurrent misses share a single upstream fetch.
//!
//! When a refetch fails we fall back to the last table that loaded
//! successfully, flagged as stale, rather than failing the request. The
//! stale table is cached for a shorter window so an outage is retried
//! periodically instead of on every request.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use moka::Expiry;
use moka::future::Cache as MokaCache;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::domain::StationTable;
use crate::gbfs::{FeedError, GbfsClient};

/// Anything that can produce a fresh station table.
///
/// This abstraction allows the cache to be tested without HTTP.
pub trait StationSource {
    fn fetch_station_table(
        &self,
        discovery_url: &str,
    ) -> impl Future<Output = Result<StationTable, FeedError>> + Send;
}

impl StationSource for GbfsClient {
    fn fetch_station_table(
        &self,
        discovery_url: &str,
    ) -> impl Future<Output = Result<StationTable, FeedError>> + Send {
        GbfsClient::fetch_station_table(self, discovery_url)
    }
}

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for a freshly fetched table.
    pub ttl: Duration,

    /// How long a stale fallback is served before upstream is tried again.
    pub stale_ttl: Duration,

    /// Maximum number of cached tables.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60),
            stale_ttl: Duration::from_secs(10),
            max_capacity: 16,
        }
    }
}

/// A station table as served to callers.
#[derive(Debug, Clone)]
pub struct TableSnapshot {
    /// Shared, read-only table.
    pub table: Arc<StationTable>,

    /// When the table was fetched from upstream.
    pub fetched_at: DateTime<Utc>,

    /// True when the latest fetch failed and this is an older table.
    pub stale: bool,
}

/// Per-entry lifetime: fresh tables live for `ttl`, stale ones for `stale_ttl`.
struct SnapshotExpiry {
    ttl: Duration,
    stale_ttl: Duration,
}

impl SnapshotExpiry {
    fn lifetime(&self, snapshot: &TableSnapshot) -> Option<Duration> {
        Some(if snapshot.stale {
            self.stale_ttl
        } else {
            self.ttl
        })
    }
}

impl Expiry<String, TableSnapshot> for SnapshotExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &TableSnapshot,
        _created_at: Instant,
    ) -> Option<Duration> {
        self.lifetime(value)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &TableSnapshot,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        self.lifetime(value)
    }
}

/// Station feed with caching and stale fallback.
pub struct CachedFeed<S = GbfsClient> {
    source: S,
    discovery_url: String,
    tables: MokaCache<String, TableSnapshot>,
    last_good: RwLock<Option<TableSnapshot>>,
}

impl<S: StationSource> CachedFeed<S> {
    /// Create a new cached feed for one discovery URL.
    pub fn new(source: S, discovery_url: impl Into<String>, config: &CacheConfig) -> Self {
        let tables = MokaCache::builder()
            .expire_after(SnapshotExpiry {
                ttl: config.ttl,
                stale_ttl: config.stale_ttl,
            })
            .max_capacity(config.max_capacity)
            .build();

        Self {
            source,
            discovery_url: discovery_url.into(),
            tables,
            last_good: RwLock::new(None),
        }
    }

    /// The discovery URL this feed reads.
    pub fn discovery_url(&self) -> &str {
        &self.discovery_url
    }

    /// Get the current table, fetching if the cached one has expired.
    ///
    /// Concurrent callers that miss together wait on one fetch. Falls back
    /// to the last good table (marked stale) if the fetch fails; only fails
    /// when nothing has ever loaded.
    pub async fn get(&self) -> Result<TableSnapshot, Arc<FeedError>> {
        self.tables
            .try_get_with(self.discovery_url.clone(), self.load())
            .await
    }

    /// Fetch from upstream, bypassing the cache.
    ///
    /// On success, replaces the cached table. On failure, the existing
    /// table is preserved and the error is returned.
    pub async fn refresh(&self) -> Result<TableSnapshot, FeedError> {
        let snapshot = self.fetch().await?;
        self.tables
            .insert(self.discovery_url.clone(), snapshot.clone())
            .await;
        Ok(snapshot)
    }

    /// Drop the cached table so the next `get` refetches. The stale
    /// fallback is kept.
    pub fn invalidate(&self) {
        self.tables.invalidate_all();
    }

    /// Fill a cache miss, degrading to the last good table.
    async fn load(&self) -> Result<TableSnapshot, FeedError> {
        let err = match self.fetch().await {
            Ok(snapshot) => return Ok(snapshot),
            Err(e) => e,
        };

        let previous = self.last_good.read().await.clone();
        match previous {
            Some(previous) => {
                warn!(error = %err, fetched_at = %previous.fetched_at, "feed fetch failed, serving stale table");
                Ok(TableSnapshot {
                    stale: true,
                    ..previous
                })
            }
            None => Err(err),
        }
    }

    /// Fetch from upstream and remember the result as the last good table.
    async fn fetch(&self) -> Result<TableSnapshot, FeedError> {
        let table = self.source.fetch_station_table(&self.discovery_url).await?;
        debug!(stations = table.len(), url = %self.discovery_url, "fetched station table");

        let snapshot = TableSnapshot {
            table: Arc::new(table),
            fetched_at: Utc::now(),
            stale: false,
        };
        *self.last_good.write().await = Some(snapshot.clone());

        Ok(snapshot)
    }
}
