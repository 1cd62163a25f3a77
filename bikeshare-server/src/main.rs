use std::error::Error;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use bikeshare_server::cache::CachedFeed;
use bikeshare_server::config::AppConfig;
use bikeshare_server::finder::Finder;
use bikeshare_server::gbfs::GbfsClient;
use bikeshare_server::geocode::NominatimClient;
use bikeshare_server::routing::OsrmClient;
use bikeshare_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;

    let gbfs = GbfsClient::new(config.gbfs.clone())?;
    let feed = CachedFeed::new(gbfs, config.discovery_url.clone(), &config.cache);

    let geocoder = NominatimClient::new(config.geocoder.clone())?;
    let router = OsrmClient::new(config.router.clone())?;
    let finder = Finder::new(geocoder, router, config.finder.clone());

    // Warm the cache; the server still starts if the feed is down
    match feed.refresh().await {
        Ok(snapshot) => info!(stations = snapshot.table.len(), url = %feed.discovery_url(), "loaded station table"),
        Err(e) => warn!(error = %e, url = %feed.discovery_url(), "initial feed fetch failed"),
    }

    let state = AppState::new(feed, finder, config.address_defaults.clone());

    // Refresh in the background so requests rarely wait on the feed
    let refresh_feed = state.feed.clone();
    let refresh_interval = config.refresh_interval;
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(refresh_interval);
        interval.tick().await; // First tick is immediate, skip it
        loop {
            interval.tick().await;
            match refresh_feed.refresh().await {
                Ok(snapshot) => info!(stations = snapshot.table.len(), "refreshed station table"),
                Err(e) => warn!(
                    error = %e,
                    url = %refresh_feed.discovery_url(),
                    "station table refresh failed, keeping previous"
                ),
            }
        }
    });

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!(addr = %config.bind, "bikeshare server listening");
    info!("endpoints: /health /stations /summary /search/bike /search/dock");

    axum::serve(listener, app).await?;
    Ok(())
}
