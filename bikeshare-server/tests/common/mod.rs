//! Local stand-ins for the GBFS feeds, Nominatim and OSRM.
//!
//! One axum server per test, bound to an ephemeral port. Nothing here
//! touches the network beyond loopback.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// Where the fixture geocoder places any address mentioning Halsted.
pub const USER_LAT: f64 = 41.8675;
pub const USER_LON: f64 = -87.6470;

/// Switches a test can flip while the server runs.
#[derive(Default)]
pub struct Switches {
    /// Every feed endpoint answers 500
    pub fail_feeds: AtomicBool,

    /// The router answers with zero routes
    pub no_route: AtomicBool,

    /// The router answers 500
    pub router_error: AtomicBool,

    /// The discovery document takes `SLOW_FEED` to arrive
    pub slow_feeds: AtomicBool,
}

/// How long the discovery document stalls when feeds are slow.
pub const SLOW_FEED: Duration = Duration::from_secs(2);

struct Fixture {
    base: String,
    switches: Arc<Switches>,
}

/// A running fixture server.
pub struct Upstream {
    pub base: String,
    pub switches: Arc<Switches>,
}

impl Upstream {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let switches = Arc::new(Switches::default());

        let fixture = Arc::new(Fixture {
            base: base.clone(),
            switches: Arc::clone(&switches),
        });

        let app = Router::new()
            .route("/gbfs.json", get(discovery))
            .route("/gbfs_no_status.json", get(discovery_without_status))
            .route("/gbfs_broken.json", get(discovery_broken))
            .route("/gbfs_malformed.json", get(discovery_malformed))
            .route("/en/station_information.json", get(station_information))
            .route("/en/station_status.json", get(station_status))
            .route("/en/broken_status.json", get(broken))
            .route("/en/malformed_status.json", get(malformed))
            .route("/search", get(nominatim_search))
            .route("/route/v1/:profile/:coords", get(osrm_route))
            .with_state(fixture);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base, switches }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn fail_feeds(&self, fail: bool) {
        self.switches.fail_feeds.store(fail, Ordering::SeqCst);
    }

    pub fn no_route(&self, no_route: bool) {
        self.switches.no_route.store(no_route, Ordering::SeqCst);
    }

    pub fn router_error(&self, fail: bool) {
        self.switches.router_error.store(fail, Ordering::SeqCst);
    }

    pub fn slow_feeds(&self, slow: bool) {
        self.switches.slow_feeds.store(slow, Ordering::SeqCst);
    }
}

type FixtureState = State<Arc<Fixture>>;

fn discovery_doc(base: &str, status_path: Option<&str>) -> Value {
    let mut feeds = vec![
        json!({"name": "system_information", "url": format!("{base}/en/system_information.json")}),
        json!({"name": "station_information", "url": format!("{base}/en/station_information.json")}),
    ];
    if let Some(path) = status_path {
        feeds.push(json!({"name": "station_status", "url": format!("{base}{path}")}));
    }
    json!({
        "last_updated": 1_700_000_000,
        "ttl": 5,
        "data": { "en": { "feeds": feeds } }
    })
}

fn feeds_down(fixture: &Fixture) -> Option<Response> {
    fixture
        .switches
        .fail_feeds
        .load(Ordering::SeqCst)
        .then(|| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

async fn discovery(State(fixture): FixtureState) -> Response {
    if fixture.switches.slow_feeds.load(Ordering::SeqCst) {
        tokio::time::sleep(SLOW_FEED).await;
    }
    if let Some(down) = feeds_down(&fixture) {
        return down;
    }
    Json(discovery_doc(&fixture.base, Some("/en/station_status.json"))).into_response()
}

async fn discovery_without_status(State(fixture): FixtureState) -> Json<Value> {
    Json(discovery_doc(&fixture.base, None))
}

async fn discovery_broken(State(fixture): FixtureState) -> Json<Value> {
    Json(discovery_doc(&fixture.base, Some("/en/broken_status.json")))
}

async fn discovery_malformed(State(fixture): FixtureState) -> Json<Value> {
    Json(discovery_doc(&fixture.base, Some("/en/malformed_status.json")))
}

async fn station_information(State(fixture): FixtureState) -> Response {
    if let Some(down) = feeds_down(&fixture) {
        return down;
    }
    Json(json!({
        "last_updated": 1_700_000_000,
        "ttl": 5,
        "data": { "stations": [
            {"station_id": "1", "name": "Halsted St & Roosevelt Rd", "lat": 41.8670, "lon": -87.6466, "capacity": 15},
            {"station_id": "2", "name": "Clinton St & Madison St", "lat": 41.8819, "lon": -87.6411, "capacity": 31},
            {"station_id": "3", "name": "Michigan Ave & Balbo Ave", "lat": 41.8730, "lon": -87.6242, "capacity": 35},
            {"station_id": "5", "name": "No status yet", "lat": 41.9000, "lon": -87.6300}
        ]}
    }))
    .into_response()
}

async fn station_status(State(fixture): FixtureState) -> Response {
    if let Some(down) = feeds_down(&fixture) {
        return down;
    }
    Json(json!({
        "last_updated": 1_700_000_000,
        "ttl": 5,
        "data": { "stations": [
            {
                "station_id": "1",
                "num_bikes_available": 2,
                "num_ebikes_available": 0,
                "num_docks_available": 0,
                "num_bikes_available_types": {"mechanical": 2, "ebike": 0},
                "is_installed": 1,
                "is_renting": 1,
                "is_returning": 1,
                "last_reported": 1_700_000_000
            },
            {
                "station_id": "2",
                "num_bikes_available": 0,
                "num_ebikes_available": 3,
                "num_docks_available": 0,
                "num_bikes_available_types": {"mechanical": 0, "ebike": 3},
                "is_installed": true,
                "is_renting": true,
                "is_returning": true
            },
            {
                "station_id": "3",
                "num_bikes_available": 0,
                "num_docks_available": 10,
                "is_installed": true,
                "is_renting": true,
                "is_returning": true
            },
            {
                "station_id": "4",
                "num_bikes_available": 9,
                "num_docks_available": 9
            }
        ]}
    }))
    .into_response()
}

async fn broken() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn malformed() -> &'static str {
    "{\"data\": {\"stations\": [ not json"
}

async fn nominatim_search(Query(params): Query<HashMap<String, String>>) -> Response {
    let q = params.get("q").map(String::as_str).unwrap_or_default();

    if q.contains("ratelimit") {
        return StatusCode::TOO_MANY_REQUESTS.into_response();
    }

    if q.contains("servererror") {
        return (StatusCode::INTERNAL_SERVER_ERROR, "geocoder exploded").into_response();
    }

    if q.contains("Halsted") {
        return Json(json!([{
            "lat": USER_LAT.to_string(),
            "lon": USER_LON.to_string(),
            "display_name": "1200 South Halsted Street, Chicago, Illinois, United States"
        }]))
        .into_response();
    }

    Json(json!([])).into_response()
}

async fn osrm_route(
    State(fixture): FixtureState,
    Path((_profile, coords)): Path<(String, String)>,
) -> Response {
    if fixture.switches.router_error.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "router exploded").into_response();
    }

    if fixture.switches.no_route.load(Ordering::SeqCst) {
        return Json(json!({"code": "NoRoute", "routes": [], "message": "Impossible route"}))
            .into_response();
    }

    let positions: Vec<Vec<f64>> = coords
        .split(';')
        .map(|pair| pair.split(',').filter_map(|n| n.parse().ok()).collect())
        .collect();

    Json(json!({
        "code": "Ok",
        "routes": [{
            "geometry": {"type": "LineString", "coordinates": positions},
            "duration": 300.0,
            "distance": 1200.0
        }],
        "waypoints": []
    }))
    .into_response()
}
