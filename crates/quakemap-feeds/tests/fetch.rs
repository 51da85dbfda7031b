//! Integration tests for feed fetching.
//!
//! Each test serves fixture documents from a local Axum server bound to an
//! ephemeral port and fetches them through [`FeedClient`].

#![allow(clippy::unwrap_used, clippy::panic, clippy::indexing_slicing)]

use std::net::SocketAddr;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use quakemap_feeds::{FeedClient, FeedError};

const QUAKES: &str = r#"{
    "type": "FeatureCollection",
    "metadata": {"title": "USGS All Earthquakes, Past Month"},
    "features": [
        {"type": "Feature", "id": "a",
         "properties": {"mag": 4.2, "place": "North", "time": 1552410000000},
         "geometry": {"type": "Point", "coordinates": [-116.79, 33.49, 12.3]}},
        {"type": "Feature", "id": "b",
         "properties": {"mag": 0.7, "place": "South", "time": 1552410060000},
         "geometry": {"type": "Point", "coordinates": [-155.28, 19.40, 1.1]}}
    ]
}"#;

const PLATES: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {"type": "Feature",
         "properties": {"Name": "AF-AN"},
         "geometry": {"type": "LineString", "coordinates": [[-0.43, -54.85], [-0.03, -54.67]]}}
    ]
}"#;

async fn serve_fixtures() -> SocketAddr {
    let router = Router::new()
        .route("/quakes.geojson", get(|| async { QUAKES }))
        .route("/plates.json", get(|| async { PLATES }))
        .route("/broken.json", get(|| async { "{\"type\": \"FeatureCollection\", \"features\": [" }))
        .route(
            "/missing.json",
            get(|| async { (StatusCode::NOT_FOUND, "no such feed") }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

fn client() -> FeedClient {
    FeedClient::new("quakemap-tests").unwrap()
}

#[tokio::test]
async fn fetches_earthquake_collection() {
    let addr = serve_fixtures().await;
    let url = format!("http://{addr}/quakes.geojson");

    let collection = client().fetch_collection(&url).await.unwrap();
    assert_eq!(collection.len(), 2);
    assert_eq!(collection.features[1].properties["place"], "South");
}

#[tokio::test]
async fn fetches_both_feeds_concurrently() {
    let addr = serve_fixtures().await;
    let quakes_url = format!("http://{addr}/quakes.geojson");
    let plates_url = format!("http://{addr}/plates.json");
    let client = client();

    let (quakes, plates) = tokio::join!(
        client.fetch_collection(&quakes_url),
        client.fetch_collection(&plates_url)
    );
    assert_eq!(quakes.unwrap().len(), 2);
    assert_eq!(plates.unwrap().len(), 1);
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let addr = serve_fixtures().await;
    let url = format!("http://{addr}/missing.json");

    let err = client().fetch_collection(&url).await.unwrap_err();
    match err {
        FeedError::Status { status, body, .. } => {
            assert_eq!(status, 404);
            assert_eq!(body, "no such feed");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn truncated_body_is_a_decode_error() {
    let addr = serve_fixtures().await;
    let url = format!("http://{addr}/broken.json");

    let err = client().fetch_collection(&url).await.unwrap_err();
    assert!(matches!(err, FeedError::Decode { .. }));
}

#[tokio::test]
async fn unreachable_host_is_a_request_error() {
    // Bind then drop a listener so the port is known to be closed.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let url = format!("http://{addr}/quakes.geojson");
    let err = client().fetch_collection(&url).await.unwrap_err();
    assert!(matches!(err, FeedError::Request { .. }));
}
