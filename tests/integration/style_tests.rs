//! Integration tests for the style endpoint.
//!
//! Tests verify center resolution (override vs container metadata), asset
//! URL resolution against the request origin, and the embedded vector
//! source.

use std::path::PathBuf;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use mbtiles_server::{AppState, CenterOverride};

use super::test_utils::{create_container, pbf_metadata, router_for, router_for_state};

async fn fetch_style(router: axum::Router, host: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri("/style.json")
        .header("host", host)
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_style_uses_container_center() {
    let mut metadata = pbf_metadata();
    metadata.push(("center", "13.4,52.5,11"));
    let container = create_container(&metadata, &[]);

    let (status, style) = fetch_style(router_for(&container), "maps.test").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(style["center"], serde_json::json!([13.4, 52.5]));
    assert_eq!(style["zoom"], serde_json::json!(11.0));
}

#[tokio::test]
async fn test_style_derives_center_from_bounds() {
    let mut metadata = pbf_metadata();
    metadata.push(("bounds", "-10,-10,10,10"));
    let container = create_container(&metadata, &[]);

    let (status, style) = fetch_style(router_for(&container), "maps.test").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(style["center"], serde_json::json!([0.0, 0.0]));
    assert_eq!(style["zoom"], serde_json::json!(13.0));
}

#[tokio::test]
async fn test_center_override_skips_the_store_entirely() {
    // With an override configured the container is never opened: even a
    // nonexistent path serves a style.
    let state = AppState::new(PathBuf::from("/nonexistent/tiles.mbtiles")).with_center(Some(
        CenterOverride {
            lon: 2.35,
            lat: 48.85,
            zoom: 12.0,
        },
    ));

    let (status, style) = fetch_style(router_for_state(state), "maps.test").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(style["center"], serde_json::json!([2.35, 48.85]));
    assert_eq!(style["zoom"], serde_json::json!(12.0));
}

#[tokio::test]
async fn test_asset_urls_resolved_against_request_origin() {
    let container = create_container(&pbf_metadata(), &[]);
    let (status, style) = fetch_style(router_for(&container), "maps.test").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(style["sprite"], "http://maps.test/static/sprites/sprite");
    assert_eq!(
        style["glyphs"],
        "http://maps.test/static/fonts/{fontstack}/{range}.pbf"
    );
}

#[tokio::test]
async fn test_absolute_asset_base_is_kept() {
    let container = create_container(&pbf_metadata(), &[]);
    let state = AppState::new(container.path.clone())
        .with_asset_base_url("https://cdn.test/map-assets");

    let (status, style) = fetch_style(router_for_state(state), "maps.test").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(style["sprite"], "https://cdn.test/map-assets/sprites/sprite");
}

#[tokio::test]
async fn test_style_references_tilejson_endpoint() {
    let container = create_container(&pbf_metadata(), &[]);
    let (status, style) = fetch_style(router_for(&container), "maps.test").await;

    assert_eq!(status, StatusCode::OK);
    let source = &style["sources"]["openmaptiles"];
    assert_eq!(source["type"], "vector");
    assert_eq!(source["url"], "http://maps.test/tilejson");
}

#[tokio::test]
async fn test_style_with_missing_container_is_500() {
    let state = AppState::new(PathBuf::from("/nonexistent/tiles.mbtiles"));
    let (status, error) = fetch_style(router_for_state(state), "maps.test").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error["error"], "store_unavailable");
}
