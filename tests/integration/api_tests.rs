//! API integration tests for tile retrieval and error handling.
//!
//! Tests verify:
//! - Tile retrieval and the XYZ to TMS row translation
//! - Missing-tile semantics (204, empty body, never an error)
//! - Error cases (missing container, corrupt container, bad coordinates)
//! - HTTP response codes and headers

use std::path::PathBuf;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use mbtiles_server::AppState;

use super::test_utils::{create_container, pbf_metadata, router_for, router_for_state};

const TILE_PAYLOAD: &[u8] = b"\x1f\x8b\x08\x00fake-gzip-tile";

// =============================================================================
// Tile Retrieval
// =============================================================================

#[tokio::test]
async fn test_tile_retrieval_success() {
    let container = create_container(&pbf_metadata(), &[(0, 0, 0, TILE_PAYLOAD)]);
    let router = router_for(&container);

    let request = Request::builder()
        .uri("/tiles/0/0/0.pbf")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/x-protobuf"
    );
    assert_eq!(response.headers().get("content-encoding").unwrap(), "gzip");
    assert!(response.headers().contains_key("cache-control"));

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], TILE_PAYLOAD);
}

#[tokio::test]
async fn test_tile_row_translation() {
    // The container stores TMS row 1 at zoom 1; XYZ row 0 must find it.
    let container = create_container(&pbf_metadata(), &[(1, 0, 1, TILE_PAYLOAD)]);
    let router = router_for(&container);

    let request = Request::builder()
        .uri("/tiles/1/0/0.pbf")
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // XYZ row 1 translates to TMS row 0, which holds nothing.
    let request = Request::builder()
        .uri("/tiles/1/0/1.pbf")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_tile_without_pbf_extension() {
    let container = create_container(&pbf_metadata(), &[(0, 0, 0, TILE_PAYLOAD)]);
    let router = router_for(&container);

    let request = Request::builder()
        .uri("/tiles/0/0/0")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// =============================================================================
// Missing-Tile Semantics
// =============================================================================

#[tokio::test]
async fn test_missing_tile_returns_204_with_empty_body() {
    let container = create_container(&pbf_metadata(), &[]);
    let router = router_for(&container);

    let request = Request::builder()
        .uri("/tiles/0/0/0.pbf")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_out_of_range_zoom_is_a_miss_not_an_error() {
    let container = create_container(&pbf_metadata(), &[(0, 0, 0, TILE_PAYLOAD)]);
    let router = router_for(&container);

    // No bounds validation happens at the store layer; zoom 30 simply
    // matches nothing.
    let request = Request::builder()
        .uri("/tiles/30/0/0.pbf")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

// =============================================================================
// Error Handling
// =============================================================================

#[tokio::test]
async fn test_missing_container_is_500_not_204() {
    let state = AppState::new(PathBuf::from("/nonexistent/tiles.mbtiles"));
    let router = router_for_state(state);

    let request = Request::builder()
        .uri("/tiles/0/0/0.pbf")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let error: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error["error"], "store_unavailable");
}

#[tokio::test]
async fn test_corrupt_container_is_500() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garbage.mbtiles");
    std::fs::write(&path, b"this is not a sqlite database, not even close").unwrap();

    let router = router_for_state(AppState::new(path));

    let request = Request::builder()
        .uri("/tiles/0/0/0.pbf")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_invalid_row_coordinate_is_400() {
    let container = create_container(&pbf_metadata(), &[]);
    let router = router_for(&container);

    let request = Request::builder()
        .uri("/tiles/0/0/zero.pbf")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let error: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error["error"], "invalid_coordinate");
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let container = create_container(&pbf_metadata(), &[]);
    let router = router_for(&container);

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let health: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(health["status"], "healthy");
}
