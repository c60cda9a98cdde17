//! HTTP request handlers for the MBTiles tile API.
//!
//! # Endpoints
//!
//! - `GET /tiles/{z}/{x}/{y}.pbf` - Serve a vector tile
//! - `GET /tilejson` - TileJSON 3.0.0 capability document
//! - `GET /style.json` - MapLibre style document
//! - `GET /health` - Health check endpoint
//!
//! Every handler acquires its own store scope: the container is opened for
//! the single lookup and released before the response is finalized. The
//! SQLite work is synchronous and runs on the blocking pool.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{StoreError, SynthesisError};
use crate::mbtiles::MbtilesStore;
use crate::style::{self, CenterOverride};
use crate::tilejson::TileJson;

use super::urls::{absolute, request_origin, resolve_asset_base, tile_url_template};

// =============================================================================
// Application State
// =============================================================================

/// Shared application state passed to all handlers via Axum's State
/// extractor.
///
/// Note that no store handle lives here: only the container path is shared,
/// and each request opens and closes its own connection.
#[derive(Clone)]
pub struct AppState {
    /// Location of the MBTiles container
    pub mbtiles_path: Arc<PathBuf>,

    /// Pre-configured initial position, overriding container metadata
    pub center: Option<CenterOverride>,

    /// Base URL for sprites and glyphs (absolute, or resolved against the
    /// request origin)
    pub asset_base_url: Arc<str>,

    /// Public base URL overriding Host-header derivation
    pub public_url: Option<Arc<str>>,

    /// Cache-Control max-age in seconds
    pub cache_max_age: u32,
}

impl AppState {
    /// Create application state for the container at `mbtiles_path`.
    pub fn new(mbtiles_path: PathBuf) -> Self {
        Self {
            mbtiles_path: Arc::new(mbtiles_path),
            center: None,
            asset_base_url: Arc::from("/static"),
            public_url: None,
            cache_max_age: 3600,
        }
    }

    /// Set a pre-configured center override.
    pub fn with_center(mut self, center: Option<CenterOverride>) -> Self {
        self.center = center;
        self
    }

    /// Set the static-asset base URL.
    pub fn with_asset_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.asset_base_url = Arc::from(base_url.into());
        self
    }

    /// Set a fixed public base URL for generated links.
    pub fn with_public_url(mut self, public_url: Option<String>) -> Self {
        self.public_url = public_url.map(Arc::from);
        self
    }

    /// Set the Cache-Control max-age.
    pub fn with_cache_max_age(mut self, seconds: u32) -> Self {
        self.cache_max_age = seconds;
        self
    }
}

// =============================================================================
// Request Parameters
// =============================================================================

/// Path parameters for tile requests.
///
/// Extracted from: `/tiles/{z}/{x}/{filename}` where filename is `{y}` or
/// `{y}.pbf`.
#[derive(Debug, Deserialize)]
pub struct TilePathParams {
    /// Zoom level
    pub z: u8,

    /// Tile column (XYZ addressing)
    pub x: u32,

    /// Tile row with optional .pbf extension (e.g., "42" or "42.pbf")
    pub filename: String,
}

impl TilePathParams {
    /// Parse the Y coordinate from the filename, stripping any .pbf
    /// extension.
    pub fn y(&self) -> Result<u32, std::num::ParseIntError> {
        let y_str = self.filename.strip_suffix(".pbf").unwrap_or(&self.filename);
        y_str.parse()
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// JSON error response returned for all error conditions.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error type identifier (e.g., "store_unavailable")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code (included for convenience)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ErrorResponse {
    /// Create a new error response with status code.
    pub fn with_status(
        error: impl Into<String>,
        message: impl Into<String>,
        status: StatusCode,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: Some(status.as_u16()),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Convert StoreError to HTTP response.
///
/// A missing tile is an expected outcome, not a failure: it becomes an empty
/// 204 and is logged at debug level. Everything else means the store is
/// unusable and becomes a 500.
impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        match self {
            StoreError::MissingTile { z, x, y } => {
                debug!(z, x, y, "no tile at requested coordinate");
                StatusCode::NO_CONTENT.into_response()
            }
            StoreError::Open(ref message) => {
                error!(status = 500, "tile container unusable: {}", message);
                server_error("store_unavailable", self.to_string())
            }
            StoreError::MalformedMetadata(ref message) => {
                error!(status = 500, "malformed container metadata: {}", message);
                server_error("malformed_metadata", self.to_string())
            }
        }
    }
}

/// Convert SynthesisError to HTTP response.
///
/// All synthesis failures are server errors: they signal a broken or
/// misconfigured deployment rather than a bad request.
impl IntoResponse for SynthesisError {
    fn into_response(self) -> Response {
        match self {
            SynthesisError::Store(err) => err.into_response(),
            SynthesisError::UnsupportedFormat { ref format } => {
                error!(status = 500, "container format {:?} is not servable", format);
                server_error("unsupported_format", self.to_string())
            }
            SynthesisError::MalformedMetadata(ref message) => {
                error!(status = 500, "malformed container metadata: {}", message);
                server_error("malformed_metadata", self.to_string())
            }
        }
    }
}

fn server_error(error_type: &str, message: String) -> Response {
    let body = ErrorResponse::with_status(error_type, message, StatusCode::INTERNAL_SERVER_ERROR);
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

/// Response for a blocking store task that failed to complete.
fn task_failure(err: tokio::task::JoinError) -> Response {
    error!("store task failed: {err}");
    server_error("internal_error", "tile store task failed".to_string())
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle tile requests.
///
/// # Endpoint
///
/// `GET /tiles/{z}/{x}/{y}.pbf`
///
/// # Response
///
/// - `200 OK`: gzip-compressed protobuf tile with
///   `Content-Type: application/x-protobuf`
/// - `204 No Content`: no tile at this coordinate (empty body)
/// - `400 Bad Request`: unparsable row coordinate
/// - `500 Internal Server Error`: container missing or corrupt
pub async fn tile_handler(
    State(state): State<AppState>,
    Path(params): Path<TilePathParams>,
) -> Response {
    let y = match params.y() {
        Ok(y) => y,
        Err(_) => {
            let body = ErrorResponse::with_status(
                "invalid_coordinate",
                format!("invalid tile row {:?}", params.filename),
                StatusCode::BAD_REQUEST,
            );
            return (StatusCode::BAD_REQUEST, Json(body)).into_response();
        }
    };

    let path = Arc::clone(&state.mbtiles_path);
    let (z, x) = (params.z, params.x);
    let result = tokio::task::spawn_blocking(move || -> Result<Vec<u8>, StoreError> {
        let store = MbtilesStore::open(&path)?;
        store.tile(z, x, y)
    })
    .await;

    match result {
        Ok(Ok(data)) => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "application/x-protobuf")
            .header(header::CONTENT_ENCODING, "gzip")
            .header(
                header::CACHE_CONTROL,
                format!("public, max-age={}", state.cache_max_age),
            )
            .body(axum::body::Body::from(data))
            .unwrap(),
        Ok(Err(err)) => err.into_response(),
        Err(join_err) => task_failure(join_err),
    }
}

/// Handle TileJSON requests.
///
/// # Endpoint
///
/// `GET /tilejson`
///
/// # Response
///
/// `200 OK` with a TileJSON 3.0.0 document whose single `tiles` entry is the
/// tile endpoint's absolute URL template, or `500` when the container is
/// unusable, declares a non-pbf format or lacks `vector_layers`.
pub async fn tilejson_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let origin = request_origin(&headers, state.public_url.as_deref());
    let template = tile_url_template(&origin);

    let path = Arc::clone(&state.mbtiles_path);
    let result = tokio::task::spawn_blocking(move || -> Result<TileJson, SynthesisError> {
        let store = MbtilesStore::open(&path)?;
        let metadata = store.metadata()?;
        TileJson::from_metadata(&metadata, template)
    })
    .await;

    match result {
        Ok(Ok(tilejson)) => cached_json(&state, Json(tilejson)),
        Ok(Err(err)) => err.into_response(),
        Err(join_err) => task_failure(join_err),
    }
}

/// Handle style requests.
///
/// # Endpoint
///
/// `GET /style.json`
///
/// # Response
///
/// `200 OK` with a MapLibre style document referencing `/tilejson` as its
/// only vector source. The initial position comes from the configured center
/// override when present; only otherwise is the container consulted.
pub async fn style_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let origin = request_origin(&headers, state.public_url.as_deref());
    let tilejson_url = absolute(&origin, "/tilejson");
    let asset_base = resolve_asset_base(&origin, &state.asset_base_url);

    let center = match state.center {
        Some(center) => center.as_array(),
        None => {
            let path = Arc::clone(&state.mbtiles_path);
            let result =
                tokio::task::spawn_blocking(move || -> Result<[f64; 3], StoreError> {
                    let store = MbtilesStore::open(&path)?;
                    let metadata = store.metadata()?;
                    Ok(style::center_from_metadata(&metadata))
                })
                .await;
            match result {
                Ok(Ok(center)) => center,
                Ok(Err(err)) => return err.into_response(),
                Err(join_err) => return task_failure(join_err),
            }
        }
    };

    let document = style::build_style(center, &asset_base, &tilejson_url);
    cached_json(&state, Json(document))
}

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// 200 JSON response with the configured Cache-Control header.
fn cached_json<T: IntoResponse>(state: &AppState, body: T) -> Response {
    (
        [(
            header::CACHE_CONTROL,
            format!("public, max-age={}", state.cache_max_age),
        )],
        body,
    )
        .into_response()
}

// =============================================================================
// Tests
// =============================================================================
