//! # MBTiles Server
//!
//! A tile server for pre-rendered vector tiles stored in MBTiles containers.
//!
//! This library serves gzip-compressed protobuf vector tiles from a
//! read-only MBTiles (SQLite) container, together with the two documents a
//! map-rendering client needs to consume them: a TileJSON 3.0.0 capability
//! document synthesized from the container metadata, and a MapLibre style
//! document referencing the TileJSON endpoint.
//!
//! ## Features
//!
//! - **Scoped container access**: each request opens and closes its own
//!   read-only SQLite connection; no handle is shared across requests
//! - **XYZ addressing**: incoming coordinates are translated to the
//!   container's TMS row addressing transparently
//! - **Metadata defaulting**: TileJSON synthesis applies the full set of
//!   defaulting rules (scheme, bounds, zoom range, derived center)
//! - **Precise miss semantics**: a coordinate with no tile is an empty 204,
//!   never confused with a store failure
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`mbtiles`] - Container store and metadata decoding
//! - [`tilejson`] - TileJSON 3.0.0 synthesis
//! - [`style`] - MapLibre style synthesis
//! - [`server`] - Axum-based HTTP server and routes
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use mbtiles_server::{create_router, AppState, RouterConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let state = AppState::new(PathBuf::from("/data/planet.mbtiles"));
//!     let router = create_router(state, RouterConfig::new());
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000")
//!         .await
//!         .unwrap();
//!     axum::serve(listener, router).await.unwrap();
//! }
//! ```

pub mod config;
pub mod error;
pub mod mbtiles;
pub mod server;
pub mod style;
pub mod tilejson;

// Re-export commonly used types
pub use config::Config;
pub use error::{StoreError, SynthesisError};
pub use mbtiles::{flip_row, MbtilesStore, Metadata};
pub use server::{
    create_router, health_handler, style_handler, tile_handler, tilejson_handler, AppState,
    ErrorResponse, HealthResponse, RouterConfig, TilePathParams,
};
pub use style::{build_style, center_from_metadata, CenterOverride};
pub use tilejson::{
    center_from_bounds, TileJson, DEFAULT_MAXZOOM, DEFAULT_MINZOOM, DEFAULT_ZOOM, WORLD_BOUNDS,
};
