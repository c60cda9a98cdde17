//! HTTP server layer for the MBTiles tile API.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                          HTTP Layer                            │
//! │   GET /tiles/{z}/{x}/{y}.pbf   /tilejson   /style.json         │
//! │                                                                │
//! │  ┌─────────────┐  ┌──────────────┐  ┌───────────────────────┐  │
//! │  │  handlers   │  │     urls     │  │        routes         │  │
//! │  │ (requests)  │  │ (absolute    │  │   (router config)     │  │
//! │  │             │  │  URL build)  │  │                       │  │
//! │  └─────────────┘  └──────────────┘  └───────────────────────┘  │
//! └────────────────────────────────────────────────────────────────┘
//! ```

pub mod handlers;
pub mod routes;
pub mod urls;

pub use handlers::{
    health_handler, style_handler, tile_handler, tilejson_handler, AppState, ErrorResponse,
    HealthResponse, TilePathParams,
};
pub use routes::{create_router, RouterConfig};
pub use urls::{absolute, request_origin, resolve_asset_base, tile_url_template};
