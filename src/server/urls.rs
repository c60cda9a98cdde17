//! Absolute-URL building for the current request.
//!
//! TileJSON and style documents embed absolute URLs pointing back at this
//! server. The origin is taken from the request's `Host` header (and
//! `X-Forwarded-Proto` when running behind a reverse proxy) unless a public
//! base URL has been configured explicitly.

use axum::http::{header, HeaderMap};

/// Origin used when the request carries no Host header.
const FALLBACK_ORIGIN: &str = "http://localhost:3000";

/// The origin (`scheme://authority`) to build absolute URLs against.
///
/// A configured public URL wins over request headers; trailing slashes are
/// stripped so it can be concatenated with absolute paths.
pub fn request_origin(headers: &HeaderMap, public_url: Option<&str>) -> String {
    if let Some(url) = public_url {
        return url.trim_end_matches('/').to_string();
    }

    let Some(host) = headers.get(header::HOST).and_then(|h| h.to_str().ok()) else {
        return FALLBACK_ORIGIN.to_string();
    };

    // Behind a reverse proxy the TLS terminates upstream; trust the
    // forwarded protocol header, default to http for local development.
    let proto = headers
        .get("x-forwarded-proto")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("http");

    format!("{proto}://{host}")
}

/// Join an origin with an absolute path.
pub fn absolute(origin: &str, path: &str) -> String {
    format!("{origin}{path}")
}

/// Tile URL template for TileJSON: the tile endpoint's own absolute URL with
/// the literal `0/0/0` coordinate replaced by placeholders.
pub fn tile_url_template(origin: &str) -> String {
    absolute(origin, "/tiles/0/0/0.pbf").replace("/0/0/0.pbf", "/{z}/{x}/{y}.pbf")
}

/// Resolve the static-asset base URL against the request origin when it is
/// not already absolute.
pub fn resolve_asset_base(origin: &str, base_url: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    if trimmed.starts_with("http") {
        trimmed.to_string()
    } else if trimmed.starts_with('/') {
        format!("{origin}{trimmed}")
    } else {
        format!("{origin}/{trimmed}")
    }
}
