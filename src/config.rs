//! Configuration management for the MBTiles server.
//!
//! Configuration comes from command-line arguments via clap, with
//! environment-variable fallbacks under the `MBTILES_` prefix and sensible
//! defaults for everything optional.
//!
//! # Environment Variables
//!
//! - `MBTILES_HOST` - Server bind address (default: 0.0.0.0)
//! - `MBTILES_PORT` - Server port (default: 3000)
//! - `MBTILES_PATH` - Path to the MBTiles container (required)
//! - `MBTILES_CENTER` - Initial position override as "lon,lat,zoom"
//! - `MBTILES_ASSET_BASE_URL` - Base URL for sprites and glyphs
//! - `MBTILES_PUBLIC_URL` - Public base URL for generated links
//! - `MBTILES_CACHE_MAX_AGE` - HTTP cache max-age seconds (default: 3600)
//! - `MBTILES_CORS_ORIGINS` - Allowed CORS origins (comma-separated)

use std::path::PathBuf;

use clap::Parser;
use url::Url;

use crate::style::CenterOverride;

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default static-asset base URL, resolved against the request origin.
pub const DEFAULT_ASSET_BASE_URL: &str = "/static";

/// Default HTTP cache max-age in seconds (1 hour).
pub const DEFAULT_CACHE_MAX_AGE: u32 = 3600;

// =============================================================================
// CLI Arguments
// =============================================================================

/// MBTiles server - serves pre-rendered vector tiles over HTTP.
///
/// Serves tiles, a TileJSON 3.0.0 capability document and a MapLibre style
/// document from a read-only MBTiles container.
#[derive(Parser, Debug, Clone)]
#[command(name = "mbtiles-server")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "MBTILES_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "MBTILES_PORT")]
    pub port: u16,

    // =========================================================================
    // Container Configuration
    // =========================================================================
    /// Path to the MBTiles container file.
    #[arg(long, env = "MBTILES_PATH")]
    pub mbtiles: PathBuf,

    /// Initial map position as "lon,lat,zoom", overriding the container
    /// metadata in the style document.
    #[arg(long, env = "MBTILES_CENTER", value_parser = parse_center)]
    pub center: Option<CenterOverride>,

    // =========================================================================
    // URL Configuration
    // =========================================================================
    /// Base URL for static map assets (sprites, glyph fonts).
    ///
    /// May be relative (resolved against the request origin) or absolute
    /// (e.g. a CDN).
    #[arg(long, default_value = DEFAULT_ASSET_BASE_URL, env = "MBTILES_ASSET_BASE_URL")]
    pub asset_base_url: String,

    /// Public base URL used in generated tile/TileJSON links.
    ///
    /// If not specified, links are derived from the request's Host and
    /// X-Forwarded-Proto headers.
    #[arg(long, env = "MBTILES_PUBLIC_URL")]
    pub public_url: Option<String>,

    // =========================================================================
    // HTTP Configuration
    // =========================================================================
    /// HTTP Cache-Control max-age in seconds.
    #[arg(long, default_value_t = DEFAULT_CACHE_MAX_AGE, env = "MBTILES_CACHE_MAX_AGE")]
    pub cache_max_age: u32,

    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "MBTILES_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

fn parse_center(value: &str) -> Result<CenterOverride, String> {
    value.parse()
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if !self.mbtiles.is_file() {
            return Err(format!(
                "MBTiles container {} does not exist. Set --mbtiles or MBTILES_PATH",
                self.mbtiles.display()
            ));
        }

        if self.asset_base_url.is_empty() {
            return Err("asset_base_url must not be empty".to_string());
        }

        if let Some(ref public_url) = self.public_url {
            let parsed = Url::parse(public_url)
                .map_err(|e| format!("public_url {public_url:?} is not a valid URL: {e}"))?;
            if parsed.host_str().is_none() {
                return Err(format!("public_url {public_url:?} has no host"));
            }
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// =============================================================================
// Tests
// =============================================================================
