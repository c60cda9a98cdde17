//! MBTiles server - serves pre-rendered vector tiles over HTTP.
//!
//! This binary starts the HTTP server and configures all components.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mbtiles_server::{
    config::Config,
    mbtiles::MbtilesStore,
    server::{create_router, AppState, RouterConfig},
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Configuration:");
    info!("  Container: {}", config.mbtiles.display());
    info!("  Asset base URL: {}", config.asset_base_url);
    if let Some(ref public_url) = config.public_url {
        info!("  Public URL: {}", public_url);
    }
    if let Some(ref center) = config.center {
        info!("  Center override: {}", center);
    }

    // Preflight: open the container once so a missing file or a non-pbf
    // format fails at startup instead of on the first request.
    info!("");
    info!("Checking tile container...");
    match check_container(&config) {
        Ok(summary) => {
            info!("  {}", summary);
        }
        Err(e) => {
            error!("  Container check failed: {}", e);
            error!("");
            error!("  Please check:");
            error!("    - The path points at an MBTiles (SQLite) file");
            error!("    - The container declares format=pbf in its metadata");
            return ExitCode::FAILURE;
        }
    }

    let state = AppState::new(config.mbtiles.clone())
        .with_center(config.center)
        .with_asset_base_url(config.asset_base_url.clone())
        .with_public_url(config.public_url.clone())
        .with_cache_max_age(config.cache_max_age);

    let mut router_config = RouterConfig::new().with_tracing(!config.no_tracing);
    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    let router = create_router(state, router_config);

    let addr = config.bind_address();

    info!("");
    info!("────────────────────────────────────────────────────────────────");
    info!("  Server listening on: http://{}", addr);
    info!("");
    info!("  Try these endpoints:");
    info!("    curl http://{}/health", addr);
    info!("    curl http://{}/tilejson", addr);
    info!("    curl http://{}/style.json", addr);
    info!("    curl http://{}/tiles/0/0/0.pbf", addr);
    info!("────────────────────────────────────────────────────────────────");
    info!("");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Open the container, read its metadata and describe it in one line.
fn check_container(config: &Config) -> Result<String, String> {
    let store = MbtilesStore::open(&config.mbtiles).map_err(|e| e.to_string())?;
    let metadata = store.metadata().map_err(|e| e.to_string())?;

    let format = metadata
        .string("format")
        .ok_or("container declares no format")?;
    if format != "pbf" {
        return Err(format!(
            "container format is {format:?}; only pbf containers are served"
        ));
    }

    let name = metadata.string("name").unwrap_or("unnamed");
    let zoom_range = match (metadata.zoom("minzoom"), metadata.zoom("maxzoom")) {
        (Some(min), Some(max)) => format!("zoom {min}-{max}"),
        _ => "zoom range not declared".to_string(),
    };

    Ok(format!("{name} (format=pbf, {zoom_range})"))
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "mbtiles_server=debug,tower_http=debug"
    } else {
        "mbtiles_server=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
