//! Test utilities for integration tests.
//!
//! Provides helpers for building throwaway MBTiles containers and routers
//! wired to them.

use std::path::PathBuf;

use axum::Router;
use rusqlite::Connection;
use tempfile::TempDir;

use mbtiles_server::{AppState, RouterConfig};

/// A temporary MBTiles container on disk.
///
/// The backing directory is removed when the value is dropped.
pub struct TestContainer {
    _dir: TempDir,
    pub path: PathBuf,
}

/// Build an MBTiles container with the given metadata rows and tiles.
///
/// Tile rows are written exactly as given: `(zoom_level, tile_column,
/// tile_row, data)` in the container's native TMS addressing, so tests can
/// verify the XYZ translation against independently computed rows.
pub fn create_container(metadata: &[(&str, &str)], tiles: &[(u8, u32, u32, &[u8])]) -> TestContainer {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.mbtiles");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE metadata (name TEXT, value TEXT);
         CREATE TABLE tiles (zoom_level INTEGER, tile_column INTEGER, tile_row INTEGER, tile_data BLOB);",
    )
    .unwrap();

    for (name, value) in metadata {
        conn.execute("INSERT INTO metadata (name, value) VALUES (?1, ?2)", (name, value))
            .unwrap();
    }
    for (zoom, column, row, data) in tiles {
        conn.execute(
            "INSERT INTO tiles (zoom_level, tile_column, tile_row, tile_data) VALUES (?1, ?2, ?3, ?4)",
            (zoom, column, row, data),
        )
        .unwrap();
    }
    drop(conn);

    TestContainer { _dir: dir, path }
}

/// Metadata rows for a minimal valid pbf container.
pub fn pbf_metadata() -> Vec<(&'static str, &'static str)> {
    vec![
        ("format", "pbf"),
        ("json", r#"{"vector_layers":[{"id":"water"}]}"#),
    ]
}

/// Router serving the given container with tracing disabled.
pub fn router_for(container: &TestContainer) -> Router {
    router_for_state(AppState::new(container.path.clone()))
}

/// Router for a fully custom application state.
pub fn router_for_state(state: AppState) -> Router {
    mbtiles_server::create_router(state, RouterConfig::new().with_tracing(false))
}
