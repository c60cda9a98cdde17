//! Scoped read access to an MBTiles (SQLite) container.
//!
//! [`MbtilesStore`] wraps a read-only SQLite connection to a container
//! produced elsewhere. The container is never written; opening is scoped to
//! one logical operation and the connection is released when the store is
//! dropped, so no handle outlives the request that acquired it.
//!
//! MBTiles addresses rows bottom-up (TMS) while the HTTP boundary speaks XYZ
//! (row 0 at the top). The store owns that translation: callers always pass
//! XYZ coordinates.

use std::path::Path;

use rusqlite::{Connection, OpenFlags, OptionalExtension};
use tracing::debug;

use crate::error::StoreError;

use super::metadata::Metadata;

/// A scoped, read-only handle on an MBTiles container.
///
/// Dropping the store closes the underlying SQLite connection. Handlers open
/// one store per request and never cache it.
pub struct MbtilesStore {
    conn: Connection,
}

impl MbtilesStore {
    /// Open the container at `path` read-only.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Open`] if the file is missing, unreadable or not
    /// a SQLite database.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        debug!("opening tile container at {}", path.display());

        if !path.is_file() {
            return Err(StoreError::Open(format!(
                "{} does not exist",
                path.display()
            )));
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        Ok(MbtilesStore { conn })
    }

    /// Fetch the tile payload at an XYZ coordinate.
    ///
    /// The coordinate is translated to the container's TMS row addressing
    /// with `tms_row = (2^z - 1) - y`. No bounds validation is performed
    /// against the metadata zoom range: out-of-range coordinates simply miss.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MissingTile`] when no row matches, and
    /// [`StoreError::Open`] when the query itself fails.
    pub fn tile(&self, z: u8, x: u32, y: u32) -> Result<Vec<u8>, StoreError> {
        let missing = || StoreError::MissingTile { z, x, y };

        // Zoom levels that cannot be addressed (or rows above the top of the
        // grid) cannot match any row.
        let row = flip_row(z, y).ok_or_else(missing)?;

        self.conn
            .query_row(
                "SELECT tile_data FROM tiles \
                 WHERE zoom_level = ?1 AND tile_column = ?2 AND tile_row = ?3",
                (z, x, row),
                |r| r.get(0),
            )
            .optional()?
            .ok_or_else(missing)
    }

    /// Read and decode the container metadata.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Open`] when the `metadata` table cannot be read
    /// and [`StoreError::MalformedMetadata`] when a row cannot be decoded.
    pub fn metadata(&self) -> Result<Metadata, StoreError> {
        let mut stmt = self.conn.prepare("SELECT name, value FROM metadata")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<(String, String)>, _>>()?;

        Metadata::from_rows(rows)
    }
}

/// Translate an XYZ row index to the TMS index used by MBTiles (and back:
/// the translation is its own inverse).
///
/// Returns `None` when the zoom level has no representable rows or `y` lies
/// outside the grid.
pub fn flip_row(z: u8, y: u32) -> Option<u32> {
    let rows = 1u64.checked_shl(u32::from(z))?;
    let max_row = u32::try_from(rows - 1).ok()?;
    max_row.checked_sub(y)
}
