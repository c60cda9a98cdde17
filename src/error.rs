use thiserror::Error;

/// Errors raised by the MBTiles container store.
///
/// The store distinguishes two very different situations: a coordinate that
/// simply has no tile (`MissingTile`, expected and frequent, surfaced as HTTP
/// 204) and a container that cannot be used at all (`Open` /
/// `MalformedMetadata`, exceptional, surfaced as HTTP 5xx). Store failures
/// are never downgraded to a missing tile.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The container file is missing, unreadable or corrupt
    #[error("failed to open tile container: {0}")]
    Open(String),

    /// No row matches the requested coordinate
    #[error("no tile at z={z} x={x} y={y}")]
    MissingTile { z: u8, x: u32, y: u32 },

    /// A metadata row could not be decoded
    #[error("malformed container metadata: {0}")]
    MalformedMetadata(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Open(err.to_string())
    }
}

/// Errors raised while synthesizing TileJSON or style documents.
#[derive(Debug, Clone, Error)]
pub enum SynthesisError {
    /// Store error while reading metadata
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The container declares a format other than "pbf". Signals a
    /// deployment mistake rather than a per-request condition.
    #[error("unsupported tile format {format:?}: only pbf containers are served")]
    UnsupportedFormat { format: String },

    /// A required metadata key is absent and no default is defined
    #[error("malformed container metadata: {0}")]
    MalformedMetadata(String),
}
